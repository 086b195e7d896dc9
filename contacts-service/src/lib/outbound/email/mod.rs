pub mod http_email_dispatcher;
pub mod logging_email_dispatcher;

pub use http_email_dispatcher::HttpEmailDispatcher;
pub use logging_email_dispatcher::LoggingEmailDispatcher;
