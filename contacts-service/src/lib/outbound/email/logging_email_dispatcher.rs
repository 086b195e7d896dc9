use crate::domain::auth::models::ConfirmationEmail;
use crate::domain::auth::ports::EmailDispatcher;

/// Dispatcher for local runs: writes the confirmation link to the log
/// instead of sending mail.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEmailDispatcher;

impl LoggingEmailDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl EmailDispatcher for LoggingEmailDispatcher {
    fn send_confirmation(&self, email: ConfirmationEmail) {
        tracing::info!(
            recipient = %email.recipient,
            link = %email.confirmation_link(),
            "Confirmation email (not sent, email delivery disabled)"
        );
    }
}
