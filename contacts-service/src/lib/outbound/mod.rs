pub mod cache;
pub mod email;
pub mod repositories;
