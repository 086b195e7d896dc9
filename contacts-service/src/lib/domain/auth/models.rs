use serde::Serialize;

use crate::domain::user::models::User;

/// Token type reported alongside every issued pair.
pub const BEARER: &str = "bearer";

/// Access and refresh tokens issued together on login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenPair {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: BEARER.to_string(),
        }
    }
}

/// Result of a successful signup.
///
/// Delivering the confirmation token is left to the caller.
#[derive(Debug, Clone)]
pub struct SignupOutcome {
    pub user: User,
    pub confirmation_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailConfirmation {
    Confirmed,
    AlreadyConfirmed,
}

impl EmailConfirmation {
    pub fn message(&self) -> &'static str {
        match self {
            EmailConfirmation::Confirmed => "Email confirmed",
            EmailConfirmation::AlreadyConfirmed => "Your email is already confirmed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationRequest {
    Sent,
    AlreadyConfirmed,
}

impl ConfirmationRequest {
    pub fn message(&self) -> &'static str {
        match self {
            ConfirmationRequest::Sent => "Check your email for confirmation.",
            ConfirmationRequest::AlreadyConfirmed => "Your email is already confirmed.",
        }
    }
}

/// Where an identity lookup was answered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityLookup {
    CacheHit(User),
    StoreHit(User),
    NotFound,
}

impl IdentityLookup {
    pub fn into_user(self) -> Option<User> {
        match self {
            IdentityLookup::CacheHit(user) | IdentityLookup::StoreHit(user) => Some(user),
            IdentityLookup::NotFound => None,
        }
    }
}

/// Confirmation message handed to an email dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationEmail {
    pub recipient: String,
    pub username: String,
    pub base_url: String,
    pub token: String,
}

impl ConfirmationEmail {
    pub fn new(user: &User, base_url: impl Into<String>, token: String) -> Self {
        Self {
            recipient: user.email.as_str().to_string(),
            username: user.username.as_str().to_string(),
            base_url: base_url.into(),
            token,
        }
    }

    /// Link the recipient follows to confirm the address.
    pub fn confirmation_link(&self) -> String {
        let base_url = self.base_url.trim_end_matches('/');
        format!("{}/api/auth/confirmed_email/{}", base_url, self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Username;

    #[test]
    fn test_confirmation_link() {
        let user = User::register(
            Username::new("alice".to_string()).unwrap(),
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            "hash".to_string(),
        );

        let email = ConfirmationEmail::new(&user, "http://localhost:8000/", "tok".to_string());
        assert_eq!(
            email.confirmation_link(),
            "http://localhost:8000/api/auth/confirmed_email/tok"
        );
        assert_eq!(email.recipient, "alice@example.com");

        let email = ConfirmationEmail::new(&user, "https://contacts.example.com", "tok".to_string());
        assert_eq!(
            email.confirmation_link(),
            "https://contacts.example.com/api/auth/confirmed_email/tok"
        );
    }

    #[test]
    fn test_token_pair_is_bearer() {
        let pair = TokenPair::bearer("a".to_string(), "r".to_string());
        assert_eq!(pair.token_type, "bearer");
    }

    #[test]
    fn test_already_confirmed_messages() {
        assert_eq!(
            EmailConfirmation::AlreadyConfirmed.message(),
            "Your email is already confirmed"
        );
        assert_eq!(
            ConfirmationRequest::AlreadyConfirmed.message(),
            "Your email is already confirmed."
        );
    }
}
