use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenScope;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Lifetimes for the three kinds of token the service issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
    pub email_confirmation: Duration,
}

impl TokenLifetimes {
    /// Build lifetimes from second counts as found in configuration.
    pub fn from_seconds(access: i64, refresh: i64, email_confirmation: i64) -> Self {
        Self {
            access: Duration::seconds(access),
            refresh: Duration::seconds(refresh),
            email_confirmation: Duration::seconds(email_confirmation),
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::days(7),
            email_confirmation: Duration::days(7),
        }
    }
}

/// Authentication coordinator combining password hashing and JWT handling.
///
/// Issues access, refresh and email confirmation tokens with the configured
/// lifetimes. It does not decide whether a decoded token is fit for a given
/// use; callers check the scope themselves.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    lifetimes: TokenLifetimes,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_handler` - Handler holding the signing secret and algorithm
    /// * `lifetimes` - Token lifetimes
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(jwt_handler: JwtHandler, lifetimes: TokenLifetimes) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler,
            lifetimes,
        }
    }

    pub fn lifetimes(&self) -> &TokenLifetimes {
        &self.lifetimes
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Issue a short-lived access token for `subject`.
    pub fn issue_access_token(&self, subject: &str) -> Result<String, JwtError> {
        self.issue(subject, Some(TokenScope::Access), self.lifetimes.access)
    }

    /// Issue a refresh token for `subject`.
    pub fn issue_refresh_token(&self, subject: &str) -> Result<String, JwtError> {
        self.issue(subject, Some(TokenScope::Refresh), self.lifetimes.refresh)
    }

    /// Issue an email confirmation token for `subject`.
    ///
    /// Confirmation tokens carry no scope claim.
    pub fn issue_email_token(&self, subject: &str) -> Result<String, JwtError> {
        self.issue(subject, None, self.lifetimes.email_confirmation)
    }

    /// Validate signature and expiry, returning the claims.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }

    fn issue(
        &self,
        subject: &str,
        scope: Option<TokenScope>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = Claims::issue(subject, scope, ttl, Utc::now());
        self.jwt_handler.encode(&claims)
    }
}
