use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::CacheError;
use crate::domain::auth::models::ConfirmationEmail;
use crate::domain::auth::models::ConfirmationRequest;
use crate::domain::auth::models::EmailConfirmation;
use crate::domain::auth::models::IdentityLookup;
use crate::domain::auth::models::SignupOutcome;
use crate::domain::auth::models::TokenPair;
use crate::domain::user::models::AvatarUrl;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::User;

/// Port for authentication and session operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new, unconfirmed account.
    ///
    /// # Returns
    /// The stored user and a confirmation token for the caller to deliver
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    async fn signup(&self, command: SignupCommand) -> Result<SignupOutcome, AuthError>;

    /// Exchange credentials for a token pair.
    ///
    /// Checks run in order: unknown email, unconfirmed email, wrong password.
    ///
    /// # Errors
    /// * `InvalidEmail` - No account for this email
    /// * `EmailNotConfirmed` - Account exists but is not confirmed
    /// * `InvalidPassword` - Password does not match
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Rotate a refresh token into a fresh pair.
    ///
    /// A refresh token that no longer matches the stored one revokes the
    /// stored token entirely.
    ///
    /// # Errors
    /// * `Unauthorized` - Token invalid, expired, wrong scope or not current
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Resolve the account behind an access token.
    ///
    /// # Errors
    /// * `Unauthorized` - Token invalid, expired, wrong scope or user gone
    async fn resolve_current_user(&self, access_token: &str) -> Result<User, AuthError>;

    /// Look a user up through the session cache, falling back to the store.
    async fn lookup_identity(&self, email: &str) -> Result<IdentityLookup, AuthError>;

    /// # Errors
    /// * `VerificationError` - Token unusable or user unknown
    async fn confirm_email(&self, token: &str) -> Result<EmailConfirmation, AuthError>;

    /// Send a new confirmation link if the account still needs one.
    ///
    /// Unknown emails report `Sent` so the endpoint does not reveal which
    /// addresses are registered.
    async fn request_email_confirmation(
        &self,
        email: &str,
        base_url: &str,
    ) -> Result<ConfirmationRequest, AuthError>;

    async fn update_avatar(&self, user: &User, avatar: AvatarUrl) -> Result<User, AuthError>;
}

/// Short-lived key/value store holding serialized user snapshots.
#[async_trait]
pub trait SessionCache: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl_seconds`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<(), CacheError>;
}

/// Fixed-window counter shared by every instance behind the same store.
#[async_trait]
pub trait RequestCounter: Send + Sync + 'static {
    /// Increment `key` and return the count within the current window.
    ///
    /// The window starts with the first increment and lasts
    /// `window_seconds`.
    async fn incr(&self, key: &str, window_seconds: u64) -> Result<u64, CacheError>;
}

/// Outbound delivery of confirmation emails.
///
/// Fire-and-forget: implementations return immediately and report delivery
/// failures through logs only.
pub trait EmailDispatcher: Send + Sync + 'static {
    fn send_confirmation(&self, email: ConfirmationEmail);
}
