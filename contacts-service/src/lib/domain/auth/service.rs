use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use auth::TokenScope;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::ConfirmationEmail;
use crate::domain::auth::models::ConfirmationRequest;
use crate::domain::auth::models::EmailConfirmation;
use crate::domain::auth::models::IdentityLookup;
use crate::domain::auth::models::SignupOutcome;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::EmailDispatcher;
use crate::domain::auth::ports::SessionCache;
use crate::domain::user::models::AvatarUrl;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;

/// Session cache key for a user snapshot.
pub fn cache_key(email: &str) -> String {
    format!("user:{}", email)
}

/// Domain service implementation for authentication and session operations.
///
/// The user store is authoritative. The session cache only shortens identity
/// lookups and any failure in it degrades to a store read.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    cache: Arc<dyn SessionCache>,
    email_dispatcher: Arc<dyn EmailDispatcher>,
    authenticator: Arc<Authenticator>,
    cache_ttl_seconds: u64,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `cache` - Session cache for user snapshots
    /// * `email_dispatcher` - Confirmation email delivery
    /// * `authenticator` - Password hashing and token issuance
    /// * `cache_ttl_seconds` - Lifetime of cached user snapshots
    pub fn new(
        repository: Arc<UR>,
        cache: Arc<dyn SessionCache>,
        email_dispatcher: Arc<dyn EmailDispatcher>,
        authenticator: Arc<Authenticator>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            repository,
            cache,
            email_dispatcher,
            authenticator,
            cache_ttl_seconds,
        }
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    async fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let stored_hash = stored_hash.to_string();

        tokio::task::spawn_blocking(move || authenticator.verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {}", e)))
    }

    fn issue_token_pair(&self, email: &str) -> Result<TokenPair, AuthError> {
        let access_token = self
            .authenticator
            .issue_access_token(email)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let refresh_token = self
            .authenticator
            .issue_refresh_token(email)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(TokenPair::bearer(access_token, refresh_token))
    }

    /// Decode a session token and return its subject if it carries `scope`.
    fn scoped_subject(&self, token: &str, scope: TokenScope) -> Result<String, AuthError> {
        let claims: Claims = self.authenticator.decode(token).map_err(|e| {
            tracing::debug!(error = %e, scope = scope.as_str(), "Rejected session token");
            AuthError::Unauthorized
        })?;

        if !claims.has_scope(scope) {
            tracing::debug!(
                expected = scope.as_str(),
                actual = claims.scope.map(|s| s.as_str()).unwrap_or("none"),
                "Rejected session token with wrong scope"
            );
            return Err(AuthError::Unauthorized);
        }

        claims
            .subject()
            .map(str::to_string)
            .ok_or(AuthError::Unauthorized)
    }

    async fn revoke_refresh_token(&self, user: &User) -> Result<(), AuthError> {
        self.repository.set_refresh_token(user, None).await?;
        Ok(())
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn signup(&self, command: SignupCommand) -> Result<SignupOutcome, AuthError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = self.hash_password(command.password.as_str()).await?;
        let user = User::register(command.username, command.email, password_hash);

        // A concurrent signup for the same email surfaces here as AlreadyExists
        let created_user = self.repository.create(user).await?;

        let confirmation_token = self
            .authenticator
            .issue_email_token(created_user.email.as_str())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(user_id = %created_user.id, "User signed up");

        Ok(SignupOutcome {
            user: created_user,
            confirmation_token,
        })
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidEmail)?;

        if !user.confirmed {
            return Err(AuthError::EmailNotConfirmed);
        }

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidPassword);
        }

        let token_pair = self.issue_token_pair(email)?;
        self.repository
            .set_refresh_token(&user, Some(token_pair.refresh_token.clone()))
            .await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(token_pair)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let email = self.scoped_subject(refresh_token, TokenScope::Refresh)?;

        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            tracing::warn!(user_id = %user.id, "Stale refresh token presented, revoking session");
            self.revoke_refresh_token(&user).await?;
            return Err(AuthError::Unauthorized);
        }

        let token_pair = self.issue_token_pair(&email)?;

        let rotated = self
            .repository
            .rotate_refresh_token(&user, refresh_token, &token_pair.refresh_token)
            .await?;

        if !rotated {
            tracing::warn!(user_id = %user.id, "Concurrent refresh detected, revoking session");
            self.revoke_refresh_token(&user).await?;
            return Err(AuthError::Unauthorized);
        }

        tracing::debug!(user_id = %user.id, "Refresh token rotated");

        Ok(token_pair)
    }

    async fn resolve_current_user(&self, access_token: &str) -> Result<User, AuthError> {
        let email = self.scoped_subject(access_token, TokenScope::Access)?;

        self.lookup_identity(&email)
            .await?
            .into_user()
            .ok_or(AuthError::Unauthorized)
    }

    async fn lookup_identity(&self, email: &str) -> Result<IdentityLookup, AuthError> {
        let key = cache_key(email);

        match self.cache.get(&key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<User>(&bytes) {
                Ok(user) => return Ok(IdentityLookup::CacheHit(user)),
                Err(e) => tracing::warn!(error = %e, "Discarding undecodable cached user"),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Session cache read failed, using store"),
        }

        let user = match self.repository.find_by_email(email).await? {
            Some(user) => user,
            None => return Ok(IdentityLookup::NotFound),
        };

        match serde_json::to_vec(&user) {
            Ok(bytes) => {
                if let Err(e) = self.cache.set(&key, bytes, self.cache_ttl_seconds).await {
                    tracing::warn!(error = %e, "Session cache write failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize user for cache"),
        }

        Ok(IdentityLookup::StoreHit(user))
    }

    async fn confirm_email(&self, token: &str) -> Result<EmailConfirmation, AuthError> {
        let claims = self.authenticator.decode(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected confirmation token");
            AuthError::VerificationError
        })?;

        let email = claims.subject().ok_or(AuthError::VerificationError)?;

        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(AuthError::VerificationError)?;

        if user.confirmed {
            return Ok(EmailConfirmation::AlreadyConfirmed);
        }

        self.repository.set_confirmed(&user).await?;
        tracing::info!(user_id = %user.id, "Email confirmed");

        Ok(EmailConfirmation::Confirmed)
    }

    async fn request_email_confirmation(
        &self,
        email: &str,
        base_url: &str,
    ) -> Result<ConfirmationRequest, AuthError> {
        let user = match self.repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Confirmation requested for unregistered email");
                return Ok(ConfirmationRequest::Sent);
            }
        };

        if user.confirmed {
            return Ok(ConfirmationRequest::AlreadyConfirmed);
        }

        let token = self
            .authenticator
            .issue_email_token(user.email.as_str())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        self.email_dispatcher
            .send_confirmation(ConfirmationEmail::new(&user, base_url, token));

        Ok(ConfirmationRequest::Sent)
    }

    async fn update_avatar(&self, user: &User, avatar: AvatarUrl) -> Result<User, AuthError> {
        let updated = self.repository.set_avatar(user, &avatar).await?;
        tracing::info!(user_id = %updated.id, "Avatar updated");
        Ok(updated)
    }
}
