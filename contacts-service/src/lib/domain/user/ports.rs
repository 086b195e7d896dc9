use async_trait::async_trait;

use crate::domain::user::models::AvatarUrl;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

/// Persistence operations for the user aggregate.
///
/// Users are keyed by email. Every mutating operation returns the record as
/// stored after the write.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Overwrite the stored refresh token, `None` revokes it.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn set_refresh_token(
        &self,
        user: &User,
        token: Option<String>,
    ) -> Result<User, UserError>;

    /// Replace the stored refresh token only if it still equals `expected`.
    ///
    /// # Returns
    /// `true` if the swap happened, `false` if the stored value had changed
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn rotate_refresh_token(
        &self,
        user: &User,
        expected: &str,
        replacement: &str,
    ) -> Result<bool, UserError>;

    /// Mark the user's email as confirmed.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn set_confirmed(&self, user: &User) -> Result<User, UserError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn set_avatar(&self, user: &User, avatar: &AvatarUrl) -> Result<User, UserError>;
}
