use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use md5::Digest;
use md5::Md5;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::user::errors::AvatarError;
use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// The full record as persisted, including credential material. The same
/// shape is serialized into the session cache, so it must never be sent to
/// clients directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub refresh_token: Option<String>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// New unconfirmed account whose avatar defaults to the email's Gravatar.
    pub fn register(username: Username, email: EmailAddress, password_hash: String) -> Self {
        let avatar = AvatarUrl::gravatar(&email);

        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            avatar: Some(avatar.0),
            refresh_token: None,
            confirmed: false,
            created_at: Utc::now(),
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 5-100 characters long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 5;
    const MAX_LENGTH: usize = 100;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 5 characters
    /// * `TooLong` - Username longer than 100 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. The email doubles
/// as the login identity and the token subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted at signup.
///
/// Only the length policy lives here; hashing belongs to the auth crate.
/// `Debug` is redacted so the value never reaches a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;
    const MAX_LENGTH: usize = 100;

    /// # Errors
    /// * `TooShort` - Password shorter than 6 characters
    /// * `TooLong` - Password longer than 100 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Avatar image location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    const MAX_LENGTH: usize = 255;
    const GRAVATAR_BASE: &'static str = "https://www.gravatar.com/avatar/";

    /// # Errors
    /// * `InvalidScheme` - Not an http or https URL
    /// * `TooLong` - Longer than the stored column allows
    pub fn new(url: String) -> Result<Self, AvatarError> {
        let url = url.trim().to_string();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(AvatarError::InvalidScheme);
        }
        let length = url.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(AvatarError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(url))
    }

    /// Gravatar image for `email`, keyed by the MD5 of the trimmed, lowercased address.
    ///
    /// No request is made; Gravatar serves its default image for unknown hashes.
    pub fn gravatar(email: &EmailAddress) -> Self {
        let normalized = email.as_str().trim().to_lowercase();
        let digest = Md5::digest(normalized.as_bytes());
        Self(format!("{}{:x}", Self::GRAVATAR_BASE, digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to register a new account with validated fields
#[derive(Debug)]
pub struct SignupCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
}

impl SignupCommand {
    pub fn new(username: Username, email: EmailAddress, password: Password) -> Self {
        Self {
            username,
            email,
            password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_length_bounds() {
        assert!(Username::new("abcde".to_string()).is_ok());
        assert!(Username::new("a".repeat(100)).is_ok());
        assert_eq!(
            Username::new("abcd".to_string()),
            Err(UsernameError::TooShort { min: 5, actual: 4 })
        );
        assert_eq!(
            Username::new("a".repeat(101)),
            Err(UsernameError::TooLong {
                max: 100,
                actual: 101
            })
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("a@example.com".to_string()).is_ok());
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_password_policy() {
        assert!(Password::new("secret".to_string()).is_ok());
        assert!(matches!(
            Password::new("short".to_string()),
            Err(PasswordPolicyError::TooShort { .. })
        ));
        assert!(matches!(
            Password::new("x".repeat(101)),
            Err(PasswordPolicyError::TooLong { .. })
        ));
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("hunter22".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter22"));
    }

    #[test]
    fn test_gravatar_url() {
        let email = EmailAddress::new("MyEmailAddress@example.com".to_string()).unwrap();

        assert_eq!(
            AvatarUrl::gravatar(&email).as_str(),
            "https://www.gravatar.com/avatar/0bc83cb571cd1c50ba6f3e8a78ef1346"
        );
    }

    #[test]
    fn test_register_sets_gravatar() {
        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let user = User::register(
            Username::new("alice".to_string()).unwrap(),
            email.clone(),
            "hash".to_string(),
        );

        assert_eq!(
            user.avatar.as_deref(),
            Some(AvatarUrl::gravatar(&email).as_str())
        );
        assert!(!user.confirmed);
    }

    #[test]
    fn test_avatar_url() {
        assert!(AvatarUrl::new("https://cdn.example.com/a.png".to_string()).is_ok());
        assert_eq!(
            AvatarUrl::new("ftp://example.com/a.png".to_string()),
            Err(AvatarError::InvalidScheme)
        );
    }

    #[test]
    fn test_user_snapshot_round_trips_through_json() {
        let user = User::register(
            Username::new("alice".to_string()).unwrap(),
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            "$argon2id$hash".to_string(),
        );

        let bytes = serde_json::to_vec(&user).unwrap();
        let restored: User = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(restored, user);
        assert!(!restored.confirmed);
    }
}
