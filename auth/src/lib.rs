//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the contacts service:
//! - Password hashing (Argon2id)
//! - JWT encoding and validation with access/refresh scopes
//! - Token issuance with configured lifetimes
//!
//! Nothing here performs I/O. Deciding whether a token's scope fits its use
//! is left to the caller.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler, TokenScope};
//! use chrono::{Duration, Utc};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::issue("a@example.com", Some(TokenScope::Access), Duration::minutes(15), Utc::now());
//! let token = handler.encode(&claims).unwrap();
//! let decoded: Claims = handler.decode(&token).unwrap();
//! assert!(decoded.has_scope(TokenScope::Access));
//! ```
//!
//! ## Token Issuance
//! ```
//! use auth::{Authenticator, JwtHandler, TokenLifetimes, TokenScope};
//!
//! let auth = Authenticator::new(
//!     JwtHandler::from_config("secret_key_at_least_32_bytes_long!", "HS256").unwrap(),
//!     TokenLifetimes::default(),
//! );
//!
//! let refresh = auth.issue_refresh_token("a@example.com").unwrap();
//! let claims = auth.decode(&refresh).unwrap();
//! assert_eq!(claims.subject(), Some("a@example.com"));
//! assert!(claims.has_scope(TokenScope::Refresh));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use authenticator::TokenLifetimes;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenScope;
pub use password::PasswordError;
pub use password::PasswordHasher;
