use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Purpose marker carried by session tokens.
///
/// Access and refresh tokens are signed with the same secret, so the scope is
/// the only thing that tells them apart. Email confirmation tokens carry no
/// scope at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    Access,
    Refresh,
    /// Any scope value this service never issues.
    #[serde(other)]
    Unknown,
}

impl TokenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Access => "access",
            TokenScope::Refresh => "refresh",
            TokenScope::Unknown => "unknown",
        }
    }
}

/// JWT claims set used for every token the service issues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user email)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID, unique per issued token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Purpose marker (absent on email confirmation tokens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<TokenScope>,
}

impl Claims {
    /// Build claims for a freshly issued token.
    ///
    /// # Arguments
    /// * `subject` - Token subject (user email)
    /// * `scope` - Purpose marker, `None` for confirmation tokens
    /// * `ttl` - Lifetime of the token
    /// * `now` - Issuance instant
    ///
    /// # Returns
    /// Claims with `iat = now`, `exp = now + ttl` and a random `jti`
    pub fn issue(
        subject: impl ToString,
        scope: Option<TokenScope>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: Some(subject.to_string()),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
            scope,
        }
    }

    /// Subject, if the token carries a non-empty one.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.is_empty())
    }

    pub fn has_scope(&self, scope: TokenScope) -> bool {
        self.scope == Some(scope)
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
