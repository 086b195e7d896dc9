use std::sync::Arc;

use axum::extract::MatchedPath;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use super::middleware::AuthenticatedUser;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::RequestCounter;
use crate::inbound::http::router::AppState;

/// Per-key fixed-window limit over a shared request counter.
#[derive(Clone)]
pub struct RateLimiter {
    counter: Arc<dyn RequestCounter>,
    max_requests: u64,
    window_seconds: u64,
}

impl RateLimiter {
    pub fn new(counter: Arc<dyn RequestCounter>, max_requests: u64, window_seconds: u64) -> Self {
        Self {
            counter,
            max_requests,
            window_seconds,
        }
    }

    /// Count one request against `key` and report whether it is allowed.
    ///
    /// A failing counter lets the request through.
    pub async fn check(&self, key: &str) -> bool {
        match self.counter.incr(key, self.window_seconds).await {
            Ok(count) => count <= self.max_requests,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Rate limit counter unavailable");
                true
            }
        }
    }
}

/// Middleware limiting each authenticated user per route.
///
/// Must run inside the authentication middleware.
pub async fn limit_per_user(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = req
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|AuthenticatedUser(user)| user.id.to_string())
        .ok_or_else(|| ApiError::from(AuthError::Unauthorized))?;
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let key = format!("rate:{}:{}", user_id, route);
    if !state.rate_limiter.check(&key).await {
        tracing::warn!(user_id = %user_id, route = %route, "Rate limit exceeded");
        return Err(ApiError::TooManyRequests("Too many requests".to_string()));
    }

    Ok(next.run(req).await)
}
