use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::confirm_email::confirm_email;
use super::handlers::create_contact::create_contact;
use super::handlers::delete_contact::delete_contact;
use super::handlers::get_contact::get_contact;
use super::handlers::get_current_user::get_current_user;
use super::handlers::health::health;
use super::handlers::list_contacts::list_contacts;
use super::handlers::login::login;
use super::handlers::refresh_token::refresh_token;
use super::handlers::request_email::request_email;
use super::handlers::search_contacts::search_contacts;
use super::handlers::signup::signup;
use super::handlers::upcoming_birthdays::upcoming_birthdays;
use super::handlers::update_avatar::update_avatar;
use super::handlers::update_contact::update_contact;
use super::middleware::authenticate as auth_middleware;
use super::rate_limit::limit_per_user;
use super::rate_limit::RateLimiter;
use crate::contact::ports::ContactServicePort;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::EmailDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub contact_service: Arc<dyn ContactServicePort>,
    pub email_dispatcher: Arc<dyn EmailDispatcher>,
    /// Base URL placed in confirmation links
    pub public_url: Arc<str>,
    pub rate_limiter: RateLimiter,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    contact_service: Arc<dyn ContactServicePort>,
    email_dispatcher: Arc<dyn EmailDispatcher>,
    public_url: &str,
    rate_limiter: RateLimiter,
) -> Router {
    let state = AppState {
        auth_service,
        contact_service,
        email_dispatcher,
        public_url: Arc::from(public_url),
        rate_limiter,
    };
    let rate_limit = middleware::from_fn_with_state(state.clone(), limit_per_user);

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh_token", get(refresh_token))
        .route("/api/auth/confirmed_email/:token", get(confirm_email))
        .route("/api/auth/request_email", post(request_email));

    let protected_routes = Router::new()
        .route("/api/users/me", get(get_current_user))
        .route("/api/users/avatar", patch(update_avatar))
        .route(
            "/api/contacts",
            get(list_contacts)
                .route_layer(rate_limit.clone())
                .post(create_contact),
        )
        .route("/api/contacts/search", get(search_contacts))
        .route("/api/contacts/birthdays", get(upcoming_birthdays))
        .route(
            "/api/contacts/:contact_id",
            get(get_contact)
                .route_layer(rate_limit)
                .put(update_contact)
                .delete(delete_contact),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Only the route template is recorded: headers and some paths carry tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                route = route_of(request),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                route = route_of(request),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn route_of(request: &Request<Body>) -> &str {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("unmatched")
}

#[cfg(test)]
mod tests {
    use auth::Authenticator;
    use auth::JwtHandler;
    use auth::TokenLifetimes;
    use axum::http::header;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::contact::service::ContactService;
    use crate::domain::auth::service::AuthService;
    use crate::outbound::cache::InMemorySessionCache;
    use crate::outbound::email::LoggingEmailDispatcher;
    use crate::repositories::InMemoryContactRepository;
    use crate::repositories::InMemoryUserRepository;

    fn router() -> Router {
        let authenticator = Arc::new(Authenticator::new(
            JwtHandler::new(b"router-test-secret-at-least-32-bytes!"),
            TokenLifetimes::default(),
        ));
        let email_dispatcher = Arc::new(LoggingEmailDispatcher::new());
        let cache = Arc::new(InMemorySessionCache::new());

        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            cache.clone(),
            email_dispatcher.clone(),
            authenticator,
            900,
        ));
        let contact_service = Arc::new(ContactService::new(Arc::new(
            InMemoryContactRepository::new(),
        )));

        create_router(
            auth_service,
            contact_service,
            email_dispatcher,
            "http://localhost:8000/",
            RateLimiter::new(cache, 12, 60),
        )
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = router().oneshot(request("GET", "/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer_token() {
        for (method, uri) in [
            ("GET", "/api/users/me"),
            ("PATCH", "/api/users/avatar"),
            ("GET", "/api/contacts"),
            ("GET", "/api/contacts/search"),
            ("GET", "/api/contacts/birthdays"),
            ("DELETE", "/api/contacts/00000000-0000-0000-0000-000000000000"),
        ] {
            let response = router().oneshot(request(method, uri)).await.unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        }
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = router()
            .oneshot(request("GET", "/api/unknown"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
