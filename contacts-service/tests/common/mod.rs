use std::sync::Arc;
use std::sync::Mutex;

use auth::Authenticator;
use auth::Claims;
use auth::JwtHandler;
use auth::TokenLifetimes;
use auth::TokenScope;
use chrono::Duration;
use chrono::Utc;
use contacts_service::contact::service::ContactService;
use contacts_service::domain::auth::models::ConfirmationEmail;
use contacts_service::domain::auth::ports::EmailDispatcher;
use contacts_service::domain::auth::service::AuthService;
use contacts_service::inbound::http::rate_limit::RateLimiter;
use contacts_service::inbound::http::router::create_router;
use contacts_service::outbound::cache::InMemorySessionCache;
use contacts_service::repositories::InMemoryContactRepository;
use contacts_service::repositories::InMemoryUserRepository;
use serde_json::json;
use serde_json::Value;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PUBLIC_URL: &str = "http://contacts.test/";
pub const PASSWORD: &str = "pass_word!";
pub const RATE_LIMIT: u64 = 12;

/// Dispatcher that keeps every confirmation email for inspection.
#[derive(Default)]
pub struct RecordingEmailDispatcher {
    sent: Mutex<Vec<ConfirmationEmail>>,
}

impl RecordingEmailDispatcher {
    pub fn sent(&self) -> Vec<ConfirmationEmail> {
        self.sent.lock().expect("Dispatcher lock poisoned").clone()
    }

    /// Token from the most recent email sent to `recipient`.
    pub fn last_token_for(&self, recipient: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|email| email.recipient == recipient)
            .map(|email| email.token)
    }
}

impl EmailDispatcher for RecordingEmailDispatcher {
    fn send_confirmation(&self, email: ConfirmationEmail) {
        self.sent
            .lock()
            .expect("Dispatcher lock poisoned")
            .push(email);
    }
}

/// Test application that spawns a real server backed by in-memory adapters
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub emails: Arc<RecordingEmailDispatcher>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let emails = Arc::new(RecordingEmailDispatcher::default());
        let cache = Arc::new(InMemorySessionCache::new());
        let authenticator = Arc::new(Authenticator::new(
            JwtHandler::new(TEST_SECRET),
            TokenLifetimes::default(),
        ));

        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            cache.clone(),
            emails.clone(),
            authenticator,
            900,
        ));
        let contact_service = Arc::new(ContactService::new(Arc::new(
            InMemoryContactRepository::new(),
        )));

        let router = create_router(
            auth_service,
            contact_service,
            emails.clone(),
            PUBLIC_URL,
            RateLimiter::new(cache, RATE_LIMIT, 60),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(TEST_SECRET),
            emails,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    pub async fn signup(&self, username: &str, email: &str) -> reqwest::Response {
        self.post("/api/auth/signup")
            .json(&json!({
                "username": username,
                "email": email,
                "password": PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn confirm(&self, email: &str) -> reqwest::Response {
        let token = self
            .emails
            .last_token_for(email)
            .expect("No confirmation email recorded");

        self.get(&format!("/api/auth/confirmed_email/{}", token))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Sign up, confirm and log in, returning `(access_token, refresh_token)`.
    pub async fn register_and_login(&self, username: &str, email: &str) -> (String, String) {
        assert_eq!(self.signup(username, email).await.status(), 201);
        assert_eq!(self.confirm(email).await.status(), 200);

        let body: Value = self
            .login(email, PASSWORD)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        (
            body["data"]["access_token"]
                .as_str()
                .expect("Missing access token")
                .to_string(),
            body["data"]["refresh_token"]
                .as_str()
                .expect("Missing refresh token")
                .to_string(),
        )
    }

    /// Sign a token for `subject` that expired an hour ago.
    pub fn expired_token(&self, subject: &str, scope: TokenScope) -> String {
        let issued_at = Utc::now() - Duration::hours(2);
        let claims = Claims::issue(subject, Some(scope), Duration::hours(1), issued_at);
        self.jwt_handler
            .encode(&claims)
            .expect("Failed to encode token")
    }
}

/// A valid contact payload.
pub fn contact_body(first_name: &str, last_name: &str, email: &str, birthday: &str) -> Value {
    json!({
        "first_name": first_name,
        "last_name": last_name,
        "email": email,
        "phone": "+15550100",
        "birthday": birthday,
        "additional_info": "met at a conference"
    })
}
