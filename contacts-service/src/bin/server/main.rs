use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use contacts_service::config::Config;
use contacts_service::config::StorageBackend;
use contacts_service::contact::ports::ContactRepository;
use contacts_service::contact::service::ContactService;
use contacts_service::domain::auth::ports::EmailDispatcher;
use contacts_service::domain::auth::ports::RequestCounter;
use contacts_service::domain::auth::ports::SessionCache;
use contacts_service::domain::auth::service::AuthService;
use contacts_service::inbound::http::rate_limit::RateLimiter;
use contacts_service::inbound::http::router::create_router;
use contacts_service::outbound::cache::InMemorySessionCache;
use contacts_service::outbound::cache::RedisSessionCache;
use contacts_service::outbound::email::HttpEmailDispatcher;
use contacts_service::outbound::email::LoggingEmailDispatcher;
use contacts_service::repositories::InMemoryContactRepository;
use contacts_service::repositories::InMemoryUserRepository;
use contacts_service::repositories::PostgresContactRepository;
use contacts_service::repositories::PostgresUserRepository;
use contacts_service::user::ports::UserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contacts_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "contacts-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage = ?config.storage,
        redis_enabled = config.redis.enabled,
        email_enabled = config.email.enabled,
        rate_limit = config.rate_limit.max_requests,
        "Configuration loaded"
    );

    let jwt_handler = JwtHandler::from_config(&config.jwt.secret, &config.jwt.algorithm)?;
    let authenticator = Arc::new(Authenticator::new(
        jwt_handler,
        config.jwt.token_lifetimes(),
    ));

    let (session_cache, request_counter) = if config.redis.enabled {
        let cache = Arc::new(RedisSessionCache::connect(&config.redis.url()).await?);
        tracing::info!(
            host = %config.redis.host,
            port = config.redis.port,
            "Redis session cache connected"
        );
        shared_cache(cache)
    } else {
        tracing::info!("Using in-memory session cache");
        shared_cache(Arc::new(InMemorySessionCache::new()))
    };
    let rate_limiter = RateLimiter::new(
        request_counter,
        config.rate_limit.max_requests,
        config.rate_limit.window_seconds,
    );

    let email_dispatcher: Arc<dyn EmailDispatcher> = if config.email.enabled {
        Arc::new(HttpEmailDispatcher::new(
            reqwest::Client::new(),
            config.email.api_url.clone(),
            config.email.api_token.clone(),
            config.email.sender.clone(),
        ))
    } else {
        tracing::warn!("Email delivery disabled, confirmation links are only logged");
        Arc::new(LoggingEmailDispatcher::new())
    };

    let application = match config.storage {
        StorageBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            build_router(
                &config,
                Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                Arc::new(PostgresContactRepository::new(pg_pool)),
                session_cache,
                email_dispatcher,
                authenticator,
                rate_limiter,
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            build_router(
                &config,
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryContactRepository::new()),
                session_cache,
                email_dispatcher,
                authenticator,
                rate_limiter,
            )
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, application).await?;

    tracing::info!("Server exited");

    Ok(())
}

/// One cache backend serving both sessions and request counters.
fn shared_cache<C>(cache: Arc<C>) -> (Arc<dyn SessionCache>, Arc<dyn RequestCounter>)
where
    C: SessionCache + RequestCounter,
{
    (cache.clone(), cache)
}

fn build_router<UR, CR>(
    config: &Config,
    user_repository: Arc<UR>,
    contact_repository: Arc<CR>,
    session_cache: Arc<dyn SessionCache>,
    email_dispatcher: Arc<dyn EmailDispatcher>,
    authenticator: Arc<Authenticator>,
    rate_limiter: RateLimiter,
) -> axum::Router
where
    UR: UserRepository,
    CR: ContactRepository,
{
    let auth_service = Arc::new(AuthService::new(
        user_repository,
        session_cache,
        Arc::clone(&email_dispatcher),
        authenticator,
        config.redis.user_ttl_seconds,
    ));
    let contact_service = Arc::new(ContactService::new(contact_repository));

    create_router(
        auth_service,
        contact_service,
        email_dispatcher,
        &config.server.public_url,
        rate_limiter,
    )
}
