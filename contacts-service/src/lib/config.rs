use std::env;

use auth::TokenLifetimes;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageBackend,
    pub jwt: JwtConfig,
    pub redis: RedisConfig,
    pub email: EmailConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Base URL placed in front of confirmation links, with a trailing slash.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Where users and contacts are persisted.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_seconds: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_seconds: i64,
    #[serde(default = "default_email_ttl")]
    pub email_token_ttl_seconds: i64,
}

impl JwtConfig {
    pub fn token_lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes::from_seconds(
            self.access_token_ttl_seconds,
            self.refresh_token_ttl_seconds,
            self.email_token_ttl_seconds,
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    #[serde(default)]
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    #[serde(default = "default_user_ttl")]
    pub user_ttl_seconds: u64,
}

impl RedisConfig {
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,
    pub api_url: String,
    #[serde(default)]
    pub api_token: String,
    pub sender: String,
}

/// Fixed-window limit applied per user to the contact read routes.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u64,
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
        }
    }
}

fn default_public_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_ttl() -> i64 {
    15 * 60
}

fn default_refresh_ttl() -> i64 {
    7 * 24 * 60 * 60
}

fn default_email_ttl() -> i64 {
    7 * 24 * 60 * 60
}

fn default_user_ttl() -> u64 {
    15 * 60
}

fn default_max_requests() -> u64 {
    12
}

fn default_window_seconds() -> u64 {
    60
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, REDIS__HOST, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        if config.jwt.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_are_applied() {
        let config = parse(
            r#"
            [server]
            http_port = 8000

            [database]
            url = "postgres://localhost/contacts"

            [jwt]
            secret = "secret"

            [redis]
            host = "localhost"
            port = 6379

            [email]
            api_url = "https://api.postmarkapp.com/email"
            sender = "noreply@example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.server.public_url, "http://localhost:8000/");
        assert_eq!(config.jwt.algorithm, "HS256");
        assert_eq!(config.jwt.token_lifetimes(), TokenLifetimes::default());
        assert_eq!(config.redis.user_ttl_seconds, 900);
        assert!(!config.redis.enabled);
        assert!(!config.email.enabled);
        assert_eq!(config.redis.url(), "redis://localhost:6379/");
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert_eq!(config.rate_limit.max_requests, 12);
        assert_eq!(config.rate_limit.window_seconds, 60);
    }

    #[test]
    fn test_memory_storage() {
        let config = parse(
            r#"
            storage = "memory"

            [server]
            http_port = 8000

            [database]
            url = ""

            [jwt]
            secret = "secret"
            access_token_ttl_seconds = 60

            [redis]
            host = "localhost"
            port = 6379

            [email]
            api_url = ""
            sender = ""

            [rate_limit]
            max_requests = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.jwt.token_lifetimes().access.num_seconds(), 60);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_seconds, 60);
    }
}
