use common::postgres::PostgresConfig;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// Un-prefixed variables still honored for existing deployments
const LEGACY_REDIS_URL_VAR: &str = "REDIS_URL";
const LEGACY_DB_DSN_VAR: &str = "DB_DSN";

#[derive(Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // Redis configuration
    /// Redis server URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    // PostgreSQL configuration
    /// Full connection string; when set it replaces the discrete fields below
    #[serde(default)]
    pub postgres_dsn: Option<String>,

    /// PostgreSQL host
    #[serde(default = "default_postgres_host")]
    pub postgres_host: String,

    /// PostgreSQL port
    #[serde(default = "default_postgres_port")]
    pub postgres_port: u16,

    /// PostgreSQL database name
    #[serde(default = "default_postgres_database")]
    pub postgres_database: String,

    /// PostgreSQL username
    #[serde(default = "default_postgres_username")]
    pub postgres_username: String,

    /// PostgreSQL password
    #[serde(default = "default_postgres_password")]
    pub postgres_password: String,

    /// Connections opened at startup
    #[serde(default = "default_postgres_min_pool_size")]
    pub postgres_min_pool_size: usize,

    /// Upper bound on open connections
    #[serde(default = "default_postgres_max_pool_size")]
    pub postgres_max_pool_size: usize,

    /// Max wait for a pooled connection in seconds
    #[serde(default = "default_postgres_acquire_timeout_secs")]
    pub postgres_acquire_timeout_secs: u64,

    /// Startup timeout for initialization operations in seconds
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,

    // OpenTelemetry configuration
    /// Export traces and logs over OTLP
    #[serde(default = "default_otel_enabled")]
    pub otel_enabled: bool,

    /// OTLP collector endpoint
    #[serde(default = "default_otel_endpoint")]
    pub otel_endpoint: String,

    /// Service name reported to OpenTelemetry
    #[serde(default = "default_otel_service_name")]
    pub otel_service_name: String,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("log_level", &self.log_level)
            .field("redis_url", &redacted_url(&self.redis_url))
            .field(
                "postgres_dsn",
                &self.postgres_dsn.as_ref().map(|_| "<redacted>"),
            )
            .field("postgres_host", &self.postgres_host)
            .field("postgres_port", &self.postgres_port)
            .field("postgres_database", &self.postgres_database)
            .field("postgres_username", &self.postgres_username)
            .field("postgres_password", &"<redacted>")
            .field("postgres_min_pool_size", &self.postgres_min_pool_size)
            .field("postgres_max_pool_size", &self.postgres_max_pool_size)
            .field(
                "postgres_acquire_timeout_secs",
                &self.postgres_acquire_timeout_secs,
            )
            .field("startup_timeout_secs", &self.startup_timeout_secs)
            .field("otel_enabled", &self.otel_enabled)
            .field("otel_endpoint", &self.otel_endpoint)
            .field("otel_service_name", &self.otel_service_name)
            .finish()
    }
}

/// Drops any `user:password@` part of a URL.
fn redacted_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}<redacted>@{}", &url[..scheme_end + 3], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_postgres_host() -> String {
    "localhost".to_string()
}

fn default_postgres_port() -> u16 {
    5432
}

fn default_postgres_database() -> String {
    "postgres".to_string()
}

fn default_postgres_username() -> String {
    "postgres".to_string()
}

fn default_postgres_password() -> String {
    "postgres".to_string()
}

fn default_postgres_min_pool_size() -> usize {
    2
}

fn default_postgres_max_pool_size() -> usize {
    10
}

fn default_postgres_acquire_timeout_secs() -> u64 {
    10
}

fn default_startup_timeout_secs() -> u64 {
    30
}

fn default_otel_enabled() -> bool {
    false
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_otel_service_name() -> String {
    "pot-relay".to_string()
}

impl ServiceConfig {
    /// Load configuration from `POT_*` environment variables.
    ///
    /// `REDIS_URL` and `DB_DSN` are read as fallbacks when the prefixed
    /// variables are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Ok(url) = std::env::var(LEGACY_REDIS_URL_VAR) {
            builder = builder.set_default("redis_url", url)?;
        }
        if let Ok(dsn) = std::env::var(LEGACY_DB_DSN_VAR) {
            builder = builder.set_default("postgres_dsn", dsn)?;
        }

        builder
            .add_source(Environment::with_prefix("POT"))
            .build()?
            .try_deserialize()
    }

    pub fn postgres_config(&self) -> PostgresConfig {
        PostgresConfig {
            host: self.postgres_host.clone(),
            port: self.postgres_port,
            database: self.postgres_database.clone(),
            username: self.postgres_username.clone(),
            password: self.postgres_password.clone(),
            dsn: self.postgres_dsn.clone().filter(|dsn| !dsn.is_empty()),
            min_pool_size: self.postgres_min_pool_size,
            max_pool_size: self.postgres_max_pool_size,
            acquire_timeout_secs: self.postgres_acquire_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure tests run serially and don't interfere with each other
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "POT_LOG_LEVEL",
        "POT_REDIS_URL",
        "POT_POSTGRES_DSN",
        "POT_POSTGRES_PORT",
        "REDIS_URL",
        "DB_DSN",
    ];

    fn clear_env() {
        for var in VARS {
            // SAFETY: Test runs with mutex lock to prevent concurrent env access
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_default_config() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_env();

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.postgres_dsn, None);
        assert_eq!(config.postgres_port, 5432);
        assert_eq!(config.postgres_min_pool_size, 2);
        assert_eq!(config.postgres_max_pool_size, 10);
        assert!(!config.otel_enabled);
        assert_eq!(config.otel_service_name, "pot-relay");
    }

    #[test]
    fn test_custom_config() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_env();

        // SAFETY: Test runs with mutex lock to prevent concurrent env access
        unsafe {
            std::env::set_var("POT_LOG_LEVEL", "debug");
            std::env::set_var("POT_POSTGRES_PORT", "6543");
        }

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.postgres_port, 6543);

        clear_env();
    }

    #[test]
    fn test_legacy_variables_are_fallbacks() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_env();

        // SAFETY: Test runs with mutex lock to prevent concurrent env access
        unsafe {
            std::env::set_var("REDIS_URL", "redis://cache:6379");
            std::env::set_var("DB_DSN", "postgres://u:p@db/pot");
        }
        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.redis_url, "redis://cache:6379");
        assert_eq!(config.postgres_dsn.as_deref(), Some("postgres://u:p@db/pot"));

        // SAFETY: Test runs with mutex lock to prevent concurrent env access
        unsafe {
            std::env::set_var("POT_REDIS_URL", "redis://preferred:6379");
        }
        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.redis_url, "redis://preferred:6379");

        clear_env();
    }

    #[test]
    fn test_postgres_config_carries_pool_settings() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_env();

        let config = ServiceConfig::from_env().unwrap();
        let pg = config.postgres_config();
        assert_eq!(pg.host, "localhost");
        assert_eq!(pg.min_pool_size, 2);
        assert_eq!(pg.max_pool_size, 10);
        assert_eq!(pg.acquire_timeout_secs, 10);
        assert!(pg.dsn.is_none());
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_env();

        // SAFETY: Test runs with mutex lock to prevent concurrent env access
        unsafe {
            std::env::set_var("POT_REDIS_URL", "redis://:hunter2@cache:6379");
            std::env::set_var("POT_POSTGRES_DSN", "postgres://u:hunter2@db/pot");
        }
        let config = ServiceConfig::from_env().unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("cache:6379"));

        clear_env();
    }
}
