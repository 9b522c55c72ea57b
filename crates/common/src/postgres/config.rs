use crate::domain::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// PostgreSQL configuration
///
/// When `dsn` is set it wins over the discrete connection fields.
#[derive(Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub dsn: Option<String>,
    /// Connections opened at startup and kept in the pool
    pub min_pool_size: usize,
    pub max_pool_size: usize,
    /// Upper bound on waiting for (or creating) a pooled connection
    pub acquire_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            username: "postgres".to_string(),
            password: "postgres".to_string(),
            dsn: None,
            min_pool_size: 2,
            max_pool_size: 10,
            acquire_timeout_secs: 10,
        }
    }
}

impl PostgresConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Checks the pool bounds
    pub fn validate(&self) -> DomainResult<()> {
        if self.max_pool_size == 0 {
            return Err(DomainError::InvalidConfig(
                "max_pool_size must be at least 1".to_string(),
            ));
        }
        if self.min_pool_size > self.max_pool_size {
            return Err(DomainError::InvalidConfig(format!(
                "min_pool_size ({}) exceeds max_pool_size ({})",
                self.min_pool_size, self.max_pool_size
            )));
        }
        if self.acquire_timeout_secs == 0 {
            return Err(DomainError::InvalidConfig(
                "acquire_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// Keeps the password and DSN out of startup logs.
impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("dsn", &self.dsn.as_ref().map(|_| "<redacted>"))
            .field("min_pool_size", &self.min_pool_size)
            .field("max_pool_size", &self.max_pool_size)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_bounds() {
        let config = PostgresConfig::default();
        assert_eq!(config.min_pool_size, 2);
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.acquire_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_min_above_max() {
        let config = PostgresConfig {
            min_pool_size: 11,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DomainError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let config = PostgresConfig {
            min_pool_size: 0,
            max_pool_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = PostgresConfig {
            password: "hunter2".to_string(),
            dsn: Some("postgresql://postgres:hunter2@db:5432/postgres".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
