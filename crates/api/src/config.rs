use std::time::Duration;

use audiosrv_db::PoolConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have sensible defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// Deployment environment reported by the health check (default: `development`).
    pub environment: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub database: DatabaseConfig,
}

/// Connection settings for the backing PostgreSQL instance.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Pool size upper bound (default: `25`).
    pub max_connections: u32,
    /// Idle connection lifetime in seconds (default: `900`).
    pub max_idle_time_secs: u64,
    /// Per-operation repository timeout in seconds (default: `3`).
    pub query_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.max_connections,
            max_idle_time: Duration::from_secs(self.max_idle_time_secs),
            ..PoolConfig::default()
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

/// Read `key` and parse it, falling back to `default` when unset.
///
/// Panics on a value that does not parse: misconfiguration should fail fast
/// at startup.
fn env_or<T: std::str::FromStr>(key: &str, default: &str) -> T {
    std::env::var(key)
        .unwrap_or_else(|_| default.into())
        .parse()
        .unwrap_or_else(|_| panic!("{key} must be a valid {}", std::any::type_name::<T>()))
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `4000`                     |
    /// | `APP_ENV`               | `development`              |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`          | (required)                 |
    /// | `DB_MAX_CONNECTIONS`    | `25`                       |
    /// | `DB_MAX_IDLE_TIME_SECS` | `900`                      |
    /// | `DB_QUERY_TIMEOUT_SECS` | `3`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            max_connections: env_or("DB_MAX_CONNECTIONS", "25"),
            max_idle_time_secs: env_or("DB_MAX_IDLE_TIME_SECS", "900"),
            query_timeout_secs: env_or("DB_QUERY_TIMEOUT_SECS", "3"),
        };

        Self {
            host,
            port: env_or("PORT", "4000"),
            environment,
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", "30"),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", "30"),
            database,
        }
    }
}
