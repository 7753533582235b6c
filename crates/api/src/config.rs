use novaai_tutor::TutorConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// SQLite URL (default: `sqlite://novaai.db`).
    pub database_url: String,
    /// Minimum password length at registration (default: `8`).
    pub password_min_length: usize,
    pub session: SessionConfig,
    pub tutor: TutorConfig,
}

/// Session lifetime and cleanup.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Hours a session stays valid after login (default: `168`, one week).
    pub ttl_hours: i64,
    /// How often expired and revoked sessions are purged (default: `3600`).
    pub sweep_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3001`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `10`                    |
    /// | `DATABASE_URL`                | `sqlite://novaai.db`    |
    /// | `PASSWORD_MIN_LENGTH`         | `8`                     |
    /// | `SESSION_TTL_HOURS`           | `168`                   |
    /// | `SESSION_SWEEP_INTERVAL_SECS` | `3600`                  |
    ///
    /// Tutor variables are documented on [`TutorConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://novaai.db".into());

        Self {
            host,
            port: env_or("PORT", 3001),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 10),
            database_url,
            password_min_length: env_or("PASSWORD_MIN_LENGTH", 8),
            session: SessionConfig {
                ttl_hours: env_or("SESSION_TTL_HOURS", 168),
                sweep_interval_secs: env_or("SESSION_SWEEP_INTERVAL_SECS", 3600),
            },
            tutor: TutorConfig::from_env(),
        }
    }
}

/// Parse `key` or fall back to `default`. Panics on a malformed value so
/// misconfiguration fails at startup.
fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
