use anyhow::Context;
use serde::Deserialize;

/// Argon2 work factor.
#[derive(Debug, Clone, Deserialize)]
pub struct HasherConfig {
    pub memory_kib: u32,     // m_cost
    pub iterations: u32,     // t_cost
    pub parallelism: u32,    // p_cost
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub app_host: String,
    pub app_port: u16,
    pub hasher: HasherConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let defaults = HasherConfig::default();
        let hasher = HasherConfig {
            memory_kib: env_or("HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env_or("HASH_ITERATIONS", defaults.iterations)?,
            parallelism: env_or("HASH_PARALLELISM", defaults.parallelism)?,
        };
        Ok(Self {
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT_SECS", 5)?,
            app_host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            app_port: env_or("APP_PORT", 5000)?,
            hasher,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.app_host, self.app_port)
    }
}

/// Reads and parses `key`, falling back to `default` when unset.
/// A set but unparsable value is an error rather than a silent default.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
