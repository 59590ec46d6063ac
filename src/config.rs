//! Process configuration, read once at start-up.
//!
//! Values come from the environment after an optional `.env` file has been
//! loaded with `dotenvy`.

use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("Unreadable .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Longest accepted login token lifetime, one year
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// sea-orm connection URL
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// HS256 secret for login tokens
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub db_max_connections: u32,
    /// Create the accounts table on start-up when it does not exist
    pub db_sync_schema: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_file(dotenvy::dotenv())?;
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let jwt_expiration_hours: i64 = parse_or(&lookup, "JWT_EXPIRATION_HOURS", 24)?;
        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&jwt_expiration_hours) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION_HOURS",
                value: jwt_expiration_hours.to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_hours,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            db_sync_schema: parse_or(&lookup, "DB_SYNC_SCHEMA", true)?,
        })
    }
}

// The process environment may carry everything, so only a file that exists
// but cannot be read or parsed is an error.
fn load_env_file<T>(result: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
