use crate::ImageStore;
use std::env;
use std::sync::Arc;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_SECRET_KEY: &str = "secret-dev";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),
}

/// Process settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Reserved for signing; nothing reads it yet.
    pub secret_key: String,
    pub port: u16,
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    ///
    /// `DATABASE_URL` wins when set; otherwise the database is picked by
    /// `PIXLY_ENV` (`test` selects the test database).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            if lookup("PIXLY_ENV").as_deref() == Some("test") {
                "postgresql:///pixly_test".to_string()
            } else {
                "postgresql:///pixly".to_string()
            }
        });

        Ok(Self {
            secret_key: lookup("SECRET_KEY").unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string()),
            port,
            database_url,
        })
    }
}

pub struct ServerConfig {
    pub port: u16,
    /// Mount point of the image collection, e.g. `/images`.
    pub path: String,
    pub store: Arc<dyn ImageStore>,
}
