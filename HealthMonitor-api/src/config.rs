//! Application configuration read from the environment.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

use health_monitor_data::database::{DatabaseConfig, DatabaseError};
use health_monitor_data::repository::StoreBackend;

/// Default bind address
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default bind port
pub const DEFAULT_PORT: u16 = 5000;

/// Default number of rows shown on the records page for the durable store
pub const DEFAULT_RECENT_LIMIT: usize = 20;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid bind address
    #[error("Invalid HOST value: {0}")]
    InvalidHost(String),

    /// Unknown store backend
    #[error("Invalid STORE_BACKEND value: {0}")]
    InvalidStoreBackend(String),

    /// Invalid database settings
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Top-level application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to bind to
    pub host: IpAddr,
    /// Port to bind to
    pub port: u16,
    /// Which record store to use
    pub store_backend: StoreBackend,
    /// Rows shown on the records page for the durable store
    pub recent_limit: usize,
    /// Database settings, used when the store backend is the database
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            store_backend: StoreBackend::Database,
            recent_limit: DEFAULT_RECENT_LIMIT,
            database: DatabaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unparseable numbers fall back to their defaults; an unknown store
    /// backend or database type is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = match lookup("HOST") {
            Some(value) => value
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(value.clone()))?,
            None => defaults.host,
        };

        let port = lookup("PORT")
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let store_backend = match lookup("STORE_BACKEND") {
            Some(value) => value
                .parse::<StoreBackend>()
                .map_err(ConfigError::InvalidStoreBackend)?,
            None => defaults.store_backend,
        };

        let recent_limit = lookup("RECENT_LIMIT")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(defaults.recent_limit);

        let database = DatabaseConfig::from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            store_backend,
            recent_limit,
            database,
        })
    }

    /// Socket address to listen on
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
