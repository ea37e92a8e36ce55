//! Database connection module for the HealthMonitor application
//!
//! This module provides pooled database connectivity with support for:
//! - SQLite (default)
//! - PostgreSQL (optional, `postgres` feature)
//!
//! A pool is created once at startup and handed to the repository that owns
//! it. Connections are checked out per operation and returned to the pool when
//! the guard drops, including on error paths.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use super::migrations;

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// SQLite database (file-based)
    Sqlite,
    /// PostgreSQL database
    #[cfg(feature = "postgres")]
    PostgreSQL,
}

impl DatabaseType {
    /// Short lowercase name used in logs and health reports
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Sqlite => "sqlite",
            #[cfg(feature = "postgres")]
            DatabaseType::PostgreSQL => "postgres",
        }
    }
}

impl FromStr for DatabaseType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(DatabaseType::Sqlite),
            #[cfg(feature = "postgres")]
            "postgresql" | "postgres" => Ok(DatabaseType::PostgreSQL),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database connection pool enum for different database types
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    #[cfg(feature = "sqlite")]
    SQLite(Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>),

    /// PostgreSQL connection pool
    #[cfg(feature = "postgres")]
    PostgreSQL(Arc<deadpool_postgres::Pool>),
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// r2d2 connection pool error
    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    /// PostgreSQL error
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    PostgresError(#[from] tokio_postgres::Error),

    /// PostgreSQL pool error
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL pool error: {0}")]
    PostgresPoolError(String),

    /// Unsupported database type
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Database configuration
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Database type (sqlite, postgres)
    pub db_type: DatabaseType,
    /// Path to SQLite database file
    pub sqlite_path: Option<String>,
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL database name
    pub name: String,
    /// PostgreSQL user
    pub user: String,
    /// PostgreSQL password
    pub password: String,
    /// Maximum number of pooled connections
    pub pool_size: u32,
    /// Connection checkout timeout in seconds
    pub timeout_seconds: u64,
}

/// Default SQLite database location
pub const DEFAULT_SQLITE_PATH: &str = "data/health_monitor.db";

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            sqlite_path: Some(DEFAULT_SQLITE_PATH.to_string()),
            host: "localhost".to_string(),
            name: "healthdb".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            pool_size: 10,
            timeout_seconds: 30,
        }
    }
}

// The password never reaches the logs
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("db_type", &self.db_type)
            .field("sqlite_path", &self.sqlite_path)
            .field("host", &self.host)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .field("pool_size", &self.pool_size)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup, falling back to
    /// defaults for anything missing or unparseable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DatabaseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let db_type = match lookup("DB_TYPE") {
            Some(value) => value.parse::<DatabaseType>()?,
            None => defaults.db_type,
        };

        let sqlite_path = lookup("DB_SQLITE_PATH").or(defaults.sqlite_path);

        let host = lookup("DB_HOST").unwrap_or(defaults.host);
        let name = lookup("DB_NAME").unwrap_or(defaults.name);
        let user = lookup("DB_USER").unwrap_or(defaults.user);
        let password = lookup("DB_PASSWORD").unwrap_or(defaults.password);

        let pool_size = lookup("DB_POOL_SIZE")
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(defaults.pool_size);

        let timeout_seconds = lookup("DB_TIMEOUT_SECONDS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_seconds);

        match db_type {
            DatabaseType::Sqlite => {
                info!("Using SQLite database at: {}", sqlite_path.as_deref().unwrap_or(DEFAULT_SQLITE_PATH));
            },
            #[cfg(feature = "postgres")]
            DatabaseType::PostgreSQL => {
                info!("Using PostgreSQL database {} on {} as {}", name, host, user);
            },
        }

        info!("Database configuration: pool_size={}, timeout={}s", pool_size, timeout_seconds);

        Ok(DatabaseConfig {
            db_type,
            sqlite_path,
            host,
            name,
            user,
            password,
            pool_size,
            timeout_seconds,
        })
    }
}

impl DatabasePool {
    /// Create the pool described by `config` and run migrations on it
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        info!("Initializing database pool with type: {}", config.db_type);

        let pool = match config.db_type {
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => initialize_sqlite_pool(config)?,
            #[cfg(not(feature = "sqlite"))]
            DatabaseType::Sqlite => {
                return Err(DatabaseError::UnsupportedDatabaseType("sqlite".to_string()));
            },
            #[cfg(feature = "postgres")]
            DatabaseType::PostgreSQL => initialize_postgres_pool(config)?,
        };

        pool.run_migrations().await?;
        Ok(pool)
    }

    /// Name of the backing engine
    pub fn backend_name(&self) -> &'static str {
        match self {
            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            DatabasePool::PostgreSQL(_) => "postgres",
        }
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        info!("Running database migrations");

        match self {
            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                migrations::run_sqlite_migrations(&conn)
                    .map_err(DatabaseError::MigrationError)?;
            },
            #[cfg(feature = "postgres")]
            DatabasePool::PostgreSQL(pool) => {
                let client = pool.get().await
                    .map_err(|e| DatabaseError::PostgresPoolError(e.to_string()))?;
                migrations::run_postgres_migrations(&client).await
                    .map_err(DatabaseError::MigrationError)?;
            },
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Probe the database with a trivial query and describe the connection
    pub async fn connection_info(&self) -> Result<String, DatabaseError> {
        match self {
            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let path: String = conn.query_row("PRAGMA database_list", [], |row| row.get(2))?;
                let state = pool.state();
                Ok(format!(
                    "SQLite database at {} (connections: active={}, idle={})",
                    path, state.connections, state.idle_connections
                ))
            },
            #[cfg(feature = "postgres")]
            DatabasePool::PostgreSQL(pool) => {
                let client = pool.get().await
                    .map_err(|e| DatabaseError::PostgresPoolError(e.to_string()))?;
                let row = client.query_one("SELECT version()", &[]).await?;
                let version: String = row.get(0);
                let status = pool.status();
                Ok(format!(
                    "{} (size={}, available={})",
                    version, status.size, status.available
                ))
            },
        }
    }
}

/// Initialize SQLite connection pool
#[cfg(feature = "sqlite")]
fn initialize_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use rusqlite::OpenFlags;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    let sqlite_path = config.sqlite_path.clone()
        .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());

    info!("Initializing SQLite database at: {}", sqlite_path);

    // Create parent directory if it doesn't exist
    if let Some(parent) = Path::new(&sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            fs::create_dir_all(parent).map_err(|e| {
                error!("Failed to create directory {:?}: {}", parent, e);
                DatabaseError::ConfigError(format!("Cannot create directory {:?}: {}", parent, e))
            })?;
        }
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(&sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
        .with_init(|conn| conn.execute_batch("PRAGMA busy_timeout = 5000;"));

    let pool = r2d2::Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)
        .map_err(|e| {
            error!("Failed to create SQLite connection pool: {}", e);
            DatabaseError::PoolError(e)
        })?;

    info!("SQLite connection pool created successfully");
    Ok(DatabasePool::SQLite(Arc::new(pool)))
}

/// Initialize PostgreSQL connection pool
#[cfg(feature = "postgres")]
fn initialize_postgres_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use deadpool_postgres::{Config, ManagerConfig, PoolConfig, RecyclingMethod, Runtime, Timeouts};
    use std::time::Duration;

    let mut pool_config = Config::new();
    pool_config.host = Some(config.host.clone());
    pool_config.dbname = Some(config.name.clone());
    pool_config.user = Some(config.user.clone());
    pool_config.password = Some(config.password.clone());
    pool_config.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    pool_config.pool = Some(PoolConfig {
        max_size: config.pool_size as usize,
        timeouts: Timeouts {
            wait: Some(Duration::from_secs(config.timeout_seconds)),
            ..Default::default()
        },
        ..Default::default()
    });

    let pool = pool_config.create_pool(Some(Runtime::Tokio1), tokio_postgres::NoTls)
        .map_err(|e| DatabaseError::PostgresPoolError(format!("Failed to create PostgreSQL pool: {}", e)))?;

    info!("PostgreSQL connection pool created for {}@{}/{}", config.user, config.host, config.name);
    Ok(DatabasePool::PostgreSQL(Arc::new(pool)))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.db_type, DatabaseType::Sqlite);
        assert_eq!(config.sqlite_path.as_deref(), Some(DEFAULT_SQLITE_PATH));
        assert_eq!(config.host, "localhost");
        assert_eq!(config.name, "healthdb");
        assert_eq!(config.user, "postgres");
        assert_eq!(config.password, "postgres");
        assert_eq!(config.pool_size, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_database_type_from_str() {
        assert_eq!("sqlite".parse::<DatabaseType>().unwrap(), DatabaseType::Sqlite);
        assert_eq!("SQLite".parse::<DatabaseType>().unwrap(), DatabaseType::Sqlite);

        #[cfg(feature = "postgres")]
        assert_eq!("postgres".parse::<DatabaseType>().unwrap(), DatabaseType::PostgreSQL);

        assert!("unknown".parse::<DatabaseType>().is_err());
    }

    #[test]
    fn test_config_from_lookup_overrides_defaults() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_NAME", "vitals"),
            ("DB_USER", "nurse"),
            ("DB_PASSWORD", "secret"),
            ("DB_POOL_SIZE", "3"),
            ("DB_SQLITE_PATH", "/tmp/vitals.db"),
        ])).unwrap();

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.name, "vitals");
        assert_eq!(config.user, "nurse");
        assert_eq!(config.password, "secret");
        assert_eq!(config.pool_size, 3);
        assert_eq!(config.sqlite_path.as_deref(), Some("/tmp/vitals.db"));
    }

    #[test]
    fn test_config_from_lookup_ignores_bad_numbers() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("DB_POOL_SIZE", "lots"),
            ("DB_TIMEOUT_SECONDS", "-1"),
        ])).unwrap();

        assert_eq!(config.pool_size, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_config_from_lookup_rejects_unknown_type() {
        let result = DatabaseConfig::from_lookup(lookup_from(&[("DB_TYPE", "oracle")]));
        assert!(matches!(result, Err(DatabaseError::UnsupportedDatabaseType(_))));
    }

    #[test]
    fn test_debug_output_hides_password() {
        let config = DatabaseConfig {
            password: "hunter2".to_string(),
            ..DatabaseConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_sqlite_pool_connects_and_migrates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vitals.db");
        let config = DatabaseConfig {
            sqlite_path: Some(path.to_string_lossy().to_string()),
            ..DatabaseConfig::default()
        };

        let pool = DatabasePool::connect(&config).await.unwrap();
        assert_eq!(pool.backend_name(), "sqlite");
        assert!(path.exists());

        let info = pool.connection_info().await.unwrap();
        assert!(info.starts_with("SQLite database at"));
    }
}
