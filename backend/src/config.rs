//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. An optional env file is layered underneath the
//! process environment.

use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Env file read when `EXPENSE_ENV_FILE` is not set
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `STORAGE_BACKEND` names a backend that does not exist
    #[error("unknown storage backend '{0}' (expected sqlite, memory or document)")]
    UnknownBackend(String),

    /// The env file exists but could not be read or parsed
    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        /// File that was being loaded
        path: String,
        /// Underlying dotenv failure
        #[source]
        source: dotenv::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Which repository implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// SQLite database file
    #[default]
    Sqlite,
    /// Process memory, lost on exit
    Memory,
    /// JSON document collection file
    Document,
}

impl StorageBackend {
    /// Name as accepted by `STORAGE_BACKEND`
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Memory => "memory",
            StorageBackend::Document => "document",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            "document" => Ok(StorageBackend::Document),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Selected backend
    pub backend: StorageBackend,
    /// SQLite database path
    pub db_path: String,
    /// Document collection file path
    pub document_path: String,
}

impl Config {
    /// Load the env file (if present) and then read the environment
    ///
    /// With `None`, the file named by `EXPENSE_ENV_FILE` is used, falling back
    /// to [`DEFAULT_ENV_FILE`]. Variables already set in the process
    /// environment win over the file.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match env_file {
            Some(path) => path.to_path_buf(),
            None => env::var("EXPENSE_ENV_FILE")
                .unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string())
                .into(),
        };

        match dotenv::from_path(&path) {
            Ok(()) => tracing::debug!("Loaded env file {}", path.display()),
            Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No env file at {}, using environment only", path.display())
            }
            Err(source) => {
                return Err(ConfigError::EnvFile {
                    path: path.display().to_string(),
                    source,
                })
            }
        }

        Self::from_env()
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::default(),
        };

        Ok(Self {
            server: ServerConfig {
                port: env::var("LOCAL_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("LOCAL_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            storage: StorageConfig {
                backend,
                db_path: env::var("DB_PATH").unwrap_or_else(|_| "expense-tracker.db".to_string()),
                document_path: env::var("DOCUMENT_PATH")
                    .unwrap_or_else(|_| "expenses.json".to_string()),
            },
        })
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
