//! Configuration management
//!
//! Handles configuration from environment variables and config files
//! with sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Vector store connection
    pub qdrant: QdrantConfig,

    /// Embedding endpoint configuration
    pub embedding: EmbeddingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // CORS origins from environment variable (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Qdrant
        if let Ok(host) = std::env::var("QDRANT_HOST") {
            config.qdrant.host = host;
        }
        if let Ok(port) = std::env::var("QDRANT_PORT") {
            config.qdrant.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "QDRANT_PORT".to_string(),
                value: port,
            })?;
        }

        // Embedding endpoint
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            config.embedding.ollama_host = host;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS; empty disables cross-origin access
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            // Empty by default - set via CORS_ORIGINS env var
            cors_origins: vec![],
        }
    }
}

/// Vector store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// Qdrant host
    pub host: String,

    /// Qdrant port
    pub port: u16,

    /// Collection holding the profile points
    pub collection: String,

    /// Vector dimension (must match the embedding model)
    pub dimension: usize,
}

impl QdrantConfig {
    /// Connection URL for the Qdrant client
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            host: "qdrant".to_string(),
            port: 6333,
            collection: "users1".to_string(),
            dimension: 768,
        }
    }
}

/// Embedding endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Ollama host; the port is fixed at 11434
    pub ollama_host: String,

    /// Candidate models, tried in preference order
    pub models: Vec<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    /// Base URL of the Ollama server
    pub fn ollama_url(&self) -> String {
        format!("http://{}:11434", self.ollama_host)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            ollama_host: "localhost".to_string(),
            models: vec!["nomic-embed-text".to_string()],
            timeout_secs: 30,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
