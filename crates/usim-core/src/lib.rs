//! Usim Core - Domain models, errors, and configuration
//!
//! This crate defines the shared abstractions of the user similarity
//! service:
//! - User profile model and its embedding-text serialization
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{AppConfig, ConfigError, EmbeddingConfig, QdrantConfig, ServerConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for service operations
#[derive(Error, Debug)]
pub enum UsimError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, UsimError>;

// ============================================================================
// Profile Models
// ============================================================================

/// A user profile as submitted by clients.
///
/// Identity is assigned by the service at storage time; the profile
/// itself carries none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    /// Display name
    pub name: String,

    /// Free-form biography
    pub bio: String,

    /// Interests, order preserved
    pub interests: Vec<String>,

    /// Home location
    pub location: String,

    /// Age in years, if known
    pub age: Option<u32>,
}

impl UserProfile {
    /// Serialize the profile into the single descriptive string that is
    /// sent to the embedding model.
    ///
    /// Pure function of the profile fields: identical profiles always
    /// produce byte-identical text, so the store and query paths embed
    /// the same shape of input.
    pub fn embedding_text(&self) -> String {
        let interests = self.interests.join(", ");
        let age = self
            .age
            .map_or_else(|| "Unknown".to_string(), |a| a.to_string());

        format!(
            "Name: {}. Bio: {}. Interests: {}. Location: {}. Age: {}",
            self.name, self.bio, interests, self.location, age
        )
    }
}

/// A profile together with its store-assigned identifier.
///
/// The embedding vector itself stays in the vector store and is never
/// read back by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    pub id: Uuid,
    pub profile: UserProfile,
}

/// A stored profile ranked by cosine similarity to a query vector.
/// Higher scores mean more similar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProfile {
    pub id: Uuid,
    pub profile: UserProfile,
    pub score: f32,
}

// ============================================================================
// Tests
// ============================================================================
