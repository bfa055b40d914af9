//! Usim Vector - External collaborators
//!
//! Thin adapters over the two services that do the actual work:
//! the Ollama embedding endpoint and the Qdrant vector store.

use async_trait::async_trait;
use usim_core::{Result, ScoredProfile, StoredProfile, UserProfile};
use uuid::Uuid;

/// Maximum number of profiles returned by a list operation.
pub const LIST_LIMIT: usize = 100;

/// Trait for embedding generation
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get embedding dimension
    fn dimension(&self) -> usize;
}

/// Trait for profile vector store operations
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert or replace the point for `id`. Last write wins.
    async fn upsert(&self, id: Uuid, vector: Vec<f32>, profile: &UserProfile) -> Result<()>;

    /// Return the single closest profile by cosine similarity, or
    /// `None` when the collection is empty.
    async fn find_nearest(&self, vector: Vec<f32>) -> Result<Option<ScoredProfile>>;

    /// Return the profile stored under `id`, or `None` if absent.
    async fn retrieve(&self, id: Uuid) -> Result<Option<StoredProfile>>;

    /// Return up to [`LIST_LIMIT`] profiles, in no particular order.
    async fn list(&self) -> Result<Vec<StoredProfile>>;
}

pub mod embedding;
pub mod qdrant_store;

pub use embedding::OllamaEmbedder;
pub use qdrant_store::QdrantProfileStore;
