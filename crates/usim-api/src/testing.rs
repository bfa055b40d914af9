//! Test doubles for exercising the API without external services
//!
//! The stub embedder is a pure function of the input text, so the
//! similarity properties of the real pipeline (identical text embeds
//! identically) hold in tests too.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use tokio::sync::RwLock;
use usim_core::{
    AppConfig, Result, ScoredProfile, StoredProfile, UserProfile, UsimError,
};
use usim_vector::{Embedder, ProfileStore, LIST_LIMIT};
use uuid::Uuid;

use crate::state::AppState;

/// Deterministic embedder that folds the text bytes into a small
/// fixed-length vector.
pub struct StubEmbedder {
    dimension: usize,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimension] += f32::from(byte);
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Embedder whose every candidate has failed
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(UsimError::EmbeddingUnavailable(
            "failed to generate embedding with any available model".to_string(),
        ))
    }

    fn dimension(&self) -> usize {
        0
    }
}

/// In-memory profile store with cosine scoring
#[derive(Default)]
pub struct InMemoryStore {
    points: RwLock<HashMap<Uuid, (Vec<f32>, UserProfile)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored points
    pub async fn len(&self) -> usize {
        self.points.read().await.len()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn upsert(&self, id: Uuid, vector: Vec<f32>, profile: &UserProfile) -> Result<()> {
        self.points
            .write()
            .await
            .insert(id, (vector, profile.clone()));
        Ok(())
    }

    async fn find_nearest(&self, vector: Vec<f32>) -> Result<Option<ScoredProfile>> {
        let points = self.points.read().await;

        let best = points
            .iter()
            .map(|(id, (stored, profile))| (*id, cosine(&vector, stored), profile))
            .max_by(|a, b| a.1.total_cmp(&b.1));

        Ok(best.map(|(id, score, profile)| ScoredProfile {
            id,
            profile: profile.clone(),
            score,
        }))
    }

    async fn retrieve(&self, id: Uuid) -> Result<Option<StoredProfile>> {
        Ok(self
            .points
            .read()
            .await
            .get(&id)
            .map(|(_, profile)| StoredProfile {
                id,
                profile: profile.clone(),
            }))
    }

    async fn list(&self) -> Result<Vec<StoredProfile>> {
        Ok(self
            .points
            .read()
            .await
            .iter()
            .take(LIST_LIMIT)
            .map(|(id, (_, profile))| StoredProfile {
                id: *id,
                profile: profile.clone(),
            })
            .collect())
    }
}

/// Router wired to the given collaborators, with default config
pub fn router_with(embedder: Arc<dyn Embedder>, store: Arc<dyn ProfileStore>) -> Router {
    let state = Arc::new(AppState::new(AppConfig::default(), embedder, store));
    crate::create_router(state)
}

/// Router wired to in-memory collaborators
pub fn create_router_for_testing() -> Router {
    router_with(Arc::new(StubEmbedder::new(16)), Arc::new(InMemoryStore::new()))
}
