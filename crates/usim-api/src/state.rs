//! Application state management

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use usim_core::AppConfig;
use usim_vector::{Embedder, ProfileStore};

/// Application state shared across handlers
///
/// Built once at startup; the embedder and store are injected so tests
/// can swap in local doubles.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Embedding client
    pub embedder: Arc<dyn Embedder>,
    /// Profile vector store
    pub store: Arc<dyn ProfileStore>,
    /// Server start time
    start_time: Instant,
    /// Request counter
    request_count: AtomicU64,
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: AppConfig,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            config,
            embedder,
            store,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
