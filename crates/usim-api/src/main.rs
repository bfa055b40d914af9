//! Usim API Server
//!
//! REST server for user profile similarity search.

use std::sync::Arc;

use usim_api::{create_router, state::AppState};
use usim_core::AppConfig;
use usim_vector::{OllamaEmbedder, QdrantProfileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "usim_api=debug,tower_http=debug".into()),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Collection bootstrap must succeed before we accept traffic.
    let store = QdrantProfileStore::new(&config.qdrant)?;
    store.init_collection().await?;

    let embedder = OllamaEmbedder::from_config(&config.embedding, config.qdrant.dimension)?;

    // Create application state
    let state = Arc::new(AppState::new(
        config,
        Arc::new(embedder),
        Arc::new(store),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("user similarity API starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
