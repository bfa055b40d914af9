//! Embedding client for generating vector representations
//!
//! Talks to an Ollama-compatible embedding API, falling through a
//! fixed list of candidate models.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use usim_core::{EmbeddingConfig, Result, UsimError};

use crate::Embedder;

/// Ollama embedding API client
pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    models: Vec<String>,
    dimension: usize,
}

#[derive(Debug, Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Option<Vec<f32>>,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedding client
    pub fn new(
        base_url: impl Into<String>,
        models: Vec<String>,
        timeout: Duration,
        dimension: usize,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UsimError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            models,
            dimension,
        })
    }

    /// Create from config
    pub fn from_config(config: &EmbeddingConfig, dimension: usize) -> Result<Self> {
        Self::new(
            config.ollama_url(),
            config.models.clone(),
            Duration::from_secs(config.timeout_secs),
            dimension,
        )
    }

    /// Try a single candidate model; `None` means fall through to the
    /// next one.
    async fn try_model(&self, model: &str, text: &str) -> Option<Vec<f32>> {
        let request = OllamaEmbeddingRequest {
            model,
            prompt: text,
        };

        let response = match self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(model, error = %e, "embedding request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(model, status = %response.status(), "embedding model returned non-success status");
            return None;
        }

        let parsed: OllamaEmbeddingResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(model, error = %e, "failed to parse embedding response");
                return None;
            }
        };

        match parsed.embedding {
            Some(embedding) => {
                if embedding.len() != self.dimension {
                    // Mismatch otherwise only surfaces as a store error at upsert.
                    tracing::warn!(
                        model,
                        got = embedding.len(),
                        expected = self.dimension,
                        "embedding dimension differs from configured collection dimension"
                    );
                }
                Some(embedding)
            }
            None => {
                tracing::warn!(model, "embedding model returned null embedding");
                None
            }
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        for model in &self.models {
            if let Some(embedding) = self.try_model(model, text).await {
                return Ok(embedding);
            }
        }

        Err(UsimError::EmbeddingUnavailable(
            "failed to generate embedding with any available model".to_string(),
        ))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = EmbeddingConfig::default();
        let embedder = OllamaEmbedder::from_config(&config, 768).unwrap();

        assert_eq!(embedder.dimension(), 768);
        assert_eq!(embedder.base_url, "http://localhost:11434");
        assert_eq!(embedder.models, vec!["nomic-embed-text"]);
    }

    #[test]
    fn test_request_serialization() {
        let request = OllamaEmbeddingRequest {
            model: "nomic-embed-text",
            prompt: "Name: Ada. Bio: x. Interests: . Location: y. Age: Unknown",
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "nomic-embed-text");
        assert!(json["prompt"].as_str().unwrap().starts_with("Name: Ada"));
    }

    #[test]
    fn test_response_with_embedding() {
        let parsed: OllamaEmbeddingResponse =
            serde_json::from_str(r#"{"embedding": [0.1, 0.2, 0.3]}"#).unwrap();
        assert_eq!(parsed.embedding, Some(vec![0.1, 0.2, 0.3]));
    }

    #[test]
    fn test_response_with_null_embedding() {
        let parsed: OllamaEmbeddingResponse =
            serde_json::from_str(r#"{"embedding": null}"#).unwrap();
        assert_eq!(parsed.embedding, None);

        let parsed: OllamaEmbeddingResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.embedding, None);
    }

    #[tokio::test]
    async fn test_embed_fails_when_no_endpoint_reachable() {
        // Unroutable port; every candidate fails on transport error.
        let embedder = OllamaEmbedder::new(
            "http://127.0.0.1:1",
            vec!["nomic-embed-text".to_string(), "all-minilm".to_string()],
            Duration::from_millis(200),
            768,
        )
        .unwrap();

        let err = embedder.embed("some text").await.unwrap_err();
        assert!(matches!(err, UsimError::EmbeddingUnavailable(_)));
    }
}
