//! Qdrant implementation for profile vector storage
//!
//! Provides connection management, collection bootstrap, and the
//! point-level operations behind the HTTP API.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    point_id::PointIdOptions, CreateCollectionBuilder, Distance, GetPointsBuilder, PointId,
    PointStruct, ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, Value,
    VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use usim_core::{QdrantConfig, Result, ScoredProfile, StoredProfile, UserProfile, UsimError};
use uuid::Uuid;

use crate::{ProfileStore, LIST_LIMIT};

/// Qdrant-backed profile store
pub struct QdrantProfileStore {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl QdrantProfileStore {
    /// Create a new Qdrant connection
    pub fn new(config: &QdrantConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.url())
            .build()
            .map_err(|e| UsimError::Store(format!("Qdrant connection failed: {e}")))?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
            dimension: config.dimension,
        })
    }

    /// Initialize the collection (run once before serving traffic).
    ///
    /// Idempotent, and tolerates the create racing against another
    /// instance starting up at the same time.
    pub async fn init_collection(&self) -> Result<()> {
        if self.collection_exists().await? {
            tracing::info!(collection = %self.collection, "collection already exists");
            return Ok(());
        }

        let created = self
            .client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection).vectors_config(
                    VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                ),
            )
            .await;

        match created {
            Ok(_) => {
                tracing::info!(
                    collection = %self.collection,
                    dimension = self.dimension,
                    "created collection"
                );
                Ok(())
            }
            Err(err) => {
                // Another instance may have created it between the
                // check and the create.
                if self.collection_exists().await? {
                    tracing::info!(collection = %self.collection, "collection created concurrently");
                    Ok(())
                } else {
                    Err(UsimError::Store(format!(
                        "failed to create collection: {err}"
                    )))
                }
            }
        }
    }

    async fn collection_exists(&self) -> Result<bool> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| UsimError::Store(format!("failed to list collections: {e}")))?;

        Ok(collections
            .collections
            .iter()
            .any(|c| c.name == self.collection))
    }
}

#[async_trait]
impl ProfileStore for QdrantProfileStore {
    async fn upsert(&self, id: Uuid, vector: Vec<f32>, profile: &UserProfile) -> Result<()> {
        let point = PointStruct::new(id.to_string(), vector, profile_payload(profile)?);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]))
            .await
            .map_err(|e| UsimError::Store(format!("failed to upsert profile: {e}")))?;

        Ok(())
    }

    async fn find_nearest(&self, vector: Vec<f32>) -> Result<Option<ScoredProfile>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, 1).with_payload(true),
            )
            .await
            .map_err(|e| UsimError::Store(format!("vector search failed: {e}")))?;

        let Some(point) = response.result.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(ScoredProfile {
            id: point_uuid(point.id)?,
            profile: profile_from_payload(point.payload)?,
            score: point.score,
        }))
    }

    async fn retrieve(&self, id: Uuid) -> Result<Option<StoredProfile>> {
        let response = self
            .client
            .get_points(
                GetPointsBuilder::new(
                    &self.collection,
                    vec![PointId::from(id.to_string())],
                )
                .with_payload(true),
            )
            .await
            .map_err(|e| UsimError::Store(format!("failed to retrieve profile: {e}")))?;

        let Some(point) = response.result.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(StoredProfile {
            id: point_uuid(point.id)?,
            profile: profile_from_payload(point.payload)?,
        }))
    }

    async fn list(&self) -> Result<Vec<StoredProfile>> {
        let response = self
            .client
            .scroll(
                ScrollPointsBuilder::new(&self.collection)
                    .limit(LIST_LIMIT as u32)
                    .with_payload(true),
            )
            .await
            .map_err(|e| UsimError::Store(format!("failed to list profiles: {e}")))?;

        response
            .result
            .into_iter()
            .map(|point| {
                Ok(StoredProfile {
                    id: point_uuid(point.id)?,
                    profile: profile_from_payload(point.payload)?,
                })
            })
            .collect()
    }
}

/// Encode a profile as a Qdrant point payload.
fn profile_payload(profile: &UserProfile) -> Result<HashMap<String, Value>> {
    let value = serde_json::to_value(profile)
        .map_err(|e| UsimError::Store(format!("failed to encode profile payload: {e}")))?;

    let map = value.as_object().cloned().unwrap_or_default();
    Ok(map.into_iter().map(|(k, v)| (k, v.into())).collect())
}

/// Decode a point payload back into a profile.
fn profile_from_payload(payload: HashMap<String, Value>) -> Result<UserProfile> {
    let map: serde_json::Map<String, serde_json::Value> = payload
        .into_iter()
        .map(|(k, v)| (k, json_from_qdrant(v)))
        .collect();

    serde_json::from_value(serde_json::Value::Object(map))
        .map_err(|e| UsimError::Store(format!("malformed profile payload: {e}")))
}

fn json_from_qdrant(value: Value) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind;

    match value.kind {
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::IntegerValue(i)) => serde_json::Value::from(i),
        Some(Kind::DoubleValue(d)) => serde_json::Value::from(d),
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(json_from_qdrant).collect())
        }
        Some(Kind::StructValue(s)) => serde_json::Value::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| (k, json_from_qdrant(v)))
                .collect(),
        ),
        Some(Kind::NullValue(_)) | None => serde_json::Value::Null,
    }
}

/// Extract the UUID the service assigned at upsert time.
fn point_uuid(id: Option<PointId>) -> Result<Uuid> {
    let options = id
        .and_then(|p| p.point_id_options)
        .ok_or_else(|| UsimError::Store("point is missing an id".to_string()))?;

    match options {
        PointIdOptions::Uuid(s) => Uuid::parse_str(&s)
            .map_err(|e| UsimError::Store(format!("invalid point id {s}: {e}"))),
        PointIdOptions::Num(n) => Err(UsimError::Store(format!(
            "unexpected numeric point id: {n}"
        ))),
    }
}
