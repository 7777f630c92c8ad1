//! Vector store for CV chunks.
//!
//! `VectorIndex` is the seam the ingestion run and search use. The service
//! runs against a Qdrant collection with cosine distance. Every appended
//! record gets a fresh point id, so ingesting the same chunk twice stores it
//! twice.

use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, ScoredPoint,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::recruit::chunk_store::ChunkMetadata;
use crate::recruit::StoreError;

const TEXT_KEY: &str = "text";
const FILE_NAME_KEY: &str = "file_name";
const TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRecord {
    pub id: Uuid,
    pub text: String,
    pub metadata: ChunkMetadata,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub text: String,
    pub metadata: ChunkMetadata,
    pub score: f32,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Appends records without any existence check. Returns how many were added.
    async fn append(&self, records: &[EmbeddingRecord]) -> Result<usize, StoreError>;

    /// Top `k` records by similarity to `query`, best first.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredRecord>, StoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize, StoreError>;
}

pub struct QdrantStore {
    client: Qdrant,
    collection: String,
    dimensions: u64,
}

impl QdrantStore {
    /// Builds the client. No request is made until the first call.
    pub fn connect(url: &str, collection: &str, dimensions: usize) -> Result<Self, StoreError> {
        let client = Qdrant::from_url(url)
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            collection: collection.to_string(),
            dimensions: dimensions as u64,
        })
    }

    async fn collection_exists(&self) -> Result<bool, StoreError> {
        let collections = self.client.list_collections().await?;
        Ok(collections
            .collections
            .iter()
            .any(|c| c.name == self.collection))
    }

    async fn ensure_collection(&self) -> Result<(), StoreError> {
        if !self.collection_exists().await? {
            info!("Creating collection: {}", self.collection);
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(self.dimensions, Distance::Cosine),
                    ),
                )
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantStore {
    async fn append(&self, records: &[EmbeddingRecord]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }
        self.ensure_collection().await?;
        let points = records
            .iter()
            .map(|record| {
                Ok(PointStruct::new(
                    record.id.to_string(),
                    record.embedding.clone(),
                    record_payload(record)?,
                ))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await?;
        Ok(records.len())
    }

    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredRecord>, StoreError> {
        // Searching before the first ingestion finds nothing.
        if k == 0 || !self.collection_exists().await? {
            return Ok(Vec::new());
        }
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query.to_vec(), k as u64)
                    .with_payload(true),
            )
            .await?;
        Ok(response.result.into_iter().map(scored_from_point).collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        if !self.collection_exists().await? {
            return Ok(0);
        }
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await?;
        Ok(response.result.map_or(0, |r| r.count as usize))
    }
}

fn record_payload(record: &EmbeddingRecord) -> Result<Payload, StoreError> {
    Ok(Payload::try_from(json!({
        TEXT_KEY: record.text,
        FILE_NAME_KEY: record.metadata.file_name,
    }))?)
}

fn scored_from_point(point: ScoredPoint) -> ScoredRecord {
    let field = |key: &str| {
        point
            .payload
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default()
    };
    ScoredRecord {
        text: field(TEXT_KEY),
        metadata: ChunkMetadata {
            file_name: field(FILE_NAME_KEY),
        },
        score: point.score,
    }
}
