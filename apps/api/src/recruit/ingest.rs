//! Embedder/Indexer: one ingestion run over the working directory.
//!
//! Every supported CV is extracted, chunked and persisted, then the chunks
//! produced by this run are embedded and appended to the vector store.
//! Nothing is deduplicated against earlier runs.

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::errors::AppError;
use crate::llm_client::Embedder;
use crate::recruit::chunk_store::{persist_chunk, ChunkMetadata};
use crate::recruit::chunker::{chunk_document, Chunk};
use crate::recruit::extract::extract_or_inline_error;
use crate::recruit::vector_store::{EmbeddingRecord, VectorIndex};
use crate::recruit::workspace::Workspace;

pub const INGEST_DONE: &str = "Embeddings successfully created and stored!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestedFile {
    pub file_name: String,
    pub chunks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub files: Vec<IngestedFile>,
    pub records_added: usize,
    pub message: &'static str,
}

pub async fn ingest_working_dir(
    workspace: &Workspace,
    chunking: ChunkingConfig,
    embedder: &dyn Embedder,
    store: &dyn VectorIndex,
) -> Result<IngestReport, AppError> {
    let mut files = Vec::new();
    let mut chunks: Vec<Chunk> = Vec::new();

    for (file_name, kind) in workspace.list_cvs().await? {
        let Some(bytes) = workspace.read(&file_name).await? else {
            continue;
        };
        let content = extract_or_inline_error(kind, bytes).await;
        if content.trim().is_empty() {
            debug!("Skipping {file_name}: no text");
            continue;
        }

        let file_chunks = chunk_document(&file_name, &content, chunking);
        for chunk in &file_chunks {
            persist_chunk(&workspace.dirs().chunks, chunk).await?;
        }
        info!("Chunked {file_name} into {} chunk(s)", file_chunks.len());
        files.push(IngestedFile {
            file_name,
            chunks: file_chunks.len(),
        });
        chunks.extend(file_chunks);
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embedder.embed(&texts).await?;
    let records: Vec<EmbeddingRecord> = chunks
        .into_iter()
        .zip(vectors)
        .map(|(chunk, embedding)| EmbeddingRecord {
            id: Uuid::new_v4(),
            text: chunk.text,
            metadata: ChunkMetadata {
                file_name: chunk.file_name,
            },
            embedding,
        })
        .collect();
    let records_added = store.append(&records).await?;
    info!(
        "Ingestion finished: {} file(s), {records_added} record(s) appended",
        files.len()
    );

    Ok(IngestReport {
        files,
        records_added,
        message: INGEST_DONE,
    })
}
