//! Chunk persistence: every chunk is written twice into the chunks directory:
//! `{file}_chunk_{i}.txt` holds the raw text, `{file}_chunk_{i}.json` the
//! text plus its metadata.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::recruit::chunker::Chunk;
use crate::recruit::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub file_name: String,
}

/// Structured form of a chunk, as written to the `.json` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub page_content: String,
    pub metadata: ChunkMetadata,
}

impl From<&Chunk> for ChunkRecord {
    fn from(chunk: &Chunk) -> Self {
        Self {
            page_content: chunk.text.clone(),
            metadata: ChunkMetadata {
                file_name: chunk.file_name.clone(),
            },
        }
    }
}

pub fn chunk_stem(chunk: &Chunk) -> String {
    format!("{}_chunk_{}", chunk.file_name, chunk.index)
}

/// Writes both representations, overwriting earlier files of the same name.
pub async fn persist_chunk(dir: &Path, chunk: &Chunk) -> Result<(), StoreError> {
    let stem = chunk_stem(chunk);
    let text_path = dir.join(format!("{stem}.txt"));
    let json_path = dir.join(format!("{stem}.json"));

    write(&text_path, chunk.text.as_bytes()).await?;
    write(&json_path, &to_pretty_json(&ChunkRecord::from(chunk))?).await
}

/// JSON with four-space indentation; non-ASCII text is written as-is.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

async fn write(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}
