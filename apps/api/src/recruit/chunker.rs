//! Chunker: fixed-size character windows with a fixed overlap.
//!
//! Windows start every `chunk_size - chunk_overlap` characters; the last
//! window ends exactly at the end of the text, so consecutive chunks always
//! share `chunk_overlap` characters and together cover the whole input.

use serde::{Deserialize, Serialize};

use crate::config::ChunkingConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub file_name: String,
    /// 1-based position within the source document.
    pub index: usize,
    pub text: String,
}

/// Splits on character (not byte) boundaries.
pub fn split_text(text: &str, config: ChunkingConfig) -> Vec<&str> {
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = bounds.len() - 1;
    if char_count == 0 {
        return Vec::new();
    }

    let mut windows = Vec::with_capacity(char_count / config.step() + 1);
    let mut start = 0;
    loop {
        let end = (start + config.chunk_size).min(char_count);
        windows.push(&text[bounds[start]..bounds[end]]);
        if end == char_count {
            break;
        }
        start += config.step();
    }
    windows
}

pub fn chunk_document(file_name: &str, text: &str, config: ChunkingConfig) -> Vec<Chunk> {
    split_text(text, config)
        .into_iter()
        .enumerate()
        .map(|(i, window)| Chunk {
            file_name: file_name.to_string(),
            index: i + 1,
            text: window.to_string(),
        })
        .collect()
}
