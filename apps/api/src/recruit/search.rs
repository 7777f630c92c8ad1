//! Semantic Search: top-k chunks reduced to the CVs they came from.

use crate::recruit::vector_store::ScoredRecord;

/// Results returned per search.
pub const SEARCH_K: usize = 2;

/// Distinct source file names in rank order.
pub fn distinct_file_names(hits: &[ScoredRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(hits.len());
    for hit in hits {
        if !names.contains(&hit.metadata.file_name) {
            names.push(hit.metadata.file_name.clone());
        }
    }
    names
}
