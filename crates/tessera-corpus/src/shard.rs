//! One loaded partition of the knowledge corpus.

use std::collections::HashMap;

use tessera_index::FlatIndex;

/// An immutable, fully-loaded corpus partition.
///
/// Document ids are local to the shard; shard index plus local id form
/// the global identity of a document.
pub struct KnowledgeShard {
    /// Position of this shard within the corpus.
    pub shard_idx: usize,
    /// Local document id → passage text.
    pub text_table: Vec<String>,
    /// Inner-product index over unit-norm dense embeddings, one row per
    /// document, same ordering as `text_table`.
    pub dense_index: FlatIndex,
    /// Squared-L2 index over theme distributions. `None` in dense-only
    /// mode.
    pub theme_index: Option<FlatIndex>,
    /// Theme-index-local id → dense-index-local id.
    ///
    /// Identity for current corpora, but the indirection is load-bearing:
    /// a shard may group several dense documents under one theme vector,
    /// so it must not be collapsed.
    pub idx_mapping: HashMap<usize, usize>,
}

impl KnowledgeShard {
    /// Number of documents in the text table.
    pub fn doc_count(&self) -> usize {
        self.text_table.len()
    }

    /// Text for a dense-local document id, if the id is in range.
    pub fn text(&self, id: usize) -> Option<&str> {
        self.text_table.get(id).map(String::as_str)
    }

    /// Identity mapping over `0..doc_count`, the shape every current
    /// corpus ships.
    pub fn identity_mapping(doc_count: usize) -> HashMap<usize, usize> {
        (0..doc_count).map(|i| (i, i)).collect()
    }
}
