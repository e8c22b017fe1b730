/// Retrieval pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("query vector is {query}-dim but shard {shard} index is {index}-dim")]
    QueryDimensionMismatch {
        shard: usize,
        query: usize,
        index: usize,
    },

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },
}
