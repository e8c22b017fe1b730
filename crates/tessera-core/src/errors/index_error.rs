/// Flat vector index errors.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("dimension mismatch: index holds {expected}-dim vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("id {id} out of range for index of {len} vectors")]
    IdOutOfRange { id: usize, len: usize },

    #[error("malformed index file {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("unsupported metric tag {tag} in index file {path}")]
    UnsupportedMetric { tag: u8, path: String },
}
