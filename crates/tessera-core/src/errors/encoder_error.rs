/// Query encoder errors. Fatal for the query that triggered them;
/// encoder calls are never retried.
#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("dense encoder failed: {reason}")]
    DenseFailed { reason: String },

    #[error("theme encoder failed: {reason}")]
    ThemeFailed { reason: String },

    #[error("dense embedding has zero norm")]
    ZeroNormEmbedding,

    #[error("encoder produced {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
