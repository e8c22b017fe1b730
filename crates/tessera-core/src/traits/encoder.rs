use crate::errors::TesseraResult;

/// Dense semantic encoder: query string → fixed-dimension embedding.
///
/// Implementations are externally owned and frozen at retrieval time.
/// An error from `encode_dense` is fatal to the query that triggered it
/// and is never retried.
pub trait DenseEncoder: Send + Sync {
    /// Encode a query. Returns the raw (pre-normalization) vector taken
    /// at the sequence-start position.
    fn encode_dense(&self, query: &str) -> TesseraResult<Vec<f32>>;

    /// Output dimensionality. Must match the dense index dimension.
    fn dim(&self) -> usize;
}

/// Theme prediction stack: encoder, classifier, and distribution shifter
/// composed into one collaborator producing a raw theme distribution.
pub trait ThemeEncoder: Send + Sync {
    /// Predict the raw (pre-normalization) theme distribution for a query.
    fn encode_theme(&self, query: &str) -> TesseraResult<Vec<f32>>;

    /// Number of theme labels. Must match the theme index dimension.
    fn num_labels(&self) -> usize;
}
