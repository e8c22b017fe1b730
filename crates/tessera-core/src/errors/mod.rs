//! Error types for every Tessera subsystem.
//!
//! Each subsystem defines its own `thiserror` enum; everything converts
//! into the top-level [`TesseraError`] via `#[from]`.

mod corpus_error;
mod encoder_error;
mod index_error;
mod retrieval_error;

pub use corpus_error::CorpusError;
pub use encoder_error::EncoderError;
pub use index_error::IndexError;
pub use retrieval_error::RetrievalError;

/// Result alias used across the workspace.
pub type TesseraResult<T> = Result<T, TesseraError>;

/// Top-level error for the Tessera retrieval engine.
#[derive(Debug, thiserror::Error)]
pub enum TesseraError {
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("encoder error: {0}")]
    Encoder(#[from] EncoderError),

    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}
