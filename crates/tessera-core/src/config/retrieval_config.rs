use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;
use crate::models::RetrievalMode;

/// Retrieval pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Which retrieval strategy the engine dispatches to. Fixed for the
    /// lifetime of the engine instance.
    pub mode: RetrievalMode,
    /// Default number of passages returned per call.
    pub top_k: usize,
    /// Theme-stage candidate count per shard.
    pub theme_top_k: usize,
    /// Fan the per-shard search out across the rayon thread pool.
    pub parallel_shards: bool,
    /// Soft deadline per query, milliseconds. Shards whose search has not
    /// started by the deadline are skipped and the partial merge is
    /// returned. `None` disables the deadline.
    pub deadline_ms: Option<u64>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            mode: RetrievalMode::default(),
            top_k: constants::DEFAULT_TOP_K,
            theme_top_k: constants::DEFAULT_THEME_TOP_K,
            parallel_shards: defaults::DEFAULT_PARALLEL_SHARDS,
            deadline_ms: None,
        }
    }
}
