use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Location and shape of an on-disk knowledge corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Corpus root directory, containing `embedding/` and `theme/`.
    pub root: PathBuf,
    /// Number of shards the corpus was partitioned into.
    pub num_shards: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("corpus"),
            num_shards: defaults::DEFAULT_NUM_SHARDS,
        }
    }
}
