//! Configuration for corpus loading and retrieval, TOML-loadable.

mod corpus_config;
pub mod defaults;
mod retrieval_config;

pub use corpus_config::CorpusConfig;
pub use retrieval_config::RetrievalConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::TesseraResult;

/// Top-level configuration for a Tessera engine instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseraConfig {
    pub corpus: CorpusConfig,
    pub retrieval: RetrievalConfig,
}

impl TesseraConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> TesseraResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> TesseraResult<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RetrievalMode;

    #[test]
    fn defaults_are_sane() {
        let config = TesseraConfig::default();
        assert_eq!(config.retrieval.mode, RetrievalMode::ThemeScoped);
        assert_eq!(config.retrieval.top_k, crate::constants::DEFAULT_TOP_K);
        assert_eq!(
            config.retrieval.theme_top_k,
            crate::constants::DEFAULT_THEME_TOP_K
        );
        assert_eq!(config.corpus.num_shards, defaults::DEFAULT_NUM_SHARDS);
    }

    #[test]
    fn toml_round_trip() {
        let toml_str = r#"
            [corpus]
            root = "/data/wiki"
            num_shards = 3

            [retrieval]
            mode = "dense_only"
            top_k = 20
        "#;
        let config = TesseraConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.corpus.num_shards, 3);
        assert_eq!(config.retrieval.mode, RetrievalMode::DenseOnly);
        assert_eq!(config.retrieval.top_k, 20);
        // Unspecified fields fall back to defaults.
        assert_eq!(
            config.retrieval.theme_top_k,
            crate::constants::DEFAULT_THEME_TOP_K
        );
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let result = TesseraConfig::from_toml_str("corpus = 7");
        assert!(matches!(
            result,
            Err(crate::errors::TesseraError::Config(_))
        ));
    }
}
