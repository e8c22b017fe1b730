//! Shard store: loads every corpus shard once at startup and owns the
//! ordered, read-only collection for the process lifetime.

use std::path::Path;

use tracing::{info, warn};

use tessera_core::config::CorpusConfig;
use tessera_core::errors::{CorpusError, TesseraResult};
use tessera_core::models::RetrievalMode;
use tessera_index::{io, PlacementManager};

use crate::layout;
use crate::materialize;
use crate::shard::KnowledgeShard;

/// The full set of knowledge shards for one corpus.
///
/// Constructed once, never mutated afterwards; the orchestrator searches
/// it through shared references only.
pub struct ShardStore {
    shards: Vec<KnowledgeShard>,
}

impl ShardStore {
    /// Load shards `0..num_shards` from `config.root`, strictly
    /// sequentially.
    ///
    /// Load-fatal only when a text table cannot be read or parsed, or an
    /// index file cannot be read. A missing theme index in dense-only
    /// mode is expected. Shard 0's dense index is additionally placed on
    /// the accelerator once and released immediately: a warm-up probe,
    /// never load-fatal.
    pub fn load(
        config: &CorpusConfig,
        mode: RetrievalMode,
        placement: &PlacementManager,
    ) -> TesseraResult<Self> {
        let mut shards = Vec::with_capacity(config.num_shards);
        for shard_idx in 0..config.num_shards {
            let shard = load_shard(&config.root, shard_idx, mode)?;

            if shard_idx == 0 {
                if let Some(placed) = placement.try_place(&shard.dense_index) {
                    info!(shard = shard_idx, "accelerator warm-up placement verified");
                    drop(placed);
                }
            }

            info!(
                shard = shard_idx,
                docs = shard.doc_count(),
                theme = shard.theme_index.is_some(),
                "shard loaded"
            );
            shards.push(shard);
        }
        Ok(Self { shards })
    }

    /// Shards in corpus order.
    pub fn shards(&self) -> &[KnowledgeShard] {
        &self.shards
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KnowledgeShard> {
        self.shards.iter()
    }

    pub fn get(&self, shard_idx: usize) -> Option<&KnowledgeShard> {
        self.shards.get(shard_idx)
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    /// Total documents across all shards.
    pub fn total_docs(&self) -> usize {
        self.shards.iter().map(KnowledgeShard::doc_count).sum()
    }
}

fn load_shard(root: &Path, shard_idx: usize, mode: RetrievalMode) -> TesseraResult<KnowledgeShard> {
    let text_path = layout::text_table_path(root, shard_idx);
    let raw = std::fs::read(&text_path).map_err(|e| CorpusError::TextTableUnreadable {
        path: text_path.display().to_string(),
        reason: e.to_string(),
    })?;
    let text_table: Vec<String> =
        serde_json::from_slice(&raw).map_err(|e| CorpusError::TextTableUnparseable {
            path: text_path.display().to_string(),
            reason: e.to_string(),
        })?;

    let idx_mapping = KnowledgeShard::identity_mapping(text_table.len());

    let dense_path = layout::dense_index_path(root, shard_idx);
    let dense_index = io::read_index(&dense_path).map_err(|e| CorpusError::IndexUnreadable {
        shard: shard_idx,
        path: dense_path.display().to_string(),
        reason: e.to_string(),
    })?;

    if text_table.len() != dense_index.len() {
        warn!(
            shard = shard_idx,
            texts = text_table.len(),
            vectors = dense_index.len(),
            "text table and dense index cardinality differ; out-of-range hits will be dropped"
        );
    }

    let theme_index = if mode.needs_theme_index() {
        let original = layout::theme_index_path(root, shard_idx);
        let cached = layout::theme_l2_path(root, shard_idx);
        let (index, _) =
            materialize::materialize_l2(&original, &cached).map_err(|e| {
                CorpusError::IndexUnreadable {
                    shard: shard_idx,
                    path: original.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
        Some(index)
    } else {
        None
    };

    Ok(KnowledgeShard {
        shard_idx,
        text_table,
        dense_index,
        theme_index,
        idx_mapping,
    })
}
