//! RetrievalEngine: orchestrates the per-query pipeline.
//!
//! Theme-scoped mode runs ENCODE → (degenerate? → dense-only) →
//! per-shard two-stage search → fuse → merge → truncate. Dense-only
//! mode runs a single-stage accelerated dense search per shard with a
//! host-memory fallback. The mode is fixed at construction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use tessera_core::config::RetrievalConfig;
use tessera_core::errors::{RetrievalError, TesseraResult};
use tessera_core::models::{RankedPassage, RetrievalMode, ThemeSignal};
use tessera_corpus::{KnowledgeShard, ShardStore};
use tessera_index::{FlatIndex, Metric, PlacementManager};

use crate::encoder::QueryEncoderAdapter;
use crate::fusion;
use crate::passage;

/// The retrieval orchestrator. Holds the shard store by shared
/// reference; shards are read-only after load, so per-shard searches
/// fan out across the rayon pool with per-shard result buffers.
pub struct RetrievalEngine {
    store: Arc<ShardStore>,
    encoder: QueryEncoderAdapter,
    placement: PlacementManager,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    pub fn new(
        store: Arc<ShardStore>,
        encoder: QueryEncoderAdapter,
        placement: PlacementManager,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            encoder,
            placement,
            config,
        }
    }

    pub fn mode(&self) -> RetrievalMode {
        self.config.mode
    }

    /// Retrieve the `top_k` best passages for `query` across all shards.
    pub fn retrieve(&self, query: &str, top_k: usize) -> TesseraResult<Vec<RankedPassage>> {
        self.retrieve_with_theme_top_k(query, top_k, self.config.theme_top_k)
    }

    /// Like [`Self::retrieve`], with an explicit theme-stage candidate
    /// count per shard.
    pub fn retrieve_with_theme_top_k(
        &self,
        query: &str,
        top_k: usize,
        theme_top_k: usize,
    ) -> TesseraResult<Vec<RankedPassage>> {
        let deadline = self
            .config
            .deadline_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));

        match self.config.mode {
            RetrievalMode::ThemeScoped => {
                self.theme_scoped(query, top_k, theme_top_k, deadline)
            }
            RetrievalMode::DenseOnly => {
                let dense_vec = self.encoder.encode_dense(query)?;
                self.dense_only(&dense_vec, top_k, deadline)
            }
        }
    }

    fn theme_scoped(
        &self,
        query: &str,
        top_k: usize,
        theme_top_k: usize,
        deadline: Option<Instant>,
    ) -> TesseraResult<Vec<RankedPassage>> {
        let theme_signal = self.encoder.encode_theme(query)?;
        let dense_vec = self.encoder.encode_dense(query)?;

        let theme_vec = match theme_signal {
            ThemeSignal::Distribution(v) => v,
            ThemeSignal::Degenerate => {
                info!("theme distribution degenerate, falling back to dense-only search");
                return self.dense_only(&dense_vec, top_k, deadline);
            }
        };

        let run = |shard: &KnowledgeShard| -> TesseraResult<Vec<RankedPassage>> {
            if deadline_expired(deadline) {
                warn!(shard = shard.shard_idx, "deadline expired, skipping shard");
                return Ok(Vec::new());
            }
            self.search_shard_theme_scoped(shard, &theme_vec, &dense_vec, top_k, theme_top_k)
        };

        let shards = self.store.shards();
        let per_shard: Vec<Vec<RankedPassage>> = if self.config.parallel_shards {
            shards.par_iter().map(run).collect::<TesseraResult<_>>()?
        } else {
            shards.iter().map(run).collect::<TesseraResult<_>>()?
        };

        let merged: Vec<RankedPassage> = per_shard.into_iter().flatten().collect();
        debug!(candidates = merged.len(), top_k, "merging shard results");
        Ok(fusion::merge_and_truncate(merged, top_k))
    }

    /// Two-stage search of one shard: theme neighbors first, then dense
    /// re-ranking restricted to the theme-plausible candidates.
    fn search_shard_theme_scoped(
        &self,
        shard: &KnowledgeShard,
        theme_vec: &[f32],
        dense_vec: &[f32],
        top_k: usize,
        theme_top_k: usize,
    ) -> TesseraResult<Vec<RankedPassage>> {
        let Some(theme_index) = shard.theme_index.as_ref() else {
            warn!(
                shard = shard.shard_idx,
                "shard has no theme index, contributing no candidates"
            );
            return Ok(Vec::new());
        };
        check_dims(shard.shard_idx, theme_vec, theme_index.dim())?;
        check_dims(shard.shard_idx, dense_vec, shard.dense_index.dim())?;

        // Stage 1: theme neighbors. L2 distances negate into
        // similarities (larger = better). theme_top_k is deliberately
        // large, so this is a soft re-weighting over most of the shard.
        let theme_hits = theme_index.search(theme_vec, theme_top_k)?;
        let mut theme_scores: HashMap<usize, f32> = HashMap::with_capacity(theme_hits.len());
        let mut dense_to_theme: HashMap<usize, usize> = HashMap::with_capacity(theme_hits.len());
        let mut candidates: Vec<usize> = Vec::with_capacity(theme_hits.len());
        for &(theme_id, distance) in &theme_hits {
            theme_scores.insert(theme_id, -distance);
            // Ids that escape the mapping or the dense index are
            // dropped, never fatal.
            let Some(&dense_id) = shard.idx_mapping.get(&theme_id) else {
                continue;
            };
            if dense_id >= shard.dense_index.len() {
                continue;
            }
            dense_to_theme.entry(dense_id).or_insert(theme_id);
            candidates.push(dense_id);
        }
        if candidates.is_empty() {
            debug!(shard = shard.shard_idx, "no theme candidates survived mapping");
            return Ok(Vec::new());
        }

        // Stage 2: transient inner-product index over exactly the
        // candidate vectors. Owned by this call, dropped at its end,
        // never shared or cached across queries.
        let vectors = shard.dense_index.reconstruct_batch(&candidates)?;
        let temp = FlatIndex::from_vectors(shard.dense_index.dim(), Metric::InnerProduct, vectors)?;
        let k = (2 * top_k).min(candidates.len());
        let dense_hits = temp.search(dense_vec, k)?;

        let mut results = Vec::with_capacity(dense_hits.len());
        for (temp_id, dense_sim) in dense_hits {
            let dense_id = candidates[temp_id];
            // A hit whose theme score went missing is dropped, not fatal.
            let Some(theme_id) = dense_to_theme.get(&dense_id) else {
                continue;
            };
            let Some(&theme_sim) = theme_scores.get(theme_id) else {
                continue;
            };
            let Some(text) = shard.text(dense_id) else {
                continue;
            };
            results.push(RankedPassage::new(
                text,
                fusion::fuse_scores(dense_sim, theme_sim),
            ));
        }
        debug!(
            shard = shard.shard_idx,
            candidates = candidates.len(),
            emitted = results.len(),
            "shard search complete"
        );
        Ok(results)
    }

    /// Single-stage dense search. Each shard's index is placed on the
    /// accelerator transiently and released right after its search; on
    /// placement failure the host index is used unmodified.
    ///
    /// The accelerator is a serially-reused resource, so this path walks
    /// shards sequentially. Results from every shard accumulate into the
    /// ranking; earlier shards are preserved.
    fn dense_only(
        &self,
        dense_vec: &[f32],
        top_k: usize,
        deadline: Option<Instant>,
    ) -> TesseraResult<Vec<RankedPassage>> {
        let mut all: Vec<RankedPassage> = Vec::new();
        for shard in self.store.iter() {
            if deadline_expired(deadline) {
                warn!(
                    shard = shard.shard_idx,
                    "deadline expired, returning partial merge"
                );
                break;
            }
            check_dims(shard.shard_idx, dense_vec, shard.dense_index.dim())?;

            let hits = match self.placement.try_place(&shard.dense_index) {
                Some(placed) => match placed.search(dense_vec, top_k) {
                    Ok(hits) => hits,
                    Err(e) => {
                        warn!(
                            shard = shard.shard_idx,
                            error = %e,
                            "placed search failed, re-running on host"
                        );
                        shard.dense_index.search(dense_vec, top_k)?
                    }
                },
                None => shard.dense_index.search(dense_vec, top_k)?,
            };

            for (id, score) in hits {
                let Some(text) = shard.text(id) else {
                    continue;
                };
                if !passage::is_well_formed(text) {
                    continue;
                }
                all.push(RankedPassage::new(text, score));
            }
        }
        Ok(fusion::merge_and_truncate(all, top_k))
    }
}

fn check_dims(shard: usize, query: &[f32], index_dim: usize) -> TesseraResult<()> {
    if query.len() != index_dim {
        return Err(RetrievalError::QueryDimensionMismatch {
            shard,
            query: query.len(),
            index: index_dim,
        }
        .into());
    }
    Ok(())
}

fn deadline_expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}
