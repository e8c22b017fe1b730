//! Property tests: result ordering, size bound, idempotence, and the
//! fusion blend.

use std::sync::Arc;

use proptest::prelude::*;

use tessera_core::config::{CorpusConfig, RetrievalConfig};
use tessera_core::models::RetrievalMode;
use tessera_corpus::ShardStore;
use tessera_index::PlacementManager;
use tessera_retrieval::{fusion, QueryEncoderAdapter, RetrievalEngine};
use test_fixtures::{unit, CorpusBuilder, FixedDenseEncoder, FixedThemeEncoder};

const DIM: usize = 4;

/// Build a single-shard theme-scoped engine over `docs` (dense, theme)
/// vector pairs. The TempDir must outlive the engine's load.
fn engine_over(
    docs: &[(Vec<f32>, Vec<f32>)],
    query_dense: Vec<f32>,
    query_theme: Vec<f32>,
) -> (tempfile::TempDir, RetrievalEngine) {
    let dir = tempfile::tempdir().unwrap();
    let texts: Vec<String> = (0..docs.len()).map(|i| format!("doc {i}")).collect();
    let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let dense: Vec<f32> = docs.iter().flat_map(|(d, _)| unit(d)).collect();
    let theme: Vec<f32> = docs.iter().flat_map(|(_, t)| unit(t)).collect();

    let num_shards = CorpusBuilder::new(DIM, DIM)
        .shard(&text_refs, dense, Some(theme))
        .write(dir.path());
    let config = CorpusConfig {
        root: dir.path().to_path_buf(),
        num_shards,
    };
    let store = Arc::new(
        ShardStore::load(&config, RetrievalMode::ThemeScoped, &PlacementManager::detect())
            .unwrap(),
    );
    let adapter = QueryEncoderAdapter::new(
        Arc::new(FixedDenseEncoder {
            vector: query_dense,
        }),
        Arc::new(FixedThemeEncoder {
            distribution: query_theme,
        }),
    );
    let engine = RetrievalEngine::new(
        store,
        adapter,
        PlacementManager::detect(),
        RetrievalConfig::default(),
    );
    (dir, engine)
}

fn nonzero_vector() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1.0f32..1.0, DIM)
        .prop_filter("needs a usable norm", |v| {
            v.iter().map(|x| x * x).sum::<f32>().sqrt() > 1e-3
        })
}

fn doc_set() -> impl Strategy<Value = Vec<(Vec<f32>, Vec<f32>)>> {
    prop::collection::vec((nonzero_vector(), nonzero_vector()), 1..10)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_scores_are_non_increasing_and_bounded(
        docs in doc_set(),
        q_dense in nonzero_vector(),
        q_theme in nonzero_vector(),
        top_k in 1usize..8,
    ) {
        let (_dir, engine) = engine_over(&docs, q_dense, q_theme);
        let results = engine.retrieve("query", top_k).unwrap();

        prop_assert!(results.len() <= top_k);
        // With enough candidates the bound is tight.
        prop_assert_eq!(results.len(), top_k.min(docs.len()));
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn prop_retrieval_is_idempotent(
        docs in doc_set(),
        q_dense in nonzero_vector(),
        q_theme in nonzero_vector(),
    ) {
        let (_dir, engine) = engine_over(&docs, q_dense, q_theme);
        let first = engine.retrieve("query", 5).unwrap();
        let second = engine.retrieve("query", 5).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_fusion_is_the_fixed_linear_blend(
        dense in -1.0f32..1.0,
        theme in -4.0f32..0.0,
    ) {
        let fused = fusion::fuse_scores(dense, theme);
        prop_assert!((fused - (0.9 * dense + 0.1 * theme)).abs() < 1e-6);
    }
}
