//! ShardStore load behavior: happy paths, load-fatal cases, warm-up
//! placement probe, and tolerance for partial inconsistency.

use std::sync::Arc;

use tessera_core::config::CorpusConfig;
use tessera_core::models::RetrievalMode;
use tessera_core::traits::AcceleratorDevice;
use tessera_corpus::{layout, ShardStore};
use tessera_index::PlacementManager;
use test_fixtures::{unit, CorpusBuilder, MockAccelerator};

fn two_shard_corpus(root: &std::path::Path) -> CorpusConfig {
    let num_shards = CorpusBuilder::new(2, 2)
        .shard(
            &["alpha passage", "beta passage"],
            [unit(&[1.0, 0.0]), unit(&[0.0, 1.0])].concat(),
            Some([unit(&[1.0, 0.0]), unit(&[0.0, 1.0])].concat()),
        )
        .shard(
            &["gamma passage"],
            unit(&[0.6, 0.8]),
            Some(unit(&[0.5, 0.5])),
        )
        .write(root);
    CorpusConfig {
        root: root.to_path_buf(),
        num_shards,
    }
}

#[test]
fn loads_theme_scoped_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_shard_corpus(dir.path());

    let store = ShardStore::load(
        &config,
        RetrievalMode::ThemeScoped,
        &PlacementManager::detect(),
    )
    .unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.total_docs(), 3);
    for shard in store.iter() {
        assert_eq!(shard.text_table.len(), shard.dense_index.len());
        assert!(shard.theme_index.is_some());
        // Identity mapping over the full table.
        for i in 0..shard.doc_count() {
            assert_eq!(shard.idx_mapping.get(&i), Some(&i));
        }
    }
    // Materialization cached the L2 form for both shards.
    assert!(layout::theme_l2_path(dir.path(), 0).exists());
    assert!(layout::theme_l2_path(dir.path(), 1).exists());
}

#[test]
fn dense_only_mode_needs_no_theme_files() {
    let dir = tempfile::tempdir().unwrap();
    let num_shards = CorpusBuilder::new(2, 2)
        .shard(&["solo"], unit(&[1.0, 0.0]), None)
        .write(dir.path());
    let config = CorpusConfig {
        root: dir.path().to_path_buf(),
        num_shards,
    };

    let store = ShardStore::load(
        &config,
        RetrievalMode::DenseOnly,
        &PlacementManager::detect(),
    )
    .unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.get(0).unwrap().theme_index.is_none());
}

#[test]
fn second_load_hits_the_materialization_cache() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_shard_corpus(dir.path());
    let placement = PlacementManager::detect();

    ShardStore::load(&config, RetrievalMode::ThemeScoped, &placement).unwrap();

    // Remove the originals: only the cached L2 files can carry the load.
    std::fs::remove_file(layout::theme_index_path(dir.path(), 0)).unwrap();
    std::fs::remove_file(layout::theme_index_path(dir.path(), 1)).unwrap();

    let store = ShardStore::load(&config, RetrievalMode::ThemeScoped, &placement).unwrap();
    assert!(store.get(0).unwrap().theme_index.is_some());
}

#[test]
fn missing_text_table_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_shard_corpus(dir.path());
    std::fs::remove_file(layout::text_table_path(dir.path(), 1)).unwrap();

    let result = ShardStore::load(
        &config,
        RetrievalMode::ThemeScoped,
        &PlacementManager::detect(),
    );
    assert!(result.is_err());
}

#[test]
fn corrupt_text_table_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_shard_corpus(dir.path());
    std::fs::write(layout::text_table_path(dir.path(), 0), b"{ not json").unwrap();

    let result = ShardStore::load(
        &config,
        RetrievalMode::ThemeScoped,
        &PlacementManager::detect(),
    );
    assert!(result.is_err());
}

#[test]
fn corrupt_dense_index_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_shard_corpus(dir.path());
    std::fs::write(layout::dense_index_path(dir.path(), 0), b"garbage").unwrap();

    let result = ShardStore::load(
        &config,
        RetrievalMode::ThemeScoped,
        &PlacementManager::detect(),
    );
    assert!(result.is_err());
}

#[test]
fn missing_theme_index_in_theme_mode_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_shard_corpus(dir.path());
    std::fs::remove_file(layout::theme_index_path(dir.path(), 0)).unwrap();

    let result = ShardStore::load(
        &config,
        RetrievalMode::ThemeScoped,
        &PlacementManager::detect(),
    );
    assert!(result.is_err());
}

#[test]
fn warm_up_probe_failure_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_shard_corpus(dir.path());
    let placement = PlacementManager::new(vec![
        Arc::new(MockAccelerator::failing_upload()) as Arc<dyn AcceleratorDevice>,
    ]);

    let store = ShardStore::load(&config, RetrievalMode::ThemeScoped, &placement).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn warm_up_probe_releases_device_memory() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_shard_corpus(dir.path());
    let device = Arc::new(MockAccelerator::new());
    let placement =
        PlacementManager::new(vec![device.clone() as Arc<dyn AcceleratorDevice>]);

    ShardStore::load(&config, RetrievalMode::ThemeScoped, &placement).unwrap();
    assert_eq!(device.resident_count(), 0);
    assert_eq!(device.release_count(), 1);
}

#[test]
fn cardinality_mismatch_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_shard_corpus(dir.path());

    // Grow the text table past the dense index: load must warn, not fail.
    let path = layout::text_table_path(dir.path(), 0);
    let mut texts: Vec<String> =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    texts.push("orphan text with no vector".to_string());
    std::fs::write(&path, serde_json::to_vec(&texts).unwrap()).unwrap();

    let store = ShardStore::load(
        &config,
        RetrievalMode::ThemeScoped,
        &PlacementManager::detect(),
    )
    .unwrap();
    let shard = store.get(0).unwrap();
    assert_eq!(shard.doc_count(), 3);
    assert_eq!(shard.dense_index.len(), 2);
}
