//! End-to-end demo: write a tiny corpus to a temp directory, load it,
//! and run a query through both retrieval modes.
//!
//! ```sh
//! cargo run -p tessera-retrieval --example theme_scoped
//! ```

use std::sync::Arc;

use tessera_core::config::{CorpusConfig, RetrievalConfig};
use tessera_core::models::RetrievalMode;
use tessera_corpus::ShardStore;
use tessera_index::PlacementManager;
use tessera_retrieval::{QueryEncoderAdapter, RetrievalEngine};
use test_fixtures::{unit, CorpusBuilder, FixedDenseEncoder, FixedThemeEncoder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let dir = tempfile::tempdir()?;
    let num_shards = CorpusBuilder::new(2, 2)
        .shard(
            &[
                "\"Ada Lovelace\" wrote what is considered the first program.",
                "\"Rust\" Rust is a systems programming language.",
            ],
            [unit(&[0.9, 0.4]), unit(&[0.2, 0.9])].concat(),
            Some([unit(&[1.0, 0.1]), unit(&[0.1, 1.0])].concat()),
        )
        .shard(
            &["\"Embedding\" A vector representation of text meaning."],
            unit(&[0.7, 0.7]),
            Some(unit(&[0.6, 0.8])),
        )
        .write(dir.path());

    let config = CorpusConfig {
        root: dir.path().to_path_buf(),
        num_shards,
    };
    let placement = PlacementManager::detect();
    let store = Arc::new(ShardStore::load(
        &config,
        RetrievalMode::ThemeScoped,
        &placement,
    )?);

    let adapter = || {
        QueryEncoderAdapter::new(
            Arc::new(FixedDenseEncoder {
                vector: unit(&[1.0, 0.3]),
            }),
            Arc::new(FixedThemeEncoder {
                distribution: vec![0.8, 0.2],
            }),
        )
    };

    let theme_scoped = RetrievalEngine::new(
        store.clone(),
        adapter(),
        placement.clone(),
        RetrievalConfig::default(),
    );
    println!("theme-scoped results:");
    for passage in theme_scoped.retrieve("who wrote the first program?", 3)? {
        println!("  {:>8.4}  {}", passage.score, passage.text);
    }

    let dense_only = RetrievalEngine::new(
        store,
        adapter(),
        placement,
        RetrievalConfig {
            mode: RetrievalMode::DenseOnly,
            ..RetrievalConfig::default()
        },
    );
    println!("dense-only results:");
    for passage in dense_only.retrieve("who wrote the first program?", 3)? {
        println!("  {:>8.4}  {}", passage.score, passage.text);
    }

    Ok(())
}
