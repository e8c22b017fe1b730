//! Shared test fixtures for the Tessera workspace: tiny synthetic
//! corpora written in the standard on-disk layout, deterministic mock
//! encoders, and an in-memory accelerator device.
//!
//! Fixture code panics on setup failure; these helpers only ever run in
//! tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use tessera_core::errors::{EncoderError, RetrievalError, TesseraResult};
use tessera_core::traits::{AcceleratorDevice, DenseEncoder, DeviceSlot, ThemeEncoder};
use tessera_index::{io, FlatIndex, Metric};

/// Unit-normalize a vector. Zero vectors pass through unchanged so
/// degenerate-signal tests can construct them.
pub fn unit(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm <= f32::EPSILON {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

// ---------------------------------------------------------------------------
// Corpus builder
// ---------------------------------------------------------------------------

struct ShardSpec {
    texts: Vec<String>,
    dense: Vec<f32>,
    theme: Option<Vec<f32>>,
}

/// Builds a tiny corpus on disk in the layout `ShardStore::load` expects.
///
/// Theme indices are written in inner-product metric so that loading in
/// theme-scoped mode exercises the L2 materialization path.
pub struct CorpusBuilder {
    dense_dim: usize,
    theme_dim: usize,
    shards: Vec<ShardSpec>,
}

impl CorpusBuilder {
    pub fn new(dense_dim: usize, theme_dim: usize) -> Self {
        Self {
            dense_dim,
            theme_dim,
            shards: Vec::new(),
        }
    }

    /// Append a shard. `dense` and `theme` are row-major; `theme: None`
    /// produces a shard suitable only for dense-only mode.
    pub fn shard(mut self, texts: &[&str], dense: Vec<f32>, theme: Option<Vec<f32>>) -> Self {
        assert_eq!(dense.len(), texts.len() * self.dense_dim, "dense rows");
        if let Some(t) = &theme {
            assert_eq!(t.len() % self.theme_dim, 0, "theme rows");
        }
        self.shards.push(ShardSpec {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            dense,
            theme,
        });
        self
    }

    /// Write every shard under `root` and return the shard count.
    pub fn write(self, root: &Path) -> usize {
        std::fs::create_dir_all(root.join("embedding")).expect("create embedding dir");
        std::fs::create_dir_all(root.join("theme")).expect("create theme dir");

        for (i, spec) in self.shards.iter().enumerate() {
            let text_path = root.join("embedding").join(format!("text_table_{i}.json"));
            let json = serde_json::to_vec(&spec.texts).expect("serialize text table");
            std::fs::write(&text_path, json).expect("write text table");

            let dense = FlatIndex::from_vectors(
                self.dense_dim,
                Metric::InnerProduct,
                spec.dense.clone(),
            )
            .expect("build dense index");
            io::write_index(
                &root.join("embedding").join(format!("dense_{i}.idx")),
                &dense,
            )
            .expect("write dense index");

            if let Some(theme_vecs) = &spec.theme {
                let theme = FlatIndex::from_vectors(
                    self.theme_dim,
                    Metric::InnerProduct,
                    theme_vecs.clone(),
                )
                .expect("build theme index");
                io::write_index(&root.join("theme").join(format!("theme_{i}.idx")), &theme)
                    .expect("write theme index");
            }
        }
        self.shards.len()
    }
}

// ---------------------------------------------------------------------------
// Mock encoders
// ---------------------------------------------------------------------------

/// Dense encoder returning the same vector for every query.
pub struct FixedDenseEncoder {
    pub vector: Vec<f32>,
}

impl DenseEncoder for FixedDenseEncoder {
    fn encode_dense(&self, _query: &str) -> TesseraResult<Vec<f32>> {
        Ok(self.vector.clone())
    }

    fn dim(&self) -> usize {
        self.vector.len()
    }
}

/// Theme encoder returning the same raw distribution for every query.
pub struct FixedThemeEncoder {
    pub distribution: Vec<f32>,
}

impl ThemeEncoder for FixedThemeEncoder {
    fn encode_theme(&self, _query: &str) -> TesseraResult<Vec<f32>> {
        Ok(self.distribution.clone())
    }

    fn num_labels(&self) -> usize {
        self.distribution.len()
    }
}

/// Dense encoder that always fails.
pub struct FailingDenseEncoder {
    pub dim: usize,
}

impl DenseEncoder for FailingDenseEncoder {
    fn encode_dense(&self, _query: &str) -> TesseraResult<Vec<f32>> {
        Err(EncoderError::DenseFailed {
            reason: "mock dense encoder failure".to_string(),
        }
        .into())
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// Theme encoder that always fails.
pub struct FailingThemeEncoder {
    pub labels: usize,
}

impl ThemeEncoder for FailingThemeEncoder {
    fn encode_theme(&self, _query: &str) -> TesseraResult<Vec<f32>> {
        Err(EncoderError::ThemeFailed {
            reason: "mock theme encoder failure".to_string(),
        }
        .into())
    }

    fn num_labels(&self) -> usize {
        self.labels
    }
}

// ---------------------------------------------------------------------------
// Mock accelerator
// ---------------------------------------------------------------------------

/// In-memory accelerator: brute-force inner product over uploaded rows,
/// with optional injected failures and a release counter.
pub struct MockAccelerator {
    slots: Mutex<HashMap<u64, (usize, Vec<f32>)>>,
    next_slot: AtomicU64,
    released: AtomicUsize,
    pub fail_upload: bool,
    pub fail_search: bool,
}

impl Default for MockAccelerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAccelerator {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            next_slot: AtomicU64::new(0),
            released: AtomicUsize::new(0),
            fail_upload: false,
            fail_search: false,
        }
    }

    pub fn failing_upload() -> Self {
        Self {
            fail_upload: true,
            ..Self::new()
        }
    }

    pub fn failing_search() -> Self {
        Self {
            fail_search: true,
            ..Self::new()
        }
    }

    /// Number of slots released so far.
    pub fn release_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Number of slots currently resident.
    pub fn resident_count(&self) -> usize {
        self.slots.lock().unwrap().len()
    }
}

impl AcceleratorDevice for MockAccelerator {
    fn upload(&self, dim: usize, vectors: &[f32]) -> TesseraResult<DeviceSlot> {
        if self.fail_upload {
            return Err(RetrievalError::SearchFailed {
                reason: "mock accelerator out of memory".to_string(),
            }
            .into());
        }
        let id = self.next_slot.fetch_add(1, Ordering::SeqCst);
        self.slots
            .lock()
            .unwrap()
            .insert(id, (dim, vectors.to_vec()));
        Ok(DeviceSlot(id))
    }

    fn search(
        &self,
        slot: DeviceSlot,
        queries: &[f32],
        k: usize,
    ) -> TesseraResult<Vec<Vec<(usize, f32)>>> {
        if self.fail_search {
            return Err(RetrievalError::SearchFailed {
                reason: "mock accelerator fault".to_string(),
            }
            .into());
        }
        let slots = self.slots.lock().unwrap();
        let (dim, data) = slots.get(&slot.0).expect("slot must be uploaded");
        let rows = queries
            .chunks(*dim)
            .map(|q| {
                let mut scored: Vec<(usize, f32)> = data
                    .chunks(*dim)
                    .enumerate()
                    .map(|(id, row)| (id, q.iter().zip(row).map(|(a, b)| a * b).sum::<f32>()))
                    .collect();
                scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                scored.truncate(k);
                scored
            })
            .collect();
        Ok(rows)
    }

    fn release(&self, slot: DeviceSlot) {
        if self.slots.lock().unwrap().remove(&slot.0).is_some() {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn name(&self) -> &str {
        "mock-accelerator"
    }
}
