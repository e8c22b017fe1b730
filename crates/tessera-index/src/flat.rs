//! Flat (exact, brute-force) similarity-search index.
//!
//! Stores vectors contiguously and scans every row at query time. Scans
//! are parallelized across the rayon pool; results are exact, which is
//! what the retrieval pipeline's score fusion assumes.

use std::cmp::Ordering;

use rayon::prelude::*;

use tessera_core::errors::{IndexError, TesseraResult};

/// Similarity metric of a flat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Raw dot product; higher = more similar. Used for unit-norm dense
    /// embeddings, where it equals cosine similarity.
    InnerProduct,
    /// Squared Euclidean distance; lower = more similar. Used for theme
    /// distribution vectors.
    SquaredL2,
}

/// An exact similarity-search index over fixed-dimension f32 vectors.
///
/// Ids are implicit: the i-th added vector has id `i`. Immutable in
/// practice once loaded; the retrieval path only ever reads.
#[derive(Debug)]
pub struct FlatIndex {
    metric: Metric,
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Create an empty index.
    pub fn new(dim: usize, metric: Metric) -> Self {
        Self {
            metric,
            dim,
            data: Vec::new(),
        }
    }

    /// Create an index directly from row-major vector data.
    pub fn from_vectors(dim: usize, metric: Metric, vectors: Vec<f32>) -> TesseraResult<Self> {
        if dim == 0 || vectors.len() % dim != 0 {
            return Err(IndexError::DimensionMismatch {
                expected: dim,
                actual: vectors.len(),
            }
            .into());
        }
        Ok(Self {
            metric,
            dim,
            data: vectors,
        })
    }

    /// Append row-major vectors. The slice length must be a multiple of
    /// the index dimension.
    pub fn add(&mut self, vectors: &[f32]) -> TesseraResult<()> {
        if self.dim == 0 || vectors.len() % self.dim != 0 {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim,
                actual: vectors.len(),
            }
            .into());
        }
        self.data.extend_from_slice(vectors);
        Ok(())
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Raw row-major vector storage.
    pub fn vectors(&self) -> &[f32] {
        &self.data
    }

    /// Borrow the vector stored under `id`.
    pub fn reconstruct(&self, id: usize) -> TesseraResult<&[f32]> {
        if id >= self.len() {
            return Err(IndexError::IdOutOfRange {
                id,
                len: self.len(),
            }
            .into());
        }
        Ok(&self.data[id * self.dim..(id + 1) * self.dim])
    }

    /// Copy the vectors for `ids` into one contiguous row-major buffer,
    /// preserving order.
    pub fn reconstruct_batch(&self, ids: &[usize]) -> TesseraResult<Vec<f32>> {
        let mut out = Vec::with_capacity(ids.len() * self.dim);
        for &id in ids {
            out.extend_from_slice(self.reconstruct(id)?);
        }
        Ok(out)
    }

    /// Exact search for the `k` nearest neighbors of `query`.
    ///
    /// Returns `(id, score)` pairs ordered best-first: descending dot
    /// product for inner-product indices, ascending squared distance for
    /// L2 indices. `k` is clamped to the index size.
    pub fn search(&self, query: &[f32], k: usize) -> TesseraResult<Vec<(usize, f32)>> {
        if query.len() != self.dim {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            }
            .into());
        }
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .par_chunks(self.dim)
            .enumerate()
            .map(|(id, row)| (id, score_row(self.metric, query, row)))
            .collect();

        match self.metric {
            Metric::InnerProduct => {
                scored.sort_unstable_by(|a, b| {
                    b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal)
                });
            }
            Metric::SquaredL2 => {
                scored.sort_unstable_by(|a, b| {
                    a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal)
                });
            }
        }
        scored.truncate(k.min(self.len()));
        Ok(scored)
    }
}

fn score_row(metric: Metric, query: &[f32], row: &[f32]) -> f32 {
    match metric {
        Metric::InnerProduct => query.iter().zip(row).map(|(q, r)| q * r).sum(),
        Metric::SquaredL2 => query
            .iter()
            .zip(row)
            .map(|(q, r)| {
                let d = q - r;
                d * d
            })
            .sum(),
    }
}
