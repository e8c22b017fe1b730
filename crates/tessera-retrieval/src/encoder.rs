//! Query encoder adapter: raw query string → normalized search vectors.

use std::sync::Arc;

use tessera_core::constants::THEME_NORM_EPSILON;
use tessera_core::errors::{EncoderError, TesseraResult};
use tessera_core::models::ThemeSignal;
use tessera_core::traits::{DenseEncoder, ThemeEncoder};

/// Wraps the externally-owned dense encoder and theme prediction stack
/// (encoder → classifier → distribution shifter), producing the
/// unit-normalized vectors the search pipeline consumes.
///
/// Encoder failures propagate unchanged: fatal for the single query
/// that triggered them, never retried.
pub struct QueryEncoderAdapter {
    dense: Arc<dyn DenseEncoder>,
    theme: Arc<dyn ThemeEncoder>,
}

impl QueryEncoderAdapter {
    pub fn new(dense: Arc<dyn DenseEncoder>, theme: Arc<dyn ThemeEncoder>) -> Self {
        Self { dense, theme }
    }

    pub fn dense_dim(&self) -> usize {
        self.dense.dim()
    }

    pub fn theme_labels(&self) -> usize {
        self.theme.num_labels()
    }

    /// Unit-normalized dense embedding for `query`.
    pub fn encode_dense(&self, query: &str) -> TesseraResult<Vec<f32>> {
        let mut v = self.dense.encode_dense(query)?;
        if v.len() != self.dense.dim() {
            return Err(EncoderError::DimensionMismatch {
                expected: self.dense.dim(),
                actual: v.len(),
            }
            .into());
        }
        let norm = l2_norm(&v);
        if norm <= f32::EPSILON {
            return Err(EncoderError::ZeroNormEmbedding.into());
        }
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }

    /// Theme distribution for `query`, unit-normalized, or
    /// [`ThemeSignal::Degenerate`] when the raw prediction's norm falls
    /// below the epsilon.
    pub fn encode_theme(&self, query: &str) -> TesseraResult<ThemeSignal> {
        let mut v = self.theme.encode_theme(query)?;
        if v.len() != self.theme.num_labels() {
            return Err(EncoderError::DimensionMismatch {
                expected: self.theme.num_labels(),
                actual: v.len(),
            }
            .into());
        }
        let norm = l2_norm(&v);
        if norm < THEME_NORM_EPSILON {
            return Ok(ThemeSignal::Degenerate);
        }
        for x in &mut v {
            *x /= norm;
        }
        Ok(ThemeSignal::Distribution(v))
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}
