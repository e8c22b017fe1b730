//! Theme-index L2 materialization.
//!
//! Theme similarity is computed with distance semantics, but a corpus
//! may ship its theme vectors indexed under inner product for historical
//! reasons. This module guarantees the loaded theme index uses squared
//! L2 regardless of how it was persisted, converting at most once per
//! shard per corpus version and caching the converted form beside the
//! original.

use std::path::Path;

use tracing::{debug, info, warn};

use tessera_core::errors::TesseraResult;
use tessera_index::{io, FlatIndex, Metric};

/// How the L2 form of a theme index was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialization {
    /// A previously materialized cache file was loaded directly.
    CacheHit,
    /// The original index was converted and the cache file written.
    Converted,
}

/// Load the L2 form of the theme index at `original`, materializing and
/// caching it at `cached` when necessary.
pub fn materialize_l2(original: &Path, cached: &Path) -> TesseraResult<(FlatIndex, Materialization)> {
    if cached.exists() {
        match io::read_index(cached) {
            Ok(index) => {
                debug!(path = %cached.display(), "theme L2 cache hit");
                return Ok((index, Materialization::CacheHit));
            }
            Err(e) => {
                warn!(
                    path = %cached.display(),
                    error = %e,
                    "theme L2 cache unreadable, rebuilding from original"
                );
            }
        }
    }

    let source = io::read_index(original)?;
    let l2 = convert_to_l2(source)?;
    io::write_index(cached, &l2)?;
    info!(
        original = %original.display(),
        cached = %cached.display(),
        vectors = l2.len(),
        "theme index materialized to L2"
    );
    Ok((l2, Materialization::Converted))
}

/// Rebuild `index` as a flat squared-L2 index, reconstructing every
/// stored vector by id. An index already in L2 metric passes through
/// unchanged.
fn convert_to_l2(index: FlatIndex) -> TesseraResult<FlatIndex> {
    if index.metric() == Metric::SquaredL2 {
        return Ok(index);
    }
    let ids: Vec<usize> = (0..index.len()).collect();
    let vectors = index.reconstruct_batch(&ids)?;
    FlatIndex::from_vectors(index.dim(), Metric::SquaredL2, vectors)
}
