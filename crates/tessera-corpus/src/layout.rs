//! On-disk corpus layout.
//!
//! ```text
//! <root>/
//! +-- embedding/
//! |   +-- text_table_0.json     # JSON array, local id = position
//! |   +-- dense_0.idx           # inner-product flat index
//! |   +-- text_table_1.json
//! |   +-- dense_1.idx
//! |   +-- ...
//! +-- theme/
//!     +-- theme_0.idx           # theme index as shipped (any metric)
//!     +-- theme_0_l2.idx        # materialized L2 form (cache, may be absent)
//!     +-- ...
//! ```

use std::path::{Path, PathBuf};

pub fn text_table_path(root: &Path, shard: usize) -> PathBuf {
    root.join("embedding").join(format!("text_table_{shard}.json"))
}

pub fn dense_index_path(root: &Path, shard: usize) -> PathBuf {
    root.join("embedding").join(format!("dense_{shard}.idx"))
}

pub fn theme_index_path(root: &Path, shard: usize) -> PathBuf {
    root.join("theme").join(format!("theme_{shard}.idx"))
}

pub fn theme_l2_path(root: &Path, shard: usize) -> PathBuf {
    root.join("theme").join(format!("theme_{shard}_l2.idx"))
}
