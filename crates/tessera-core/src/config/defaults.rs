//! Named default values referenced by the config structs.

/// Shards in the reference corpus partition.
pub const DEFAULT_NUM_SHARDS: usize = 5;

/// Fan per-shard searches out across the rayon pool by default.
pub const DEFAULT_PARALLEL_SHARDS: bool = true;
