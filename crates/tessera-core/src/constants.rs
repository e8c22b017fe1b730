/// Tessera system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Weight of the dense similarity signal in score fusion.
pub const DENSE_WEIGHT: f32 = 0.9;

/// Weight of the theme similarity signal in score fusion.
pub const THEME_WEIGHT: f32 = 0.1;

/// Theme distributions whose pre-normalization L2 norm falls below this
/// are degenerate; the query falls back to dense-only retrieval.
pub const THEME_NORM_EPSILON: f32 = 1e-8;

/// Default number of theme neighbors requested per shard. Deliberately
/// large: the theme stage is a soft re-weighting over most of a shard,
/// not a hard filter.
pub const DEFAULT_THEME_TOP_K: usize = 100_000;

/// Default number of passages returned by a retrieval call.
pub const DEFAULT_TOP_K: usize = 10;

/// Number of random queries in the accelerator placement smoke test.
pub const SMOKE_BATCH: usize = 10;

/// Neighbors requested per smoke-test query.
pub const SMOKE_TOP_K: usize = 10;
