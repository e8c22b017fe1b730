//! # tessera-corpus
//!
//! Loaded representation of a sharded knowledge corpus: per-shard text
//! tables and vector indices, the store that owns them for the process
//! lifetime, and the theme-index L2 materialization cache.

pub mod layout;
pub mod materialize;
pub mod shard;
pub mod store;

pub use materialize::Materialization;
pub use shard::KnowledgeShard;
pub use store::ShardStore;
