/// Shard-store load errors. Every variant aborts corpus construction.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("text table {path} unreadable: {reason}")]
    TextTableUnreadable { path: String, reason: String },

    #[error("text table {path} unparseable: {reason}")]
    TextTableUnparseable { path: String, reason: String },

    #[error("index file {path} unreadable for shard {shard}: {reason}")]
    IndexUnreadable {
        shard: usize,
        path: String,
        reason: String,
    },
}
