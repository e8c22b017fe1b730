use serde::{Deserialize, Serialize};

/// Retrieval strategy, fixed at engine construction for the lifetime of
/// the engine instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    /// Two-stage pipeline: theme-filtered candidate generation, then
    /// dense re-ranking and score fusion.
    #[default]
    ThemeScoped,
    /// Single-stage dense search with transient accelerator placement.
    DenseOnly,
}

impl RetrievalMode {
    /// Whether shards need a theme index loaded for this mode.
    pub fn needs_theme_index(self) -> bool {
        matches!(self, RetrievalMode::ThemeScoped)
    }
}
