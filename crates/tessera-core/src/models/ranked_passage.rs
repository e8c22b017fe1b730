use serde::{Deserialize, Serialize};

/// A retrieved passage together with its fused relevance score.
///
/// The exposed unit of the whole engine: prompt-construction callers
/// consume an ordered `Vec<RankedPassage>` and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPassage {
    /// Document text, exactly as stored in the shard's text table.
    pub text: String,
    /// Fused score (higher = more relevant).
    pub score: f32,
}

impl RankedPassage {
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}
