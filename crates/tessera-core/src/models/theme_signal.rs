/// Theme distribution predicted for a query.
///
/// `Degenerate` marks a prediction whose pre-normalization L2 norm fell
/// below [`crate::constants::THEME_NORM_EPSILON`]; the retrieval engine
/// treats it as a defined fallback to dense-only search, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeSignal {
    /// Unit-normalized distribution over the theme label set.
    Distribution(Vec<f32>),
    /// Prediction too small to normalize meaningfully.
    Degenerate,
}

impl ThemeSignal {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, ThemeSignal::Degenerate)
    }
}
