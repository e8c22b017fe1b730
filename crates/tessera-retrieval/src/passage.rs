//! Passage hygiene for the dense-only path.
//!
//! The corpus carries occasional empty rows and boilerplate stubs
//! (redirect markers, disambiguation placeholders); dense-only hits are
//! filtered through [`is_well_formed`] before they join the ranking.

/// Boilerplate markers that survive cleanup but carry no content.
const BOILERPLATE_PREFIXES: &[&str] = &["#REDIRECT", "#redirect", "(disambiguation)"];

/// Collapse whitespace and strip a leading quoted title marker
/// (passages are shipped as `"Title" body`).
pub fn cleanup(text: &str) -> String {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.split_once('"'))
        .map(|(_, after)| after)
        .unwrap_or(trimmed);
    body.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether anything meaningful survives cleanup.
pub fn is_well_formed(text: &str) -> bool {
    let cleaned = cleanup(text);
    if cleaned.is_empty() {
        return false;
    }
    if BOILERPLATE_PREFIXES.iter().any(|p| cleaned.starts_with(p)) {
        return false;
    }
    cleaned.chars().any(char::is_alphanumeric)
}
