//! Text cleanup applied to both documents before scoring.

/// Strip leading and trailing whitespace.
///
/// Case folding is left to the scorer's tokenizer.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_string()
}
