//! Approximate token accounting for usage reporting.

/// Estimate how many tokens a piece of text costs.
///
/// Character count plus one extra per space. This is an approximation of
/// sub-word tokenization for display purposes, not a billing figure.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() + text.matches(' ').count()
}
