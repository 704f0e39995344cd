//! Byte-pattern scanning primitives
//!
//! Everything else in the crate searches buffers through these two functions,
//! so the bounds checking lives in exactly one place.

/// Find the first occurrence of `pattern` at or after `start`.
///
/// Returns the absolute offset of the match, or `None` if the pattern does
/// not occur. Empty patterns and out-of-range starts never match.
pub fn find_pattern(data: &[u8], start: usize, pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() || start >= data.len() {
        return None;
    }

    data[start..]
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|pos| pos + start)
}

/// Find the last occurrence of `pattern` in `data`.
///
/// Equivalent to scanning backward from the end and stopping on the first
/// match, which yields the rightmost occurrence.
pub fn rfind_pattern(data: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() {
        return None;
    }

    data.windows(pattern.len()).rposition(|window| window == pattern)
}
