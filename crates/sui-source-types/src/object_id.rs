//! Object id helpers.
//!
//! Package ids are untrusted input and are passed through unchanged. The
//! ledger may however report the same id in short (`0x2`) or full form, so
//! comparisons go through [`normalize_object_id`].

/// Normalize an id to lowercase with `0x` prefix and 64 hex characters.
///
/// ```
/// use sui_source_types::object_id::normalize_object_id;
///
/// assert_eq!(
///     normalize_object_id("0x2"),
///     "0x0000000000000000000000000000000000000000000000000000000000000002"
/// );
/// ```
pub fn normalize_object_id(id: &str) -> String {
    let trimmed = id.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .to_lowercase();
    if hex.len() < 64 {
        format!("0x{:0>64}", hex)
    } else {
        format!("0x{}", hex)
    }
}

/// Whether two ids name the same object.
pub fn same_object_id(a: &str, b: &str) -> bool {
    normalize_object_id(a) == normalize_object_id(b)
}

/// First `len` characters of an id, used for synthesized display names.
pub fn short_id(id: &str, len: usize) -> String {
    id.chars().take(len).collect()
}
