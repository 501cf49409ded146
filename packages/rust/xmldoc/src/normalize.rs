//! Free-text normalization for documentation fields.
//!
//! Doc-comment text arrives indented and padded with the compiler's layout.
//! Normalizing trims the whole block, then every line, and rejoins with `\n`.

/// Trim the whole string, then each line, and rejoin lines with a single `\n`.
///
/// Idempotent: `full_trim(&full_trim(s)) == full_trim(s)`.
pub fn full_trim(s: &str) -> String {
    s.trim()
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// [`full_trim`] lifted over an optional field. Absent in, absent out.
pub fn normalize(s: Option<&str>) -> Option<String> {
    s.map(full_trim)
}

/// Whether a string carries no content once whitespace is removed.
pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
