//! Whitespace normalization and marker search over extracted PDF text.

/// Collapse whitespace runs (non-breaking spaces included) to one space and
/// trim both ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.replace('\u{00a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Byte offset of the first ASCII case-insensitive occurrence of `needle`.
///
/// Offsets are valid for `haystack` because ASCII case folding keeps the
/// byte length unchanged.
pub fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .to_ascii_uppercase()
        .find(&needle.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a\u{00a0}\u{00a0}b\n\tc  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn test_find_ignore_ascii_case() {
        assert_eq!(find_ignore_ascii_case("Código cantidad", "CANTIDAD"), Some(8));
        assert_eq!(find_ignore_ascii_case("sin tabla", "CANTIDAD"), None);
    }
}
