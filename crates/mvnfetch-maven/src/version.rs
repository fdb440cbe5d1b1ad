//! Maven version range simplification.

/// Reduces a Maven version range to a single concrete version.
///
/// Only the bracket syntax is understood, and no range intersection is
/// attempted: the last non-empty bound wins. Literal versions pass through
/// unchanged.
///
/// - `[1.0,2.0]` -> `2.0`
/// - `[1.5]` -> `1.5`
/// - `[1.0,` and `[1.0,)` -> `1.0`
/// - `(,2.0]` -> `2.0`
/// - `[1.0,2.0),[3.0,4.0)` -> `4.0`
pub fn simplify_range(version: &str) -> String {
    let trimmed = version.trim();
    if !is_range(trimmed) {
        return trimmed.to_string();
    }

    trimmed
        .split(',')
        .map(|bound| bound.trim_matches(is_bound_delimiter))
        .filter(|bound| !bound.is_empty())
        .next_back()
        .unwrap_or_default()
        .to_string()
}

fn is_bound_delimiter(c: char) -> bool {
    matches!(c, '[' | ']' | '(' | ')') || c.is_whitespace()
}

/// Whether the string uses range bracket syntax.
pub fn is_range(version: &str) -> bool {
    version.starts_with('[') || version.starts_with('(')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_passthrough() {
        assert_eq!(simplify_range("3.14.0"), "3.14.0");
        assert_eq!(simplify_range(" 1.0-SNAPSHOT "), "1.0-SNAPSHOT");
        assert!(!is_range("1.0"));
    }

    #[test]
    fn test_closed_range_takes_upper_bound() {
        assert_eq!(simplify_range("[1.0,2.0]"), "2.0");
        assert_eq!(simplify_range("[1.0, 2.0]"), "2.0");
    }

    #[test]
    fn test_exact_pin() {
        assert_eq!(simplify_range("[1.5]"), "1.5");
    }

    #[test]
    fn test_open_upper_bound_takes_lower() {
        assert_eq!(simplify_range("[1.0,"), "1.0");
        assert_eq!(simplify_range("[1.0,)"), "1.0");
    }

    #[test]
    fn test_open_lower_bound() {
        assert_eq!(simplify_range("(,2.0]"), "2.0");
    }

    #[test]
    fn test_multiple_ranges() {
        assert_eq!(simplify_range("[1.0,2.0),[3.0,4.0)"), "4.0");
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(simplify_range("[,]"), "");
    }
}
