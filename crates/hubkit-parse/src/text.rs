//! Whitespace handling shared by the parsers.

/// Unicode `White_Space` plus the ASCII information separators
/// U+001C..=U+001F, which configuration sources also treat as blank.
pub(crate) fn is_config_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Trims [`is_config_space`] characters from both ends.
pub(crate) fn trim_value(value: &str) -> &str {
    value.trim_matches(is_config_space)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_information_separators() {
        assert_eq!(trim_value("\u{1c}true\u{1f}"), "true");
        assert_eq!(trim_value("\u{1d}\u{1e} on "), "on");
    }

    #[test]
    fn test_trims_unicode_whitespace() {
        assert_eq!(trim_value("\u{a0}yes\u{3000}"), "yes");
        assert_eq!(trim_value("\u{85}\t1\n"), "1");
    }

    #[test]
    fn test_keeps_inner_characters() {
        assert_eq!(trim_value(" a b "), "a b");
        assert_eq!(trim_value("\u{1c}"), "");
    }
}
