//! TEXT value escaping (RFC 5545 section 3.3.11).

/// Escape `input` for use as a TEXT property value.
///
/// Backslashes are escaped first so the backslashes introduced for the other
/// characters are not escaped again. Line breaks become `\n`; any other
/// ASCII control character except HTAB is dropped.
pub fn escape_text(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace(['\n', '\r'], "\\n")
        .chars()
        .filter(|&c| c == '\t' || !c.is_ascii_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_text("Mathe Übung 1"), "Mathe Übung 1");
    }

    #[test]
    fn test_escapes_special_characters() {
        assert_eq!(
            escape_text("a,b;c\\d\ne"),
            r"a\,b\;c\\d\ne",
            "comma, semicolon, backslash and newline must all be escaped"
        );
    }

    #[test]
    fn test_backslash_is_not_double_escaped() {
        // A backslash followed by a semicolon
        assert_eq!(escape_text(r"\;"), r"\\\;");
    }

    #[test]
    fn test_line_break_variants() {
        assert_eq!(escape_text("a\r\nb"), r"a\nb");
        assert_eq!(escape_text("a\nb"), r"a\nb");
        assert_eq!(escape_text("a\rb"), r"a\nb");
        assert_eq!(escape_text("a\r\n\r\nb"), r"a\n\nb");
    }

    #[test]
    fn test_drops_other_control_characters() {
        assert_eq!(escape_text("a\u{0B}b\u{0}c\u{7F}d"), "abcd");
        assert_eq!(escape_text("Spalte\tWert"), "Spalte\tWert", "HTAB is allowed in TEXT");
    }

    #[test]
    fn test_output_has_no_control_characters() {
        let escaped = escape_text("line one\r\nline two\nline three");
        assert!(!escaped.contains(['\r', '\n']), "got {escaped:?}");
    }
}
