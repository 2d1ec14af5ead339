//! Repair of double-encoded upstream text.
//!
//! Campus Dual sometimes serves UTF-8 that was decoded as Latin-1 and encoded
//! again, so "Übung" arrives as "Ãœbung". The fix is the inverse: take every
//! code point as one Latin-1 byte and decode those bytes as UTF-8.

use std::borrow::Cow;

/// Characters that only show up in text when it has been mangled.
const MOJIBAKE_MARKERS: &[char] = &['Ã', 'Â', '\u{FFFD}'];

/// Text mangled more often than this is left as far as it got.
const MAX_REPAIR_ROUNDS: usize = 8;

/// Fix mojibake in `input`, returning it untouched when there is nothing to
/// fix or when the repair would not produce valid UTF-8.
///
/// Text that went through the mangling more than once is unwrapped layer by
/// layer until no markers are left, so repairing the result again is a no-op.
pub fn repair_mojibake(input: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(input);
    for _ in 0..MAX_REPAIR_ROUNDS {
        match repair_layer(&current) {
            Some(repaired) => current = Cow::Owned(repaired),
            None => break,
        }
    }
    current
}

/// Undo one round of mangling, or `None` if there is nothing (left) to undo.
fn repair_layer(input: &str) -> Option<String> {
    if !input.contains(MOJIBAKE_MARKERS) {
        return None;
    }

    // Anything above U+00FF cannot have come from a Latin-1 byte
    let bytes: Vec<u8> = input
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect::<Option<_>>()?;

    let repaired = String::from_utf8(bytes).ok()?;
    (repaired != input).then_some(repaired)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mangle text the way the upstream does: UTF-8 bytes read as Latin-1.
    fn mangle(s: &str) -> String {
        s.bytes().map(char::from).collect()
    }

    #[test]
    fn test_clean_text_is_borrowed() {
        let input = "Mathematik Übung für Anfänger";
        assert!(matches!(repair_mojibake(input), Cow::Borrowed(_)));
        assert_eq!(repair_mojibake(input), input);
    }

    #[test]
    fn test_repairs_double_encoded_umlauts() {
        let mangled = mangle("Übung Größe");
        assert_eq!(mangled, "Ã\u{9c}bung GrÃ¶Ã\u{9f}e");
        assert_eq!(repair_mojibake(&mangled), "Übung Größe");
    }

    #[test]
    fn test_repairs_non_breaking_space() {
        // U+00A0 encodes as C2 A0, which reads back as "Â\u{a0}"
        let mangled = mangle("Raum\u{a0}1");
        assert!(mangled.contains('Â'));
        assert_eq!(repair_mojibake(&mangled), "Raum\u{a0}1");
    }

    #[test]
    fn test_invalid_utf8_returns_original() {
        // A lone lead byte is not valid UTF-8 after reinterpretation
        let input = "Ã alone";
        assert_eq!(repair_mojibake(input), input);
    }

    #[test]
    fn test_replacement_char_returns_original() {
        let input = "Gr\u{FFFD}\u{FFFD}e";
        assert_eq!(repair_mojibake(input), input);
    }

    #[test]
    fn test_repairs_repeated_mangling() {
        assert_eq!(repair_mojibake(&mangle(&mangle("Übung"))), "Übung");
        assert_eq!(
            repair_mojibake(&mangle(&mangle(&mangle("Prüfung Größe")))),
            "Prüfung Größe"
        );
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "plain ascii",
            "Übung",
            &mangle("Prüfungsvorbereitung – Übung"),
            &mangle(&mangle("Übung")),
            &mangle(&mangle(&mangle("Größe"))),
            "Ã alone",
            "Â",
        ] {
            let once = repair_mojibake(input).into_owned();
            let twice = repair_mojibake(&once).into_owned();
            assert_eq!(once, twice, "repair is not idempotent for {input:?}");
        }
    }
}
