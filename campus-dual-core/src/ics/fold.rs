//! Content line folding (RFC 5545 section 3.1).

use std::borrow::Cow;

use crate::constants::MAX_LINE_OCTETS;

const LINE_BREAK: &str = "\r\n";
const CONTINUATION: &str = "\r\n ";

/// Fold every CRLF-separated line of `text`.
pub fn fold_lines(text: &str) -> String {
    text.split(LINE_BREAK)
        .map(fold_line)
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

/// Fold one content line so that no physical line exceeds 75 octets.
///
/// Continuation lines start with a single space, which counts towards their
/// 75 octets. Splits only happen on character boundaries, so a segment may
/// end up a few bytes short of the limit.
pub fn fold_line(line: &str) -> Cow<'_, str> {
    if line.len() <= MAX_LINE_OCTETS {
        return Cow::Borrowed(line);
    }

    let mut folded = String::with_capacity(line.len() + (line.len() / (MAX_LINE_OCTETS - 1) + 1) * 3);
    let mut rest = line;
    let mut budget = MAX_LINE_OCTETS;

    while rest.len() > budget {
        let mut cut = budget;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }

        let (segment, tail) = rest.split_at(cut);
        folded.push_str(segment);
        folded.push_str(CONTINUATION);
        rest = tail;
        budget = MAX_LINE_OCTETS - 1;
    }
    folded.push_str(rest);

    Cow::Owned(folded)
}
