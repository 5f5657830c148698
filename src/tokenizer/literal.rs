//! Numeric, string, blob and quoted-identifier sub-grammars.
//!
//! Each function receives the remaining input starting at the first character
//! of the lexeme and returns its length in bytes. Nothing is decoded.

/// Outcome of scanning a quoted lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Quoted {
    /// The lexeme is complete and spans this many bytes, quotes included.
    Complete(usize),
    /// The input ended before the closing quote.
    Unterminated,
}

/// Length of a numeric literal: decimal integer, decimal with fraction,
/// hexadecimal (`0x1F`), each non-hex form optionally followed by an exponent.
pub(super) fn number_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    if bytes.len() > 2
        && bytes[0] == b'0'
        && matches!(bytes[1], b'x' | b'X')
        && bytes[2].is_ascii_hexdigit()
    {
        return 2 + run_len(&bytes[2..], u8::is_ascii_hexdigit);
    }

    let mut len = run_len(bytes, u8::is_ascii_digit);
    if bytes.get(len) == Some(&b'.') {
        len += 1;
        len += run_len(&bytes[len..], u8::is_ascii_digit);
    }
    len + exponent_len(&bytes[len..])
}

/// Length of an `E[+-]digits` suffix, or zero when no digits follow.
fn exponent_len(bytes: &[u8]) -> usize {
    if !matches!(bytes.first(), Some(b'e' | b'E')) {
        return 0;
    }
    let sign = usize::from(matches!(bytes.get(1), Some(b'+' | b'-')));
    match run_len(&bytes[1 + sign..], u8::is_ascii_digit) {
        0 => 0,
        digits => 1 + sign + digits,
    }
}

fn run_len(bytes: &[u8], pred: fn(&u8) -> bool) -> usize {
    bytes.iter().take_while(|&b| pred(b)).count()
}

/// Scan a lexeme opened by the first byte of `rest` and closed by `close`.
///
/// When `doubled_escape` is set a doubled closing character stands for one
/// literal occurrence and does not end the lexeme. All quote characters are
/// ASCII, so scanning bytes never splits a UTF-8 sequence.
pub(super) fn quoted_len(rest: &str, close: u8, doubled_escape: bool) -> Quoted {
    let bytes = rest.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == close {
            if doubled_escape && bytes.get(i + 1) == Some(&close) {
                i += 2;
                continue;
            }
            return Quoted::Complete(i + 1);
        }
        i += 1;
    }
    Quoted::Unterminated
}

/// String literal `'...'` with `''` escapes.
pub(super) fn string_len(rest: &str) -> Quoted {
    quoted_len(rest, b'\'', true)
}

/// Blob literal `X'...'`, if `rest` starts with one.
pub(super) fn blob_len(rest: &str) -> Option<Quoted> {
    let bytes = rest.as_bytes();
    if !matches!(bytes.first(), Some(b'x' | b'X')) || bytes.get(1) != Some(&b'\'') {
        return None;
    }
    Some(match string_len(&rest[1..]) {
        Quoted::Complete(len) => Quoted::Complete(len + 1),
        Quoted::Unterminated => Quoted::Unterminated,
    })
}

/// Identifier quoted with `"`, `` ` `` or `[`, if `rest` starts with one.
///
/// Double quotes and backticks escape by doubling; brackets have no escape.
pub(super) fn quoted_identifier_len(rest: &str) -> Option<Quoted> {
    match rest.as_bytes().first()? {
        b'"' => Some(quoted_len(rest, b'"', true)),
        b'`' => Some(quoted_len(rest, b'`', true)),
        b'[' => Some(quoted_len(rest, b']', false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_len() {
        assert_eq!(number_len("42,"), 2);
        assert_eq!(number_len("3.14)"), 4);
        assert_eq!(number_len("1e10 "), 4);
        assert_eq!(number_len("1.5E-3"), 6);
        assert_eq!(number_len("2.e+7"), 5);
        assert_eq!(number_len("0x1Fg"), 4);
        assert_eq!(number_len("7."), 2);
    }

    #[test]
    fn test_exponent_requires_digits() {
        assert_eq!(number_len("1e"), 1);
        assert_eq!(number_len("1E+x"), 1);
        assert_eq!(number_len("10end"), 2);
    }

    #[test]
    fn test_hex_requires_digit() {
        // `0x` without hex digits is the integer 0 followed by an identifier.
        assert_eq!(number_len("0xg"), 1);
    }

    #[test]
    fn test_string_len() {
        assert_eq!(string_len("'abc' rest"), Quoted::Complete(5));
        assert_eq!(string_len("'it''s'"), Quoted::Complete(7));
        assert_eq!(string_len("'''"), Quoted::Unterminated);
        assert_eq!(string_len("'open"), Quoted::Unterminated);
    }

    #[test]
    fn test_blob_len() {
        assert_eq!(blob_len("X'DEADBEEF',"), Some(Quoted::Complete(11)));
        assert_eq!(blob_len("x'00"), Some(Quoted::Unterminated));
        assert_eq!(blob_len("xyz"), None);
    }

    #[test]
    fn test_quoted_identifier_escapes() {
        assert_eq!(quoted_identifier_len("\"a\"\"b\""), Some(Quoted::Complete(6)));
        assert_eq!(quoted_identifier_len("`a``b`"), Some(Quoted::Complete(6)));
        // Brackets close at the first `]`.
        assert_eq!(quoted_identifier_len("[a]]b]"), Some(Quoted::Complete(3)));
        assert_eq!(quoted_identifier_len("[a"), Some(Quoted::Unterminated));
        assert_eq!(quoted_identifier_len("a"), None);
    }
}
