//! Catalog of type names recognized as [`TokenKind::Type`](crate::TokenKind::Type).

use super::word_len;

/// Type names written as several words. Tried before [`TYPE_NAMES`] so that
/// `DOUBLE PRECISION` is not split after `DOUBLE`.
const MULTI_WORD_TYPES: &[&[&str]] = &[
    &["DOUBLE", "PRECISION"],
    &["VARYING", "CHARACTER"],
    &["NATIVE", "CHARACTER"],
    &["UNSIGNED", "BIG", "INT"],
];

/// Single-word type names understood by SQLite's type affinity rules.
const TYPE_NAMES: &[&str] = &[
    "INT",
    "INTEGER",
    "TINYINT",
    "SMALLINT",
    "MEDIUMINT",
    "BIGINT",
    "INT2",
    "INT8",
    "CHARACTER",
    "VARCHAR",
    "NCHAR",
    "NVARCHAR",
    "TEXT",
    "CLOB",
    "BLOB",
    "REAL",
    "DOUBLE",
    "FLOAT",
    "NUMERIC",
    "DECIMAL",
    "BOOLEAN",
    "DATE",
    "DATETIME",
    "ANY",
];

/// Length in bytes of the type name at the start of `rest`, if there is one.
///
/// The words of a multi-word name may be separated by any run of whitespace;
/// the returned length covers that whitespace too.
pub(super) fn type_name_len(rest: &str) -> Option<usize> {
    MULTI_WORD_TYPES
        .iter()
        .find_map(|words| match_words(rest, words))
        .or_else(|| {
            let len = word_len(rest);
            TYPE_NAMES
                .iter()
                .any(|name| name.eq_ignore_ascii_case(&rest[..len]))
                .then_some(len)
        })
}

fn match_words(rest: &str, words: &[&str]) -> Option<usize> {
    let mut offset = 0;
    for (i, expected) in words.iter().enumerate() {
        if i > 0 {
            let tail = &rest[offset..];
            let gap = tail.len() - tail.trim_start().len();
            if gap == 0 {
                return None;
            }
            offset += gap;
        }
        let len = word_len(&rest[offset..]);
        if !rest[offset..offset + len].eq_ignore_ascii_case(expected) {
            return None;
        }
        offset += len;
    }
    Some(offset)
}
