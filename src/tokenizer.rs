//! Lazy tokenizer for SQLite DDL text.
//!
//! The tokenizer never fails. Characters it does not understand are skipped,
//! comments are consumed without producing tokens, and a quoted lexeme that
//! runs off the end of the input yields a single [`TokenKind::None`] token.

mod literal;
mod type_name;

use literal::{Quoted, blob_len, number_len, quoted_identifier_len, string_len};
use type_name::type_name_len;

use crate::diagnostics::lexer_trace;
use crate::keywords::is_keyword;
use crate::token::{Token, TokenKind};

/// Operators spelled as words.
const TEXT_OPERATORS: &[&str] = &[
    "AND", "OR", "NOT", "IN", "IS", "LIKE", "GLOB", "MATCH", "REGEXP",
];

/// Reserved words that denote values.
const LITERAL_KEYWORDS: &[&str] = &["NULL", "CURRENT_TIME", "CURRENT_DATE", "CURRENT_TIMESTAMP"];

/// Two-character operators, tried before their one-character prefixes.
const TWO_CHAR_OPERATORS: &[&str] = &["||", "<<", ">>", "<>", "!=", "==", ">=", "<="];

/// One-character operators.
const ONE_CHAR_OPERATORS: &[u8] = b"*/%+-&|<>=~";

/// Tokenize `input`.
///
/// The returned iterator scans lazily. Calling `tokenize` again, or cloning a
/// fresh iterator, scans the input again from the start.
///
/// # Examples
///
/// ```
/// use sqlite_ddl_reflect::{TokenKind, tokenize};
///
/// let kinds: Vec<TokenKind> = tokenize("a DOUBLE PRECISION -- size\n,").map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::Identifier, TokenKind::Type, TokenKind::Delimiter]
/// );
/// ```
#[must_use]
pub fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer::new(input)
}

/// Iterator over the tokens of a DDL string.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

/// What the dispatcher decided to do at the current position.
enum Step {
    /// Emit a token of this kind spanning this many bytes.
    Emit(TokenKind, usize),
    /// Advance this many bytes without emitting anything.
    Skip(usize),
    /// A quoted lexeme never closed; the rest of the input belongs to it.
    Unterminated,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Get the current byte position in the input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn step(rest: &str, c: char) -> Step {
        match c {
            _ if is_ident_start(c) => Self::word(rest),
            '0'..='9' => Step::Emit(TokenKind::Literal, number_len(rest)),
            '\'' => quoted(TokenKind::Literal, string_len(rest)),
            '"' | '`' | '[' => match quoted_identifier_len(rest) {
                Some(result) => quoted(TokenKind::Identifier, result),
                None => Step::Skip(1),
            },
            '.' => Step::Emit(TokenKind::Dot, 1),
            '(' => Step::Emit(TokenKind::LParen, 1),
            ')' => Step::Emit(TokenKind::RParen, 1),
            ',' => Step::Emit(TokenKind::Delimiter, 1),
            ';' => Step::Emit(TokenKind::Terminator, 1),
            '-' | '/' => match comment_len(rest) {
                Some(len) => Step::Skip(len),
                None => Self::operator(rest, c),
            },
            _ => Self::operator(rest, c),
        }
    }

    /// Letter start: blob literal, type name, textual operator, literal
    /// keyword, then plain identifier or keyword.
    fn word(rest: &str) -> Step {
        if let Some(result) = blob_len(rest) {
            return quoted(TokenKind::Literal, result);
        }
        if let Some(len) = type_name_len(rest) {
            return Step::Emit(TokenKind::Type, len);
        }
        let len = word_len(rest);
        let word = &rest[..len];
        let kind = if contains_ignore_case(TEXT_OPERATORS, word) {
            TokenKind::Operator
        } else if contains_ignore_case(LITERAL_KEYWORDS, word) {
            TokenKind::Literal
        } else if is_keyword(word) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Step::Emit(kind, len)
    }

    fn operator(rest: &str, c: char) -> Step {
        if TWO_CHAR_OPERATORS.iter().any(|op| rest.starts_with(op)) {
            return Step::Emit(TokenKind::Operator, 2);
        }
        match u8::try_from(c) {
            Ok(b) if ONE_CHAR_OPERATORS.contains(&b) => Step::Emit(TokenKind::Operator, 1),
            _ => Step::Skip(c.len_utf8()),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let rest = &self.input[start..];
            let c = rest.chars().next()?;

            match Self::step(rest, c) {
                Step::Emit(kind, len) => {
                    self.pos += len;
                    return Some(Token::new(kind, &rest[..len], start));
                }
                Step::Skip(len) => {
                    if !matches!(c, '-' | '/') {
                        lexer_trace!(start, "skipping unrecognized character");
                    }
                    self.pos += len;
                }
                Step::Unterminated => {
                    lexer_trace!(start, "unterminated quoted lexeme");
                    self.pos = self.input.len();
                    return Some(Token::new(TokenKind::None, "", start));
                }
            }
        }
    }
}

fn quoted(kind: TokenKind, result: Quoted) -> Step {
    match result {
        Quoted::Complete(len) => Step::Emit(kind, len),
        Quoted::Unterminated => Step::Unterminated,
    }
}

/// Length of a `--` or `/* */` comment at the start of `rest`.
///
/// An unclosed block comment extends to the end of the input.
fn comment_len(rest: &str) -> Option<usize> {
    if let Some(body) = rest.strip_prefix("--") {
        return Some(2 + body.find('\n').unwrap_or(body.len()));
    }
    let body = rest.strip_prefix("/*")?;
    Some(2 + body.find("*/").map_or(body.len(), |end| end + 2))
}

fn contains_ignore_case(words: &[&str], word: &str) -> bool {
    words.iter().any(|w| w.eq_ignore_ascii_case(word))
}

/// Check if a character can start an unquoted identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Check if a character can continue an unquoted identifier.
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Byte length of the run of identifier characters at the start of `rest`.
fn word_len(rest: &str) -> usize {
    rest.char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map_or(rest.len(), |(i, _)| i)
}
