//! Token model shared by the tokenizer and the structural parsers.

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt::{self, Display};

/// A token produced by the tokenizer.
///
/// `text` is the exact source substring: quotes are kept and escape sequences
/// are not undone. Use [`Token::value`] to obtain the logical value of a quoted
/// identifier or string literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token<'a> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The source text of the token.
    pub text: Cow<'a, str>,
    /// Byte offset in the input where this token starts.
    pub pos: usize,
}

/// The different kinds of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// Reserved word such as `CREATE`, `PRIMARY` or `REFERENCES`.
    Keyword,
    /// Plain or quoted identifier.
    Identifier,
    /// Numeric, string or blob literal, or one of `NULL`, `CURRENT_TIME`,
    /// `CURRENT_DATE`, `CURRENT_TIMESTAMP`.
    Literal,
    /// Symbolic (`<=`, `||`, ...) or textual (`AND`, `LIKE`, ...) operator.
    Operator,
    /// Comma.
    Delimiter,
    /// Period separating qualified names.
    Dot,
    /// Left parenthesis.
    LParen,
    /// Right parenthesis.
    RParen,
    /// Semicolon.
    Terminator,
    /// Type name, possibly spanning several words (`DOUBLE PRECISION`).
    Type,
    /// Placeholder for a lexeme that could not be completed, such as an
    /// unterminated string. Parsers skip these.
    None,
}

impl<'a> Token<'a> {
    /// Create a token borrowing its text from the input.
    #[must_use]
    pub fn new(kind: TokenKind, text: &'a str, pos: usize) -> Self {
        Self {
            kind,
            text: Cow::Borrowed(text),
            pos,
        }
    }

    /// Detach the token from the input it was produced from.
    #[must_use]
    pub fn into_owned(self) -> Token<'static> {
        Token {
            kind: self.kind,
            text: Cow::Owned(self.text.into_owned()),
            pos: self.pos,
        }
    }

    /// Whether this token is the bare word `word`, compared case-insensitively.
    ///
    /// Quoted identifiers never match since their text includes the quotes.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        matches!(
            self.kind,
            TokenKind::Keyword
                | TokenKind::Identifier
                | TokenKind::Operator
                | TokenKind::Literal
                | TokenKind::Type
        ) && self.text.eq_ignore_ascii_case(word)
    }

    /// Whether the token is a string literal (`'...'`).
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.kind == TokenKind::Literal && self.text.starts_with('\'')
    }

    /// The logical value of the token.
    ///
    /// Quoted identifiers lose their quotes and have doubled quote characters
    /// collapsed (`[...]` has no escape convention). String literals are
    /// unescaped the same way. Every other token yields its text unchanged.
    #[must_use]
    pub fn value(&self) -> Cow<'_, str> {
        let text: &str = &self.text;
        match (self.kind, text.as_bytes().first()) {
            (TokenKind::Identifier, Some(b'"')) => unquote(text, '"'),
            (TokenKind::Identifier, Some(b'`')) => unquote(text, '`'),
            (TokenKind::Identifier, Some(b'[')) => Cow::Borrowed(
                text.strip_prefix('[')
                    .and_then(|t| t.strip_suffix(']'))
                    .unwrap_or(text),
            ),
            (TokenKind::Literal, Some(b'\'')) => unquote(text, '\''),
            _ => Cow::Borrowed(text),
        }
    }
}

/// Strip the surrounding `quote` characters and collapse doubled quotes.
fn unquote(text: &str, quote: char) -> Cow<'_, str> {
    let inner = text
        .strip_prefix(quote)
        .and_then(|t| t.strip_suffix(quote))
        .unwrap_or(text);
    if !inner.contains(quote) {
        return Cow::Borrowed(inner);
    }
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        value.push(c);
        if c == quote && chars.peek() == Some(&quote) {
            chars.next();
        }
    }
    Cow::Owned(value)
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Join token texts with single spaces, the rendering used for CHECK and
/// DEFAULT expressions.
#[must_use]
pub fn join_tokens(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&token.text);
    }
    out
}
