//! Cursor over an already tokenized statement, shared by the structural parsers.

use alloc::string::String;
use alloc::vec::Vec;

use crate::token::{Token, TokenKind};

/// Forward-only position in a token slice.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> Cursor<'t, 'a> {
    pub(crate) fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(crate) fn peek(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn advance(&mut self) -> Option<&'t Token<'a>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Tokens not consumed yet.
    pub(crate) fn remaining(&self) -> &'t [Token<'a>] {
        &self.tokens[self.pos..]
    }

    pub(crate) fn peek_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    pub(crate) fn peek_word(&self, word: &str) -> bool {
        self.peek().is_some_and(|t| t.is_word(word))
    }

    /// Consume the next token if it is `word`.
    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        let matched = self.peek_word(word);
        if matched {
            self.pos += 1;
        }
        matched
    }

    /// Consume `words` if they all follow in order; consume nothing otherwise.
    pub(crate) fn eat_words(&mut self, words: &[&str]) -> bool {
        let Some(candidates) = self.tokens.get(self.pos..self.pos + words.len()) else {
            return false;
        };
        let matched = candidates.iter().zip(words).all(|(t, w)| t.is_word(w));
        if matched {
            self.pos += words.len();
        }
        matched
    }

    pub(crate) fn eat_kind(&mut self, kind: TokenKind) -> bool {
        let matched = self.peek_kind(kind);
        if matched {
            self.pos += 1;
        }
        matched
    }

    /// Consume the next token if it can name a schema object and return its value.
    pub(crate) fn eat_name(&mut self) -> Option<String> {
        let token = self.peek().filter(|t| is_name(t))?;
        self.pos += 1;
        Some(token.value().into_owned())
    }

    /// Consume `name` or `schema.name`, returning `(schema, name)`.
    pub(crate) fn eat_qualified_name(&mut self) -> (Option<String>, Option<String>) {
        let first = self.eat_name();
        if first.is_some() && self.eat_kind(TokenKind::Dot) {
            (first, self.eat_name())
        } else {
            (None, first)
        }
    }

    /// If the next token opens a parenthesis, consume through the matching
    /// close and return the tokens in between.
    ///
    /// An unbalanced group extends to the end of the slice.
    pub(crate) fn parenthesized(&mut self) -> Option<&'t [Token<'a>]> {
        if !self.peek_kind(TokenKind::LParen) {
            return None;
        }
        let open = self.pos + 1;
        let mut depth = 0usize;
        for (offset, token) in self.tokens[self.pos..].iter().enumerate() {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        let close = self.pos + offset;
                        self.pos = close + 1;
                        return Some(&self.tokens[open..close]);
                    }
                }
                _ => {}
            }
        }
        self.pos = self.tokens.len();
        Some(&self.tokens[open..])
    }

    /// Consume tokens up to, not including, the first bare `word`.
    pub(crate) fn take_until_word(&mut self, word: &str) -> &'t [Token<'a>] {
        let start = self.pos;
        while self.peek().is_some_and(|t| !t.is_word(word)) {
            self.pos += 1;
        }
        &self.tokens[start..self.pos]
    }
}

/// Whether the token can be used as the name of a table, column or constraint.
///
/// SQLite accepts string literals as names and lets many keywords, including
/// the operator words in `OPERATOR_NAMES`, double as identifiers.
pub(crate) fn is_name(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::Identifier | TokenKind::Keyword | TokenKind::Type => true,
        TokenKind::Literal => token.is_string(),
        TokenKind::Operator => OPERATOR_NAMES.iter().any(|w| token.is_word(w)),
        _ => false,
    }
}

/// Textual operators SQLite also accepts as plain identifiers.
const OPERATOR_NAMES: &[&str] = &["LIKE", "GLOB", "MATCH", "REGEXP"];

/// Split tokens on commas that are not nested inside parentheses.
///
/// Empty segments are dropped.
pub(crate) fn split_top_level<'t, 'a>(tokens: &'t [Token<'a>]) -> Vec<&'t [Token<'a>]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::Delimiter if depth == 0 => {
                if i > start {
                    parts.push(&tokens[start..i]);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    if tokens.len() > start {
        parts.push(&tokens[start..]);
    }
    parts
}

/// Column names from an indexed-column list such as `a COLLATE nocase DESC, b`.
///
/// Only the leading name of each entry is kept; expression entries are dropped.
pub(crate) fn column_names(tokens: &[Token<'_>]) -> Vec<String> {
    split_top_level(tokens)
        .into_iter()
        .filter_map(|part| part.first().filter(|t| is_name(t)))
        .map(|t| t.value().into_owned())
        .collect()
}

/// Detach a token slice from its input.
pub(crate) fn owned(tokens: &[Token<'_>]) -> Vec<Token<'static>> {
    tokens.iter().cloned().map(Token::into_owned).collect()
}
