//! Diagnostic events for the tokenizer and parsers.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! Without the feature the macros only borrow their position argument, so
//! call sites need no `#[cfg]` boilerplate.

/// Emit a trace-level event for a lexeme the tokenizer skipped or could not finish.
///
/// ```ignore
/// lexer_trace!(pos, "unterminated quoted lexeme");
/// ```
macro_rules! lexer_trace {
    ($pos:expr, $what:literal) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(pos = $pos, $what);
        #[cfg(not(feature = "tracing"))]
        let _ = &$pos;
    };
}

/// Emit a debug-level event for a statement fragment a parser gave up on.
///
/// ```ignore
/// parser_debug!(item.first().map(|t| t.pos), "skipping table item");
/// ```
macro_rules! parser_debug {
    ($pos:expr, $what:literal) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(pos = ?$pos, $what);
        #[cfg(not(feature = "tracing"))]
        let _ = &$pos;
    };
}

pub(crate) use {lexer_trace, parser_debug};
