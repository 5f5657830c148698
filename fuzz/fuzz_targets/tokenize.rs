//! Tokenizer fuzzer.
//!
//! Every token must start after the previous one and its text must be the
//! input slice at its position.

use honggfuzz::fuzz;
use sqlite_ddl_reflect::{TokenKind, tokenize};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Ok(input) = std::str::from_utf8(data) else {
                return;
            };
            let mut last = None;
            for token in tokenize(input) {
                assert!(last.is_none_or(|pos| pos < token.pos));
                if token.kind != TokenKind::None {
                    assert_eq!(&input[token.pos..token.pos + token.text.len()], token.text);
                }
                last = Some(token.pos);
            }
        });
    }
}
