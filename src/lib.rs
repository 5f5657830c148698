#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

mod cursor;
mod diagnostics;
pub mod errors;
pub mod keywords;
pub mod table;
#[cfg(feature = "testing")]
pub mod testing;
pub mod token;
pub mod tokenizer;
pub mod trigger;

// Re-export main types
pub use table::{
    ColumnDefinition, DEFAULT_COLLATION, ForeignKeyAction, GeneratedColumn, ParsedTableDefinition,
    TableConstraint,
};
pub use token::{Token, TokenKind, join_tokens};
pub use tokenizer::{Tokenizer, tokenize};
pub use trigger::{ParsedTriggerDefinition, TriggerEvent, TriggerEvents, TriggerTiming};

// Re-export errors
pub use errors::Error;
