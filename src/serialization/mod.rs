//! Helpers for persisting a trained tokenizer as plain text.

pub mod text;

pub use text::{save_vocab_and_merges, write_merges, write_vocab};
