//! JavaScript scanner/tokenizer for the enforce-direct-access workspace.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine
//! - Keyword/punctuation classification helpers

pub mod syntax_kind;
pub use syntax_kind::*;

pub mod scanner_impl;
pub use scanner_impl::{ScannerSnapshot, ScannerState, TokenFlags};

#[cfg(test)]
#[path = "tests/syntax_kind_tests.rs"]
mod syntax_kind_tests;

#[cfg(test)]
#[path = "tests/scanner_impl_tests.rs"]
mod scanner_impl_tests;
