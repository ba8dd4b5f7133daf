//! JavaScript parser and AST types for the enforce-direct-access workspace.
//!
//! This crate provides:
//! - `NodeArena` - Thin-node AST storage (16-byte headers + typed pools)
//! - `ParserState` - Error-recovering recursive descent parser
//! - `syntax_kind_ext` / `node_flags` - Node kinds and flags above the token range

pub mod parser;
pub use parser::{
    NodeArena, NodeIndex, NodeList, ParseDiagnostic, ParserState, node_flags, syntax_kind_ext,
};
