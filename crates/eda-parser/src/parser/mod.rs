//! Thin-node parser.
//!
//! `ParserState` produces a `NodeArena`: 16-byte node headers plus typed data
//! pools, with a parent link for every node.

pub mod base;
pub mod flags;
pub mod node;
mod node_access;
mod node_arena;
pub mod state;
mod state_expressions;
mod state_statements;

pub use base::{NodeIndex, NodeList};
pub use flags::{node_flags, syntax_kind_ext};
pub use node::{ExtendedNodeInfo, Node, NodeArena};
pub use state::{ParseDiagnostic, ParserState};

#[cfg(test)]
#[path = "../../tests/parser_tests.rs"]
mod parser_tests;

#[cfg(test)]
#[path = "../../tests/state_statement_tests.rs"]
mod state_statement_tests;

#[cfg(test)]
#[path = "../../tests/state_expression_tests.rs"]
mod state_expression_tests;
