//! Scope builder for the enforce-direct-access workspace.
//!
//! This crate provides:
//! - `BinderState` - builds persistent scopes over a parsed `NodeArena`
//! - `Symbol` / `SymbolArena` / `SymbolTable` - declared names
//! - `Scope` / `ScopeId` / `ContainerKind` - the scope tree
//!
//! Name lookup (`BinderState::resolve_name`) walks parent pointers from any
//! node to its innermost scope, then up the scope chain.

pub mod scopes;
pub use scopes::{ContainerKind, Scope, ScopeId};

pub mod symbols;
pub use symbols::{Symbol, SymbolArena, SymbolId, SymbolTable, symbol_flags};

pub mod state;
pub use state::BinderState;

mod state_binding;
