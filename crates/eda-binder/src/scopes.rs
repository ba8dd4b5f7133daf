//! Persistent scopes.
//!
//! Scopes outlive the binding walk so that name lookups can be answered
//! later, from any node, without replaying the traversal.

use crate::symbols::SymbolTable;
use eda_parser::NodeIndex;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const NONE: ScopeId = ScopeId(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for ScopeId {
    fn default() -> Self {
        ScopeId::NONE
    }
}

/// The kind of node that owns a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ContainerKind {
    SourceFile,
    /// Functions, arrows, methods, accessors, constructors and class static blocks
    Function,
    /// Blocks, loops with a declaration head, and case blocks
    Block,
    Catch,
    Class,
}

impl ContainerKind {
    /// Whether `var` declarations stop at this scope.
    #[inline]
    pub const fn is_var_container(self) -> bool {
        matches!(self, ContainerKind::SourceFile | ContainerKind::Function)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Scope {
    pub parent: ScopeId,
    pub kind: ContainerKind,
    pub container_node: NodeIndex,
    pub table: SymbolTable,
}

impl Scope {
    pub fn new(parent: ScopeId, kind: ContainerKind, container_node: NodeIndex) -> Scope {
        Scope {
            parent,
            kind,
            container_node,
            table: SymbolTable::new(),
        }
    }
}
