//! Binder state: scope construction and name lookup over a `NodeArena`.

use crate::scopes::{ContainerKind, Scope, ScopeId};
use crate::state_binding::{BindStep, BindSteps};
use crate::symbols::{SymbolArena, SymbolId};
use eda_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use eda_parser::NodeIndex;
use eda_parser::parser::node::NodeArena;
use rustc_hash::FxHashMap;
use tracing::{Level, debug, span};

/// Binder state using NodeArena.
///
/// Binding one source file produces a tree of persistent scopes. Each
/// scope-creating node is recorded in `node_scope_ids`, so the enclosing
/// scope of any node is found by walking parent pointers.
#[derive(Debug, Default)]
pub struct BinderState {
    /// Arena for symbol storage
    pub symbols: SymbolArena,
    /// All scopes; `ScopeId(0)` is the source file scope once bound
    pub scopes: Vec<Scope>,
    /// Container node -> scope it owns
    pub node_scope_ids: FxHashMap<u32, ScopeId>,
    /// Declaration name node -> symbol
    pub node_symbols: FxHashMap<u32, SymbolId>,
    pub(crate) current_scope_id: ScopeId,
}

impl BinderState {
    pub fn new() -> BinderState {
        BinderState::default()
    }

    /// Bind a parsed source file. Binding the same state twice starts over.
    #[tracing::instrument(level = "debug", skip_all, fields(root = root.0))]
    pub fn bind_source_file(&mut self, arena: &NodeArena, root: NodeIndex) {
        *self = BinderState::new();

        let Some(source_file) = arena.get_source_file_at(root) else {
            debug!("root is not a source file; nothing bound");
            return;
        };

        let mut steps = BindSteps::new();
        steps.push(BindStep::Enter(ContainerKind::SourceFile, root));
        steps.extend(source_file.statements.nodes.iter().copied().map(BindStep::Visit));
        steps.push(BindStep::Exit);
        self.run_bind_steps(arena, steps);

        debug!(
            scopes = self.scopes.len(),
            symbols = self.symbols.len(),
            "bound source file"
        );
    }

    // =========================================================================
    // Scope management
    // =========================================================================

    pub(crate) fn enter_scope(&mut self, kind: ContainerKind, node: NodeIndex) {
        let new_scope_id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(self.current_scope_id, kind, node));

        if node.is_some() {
            self.node_scope_ids.insert(node.0, new_scope_id);
        }

        self.current_scope_id = new_scope_id;
    }

    pub(crate) fn exit_scope(&mut self) {
        if let Some(scope) = self.scopes.get(self.current_scope_id.0 as usize) {
            self.current_scope_id = scope.parent;
        }
    }

    /// Nearest enclosing scope that `var` declarations land in.
    pub(crate) fn var_scope_id(&self) -> ScopeId {
        let mut scope_id = self.current_scope_id;
        let mut iterations = 0;
        while let Some(scope) = self.scopes.get(scope_id.0 as usize) {
            iterations += 1;
            if scope.kind.is_var_container() || iterations > MAX_SCOPE_WALK_ITERATIONS {
                return scope_id;
            }
            if scope.parent.is_none() {
                return scope_id;
            }
            scope_id = scope.parent;
        }
        self.current_scope_id
    }

    /// Declare `name` in the current scope.
    pub(crate) fn declare_symbol(&mut self, name: &str, flags: u32, declaration: NodeIndex) -> SymbolId {
        self.declare_symbol_in(self.current_scope_id, name, flags, declaration)
    }

    /// Declare `name` in `scope_id`, merging with an existing symbol of the
    /// same name in that scope.
    pub(crate) fn declare_symbol_in(
        &mut self,
        scope_id: ScopeId,
        name: &str,
        flags: u32,
        declaration: NodeIndex,
    ) -> SymbolId {
        let Some(scope) = self.scopes.get_mut(scope_id.0 as usize) else {
            return SymbolId::NONE;
        };

        let sym_id = match scope.table.get(name) {
            Some(existing) => existing,
            None => {
                let sym_id = self.symbols.alloc(flags, name.to_string());
                scope.table.set(name.to_string(), sym_id);
                sym_id
            }
        };

        if let Some(symbol) = self.symbols.get_mut(sym_id) {
            symbol.flags |= flags;
            symbol.declarations.push(declaration);
        }
        self.node_symbols.insert(declaration.0, sym_id);
        sym_id
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The scope owned by a container node, if it owns one.
    pub fn scope_for_node(&self, idx: NodeIndex) -> Option<ScopeId> {
        self.node_scope_ids.get(&idx.0).copied()
    }

    pub fn get_scope(&self, id: ScopeId) -> Option<&Scope> {
        if id.is_none() {
            return None;
        }
        self.scopes.get(id.0 as usize)
    }

    /// Symbol declared by a declaration name node.
    pub fn symbol_of_declaration(&self, idx: NodeIndex) -> Option<SymbolId> {
        self.node_symbols.get(&idx.0).copied()
    }

    /// Find the innermost scope containing `node_idx` by walking parent
    /// pointers. Falls back to the source file scope.
    pub fn find_enclosing_scope(&self, arena: &NodeArena, node_idx: NodeIndex) -> Option<ScopeId> {
        let mut current = node_idx;
        let mut iterations = 0;
        while current.is_some() {
            iterations += 1;
            // An acyclic parent chain never visits more nodes than the arena holds
            if iterations > arena.len() {
                debug!(node_idx = node_idx.0, "parent walk exceeded iteration limit");
                break;
            }
            if let Some(&scope_id) = self.node_scope_ids.get(&current.0) {
                return Some(scope_id);
            }
            current = arena.parent_of(current);
        }

        if self.scopes.is_empty() {
            None
        } else {
            Some(ScopeId(0))
        }
    }

    /// Resolve `name` as seen from `at`.
    ///
    /// Lookup is position-independent within a scope: a declaration later
    /// in the same block is still found.
    pub fn resolve_name(&self, arena: &NodeArena, name: &str, at: NodeIndex) -> Option<SymbolId> {
        let _span = span!(Level::DEBUG, "resolve_name", name, at = at.0).entered();

        let mut scope_id = self.find_enclosing_scope(arena, at)?;
        let mut scope_depth = 0;
        while scope_id.is_some() {
            if scope_depth > MAX_SCOPE_WALK_ITERATIONS {
                debug!(name, "scope walk exceeded iteration limit");
                return None;
            }
            let scope = self.scopes.get(scope_id.0 as usize)?;
            if let Some(sym_id) = scope.table.get(name) {
                debug!(name, scope_depth, sym_id = sym_id.0, "found binding");
                return Some(sym_id);
            }
            scope_id = scope.parent;
            scope_depth += 1;
        }

        debug!(name, "no enclosing binding");
        None
    }

    /// Resolve an identifier node to its symbol.
    pub fn resolve_identifier(&self, arena: &NodeArena, node_idx: NodeIndex) -> Option<SymbolId> {
        let name = arena.get_identifier_text(node_idx)?;
        self.resolve_name(arena, name, node_idx)
    }
}
