//! Declaration binding: walks the tree, opens scopes and declares names.

use crate::scopes::ContainerKind;
use crate::state::BinderState;
use crate::symbols::symbol_flags;
use eda_common::limits::MAX_BINDING_PATTERN_DEPTH;
use eda_parser::parser::node::{Node, NodeArena};
use eda_parser::{NodeIndex, node_flags, syntax_kind_ext};
use eda_scanner::SyntaxKind;
use smallvec::SmallVec;
use tracing::trace;

type BindingNames = SmallVec<[NodeIndex; 4]>;

/// Pending binder work, popped from an explicit stack.
///
/// A container pushes `Exit` beneath its children, so scopes close in
/// the same order a recursive walk would close them.
#[derive(Clone, Copy, Debug)]
pub(crate) enum BindStep {
    Visit(NodeIndex),
    Enter(ContainerKind, NodeIndex),
    Exit,
}

/// Steps produced by one node, in source order.
pub(crate) type BindSteps = SmallVec<[BindStep; 8]>;

impl BinderState {
    /// Bind `steps` and everything they reach. The walk keeps its own work
    /// stack, so nesting depth is bounded only by the arena.
    pub(crate) fn run_bind_steps(&mut self, arena: &NodeArena, steps: BindSteps) {
        let mut stack: Vec<BindStep> = steps.into_iter().rev().collect();
        while let Some(step) = stack.pop() {
            match step {
                BindStep::Visit(idx) => {
                    let mut next = BindSteps::new();
                    self.bind_node(arena, idx, &mut next);
                    stack.extend(next.into_iter().rev());
                }
                BindStep::Enter(kind, idx) => {
                    self.enter_scope(kind, idx);
                    self.bind_scope_entry(arena, idx);
                }
                BindStep::Exit => self.exit_scope(),
            }
        }
    }

    /// Bind one node's own declarations and queue its children.
    fn bind_node(&mut self, arena: &NodeArena, idx: NodeIndex, next: &mut BindSteps) {
        if idx.is_none() {
            return;
        }

        let Some(node) = arena.get(idx) else {
            return;
        };
        trace!(idx = idx.0, kind = node.kind, "bind");

        match node.kind {
            k if k == syntax_kind_ext::VARIABLE_DECLARATION => {
                self.bind_variable_declaration(arena, node, idx, next);
            }
            k if k == syntax_kind_ext::PARAMETER => {
                self.bind_parameter(arena, node, idx, next);
            }
            k if k == syntax_kind_ext::FUNCTION_DECLARATION => {
                self.bind_function_declaration(arena, node, idx, next);
            }
            k if k == syntax_kind_ext::FUNCTION_EXPRESSION
                || k == syntax_kind_ext::ARROW_FUNCTION
                || k == syntax_kind_ext::METHOD_DECLARATION
                || k == syntax_kind_ext::GET_ACCESSOR
                || k == syntax_kind_ext::SET_ACCESSOR
                || k == syntax_kind_ext::CONSTRUCTOR =>
            {
                Self::bind_function_like(arena, node, idx, next);
            }
            k if k == syntax_kind_ext::CLASS_DECLARATION
                || k == syntax_kind_ext::CLASS_EXPRESSION =>
            {
                self.bind_class(arena, node, idx, next);
            }
            k if k == syntax_kind_ext::CLASS_STATIC_BLOCK_DECLARATION => {
                // Static blocks are a var boundary of their own
                Self::bind_container(arena, ContainerKind::Function, idx, next);
            }
            k if k == syntax_kind_ext::BLOCK
                || k == syntax_kind_ext::CASE_BLOCK
                || k == syntax_kind_ext::FOR_STATEMENT
                || k == syntax_kind_ext::FOR_IN_STATEMENT
                || k == syntax_kind_ext::FOR_OF_STATEMENT =>
            {
                Self::bind_container(arena, ContainerKind::Block, idx, next);
            }
            k if k == syntax_kind_ext::CATCH_CLAUSE => {
                Self::bind_container(arena, ContainerKind::Catch, idx, next);
            }
            k if k == syntax_kind_ext::IMPORT_DECLARATION => {
                self.bind_import_declaration(arena, node);
            }
            k if k == SyntaxKind::Identifier as u16 => {
                // References are resolved on demand
            }
            _ => {
                next.extend(arena.get_children(idx).into_iter().map(BindStep::Visit));
            }
        }
    }

    fn bind_container(arena: &NodeArena, kind: ContainerKind, idx: NodeIndex, next: &mut BindSteps) {
        next.push(BindStep::Enter(kind, idx));
        next.extend(arena.get_children(idx).into_iter().map(BindStep::Visit));
        next.push(BindStep::Exit);
    }

    /// Declarations that belong inside a freshly entered scope.
    fn bind_scope_entry(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let Some(node) = arena.get(idx) else {
            return;
        };

        if node.kind == syntax_kind_ext::CLASS_EXPRESSION {
            if let Some(class) = arena.get_class(node)
                && let Some(name) = Self::get_identifier_name(arena, class.name)
            {
                self.declare_symbol(name, symbol_flags::CLASS, class.name);
            }
            return;
        }

        let Some(func) = arena.get_function(node) else {
            return;
        };

        // A named function expression can refer to itself
        if node.kind == syntax_kind_ext::FUNCTION_EXPRESSION
            && let Some(name) = Self::get_identifier_name(arena, func.name)
        {
            self.declare_symbol(name, symbol_flags::FUNCTION, func.name);
        }

        // A block body shares the function's scope
        if arena.kind_of(func.body) == Some(syntax_kind_ext::BLOCK) {
            self.node_scope_ids.insert(func.body.0, self.current_scope_id);
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub(crate) fn bind_variable_declaration(
        &mut self,
        arena: &NodeArena,
        node: &Node,
        idx: NodeIndex,
        next: &mut BindSteps,
    ) {
        let Some(decl) = arena.get_variable_declaration(node) else {
            return;
        };

        let parent = arena.parent_of(idx);
        let parent_node = arena.get(parent);
        let is_catch_variable =
            parent_node.is_some_and(|p| p.kind == syntax_kind_ext::CATCH_CLAUSE);
        let is_block_scoped = parent_node.is_some_and(|p| {
            p.kind == syntax_kind_ext::VARIABLE_DECLARATION_LIST
                && p.has_flag(node_flags::BLOCK_SCOPED)
        });

        let (flags, scope_id) = if is_catch_variable {
            (symbol_flags::CATCH_VARIABLE, self.current_scope_id)
        } else if is_block_scoped {
            (symbol_flags::BLOCK_SCOPED_VARIABLE, self.current_scope_id)
        } else {
            (symbol_flags::FUNCTION_SCOPED_VARIABLE, self.var_scope_id())
        };

        let mut names = BindingNames::new();
        Self::collect_binding_identifiers(arena, decl.name, &mut names);
        for ident_idx in names {
            if let Some(name) = Self::get_identifier_name(arena, ident_idx) {
                trace!(name, flags, "declare variable");
                self.declare_symbol_in(scope_id, name, flags, ident_idx);
            }
        }

        // Defaults and computed keys inside the pattern, then the initializer
        next.push(BindStep::Visit(decl.name));
        next.push(BindStep::Visit(decl.initializer));
    }

    #[tracing::instrument(level = "trace", skip(self, arena, node, next), fields(param_idx = idx.0))]
    pub(crate) fn bind_parameter(
        &mut self,
        arena: &NodeArena,
        node: &Node,
        idx: NodeIndex,
        next: &mut BindSteps,
    ) {
        let Some(param) = arena.get_parameter(node) else {
            return;
        };

        let mut names = BindingNames::new();
        Self::collect_binding_identifiers(arena, param.name, &mut names);
        for ident_idx in names {
            if let Some(name) = Self::get_identifier_name(arena, ident_idx) {
                self.declare_symbol(name, symbol_flags::PARAMETER, ident_idx);
            }
        }

        next.push(BindStep::Visit(param.name));
        next.push(BindStep::Visit(param.initializer));
    }

    pub(crate) fn bind_function_declaration(
        &mut self,
        arena: &NodeArena,
        node: &Node,
        idx: NodeIndex,
        next: &mut BindSteps,
    ) {
        let Some(func) = arena.get_function(node) else {
            return;
        };

        // Function declarations are block-scoped in modules
        if let Some(name) = Self::get_identifier_name(arena, func.name) {
            self.declare_symbol(name, symbol_flags::FUNCTION, func.name);
        }

        next.push(BindStep::Enter(ContainerKind::Function, idx));
        next.extend(func.parameters.nodes.iter().copied().map(BindStep::Visit));
        Self::push_function_body(arena, func.body, next);
        next.push(BindStep::Exit);
    }

    /// Function expressions, arrows, methods, accessors and constructors.
    pub(crate) fn bind_function_like(
        arena: &NodeArena,
        node: &Node,
        idx: NodeIndex,
        next: &mut BindSteps,
    ) {
        let Some(func) = arena.get_function(node) else {
            return;
        };

        if node.kind != syntax_kind_ext::FUNCTION_EXPRESSION {
            // Computed member names are evaluated outside the member
            next.push(BindStep::Visit(func.name));
        }

        next.push(BindStep::Enter(ContainerKind::Function, idx));
        next.extend(func.parameters.nodes.iter().copied().map(BindStep::Visit));
        Self::push_function_body(arena, func.body, next);
        next.push(BindStep::Exit);
    }

    /// Statements of a block body are queued directly; a concise arrow body
    /// is bound as an expression.
    fn push_function_body(arena: &NodeArena, body: NodeIndex, next: &mut BindSteps) {
        let Some(body_node) = arena.get(body) else {
            return;
        };

        if body_node.kind == syntax_kind_ext::BLOCK
            && let Some(block) = arena.get_block(body_node)
        {
            next.extend(block.statements.nodes.iter().copied().map(BindStep::Visit));
        } else {
            next.push(BindStep::Visit(body));
        }
    }

    pub(crate) fn bind_class(
        &mut self,
        arena: &NodeArena,
        node: &Node,
        idx: NodeIndex,
        next: &mut BindSteps,
    ) {
        let Some(class) = arena.get_class(node) else {
            return;
        };

        if node.kind == syntax_kind_ext::CLASS_DECLARATION
            && let Some(name) = Self::get_identifier_name(arena, class.name)
        {
            self.declare_symbol(name, symbol_flags::CLASS, class.name);
        }

        // A class expression's own name is declared on entry
        next.push(BindStep::Enter(ContainerKind::Class, idx));
        next.push(BindStep::Visit(class.heritage));
        next.extend(class.members.nodes.iter().copied().map(BindStep::Visit));
        next.push(BindStep::Exit);
    }

    /// Default, namespace and named import bindings.
    pub(crate) fn bind_import_declaration(&mut self, arena: &NodeArena, node: &Node) {
        let Some(import) = arena.get_import_decl(node) else {
            return;
        };
        let Some(clause) = arena
            .get(import.import_clause)
            .and_then(|n| arena.get_import_clause(n))
        else {
            return;
        };

        if let Some(name) = Self::get_identifier_name(arena, clause.name) {
            self.declare_symbol(name, symbol_flags::ALIAS, clause.name);
        }

        let Some(bindings_node) = arena.get(clause.named_bindings) else {
            return;
        };
        let Some(bindings) = arena.get_named_imports(bindings_node) else {
            return;
        };

        if bindings_node.kind == syntax_kind_ext::NAMESPACE_IMPORT {
            if let Some(name) = Self::get_identifier_name(arena, bindings.name) {
                self.declare_symbol(name, symbol_flags::ALIAS, bindings.name);
            }
            return;
        }

        for &specifier_idx in &bindings.elements.nodes {
            if let Some(specifier) = arena
                .get(specifier_idx)
                .and_then(|n| arena.get_specifier(n))
                && let Some(name) = Self::get_identifier_name(arena, specifier.name)
            {
                self.declare_symbol(name, symbol_flags::ALIAS, specifier.name);
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Get identifier name from a node index.
    pub(crate) fn get_identifier_name(arena: &NodeArena, idx: NodeIndex) -> Option<&str> {
        if let Some(node) = arena.get(idx)
            && let Some(id) = arena.get_identifier(node)
        {
            return Some(&id.escaped_text);
        }
        None
    }

    /// Flatten a binding name (identifier or nested pattern) into the
    /// identifiers it declares.
    pub(crate) fn collect_binding_identifiers(
        arena: &NodeArena,
        idx: NodeIndex,
        out: &mut BindingNames,
    ) {
        Self::collect_binding_identifiers_at_depth(arena, idx, out, 0);
    }

    fn collect_binding_identifiers_at_depth(
        arena: &NodeArena,
        idx: NodeIndex,
        out: &mut BindingNames,
        depth: u32,
    ) {
        if idx.is_none() || depth > MAX_BINDING_PATTERN_DEPTH {
            return;
        }

        let Some(node) = arena.get(idx) else {
            return;
        };

        match node.kind {
            k if k == SyntaxKind::Identifier as u16 => {
                out.push(idx);
            }
            k if k == syntax_kind_ext::BINDING_ELEMENT => {
                if let Some(binding) = arena.get_binding_element(node) {
                    Self::collect_binding_identifiers_at_depth(arena, binding.name, out, depth + 1);
                }
            }
            k if k == syntax_kind_ext::OBJECT_BINDING_PATTERN
                || k == syntax_kind_ext::ARRAY_BINDING_PATTERN =>
            {
                if let Some(pattern) = arena.get_binding_pattern(node) {
                    for &elem in &pattern.elements.nodes {
                        Self::collect_binding_identifiers_at_depth(arena, elem, out, depth + 1);
                    }
                }
            }
            _ => {}
        }
    }
}
