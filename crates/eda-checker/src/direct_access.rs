//! Direct-access checker.
//!
//! Walks a bound source file and rejects two patterns on protected paths:
//!
//! - optional chaining: `process.env?.API_KEY`, `import.meta?.env`
//! - object destructuring: `const { API_KEY } = process.env`, including the
//!   combined form `const { API_KEY } = process?.env`
//!
//! Checking stops at the first violation.

use crate::access_path::{ResolvedPath, is_optional_chain_access, resolve_access_path};
use crate::global_reference::{BindingResolver, is_global_reference};
use crate::protected_paths::ProtectedPaths;
use crate::violations::{DirectAccessViolation, ViolationKind};
use eda_common::limits::MAX_TREE_WALK_ITERATIONS;
use eda_parser::parser::node::NodeArena;
use eda_parser::{NodeIndex, node_flags, syntax_kind_ext};
use eda_scanner::SyntaxKind;
use tracing::{debug, trace};

/// Checker over one arena. Holds no per-node state; the protected paths
/// are shared read-only.
pub struct DirectAccessChecker<'a, R: BindingResolver + ?Sized> {
    arena: &'a NodeArena,
    resolver: &'a R,
    paths: &'a ProtectedPaths,
}

impl<'a, R: BindingResolver + ?Sized> DirectAccessChecker<'a, R> {
    pub fn new(arena: &'a NodeArena, resolver: &'a R, paths: &'a ProtectedPaths) -> Self {
        DirectAccessChecker {
            arena,
            resolver,
            paths,
        }
    }

    /// Check every node under `root` in pre-order.
    ///
    /// The walk runs over an explicit work stack, so arbitrarily deep
    /// expression chains are checked in full.
    #[tracing::instrument(level = "debug", skip_all, fields(root = root.0))]
    pub fn check_source_file(&self, root: NodeIndex) -> Result<(), DirectAccessViolation> {
        if self.paths.is_empty() {
            debug!("no protected paths configured");
            return Ok(());
        }

        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let Some(node) = self.arena.get(idx) else {
                continue;
            };
            trace!(idx = idx.0, kind = node.kind, "visit");

            if is_optional_chain_access(node) {
                self.check_optional_chain_access(idx)?;
            } else if node.kind == syntax_kind_ext::VARIABLE_DECLARATION {
                self.check_variable_declaration(idx)?;
            }

            // Reversed so the first child is popped next
            stack.extend(self.arena.get_children(idx).into_iter().rev());
        }
        Ok(())
    }

    /// An access that is part of an optional chain must not resolve to a
    /// protected path or one of its descendants.
    pub fn check_optional_chain_access(&self, idx: NodeIndex) -> Result<(), DirectAccessViolation> {
        if self.paths.is_empty() {
            return Ok(());
        }
        let Some(node) = self.arena.get(idx) else {
            return Ok(());
        };
        if !is_optional_chain_access(node) {
            return Ok(());
        }

        if self.is_object_destructuring_initializer(idx) {
            trace!(idx = idx.0, "left to the destructuring check");
            return Ok(());
        }

        let Some(path) = resolve_access_path(self.arena, idx) else {
            return Ok(());
        };
        if !self.is_global_base(&path, idx) {
            return Ok(());
        }

        let text = path.text();
        if let Some(matched) = self.paths.match_path(&text) {
            debug!(path = %text, matched, "optional chaining on protected path");
            return Err(DirectAccessViolation::new(
                ViolationKind::OptionalChaining,
                matched.to_string(),
                node.pos,
                node.end,
            ));
        }
        Ok(())
    }

    /// A variable declaration must not destructure a protected path out of
    /// its initializer.
    pub fn check_variable_declaration(&self, idx: NodeIndex) -> Result<(), DirectAccessViolation> {
        if self.paths.is_empty() {
            return Ok(());
        }
        let Some(node) = self.arena.get(idx) else {
            return Ok(());
        };
        let Some(decl) = self.arena.get_variable_declaration(node) else {
            return Ok(());
        };
        if decl.initializer.is_none() {
            return Ok(());
        }
        let Some(pattern_node) = self.arena.get(decl.name) else {
            return Ok(());
        };
        if pattern_node.kind != syntax_kind_ext::OBJECT_BINDING_PATTERN {
            return Ok(());
        }
        let Some(pattern) = self.arena.get_binding_pattern(pattern_node) else {
            return Ok(());
        };

        // Only the initializer's own link decides "optional"; `(a?.b).c` is not.
        let init_is_optional = self
            .arena
            .get(self.arena.skip_parentheses(decl.initializer))
            .is_some_and(|init| init.has_flag(node_flags::OPTIONAL_CHAIN));

        let Some(path) = resolve_access_path(self.arena, decl.initializer) else {
            return Ok(());
        };
        if !self.is_global_base(&path, idx) {
            return Ok(());
        }

        let init_path = path.text();
        if init_is_optional {
            if self.paths.contains(&init_path) {
                debug!(path = %init_path, "destructuring an optional chain on protected path");
                return Err(DirectAccessViolation::new(
                    ViolationKind::DestructuringWithOptional,
                    init_path,
                    node.pos,
                    node.end,
                ));
            }
            // Descendant properties are only reported for plain initializers
            return Ok(());
        }

        for &element in &pattern.elements.nodes {
            let Some(name) = self.destructured_property_name(element) else {
                continue;
            };
            let candidate = format!("{init_path}.{name}");
            if self.paths.contains(&candidate) {
                debug!(path = %candidate, "destructuring protected path");
                return Err(DirectAccessViolation::new(
                    ViolationKind::Destructuring,
                    candidate,
                    node.pos,
                    node.end,
                ));
            }
        }
        Ok(())
    }

    fn is_global_base(&self, path: &ResolvedPath, context: NodeIndex) -> bool {
        match path.base_identifier() {
            Some(base) => is_global_reference(self.resolver, self.arena, base, context),
            None => true,
        }
    }

    /// Whether `idx`, possibly wrapped in parentheses, is the initializer of
    /// a declaration that destructures into an object pattern.
    fn is_object_destructuring_initializer(&self, idx: NodeIndex) -> bool {
        let mut child = idx;
        let mut parent = self.arena.parent_of(idx);
        let mut iterations = 0;
        while let Some(parent_node) = self.arena.get(parent) {
            iterations += 1;
            if iterations > MAX_TREE_WALK_ITERATIONS {
                return false;
            }
            if parent_node.kind != syntax_kind_ext::PARENTHESIZED_EXPRESSION {
                break;
            }
            child = parent;
            parent = self.arena.parent_of(parent);
        }

        let Some(parent_node) = self.arena.get(parent) else {
            return false;
        };
        let Some(decl) = self.arena.get_variable_declaration(parent_node) else {
            return false;
        };
        decl.initializer == child
            && self
                .arena
                .kind_of(decl.name)
                .is_some_and(|kind| kind == syntax_kind_ext::OBJECT_BINDING_PATTERN)
    }

    /// Static name of a destructured property: identifier key, shorthand,
    /// or computed string key. Rest elements and other keys have none.
    fn destructured_property_name(&self, element: NodeIndex) -> Option<&'a str> {
        let arena = self.arena;
        let binding = arena.get_binding_element(arena.get(element)?)?;
        if binding.dot_dot_dot_token {
            return None;
        }

        if binding.property_name.is_none() {
            return arena.get_identifier_text(binding.name);
        }

        let key = arena.get(binding.property_name)?;
        match key.kind {
            k if k == SyntaxKind::Identifier as u16 => arena.get_identifier_text(binding.property_name),
            k if k == syntax_kind_ext::COMPUTED_PROPERTY_NAME => {
                let computed = arena.get_computed_property(key)?;
                let expr = arena.skip_parentheses(computed.expression);
                if arena.kind_of(expr) == Some(SyntaxKind::StringLiteral as u16) {
                    arena.get_literal_text(expr)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
