//! Global-reference classification.
//!
//! A path rooted in an identifier is only checked when that identifier has
//! no enclosing binding. Scope lookup is supplied by the host through
//! `BindingResolver`.

use eda_binder::BinderState;
use eda_parser::NodeIndex;
use eda_parser::parser::node::NodeArena;
use tracing::debug;

/// Result of looking a name up from some position in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingLookup {
    /// Bound by the given declaring node
    Bound(NodeIndex),
    Unbound,
}

impl BindingLookup {
    #[inline]
    pub const fn is_bound(self) -> bool {
        matches!(self, BindingLookup::Bound(_))
    }
}

/// Scope lookup capability.
pub trait BindingResolver {
    /// Look `name` up as seen from `at`. A binding anywhere in an enclosing
    /// scope counts, regardless of where in that scope it is declared.
    fn resolve_binding(&self, arena: &NodeArena, name: &str, at: NodeIndex) -> BindingLookup;
}

impl BindingResolver for BinderState {
    fn resolve_binding(&self, arena: &NodeArena, name: &str, at: NodeIndex) -> BindingLookup {
        match self.resolve_name(arena, name, at) {
            Some(sym_id) => BindingLookup::Bound(
                self.symbols
                    .get(sym_id)
                    .and_then(|symbol| symbol.declarations.first().copied())
                    .unwrap_or(NodeIndex::NONE),
            ),
            None => BindingLookup::Unbound,
        }
    }
}

/// Resolver for hosts without scope information: every name is global.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBindings;

impl BindingResolver for NoBindings {
    fn resolve_binding(&self, _arena: &NodeArena, _name: &str, _at: NodeIndex) -> BindingLookup {
        BindingLookup::Unbound
    }
}

/// Whether `base_ident` refers to a global, looked up from `context`.
///
/// Anything that is not an identifier is never global.
pub fn is_global_reference<R>(
    resolver: &R,
    arena: &NodeArena,
    base_ident: NodeIndex,
    context: NodeIndex,
) -> bool
where
    R: BindingResolver + ?Sized,
{
    let Some(name) = arena.get_identifier_text(base_ident) else {
        return false;
    };

    let lookup = resolver.resolve_binding(arena, name, context);
    if let BindingLookup::Bound(decl) = lookup {
        debug!(name, decl = decl.0, "base identifier is locally bound");
    }
    !lookup.is_bound()
}
