//! Access path resolution.
//!
//! Reconstructs the dotted path denoted by a member-access chain such as
//! `process.env["API_KEY"]` or `import.meta?.env.MODE`, provided every link
//! is statically known.

use eda_common::limits::MAX_OPTIONAL_CHAIN_DEPTH;
use eda_parser::parser::node::{Node, NodeArena};
use eda_parser::{NodeIndex, node_flags, syntax_kind_ext};
use eda_scanner::SyntaxKind;
use smallvec::SmallVec;
use std::fmt;
use tracing::trace;

/// Root of a resolved access path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathBase {
    /// A plain identifier; carries the node used for scope lookup
    Identifier(NodeIndex),
    /// `import.meta` or `new.target`, which have no binding
    MetaProperty,
}

/// A fully static access path, segments in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPath {
    pub segments: SmallVec<[String; 4]>,
    pub base: PathBase,
    /// Some link in the chain was written with `?.`
    pub has_optional_chain: bool,
}

impl ResolvedPath {
    /// Segments joined with `.`.
    pub fn text(&self) -> String {
        self.segments.join(".")
    }

    pub fn base_identifier(&self) -> Option<NodeIndex> {
        match self.base {
            PathBase::Identifier(idx) => Some(idx),
            PathBase::MetaProperty => None,
        }
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// Whether `node` is a property or element access that is part of an
/// optional chain.
#[inline]
pub fn is_optional_chain_access(node: &Node) -> bool {
    (node.kind == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
        || node.kind == syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION)
        && node.has_flag(node_flags::OPTIONAL_CHAIN)
}

/// Resolve the dotted path of `expr`.
///
/// Walks from the outermost access inward. Returns `None` when any link is
/// dynamic (a non-string element key) or the chain is rooted in anything
/// other than an identifier or a meta-property.
pub fn resolve_access_path(arena: &NodeArena, expr: NodeIndex) -> Option<ResolvedPath> {
    // Collected innermost-last, reversed at the end
    let mut segments: SmallVec<[String; 4]> = SmallVec::new();
    let mut has_optional_chain = false;
    let mut current = expr;
    let mut steps = 0;

    let base = loop {
        steps += 1;
        if steps > MAX_OPTIONAL_CHAIN_DEPTH {
            trace!(expr = expr.0, "access chain too deep to resolve");
            return None;
        }

        let node = arena.get(current)?;
        match node.kind {
            k if k == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION => {
                let access = arena.get_access_expr(node)?;
                let name_node = arena.get(access.name_or_argument)?;
                if name_node.kind != SyntaxKind::Identifier as u16 {
                    // Private names never form a protected path
                    return None;
                }
                let name = arena.get_identifier(name_node)?;
                segments.push(name.escaped_text.clone());
                has_optional_chain |= access.question_dot_token;
                current = access.expression;
            }
            k if k == syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => {
                let access = arena.get_access_expr(node)?;
                let key_node = arena.get(access.name_or_argument)?;
                if key_node.kind != SyntaxKind::StringLiteral as u16 {
                    trace!(expr = expr.0, "dynamic element key");
                    return None;
                }
                let key = arena.get_literal(key_node)?;
                segments.push(key.text.clone());
                has_optional_chain |= access.question_dot_token;
                current = access.expression;
            }
            k if k == syntax_kind_ext::PARENTHESIZED_EXPRESSION => {
                current = arena.get_parenthesized(node)?.expression;
            }
            k if k == SyntaxKind::Identifier as u16 => {
                let name = arena.get_identifier(node)?;
                segments.push(name.escaped_text.clone());
                break PathBase::Identifier(current);
            }
            k if k == syntax_kind_ext::META_PROPERTY => {
                let meta = arena.get_meta_property(node)?;
                let keyword = match meta.keyword_token {
                    k if k == SyntaxKind::ImportKeyword as u16 => "import",
                    k if k == SyntaxKind::NewKeyword as u16 => "new",
                    _ => return None,
                };
                let name = arena.get_identifier_text(meta.name)?;
                segments.push(name.to_string());
                segments.push(keyword.to_string());
                break PathBase::MetaProperty;
            }
            _ => return None,
        }
    };

    segments.reverse();
    Some(ResolvedPath {
        segments,
        base,
        has_optional_chain,
    })
}
