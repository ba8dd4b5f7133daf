//! Centralized limits and thresholds.
//!
//! These bound the recursive descent of the parser and the short walks
//! of the binder and checker. Whole-tree walks in the binder and checker
//! use explicit work stacks and carry no depth limit.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth the parser descends into before reporting an error.
///
/// # JavaScript example
///
/// ```javascript
/// // Deeply nested parentheses / arrays / object literals:
/// const x = ((((((((((((((((((((1))))))))))))))))))));
/// const y = [[[[[[[[[[[[[[[[[[[[[[[[0]]]]]]]]]]]]]]]]]]]]]]];
/// ```
pub const MAX_PARSER_DEPTH: u32 = 500;

/// Maximum depth for access chains walked by the path resolver.
///
/// The resolver walks from the outermost access inward; chains longer
/// than this are treated as not statically resolvable.
///
/// # JavaScript example
///
/// ```javascript
/// const result = process?.env?.a?.b?.c?.d?.e?.f?.g?.h?.i?.j;
/// ```
pub const MAX_OPTIONAL_CHAIN_DEPTH: u32 = 1_000;

/// Maximum depth for binding pattern flattening in the binder.
///
/// # JavaScript example
///
/// ```javascript
/// const { a: { b: { c: { d: value } } } } = deeplyNested;
/// ```
pub const MAX_BINDING_PATTERN_DEPTH: u32 = 100;

// =============================================================================
// Operation Count Limits
// =============================================================================

/// Maximum iterations when walking parent pointers towards the root.
pub const MAX_TREE_WALK_ITERATIONS: usize = 10_000;

/// Maximum iterations when walking a scope chain.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;
