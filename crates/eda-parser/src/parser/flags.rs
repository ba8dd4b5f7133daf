//! Node kinds above the token range and packed node flags.

/// Node kinds that never come out of the scanner. Token-shaped nodes
/// (identifiers, literals, `this`, ...) reuse their `SyntaxKind` value.
pub mod syntax_kind_ext {
    // Names
    pub const COMPUTED_PROPERTY_NAME: u16 = 200;

    // Binding patterns and parameters
    pub const OBJECT_BINDING_PATTERN: u16 = 201;
    pub const ARRAY_BINDING_PATTERN: u16 = 202;
    pub const BINDING_ELEMENT: u16 = 203;
    pub const PARAMETER: u16 = 204;

    // Expressions
    pub const ARRAY_LITERAL_EXPRESSION: u16 = 210;
    pub const OBJECT_LITERAL_EXPRESSION: u16 = 211;
    pub const PROPERTY_ACCESS_EXPRESSION: u16 = 212;
    pub const ELEMENT_ACCESS_EXPRESSION: u16 = 213;
    pub const CALL_EXPRESSION: u16 = 214;
    pub const NEW_EXPRESSION: u16 = 215;
    pub const TAGGED_TEMPLATE_EXPRESSION: u16 = 216;
    pub const PARENTHESIZED_EXPRESSION: u16 = 217;
    pub const FUNCTION_EXPRESSION: u16 = 218;
    pub const ARROW_FUNCTION: u16 = 219;
    pub const PREFIX_UNARY_EXPRESSION: u16 = 220;
    pub const POSTFIX_UNARY_EXPRESSION: u16 = 221;
    pub const BINARY_EXPRESSION: u16 = 222;
    pub const CONDITIONAL_EXPRESSION: u16 = 223;
    pub const TEMPLATE_EXPRESSION: u16 = 224;
    pub const TEMPLATE_SPAN: u16 = 225;
    pub const SPREAD_ELEMENT: u16 = 226;
    pub const CLASS_EXPRESSION: u16 = 227;
    pub const OMITTED_EXPRESSION: u16 = 228;
    pub const META_PROPERTY: u16 = 229;
    pub const AWAIT_EXPRESSION: u16 = 230;
    pub const YIELD_EXPRESSION: u16 = 231;

    // Object literal members
    pub const PROPERTY_ASSIGNMENT: u16 = 240;
    pub const SHORTHAND_PROPERTY_ASSIGNMENT: u16 = 241;
    pub const SPREAD_ASSIGNMENT: u16 = 242;

    // Class and object members with function bodies
    pub const METHOD_DECLARATION: u16 = 245;
    pub const GET_ACCESSOR: u16 = 246;
    pub const SET_ACCESSOR: u16 = 247;
    pub const CONSTRUCTOR: u16 = 248;
    pub const PROPERTY_DECLARATION: u16 = 249;
    pub const CLASS_STATIC_BLOCK_DECLARATION: u16 = 250;

    // Statements
    pub const BLOCK: u16 = 260;
    pub const EMPTY_STATEMENT: u16 = 261;
    pub const VARIABLE_STATEMENT: u16 = 262;
    pub const EXPRESSION_STATEMENT: u16 = 263;
    pub const IF_STATEMENT: u16 = 264;
    pub const DO_STATEMENT: u16 = 265;
    pub const WHILE_STATEMENT: u16 = 266;
    pub const FOR_STATEMENT: u16 = 267;
    pub const FOR_IN_STATEMENT: u16 = 268;
    pub const FOR_OF_STATEMENT: u16 = 269;
    pub const CONTINUE_STATEMENT: u16 = 270;
    pub const BREAK_STATEMENT: u16 = 271;
    pub const RETURN_STATEMENT: u16 = 272;
    pub const SWITCH_STATEMENT: u16 = 273;
    pub const LABELED_STATEMENT: u16 = 274;
    pub const THROW_STATEMENT: u16 = 275;
    pub const TRY_STATEMENT: u16 = 276;
    pub const DEBUGGER_STATEMENT: u16 = 277;

    // Declarations
    pub const VARIABLE_DECLARATION: u16 = 280;
    pub const VARIABLE_DECLARATION_LIST: u16 = 281;
    pub const FUNCTION_DECLARATION: u16 = 282;
    pub const CLASS_DECLARATION: u16 = 283;
    pub const CASE_BLOCK: u16 = 284;
    pub const CASE_CLAUSE: u16 = 285;
    pub const DEFAULT_CLAUSE: u16 = 286;
    pub const CATCH_CLAUSE: u16 = 287;

    // Modules
    pub const IMPORT_DECLARATION: u16 = 290;
    pub const IMPORT_CLAUSE: u16 = 291;
    pub const NAMESPACE_IMPORT: u16 = 292;
    pub const NAMED_IMPORTS: u16 = 293;
    pub const IMPORT_SPECIFIER: u16 = 294;
    pub const EXPORT_ASSIGNMENT: u16 = 295;
    pub const EXPORT_DECLARATION: u16 = 296;
    pub const NAMED_EXPORTS: u16 = 297;
    pub const NAMESPACE_EXPORT: u16 = 298;
    pub const EXPORT_SPECIFIER: u16 = 299;

    pub const SOURCE_FILE: u16 = 310;
}

/// Packed node flags stored in `Node::flags`.
pub mod node_flags {
    pub const NONE: u32 = 0;
    pub const LET: u32 = 1 << 0;
    pub const CONST: u32 = 1 << 1;
    /// Set on every access and call node that belongs to an optional chain,
    /// including the links after the first `?.` (`a?.b.c` flags both).
    pub const OPTIONAL_CHAIN: u32 = 1 << 6;
    pub const BLOCK_SCOPED: u32 = LET | CONST;
    pub const THIS_NODE_HAS_ERROR: u32 = 1 << 10;
}
