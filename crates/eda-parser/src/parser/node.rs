//! Thin Node Architecture
//!
//! Each node is a 16-byte header (`Node`) plus an optional entry in one of
//! the typed pools of `NodeArena`. `data_index` points into the pool that
//! matches `kind`.
//!
//! Consumers never hold references into the arena across mutations; they
//! pass `NodeIndex` handles around and look data up on demand.

use super::base::{NodeIndex, NodeList};
use serde::Serialize;
use std::sync::Arc;

/// A thin 16-byte node header.
///
/// Layout (16 bytes total):
/// - `kind`: 2 bytes (SyntaxKind value or `syntax_kind_ext` constant)
/// - `flags`: 2 bytes (packed `node_flags`)
/// - `pos`: 4 bytes (start byte offset, after leading trivia)
/// - `end`: 4 bytes (end byte offset)
/// - `data_index`: 4 bytes (index into the kind's pool, u32::MAX = no data)
#[repr(C)]
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Node {
    pub kind: u16,
    pub flags: u16,
    pub pos: u32,
    pub end: u32,
    pub data_index: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    #[inline]
    pub fn new(kind: u16, pos: u32, end: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index: Self::NO_DATA,
        }
    }

    #[inline]
    pub fn with_data(kind: u16, pos: u32, end: u32, data_index: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index,
        }
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.data_index != Self::NO_DATA
    }

    #[inline]
    pub fn has_flag(&self, flag: u32) -> bool {
        (self.flags as u32) & flag != 0
    }
}

// =============================================================================
// Typed Data Pools
// =============================================================================

/// Data for identifier nodes (Identifier, PrivateIdentifier)
#[derive(Clone, Debug, Serialize)]
pub struct IdentifierData {
    pub escaped_text: String,
}

/// Data for string/numeric/regex literals and template pieces
#[derive(Clone, Debug, Serialize)]
pub struct LiteralData {
    /// Cooked value (escapes resolved for strings and templates)
    pub text: String,
    /// Source text including quotes, when it differs from `text`
    pub raw_text: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: u16, // SyntaxKind
    pub right: NodeIndex,
}

/// Data for prefix/postfix unary, `await` and `yield` expressions
#[derive(Clone, Debug, Serialize)]
pub struct UnaryExprData {
    pub operator: u16, // SyntaxKind
    pub operand: NodeIndex,
}

/// Data for call/new expressions
#[derive(Clone, Debug, Serialize)]
pub struct CallExprData {
    pub expression: NodeIndex,
    /// `None` for `new Foo` without an argument list
    pub arguments: Option<NodeList>,
}

/// Data for property/element access
#[derive(Clone, Debug, Serialize)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
    /// True only for the link written with `?.`
    pub question_dot_token: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

/// Data for array/object literals
#[derive(Clone, Debug, Serialize)]
pub struct LiteralExprData {
    pub elements: NodeList,
    pub multi_line: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParenthesizedData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateExprData {
    pub head: NodeIndex,
    pub template_spans: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateSpanData {
    pub expression: NodeIndex,
    pub literal: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TaggedTemplateData {
    pub tag: NodeIndex,
    pub template: NodeIndex,
}

/// Data for spread elements and spread assignments
#[derive(Clone, Debug, Serialize)]
pub struct SpreadData {
    pub expression: NodeIndex,
}

/// Data for `import.meta` / `new.target`
#[derive(Clone, Debug, Serialize)]
pub struct MetaPropertyData {
    pub keyword_token: u16, // ImportKeyword or NewKeyword
    pub name: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ComputedPropertyData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ShorthandPropertyData {
    pub name: NodeIndex,
    pub equals_token: bool,
    pub object_assignment_initializer: NodeIndex,
}

/// Data for functions, arrows, methods, accessors and constructors
#[derive(Clone, Debug, Serialize)]
pub struct FunctionData {
    pub modifiers: Option<NodeList>,
    pub is_async: bool,
    pub asterisk_token: bool,
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub body: NodeIndex,
    pub equals_greater_than_token: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParameterData {
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    pub name: NodeIndex,
    /// The `extends` expression, if any
    pub heritage: NodeIndex,
    pub members: NodeList,
}

/// Data for class fields
#[derive(Clone, Debug, Serialize)]
pub struct PropertyDeclData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Data for variable statements and declaration lists
#[derive(Clone, Debug, Serialize)]
pub struct VariableData {
    pub declarations: NodeList,
}

/// Data for variable declarations (individual)
#[derive(Clone, Debug, Serialize)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,        // Identifier or BindingPattern
    pub initializer: NodeIndex, // Expression (optional)
}

#[derive(Clone, Debug, Serialize)]
pub struct BindingPatternData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct BindingElementData {
    pub dot_dot_dot_token: bool,
    /// Key for `{ key: name }`; NONE for shorthand and array elements
    pub property_name: NodeIndex,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Data for blocks, case blocks and class static blocks
#[derive(Clone, Debug, Serialize)]
pub struct BlockData {
    pub statements: NodeList,
    pub multi_line: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExprStatementData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct IfStatementData {
    pub expression: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

/// Data for for/while/do loops
#[derive(Clone, Debug, Serialize)]
pub struct LoopData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ForInOfData {
    pub await_modifier: bool,
    pub initializer: NodeIndex,
    pub expression: NodeIndex,
    pub statement: NodeIndex,
}

/// Data for return/throw statements
#[derive(Clone, Debug, Serialize)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

/// Data for break/continue
#[derive(Clone, Debug, Serialize)]
pub struct JumpData {
    pub label: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct LabeledData {
    pub label: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SwitchData {
    pub expression: NodeIndex,
    pub case_block: NodeIndex,
}

/// Data for case/default clauses
#[derive(Clone, Debug, Serialize)]
pub struct CaseClauseData {
    pub expression: NodeIndex,
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TryData {
    pub try_block: NodeIndex,
    pub catch_clause: NodeIndex,
    pub finally_block: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct CatchClauseData {
    pub variable_declaration: NodeIndex,
    pub block: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportDeclData {
    pub import_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportClauseData {
    pub name: NodeIndex,
    pub named_bindings: NodeIndex,
}

/// Data for namespace imports/exports and named import/export lists
#[derive(Clone, Debug, Serialize)]
pub struct NamedImportsData {
    pub name: NodeIndex,    // For namespace import/export
    pub elements: NodeList, // For named imports/exports
}

/// Data for import/export specifiers
#[derive(Clone, Debug, Serialize)]
pub struct SpecifierData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportDeclData {
    /// True if this is `export default <declaration>`
    pub is_default_export: bool,
    /// A declaration, `NamedExports` or `NamespaceExport`
    pub export_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

/// Data for `export default <expression>`
#[derive(Clone, Debug, Serialize)]
pub struct ExportAssignmentData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SourceFileData {
    pub statements: NodeList,
    pub end_of_file_token: NodeIndex,
    pub file_name: String,
    #[serde(serialize_with = "serialize_arc_str")]
    pub text: Arc<str>,
}

fn serialize_arc_str<S>(arc: &Arc<str>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(arc)
}

// =============================================================================
// Thin Node Arena
// =============================================================================

/// Arena for thin nodes with typed data pools.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NodeArena {
    /// The thin node headers (16 bytes each)
    pub nodes: Vec<Node>,

    // Names and identifiers
    pub identifiers: Vec<IdentifierData>,
    pub computed_properties: Vec<ComputedPropertyData>,

    // Literals
    pub literals: Vec<LiteralData>,

    // Expressions
    pub binary_exprs: Vec<BinaryExprData>,
    pub unary_exprs: Vec<UnaryExprData>,
    pub call_exprs: Vec<CallExprData>,
    pub access_exprs: Vec<AccessExprData>,
    pub conditional_exprs: Vec<ConditionalExprData>,
    pub literal_exprs: Vec<LiteralExprData>,
    pub parenthesized: Vec<ParenthesizedData>,
    pub template_exprs: Vec<TemplateExprData>,
    pub template_spans: Vec<TemplateSpanData>,
    pub tagged_templates: Vec<TaggedTemplateData>,
    pub meta_properties: Vec<MetaPropertyData>,

    // Functions and classes
    pub functions: Vec<FunctionData>,
    pub parameters: Vec<ParameterData>,
    pub classes: Vec<ClassData>,
    pub property_decls: Vec<PropertyDeclData>,

    // Statements
    pub if_statements: Vec<IfStatementData>,
    pub loops: Vec<LoopData>,
    pub blocks: Vec<BlockData>,
    pub variables: Vec<VariableData>,
    pub return_data: Vec<ReturnData>,
    pub expr_statements: Vec<ExprStatementData>,
    pub switch_data: Vec<SwitchData>,
    pub case_clauses: Vec<CaseClauseData>,
    pub try_data: Vec<TryData>,
    pub catch_clauses: Vec<CatchClauseData>,
    pub labeled_data: Vec<LabeledData>,
    pub jump_data: Vec<JumpData>,

    // Import/export
    pub import_decls: Vec<ImportDeclData>,
    pub import_clauses: Vec<ImportClauseData>,
    pub named_imports: Vec<NamedImportsData>,
    pub specifiers: Vec<SpecifierData>,
    pub export_decls: Vec<ExportDeclData>,
    pub export_assignments: Vec<ExportAssignmentData>,

    // Binding patterns
    pub binding_patterns: Vec<BindingPatternData>,
    pub binding_elements: Vec<BindingElementData>,

    // Object literal members
    pub property_assignments: Vec<PropertyAssignmentData>,
    pub shorthand_properties: Vec<ShorthandPropertyData>,
    pub spread_data: Vec<SpreadData>,

    // Variable declarations (individual)
    pub variable_declarations: Vec<VariableDeclarationData>,

    // For-in/for-of
    pub for_in_of: Vec<ForInOfData>,

    // Source file
    pub source_files: Vec<SourceFileData>,

    /// Parent pointers, parallel to `nodes`
    pub extended_info: Vec<ExtendedNodeInfo>,
}

/// Extended node info for data that does not fit in `Node`
#[derive(Clone, Debug, Serialize)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
}

impl Default for ExtendedNodeInfo {
    fn default() -> Self {
        ExtendedNodeInfo {
            parent: NodeIndex::NONE,
        }
    }
}
