//! Typed access into `NodeArena` pools.
//!
//! Every `get_*` accessor checks the node kind before indexing its pool, so
//! asking for the wrong shape returns `None` instead of another node's data.

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::syntax_kind_ext::*;
use eda_scanner::SyntaxKind;

macro_rules! pool_accessor {
    ($(#[$meta:meta])* $name:ident, $pool:ident, $ty:ty, [$($kind:expr),+ $(,)?]) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&self, node: &Node) -> Option<&$ty> {
            if node.has_data() && ($(node.kind == $kind)||+) {
                self.$pool.get(node.data_index as usize)
            } else {
                None
            }
        }
    };
}

impl NodeArena {
    // =========================================================================
    // Node headers
    // =========================================================================

    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            return None;
        }
        self.nodes.get(index.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            return None;
        }
        self.nodes.get_mut(index.0 as usize)
    }

    #[inline]
    pub fn get_extended(&self, index: NodeIndex) -> Option<&ExtendedNodeInfo> {
        if index.is_none() {
            return None;
        }
        self.extended_info.get(index.0 as usize)
    }

    /// Parent of a node, or `NodeIndex::NONE` for the root.
    #[inline]
    pub fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        self.get_extended(index)
            .map_or(NodeIndex::NONE, |info| info.parent)
    }

    #[inline]
    pub fn kind_of(&self, index: NodeIndex) -> Option<u16> {
        self.get(index).map(|node| node.kind)
    }

    // =========================================================================
    // Typed pools
    // =========================================================================

    pool_accessor!(
        /// Identifier data (Identifier, PrivateIdentifier)
        get_identifier, identifiers, IdentifierData,
        [SyntaxKind::Identifier as u16, SyntaxKind::PrivateIdentifier as u16]
    );
    pool_accessor!(
        /// Literal data (strings, numbers, regexes, template pieces)
        get_literal, literals, LiteralData,
        [
            SyntaxKind::StringLiteral as u16,
            SyntaxKind::NumericLiteral as u16,
            SyntaxKind::BigIntLiteral as u16,
            SyntaxKind::RegularExpressionLiteral as u16,
            SyntaxKind::NoSubstitutionTemplateLiteral as u16,
            SyntaxKind::TemplateHead as u16,
            SyntaxKind::TemplateMiddle as u16,
            SyntaxKind::TemplateTail as u16,
        ]
    );
    pool_accessor!(get_computed_property, computed_properties, ComputedPropertyData, [COMPUTED_PROPERTY_NAME]);
    pool_accessor!(get_binary_expr, binary_exprs, BinaryExprData, [BINARY_EXPRESSION]);
    pool_accessor!(
        get_unary_expr, unary_exprs, UnaryExprData,
        [PREFIX_UNARY_EXPRESSION, POSTFIX_UNARY_EXPRESSION, AWAIT_EXPRESSION, YIELD_EXPRESSION]
    );
    pool_accessor!(get_call_expr, call_exprs, CallExprData, [CALL_EXPRESSION, NEW_EXPRESSION]);
    pool_accessor!(
        /// Property or element access data
        get_access_expr, access_exprs, AccessExprData,
        [PROPERTY_ACCESS_EXPRESSION, ELEMENT_ACCESS_EXPRESSION]
    );
    pool_accessor!(get_conditional_expr, conditional_exprs, ConditionalExprData, [CONDITIONAL_EXPRESSION]);
    pool_accessor!(
        get_literal_expr, literal_exprs, LiteralExprData,
        [ARRAY_LITERAL_EXPRESSION, OBJECT_LITERAL_EXPRESSION]
    );
    pool_accessor!(get_parenthesized, parenthesized, ParenthesizedData, [PARENTHESIZED_EXPRESSION]);
    pool_accessor!(get_template_expr, template_exprs, TemplateExprData, [TEMPLATE_EXPRESSION]);
    pool_accessor!(get_template_span, template_spans, TemplateSpanData, [TEMPLATE_SPAN]);
    pool_accessor!(get_tagged_template, tagged_templates, TaggedTemplateData, [TAGGED_TEMPLATE_EXPRESSION]);
    pool_accessor!(get_meta_property, meta_properties, MetaPropertyData, [META_PROPERTY]);
    pool_accessor!(get_spread, spread_data, SpreadData, [SPREAD_ELEMENT, SPREAD_ASSIGNMENT]);
    pool_accessor!(get_property_assignment, property_assignments, PropertyAssignmentData, [PROPERTY_ASSIGNMENT]);
    pool_accessor!(
        get_shorthand_property, shorthand_properties, ShorthandPropertyData,
        [SHORTHAND_PROPERTY_ASSIGNMENT]
    );
    pool_accessor!(
        /// Function-like data (declarations, expressions, arrows, methods,
        /// accessors, constructors)
        get_function, functions, FunctionData,
        [
            FUNCTION_DECLARATION,
            FUNCTION_EXPRESSION,
            ARROW_FUNCTION,
            METHOD_DECLARATION,
            GET_ACCESSOR,
            SET_ACCESSOR,
            CONSTRUCTOR,
        ]
    );
    pool_accessor!(get_parameter, parameters, ParameterData, [PARAMETER]);
    pool_accessor!(get_class, classes, ClassData, [CLASS_DECLARATION, CLASS_EXPRESSION]);
    pool_accessor!(get_property_decl, property_decls, PropertyDeclData, [PROPERTY_DECLARATION]);
    pool_accessor!(
        get_block, blocks, BlockData,
        [BLOCK, CASE_BLOCK, CLASS_STATIC_BLOCK_DECLARATION]
    );
    pool_accessor!(
        /// Variable statement or declaration list data
        get_variable, variables, VariableData,
        [VARIABLE_STATEMENT, VARIABLE_DECLARATION_LIST]
    );
    pool_accessor!(get_variable_declaration, variable_declarations, VariableDeclarationData, [VARIABLE_DECLARATION]);
    pool_accessor!(
        get_binding_pattern, binding_patterns, BindingPatternData,
        [OBJECT_BINDING_PATTERN, ARRAY_BINDING_PATTERN]
    );
    pool_accessor!(get_binding_element, binding_elements, BindingElementData, [BINDING_ELEMENT]);
    pool_accessor!(get_expr_statement, expr_statements, ExprStatementData, [EXPRESSION_STATEMENT]);
    pool_accessor!(get_if_statement, if_statements, IfStatementData, [IF_STATEMENT]);
    pool_accessor!(get_loop, loops, LoopData, [FOR_STATEMENT, WHILE_STATEMENT, DO_STATEMENT]);
    pool_accessor!(get_for_in_of, for_in_of, ForInOfData, [FOR_IN_STATEMENT, FOR_OF_STATEMENT]);
    pool_accessor!(get_return_statement, return_data, ReturnData, [RETURN_STATEMENT, THROW_STATEMENT]);
    pool_accessor!(get_jump_data, jump_data, JumpData, [BREAK_STATEMENT, CONTINUE_STATEMENT]);
    pool_accessor!(get_labeled_statement, labeled_data, LabeledData, [LABELED_STATEMENT]);
    pool_accessor!(get_switch, switch_data, SwitchData, [SWITCH_STATEMENT]);
    pool_accessor!(get_case_clause, case_clauses, CaseClauseData, [CASE_CLAUSE, DEFAULT_CLAUSE]);
    pool_accessor!(get_try, try_data, TryData, [TRY_STATEMENT]);
    pool_accessor!(get_catch_clause, catch_clauses, CatchClauseData, [CATCH_CLAUSE]);
    pool_accessor!(get_import_decl, import_decls, ImportDeclData, [IMPORT_DECLARATION]);
    pool_accessor!(get_import_clause, import_clauses, ImportClauseData, [IMPORT_CLAUSE]);
    pool_accessor!(
        get_named_imports, named_imports, NamedImportsData,
        [NAMESPACE_IMPORT, NAMED_IMPORTS, NAMED_EXPORTS, NAMESPACE_EXPORT]
    );
    pool_accessor!(get_specifier, specifiers, SpecifierData, [IMPORT_SPECIFIER, EXPORT_SPECIFIER]);
    pool_accessor!(get_export_decl, export_decls, ExportDeclData, [EXPORT_DECLARATION]);
    pool_accessor!(get_export_assignment, export_assignments, ExportAssignmentData, [EXPORT_ASSIGNMENT]);
    pool_accessor!(get_source_file, source_files, SourceFileData, [SOURCE_FILE]);

    pub fn get_source_file_at(&self, index: NodeIndex) -> Option<&SourceFileData> {
        self.get(index).and_then(|node| self.get_source_file(node))
    }

    // =========================================================================
    // Convenience lookups by index
    // =========================================================================

    /// Text of an identifier node.
    pub fn get_identifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_identifier(node)
            .map(|data| data.escaped_text.as_str())
    }

    /// Cooked text of a literal node.
    pub fn get_literal_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_literal(node).map(|data| data.text.as_str())
    }

    /// Strip any number of wrapping parentheses.
    pub fn skip_parentheses(&self, mut index: NodeIndex) -> NodeIndex {
        while let Some(node) = self.get(index)
            && let Some(paren) = self.get_parenthesized(node)
        {
            index = paren.expression;
        }
        index
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Children of a node in source order.
    pub fn get_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let Some(node) = self.get(index) else {
            return Vec::new();
        };

        let add_opt = |children: &mut Vec<NodeIndex>, idx: NodeIndex| {
            if idx.is_some() {
                children.push(idx);
            }
        };
        let add_list = |children: &mut Vec<NodeIndex>, list: &NodeList| {
            children.extend(list.nodes.iter().copied().filter(|idx| idx.is_some()));
        };
        let add_opt_list = |children: &mut Vec<NodeIndex>, list: &Option<NodeList>| {
            if let Some(l) = list {
                children.extend(l.nodes.iter().copied().filter(|idx| idx.is_some()));
            }
        };

        let mut children = Vec::new();

        match node.kind {
            COMPUTED_PROPERTY_NAME => {
                if let Some(data) = self.get_computed_property(node) {
                    add_opt(&mut children, data.expression);
                }
            }

            // Expressions
            BINARY_EXPRESSION => {
                if let Some(data) = self.get_binary_expr(node) {
                    add_opt(&mut children, data.left);
                    add_opt(&mut children, data.right);
                }
            }
            PREFIX_UNARY_EXPRESSION | POSTFIX_UNARY_EXPRESSION | AWAIT_EXPRESSION
            | YIELD_EXPRESSION => {
                if let Some(data) = self.get_unary_expr(node) {
                    add_opt(&mut children, data.operand);
                }
            }
            CALL_EXPRESSION | NEW_EXPRESSION => {
                if let Some(data) = self.get_call_expr(node) {
                    add_opt(&mut children, data.expression);
                    add_opt_list(&mut children, &data.arguments);
                }
            }
            PROPERTY_ACCESS_EXPRESSION | ELEMENT_ACCESS_EXPRESSION => {
                if let Some(data) = self.get_access_expr(node) {
                    add_opt(&mut children, data.expression);
                    add_opt(&mut children, data.name_or_argument);
                }
            }
            CONDITIONAL_EXPRESSION => {
                if let Some(data) = self.get_conditional_expr(node) {
                    add_opt(&mut children, data.condition);
                    add_opt(&mut children, data.when_true);
                    add_opt(&mut children, data.when_false);
                }
            }
            ARRAY_LITERAL_EXPRESSION | OBJECT_LITERAL_EXPRESSION => {
                if let Some(data) = self.get_literal_expr(node) {
                    add_list(&mut children, &data.elements);
                }
            }
            PARENTHESIZED_EXPRESSION => {
                if let Some(data) = self.get_parenthesized(node) {
                    add_opt(&mut children, data.expression);
                }
            }
            TEMPLATE_EXPRESSION => {
                if let Some(data) = self.get_template_expr(node) {
                    add_opt(&mut children, data.head);
                    add_list(&mut children, &data.template_spans);
                }
            }
            TEMPLATE_SPAN => {
                if let Some(data) = self.get_template_span(node) {
                    add_opt(&mut children, data.expression);
                    add_opt(&mut children, data.literal);
                }
            }
            TAGGED_TEMPLATE_EXPRESSION => {
                if let Some(data) = self.get_tagged_template(node) {
                    add_opt(&mut children, data.tag);
                    add_opt(&mut children, data.template);
                }
            }
            META_PROPERTY => {
                if let Some(data) = self.get_meta_property(node) {
                    add_opt(&mut children, data.name);
                }
            }
            SPREAD_ELEMENT | SPREAD_ASSIGNMENT => {
                if let Some(data) = self.get_spread(node) {
                    add_opt(&mut children, data.expression);
                }
            }
            PROPERTY_ASSIGNMENT => {
                if let Some(data) = self.get_property_assignment(node) {
                    add_opt(&mut children, data.name);
                    add_opt(&mut children, data.initializer);
                }
            }
            SHORTHAND_PROPERTY_ASSIGNMENT => {
                if let Some(data) = self.get_shorthand_property(node) {
                    add_opt(&mut children, data.name);
                    add_opt(&mut children, data.object_assignment_initializer);
                }
            }

            // Functions and classes
            FUNCTION_DECLARATION | FUNCTION_EXPRESSION | ARROW_FUNCTION | METHOD_DECLARATION
            | GET_ACCESSOR | SET_ACCESSOR | CONSTRUCTOR => {
                if let Some(data) = self.get_function(node) {
                    add_opt_list(&mut children, &data.modifiers);
                    add_opt(&mut children, data.name);
                    add_list(&mut children, &data.parameters);
                    add_opt(&mut children, data.body);
                }
            }
            PARAMETER => {
                if let Some(data) = self.get_parameter(node) {
                    add_opt(&mut children, data.name);
                    add_opt(&mut children, data.initializer);
                }
            }
            CLASS_DECLARATION | CLASS_EXPRESSION => {
                if let Some(data) = self.get_class(node) {
                    add_opt(&mut children, data.name);
                    add_opt(&mut children, data.heritage);
                    add_list(&mut children, &data.members);
                }
            }
            PROPERTY_DECLARATION => {
                if let Some(data) = self.get_property_decl(node) {
                    add_opt_list(&mut children, &data.modifiers);
                    add_opt(&mut children, data.name);
                    add_opt(&mut children, data.initializer);
                }
            }

            // Statements
            BLOCK | CASE_BLOCK | CLASS_STATIC_BLOCK_DECLARATION => {
                if let Some(data) = self.get_block(node) {
                    add_list(&mut children, &data.statements);
                }
            }
            VARIABLE_STATEMENT | VARIABLE_DECLARATION_LIST => {
                if let Some(data) = self.get_variable(node) {
                    add_list(&mut children, &data.declarations);
                }
            }
            VARIABLE_DECLARATION => {
                if let Some(data) = self.get_variable_declaration(node) {
                    add_opt(&mut children, data.name);
                    add_opt(&mut children, data.initializer);
                }
            }
            OBJECT_BINDING_PATTERN | ARRAY_BINDING_PATTERN => {
                if let Some(data) = self.get_binding_pattern(node) {
                    add_list(&mut children, &data.elements);
                }
            }
            BINDING_ELEMENT => {
                if let Some(data) = self.get_binding_element(node) {
                    add_opt(&mut children, data.property_name);
                    add_opt(&mut children, data.name);
                    add_opt(&mut children, data.initializer);
                }
            }
            EXPRESSION_STATEMENT => {
                if let Some(data) = self.get_expr_statement(node) {
                    add_opt(&mut children, data.expression);
                }
            }
            IF_STATEMENT => {
                if let Some(data) = self.get_if_statement(node) {
                    add_opt(&mut children, data.expression);
                    add_opt(&mut children, data.then_statement);
                    add_opt(&mut children, data.else_statement);
                }
            }
            DO_STATEMENT => {
                if let Some(data) = self.get_loop(node) {
                    add_opt(&mut children, data.statement);
                    add_opt(&mut children, data.condition);
                }
            }
            FOR_STATEMENT | WHILE_STATEMENT => {
                if let Some(data) = self.get_loop(node) {
                    add_opt(&mut children, data.initializer);
                    add_opt(&mut children, data.condition);
                    add_opt(&mut children, data.incrementor);
                    add_opt(&mut children, data.statement);
                }
            }
            FOR_IN_STATEMENT | FOR_OF_STATEMENT => {
                if let Some(data) = self.get_for_in_of(node) {
                    add_opt(&mut children, data.initializer);
                    add_opt(&mut children, data.expression);
                    add_opt(&mut children, data.statement);
                }
            }
            RETURN_STATEMENT | THROW_STATEMENT => {
                if let Some(data) = self.get_return_statement(node) {
                    add_opt(&mut children, data.expression);
                }
            }
            BREAK_STATEMENT | CONTINUE_STATEMENT => {
                if let Some(data) = self.get_jump_data(node) {
                    add_opt(&mut children, data.label);
                }
            }
            LABELED_STATEMENT => {
                if let Some(data) = self.get_labeled_statement(node) {
                    add_opt(&mut children, data.label);
                    add_opt(&mut children, data.statement);
                }
            }
            SWITCH_STATEMENT => {
                if let Some(data) = self.get_switch(node) {
                    add_opt(&mut children, data.expression);
                    add_opt(&mut children, data.case_block);
                }
            }
            CASE_CLAUSE | DEFAULT_CLAUSE => {
                if let Some(data) = self.get_case_clause(node) {
                    add_opt(&mut children, data.expression);
                    add_list(&mut children, &data.statements);
                }
            }
            TRY_STATEMENT => {
                if let Some(data) = self.get_try(node) {
                    add_opt(&mut children, data.try_block);
                    add_opt(&mut children, data.catch_clause);
                    add_opt(&mut children, data.finally_block);
                }
            }
            CATCH_CLAUSE => {
                if let Some(data) = self.get_catch_clause(node) {
                    add_opt(&mut children, data.variable_declaration);
                    add_opt(&mut children, data.block);
                }
            }

            // Modules
            IMPORT_DECLARATION => {
                if let Some(data) = self.get_import_decl(node) {
                    add_opt(&mut children, data.import_clause);
                    add_opt(&mut children, data.module_specifier);
                }
            }
            IMPORT_CLAUSE => {
                if let Some(data) = self.get_import_clause(node) {
                    add_opt(&mut children, data.name);
                    add_opt(&mut children, data.named_bindings);
                }
            }
            NAMESPACE_IMPORT | NAMED_IMPORTS | NAMED_EXPORTS | NAMESPACE_EXPORT => {
                if let Some(data) = self.get_named_imports(node) {
                    add_opt(&mut children, data.name);
                    add_list(&mut children, &data.elements);
                }
            }
            IMPORT_SPECIFIER | EXPORT_SPECIFIER => {
                if let Some(data) = self.get_specifier(node) {
                    add_opt(&mut children, data.property_name);
                    add_opt(&mut children, data.name);
                }
            }
            EXPORT_DECLARATION => {
                if let Some(data) = self.get_export_decl(node) {
                    add_opt(&mut children, data.export_clause);
                    add_opt(&mut children, data.module_specifier);
                }
            }
            EXPORT_ASSIGNMENT => {
                if let Some(data) = self.get_export_assignment(node) {
                    add_opt(&mut children, data.expression);
                }
            }
            SOURCE_FILE => {
                if let Some(data) = self.get_source_file(node) {
                    add_list(&mut children, &data.statements);
                    add_opt(&mut children, data.end_of_file_token);
                }
            }

            // Tokens, identifiers and literals have no children
            _ => {}
        }

        children
    }
}
