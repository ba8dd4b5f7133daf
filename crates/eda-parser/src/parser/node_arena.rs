//! Node creation for `NodeArena`.
//!
//! Nodes are built bottom-up: children exist before their parent, so every
//! `add_*` method records itself as the parent of the children it receives.

use super::base::{NodeIndex, NodeList};
use super::node::*;

impl NodeArena {
    /// Maximum pre-allocation to avoid capacity overflow in huge files.
    const MAX_NODE_PREALLOC: usize = 5_000_000;

    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena with pre-allocated capacity for the hottest pools.
    pub fn with_capacity(capacity: usize) -> NodeArena {
        let safe_capacity = capacity.min(Self::MAX_NODE_PREALLOC);
        let mut arena = NodeArena::default();
        arena.nodes = Vec::with_capacity(safe_capacity);
        arena.extended_info = Vec::with_capacity(safe_capacity);
        arena.identifiers = Vec::with_capacity(safe_capacity / 4);
        arena.literals = Vec::with_capacity(safe_capacity / 8);
        arena.access_exprs = Vec::with_capacity(safe_capacity / 8);
        arena.call_exprs = Vec::with_capacity(safe_capacity / 8);
        arena.source_files = Vec::with_capacity(1);
        arena
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ============================================================================
    // Parent Mapping Helpers
    // ============================================================================

    #[inline]
    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child.is_some()
            && let Some(info) = self.extended_info.get_mut(child.0 as usize)
        {
            info.parent = parent;
        }
    }

    #[inline]
    fn set_parent_list(&mut self, list: &NodeList, parent: NodeIndex) {
        for &child in &list.nodes {
            self.set_parent(child, parent);
        }
    }

    #[inline]
    fn set_parent_opt_list(&mut self, list: &Option<NodeList>, parent: NodeIndex) {
        if let Some(l) = list {
            self.set_parent_list(l, parent);
        }
    }

    #[inline]
    fn push_node(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        self.extended_info.push(ExtendedNodeInfo::default());
        NodeIndex(index)
    }

    // ============================================================================
    // Node Creation Methods
    // ============================================================================

    /// Add a token node (no additional data)
    pub fn add_token(&mut self, kind: u16, pos: u32, end: u32) -> NodeIndex {
        self.push_node(Node::new(kind, pos, end))
    }

    pub fn add_identifier(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: IdentifierData,
    ) -> NodeIndex {
        let data_index = self.identifiers.len() as u32;
        self.identifiers.push(data);
        self.push_node(Node::with_data(kind, pos, end, data_index))
    }

    pub fn add_literal(&mut self, kind: u16, pos: u32, end: u32, data: LiteralData) -> NodeIndex {
        let data_index = self.literals.len() as u32;
        self.literals.push(data);
        self.push_node(Node::with_data(kind, pos, end, data_index))
    }

    pub fn add_computed_property(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ComputedPropertyData,
    ) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.computed_properties.len() as u32;
        self.computed_properties.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_binary_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: BinaryExprData,
    ) -> NodeIndex {
        let left = data.left;
        let right = data.right;
        let data_index = self.binary_exprs.len() as u32;
        self.binary_exprs.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(left, parent);
        self.set_parent(right, parent);
        parent
    }

    pub fn add_unary_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: UnaryExprData,
    ) -> NodeIndex {
        let operand = data.operand;
        let data_index = self.unary_exprs.len() as u32;
        self.unary_exprs.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(operand, parent);
        parent
    }

    pub fn add_call_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: CallExprData,
    ) -> NodeIndex {
        let expression = data.expression;
        let arguments = data.arguments.clone();
        let data_index = self.call_exprs.len() as u32;
        self.call_exprs.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        self.set_parent_opt_list(&arguments, parent);
        parent
    }

    pub fn add_access_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: AccessExprData,
    ) -> NodeIndex {
        let expression = data.expression;
        let name_or_argument = data.name_or_argument;
        let data_index = self.access_exprs.len() as u32;
        self.access_exprs.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        self.set_parent(name_or_argument, parent);
        parent
    }

    pub fn add_conditional_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ConditionalExprData,
    ) -> NodeIndex {
        let (condition, when_true, when_false) = (data.condition, data.when_true, data.when_false);
        let data_index = self.conditional_exprs.len() as u32;
        self.conditional_exprs.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(condition, parent);
        self.set_parent(when_true, parent);
        self.set_parent(when_false, parent);
        parent
    }

    /// Add an array or object literal
    pub fn add_literal_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: LiteralExprData,
    ) -> NodeIndex {
        let elements = data.elements.clone();
        let data_index = self.literal_exprs.len() as u32;
        self.literal_exprs.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent_list(&elements, parent);
        parent
    }

    pub fn add_parenthesized(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ParenthesizedData,
    ) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.parenthesized.len() as u32;
        self.parenthesized.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_template_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: TemplateExprData,
    ) -> NodeIndex {
        let head = data.head;
        let spans = data.template_spans.clone();
        let data_index = self.template_exprs.len() as u32;
        self.template_exprs.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(head, parent);
        self.set_parent_list(&spans, parent);
        parent
    }

    pub fn add_template_span(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: TemplateSpanData,
    ) -> NodeIndex {
        let (expression, literal) = (data.expression, data.literal);
        let data_index = self.template_spans.len() as u32;
        self.template_spans.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        self.set_parent(literal, parent);
        parent
    }

    pub fn add_tagged_template(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: TaggedTemplateData,
    ) -> NodeIndex {
        let (tag, template) = (data.tag, data.template);
        let data_index = self.tagged_templates.len() as u32;
        self.tagged_templates.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(tag, parent);
        self.set_parent(template, parent);
        parent
    }

    pub fn add_meta_property(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: MetaPropertyData,
    ) -> NodeIndex {
        let name = data.name;
        let data_index = self.meta_properties.len() as u32;
        self.meta_properties.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(name, parent);
        parent
    }

    /// Add a spread element or spread assignment
    pub fn add_spread(&mut self, kind: u16, pos: u32, end: u32, data: SpreadData) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.spread_data.len() as u32;
        self.spread_data.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_property_assignment(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: PropertyAssignmentData,
    ) -> NodeIndex {
        let (name, initializer) = (data.name, data.initializer);
        let data_index = self.property_assignments.len() as u32;
        self.property_assignments.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    pub fn add_shorthand_property(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ShorthandPropertyData,
    ) -> NodeIndex {
        let (name, initializer) = (data.name, data.object_assignment_initializer);
        let data_index = self.shorthand_properties.len() as u32;
        self.shorthand_properties.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    /// Add a function-like node (declaration, expression, arrow, method,
    /// accessor or constructor)
    pub fn add_function(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: FunctionData,
    ) -> NodeIndex {
        let modifiers = data.modifiers.clone();
        let name = data.name;
        let parameters = data.parameters.clone();
        let body = data.body;
        let data_index = self.functions.len() as u32;
        self.functions.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent_opt_list(&modifiers, parent);
        self.set_parent(name, parent);
        self.set_parent_list(&parameters, parent);
        self.set_parent(body, parent);
        parent
    }

    pub fn add_parameter(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ParameterData,
    ) -> NodeIndex {
        let (name, initializer) = (data.name, data.initializer);
        let data_index = self.parameters.len() as u32;
        self.parameters.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    pub fn add_class(&mut self, kind: u16, pos: u32, end: u32, data: ClassData) -> NodeIndex {
        let (name, heritage) = (data.name, data.heritage);
        let members = data.members.clone();
        let data_index = self.classes.len() as u32;
        self.classes.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent(heritage, parent);
        self.set_parent_list(&members, parent);
        parent
    }

    pub fn add_property_decl(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: PropertyDeclData,
    ) -> NodeIndex {
        let modifiers = data.modifiers.clone();
        let (name, initializer) = (data.name, data.initializer);
        let data_index = self.property_decls.len() as u32;
        self.property_decls.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent_opt_list(&modifiers, parent);
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    // ============================================================================
    // Statements
    // ============================================================================

    /// Add a block, case block, or class static block
    pub fn add_block(&mut self, kind: u16, pos: u32, end: u32, data: BlockData) -> NodeIndex {
        let statements = data.statements.clone();
        let data_index = self.blocks.len() as u32;
        self.blocks.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent_list(&statements, parent);
        parent
    }

    /// Add a variable statement or a variable declaration list
    pub fn add_variable(&mut self, kind: u16, pos: u32, end: u32, data: VariableData) -> NodeIndex {
        let declarations = data.declarations.clone();
        let data_index = self.variables.len() as u32;
        self.variables.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent_list(&declarations, parent);
        parent
    }

    /// Same as `add_variable`, with packed `node_flags` (LET/CONST)
    pub fn add_variable_with_flags(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: VariableData,
        flags: u16,
    ) -> NodeIndex {
        let index = self.add_variable(kind, pos, end, data);
        if let Some(node) = self.nodes.get_mut(index.0 as usize) {
            node.flags = flags;
        }
        index
    }

    pub fn add_variable_declaration(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: VariableDeclarationData,
    ) -> NodeIndex {
        let (name, initializer) = (data.name, data.initializer);
        let data_index = self.variable_declarations.len() as u32;
        self.variable_declarations.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    pub fn add_binding_pattern(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: BindingPatternData,
    ) -> NodeIndex {
        let elements = data.elements.clone();
        let data_index = self.binding_patterns.len() as u32;
        self.binding_patterns.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent_list(&elements, parent);
        parent
    }

    pub fn add_binding_element(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: BindingElementData,
    ) -> NodeIndex {
        let (property_name, name, initializer) =
            (data.property_name, data.name, data.initializer);
        let data_index = self.binding_elements.len() as u32;
        self.binding_elements.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(property_name, parent);
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    pub fn add_expr_statement(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ExprStatementData,
    ) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.expr_statements.len() as u32;
        self.expr_statements.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_if_statement(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: IfStatementData,
    ) -> NodeIndex {
        let (expression, then_statement, else_statement) =
            (data.expression, data.then_statement, data.else_statement);
        let data_index = self.if_statements.len() as u32;
        self.if_statements.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        self.set_parent(then_statement, parent);
        self.set_parent(else_statement, parent);
        parent
    }

    pub fn add_loop(&mut self, kind: u16, pos: u32, end: u32, data: LoopData) -> NodeIndex {
        let (initializer, condition, incrementor, statement) = (
            data.initializer,
            data.condition,
            data.incrementor,
            data.statement,
        );
        let data_index = self.loops.len() as u32;
        self.loops.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(initializer, parent);
        self.set_parent(condition, parent);
        self.set_parent(incrementor, parent);
        self.set_parent(statement, parent);
        parent
    }

    pub fn add_for_in_of(&mut self, kind: u16, pos: u32, end: u32, data: ForInOfData) -> NodeIndex {
        let (initializer, expression, statement) =
            (data.initializer, data.expression, data.statement);
        let data_index = self.for_in_of.len() as u32;
        self.for_in_of.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(initializer, parent);
        self.set_parent(expression, parent);
        self.set_parent(statement, parent);
        parent
    }

    /// Add a return or throw statement
    pub fn add_return(&mut self, kind: u16, pos: u32, end: u32, data: ReturnData) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.return_data.len() as u32;
        self.return_data.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        parent
    }

    /// Add a break or continue statement
    pub fn add_jump(&mut self, kind: u16, pos: u32, end: u32, data: JumpData) -> NodeIndex {
        let label = data.label;
        let data_index = self.jump_data.len() as u32;
        self.jump_data.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(label, parent);
        parent
    }

    pub fn add_labeled(&mut self, kind: u16, pos: u32, end: u32, data: LabeledData) -> NodeIndex {
        let (label, statement) = (data.label, data.statement);
        let data_index = self.labeled_data.len() as u32;
        self.labeled_data.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(label, parent);
        self.set_parent(statement, parent);
        parent
    }

    pub fn add_switch(&mut self, kind: u16, pos: u32, end: u32, data: SwitchData) -> NodeIndex {
        let (expression, case_block) = (data.expression, data.case_block);
        let data_index = self.switch_data.len() as u32;
        self.switch_data.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        self.set_parent(case_block, parent);
        parent
    }

    pub fn add_case_clause(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: CaseClauseData,
    ) -> NodeIndex {
        let expression = data.expression;
        let statements = data.statements.clone();
        let data_index = self.case_clauses.len() as u32;
        self.case_clauses.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        self.set_parent_list(&statements, parent);
        parent
    }

    pub fn add_try(&mut self, kind: u16, pos: u32, end: u32, data: TryData) -> NodeIndex {
        let (try_block, catch_clause, finally_block) =
            (data.try_block, data.catch_clause, data.finally_block);
        let data_index = self.try_data.len() as u32;
        self.try_data.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(try_block, parent);
        self.set_parent(catch_clause, parent);
        self.set_parent(finally_block, parent);
        parent
    }

    pub fn add_catch_clause(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: CatchClauseData,
    ) -> NodeIndex {
        let (variable_declaration, block) = (data.variable_declaration, data.block);
        let data_index = self.catch_clauses.len() as u32;
        self.catch_clauses.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(variable_declaration, parent);
        self.set_parent(block, parent);
        parent
    }

    // ============================================================================
    // Modules
    // ============================================================================

    pub fn add_import_decl(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ImportDeclData,
    ) -> NodeIndex {
        let (import_clause, module_specifier) = (data.import_clause, data.module_specifier);
        let data_index = self.import_decls.len() as u32;
        self.import_decls.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(import_clause, parent);
        self.set_parent(module_specifier, parent);
        parent
    }

    pub fn add_import_clause(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ImportClauseData,
    ) -> NodeIndex {
        let (name, named_bindings) = (data.name, data.named_bindings);
        let data_index = self.import_clauses.len() as u32;
        self.import_clauses.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent(named_bindings, parent);
        parent
    }

    /// Add a namespace import/export or a named import/export list
    pub fn add_named_imports(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: NamedImportsData,
    ) -> NodeIndex {
        let name = data.name;
        let elements = data.elements.clone();
        let data_index = self.named_imports.len() as u32;
        self.named_imports.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent_list(&elements, parent);
        parent
    }

    /// Add an import or export specifier
    pub fn add_specifier(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: SpecifierData,
    ) -> NodeIndex {
        let (property_name, name) = (data.property_name, data.name);
        let data_index = self.specifiers.len() as u32;
        self.specifiers.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(property_name, parent);
        self.set_parent(name, parent);
        parent
    }

    pub fn add_export_decl(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ExportDeclData,
    ) -> NodeIndex {
        let (export_clause, module_specifier) = (data.export_clause, data.module_specifier);
        let data_index = self.export_decls.len() as u32;
        self.export_decls.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(export_clause, parent);
        self.set_parent(module_specifier, parent);
        parent
    }

    pub fn add_export_assignment(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ExportAssignmentData,
    ) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.export_assignments.len() as u32;
        self.export_assignments.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_source_file(&mut self, pos: u32, end: u32, data: SourceFileData) -> NodeIndex {
        use super::syntax_kind_ext::SOURCE_FILE;
        let statements = data.statements.clone();
        let eof = data.end_of_file_token;
        let data_index = self.source_files.len() as u32;
        self.source_files.push(data);
        let parent = self.push_node(Node::with_data(SOURCE_FILE, pos, end, data_index));
        self.set_parent_list(&statements, parent);
        self.set_parent(eof, parent);
        parent
    }
}
