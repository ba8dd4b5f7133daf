//! Parser state - statement, declaration and module parsing methods

use super::state::{
    CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR, ParserState,
};
use crate::parser::{
    NodeIndex, NodeList,
    node::{
        BindingElementData, BindingPatternData, BlockData, CaseClauseData, CatchClauseData,
        ClassData, ExportAssignmentData, ExportDeclData, ExprStatementData, ForInOfData,
        FunctionData, IfStatementData, ImportClauseData, ImportDeclData, JumpData, LabeledData,
        LoopData, NamedImportsData, ParameterData, PropertyDeclData, ReturnData, SourceFileData,
        SpecifierData, SwitchData, TryData, VariableData, VariableDeclarationData,
    },
    node_flags, syntax_kind_ext,
};
use eda_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use eda_scanner::{SyntaxKind, token_is_identifier_or_keyword};
use std::sync::Arc;

impl ParserState {
    // =========================================================================
    // Source file
    // =========================================================================

    /// Parse the whole source text into a `SOURCE_FILE` node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        let _span = tracing::debug_span!("parse_source_file", file = %self.file_name).entered();

        // Sources are modules, so top-level `await` is an operator.
        self.context_flags |= CONTEXT_FLAG_ASYNC;
        self.next_token();
        let statements = self.parse_statement_list(|_| false);

        let end_pos = self.scanner.source_text().len() as u32;
        let eof_token = self
            .arena
            .add_token(SyntaxKind::EndOfFileToken as u16, end_pos, end_pos);
        let text: Arc<str> = Arc::from(self.scanner.source_text());

        let root = self.arena.add_source_file(
            0,
            end_pos,
            SourceFileData {
                statements,
                end_of_file_token: eof_token,
                file_name: self.file_name.clone(),
                text,
            },
        );
        tracing::debug!(
            nodes = self.arena.len(),
            diagnostics = self.parse_diagnostics.len(),
            "parsed source file"
        );
        root
    }

    /// Statements until end of file or until `is_terminator` says stop.
    /// Tokens that cannot start a statement are reported and skipped.
    pub(crate) fn parse_statement_list(&mut self, is_terminator: impl Fn(&Self) -> bool) -> NodeList {
        let pos = self.token_pos();
        let mut statements = Vec::new();

        while !self.is_token(SyntaxKind::EndOfFileToken) && !is_terminator(self) {
            let before_pos = self.token_pos();
            let before_token = self.token();
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            if self.token_pos() == before_pos
                && self.token() == before_token
                && !self.is_token(SyntaxKind::EndOfFileToken)
            {
                self.parse_error_at_current_token(
                    diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                self.next_token();
            }
        }

        let mut list = NodeList::with_nodes(statements);
        list.pos = pos;
        list.end = self.node_end();
        list
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.skip_token_as_missing();
        }
        let result = self.parse_statement_worker();
        self.exit_recursion();
        result
    }

    fn parse_statement_worker(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                let start = self.token_pos();
                self.next_token();
                self.arena
                    .add_token(syntax_kind_ext::EMPTY_STATEMENT, start, self.node_end())
            }
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => self.parse_variable_statement(),
            SyntaxKind::LetKeyword if self.look_ahead_is_let_declaration() => {
                self.parse_variable_statement()
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(false),
            SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                self.parse_function_declaration(false)
            }
            SyntaxKind::ClassKeyword => self.parse_class(syntax_kind_ext::CLASS_DECLARATION, false),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ContinueKeyword => {
                self.parse_break_or_continue(syntax_kind_ext::CONTINUE_STATEMENT)
            }
            SyntaxKind::BreakKeyword => self.parse_break_or_continue(syntax_kind_ext::BREAK_STATEMENT),
            SyntaxKind::ReturnKeyword => self.parse_return_or_throw(syntax_kind_ext::RETURN_STATEMENT),
            SyntaxKind::ThrowKeyword => self.parse_return_or_throw(syntax_kind_ext::THROW_STATEMENT),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::DebuggerKeyword => {
                let start = self.token_pos();
                self.next_token();
                self.parse_semicolon();
                self.arena
                    .add_token(syntax_kind_ext::DEBUGGER_STATEMENT, start, self.node_end())
            }
            SyntaxKind::ImportKeyword if !self.look_ahead_is_import_expression() => {
                self.parse_import_declaration()
            }
            SyntaxKind::ExportKeyword => self.parse_export_declaration(),
            _ if self.is_identifier() && self.look_ahead_token().0 == SyntaxKind::ColonToken => {
                self.parse_labeled_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// `let` starts a declaration only when a binding follows it.
    fn look_ahead_is_let_declaration(&mut self) -> bool {
        let (next, _) = self.look_ahead_token();
        matches!(
            next,
            SyntaxKind::Identifier | SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken
        ) || eda_scanner::token_is_contextual_keyword(next)
    }

    /// `async function` with no line break in between.
    pub(crate) fn look_ahead_is_async_function(&mut self) -> bool {
        let (next, line_break) = self.look_ahead_token();
        next == SyntaxKind::FunctionKeyword && !line_break
    }

    /// `import(...)` and `import.meta` are expressions, not declarations.
    fn look_ahead_is_import_expression(&mut self) -> bool {
        let (next, _) = self.look_ahead_token();
        matches!(next, SyntaxKind::OpenParenToken | SyntaxKind::DotToken)
    }

    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        self.parse_block_of_kind(syntax_kind_ext::BLOCK)
    }

    fn parse_block_of_kind(&mut self, kind: u16) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements = self.parse_statement_list(|p| p.is_token(SyntaxKind::CloseBraceToken));
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let end = self.node_end();
        let multi_line = self
            .scanner
            .source_text()
            .get(start as usize..end as usize)
            .is_some_and(|text| text.contains('\n'));
        self.arena.add_block(
            kind,
            start,
            end,
            BlockData {
                statements,
                multi_line,
            },
        )
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let expression = self.parse_expression();
        if expression.is_none() {
            return NodeIndex::NONE;
        }
        self.parse_semicolon();
        self.arena.add_expr_statement(
            syntax_kind_ext::EXPRESSION_STATEMENT,
            start,
            self.node_end(),
            ExprStatementData { expression },
        )
    }

    fn parse_labeled_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let label = self.parse_identifier();
        self.parse_expected(SyntaxKind::ColonToken);
        let statement = self.parse_statement();
        self.arena.add_labeled(
            syntax_kind_ext::LABELED_STATEMENT,
            start,
            self.node_end(),
            LabeledData { label, statement },
        )
    }

    /// Condition in parentheses, as used by `if`, `while`, `switch`.
    fn parse_parenthesized_condition(&mut self) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        expression
    }

    fn parse_if_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition();
        let then_statement = self.parse_statement();
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_if_statement(
            syntax_kind_ext::IF_STATEMENT,
            start,
            self.node_end(),
            IfStatementData {
                expression,
                then_statement,
                else_statement,
            },
        )
    }

    fn parse_do_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let statement = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        let condition = self.parse_parenthesized_condition();
        // `do x; while (c) y` is valid without a semicolon after `)`.
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.arena.add_loop(
            syntax_kind_ext::DO_STATEMENT,
            start,
            self.node_end(),
            LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            },
        )
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let statement = self.parse_statement();
        self.arena.add_loop(
            syntax_kind_ext::WHILE_STATEMENT,
            start,
            self.node_end(),
            LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            },
        )
    }

    /// `for (;;)`, `for (x in y)`, `for (x of y)` and `for await (x of y)`.
    fn parse_for_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let await_modifier = self.parse_optional(SyntaxKind::AwaitKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);

        let initializer = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else if self.is_token(SyntaxKind::VarKeyword)
            || self.is_token(SyntaxKind::ConstKeyword)
            || (self.is_token(SyntaxKind::LetKeyword) && self.look_ahead_is_let_declaration())
        {
            self.with_context(CONTEXT_FLAG_DISALLOW_IN, 0, |p| {
                p.parse_variable_declaration_list()
            })
        } else {
            self.with_context(CONTEXT_FLAG_DISALLOW_IN, 0, |p| p.parse_expression())
        };

        if self.parse_optional(SyntaxKind::OfKeyword) {
            let expression = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| {
                p.parse_assignment_expression_or_report()
            });
            self.parse_expected(SyntaxKind::CloseParenToken);
            let statement = self.parse_statement();
            return self.arena.add_for_in_of(
                syntax_kind_ext::FOR_OF_STATEMENT,
                start,
                self.node_end(),
                ForInOfData {
                    await_modifier,
                    initializer,
                    expression,
                    statement,
                },
            );
        }

        if self.parse_optional(SyntaxKind::InKeyword) {
            let expression =
                self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression());
            self.parse_expected(SyntaxKind::CloseParenToken);
            let statement = self.parse_statement();
            return self.arena.add_for_in_of(
                syntax_kind_ext::FOR_IN_STATEMENT,
                start,
                self.node_end(),
                ForInOfData {
                    await_modifier,
                    initializer,
                    expression,
                    statement,
                },
            );
        }

        self.parse_expected(SyntaxKind::SemicolonToken);
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression())
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression())
        };
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();

        self.arena.add_loop(
            syntax_kind_ext::FOR_STATEMENT,
            start,
            self.node_end(),
            LoopData {
                initializer,
                condition,
                incrementor,
                statement,
            },
        )
    }

    fn parse_break_or_continue(&mut self, kind: u16) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let label = if self.is_identifier() && !self.has_preceding_line_break() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.arena
            .add_jump(kind, start, self.node_end(), JumpData { label })
    }

    fn parse_return_or_throw(&mut self, kind: u16) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let expression = if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_semicolon();
        self.arena
            .add_return(kind, start, self.node_end(), ReturnData { expression })
    }

    fn parse_try_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let try_block = self.parse_block();

        let catch_clause = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_start = self.token_pos();
            self.next_token();
            // Optional catch binding: `catch { }`
            let variable_declaration = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let decl_start = self.token_pos();
                let name = self.parse_binding_name();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena.add_variable_declaration(
                    syntax_kind_ext::VARIABLE_DECLARATION,
                    decl_start,
                    self.node_end(),
                    VariableDeclarationData {
                        name,
                        initializer: NodeIndex::NONE,
                    },
                )
            } else {
                NodeIndex::NONE
            };
            let block = self.parse_block();
            self.arena.add_catch_clause(
                syntax_kind_ext::CATCH_CLAUSE,
                catch_start,
                self.node_end(),
                CatchClauseData {
                    variable_declaration,
                    block,
                },
            )
        } else {
            NodeIndex::NONE
        };

        let finally_block = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            self.parse_block()
        } else {
            NodeIndex::NONE
        };

        if catch_clause.is_none() && finally_block.is_none() {
            self.parse_expected(SyntaxKind::CatchKeyword);
        }

        self.arena.add_try(
            syntax_kind_ext::TRY_STATEMENT,
            start,
            self.node_end(),
            TryData {
                try_block,
                catch_clause,
                finally_block,
            },
        )
    }

    fn parse_switch_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition();

        let block_start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut clauses = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let clause_start = self.token_pos();
            let (kind, clause_expression) = if self.parse_optional(SyntaxKind::CaseKeyword) {
                (syntax_kind_ext::CASE_CLAUSE, self.parse_expression())
            } else if self.parse_optional(SyntaxKind::DefaultKeyword) {
                (syntax_kind_ext::DEFAULT_CLAUSE, NodeIndex::NONE)
            } else {
                self.parse_expected(SyntaxKind::CaseKeyword);
                self.next_token();
                continue;
            };
            self.parse_expected(SyntaxKind::ColonToken);
            let statements = self.parse_statement_list(|p| {
                matches!(
                    p.token(),
                    SyntaxKind::CaseKeyword
                        | SyntaxKind::DefaultKeyword
                        | SyntaxKind::CloseBraceToken
                )
            });
            clauses.push(self.arena.add_case_clause(
                kind,
                clause_start,
                self.node_end(),
                CaseClauseData {
                    expression: clause_expression,
                    statements,
                },
            ));
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let case_block = self.arena.add_block(
            syntax_kind_ext::CASE_BLOCK,
            block_start,
            self.node_end(),
            BlockData {
                statements: NodeList::with_nodes(clauses),
                multi_line: true,
            },
        );

        self.arena.add_switch(
            syntax_kind_ext::SWITCH_STATEMENT,
            start,
            self.node_end(),
            SwitchData {
                expression,
                case_block,
            },
        )
    }

    // =========================================================================
    // Variable declarations
    // =========================================================================

    fn parse_variable_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let list = self.parse_variable_declaration_list();
        self.parse_semicolon();
        self.arena.add_variable(
            syntax_kind_ext::VARIABLE_STATEMENT,
            start,
            self.node_end(),
            VariableData {
                declarations: NodeList::with_nodes(vec![list]),
            },
        )
    }

    /// `var`/`let`/`const` followed by one or more declarations.
    pub(crate) fn parse_variable_declaration_list(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let flags = match self.token() {
            SyntaxKind::ConstKeyword => node_flags::CONST,
            SyntaxKind::LetKeyword => node_flags::LET,
            _ => node_flags::NONE,
        };
        self.next_token();

        let mut declarations = Vec::new();
        loop {
            let declaration = self.parse_variable_declaration();
            if declaration.is_none() {
                break;
            }
            declarations.push(declaration);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        if declarations.is_empty() {
            self.parse_error_at_current_token(
                diagnostic_messages::VARIABLE_DECLARATION_EXPECTED,
                diagnostic_codes::VARIABLE_DECLARATION_EXPECTED,
            );
        }

        self.arena.add_variable_with_flags(
            syntax_kind_ext::VARIABLE_DECLARATION_LIST,
            start,
            self.node_end(),
            VariableData {
                declarations: NodeList::with_nodes(declarations),
            },
            flags as u16,
        )
    }

    fn parse_variable_declaration(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let name = self.parse_binding_name();
        if name.is_none() {
            return NodeIndex::NONE;
        }
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression_or_report()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_variable_declaration(
            syntax_kind_ext::VARIABLE_DECLARATION,
            start,
            self.node_end(),
            VariableDeclarationData { name, initializer },
        )
    }

    // =========================================================================
    // Binding patterns
    // =========================================================================

    /// Identifier, object pattern or array pattern.
    pub(crate) fn parse_binding_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            _ => self.parse_identifier(),
        }
    }

    fn parse_object_binding_pattern(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.skip_token_as_missing();
        }
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let element = self.parse_object_binding_element();
            if element.is_none() {
                break;
            }
            elements.push(element);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.exit_recursion();
        self.arena.add_binding_pattern(
            syntax_kind_ext::OBJECT_BINDING_PATTERN,
            start,
            self.node_end(),
            BindingPatternData {
                elements: NodeList::with_nodes(elements),
            },
        )
    }

    fn parse_object_binding_element(&mut self) -> NodeIndex {
        let start = self.token_pos();

        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let name = self.parse_binding_name();
            return self.arena.add_binding_element(
                syntax_kind_ext::BINDING_ELEMENT,
                start,
                self.node_end(),
                BindingElementData {
                    dot_dot_dot_token: true,
                    property_name: NodeIndex::NONE,
                    name,
                    initializer: NodeIndex::NONE,
                },
            );
        }

        let can_be_shorthand = self.is_identifier();
        let property = self.parse_property_name();
        if property.is_none() {
            return NodeIndex::NONE;
        }

        let (property_name, name) = if self.parse_optional(SyntaxKind::ColonToken) {
            (property, self.parse_binding_name())
        } else {
            if !can_be_shorthand {
                self.parse_expected(SyntaxKind::ColonToken);
            }
            (NodeIndex::NONE, property)
        };

        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression_or_report()
        } else {
            NodeIndex::NONE
        };

        self.arena.add_binding_element(
            syntax_kind_ext::BINDING_ELEMENT,
            start,
            self.node_end(),
            BindingElementData {
                dot_dot_dot_token: false,
                property_name,
                name,
                initializer,
            },
        )
    }

    fn parse_array_binding_pattern(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.skip_token_as_missing();
        }
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.is_token(SyntaxKind::CommaToken) {
                let pos = self.token_pos();
                elements.push(
                    self.arena
                        .add_token(syntax_kind_ext::OMITTED_EXPRESSION, pos, pos),
                );
                self.next_token();
                continue;
            }

            let element_start = self.token_pos();
            let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_binding_name();
            if name.is_none() {
                break;
            }
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression_or_report()
            } else {
                NodeIndex::NONE
            };
            elements.push(self.arena.add_binding_element(
                syntax_kind_ext::BINDING_ELEMENT,
                element_start,
                self.node_end(),
                BindingElementData {
                    dot_dot_dot_token,
                    property_name: NodeIndex::NONE,
                    name,
                    initializer,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.exit_recursion();
        self.arena.add_binding_pattern(
            syntax_kind_ext::ARRAY_BINDING_PATTERN,
            start,
            self.node_end(),
            BindingPatternData {
                elements: NodeList::with_nodes(elements),
            },
        )
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// `[async] function [*] name(params) { body }`. The name may be omitted
    /// only in `export default function () {}`.
    pub(crate) fn parse_function_declaration(&mut self, name_optional: bool) -> NodeIndex {
        let start = self.token_pos();
        let is_async = self.parse_optional(SyntaxKind::AsyncKeyword);
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let asterisk_token = self.parse_optional(SyntaxKind::AsteriskToken);

        let name = if self.is_identifier() {
            self.parse_identifier()
        } else {
            if !name_optional {
                self.error_identifier_expected();
            }
            NodeIndex::NONE
        };

        let (parameters, body) = self.parse_function_signature_and_body(is_async, asterisk_token);
        self.arena.add_function(
            syntax_kind_ext::FUNCTION_DECLARATION,
            start,
            self.node_end(),
            FunctionData {
                modifiers: None,
                is_async,
                asterisk_token,
                name,
                parameters,
                body,
                equals_greater_than_token: false,
            },
        )
    }

    /// Parameter list and block body, parsed in the function's own
    /// async/generator context.
    pub(crate) fn parse_function_signature_and_body(
        &mut self,
        is_async: bool,
        is_generator: bool,
    ) -> (NodeList, NodeIndex) {
        let (set, clear) = function_context(is_async, is_generator);
        self.with_context(set, clear, |p| {
            let parameters = p.parse_parameter_list();
            let body = p.parse_block();
            (parameters, body)
        })
    }

    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let mut parameters = Vec::new();
        let mut has_trailing_comma = false;
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let parameter = self.parse_parameter();
            if parameter.is_none() {
                break;
            }
            parameters.push(parameter);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
            has_trailing_comma = self.is_token(SyntaxKind::CloseParenToken);
        }
        self.parse_expected(SyntaxKind::CloseParenToken);

        let mut list = NodeList::with_nodes(parameters);
        list.pos = pos;
        list.end = self.node_end();
        list.has_trailing_comma = has_trailing_comma;
        list
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = self.parse_binding_name();
        if name.is_none() {
            return NodeIndex::NONE;
        }
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression_or_report()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_parameter(
            syntax_kind_ext::PARAMETER,
            start,
            self.node_end(),
            ParameterData {
                dot_dot_dot_token,
                name,
                initializer,
            },
        )
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Class declaration or expression. Declarations require a name unless
    /// `name_optional` (`export default class {}`).
    pub(crate) fn parse_class(&mut self, kind: u16, name_optional: bool) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::ClassKeyword);

        let name = if self.is_identifier() {
            self.parse_identifier()
        } else {
            if kind == syntax_kind_ext::CLASS_DECLARATION && !name_optional {
                self.error_identifier_expected();
            }
            NodeIndex::NONE
        };

        let heritage = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            let heritage = self.parse_left_hand_side_expression();
            if heritage.is_none() {
                self.error_expression_expected();
            }
            heritage
        } else {
            NodeIndex::NONE
        };

        let members_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let before = self.token_pos();
            let member = self.parse_class_member();
            if member.is_some() {
                members.push(member);
            } else if self.token_pos() == before {
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);

        let mut member_list = NodeList::with_nodes(members);
        member_list.pos = members_pos;
        member_list.end = self.node_end();

        self.arena.add_class(
            kind,
            start,
            self.node_end(),
            ClassData {
                name,
                heritage,
                members: member_list,
            },
        )
    }

    /// Whether the current contextual keyword acts as a modifier, i.e. it is
    /// followed by something other than the end of a member name.
    fn look_ahead_is_member_modifier(&mut self) -> bool {
        let (next, line_break) = self.look_ahead_token();
        if self.is_token(SyntaxKind::AsyncKeyword) && line_break {
            return false;
        }
        !matches!(
            next,
            SyntaxKind::OpenParenToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CommaToken
                | SyntaxKind::ColonToken
                | SyntaxKind::EndOfFileToken
        )
    }

    fn parse_class_member(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut modifiers = Vec::new();

        if self.is_token(SyntaxKind::StaticKeyword) && self.look_ahead_is_member_modifier() {
            if self.look_ahead_token().0 == SyntaxKind::OpenBraceToken {
                self.next_token();
                let block = self.with_context(0, CONTEXT_FLAG_ASYNC | CONTEXT_FLAG_GENERATOR, |p| {
                    p.parse_block_of_kind(syntax_kind_ext::CLASS_STATIC_BLOCK_DECLARATION)
                });
                if let Some(node) = self.arena.get_mut(block) {
                    node.pos = start;
                }
                return block;
            }
            let pos = self.token_pos();
            let end = self.token_end();
            modifiers.push(
                self.arena
                    .add_token(SyntaxKind::StaticKeyword as u16, pos, end),
            );
            self.next_token();
        }

        let (is_async, accessor, asterisk_token) = self.parse_method_prefix();
        let is_constructor = modifiers.is_empty()
            && accessor.is_none()
            && matches!(
                self.token(),
                SyntaxKind::Identifier | SyntaxKind::StringLiteral
            )
            && self.scanner.get_token_value_ref() == "constructor";

        let name = self.parse_property_name();
        if name.is_none() {
            return NodeIndex::NONE;
        }
        let modifiers = (!modifiers.is_empty()).then(|| NodeList::with_nodes(modifiers));

        if self.is_token(SyntaxKind::OpenParenToken) {
            let kind = match accessor {
                Some(SyntaxKind::GetKeyword) => syntax_kind_ext::GET_ACCESSOR,
                Some(_) => syntax_kind_ext::SET_ACCESSOR,
                None if is_constructor => syntax_kind_ext::CONSTRUCTOR,
                None => syntax_kind_ext::METHOD_DECLARATION,
            };
            let (parameters, body) = self.parse_function_signature_and_body(is_async, asterisk_token);
            return self.arena.add_function(
                kind,
                start,
                self.node_end(),
                FunctionData {
                    modifiers,
                    is_async,
                    asterisk_token,
                    name,
                    parameters,
                    body,
                    equals_greater_than_token: false,
                },
            );
        }

        if is_async || accessor.is_some() || asterisk_token {
            self.parse_expected(SyntaxKind::OpenParenToken);
        }

        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.with_context(0, CONTEXT_FLAG_ASYNC | CONTEXT_FLAG_GENERATOR, |p| {
                p.parse_assignment_expression_or_report()
            })
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.arena.add_property_decl(
            syntax_kind_ext::PROPERTY_DECLARATION,
            start,
            self.node_end(),
            PropertyDeclData {
                modifiers,
                name,
                initializer,
            },
        )
    }

    /// `async`, `get`/`set` and `*` in front of a method name, shared by
    /// class members and object literal methods.
    pub(crate) fn parse_method_prefix(&mut self) -> (bool, Option<SyntaxKind>, bool) {
        let mut is_async = false;
        let mut accessor = None;
        if self.is_token(SyntaxKind::AsyncKeyword) && self.look_ahead_is_member_modifier() {
            is_async = true;
            self.next_token();
        }
        if !is_async
            && matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.look_ahead_is_member_modifier()
        {
            accessor = Some(self.token());
            self.next_token();
        }
        let asterisk_token = accessor.is_none() && self.parse_optional(SyntaxKind::AsteriskToken);
        (is_async, accessor, asterisk_token)
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn parse_import_declaration(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();

        let mut import_clause = NodeIndex::NONE;
        if !self.is_token(SyntaxKind::StringLiteral) {
            import_clause = self.parse_import_clause();
            self.parse_expected(SyntaxKind::FromKeyword);
        }
        let module_specifier = self.parse_module_specifier();
        self.parse_import_attributes();
        self.parse_semicolon();

        self.arena.add_import_decl(
            syntax_kind_ext::IMPORT_DECLARATION,
            start,
            self.node_end(),
            ImportDeclData {
                import_clause,
                module_specifier,
            },
        )
    }

    fn parse_import_clause(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut name = NodeIndex::NONE;
        let mut named_bindings = NodeIndex::NONE;

        if self.is_identifier() {
            name = self.parse_identifier();
            if !self.parse_optional(SyntaxKind::CommaToken) {
                return self.finish_import_clause(start, name, named_bindings);
            }
        }

        if self.is_token(SyntaxKind::AsteriskToken) {
            let ns_start = self.token_pos();
            self.next_token();
            self.parse_expected(SyntaxKind::AsKeyword);
            let ns_name = self.parse_identifier();
            named_bindings = self.arena.add_named_imports(
                syntax_kind_ext::NAMESPACE_IMPORT,
                ns_start,
                self.node_end(),
                NamedImportsData {
                    name: ns_name,
                    elements: NodeList::new(),
                },
            );
        } else if self.is_token(SyntaxKind::OpenBraceToken) {
            named_bindings = self.parse_named_specifiers(
                syntax_kind_ext::NAMED_IMPORTS,
                syntax_kind_ext::IMPORT_SPECIFIER,
            );
        } else if name.is_none() {
            self.error_identifier_expected();
        }

        self.finish_import_clause(start, name, named_bindings)
    }

    fn finish_import_clause(
        &mut self,
        start: u32,
        name: NodeIndex,
        named_bindings: NodeIndex,
    ) -> NodeIndex {
        self.arena.add_import_clause(
            syntax_kind_ext::IMPORT_CLAUSE,
            start,
            self.node_end(),
            ImportClauseData {
                name,
                named_bindings,
            },
        )
    }

    /// `{ a, b as c, "str" as d, default as e }` for imports and exports.
    fn parse_named_specifiers(&mut self, list_kind: u16, specifier_kind: u16) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let specifier_start = self.token_pos();
            let first = self.parse_module_export_name();
            if first.is_none() {
                break;
            }
            let (property_name, name) = if self.parse_optional(SyntaxKind::AsKeyword) {
                (first, self.parse_module_export_name())
            } else {
                (NodeIndex::NONE, first)
            };
            elements.push(self.arena.add_specifier(
                specifier_kind,
                specifier_start,
                self.node_end(),
                SpecifierData {
                    property_name,
                    name,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_named_imports(
            list_kind,
            start,
            self.node_end(),
            NamedImportsData {
                name: NodeIndex::NONE,
                elements: NodeList::with_nodes(elements),
            },
        )
    }

    /// Identifier, keyword or string literal naming an import or export.
    fn parse_module_export_name(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::StringLiteral) {
            return self.parse_literal_node();
        }
        if token_is_identifier_or_keyword(self.token()) {
            return self.parse_identifier_name();
        }
        self.error_identifier_expected();
        NodeIndex::NONE
    }

    fn parse_module_specifier(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_literal_node()
        } else {
            self.parse_error_at_current_token(
                diagnostic_messages::STRING_LITERAL_EXPECTED,
                diagnostic_codes::STRING_LITERAL_EXPECTED,
            );
            NodeIndex::NONE
        }
    }

    /// `with { type: "json" }` after a module specifier. Parsed for recovery
    /// and discarded.
    fn parse_import_attributes(&mut self) {
        if self.is_token(SyntaxKind::WithKeyword) && !self.has_preceding_line_break() {
            self.next_token();
            self.parse_object_literal();
        }
    }

    fn parse_export_declaration(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();

        let mut is_default_export = false;
        let mut module_specifier = NodeIndex::NONE;

        let export_clause = if self.parse_optional(SyntaxKind::DefaultKeyword) {
            is_default_export = true;
            match self.token() {
                SyntaxKind::FunctionKeyword => self.parse_function_declaration(true),
                SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                    self.parse_function_declaration(true)
                }
                SyntaxKind::ClassKeyword => {
                    self.parse_class(syntax_kind_ext::CLASS_DECLARATION, true)
                }
                _ => {
                    let expr_start = self.token_pos();
                    let expression = self.parse_assignment_expression_or_report();
                    self.parse_semicolon();
                    self.arena.add_export_assignment(
                        syntax_kind_ext::EXPORT_ASSIGNMENT,
                        expr_start,
                        self.node_end(),
                        ExportAssignmentData { expression },
                    )
                }
            }
        } else if self.is_token(SyntaxKind::AsteriskToken) {
            let clause_start = self.token_pos();
            self.next_token();
            let clause = if self.parse_optional(SyntaxKind::AsKeyword) {
                let name = self.parse_module_export_name();
                self.arena.add_named_imports(
                    syntax_kind_ext::NAMESPACE_EXPORT,
                    clause_start,
                    self.node_end(),
                    NamedImportsData {
                        name,
                        elements: NodeList::new(),
                    },
                )
            } else {
                NodeIndex::NONE
            };
            self.parse_expected(SyntaxKind::FromKeyword);
            module_specifier = self.parse_module_specifier();
            self.parse_import_attributes();
            self.parse_semicolon();
            clause
        } else if self.is_token(SyntaxKind::OpenBraceToken) {
            let clause = self.parse_named_specifiers(
                syntax_kind_ext::NAMED_EXPORTS,
                syntax_kind_ext::EXPORT_SPECIFIER,
            );
            if self.parse_optional(SyntaxKind::FromKeyword) {
                module_specifier = self.parse_module_specifier();
                self.parse_import_attributes();
            }
            self.parse_semicolon();
            clause
        } else {
            match self.token() {
                SyntaxKind::VarKeyword
                | SyntaxKind::LetKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::AsyncKeyword
                | SyntaxKind::ClassKeyword => self.parse_statement(),
                _ => {
                    self.parse_error_at_current_token(
                        diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                        diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                    );
                    NodeIndex::NONE
                }
            }
        };

        self.arena.add_export_decl(
            syntax_kind_ext::EXPORT_DECLARATION,
            start,
            self.node_end(),
            ExportDeclData {
                is_default_export,
                export_clause,
                module_specifier,
            },
        )
    }
}

/// Context flags to set and clear when entering a function body.
pub(crate) fn function_context(is_async: bool, is_generator: bool) -> (u32, u32) {
    let mut set = 0;
    let mut clear = CONTEXT_FLAG_DISALLOW_IN;
    if is_async {
        set |= CONTEXT_FLAG_ASYNC;
    } else {
        clear |= CONTEXT_FLAG_ASYNC;
    }
    if is_generator {
        set |= CONTEXT_FLAG_GENERATOR;
    } else {
        clear |= CONTEXT_FLAG_GENERATOR;
    }
    (set, clear)
}
