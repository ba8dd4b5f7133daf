//! Parser state - expression parsing methods

use super::state::{
    CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR, ParserState,
};
use super::state_statements::function_context;
use crate::parser::{
    NodeIndex, NodeList,
    node::{
        AccessExprData, BinaryExprData, CallExprData, ComputedPropertyData, ConditionalExprData,
        FunctionData, IdentifierData, LiteralData, LiteralExprData, MetaPropertyData,
        ParameterData, ParenthesizedData, PropertyAssignmentData, ShorthandPropertyData,
        SpreadData, TaggedTemplateData, TemplateExprData, TemplateSpanData, UnaryExprData,
    },
    node_flags, syntax_kind_ext,
};
use eda_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use eda_scanner::{SyntaxKind, token_is_assignment_operator, token_is_identifier_or_keyword};

impl ParserState {
    // =========================================================================
    // Entry points
    // =========================================================================

    /// Comma-separated expression. Reports when nothing parses.
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut left = self.parse_assignment_expression();
        if left.is_none() {
            self.error_expression_expected();
            return left;
        }
        while self.is_token(SyntaxKind::CommaToken) {
            self.next_token();
            let right = self.parse_assignment_expression_or_report();
            left = self.arena.add_binary_expr(
                syntax_kind_ext::BINARY_EXPRESSION,
                start,
                self.node_end(),
                BinaryExprData {
                    left,
                    operator_token: SyntaxKind::CommaToken as u16,
                    right,
                },
            );
        }
        left
    }

    pub(crate) fn parse_assignment_expression_or_report(&mut self) -> NodeIndex {
        let expression = self.parse_assignment_expression();
        if expression.is_none() {
            self.error_expression_expected();
        }
        expression
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.skip_token_as_missing();
        }
        let result = self.parse_assignment_expression_worker();
        self.exit_recursion();
        result
    }

    fn parse_assignment_expression_worker(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::YieldKeyword) && self.in_context(CONTEXT_FLAG_GENERATOR) {
            return self.parse_yield_expression();
        }

        if let Some(is_async) = self.look_ahead_arrow_function() {
            return self.parse_arrow_function(is_async);
        }

        let start = self.token_pos();
        let expression = self.parse_conditional_expression();
        if expression.is_some() && token_is_assignment_operator(self.token()) {
            let operator_token = self.token() as u16;
            self.next_token();
            let right = self.parse_assignment_expression_or_report();
            return self.arena.add_binary_expr(
                syntax_kind_ext::BINARY_EXPRESSION,
                start,
                self.node_end(),
                BinaryExprData {
                    left: expression,
                    operator_token,
                    right,
                },
            );
        }
        expression
    }

    fn parse_yield_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let delegate =
            !self.has_preceding_line_break() && self.parse_optional(SyntaxKind::AsteriskToken);
        let operand = if delegate || !self.can_end_yield_operand() {
            self.parse_assignment_expression_or_report()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_unary_expr(
            syntax_kind_ext::YIELD_EXPRESSION,
            start,
            self.node_end(),
            UnaryExprData {
                operator: if delegate {
                    SyntaxKind::AsteriskToken as u16
                } else {
                    SyntaxKind::YieldKeyword as u16
                },
                operand,
            },
        )
    }

    /// Tokens after `yield` that mean it has no operand.
    fn can_end_yield_operand(&self) -> bool {
        self.has_preceding_line_break()
            || matches!(
                self.token(),
                SyntaxKind::CloseParenToken
                    | SyntaxKind::CloseBracketToken
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::ColonToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::EndOfFileToken
            )
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// `Some(is_async)` when the current token starts an arrow function.
    fn look_ahead_arrow_function(&mut self) -> Option<bool> {
        match self.token() {
            SyntaxKind::OpenParenToken => self
                .look_ahead(|p| p.skip_parenthesized_raw() && p.is_arrow_on_same_line())
                .then_some(false),
            SyntaxKind::AsyncKeyword => {
                let async_arrow = self.look_ahead(|p| {
                    p.advance_raw();
                    if p.has_preceding_line_break() {
                        return false;
                    }
                    if p.is_token(SyntaxKind::OpenParenToken) {
                        p.skip_parenthesized_raw() && p.is_arrow_on_same_line()
                    } else if p.is_identifier() {
                        p.advance_raw();
                        p.is_arrow_on_same_line()
                    } else {
                        false
                    }
                });
                if async_arrow {
                    Some(true)
                } else {
                    self.look_ahead_identifier_arrow()
                }
            }
            _ if self.is_identifier() => self.look_ahead_identifier_arrow(),
            _ => None,
        }
    }

    /// `x => ...`
    fn look_ahead_identifier_arrow(&mut self) -> Option<bool> {
        self.look_ahead(|p| {
            p.advance_raw();
            p.is_arrow_on_same_line()
        })
        .then_some(false)
    }

    fn is_arrow_on_same_line(&self) -> bool {
        self.is_token(SyntaxKind::EqualsGreaterThanToken) && !self.has_preceding_line_break()
    }

    /// Skip a balanced `( ... )` group without building nodes; leaves the
    /// token after `)` current. Only used inside `look_ahead`.
    fn skip_parenthesized_raw(&mut self) -> bool {
        // '(' '[' '{' or 'T' for an open template substitution
        let mut stack: Vec<u8> = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => return false,
                SyntaxKind::OpenParenToken => stack.push(b'('),
                SyntaxKind::OpenBracketToken => stack.push(b'['),
                SyntaxKind::OpenBraceToken => stack.push(b'{'),
                SyntaxKind::TemplateHead => stack.push(b'T'),
                SyntaxKind::CloseParenToken => {
                    if stack.pop() != Some(b'(') {
                        return false;
                    }
                    if stack.is_empty() {
                        self.advance_raw();
                        return true;
                    }
                }
                SyntaxKind::CloseBracketToken => {
                    if stack.pop() != Some(b'[') {
                        return false;
                    }
                }
                SyntaxKind::CloseBraceToken => match stack.last() {
                    Some(b'T') => {
                        if self.scanner.re_scan_template_token() == SyntaxKind::TemplateTail {
                            stack.pop();
                        }
                    }
                    Some(b'{') => {
                        stack.pop();
                    }
                    _ => return false,
                },
                _ => {}
            }
            self.advance_raw();
        }
    }

    fn parse_arrow_function(&mut self, is_async: bool) -> NodeIndex {
        let start = self.token_pos();
        if is_async {
            self.next_token();
        }
        let (set, clear) = function_context(is_async, false);

        let parameters = if self.is_token(SyntaxKind::OpenParenToken) {
            self.with_context(set, clear, |p| p.parse_parameter_list())
        } else {
            let param_start = self.token_pos();
            let name = self.parse_identifier();
            let parameter = self.arena.add_parameter(
                syntax_kind_ext::PARAMETER,
                param_start,
                self.node_end(),
                ParameterData {
                    dot_dot_dot_token: false,
                    name,
                    initializer: NodeIndex::NONE,
                },
            );
            NodeList::with_nodes(vec![parameter])
        };

        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.with_context(set, clear, |p| p.parse_block())
        } else {
            // Concise bodies keep the surrounding `in` restriction.
            self.with_context(set, clear & !CONTEXT_FLAG_DISALLOW_IN, |p| {
                p.parse_assignment_expression_or_report()
            })
        };

        self.arena.add_function(
            syntax_kind_ext::ARROW_FUNCTION,
            start,
            self.node_end(),
            FunctionData {
                modifiers: None,
                is_async,
                asterisk_token: false,
                name: NodeIndex::NONE,
                parameters,
                body,
                equals_greater_than_token: true,
            },
        )
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn parse_conditional_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let condition = self.parse_binary_expression(0);
        if condition.is_none() || !self.is_token(SyntaxKind::QuestionToken) {
            return condition;
        }
        self.next_token();
        let when_true = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| {
            p.parse_assignment_expression_or_report()
        });
        self.parse_expected(SyntaxKind::ColonToken);
        let when_false = self.parse_assignment_expression_or_report();
        self.arena.add_conditional_expr(
            syntax_kind_ext::CONDITIONAL_EXPRESSION,
            start,
            self.node_end(),
            ConditionalExprData {
                condition,
                when_true,
                when_false,
            },
        )
    }

    /// Binding power of a binary operator; 0 when the token is not one here.
    fn binary_operator_precedence(&self, kind: SyntaxKind) -> u8 {
        match kind {
            SyntaxKind::QuestionQuestionToken | SyntaxKind::BarBarToken => 1,
            SyntaxKind::AmpersandAmpersandToken => 2,
            SyntaxKind::BarToken => 3,
            SyntaxKind::CaretToken => 4,
            SyntaxKind::AmpersandToken => 5,
            SyntaxKind::EqualsEqualsToken
            | SyntaxKind::ExclamationEqualsToken
            | SyntaxKind::EqualsEqualsEqualsToken
            | SyntaxKind::ExclamationEqualsEqualsToken => 6,
            SyntaxKind::LessThanToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::LessThanEqualsToken
            | SyntaxKind::GreaterThanEqualsToken
            | SyntaxKind::InstanceOfKeyword => 7,
            SyntaxKind::InKeyword if !self.in_context(CONTEXT_FLAG_DISALLOW_IN) => 7,
            SyntaxKind::LessThanLessThanToken
            | SyntaxKind::GreaterThanGreaterThanToken
            | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => 8,
            SyntaxKind::PlusToken | SyntaxKind::MinusToken => 9,
            SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 10,
            SyntaxKind::AsteriskAsteriskToken => 11,
            _ => 0,
        }
    }

    /// Precedence climbing over operators binding tighter than `min_precedence`.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeIndex {
        let start = self.token_pos();
        let mut left = self.parse_unary_expression();
        if left.is_none() {
            return left;
        }

        loop {
            let operator = self.token();
            let precedence = self.binary_operator_precedence(operator);
            if precedence == 0 || precedence <= min_precedence {
                break;
            }
            self.next_token();
            // `**` is right-associative
            let next_min = if operator == SyntaxKind::AsteriskAsteriskToken {
                precedence - 1
            } else {
                precedence
            };
            let right = self.parse_binary_expression(next_min);
            if right.is_none() {
                self.error_expression_expected();
            }
            left = self.arena.add_binary_expr(
                syntax_kind_ext::BINARY_EXPRESSION,
                start,
                self.node_end(),
                BinaryExprData {
                    left,
                    operator_token: operator as u16,
                    right,
                },
            );
        }
        left
    }

    fn parse_unary_expression(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.skip_token_as_missing();
        }
        let result = self.parse_unary_expression_worker();
        self.exit_recursion();
        result
    }

    fn parse_unary_expression_worker(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let operator = self.token();
        let kind = match operator {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => syntax_kind_ext::PREFIX_UNARY_EXPRESSION,
            SyntaxKind::AwaitKeyword if self.in_context(CONTEXT_FLAG_ASYNC) => {
                syntax_kind_ext::AWAIT_EXPRESSION
            }
            _ => return self.parse_postfix_expression(),
        };

        self.next_token();
        let operand = self.parse_unary_expression();
        if operand.is_none() {
            self.error_expression_expected();
        }
        self.arena.add_unary_expr(
            kind,
            start,
            self.node_end(),
            UnaryExprData {
                operator: operator as u16,
                operand,
            },
        )
    }

    fn parse_postfix_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let expression = self.parse_left_hand_side_expression();
        if expression.is_some()
            && matches!(
                self.token(),
                SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
            )
            && !self.has_preceding_line_break()
        {
            let operator = self.token() as u16;
            self.next_token();
            return self.arena.add_unary_expr(
                syntax_kind_ext::POSTFIX_UNARY_EXPRESSION,
                start,
                self.node_end(),
                UnaryExprData {
                    operator,
                    operand: expression,
                },
            );
        }
        expression
    }

    // =========================================================================
    // Member access, calls and optional chains
    // =========================================================================

    /// Primary or `new` expression followed by any member, call, tagged
    /// template or optional-chain links.
    pub(crate) fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        if expression.is_none() {
            return expression;
        }
        self.parse_member_expression_rest(start, expression, true)
    }

    /// Once `?.` appears, every following link of the same chain carries
    /// `OPTIONAL_CHAIN`; only the link written with `?.` records
    /// `question_dot_token`. Parentheses end a chain because the
    /// parenthesized expression is parsed as its own primary.
    fn parse_member_expression_rest(
        &mut self,
        start: u32,
        mut expression: NodeIndex,
        allow_calls: bool,
    ) -> NodeIndex {
        let mut in_optional_chain = false;
        loop {
            let chain_flags = if in_optional_chain {
                node_flags::OPTIONAL_CHAIN
            } else {
                node_flags::NONE
            };
            expression = match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    self.finish_property_access(start, expression, false, chain_flags)
                }
                SyntaxKind::OpenBracketToken => {
                    self.finish_element_access(start, expression, false, chain_flags)
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    self.finish_call(start, expression, chain_flags)
                }
                SyntaxKind::QuestionDotToken if allow_calls => {
                    self.next_token();
                    in_optional_chain = true;
                    match self.token() {
                        SyntaxKind::OpenBracketToken => self.finish_element_access(
                            start,
                            expression,
                            true,
                            node_flags::OPTIONAL_CHAIN,
                        ),
                        SyntaxKind::OpenParenToken => {
                            self.finish_call(start, expression, node_flags::OPTIONAL_CHAIN)
                        }
                        _ => self.finish_property_access(
                            start,
                            expression,
                            true,
                            node_flags::OPTIONAL_CHAIN,
                        ),
                    }
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    if in_optional_chain {
                        self.parse_error_at_current_token(
                            diagnostic_messages::EXPRESSION_EXPECTED,
                            diagnostic_codes::EXPRESSION_EXPECTED,
                        );
                    }
                    let template = self.parse_template_literal();
                    let tagged = self.arena.add_tagged_template(
                        syntax_kind_ext::TAGGED_TEMPLATE_EXPRESSION,
                        start,
                        self.node_end(),
                        TaggedTemplateData {
                            tag: expression,
                            template,
                        },
                    );
                    self.set_node_flags(tagged, chain_flags);
                    tagged
                }
                _ => break,
            };
        }
        expression
    }

    fn finish_property_access(
        &mut self,
        start: u32,
        expression: NodeIndex,
        question_dot_token: bool,
        flags: u32,
    ) -> NodeIndex {
        let name_or_argument = self.parse_identifier_name();
        let access = self.arena.add_access_expr(
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
            start,
            self.node_end(),
            AccessExprData {
                expression,
                name_or_argument,
                question_dot_token,
            },
        );
        self.set_node_flags(access, flags);
        access
    }

    fn finish_element_access(
        &mut self,
        start: u32,
        expression: NodeIndex,
        question_dot_token: bool,
        flags: u32,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let name_or_argument =
            self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression());
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let access = self.arena.add_access_expr(
            syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION,
            start,
            self.node_end(),
            AccessExprData {
                expression,
                name_or_argument,
                question_dot_token,
            },
        );
        self.set_node_flags(access, flags);
        access
    }

    fn finish_call(&mut self, start: u32, expression: NodeIndex, flags: u32) -> NodeIndex {
        let arguments = self.parse_argument_list();
        let call = self.arena.add_call_expr(
            syntax_kind_ext::CALL_EXPRESSION,
            start,
            self.node_end(),
            CallExprData {
                expression,
                arguments: Some(arguments),
            },
        );
        self.set_node_flags(call, flags);
        call
    }

    fn set_node_flags(&mut self, index: NodeIndex, flags: u32) {
        if flags != node_flags::NONE
            && let Some(node) = self.arena.get_mut(index)
        {
            node.flags |= flags as u16;
        }
    }

    fn parse_argument_list(&mut self) -> NodeList {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let mut arguments = Vec::new();
        let mut has_trailing_comma = false;
        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| {
            while !p.is_token(SyntaxKind::CloseParenToken)
                && !p.is_token(SyntaxKind::EndOfFileToken)
            {
                let argument = p.parse_spread_or_assignment(syntax_kind_ext::SPREAD_ELEMENT);
                if argument.is_none() {
                    p.parse_error_at_current_token(
                        diagnostic_messages::ARGUMENT_EXPRESSION_EXPECTED,
                        diagnostic_codes::ARGUMENT_EXPRESSION_EXPECTED,
                    );
                    break;
                }
                arguments.push(argument);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
                has_trailing_comma = p.is_token(SyntaxKind::CloseParenToken);
            }
        });
        self.parse_expected(SyntaxKind::CloseParenToken);

        let mut list = NodeList::with_nodes(arguments);
        list.pos = pos;
        list.end = self.node_end();
        list.has_trailing_comma = has_trailing_comma;
        list
    }

    /// `...expr` or a plain assignment expression.
    fn parse_spread_or_assignment(&mut self, spread_kind: u16) -> NodeIndex {
        if !self.is_token(SyntaxKind::DotDotDotToken) {
            return self.parse_assignment_expression();
        }
        let start = self.token_pos();
        self.next_token();
        let expression = self.parse_assignment_expression_or_report();
        self.arena.add_spread(
            spread_kind,
            start,
            self.node_end(),
            SpreadData { expression },
        )
    }

    /// `new X(args)`, `new X` and `new.target`.
    fn parse_new_expression(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.skip_token_as_missing();
        }
        let start = self.token_pos();
        self.next_token();

        if self.parse_optional(SyntaxKind::DotToken) {
            let name = self.parse_identifier_name();
            self.exit_recursion();
            return self.arena.add_meta_property(
                syntax_kind_ext::META_PROPERTY,
                start,
                self.node_end(),
                MetaPropertyData {
                    keyword_token: SyntaxKind::NewKeyword as u16,
                    name,
                },
            );
        }

        let callee_start = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        let callee = if callee.is_some() {
            self.parse_member_expression_rest(callee_start, callee, false)
        } else {
            self.error_expression_expected();
            callee
        };
        let arguments = self
            .is_token(SyntaxKind::OpenParenToken)
            .then(|| self.parse_argument_list());
        self.exit_recursion();

        self.arena.add_call_expr(
            syntax_kind_ext::NEW_EXPRESSION,
            start,
            self.node_end(),
            CallExprData {
                expression: callee,
                arguments,
            },
        )
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral | SyntaxKind::StringLiteral => {
                self.parse_literal_node()
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                self.parse_template_literal()
            }
            SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword => self.parse_token_node(),
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(),
            SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                self.parse_function_expression()
            }
            SyntaxKind::ClassKeyword => self.parse_class(syntax_kind_ext::CLASS_EXPRESSION, true),
            SyntaxKind::ImportKeyword => self.parse_import_meta_or_call(),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.current_token = self.scanner.re_scan_slash_token();
                if self.scanner.is_unterminated() {
                    self.parse_error_at_current_token(
                        diagnostic_messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
                        diagnostic_codes::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
                    );
                }
                self.parse_literal_node()
            }
            SyntaxKind::PrivateIdentifier => self.parse_identifier_name(),
            _ if self.is_identifier() => self.parse_identifier(),
            _ => {
                self.error_expression_expected();
                NodeIndex::NONE
            }
        }
    }

    /// Keyword-shaped expression with no data (`this`, `true`, ...).
    fn parse_token_node(&mut self) -> NodeIndex {
        let kind = self.token() as u16;
        let start = self.token_pos();
        let end = self.token_end();
        self.next_token();
        self.arena.add_token(kind, start, end)
    }

    /// `import.meta` is a meta-property; `import(x)` is a call whose callee
    /// is the bare `import` keyword.
    fn parse_import_meta_or_call(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let end = self.token_end();
        self.next_token();
        if self.parse_optional(SyntaxKind::DotToken) {
            let name = self.parse_identifier_name();
            return self.arena.add_meta_property(
                syntax_kind_ext::META_PROPERTY,
                start,
                self.node_end(),
                MetaPropertyData {
                    keyword_token: SyntaxKind::ImportKeyword as u16,
                    name,
                },
            );
        }
        if !self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_expected(SyntaxKind::OpenParenToken);
        }
        self.arena
            .add_token(SyntaxKind::ImportKeyword as u16, start, end)
    }

    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if !self.is_identifier() {
            self.error_identifier_expected();
            return NodeIndex::NONE;
        }
        self.finish_identifier(SyntaxKind::Identifier)
    }

    /// Any identifier or keyword, as allowed after `.` and in property names.
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::PrivateIdentifier) {
            return self.finish_identifier(SyntaxKind::PrivateIdentifier);
        }
        if !token_is_identifier_or_keyword(self.token()) {
            self.error_identifier_expected();
            return NodeIndex::NONE;
        }
        self.finish_identifier(SyntaxKind::Identifier)
    }

    fn finish_identifier(&mut self, kind: SyntaxKind) -> NodeIndex {
        let start = self.token_pos();
        let end = self.token_end();
        let escaped_text = self.scanner.get_token_value_ref().to_string();
        self.next_token();
        self.arena.add_identifier(
            kind as u16,
            start,
            end,
            IdentifierData { escaped_text },
        )
    }

    /// Literal node for the current token, keeping both cooked and raw text.
    pub(crate) fn parse_literal_node(&mut self) -> NodeIndex {
        let kind = self.token() as u16;
        let start = self.token_pos();
        let end = self.token_end();
        let text = self.scanner.get_token_value_ref().to_string();
        let raw_text = Some(self.scanner.get_token_text().to_string());
        self.next_token();
        self.arena
            .add_literal(kind, start, end, LiteralData { text, raw_text })
    }

    fn parse_template_literal(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::NoSubstitutionTemplateLiteral) {
            return self.parse_literal_node();
        }

        let start = self.token_pos();
        let head = self.parse_literal_node();
        let mut spans = Vec::new();
        loop {
            let span_start = self.token_pos();
            let expression =
                self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression());
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.parse_expected(SyntaxKind::CloseBraceToken);
                break;
            }
            self.current_token = self.scanner.re_scan_template_token();
            if self.scanner.is_unterminated() {
                self.parse_error_at_current_token(
                    diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL,
                    diagnostic_codes::UNTERMINATED_TEMPLATE_LITERAL,
                );
            }
            let is_tail = self.is_token(SyntaxKind::TemplateTail);
            let literal = self.parse_literal_node();
            spans.push(self.arena.add_template_span(
                syntax_kind_ext::TEMPLATE_SPAN,
                span_start,
                self.node_end(),
                TemplateSpanData {
                    expression,
                    literal,
                },
            ));
            if is_tail {
                break;
            }
        }

        self.arena.add_template_expr(
            syntax_kind_ext::TEMPLATE_EXPRESSION,
            start,
            self.node_end(),
            TemplateExprData {
                head,
                template_spans: NodeList::with_nodes(spans),
            },
        )
    }

    fn parse_parenthesized_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let expression =
            self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression());
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.arena.add_parenthesized(
            syntax_kind_ext::PARENTHESIZED_EXPRESSION,
            start,
            self.node_end(),
            ParenthesizedData { expression },
        )
    }

    fn parse_function_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let is_async = self.parse_optional(SyntaxKind::AsyncKeyword);
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let asterisk_token = self.parse_optional(SyntaxKind::AsteriskToken);
        let (set, clear) = function_context(is_async, asterisk_token);
        let name = if self.with_context(set, clear, |p| p.is_identifier()) {
            self.finish_identifier(SyntaxKind::Identifier)
        } else {
            NodeIndex::NONE
        };
        let (parameters, body) = self.parse_function_signature_and_body(is_async, asterisk_token);
        self.arena.add_function(
            syntax_kind_ext::FUNCTION_EXPRESSION,
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

    // =========================================================================
    // Array and object literals
    // =========================================================================

    fn parse_array_literal(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| {
            while !p.is_token(SyntaxKind::CloseBracketToken)
                && !p.is_token(SyntaxKind::EndOfFileToken)
            {
                if p.is_token(SyntaxKind::CommaToken) {
                    let pos = p.token_pos();
                    elements.push(
                        p.arena
                            .add_token(syntax_kind_ext::OMITTED_EXPRESSION, pos, pos),
                    );
                    p.next_token();
                    continue;
                }
                let element = p.parse_spread_or_assignment(syntax_kind_ext::SPREAD_ELEMENT);
                if element.is_none() {
                    p.error_expression_expected();
                    break;
                }
                elements.push(element);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        });
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_literal_expr(
            syntax_kind_ext::ARRAY_LITERAL_EXPRESSION,
            start,
            self.node_end(),
            LiteralExprData {
                elements: NodeList::with_nodes(elements),
                multi_line: false,
            },
        )
    }

    pub(crate) fn parse_object_literal(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut elements = Vec::new();
        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| {
            while !p.is_token(SyntaxKind::CloseBraceToken)
                && !p.is_token(SyntaxKind::EndOfFileToken)
            {
                let element = p.parse_object_literal_element();
                if element.is_none() {
                    break;
                }
                elements.push(element);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        });
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let end = self.node_end();
        let multi_line = self
            .scanner
            .source_text()
            .get(start as usize..end as usize)
            .is_some_and(|text| text.contains('\n'));
        self.arena.add_literal_expr(
            syntax_kind_ext::OBJECT_LITERAL_EXPRESSION,
            start,
            end,
            LiteralExprData {
                elements: NodeList::with_nodes(elements),
                multi_line,
            },
        )
    }

    fn parse_object_literal_element(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if self.is_token(SyntaxKind::DotDotDotToken) {
            return self.parse_spread_or_assignment(syntax_kind_ext::SPREAD_ASSIGNMENT);
        }

        let (is_async, accessor, asterisk_token) = self.parse_method_prefix();
        let has_prefix = is_async || accessor.is_some() || asterisk_token;
        let can_be_shorthand = !has_prefix && self.is_identifier();

        let name = self.parse_property_name();
        if name.is_none() {
            self.parse_error_at_current_token(
                diagnostic_messages::PROPERTY_ASSIGNMENT_EXPECTED,
                diagnostic_codes::PROPERTY_ASSIGNMENT_EXPECTED,
            );
            return NodeIndex::NONE;
        }

        if self.is_token(SyntaxKind::OpenParenToken) {
            let kind = match accessor {
                Some(SyntaxKind::GetKeyword) => syntax_kind_ext::GET_ACCESSOR,
                Some(_) => syntax_kind_ext::SET_ACCESSOR,
                None => syntax_kind_ext::METHOD_DECLARATION,
            };
            let (parameters, body) = self.parse_function_signature_and_body(is_async, asterisk_token);
            return self.arena.add_function(
                kind,
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
            );
        }

        if self.parse_optional(SyntaxKind::ColonToken) {
            let initializer = self.parse_assignment_expression_or_report();
            return self.arena.add_property_assignment(
                syntax_kind_ext::PROPERTY_ASSIGNMENT,
                start,
                self.node_end(),
                PropertyAssignmentData { name, initializer },
            );
        }

        if !can_be_shorthand {
            self.parse_expected(SyntaxKind::ColonToken);
            return NodeIndex::NONE;
        }

        // `{ a = 1 } = obj` cover grammar
        let equals_token = self.parse_optional(SyntaxKind::EqualsToken);
        let object_assignment_initializer = if equals_token {
            self.parse_assignment_expression_or_report()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_shorthand_property(
            syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT,
            start,
            self.node_end(),
            ShorthandPropertyData {
                name,
                equals_token,
                object_assignment_initializer,
            },
        )
    }

    /// Identifier-like, string, numeric or computed (`[expr]`) property name.
    pub(crate) fn parse_property_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                self.parse_literal_node()
            }
            SyntaxKind::OpenBracketToken => {
                let start = self.token_pos();
                self.next_token();
                let expression = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| {
                    p.parse_assignment_expression_or_report()
                });
                self.parse_expected(SyntaxKind::CloseBracketToken);
                self.arena.add_computed_property(
                    syntax_kind_ext::COMPUTED_PROPERTY_NAME,
                    start,
                    self.node_end(),
                    ComputedPropertyData { expression },
                )
            }
            _ => self.parse_identifier_name(),
        }
    }
}
