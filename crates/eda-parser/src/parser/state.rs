//! Parser state - token handling, diagnostics and recursion guards.
//!
//! The parsing methods themselves live in `state_statements.rs` and
//! `state_expressions.rs` as further `impl ParserState` blocks.

use super::base::NodeIndex;
use super::node::NodeArena;
use eda_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use eda_common::limits::MAX_PARSER_DEPTH;
use eda_scanner::{ScannerState, SyntaxKind, keyword_to_text, punctuation_to_text};
use serde::Serialize;

/// Inside an async function body (`await` is an operator)
pub const CONTEXT_FLAG_ASYNC: u32 = 1 << 0;
/// Inside a generator body (`yield` is an operator)
pub const CONTEXT_FLAG_GENERATOR: u32 = 1 << 1;
/// `in` is not a binary operator (for-statement initializers)
pub const CONTEXT_FLAG_DISALLOW_IN: u32 = 1 << 2;

/// A syntax error found while parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: String,
    pub code: u32,
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) context_flags: u32,
    pub(crate) current_token: SyntaxKind,
    pub(crate) parse_diagnostics: Vec<ParseDiagnostic>,
    pub(crate) recursion_depth: u32,
    /// End of the most recently consumed token
    pub(crate) prev_token_end: u32,
    /// Position of the last reported error, to avoid cascades at one spot
    last_error_pos: Option<u32>,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        let capacity = source_text.len() / 4;
        ParserState {
            scanner: ScannerState::new(source_text, true),
            arena: NodeArena::with_capacity(capacity),
            file_name,
            context_flags: 0,
            current_token: SyntaxKind::Unknown,
            parse_diagnostics: Vec::new(),
            recursion_depth: 0,
            prev_token_end: 0,
            last_error_pos: None,
        }
    }

    // =========================================================================
    // Results
    // =========================================================================

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn get_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.parse_diagnostics
    }

    pub fn get_file_name(&self) -> &str {
        &self.file_name
    }

    pub fn get_source_text(&self) -> &str {
        self.scanner.source_text()
    }

    // =========================================================================
    // Token handling
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.get_token_pos()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.get_token_end()
    }

    /// End offset for a node whose last token was just consumed.
    #[inline]
    pub(crate) fn node_end(&self) -> u32 {
        self.prev_token_end
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.get_token_end();
        self.current_token = self.scanner.scan();
        self.report_scanner_errors();
        self.current_token
    }

    /// Advance without reporting scanner errors; only used inside `look_ahead`.
    pub(crate) fn advance_raw(&mut self) -> SyntaxKind {
        self.current_token = self.scanner.scan();
        self.current_token
    }

    /// Run `f` speculatively; scanner position and current token are restored
    /// afterwards regardless of what `f` consumed.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let token = self.current_token;
        let result = f(self);
        self.scanner.restore_state(snapshot);
        self.current_token = token;
        result
    }

    /// Kind of the token after the current one, and whether a line break
    /// precedes it.
    pub(crate) fn look_ahead_token(&mut self) -> (SyntaxKind, bool) {
        self.look_ahead(|p| {
            let next = p.advance_raw();
            (next, p.scanner.has_preceding_line_break())
        })
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    fn report_scanner_errors(&mut self) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        match self.current_token {
            SyntaxKind::Unknown => self.parse_error_at(
                start,
                length.max(1),
                diagnostic_messages::INVALID_CHARACTER,
                diagnostic_codes::INVALID_CHARACTER,
            ),
            SyntaxKind::StringLiteral if self.scanner.is_unterminated() => self.parse_error_at(
                start,
                length,
                diagnostic_messages::UNTERMINATED_STRING_LITERAL,
                diagnostic_codes::UNTERMINATED_STRING_LITERAL,
            ),
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead
                if self.scanner.is_unterminated() =>
            {
                self.parse_error_at(
                    start,
                    length,
                    diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL,
                    diagnostic_codes::UNTERMINATED_TEMPLATE_LITERAL,
                )
            }
            _ => {}
        }
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report "'x' expected." at the current token.
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            return true;
        }
        let text = punctuation_to_text(kind)
            .or_else(|| keyword_to_text(kind))
            .unwrap_or("token");
        let message = format_message(diagnostic_messages::TOKEN_EXPECTED, &[text]);
        self.parse_error_at_current_token(&message, diagnostic_codes::TOKEN_EXPECTED);
        false
    }

    /// Automatic semicolon insertion: a `;`, a `}`, end of file, or a line
    /// break before the current token all terminate a statement.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        self.is_token(SyntaxKind::SemicolonToken)
            || self.is_token(SyntaxKind::CloseBraceToken)
            || self.is_token(SyntaxKind::EndOfFileToken)
            || self.scanner.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return true;
        }
        if self.can_parse_semicolon() {
            return true;
        }
        self.parse_expected(SyntaxKind::SemicolonToken)
    }

    /// Identifier or a contextual keyword usable as one here.
    pub(crate) fn is_identifier(&self) -> bool {
        match self.token() {
            SyntaxKind::Identifier => true,
            SyntaxKind::AwaitKeyword => !self.in_context(CONTEXT_FLAG_ASYNC),
            SyntaxKind::YieldKeyword => !self.in_context(CONTEXT_FLAG_GENERATOR),
            kind => eda_scanner::token_is_contextual_keyword(kind),
        }
    }

    // =========================================================================
    // Context flags
    // =========================================================================

    #[inline]
    pub(crate) fn in_context(&self, flag: u32) -> bool {
        self.context_flags & flag != 0
    }

    /// Run `f` with `set` flags enabled and `clear` flags disabled.
    pub(crate) fn with_context<T>(
        &mut self,
        set: u32,
        clear: u32,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = self.context_flags;
        self.context_flags = (saved | set) & !clear;
        let result = f(self);
        self.context_flags = saved;
        result
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn parse_error_at(&mut self, start: u32, length: u32, message: &str, code: u32) {
        if self.last_error_pos == Some(start) {
            return;
        }
        self.last_error_pos = Some(start);
        tracing::debug!(file = %self.file_name, start, code, message, "parse error");
        self.parse_diagnostics.push(ParseDiagnostic {
            start,
            length,
            message: message.to_string(),
            code,
        });
    }

    pub(crate) fn parse_error_at_current_token(&mut self, message: &str, code: u32) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.parse_error_at(start, length, message, code);
    }

    pub(crate) fn error_expression_expected(&mut self) {
        self.parse_error_at_current_token(
            diagnostic_messages::EXPRESSION_EXPECTED,
            diagnostic_codes::EXPRESSION_EXPECTED,
        );
    }

    pub(crate) fn error_identifier_expected(&mut self) {
        self.parse_error_at_current_token(
            diagnostic_messages::IDENTIFIER_EXPECTED,
            diagnostic_codes::IDENTIFIER_EXPECTED,
        );
    }

    // =========================================================================
    // Recursion guard
    // =========================================================================

    /// Returns false (after reporting) when nesting is too deep to continue.
    pub(crate) fn enter_recursion(&mut self) -> bool {
        if self.recursion_depth >= MAX_PARSER_DEPTH {
            self.parse_error_at_current_token(
                diagnostic_messages::MAXIMUM_NESTING_DEPTH_EXCEEDED,
                diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED,
            );
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    /// Skip the current token and return a missing node, guaranteeing
    /// forward progress after an error.
    pub(crate) fn skip_token_as_missing(&mut self) -> NodeIndex {
        if !self.is_token(SyntaxKind::EndOfFileToken) {
            self.next_token();
        }
        NodeIndex::NONE
    }
}
