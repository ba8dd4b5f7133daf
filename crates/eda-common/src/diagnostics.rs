//! Diagnostic types shared by the parser and the direct-access checker.
//!
//! A diagnostic is plain data: a category, a numeric code, the file it
//! belongs to, and a byte span. Hosts decide how to surface it.

use serde::Serialize;

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

impl DiagnosticCategory {
    /// Lowercase label used when rendering.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        }
    }
}

/// Related information for a diagnostic (e.g., "see also" locations).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A diagnostic message anchored to a span of a source file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Arguments the message template was filled with, in placeholder order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub message_args: Vec<String>,
    /// Related information spans (e.g., the declaration a lookup stopped at)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            message_args: Vec::new(),
            related_information: Vec::new(),
        }
    }

    /// Record the arguments `message_text` was formatted from.
    #[must_use]
    pub fn with_message_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.message_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, file: String, start: u32, length: u32, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }

    /// End offset of the anchored span.
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.start + self.length
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}): {} EDA{}: {}",
            self.file,
            self.start,
            self.category.label(),
            self.code,
            self.message_text
        )
    }
}

impl std::error::Error for Diagnostic {}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

impl DiagnosticMessage {
    /// Fill the `{0}`, `{1}`, ... placeholders of this template.
    #[must_use]
    pub fn format(&self, args: &[&str]) -> String {
        format_message(self.message, args)
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Numeric codes for every diagnostic the workspace emits.
///
/// Parser codes follow the conventional TypeScript numbering so that hosts
/// already mapping those codes keep working; rule violations live in 91xx.
pub mod diagnostic_codes {
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const TOKEN_EXPECTED: u32 = 1005;
    pub const ASTERISK_SLASH_EXPECTED: u32 = 1010;
    pub const EXPRESSION_EXPECTED: u32 = 1109;
    pub const INVALID_CHARACTER: u32 = 1127;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1128;
    pub const VARIABLE_DECLARATION_EXPECTED: u32 = 1134;
    pub const ARGUMENT_EXPRESSION_EXPECTED: u32 = 1135;
    pub const PROPERTY_ASSIGNMENT_EXPECTED: u32 = 1136;
    pub const STRING_LITERAL_EXPECTED: u32 = 1141;
    pub const UNTERMINATED_TEMPLATE_LITERAL: u32 = 1160;
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: u32 = 1161;
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: u32 = 1990;

    pub const OPTIONAL_CHAINING_ON_PROTECTED_PATH: u32 = 9101;
    pub const DESTRUCTURING_WITH_OPTIONAL_CHAINING: u32 = 9102;
    pub const DESTRUCTURING_PROTECTED_PATH: u32 = 9103;
}

/// Message templates keyed like `diagnostic_codes`.
pub mod diagnostic_messages {
    pub const UNTERMINATED_STRING_LITERAL: &str = "Unterminated string literal.";
    pub const IDENTIFIER_EXPECTED: &str = "Identifier expected.";
    pub const TOKEN_EXPECTED: &str = "'{0}' expected.";
    pub const ASTERISK_SLASH_EXPECTED: &str = "'*/' expected.";
    pub const EXPRESSION_EXPECTED: &str = "Expression expected.";
    pub const INVALID_CHARACTER: &str = "Invalid character.";
    pub const DECLARATION_OR_STATEMENT_EXPECTED: &str = "Declaration or statement expected.";
    pub const VARIABLE_DECLARATION_EXPECTED: &str = "Variable declaration expected.";
    pub const ARGUMENT_EXPRESSION_EXPECTED: &str = "Argument expression expected.";
    pub const PROPERTY_ASSIGNMENT_EXPECTED: &str = "Property assignment expected.";
    pub const STRING_LITERAL_EXPECTED: &str = "String literal expected.";
    pub const UNTERMINATED_TEMPLATE_LITERAL: &str = "Unterminated template literal.";
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: &str =
        "Unterminated regular expression literal.";
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: &str = "Maximum nesting depth exceeded.";

    pub const OPTIONAL_CHAINING_ON_PROTECTED_PATH: &str = "Optional chaining with '{0}' is unsafe. Remove the optional chaining operator ('?.') and access properties directly instead.";
    pub const DESTRUCTURING_WITH_OPTIONAL_CHAINING: &str = "Destructuring with optional chaining on '{0}' is unsafe. Remove both destructuring and optional chaining. Access properties directly from '{0}'.";
    pub const DESTRUCTURING_PROTECTED_PATH: &str =
        "Destructuring '{0}' is unsafe. Access properties directly from '{0}' instead of destructuring.";
}
