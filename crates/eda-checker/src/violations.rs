//! Violations raised by the direct-access checker.

use eda_common::{Diagnostic, diagnostic_codes, diagnostic_messages, format_message};
use std::fmt;

/// The three unsafe access patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// `process.env?.API_KEY`
    OptionalChaining,
    /// `const { API_KEY } = process?.env`
    DestructuringWithOptional,
    /// `const { API_KEY } = process.env`
    Destructuring,
}

impl ViolationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ViolationKind::OptionalChaining => "optional-chaining",
            ViolationKind::DestructuringWithOptional => "destructuring-with-optional",
            ViolationKind::Destructuring => "destructuring",
        }
    }

    pub const fn code(self) -> u32 {
        match self {
            ViolationKind::OptionalChaining => diagnostic_codes::OPTIONAL_CHAINING_ON_PROTECTED_PATH,
            ViolationKind::DestructuringWithOptional => {
                diagnostic_codes::DESTRUCTURING_WITH_OPTIONAL_CHAINING
            }
            ViolationKind::Destructuring => diagnostic_codes::DESTRUCTURING_PROTECTED_PATH,
        }
    }

    /// Message template; `{0}` is the path.
    pub const fn message_template(self) -> &'static str {
        match self {
            ViolationKind::OptionalChaining => {
                diagnostic_messages::OPTIONAL_CHAINING_ON_PROTECTED_PATH
            }
            ViolationKind::DestructuringWithOptional => {
                diagnostic_messages::DESTRUCTURING_WITH_OPTIONAL_CHAINING
            }
            ViolationKind::Destructuring => diagnostic_messages::DESTRUCTURING_PROTECTED_PATH,
        }
    }

    /// Short label for the offending span.
    pub const fn label(self) -> &'static str {
        match self {
            ViolationKind::OptionalChaining => "remove the optional chaining operator ('?.')",
            ViolationKind::DestructuringWithOptional => {
                "remove both destructuring and optional chaining"
            }
            ViolationKind::Destructuring => "remove destructuring pattern",
        }
    }

    pub const fn note(self) -> &'static str {
        match self {
            ViolationKind::OptionalChaining => {
                "Optional chaining prevents static analysis tools from correctly identifying \
                 property accesses during build-time text replacement."
            }
            ViolationKind::DestructuringWithOptional => {
                "The combination of destructuring and optional chaining makes it impossible \
                 for static analysis tools to track property access patterns."
            }
            ViolationKind::Destructuring => {
                "Destructuring breaks the static property access chain that build-time text \
                 replacement tools rely on."
            }
        }
    }

    /// Suggested rewrite for `path`.
    pub fn help(self, path: &str) -> String {
        match self {
            ViolationKind::OptionalChaining => format!(
                "Access properties directly from '{path}' instead:\n\
                 - Bad:  {path}?.property\n\
                 - Good: {path}.property"
            ),
            ViolationKind::DestructuringWithOptional => format!(
                "Access properties directly from '{path}' instead:\n\
                 - Bad:  const {{ prop }} = {path}?.object;\n\
                 - Good: {path}.object.prop"
            ),
            ViolationKind::Destructuring => format!(
                "Access properties directly from '{path}' instead:\n\
                 - Bad:  const {{ prop }} = parent;\n\
                 - Good: {path}.prop"
            ),
        }
    }

    /// Look a kind up by its code.
    pub const fn from_code(code: u32) -> Option<ViolationKind> {
        match code {
            diagnostic_codes::OPTIONAL_CHAINING_ON_PROTECTED_PATH => {
                Some(ViolationKind::OptionalChaining)
            }
            diagnostic_codes::DESTRUCTURING_WITH_OPTIONAL_CHAINING => {
                Some(ViolationKind::DestructuringWithOptional)
            }
            diagnostic_codes::DESTRUCTURING_PROTECTED_PATH => Some(ViolationKind::Destructuring),
            _ => None,
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A violation at `start..end`, carrying the matched path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectAccessViolation {
    pub kind: ViolationKind,
    pub path: String,
    pub start: u32,
    pub end: u32,
}

impl DirectAccessViolation {
    pub fn new(kind: ViolationKind, path: String, start: u32, end: u32) -> Self {
        DirectAccessViolation {
            kind,
            path,
            start,
            end,
        }
    }

    pub fn message(&self) -> String {
        format_message(self.kind.message_template(), &[self.path.as_str()])
    }

    pub fn into_diagnostic(self, file_name: &str) -> Diagnostic {
        let message = self.message();
        Diagnostic::error(
            file_name.to_string(),
            self.start,
            self.end.saturating_sub(self.start),
            message,
            self.kind.code(),
        )
        .with_message_args([self.path])
    }
}

impl fmt::Display for DirectAccessViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for DirectAccessViolation {}
