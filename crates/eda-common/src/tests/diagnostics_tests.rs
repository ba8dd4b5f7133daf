//! Tests for diagnostic records and message formatting.

use crate::diagnostics::*;

#[test]
fn test_format_message_replaces_positional_args() {
    let msg = format_message("Destructuring '{0}' is unsafe. Use '{0}' directly.", &["process.env"]);
    assert_eq!(
        msg,
        "Destructuring 'process.env' is unsafe. Use 'process.env' directly."
    );
}

#[test]
fn test_format_message_leaves_unknown_placeholders() {
    let msg = format_message("{0} and {1}", &["a"]);
    assert_eq!(msg, "a and {1}");
}

#[test]
fn test_diagnostic_error_constructor() {
    let diag = Diagnostic::error("a.js".to_string(), 10, 5, "boom".to_string(), 9101);
    assert_eq!(diag.category, DiagnosticCategory::Error);
    assert_eq!(diag.end(), 15);
    assert!(diag.related_information.is_empty());
}

#[test]
fn test_diagnostic_with_related() {
    let diag = Diagnostic::error("a.js".to_string(), 0, 1, "x".to_string(), 1)
        .with_related("a.js".to_string(), 4, 2, "declared here".to_string());
    assert_eq!(diag.related_information.len(), 1);
    assert_eq!(
        diag.related_information[0].category,
        DiagnosticCategory::Message
    );
}

#[test]
fn test_diagnostic_display() {
    let diag = Diagnostic::error("a.js".to_string(), 3, 1, "bad".to_string(), 9103);
    assert_eq!(diag.to_string(), "a.js(3): error EDA9103: bad");
}

#[test]
fn test_diagnostic_message_template() {
    let message = DiagnosticMessage {
        code: 1,
        category: DiagnosticCategory::Warning,
        message: "'{0}' is unused.",
    };
    assert_eq!(message.format(&["x"]), "'x' is unused.");
}
