use crate::pipeline::check_source;
use crate::reporter::{Reporter, format_diagnostic};
use eda_checker::DirectAccessOptions;
use eda_common::Diagnostic;

fn violation(file: &str, source: &str) -> Diagnostic {
    check_source(
        file,
        source,
        &DirectAccessOptions::with_paths(["process.env", "process.env.API_KEY"]),
    )
    .expect_err("violation")
}

#[test]
fn test_header_has_location_and_code() {
    let source = "const a = 1;\nconst key = process.env?.API_URL;\n";
    let diagnostic = violation("src/app.js", source);
    let rendered = format_diagnostic(&diagnostic, source);
    let header = rendered.lines().next().expect("header");
    assert!(
        header.starts_with("src/app.js:2:13 - error EDA9101: Optional chaining with 'process.env'"),
        "{header}"
    );
}

#[test]
fn test_code_frame_underlines_span() {
    let source = "const key = process.env?.API_URL;";
    let diagnostic = violation("app.js", source);
    let rendered = format_diagnostic(&diagnostic, source);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[1], "    1   const key = process.env?.API_URL;");
    assert_eq!(
        lines[2],
        format!(
            "        {}{} remove the optional chaining operator ('?.')",
            " ".repeat(12),
            "~".repeat(20)
        )
    );
}

#[test]
fn test_note_and_help_follow_the_frame() {
    let source = "const { API_KEY } = process.env;";
    let diagnostic = violation("app.js", source);
    let rendered = format_diagnostic(&diagnostic, source);
    assert!(rendered.contains("= note: Destructuring breaks the static property access chain"));
    assert!(rendered.contains("= help: Access properties directly from 'process.env.API_KEY' instead:"));
    assert!(rendered.contains("- Good: process.env.API_KEY.prop"));
}

#[test]
fn test_multi_line_span_is_cut_at_line_end() {
    let source = "const {\n  API_KEY\n} = process.env;";
    let diagnostic = violation("app.js", source);
    let rendered = format_diagnostic(&diagnostic, source);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[1], "    1   const {");
    assert_eq!(
        lines[2],
        format!("        {}~ remove destructuring pattern", " ".repeat(6))
    );
}

#[test]
fn test_help_names_path_with_quote() {
    let source = r#"const a = process?.["it's"].A;"#;
    let diagnostic = check_source(
        "app.js",
        source,
        &DirectAccessOptions::with_paths(["process.it's"]),
    )
    .expect_err("violation");
    let rendered = format_diagnostic(&diagnostic, source);
    assert!(rendered.contains("= help: Access properties directly from 'process.it's' instead:"), "{rendered}");
    assert!(rendered.contains("- Bad:  process.it's?.property"), "{rendered}");
}

#[test]
fn test_unknown_file_falls_back_to_name() {
    let reporter = Reporter::new(false);
    let diagnostic = Diagnostic::error("missing.js".into(), 0, 3, "Broken.".into(), 1005);
    assert_eq!(
        reporter.format_diagnostic(&diagnostic),
        "missing.js - error EDA1005: Broken."
    );
}

#[test]
fn test_render_joins_diagnostics() {
    let first = "process.env?.A;";
    let second = "const { API_KEY } = process.env;";
    let mut reporter = Reporter::new(false);
    reporter.add_source("a.js", first);
    reporter.add_source("b.js", second);
    let rendered = reporter.render(&[violation("a.js", first), violation("b.js", second)]);
    assert!(rendered.contains("a.js:1:1 - error EDA9101"));
    assert!(rendered.contains("b.js:1:7 - error EDA9103"));
}

#[test]
fn test_color_output_keeps_text() {
    colored::control::set_override(true);
    let source = "process.env?.A;";
    let diagnostic = violation("a.js", source);
    let mut reporter = Reporter::new(true);
    reporter.add_source("a.js", source);
    let rendered = reporter.format_diagnostic(&diagnostic);
    assert!(rendered.contains("\u{1b}["));
    assert!(rendered.contains("Optional chaining with 'process.env'"));
}
