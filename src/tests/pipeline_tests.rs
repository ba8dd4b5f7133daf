use crate::pipeline::{SourceUnit, check_source, check_sources};
use eda_checker::DirectAccessOptions;
use eda_common::diagnostic_codes;

fn options() -> DirectAccessOptions {
    DirectAccessOptions::with_paths(["process.env", "import.meta.env"])
}

#[test]
fn test_clean_source() {
    let source = "const key = process.env.API_KEY;\nexport default import.meta.env.MODE;";
    assert_eq!(check_source("clean.js", source, &options()), Ok(()));
}

#[test]
fn test_violation_becomes_diagnostic() {
    let source = "const key = process.env?.API_KEY;";
    let diagnostic = check_source("app.js", source, &options()).expect_err("violation");
    assert_eq!(diagnostic.file, "app.js");
    assert_eq!(diagnostic.code, diagnostic_codes::OPTIONAL_CHAINING_ON_PROTECTED_PATH);
    assert_eq!(diagnostic.start as usize, source.find("process").expect("process"));
    assert_eq!(diagnostic.length as usize, "process.env?.API_KEY".len());
    assert!(diagnostic.message_text.contains("'process.env'"));
}

#[test]
fn test_parse_error_stops_the_unit() {
    let diagnostic =
        check_source("broken.js", "const { A } = ;", &options()).expect_err("parse error");
    assert_eq!(diagnostic.file, "broken.js");
    assert!(
        diagnostic.code < 9000,
        "expected a syntax error code, got {}",
        diagnostic.code
    );
}

#[test]
fn test_inert_options_skip_everything() {
    assert_eq!(
        check_source("a.js", "process.env?.A", &DirectAccessOptions::default()),
        Ok(())
    );
    // Nothing is parsed when there is nothing to look for
    assert_eq!(
        check_source("b.js", "const { = ;", &DirectAccessOptions::default()),
        Ok(())
    );
}

#[test]
fn test_batch_preserves_order() {
    let units: Vec<SourceUnit> = (0..16)
        .map(|i| {
            let source = if i % 3 == 0 {
                format!("const v{i} = process.env?.K{i};")
            } else {
                format!("const v{i} = process.env.K{i};")
            };
            SourceUnit::new(format!("unit{i}.js"), source)
        })
        .collect();

    let outcomes = check_sources(&units, &options());
    assert_eq!(outcomes.len(), units.len());
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.file_name, format!("unit{i}.js"));
        assert_eq!(outcome.is_clean(), i % 3 != 0, "unit{i}");
    }
}

#[test]
fn test_batch_matches_single_checks() {
    let units = vec![
        SourceUnit::new("a.js", "const { API_KEY } = process?.env;"),
        SourceUnit::new("b.js", "const mode = import.meta.env?.MODE;"),
        SourceUnit::new("c.js", "function f(process) { return process.env?.X; }"),
    ];
    let outcomes = check_sources(&units, &options());
    for (unit, outcome) in units.iter().zip(&outcomes) {
        let single = check_source(&unit.file_name, &unit.source, &options()).err();
        assert_eq!(outcome.diagnostic, single);
    }
    assert!(!outcomes[0].is_clean());
    assert!(!outcomes[1].is_clean());
    assert!(outcomes[2].is_clean());
}

#[test]
fn test_outcome_serializes() {
    let outcomes = check_sources(&[SourceUnit::new("a.js", "process.env?.A;")], &options());
    let json = serde_json::to_value(&outcomes).expect("serialize");
    assert_eq!(json[0]["file_name"], "a.js");
    assert_eq!(json[0]["diagnostic"]["code"], 9101);
    assert_eq!(json[0]["diagnostic"]["message_args"][0], "process.env");
}
