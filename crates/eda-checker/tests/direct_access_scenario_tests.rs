//! End-to-end scenarios: parse, bind, check.

use eda_binder::BinderState;
use eda_checker::{
    DirectAccessChecker, DirectAccessOptions, DirectAccessViolation, ProtectedPaths, ViolationKind,
};
use eda_parser::ParserState;

fn run(source: &str, options: &DirectAccessOptions) -> Result<(), DirectAccessViolation> {
    let mut parser = ParserState::new("scenario.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        parser.get_diagnostics()
    );
    let arena = parser.get_arena();
    let mut binder = BinderState::new();
    binder.bind_source_file(arena, root);
    let paths = ProtectedPaths::from_options(options);
    DirectAccessChecker::new(arena, &binder, &paths).check_source_file(root)
}

fn process_env() -> DirectAccessOptions {
    DirectAccessOptions::with_paths(["process.env"])
}

fn import_meta_env() -> DirectAccessOptions {
    DirectAccessOptions::with_paths(["import.meta.env"])
}

fn expect_violation(source: &str, options: &DirectAccessOptions) -> DirectAccessViolation {
    match run(source, options) {
        Err(violation) => violation,
        Ok(()) => panic!("expected a violation for {source:?}"),
    }
}

// =============================================================================
// Reference scenarios, `paths: ["process.env"]`
// =============================================================================

#[test]
fn test_optional_link_inside_protected_path() {
    let violation = expect_violation("const x = process?.env.API_KEY;", &process_env());
    assert_eq!(violation.kind, ViolationKind::OptionalChaining);
    assert_eq!(violation.path, "process.env");
}

#[test]
fn test_plain_access_is_clean() {
    assert_eq!(run("const x = process.env.API_KEY;", &process_env()), Ok(()));
}

#[test]
fn test_destructuring_protected_path_from_parent() {
    let violation = expect_violation("const { env } = process;", &process_env());
    assert_eq!(violation.kind, ViolationKind::Destructuring);
    assert_eq!(violation.path, "process.env");
}

#[test]
fn test_destructuring_unconfigured_child_is_clean() {
    assert_eq!(run("const { API_KEY } = process.env;", &process_env()), Ok(()));
}

#[test]
fn test_destructuring_optional_protected_path() {
    let violation = expect_violation("const { API_KEY } = process?.env;", &process_env());
    assert_eq!(violation.kind, ViolationKind::DestructuringWithOptional);
    assert_eq!(violation.path, "process.env");
}

#[test]
fn test_parameter_shadows_process() {
    let source = "function f(process){ const x = process?.env.API_KEY; }";
    assert_eq!(run(source, &process_env()), Ok(()));
}

// =============================================================================
// Optional chaining
// =============================================================================

#[test]
fn test_optional_chaining_on_protected_path() {
    let source = "const key = process.env?.API_KEY;";
    let violation = expect_violation(source, &process_env());
    assert_eq!(violation.kind, ViolationKind::OptionalChaining);
    assert_eq!(violation.path, "process.env");
    assert_eq!(
        &source[violation.start as usize..violation.end as usize],
        "process.env?.API_KEY"
    );
    assert_eq!(
        violation.message(),
        "Optional chaining with 'process.env' is unsafe. Remove the optional chaining \
         operator ('?.') and access properties directly instead."
    );
}

#[test]
fn test_optional_chaining_inside_protected_path() {
    let violation = expect_violation("if (process?.env.DEBUG) {}", &process_env());
    assert_eq!(violation.kind, ViolationKind::OptionalChaining);
    assert_eq!(violation.path, "process.env");
}

#[test]
fn test_optional_element_access() {
    let violation = expect_violation("use(process.env?.['API_KEY']);", &process_env());
    assert_eq!(violation.kind, ViolationKind::OptionalChaining);
}

#[test]
fn test_optional_chaining_before_a_call() {
    let violation = expect_violation("process.env?.API_KEY.trim();", &process_env());
    assert_eq!(violation.kind, ViolationKind::OptionalChaining);
}

#[test]
fn test_optional_chaining_on_import_meta_env() {
    let violation = expect_violation("const mode = import.meta.env?.MODE;", &import_meta_env());
    assert_eq!(violation.kind, ViolationKind::OptionalChaining);
    assert_eq!(violation.path, "import.meta.env");

    let violation = expect_violation("const mode = import.meta?.env.MODE;", &import_meta_env());
    assert_eq!(violation.path, "import.meta.env");
}

#[test]
fn test_direct_access_is_allowed() {
    let source = "\
        const key = process.env.API_KEY;\n\
        const mode = process.env['NODE_ENV'];\n\
        if (process.env.DEBUG) { console.log(process.env.DEBUG); }\n";
    assert_eq!(run(source, &process_env()), Ok(()));
}

#[test]
fn test_optional_chaining_elsewhere_is_allowed() {
    let source = "const name = user?.profile?.name; const argv = process?.argv;";
    assert_eq!(run(source, &process_env()), Ok(()));
}

#[test]
fn test_dynamic_keys_are_not_checked() {
    assert_eq!(run("const v = process.env?.[name];", &process_env()), Ok(()));
}

// =============================================================================
// Destructuring
// =============================================================================

#[test]
fn test_destructuring_protected_child() {
    let options = DirectAccessOptions::with_paths(["process.env.API_KEY"]);
    let source = "const { API_KEY } = process.env;";
    let violation = expect_violation(source, &options);
    assert_eq!(violation.kind, ViolationKind::Destructuring);
    assert_eq!(violation.path, "process.env.API_KEY");
    assert_eq!(
        &source[violation.start as usize..violation.end as usize],
        "{ API_KEY } = process.env"
    );
}

#[test]
fn test_destructuring_from_import_meta_env_child() {
    let options = DirectAccessOptions::with_paths(["import.meta.env.MODE"]);
    let violation = expect_violation("const { MODE } = import.meta.env;", &options);
    assert_eq!(violation.kind, ViolationKind::Destructuring);
    assert_eq!(violation.path, "import.meta.env.MODE");

    assert_eq!(run("const { MODE } = import.meta.env;", &import_meta_env()), Ok(()));
}

#[test]
fn test_destructuring_with_optional_chaining() {
    let source = "const { API_KEY } = process?.env;";
    let violation = expect_violation(source, &process_env());
    assert_eq!(violation.kind, ViolationKind::DestructuringWithOptional);
    assert_eq!(violation.path, "process.env");
    assert_eq!(
        violation.message(),
        "Destructuring with optional chaining on 'process.env' is unsafe. Remove both \
         destructuring and optional chaining. Access properties directly from 'process.env'."
    );
}

#[test]
fn test_destructuring_optional_descendant_is_allowed() {
    // The initializer is inside the chain but is not itself configured
    let options = DirectAccessOptions::with_paths(["process.env", "process.env.A.B"]);
    assert_eq!(run("const { B } = process.env?.A;", &options), Ok(()));
}

#[test]
fn test_inner_optional_link_in_initializer_is_still_checked() {
    // `process?.env` is flagged by the chain check even though the
    // whole initializer is handled by the destructuring check
    let options = DirectAccessOptions::with_paths(["process.env"]);
    let violation = expect_violation("const { B } = process?.env.A;", &options);
    assert_eq!(violation.kind, ViolationKind::OptionalChaining);
    assert_eq!(violation.path, "process.env");
}

#[test]
fn test_parenthesized_initializer() {
    let violation = expect_violation("const { API_KEY } = (process?.env);", &process_env());
    assert_eq!(violation.kind, ViolationKind::DestructuringWithOptional);
}

// =============================================================================
// Shadowing
// =============================================================================

#[test]
fn test_shadowed_base_is_ignored() {
    let source = "function run(process) { return process.env?.API_KEY; }";
    assert_eq!(run(source, &process_env()), Ok(()));

    let source = "const process = { env: {} };\nconst { API_KEY } = process?.env;";
    assert_eq!(run(source, &process_env()), Ok(()));
}

#[test]
fn test_shadowing_is_lexical() {
    let source = "\
        function local(process) { return process.env?.A; }\n\
        function global() { return process.env?.A; }\n";
    let violation = expect_violation(source, &process_env());
    assert_eq!(violation.kind, ViolationKind::OptionalChaining);
    assert!(violation.start as usize > source.find("function global").expect("global fn"));
}

#[test]
fn test_imported_binding_shadows_global() {
    let source = "import process from 'node:process';\nprocess.env?.API_KEY;";
    assert_eq!(run(source, &process_env()), Ok(()));
}

#[test]
fn test_hoisted_var_shadows_earlier_use() {
    let source = "function f() { use(process.env?.A); var process = {}; }";
    assert_eq!(run(source, &process_env()), Ok(()));
}

#[test]
fn test_meta_properties_cannot_be_shadowed() {
    let source = "function f(meta, env) { return import.meta.env?.MODE; }";
    assert!(run(source, &import_meta_env()).is_err());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_missing_or_empty_paths_are_inert() {
    let source = "const { A } = process?.env; process.env?.B;";
    assert_eq!(run(source, &DirectAccessOptions::default()), Ok(()));
    assert_eq!(
        run(source, &DirectAccessOptions::with_paths(Vec::<String>::new())),
        Ok(())
    );
    assert_eq!(
        run(source, &DirectAccessOptions::from_json_lossy("{ not json")),
        Ok(())
    );
}

#[test]
fn test_several_paths() {
    let options = DirectAccessOptions::with_paths(["process.env", "import.meta.env"]);
    assert!(run("import.meta.env?.MODE;", &options).is_err());
    assert!(run("process.env?.MODE;", &options).is_err());
    assert!(run("window?.location;", &options).is_ok());
}

#[test]
fn test_new_target_path() {
    let options = DirectAccessOptions::with_paths(["new.target"]);
    let violation = expect_violation("function F() { return new.target?.name; }", &options);
    assert_eq!(violation.path, "new.target");
}

#[test]
fn test_checking_is_idempotent() {
    let source = "const a = process.env.A;\nconst b = process.env?.B;";
    let first = run(source, &process_env());
    let second = run(source, &process_env());
    assert!(first.is_err());
    assert_eq!(first, second);
}

#[test]
fn test_shadowing_deep_in_a_chain() {
    let chain = " + 1".repeat(2000);
    let shadowed = format!(
        "const x = (() => {{ var process; return process.env?.A; }})(){chain};"
    );
    assert_eq!(run(&shadowed, &process_env()), Ok(()));

    let global = format!("const x = (() => process.env?.A)(){chain};");
    let violation = expect_violation(&global, &process_env());
    assert_eq!(violation.kind, ViolationKind::OptionalChaining);
}
