//! Tests for the two checker entry points.

use crate::direct_access::DirectAccessChecker;
use crate::global_reference::{BindingLookup, BindingResolver, NoBindings};
use crate::protected_paths::ProtectedPaths;
use crate::violations::{DirectAccessViolation, ViolationKind};
use eda_binder::BinderState;
use eda_parser::parser::node::NodeArena;
use eda_parser::{NodeIndex, ParserState, syntax_kind_ext};

fn parse(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        parser.get_diagnostics()
    );
    (parser, root)
}

fn check(source: &str, paths: &[&str]) -> Result<(), DirectAccessViolation> {
    let (parser, root) = parse(source);
    let arena = parser.get_arena();
    let mut binder = BinderState::new();
    binder.bind_source_file(arena, root);
    let paths = ProtectedPaths::new(paths.iter().copied());
    DirectAccessChecker::new(arena, &binder, &paths).check_source_file(root)
}

fn first_of_kind(arena: &NodeArena, kind: u16) -> NodeIndex {
    (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&idx| arena.kind_of(idx) == Some(kind))
        .expect("node of kind")
}

/// Resolver that treats one name as locally bound everywhere.
struct BoundName(&'static str);

impl BindingResolver for BoundName {
    fn resolve_binding(&self, _arena: &NodeArena, name: &str, _at: NodeIndex) -> BindingLookup {
        if name == self.0 {
            BindingLookup::Bound(NodeIndex::NONE)
        } else {
            BindingLookup::Unbound
        }
    }
}

#[test]
fn test_optional_chain_entry_reports_matched_configured_path() {
    let (parser, _root) = parse("process.env?.API_KEY;");
    let arena = parser.get_arena();
    let paths = ProtectedPaths::new(["process.env"]);
    let checker = DirectAccessChecker::new(arena, &NoBindings, &paths);

    let access = first_of_kind(arena, syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION);
    let outer = if arena.get(access).is_some_and(crate::is_optional_chain_access) {
        access
    } else {
        arena.parent_of(access)
    };
    let err = checker.check_optional_chain_access(outer).expect_err("violation");
    assert_eq!(err.kind, ViolationKind::OptionalChaining);
    assert_eq!(err.path, "process.env");
    let node = arena.get(outer).expect("node");
    assert_eq!((err.start, err.end), (node.pos, node.end));
}

#[test]
fn test_optional_chain_entry_ignores_plain_access() {
    let (parser, _root) = parse("process.env.API_KEY;");
    let arena = parser.get_arena();
    let paths = ProtectedPaths::new(["process.env"]);
    let checker = DirectAccessChecker::new(arena, &NoBindings, &paths);
    for idx in (0..arena.len() as u32).map(NodeIndex) {
        assert_eq!(checker.check_optional_chain_access(idx), Ok(()));
    }
}

#[test]
fn test_variable_declaration_entry() {
    let (parser, _root) = parse("const { API_KEY } = process.env;");
    let arena = parser.get_arena();
    let paths = ProtectedPaths::new(["process.env.API_KEY"]);
    let checker = DirectAccessChecker::new(arena, &NoBindings, &paths);

    let decl = first_of_kind(arena, syntax_kind_ext::VARIABLE_DECLARATION);
    let err = checker.check_variable_declaration(decl).expect_err("violation");
    assert_eq!(err.kind, ViolationKind::Destructuring);
    assert_eq!(err.path, "process.env.API_KEY");
    let node = arena.get(decl).expect("declaration");
    assert_eq!((err.start, err.end), (node.pos, node.end));
}

#[test]
fn test_resolver_decides_shadowing() {
    let (parser, root) = parse("process.env?.API_KEY;");
    let arena = parser.get_arena();
    let paths = ProtectedPaths::new(["process.env"]);

    let shadowed = BoundName("process");
    assert_eq!(
        DirectAccessChecker::new(arena, &shadowed, &paths).check_source_file(root),
        Ok(())
    );

    let unrelated = BoundName("env");
    assert!(DirectAccessChecker::new(arena, &unrelated, &paths)
        .check_source_file(root)
        .is_err());
}

#[test]
fn test_trait_object_resolver() {
    let (parser, root) = parse("process.env?.API_KEY;");
    let arena = parser.get_arena();
    let paths = ProtectedPaths::new(["process.env"]);
    let resolver: &dyn BindingResolver = &NoBindings;
    assert!(DirectAccessChecker::new(arena, resolver, &paths)
        .check_source_file(root)
        .is_err());
}

#[test]
fn test_empty_paths_never_report() {
    let (parser, root) = parse("process.env?.API_KEY; const { A } = process?.env;");
    let arena = parser.get_arena();
    let paths = ProtectedPaths::default();
    let checker = DirectAccessChecker::new(arena, &NoBindings, &paths);
    assert_eq!(checker.check_source_file(root), Ok(()));
    for idx in (0..arena.len() as u32).map(NodeIndex) {
        assert_eq!(checker.check_optional_chain_access(idx), Ok(()));
        assert_eq!(checker.check_variable_declaration(idx), Ok(()));
    }
}

#[test]
fn test_descendant_optional_access_reports_ancestor() {
    let err = check("process.env.API_KEY?.length;", &["process.env"]).expect_err("violation");
    assert_eq!(err.kind, ViolationKind::OptionalChaining);
    assert_eq!(err.path, "process.env");
}

#[test]
fn test_longest_configured_ancestor_is_reported() {
    let err = check("process.env?.API_KEY;", &["process", "process.env"]).expect_err("violation");
    assert_eq!(err.path, "process.env");
}

#[test]
fn test_optional_access_above_protected_path_is_allowed() {
    // `process?.argv` resolves to `process.argv`, unrelated to `process.env`
    assert_eq!(check("process?.argv;", &["process.env"]), Ok(()));
}

#[test]
fn test_first_violation_in_source_order() {
    let err = check(
        "const { API_KEY } = process.env;\nprocess.env?.OTHER;",
        &["process.env", "process.env.API_KEY"],
    )
    .expect_err("violation");
    assert_eq!(err.kind, ViolationKind::Destructuring);
}

#[test]
fn test_outer_link_reported_before_inner() {
    // Both links are in the chain; the outermost is visited first
    let source = "process?.env.API_KEY;";
    let err = check(source, &["process"]).expect_err("violation");
    assert_eq!(err.kind, ViolationKind::OptionalChaining);
    assert_eq!(err.path, "process");
    assert_eq!(err.end as usize, source.len() - 1);
}

#[test]
fn test_destructuring_keys() {
    let paths = &["process.env.API_KEY"];
    assert!(check("const { API_KEY: key } = process.env;", paths).is_err());
    assert!(check("const { API_KEY = 'x' } = process.env;", paths).is_err());
    assert!(check("const { ['API_KEY']: key } = process.env;", paths).is_err());
    assert!(check("const { OTHER, ...rest } = process.env;", paths).is_ok());
    assert!(check("const { [name]: key } = process.env;", paths).is_ok());
    assert!(check("const { 'API_KEY': key } = process.env;", paths).is_ok());
}

#[test]
fn test_array_and_plain_declarations_are_ignored() {
    let paths = &["process.env", "process.env.API_KEY"];
    assert!(check("const [API_KEY] = process.env;", paths).is_ok());
    assert!(check("const env = process.env;", paths).is_ok());
    assert!(check("let { API_KEY } = {};", paths).is_ok());
}

#[test]
fn test_destructuring_inside_functions_and_loops() {
    let paths = &["process.env.API_KEY"];
    assert!(check("function f() { const { API_KEY } = process.env; }", paths).is_err());
    assert!(check("for (let i = 0, { API_KEY } = process.env; i < 1; i++) {}", paths).is_err());
}

#[test]
fn test_long_binary_chains_are_checked_in_full() {
    // Left-associative chains put the first operand thousands of levels deep
    for operator in [" + 1", " || 1"] {
        let source = format!("const x = process?.env.A{};", operator.repeat(2000));
        let violation = check(&source, &["process.env"]).expect_err("violation");
        assert_eq!(violation.kind, ViolationKind::OptionalChaining);
        assert_eq!(violation.path, "process.env");
        assert_eq!(violation.start, "const x = ".len() as u32);
    }
}

#[test]
fn test_destructuring_deep_in_a_chain_is_checked() {
    let source = format!(
        "const x = (() => {{ const {{ env }} = process; }})(){};",
        " + 1".repeat(2000)
    );
    let violation = check(&source, &["process.env"]).expect_err("violation");
    assert_eq!(violation.kind, ViolationKind::Destructuring);
}
