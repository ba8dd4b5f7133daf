//! Tests for symbol storage and declaration merging.

use eda_binder::{BinderState, ScopeId, SymbolArena, SymbolId, SymbolTable, symbol_flags};
use eda_parser::ParserState;

fn bind(source: &str) -> (ParserState, BinderState) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    let mut binder = BinderState::new();
    binder.bind_source_file(parser.get_arena(), root);
    (parser, binder)
}

#[test]
fn test_symbol_arena_alloc_and_get() {
    let mut arena = SymbolArena::new();
    assert!(arena.is_empty());

    let a = arena.alloc(symbol_flags::PARAMETER, "a".to_string());
    let b = arena.alloc(symbol_flags::CLASS, "b".to_string());
    assert_eq!(a, SymbolId(0));
    assert_eq!(b, SymbolId(1));
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.get(b).map(|s| s.escaped_name.as_str()), Some("b"));
    assert!(arena.get(SymbolId::NONE).is_none());
    assert!(arena.get(SymbolId(7)).is_none());

    let names: Vec<&str> = arena
        .iter()
        .map(|(_, symbol)| symbol.escaped_name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_symbol_table_set_and_get() {
    let mut table = SymbolTable::new();
    assert!(table.is_empty());
    table.set("process".to_string(), SymbolId(3));
    assert!(table.has("process"));
    assert_eq!(table.get("process"), Some(SymbolId(3)));
    assert_eq!(table.get("env"), None);
    assert_eq!(table.len(), 1);
}

#[test]
fn test_ids_default_to_none() {
    assert!(SymbolId::default().is_none());
    assert!(ScopeId::default().is_none());
    assert!(SymbolId(0).is_some());
}

#[test]
fn test_redeclared_var_merges_into_one_symbol() {
    let (_parser, binder) = bind("var a = 1; var a = 2;");
    assert_eq!(binder.symbols.len(), 1);
    let (_, symbol) = binder.symbols.iter().next().expect("symbol");
    assert_eq!(symbol.escaped_name, "a");
    assert_eq!(symbol.declarations.len(), 2);
    assert!(symbol.has_any_flags(symbol_flags::VARIABLE));
}

#[test]
fn test_destructuring_declares_every_leaf() {
    let (_parser, binder) =
        bind("const { a, b: { c }, d: [e, , f = 1], ...rest } = source;");
    let root = binder.get_scope(ScopeId(0)).expect("root scope");
    for name in ["a", "c", "e", "f", "rest"] {
        assert!(root.table.has(name), "{name} should be declared");
    }
    // Property keys are not bindings
    assert!(!root.table.has("b"));
    assert!(!root.table.has("d"));
    assert!(!root.table.has("source"));
}

#[test]
fn test_declaration_nodes_map_to_symbols() {
    let (_parser, binder) = bind("let x; let y;");
    assert_eq!(binder.node_symbols.len(), 2);
    for (_, symbol) in binder.symbols.iter() {
        let decl = symbol.declarations[0];
        assert!(binder.symbol_of_declaration(decl).is_some());
    }
}

#[test]
fn test_unbound_file_has_only_root_scope() {
    let (_parser, binder) = bind("process.env.A;");
    assert_eq!(binder.scopes.len(), 1);
    assert!(binder.symbols.is_empty());
}

#[test]
fn test_scopes_serialize_to_json() {
    let (_parser, binder) = bind("const a = 1;");
    let json = serde_json::to_string(&binder.scopes).expect("serialize");
    assert!(json.contains("\"SourceFile\""));
    assert!(json.contains("\"a\""));
}
