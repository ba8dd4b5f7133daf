//! Tests for the node arena, node flags and traversal helpers.

use crate::parser::node::{IdentifierData, ParenthesizedData};
use crate::parser::{NodeArena, NodeIndex, ParserState, node_flags, syntax_kind_ext};
use eda_scanner::SyntaxKind;

fn parse(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    (parser, root)
}

#[test]
fn test_node_flags() {
    assert_eq!(node_flags::NONE, 0);
    assert_eq!(node_flags::LET, 1);
    assert_eq!(node_flags::CONST, 2);
    assert_eq!(node_flags::BLOCK_SCOPED, 3);
    assert_eq!(node_flags::OPTIONAL_CHAIN, 64);
}

#[test]
fn test_node_index() {
    let index = NodeIndex(0);
    assert!(index.is_some());
    assert!(!index.is_none());

    let none = NodeIndex::NONE;
    assert!(none.is_none());
    assert!(!none.is_some());
    assert_eq!(NodeIndex::default(), NodeIndex::NONE);
}

#[test]
fn test_node_is_sixteen_bytes() {
    assert_eq!(std::mem::size_of::<crate::parser::Node>(), 16);
}

#[test]
fn test_arena_records_parent_links() {
    let mut arena = NodeArena::new();
    let ident = arena.add_identifier(
        SyntaxKind::Identifier as u16,
        1,
        2,
        IdentifierData {
            escaped_text: "a".to_string(),
        },
    );
    let paren = arena.add_parenthesized(
        syntax_kind_ext::PARENTHESIZED_EXPRESSION,
        0,
        3,
        ParenthesizedData { expression: ident },
    );

    assert_eq!(arena.len(), 2);
    assert_eq!(arena.parent_of(ident), paren);
    assert_eq!(arena.parent_of(paren), NodeIndex::NONE);
    assert_eq!(arena.get_identifier_text(ident), Some("a"));
    assert_eq!(arena.skip_parentheses(paren), ident);
}

#[test]
fn test_kind_checked_accessors_reject_other_kinds() {
    let mut arena = NodeArena::new();
    let ident = arena.add_identifier(
        SyntaxKind::Identifier as u16,
        0,
        1,
        IdentifierData {
            escaped_text: "x".to_string(),
        },
    );
    let node = arena.get(ident).expect("node");
    assert!(arena.get_identifier(node).is_some());
    assert!(arena.get_literal(node).is_none());
    assert!(arena.get_access_expr(node).is_none());
    assert!(arena.get(NodeIndex::NONE).is_none());
}

#[test]
fn test_every_child_points_back_to_its_parent() {
    let source = r#"
import def, { a as b } from "m";
const { x, y: [z = 1, ...rest] } = obj?.deep;
function f(p = process.env.A, ...q) {
    for (const k of list) { if (k) break; }
    return class C extends B { static s = 1; m() { return new.target; } };
}
label: while (true) { switch (v) { case 1: continue label; default: } }
try { throw `t${1}` } catch ({ message }) {} finally {}
export default (a, b) => a ?? b;
"#;
    let (parser, root) = parse(source);
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );

    let arena = parser.get_arena();
    let mut stack = vec![root];
    let mut visited = 0;
    while let Some(index) = stack.pop() {
        visited += 1;
        for child in arena.get_children(index) {
            assert_eq!(
                arena.parent_of(child),
                index,
                "child {child:?} of kind {:?} has a wrong parent",
                arena.kind_of(child)
            );
            stack.push(child);
        }
    }
    assert!(visited > 50);
}

#[test]
fn test_children_are_in_source_order() {
    let (parser, root) = parse("a = b + c;");
    let arena = parser.get_arena();
    let sf = arena.get_source_file_at(root).expect("source file");
    let stmt = sf.statements.nodes[0];
    let expr = arena
        .get_expr_statement(arena.get(stmt).expect("stmt"))
        .expect("expression statement")
        .expression;
    let children = arena.get_children(expr);
    assert_eq!(children.len(), 2);
    let positions: Vec<u32> = children
        .iter()
        .map(|&c| arena.get(c).expect("child").pos)
        .collect();
    assert!(positions[0] < positions[1]);
}

#[test]
fn test_source_file_keeps_text_and_name() {
    let (parser, root) = parse("let a = 1;\n");
    let sf = parser.get_arena().get_source_file_at(root).expect("source file");
    assert_eq!(sf.file_name, "test.js");
    assert_eq!(&*sf.text, "let a = 1;\n");
    assert_eq!(parser.get_source_text(), "let a = 1;\n");
    assert_eq!(parser.get_file_name(), "test.js");
}

#[test]
fn test_arena_serializes_to_json() {
    let (parser, _root) = parse("x?.y;");
    let json = serde_json::to_string(parser.get_arena()).expect("serialize");
    assert!(json.contains("\"escaped_text\":\"y\""));
}
