//! Tests for statement and declaration parsing.
use crate::parser::{NodeArena, NodeIndex, ParserState, node_flags, syntax_kind_ext};
use eda_common::diagnostics::diagnostic_codes;

fn parse_source(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    (parser, root)
}

fn statements(parser: &ParserState, root: NodeIndex) -> Vec<NodeIndex> {
    parser
        .get_arena()
        .get_source_file_at(root)
        .expect("source file")
        .statements
        .nodes
        .clone()
}

fn kinds(arena: &NodeArena, nodes: &[NodeIndex]) -> Vec<u16> {
    nodes
        .iter()
        .map(|&n| arena.kind_of(n).expect("node"))
        .collect()
}

/// The single declaration of a `var`/`let`/`const` statement.
fn first_declaration(arena: &NodeArena, statement: NodeIndex) -> NodeIndex {
    let stmt = arena.get(statement).expect("statement");
    let list = arena.get_variable(stmt).expect("variable statement").declarations.nodes[0];
    let list_node = arena.get(list).expect("declaration list");
    arena.get_variable(list_node).expect("declaration list").declarations.nodes[0]
}

#[test]
fn parse_empty_source() {
    let (parser, root) = parse_source("");
    assert!(parser.get_diagnostics().is_empty());
    assert!(statements(&parser, root).is_empty());
}

#[test]
fn parse_statement_kinds() {
    let source = "\
var a = 1;
let b;
const c = 2;
function f() {}
async function g() {}
class K {}
if (a) b; else c;
do {} while (a)
while (a) {}
for (;;) {}
for (const k in o) {}
for (const v of o) {}
switch (a) { case 1: break; default: }
try {} catch {}
throw a;
debugger;
;
{}
l: a;
a;
";
    let (parser, root) = parse_source(source);
    assert!(
        parser.get_diagnostics().is_empty(),
        "{:?}",
        parser.get_diagnostics()
    );
    let arena = parser.get_arena();
    assert_eq!(
        kinds(arena, &statements(&parser, root)),
        vec![
            syntax_kind_ext::VARIABLE_STATEMENT,
            syntax_kind_ext::VARIABLE_STATEMENT,
            syntax_kind_ext::VARIABLE_STATEMENT,
            syntax_kind_ext::FUNCTION_DECLARATION,
            syntax_kind_ext::FUNCTION_DECLARATION,
            syntax_kind_ext::CLASS_DECLARATION,
            syntax_kind_ext::IF_STATEMENT,
            syntax_kind_ext::DO_STATEMENT,
            syntax_kind_ext::WHILE_STATEMENT,
            syntax_kind_ext::FOR_STATEMENT,
            syntax_kind_ext::FOR_IN_STATEMENT,
            syntax_kind_ext::FOR_OF_STATEMENT,
            syntax_kind_ext::SWITCH_STATEMENT,
            syntax_kind_ext::TRY_STATEMENT,
            syntax_kind_ext::THROW_STATEMENT,
            syntax_kind_ext::DEBUGGER_STATEMENT,
            syntax_kind_ext::EMPTY_STATEMENT,
            syntax_kind_ext::BLOCK,
            syntax_kind_ext::LABELED_STATEMENT,
            syntax_kind_ext::EXPRESSION_STATEMENT,
        ]
    );
}

#[test]
fn parse_declaration_list_flags() {
    let (parser, root) = parse_source("var a; let b; const c = 1;");
    let arena = parser.get_arena();
    let flags: Vec<u32> = statements(&parser, root)
        .into_iter()
        .map(|stmt| {
            let decl = first_declaration(arena, stmt);
            let list = arena.parent_of(decl);
            arena.get(list).expect("list").flags as u32
        })
        .collect();
    assert_eq!(
        flags,
        vec![node_flags::NONE, node_flags::LET, node_flags::CONST]
    );
}

#[test]
fn parse_let_as_identifier_when_no_binding_follows() {
    let (parser, root) = parse_source("let = 5;\nlet;");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    assert_eq!(
        kinds(arena, &statements(&parser, root)),
        vec![
            syntax_kind_ext::EXPRESSION_STATEMENT,
            syntax_kind_ext::EXPRESSION_STATEMENT
        ]
    );
}

#[test]
fn parse_object_binding_pattern_elements() {
    let (parser, root) = parse_source("const { a, b: c, 'd': e, [k]: f, g = 1, ...rest } = obj;");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let decl = first_declaration(arena, statements(&parser, root)[0]);
    let decl_data = arena
        .get_variable_declaration(arena.get(decl).expect("decl"))
        .expect("declaration");
    let pattern = arena.get(decl_data.name).expect("pattern");
    assert_eq!(pattern.kind, syntax_kind_ext::OBJECT_BINDING_PATTERN);

    let elements = &arena.get_binding_pattern(pattern).expect("pattern").elements;
    assert_eq!(elements.len(), 6);

    let element = |i: usize| {
        arena
            .get_binding_element(arena.get(elements.nodes[i]).expect("element"))
            .expect("binding element")
    };

    // shorthand
    assert!(element(0).property_name.is_none());
    assert_eq!(arena.get_identifier_text(element(0).name), Some("a"));
    // renamed
    assert_eq!(arena.get_identifier_text(element(1).property_name), Some("b"));
    assert_eq!(arena.get_identifier_text(element(1).name), Some("c"));
    // string key
    assert_eq!(arena.get_literal_text(element(2).property_name), Some("d"));
    // computed key
    assert_eq!(
        arena.kind_of(element(3).property_name),
        Some(syntax_kind_ext::COMPUTED_PROPERTY_NAME)
    );
    // default
    assert!(element(4).initializer.is_some());
    // rest
    assert!(element(5).dot_dot_dot_token);
}

#[test]
fn parse_array_binding_pattern_with_holes() {
    let (parser, root) = parse_source("let [, a, , ...b] = xs;");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let decl = first_declaration(arena, statements(&parser, root)[0]);
    let name = arena
        .get_variable_declaration(arena.get(decl).expect("decl"))
        .expect("declaration")
        .name;
    let pattern = arena.get(name).expect("pattern");
    let elements = &arena.get_binding_pattern(pattern).expect("pattern").elements;
    assert_eq!(
        kinds(arena, &elements.nodes),
        vec![
            syntax_kind_ext::OMITTED_EXPRESSION,
            syntax_kind_ext::BINDING_ELEMENT,
            syntax_kind_ext::OMITTED_EXPRESSION,
            syntax_kind_ext::BINDING_ELEMENT,
        ]
    );
}

#[test]
fn parse_imports() {
    let source = "\
import 'side-effect';
import def from 'a';
import * as ns from 'b';
import { x, y as z, default as w } from 'c';
import d2, { q } from 'd';
import data from './data.json' with { type: 'json' };
";
    let (parser, root) = parse_source(source);
    assert!(
        parser.get_diagnostics().is_empty(),
        "{:?}",
        parser.get_diagnostics()
    );
    let arena = parser.get_arena();
    let stmts = statements(&parser, root);
    assert!(
        kinds(arena, &stmts)
            .iter()
            .all(|&k| k == syntax_kind_ext::IMPORT_DECLARATION)
    );

    let ns_decl = arena.get_import_decl(arena.get(stmts[2]).expect("decl")).expect("import");
    let clause = arena
        .get_import_clause(arena.get(ns_decl.import_clause).expect("clause"))
        .expect("clause");
    assert_eq!(
        arena.kind_of(clause.named_bindings),
        Some(syntax_kind_ext::NAMESPACE_IMPORT)
    );

    let named_decl = arena.get_import_decl(arena.get(stmts[3]).expect("decl")).expect("import");
    let clause = arena
        .get_import_clause(arena.get(named_decl.import_clause).expect("clause"))
        .expect("clause");
    let named = arena
        .get_named_imports(arena.get(clause.named_bindings).expect("named"))
        .expect("named imports");
    assert_eq!(named.elements.len(), 3);
    let renamed = arena
        .get_specifier(arena.get(named.elements.nodes[1]).expect("spec"))
        .expect("specifier");
    assert_eq!(arena.get_identifier_text(renamed.property_name), Some("y"));
    assert_eq!(arena.get_identifier_text(renamed.name), Some("z"));
}

#[test]
fn parse_import_call_and_meta_are_expression_statements() {
    let (parser, root) = parse_source("import('x');\nimport.meta.env;");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    assert_eq!(
        kinds(arena, &statements(&parser, root)),
        vec![
            syntax_kind_ext::EXPRESSION_STATEMENT,
            syntax_kind_ext::EXPRESSION_STATEMENT
        ]
    );
}

#[test]
fn parse_exports() {
    let source = "\
export const a = 1;
export function f() {}
export class C {}
export { a as b, f };
export * from 'x';
export * as ns from 'y';
export { z } from 'z';
export default function () {}
";
    let (parser, root) = parse_source(source);
    assert!(
        parser.get_diagnostics().is_empty(),
        "{:?}",
        parser.get_diagnostics()
    );
    let arena = parser.get_arena();
    let stmts = statements(&parser, root);
    assert_eq!(stmts.len(), 8);
    let last = arena.get_export_decl(arena.get(stmts[7]).expect("decl")).expect("export");
    assert!(last.is_default_export);
    assert_eq!(
        arena.kind_of(last.export_clause),
        Some(syntax_kind_ext::FUNCTION_DECLARATION)
    );
}

#[test]
fn parse_export_default_expression() {
    let (parser, root) = parse_source("export default { a: process.env.A };");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let export = arena
        .get_export_decl(arena.get(statements(&parser, root)[0]).expect("decl"))
        .expect("export");
    assert_eq!(
        arena.kind_of(export.export_clause),
        Some(syntax_kind_ext::EXPORT_ASSIGNMENT)
    );
}

#[test]
fn parse_class_members() {
    let source = "\
class A extends B {
    static count = 0;
    #secret = 1;
    name;
    constructor(x) { super(x); }
    get value() { return this.#secret; }
    set value(v) {}
    static create() {}
    async *items() {}
    [key]() {}
    static { init(); }
}";
    let (parser, root) = parse_source(source);
    assert!(
        parser.get_diagnostics().is_empty(),
        "{:?}",
        parser.get_diagnostics()
    );
    let arena = parser.get_arena();
    let class = arena
        .get_class(arena.get(statements(&parser, root)[0]).expect("class"))
        .expect("class data");
    assert!(class.heritage.is_some());
    assert_eq!(
        kinds(arena, &class.members.nodes),
        vec![
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::CONSTRUCTOR,
            syntax_kind_ext::GET_ACCESSOR,
            syntax_kind_ext::SET_ACCESSOR,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::CLASS_STATIC_BLOCK_DECLARATION,
        ]
    );
}

#[test]
fn parse_catch_clause_binding_pattern() {
    let (parser, root) = parse_source("try { a(); } catch ({ message }) { log(message); }");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let try_data = arena
        .get_try(arena.get(statements(&parser, root)[0]).expect("try"))
        .expect("try data");
    let catch = arena
        .get_catch_clause(arena.get(try_data.catch_clause).expect("catch"))
        .expect("catch data");
    let decl = arena
        .get_variable_declaration(arena.get(catch.variable_declaration).expect("decl"))
        .expect("declaration");
    assert_eq!(
        arena.kind_of(decl.name),
        Some(syntax_kind_ext::OBJECT_BINDING_PATTERN)
    );
}

#[test]
fn parse_asi_across_lines() {
    let (parser, root) = parse_source("const a = 1\nconst b = 2\na\n++b");
    assert!(parser.get_diagnostics().is_empty());
    assert_eq!(statements(&parser, root).len(), 4);
}

#[test]
fn parse_statement_recovery_on_malformed_top_level() {
    let (parser, root) = parse_source("const x = 1\nconst y = ;\nconst z = 3;");
    assert!(statements(&parser, root).len() >= 2);
    let codes: Vec<u32> = parser.get_diagnostics().iter().map(|d| d.code).collect();
    assert!(codes.contains(&diagnostic_codes::EXPRESSION_EXPECTED), "{codes:?}");
}

#[test]
fn parse_stray_close_brace_reports_and_continues() {
    let (parser, root) = parse_source("}\nconst ok = 1;");
    let codes: Vec<u32> = parser.get_diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![diagnostic_codes::EXPRESSION_EXPECTED]);
    assert_eq!(statements(&parser, root).len(), 1);
}

#[test]
fn parse_missing_close_paren_reports_token_expected() {
    let (parser, _root) = parse_source("if (a { b(); }");
    let diagnostic = &parser.get_diagnostics()[0];
    assert_eq!(diagnostic.code, diagnostic_codes::TOKEN_EXPECTED);
    assert_eq!(diagnostic.message, "')' expected.");
    assert_eq!(diagnostic.start, 6);
}

#[test]
fn parse_unterminated_string_is_reported() {
    let (parser, _root) = parse_source("const s = 'abc\nconst t = 1;");
    let codes: Vec<u32> = parser.get_diagnostics().iter().map(|d| d.code).collect();
    assert!(codes.contains(&diagnostic_codes::UNTERMINATED_STRING_LITERAL));
}

#[test]
fn parse_template_recovery_preserves_follow_up_statement() {
    let (parser, root) = parse_source("const bad = `head${1 + 2`;\nconst ok = 1;");
    assert!(!parser.get_diagnostics().is_empty());
    assert!(!statements(&parser, root).is_empty());
}

#[test]
fn parse_deeply_nested_blocks_hits_depth_limit() {
    let codes = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let source = format!("{}{}", "{".repeat(2_000), "}".repeat(2_000));
            let (parser, _root) = parse_source(&source);
            parser
                .get_diagnostics()
                .iter()
                .map(|d| d.code)
                .collect::<Vec<u32>>()
        })
        .expect("spawn parser thread")
        .join()
        .expect("parser thread");
    assert!(codes.contains(&diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED));
}
