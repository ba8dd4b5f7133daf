//! Tests for expression parsing, optional chains and meta-properties.
use crate::parser::{NodeArena, NodeIndex, ParserState, node_flags, syntax_kind_ext};
use eda_scanner::SyntaxKind;

fn parse_source(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    (parser, root)
}

/// Expression of the first statement, which must be an expression statement.
fn first_expression(source: &str) -> (ParserState, NodeIndex) {
    let (parser, root) = parse_source(source);
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        parser.get_diagnostics()
    );
    let arena = parser.get_arena();
    let stmt = arena.get_source_file_at(root).expect("source file").statements.nodes[0];
    let expr = arena
        .get_expr_statement(arena.get(stmt).expect("statement"))
        .expect("expression statement")
        .expression;
    (parser, expr)
}

fn is_optional_chain(arena: &NodeArena, index: NodeIndex) -> bool {
    arena
        .get(index)
        .is_some_and(|node| node.has_flag(node_flags::OPTIONAL_CHAIN))
}

fn access_target(arena: &NodeArena, index: NodeIndex) -> NodeIndex {
    arena
        .get_access_expr(arena.get(index).expect("node"))
        .expect("access expression")
        .expression
}

#[test]
fn property_access_chain_without_optional() {
    let (parser, expr) = first_expression("process.env.NODE_ENV;");
    let arena = parser.get_arena();
    assert_eq!(
        arena.kind_of(expr),
        Some(syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION)
    );
    assert!(!is_optional_chain(arena, expr));
    let env = access_target(arena, expr);
    let process = access_target(arena, env);
    assert_eq!(arena.get_identifier_text(process), Some("process"));
}

#[test]
fn optional_flag_spreads_to_rest_of_chain() {
    // a?.b.c : both links are in the chain, only `?.b` has the token
    let (parser, outer) = first_expression("a?.b.c;");
    let arena = parser.get_arena();
    let inner = access_target(arena, outer);
    assert!(is_optional_chain(arena, outer));
    assert!(is_optional_chain(arena, inner));

    let outer_data = arena.get_access_expr(arena.get(outer).expect("outer")).expect("data");
    let inner_data = arena.get_access_expr(arena.get(inner).expect("inner")).expect("data");
    assert!(!outer_data.question_dot_token);
    assert!(inner_data.question_dot_token);
}

#[test]
fn links_before_question_dot_are_not_flagged() {
    // process.env?.X : `process.env` is outside the chain
    let (parser, outer) = first_expression("process.env?.X;");
    let arena = parser.get_arena();
    let env = access_target(arena, outer);
    assert!(is_optional_chain(arena, outer));
    assert!(!is_optional_chain(arena, env));
}

#[test]
fn parentheses_end_an_optional_chain() {
    let (parser, outer) = first_expression("(a?.b).c;");
    let arena = parser.get_arena();
    assert!(!is_optional_chain(arena, outer));
    let paren = access_target(arena, outer);
    assert_eq!(
        arena.kind_of(paren),
        Some(syntax_kind_ext::PARENTHESIZED_EXPRESSION)
    );
    assert!(is_optional_chain(arena, arena.skip_parentheses(paren)));
}

#[test]
fn optional_element_access_and_call() {
    let (parser, call) = first_expression("obj?.['key']?.(1);");
    let arena = parser.get_arena();
    assert_eq!(arena.kind_of(call), Some(syntax_kind_ext::CALL_EXPRESSION));
    assert!(is_optional_chain(arena, call));
    let callee = arena
        .get_call_expr(arena.get(call).expect("call"))
        .expect("call data")
        .expression;
    assert_eq!(
        arena.kind_of(callee),
        Some(syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION)
    );
    let data = arena.get_access_expr(arena.get(callee).expect("element")).expect("data");
    assert!(data.question_dot_token);
    assert_eq!(arena.get_literal_text(data.name_or_argument), Some("key"));
}

#[test]
fn question_dot_before_digit_is_conditional() {
    let (parser, expr) = first_expression("a?.5:b;");
    assert_eq!(
        parser.get_arena().kind_of(expr),
        Some(syntax_kind_ext::CONDITIONAL_EXPRESSION)
    );
}

#[test]
fn import_meta_is_a_meta_property() {
    let (parser, expr) = first_expression("import.meta.env.MODE;");
    let arena = parser.get_arena();
    let env = access_target(arena, expr);
    let meta = access_target(arena, env);
    let data = arena
        .get_meta_property(arena.get(meta).expect("meta"))
        .expect("meta property");
    assert_eq!(data.keyword_token, SyntaxKind::ImportKeyword as u16);
    assert_eq!(arena.get_identifier_text(data.name), Some("meta"));
}

#[test]
fn new_target_is_a_meta_property() {
    let (parser, root) = parse_source("function F() { return new.target; }");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let meta = (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&i| arena.kind_of(i) == Some(syntax_kind_ext::META_PROPERTY))
        .expect("meta property");
    let data = arena.get_meta_property(arena.get(meta).expect("meta")).expect("data");
    assert_eq!(data.keyword_token, SyntaxKind::NewKeyword as u16);
    assert!(root.is_some());
}

#[test]
fn dynamic_import_is_a_call() {
    let (parser, call) = first_expression("import('./mod.js');");
    let arena = parser.get_arena();
    let data = arena.get_call_expr(arena.get(call).expect("call")).expect("call data");
    assert_eq!(
        arena.kind_of(data.expression),
        Some(SyntaxKind::ImportKeyword as u16)
    );
    assert_eq!(data.arguments.as_ref().map(|a| a.len()), Some(1));
}

#[test]
fn binary_precedence() {
    let (parser, expr) = first_expression("a + b * c;");
    let arena = parser.get_arena();
    let data = arena.get_binary_expr(arena.get(expr).expect("binary")).expect("data");
    assert_eq!(data.operator_token, SyntaxKind::PlusToken as u16);
    assert_eq!(
        arena.kind_of(data.right),
        Some(syntax_kind_ext::BINARY_EXPRESSION)
    );
}

#[test]
fn exponent_is_right_associative() {
    let (parser, expr) = first_expression("a ** b ** c;");
    let arena = parser.get_arena();
    let data = arena.get_binary_expr(arena.get(expr).expect("binary")).expect("data");
    assert_eq!(arena.get_identifier_text(data.left), Some("a"));
    assert_eq!(
        arena.kind_of(data.right),
        Some(syntax_kind_ext::BINARY_EXPRESSION)
    );
}

#[test]
fn assignment_is_right_associative() {
    let (parser, expr) = first_expression("a = b ??= c;");
    let arena = parser.get_arena();
    let data = arena.get_binary_expr(arena.get(expr).expect("binary")).expect("data");
    assert_eq!(data.operator_token, SyntaxKind::EqualsToken as u16);
    let right = arena.get_binary_expr(arena.get(data.right).expect("right")).expect("data");
    assert_eq!(
        right.operator_token,
        SyntaxKind::QuestionQuestionEqualsToken as u16
    );
}

#[test]
fn arrow_functions() {
    for source in [
        "x => x;",
        "(a, { b }, [c], ...d) => a;",
        "async x => await x;",
        "async (a = `t${1}`) => { await a; };",
        "() => ({});",
    ] {
        let (parser, expr) = first_expression(source);
        assert_eq!(
            parser.get_arena().kind_of(expr),
            Some(syntax_kind_ext::ARROW_FUNCTION),
            "{source}"
        );
    }
}

#[test]
fn parenthesized_expression_is_not_an_arrow() {
    let (parser, expr) = first_expression("(a, b);");
    assert_eq!(
        parser.get_arena().kind_of(expr),
        Some(syntax_kind_ext::PARENTHESIZED_EXPRESSION)
    );
}

#[test]
fn async_call_is_not_an_arrow() {
    let (parser, expr) = first_expression("async(a, b);");
    assert_eq!(
        parser.get_arena().kind_of(expr),
        Some(syntax_kind_ext::CALL_EXPRESSION)
    );
}

#[test]
fn template_literal_spans() {
    let (parser, expr) = first_expression("`a${b}c${d}e`;");
    let arena = parser.get_arena();
    let data = arena
        .get_template_expr(arena.get(expr).expect("template"))
        .expect("template data");
    assert_eq!(arena.get_literal_text(data.head), Some("a"));
    assert_eq!(data.template_spans.len(), 2);
    let last = arena
        .get_template_span(arena.get(data.template_spans.nodes[1]).expect("span"))
        .expect("span data");
    assert_eq!(arena.kind_of(last.literal), Some(SyntaxKind::TemplateTail as u16));
    assert_eq!(arena.get_literal_text(last.literal), Some("e"));
}

#[test]
fn nested_template_inside_substitution() {
    let (parser, expr) = first_expression("`a${`b${c}`}d`;");
    assert_eq!(
        parser.get_arena().kind_of(expr),
        Some(syntax_kind_ext::TEMPLATE_EXPRESSION)
    );
}

#[test]
fn tagged_template() {
    let (parser, expr) = first_expression("tag`x${y}`;");
    assert_eq!(
        parser.get_arena().kind_of(expr),
        Some(syntax_kind_ext::TAGGED_TEMPLATE_EXPRESSION)
    );
}

#[test]
fn regex_in_expression_position() {
    let (parser, expr) = first_expression("/ab+c/gi.test(s);");
    let arena = parser.get_arena();
    let callee = arena
        .get_call_expr(arena.get(expr).expect("call"))
        .expect("call data")
        .expression;
    let regex = access_target(arena, callee);
    assert_eq!(
        arena.kind_of(regex),
        Some(SyntaxKind::RegularExpressionLiteral as u16)
    );
    assert_eq!(arena.get_literal_text(regex), Some("/ab+c/gi"));
}

#[test]
fn division_is_not_a_regex() {
    let (parser, expr) = first_expression("a / b / c;");
    assert_eq!(
        parser.get_arena().kind_of(expr),
        Some(syntax_kind_ext::BINARY_EXPRESSION)
    );
}

#[test]
fn object_literal_members() {
    let (parser, root) = parse_source(
        "x = { a, b: 1, 'c': 2, [d]: 3, e() {}, get f() { return 1; }, set f(v) {}, async *g() {}, ...h };",
    );
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    let arena = parser.get_arena();
    let object = (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&i| arena.kind_of(i) == Some(syntax_kind_ext::OBJECT_LITERAL_EXPRESSION))
        .expect("object literal");
    let elements = &arena
        .get_literal_expr(arena.get(object).expect("object"))
        .expect("literal data")
        .elements;
    let kinds: Vec<u16> = elements
        .nodes
        .iter()
        .map(|&e| arena.kind_of(e).expect("element"))
        .collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::GET_ACCESSOR,
            syntax_kind_ext::SET_ACCESSOR,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::SPREAD_ASSIGNMENT,
        ]
    );
    assert!(root.is_some());
}

#[test]
fn keywords_are_valid_property_names() {
    let (parser, expr) = first_expression("a.default.class.new;");
    let arena = parser.get_arena();
    let name = arena
        .get_access_expr(arena.get(expr).expect("access"))
        .expect("data")
        .name_or_argument;
    assert_eq!(arena.get_identifier_text(name), Some("new"));
}

#[test]
fn new_expression_with_member_callee() {
    let (parser, expr) = first_expression("new a.B(1).c;");
    let arena = parser.get_arena();
    let new_expr = access_target(arena, expr);
    assert_eq!(arena.kind_of(new_expr), Some(syntax_kind_ext::NEW_EXPRESSION));
    let data = arena.get_call_expr(arena.get(new_expr).expect("new")).expect("data");
    assert_eq!(
        arena.kind_of(data.expression),
        Some(syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION)
    );
}

#[test]
fn generators_and_yield() {
    let (parser, _root) = parse_source("function* g() { yield; yield 1; yield* other(); }");
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
}

#[test]
fn top_level_await() {
    let (parser, expr) = first_expression("await import('./x.js');");
    assert_eq!(
        parser.get_arena().kind_of(expr),
        Some(syntax_kind_ext::AWAIT_EXPRESSION)
    );
}

#[test]
fn in_operator_inside_for_initializer_parens() {
    let (parser, _root) = parse_source("for (const x = ('a' in o); x;) {}\nfor (k in o) {}");
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
}
