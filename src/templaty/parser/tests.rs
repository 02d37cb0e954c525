//! Parser tests over the standalone dialect

use rstest::rstest;

use super::*;
use crate::templaty::ast::{Expression, Pattern, Position, Statement};
use crate::templaty::lexer::tokens::Keyword;
use crate::templaty::testing::assert_tree;

fn first_error(source: &str) -> ParseError {
    let errors = parse(source).expect_err("template should not parse");
    errors.into_iter().next().expect("at least one error")
}

// ============================================================================
// Patterns
// ============================================================================

#[test]
fn test_nested_tuple_pattern() {
    let pattern = parse_pattern("(a, (b, c))").unwrap();
    assert_eq!(
        pattern,
        Pattern::tuple([
            Pattern::var("a"),
            Pattern::tuple([Pattern::var("b"), Pattern::var("c")]),
        ])
    );
}

#[rstest]
#[case("x", "x")]
#[case("()", "()")]
#[case("( k ,v )", "(k, v)")]
#[case("((a), ((b)))", "((a), ((b)))")]
fn test_pattern_shapes(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(parse_pattern(source).unwrap().to_string(), expected);
}

#[rstest]
#[case("(a, b,)")]
#[case("(a b)")]
#[case("(a,")]
#[case("'a'")]
#[case("")]
fn test_invalid_patterns(#[case] source: &str) {
    let errors = parse_pattern(source).unwrap_err();
    assert!(
        errors[0].is_invalid_pattern(),
        "expected an invalid pattern for {:?}, got {}",
        source,
        errors[0]
    );
}

#[test]
fn test_trailing_comma_in_loop_binder() {
    let error = first_error("{% for (k, v,) in items %}{% endfor %}");
    assert!(error.is_invalid_pattern(), "got {}", error);
    assert_eq!(error.span.start, Position::new(0, 13));
}

// ============================================================================
// Expressions
// ============================================================================

#[rstest]
#[case("items", Expression::reference("items"))]
#[case("_private2", Expression::reference("_private2"))]
#[case("\"a, b\"", Expression::string("a, b"))]
#[case("'say \"hi\"'", Expression::string("say \"hi\""))]
#[case("''", Expression::string(""))]
#[case("007", Expression::integer("007"))]
fn test_expressions(#[case] source: &str, #[case] expected: Expression) {
    assert_eq!(parse_expression(source), Ok(expected));
}

#[rstest]
#[case("-1")]
#[case("1.5")]
#[case("a b")]
#[case("for")]
fn test_invalid_expressions(#[case] source: &str) {
    let errors = parse_expression(source).unwrap_err();
    assert!(errors[0].is_unexpected_token(), "got {}", errors[0]);
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_text_only() {
    let tree = parse("Hello, {world}!\nNo directives { here }.").unwrap();
    assert_tree(&tree)
        .statement_count(1)
        .text("Hello, {world}!\nNo directives { here }.");
}

#[test]
fn test_empty_template() {
    assert_eq!(parse(""), Ok(vec![]));
}

#[test]
fn test_interpolation_between_text() {
    let tree = parse("Hello, {{ name }}!").unwrap();
    assert_tree(&tree)
        .statement_count(3)
        .statement(0, |s| {
            s.assert_text().text("Hello, ");
        })
        .statement(1, |s| {
            s.assert_expression().reference("name");
        })
        .statement(2, |s| {
            s.assert_text().text("!");
        });
}

#[test]
fn test_directives_ignore_inner_whitespace() {
    let spaced = parse("{%  for  x  in  xs  %}{{  x  }}{%  endfor  %}").unwrap();
    let tight = parse("{%for x in xs%}{{x}}{%endfor%}").unwrap();
    assert_eq!(spaced, tight);
}

#[test]
fn test_keyword_prefix_is_an_identifier() {
    let tree = parse("{% for forx in input %}{{ forx }}{% endfor %}").unwrap();
    assert_tree(&tree).statement(0, |s| {
        s.assert_for_in()
            .binder("forx")
            .iterable("input")
            .body(0, |b| {
                b.assert_expression().reference("forx");
            });
    });
}

#[test]
fn test_for_in_statement() {
    let tree = parse("{% for (name, value) in pairs %}{{ name }}={{ value }}\n{% endfor %}").unwrap();
    assert_tree(&tree).statement_count(1).statement(0, |s| {
        s.assert_for_in()
            .binder_is(&Pattern::tuple([Pattern::var("name"), Pattern::var("value")]))
            .iterable("pairs")
            .body_count(4)
            .body(1, |b| {
                b.assert_text().text("=");
            })
            .body(3, |b| {
                b.assert_text().text("\n");
            });
    });
}

#[test]
fn test_join_statement() {
    let statement = parse_statement("{% join x in items with \", \" %} {{ x }} {% endjoin %}").unwrap();
    assert_tree(std::slice::from_ref(&statement)).statement(0, |s| {
        s.assert_join()
            .binder("x")
            .iterable("items")
            .separator(&Expression::string(", "))
            .body_count(1)
            .body(0, |b| {
                b.assert_expression().reference("x");
            });
    });
}

#[rstest]
#[case::spaces("{% for x in xs %}  {{ x }}  {% endfor %}", 1)]
#[case::tabs("{% for x in xs %}\t{{ x }}\t{% endfor %}", 1)]
#[case::padding_only_body("{% for x in xs %} {% endfor %}", 0)]
#[case::inner_space_kept("{% for x in xs %} {{ x }} {{ x }} {% endfor %}", 3)]
#[case::line_breaks_kept("{% for x in xs %}\n{{ x }}\n{% endfor %}", 3)]
fn test_body_edge_padding(#[case] source: &str, #[case] expected: usize) {
    let tree = parse(source).unwrap();
    assert_tree(&tree).statement(0, |s| {
        s.assert_for_in().body_count(expected);
    });
}

#[test]
fn test_top_level_padding_is_text() {
    let tree = parse(" {{ x }} ").unwrap();
    assert_eq!(
        tree,
        vec![
            Statement::text(" "),
            Statement::expression(Expression::reference("x")),
            Statement::text(" "),
        ]
    );
}

#[test]
fn test_join_statement_single_body_element() {
    let statement = parse_statement("{% join x in items with \", \" %}{{ x }}{% endjoin %}").unwrap();
    assert_eq!(
        statement,
        Statement::join(
            Pattern::var("x"),
            Expression::reference("items"),
            Expression::string(", "),
            vec![Statement::expression(Expression::reference("x"))],
        )
    );
}

#[test]
fn test_parse_statement_rejects_trailing_input() {
    let errors = parse_statement("{{ a }}{{ b }}").unwrap_err();
    assert!(errors[0].is_unexpected_token());
    assert_eq!(errors[0].span.start, Position::new(0, 7));
}

#[test]
fn test_three_levels_of_nesting() {
    let source = concat!(
        "{% for row in table %}",
        "{% for cells in row %}",
        "{% join c in cells with ' | ' %}{{ c }}{% endjoin %}",
        "{% endfor %}",
        "{% endfor %}",
    );
    let tree = parse(source).unwrap();

    assert_tree(&tree).statement_count(1).statement(0, |s| {
        s.assert_for_in()
            .binder("row")
            .iterable("table")
            .body_count(1)
            .body(0, |b| {
                b.assert_for_in()
                    .binder("cells")
                    .iterable("row")
                    .body_count(1)
                    .body(0, |b| {
                        b.assert_join()
                            .binder("c")
                            .iterable("cells")
                            .separator(&Expression::string(" | "))
                            .body_count(1)
                            .body(0, |b| {
                                b.assert_expression().reference("c");
                            });
                    });
            });
    });
}

#[test]
fn test_same_kind_nesting_closes_innermost_first() {
    let tree = parse("{% for a in x %}{% for b in a %}{% endfor %}tail{% endfor %}").unwrap();
    assert_tree(&tree).statement(0, |s| {
        s.assert_for_in()
            .binder("a")
            .body_count(2)
            .body(0, |b| {
                b.assert_for_in().binder("b").body_count(0);
            })
            .body(1, |b| {
                b.assert_text().text("tail");
            });
    });
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_block() {
    let error = first_error("{% for x in xs %} {{ x }}");
    match error.kind {
        ParseErrorKind::UnterminatedBlock {
            construct,
            opened_at,
        } => {
            assert_eq!(construct, BlockKind::ForIn);
            assert_eq!(opened_at.start, Position::new(0, 0));
        }
        other => panic!("expected an unterminated block, got {:?}", other),
    }
    assert_eq!(error.span.start, Position::new(0, 25));
}

#[test]
fn test_mismatched_end_directive() {
    let error = first_error("{% for x in xs %} {{ x }} {% endjoin %}");
    match error.kind {
        ParseErrorKind::MismatchedEndDirective {
            construct,
            found,
            opened_at,
        } => {
            assert_eq!(construct, BlockKind::ForIn);
            assert_eq!(found, Keyword::EndJoin);
            assert_eq!(opened_at.start, Position::new(0, 0));
        }
        other => panic!("expected a mismatched end directive, got {:?}", other),
    }
    assert_eq!(error.span.start, Position::new(0, 26));
}

#[test]
fn test_crossed_blocks_report_both_mismatches() {
    let errors =
        parse("{% for a in x %}{% join b in a with ',' %}{% endfor %}{% endjoin %}").unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        errors[0].kind,
        ParseErrorKind::MismatchedEndDirective {
            construct: BlockKind::Join,
            ..
        }
    ));
    assert!(matches!(
        errors[1].kind,
        ParseErrorKind::MismatchedEndDirective {
            construct: BlockKind::ForIn,
            ..
        }
    ));
}

#[rstest]
#[case::stray_end("{% endfor %}")]
#[case::empty_interpolation("{{ }}")]
#[case::unclosed_interpolation("{{ x ")]
#[case::missing_in("{% for x xs %}{% endfor %}")]
#[case::missing_separator("{% join x in xs %}{% endjoin %}")]
#[case::unknown_directive("{% if x %}")]
#[case::unterminated_string("{{ 'abc }}")]
fn test_unexpected_tokens(#[case] source: &str) {
    let error = first_error(source);
    assert!(error.is_unexpected_token(), "got {}", error);
}

#[test]
fn test_errors_carry_the_source_name() {
    let errors = TemplateParser::new(&Standalone)
        .with_source_name("page.tpl")
        .parse("line one\n{{ 1 2 }}")
        .unwrap_err();

    assert_eq!(errors[0].source_name.as_deref(), Some("page.tpl"));
    assert_eq!(errors[0].span.start, Position::new(1, 5));
    assert!(errors[0].to_string().starts_with("page.tpl:2:6: expected '}}'"));
}
