//! The template grammar, described declaratively

use super::grammar::{GrammarRules, Production, Symbol};
use super::Conflict;
use crate::templaty::lexer::LexMode;

/// Placeholder for the nonterminal directives take their expressions from
pub const EXPRESSION: &str = "expression";
/// Placeholder for the nonterminal block bodies are made of
pub const STATEMENT: &str = "statement";

fn t(text: &str) -> Symbol {
    Symbol::terminal(text)
}

fn nt(name: &str) -> Symbol {
    Symbol::nonterminal(name)
}

fn block(opener: &str, header: Vec<Symbol>, end: &str) -> Vec<Symbol> {
    let mut symbols = vec![t("{%"), t(opener)];
    symbols.extend(header);
    symbols.extend([
        t("%}"),
        nt("template_body"),
        t("{%"),
        t(end),
        t("%}"),
    ]);
    symbols
}

/// The directive grammar.
///
/// In [LexMode::Code] this is only what a splice adds: the directive
/// statements, interpolation and binders, referring to `expression` and
/// `statement` for whatever the host provides. [LexMode::Text] adds the
/// standalone grammar around it: raw text, the minimal expression language and
/// `source_file`.
pub fn template_rules(mode: LexMode) -> GrammarRules {
    let pattern = nt("template_pattern");

    let mut rules = GrammarRules::new()
        .rule(
            "template_statement",
            vec![
                Production::new(
                    "template_expression_statement",
                    vec![nt("template_interpolation")],
                ),
                Production::new(
                    "template_for_in_statement",
                    block(
                        "for",
                        vec![pattern.clone(), t("in"), nt(EXPRESSION)],
                        "endfor",
                    ),
                ),
                Production::new(
                    "template_join_statement",
                    block(
                        "join",
                        vec![
                            pattern.clone(),
                            t("in"),
                            nt(EXPRESSION),
                            t("with"),
                            nt(EXPRESSION),
                        ],
                        "endjoin",
                    ),
                ),
            ],
        )
        .rule(
            "template_interpolation",
            vec![Production::new(
                "template_interpolation",
                vec![t("{{"), nt(EXPRESSION), t("}}")],
            )],
        )
        .rule(
            "template_body",
            vec![
                Production::new("template_empty_body", vec![]),
                Production::new("template_body", vec![nt(STATEMENT), nt("template_body")]),
            ],
        )
        .rule(
            "template_pattern",
            vec![
                Production::new("template_var_pattern", vec![Symbol::class("identifier")]),
                Production::new(
                    "template_tuple_pattern",
                    vec![t("("), nt("template_pattern_list"), t(")")],
                ),
            ],
        )
        .rule(
            "template_pattern_list",
            vec![
                Production::new("template_empty_pattern_list", vec![]),
                Production::new(
                    "template_pattern_list",
                    vec![pattern.clone(), nt("template_pattern_tail")],
                ),
            ],
        )
        .rule(
            "template_pattern_tail",
            vec![
                Production::new("template_pattern_end", vec![]),
                Production::new(
                    "template_pattern_next",
                    vec![t(","), pattern, nt("template_pattern_tail")],
                ),
            ],
        );

    if mode == LexMode::Text {
        rules = rules
            .rule(
                "source_file",
                vec![
                    Production::new("empty_source_file", vec![]),
                    Production::new("source_file", vec![nt(STATEMENT), nt("source_file")]),
                ],
            )
            .rule(
                STATEMENT,
                vec![
                    Production::new("text_statement", vec![Symbol::class("text")]),
                    Production::new("directive_statement", vec![nt("template_statement")]),
                ],
            )
            .rule(
                EXPRESSION,
                vec![
                    Production::new("reference_expression", vec![Symbol::class("identifier")]),
                    Production::new("string_literal", vec![Symbol::class("string")]),
                    Production::new("integer_literal", vec![Symbol::class("integer")]),
                ],
            );
    }

    rules
}

/// Ambiguity resolutions the template grammar declares for itself.
///
/// A host statement that starts with an expression shares its prefix with the
/// directive statements once interpolation is an expression.
pub fn template_conflicts() -> Vec<Conflict> {
    vec![Conflict::new(EXPRESSION, "template_statement")]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_mode_leaves_splice_points_to_the_host() {
        let rules = template_rules(LexMode::Code);
        assert!(rules.contains("template_statement"));
        assert!(!rules.contains(EXPRESSION));
        assert!(!rules.contains(STATEMENT));
        assert!(!rules.has_production("text_statement"));
    }

    #[test]
    fn test_text_mode_is_self_contained() {
        let rules = template_rules(LexMode::Text);
        for (_, production) in rules.productions() {
            for name in production.referenced_nonterminals() {
                assert!(rules.contains(name), "undefined nonterminal {}", name);
            }
        }
    }

    #[test]
    fn test_directive_first_sets() {
        let sets = template_rules(LexMode::Text).first_sets();

        let statement = &sets["template_statement"];
        assert_eq!(statement.symbols.len(), 2);
        assert!(statement.symbols.contains(&t("{{")));
        assert!(statement.symbols.contains(&t("{%")));

        assert!(sets["template_pattern_list"].nullable);
        assert!(sets["source_file"].nullable);
        assert!(!sets[STATEMENT].nullable);
    }
}
