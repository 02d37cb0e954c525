//! Parser combinator functions shared by both dialects.
//!
//! Everything here is parameterised over what an expression and a statement
//! are, so the directive grammar is written exactly once.

use chumsky::prelude::*;
use std::ops::Range;

use crate::templaty::ast::{
    Expression, ExpressionStatement, ForInStatement, JoinStatement, Literal, Pattern,
    TemplateStatement,
};
use crate::templaty::lexer::tokens::Keyword;
use crate::templaty::lexer::Token;
use crate::templaty::parser::error::{BlockKind, SyntaxError};

/// Type alias for the boxed parsers handed between dialects
pub type BoxedTokenParser<'a, O> = BoxedParser<'a, Token, O, SyntaxError>;

/// Helper: match a directive keyword
pub(crate) fn keyword(k: Keyword) -> impl Parser<Token, (), Error = SyntaxError> + Clone {
    just(Token::Keyword(k)).ignored()
}

/// Helper: match one raw-text token and take its contents
pub(crate) fn text() -> impl Parser<Token, String, Error = SyntaxError> + Clone {
    filter_map(|span, token| match token {
        Token::Text(text) => Ok(text),
        other => Err(SyntaxError::unexpected(span, &["some text"], Some(other))),
    })
}

/// Helper: a text token made only of spaces and tabs
pub(crate) fn padding() -> impl Parser<Token, (), Error = SyntaxError> + Clone {
    filter_map(|span, token| match token {
        Token::Text(text) if text.chars().all(|c| c == ' ' || c == '\t') => Ok(()),
        other => Err(SyntaxError::unexpected(span, &["some text"], Some(other))),
    })
}

/// The standalone expression language: a reference or a literal
pub fn standalone_expression() -> BoxedTokenParser<'static, Expression> {
    filter_map(|span, token| match token {
        Token::Identifier(name) => Ok(Expression::Reference(name)),
        Token::String(value) => Ok(Expression::Literal(Literal::String(value))),
        Token::Integer(digits) => Ok(Expression::Literal(Literal::Integer(digits))),
        other => Err(SyntaxError::unexpected(
            span,
            &["an identifier", "a string literal", "an integer"],
            Some(other),
        )),
    })
    .labelled("an expression")
    .boxed()
}

/// A loop binder: `name` or `(p, ...)`, nested to any depth.
///
/// The list is `pattern (',' pattern)*`, so a trailing comma is rejected.
/// Every failure inside a binder is reported as an invalid pattern.
pub fn pattern() -> BoxedTokenParser<'static, Pattern> {
    recursive(|pattern| {
        let var = filter_map(|span, token| match token {
            Token::Identifier(name) => Ok(Pattern::Var(name)),
            other => Err(SyntaxError::unexpected(
                span,
                &["an identifier", "'('"],
                Some(other),
            )),
        });

        let tuple = pattern
            .separated_by(just(Token::Comma))
            .delimited_by(just(Token::OpenParen), just(Token::CloseParen))
            .map(Pattern::Tuple);

        var.or(tuple)
    })
    .map_err(SyntaxError::into_invalid_pattern)
    .labelled("a pattern")
    .boxed()
}

/// `{{ expression }}`
pub fn interpolation<E: 'static>(
    expression: BoxedTokenParser<'static, E>,
) -> BoxedTokenParser<'static, ExpressionStatement<E>> {
    expression
        .delimited_by(just(Token::OpenExpression), just(Token::CloseExpression))
        .map(|expression| ExpressionStatement { expression })
        .boxed()
}

/// What terminated a block body
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BlockEnd {
    Directive(Keyword, Range<usize>),
    EndOfInput(Range<usize>),
}

/// Helper: any end directive, or end of input.
///
/// Bodies accept either end keyword here so that a wrong one can be reported
/// against the block it failed to close instead of as a stray token.
pub(crate) fn block_end() -> impl Parser<Token, BlockEnd, Error = SyntaxError> + Clone {
    let end_keyword = filter_map(|span, token| match token {
        Token::Keyword(k) if k.is_end() => Ok(k),
        other => Err(SyntaxError::unexpected(
            span,
            &["'endfor'", "'endjoin'"],
            Some(other),
        )),
    });

    let directive = end_keyword
        .delimited_by(just(Token::OpenStatement), just(Token::CloseStatement))
        .map_with_span(BlockEnd::Directive);

    directive.or(end().map_with_span(|(), span| BlockEnd::EndOfInput(span)))
}

/// A block body, up to but not including its end.
///
/// Spaces and tabs directly after the opening directive or directly before
/// the end are not part of the body. Line breaks are.
pub(crate) fn block_body<S: 'static>(
    statement: BoxedTokenParser<'static, S>,
) -> BoxedTokenParser<'static, Vec<S>> {
    let trailing = padding().then_ignore(block_end().rewind()).map(|()| None);

    padding()
        .or_not()
        .ignore_then(trailing.or(statement.map(Some)).repeated())
        .map(|items| items.into_iter().flatten().collect())
        .boxed()
}

/// Helper: report a block end that does not close `construct`
pub(crate) fn check_block_end(
    construct: BlockKind,
    opened_at: Range<usize>,
    end: BlockEnd,
    emit: &mut dyn FnMut(SyntaxError),
) {
    match end {
        BlockEnd::Directive(k, _) if k == construct.end_keyword() => {}
        BlockEnd::Directive(k, span) => {
            emit(SyntaxError::mismatched(construct, k, opened_at, span));
        }
        BlockEnd::EndOfInput(span) => {
            emit(SyntaxError::unterminated(construct, opened_at, span));
        }
    }
}

/// The directive statements: `{{ }}`, `for` and `join`.
///
/// `expression` is what the dialect accepts wherever the directives need an
/// expression, and `statement` is what a block body is made of.
pub fn template_statement<E: 'static, S: 'static>(
    expression: BoxedTokenParser<'static, E>,
    statement: BoxedTokenParser<'static, S>,
) -> BoxedTokenParser<'static, TemplateStatement<E, S>> {
    let expression_statement = interpolation(expression.clone()).map(TemplateStatement::Expression);

    let for_header = keyword(Keyword::For)
        .ignore_then(pattern())
        .then_ignore(keyword(Keyword::In))
        .then(expression.clone())
        .delimited_by(just(Token::OpenStatement), just(Token::CloseStatement))
        .map_with_span(|header, span| (header, span));

    let for_in = for_header
        .then(block_body(statement.clone()))
        .then(block_end())
        .validate(|((((binder, iterable), opened_at), body), end), _span, emit| {
            check_block_end(BlockKind::ForIn, opened_at, end, emit);
            TemplateStatement::ForIn(ForInStatement {
                binder,
                iterable,
                body,
            })
        });

    let join_header = keyword(Keyword::Join)
        .ignore_then(pattern())
        .then_ignore(keyword(Keyword::In))
        .then(expression.clone())
        .then_ignore(keyword(Keyword::With))
        .then(expression)
        .delimited_by(just(Token::OpenStatement), just(Token::CloseStatement))
        .map_with_span(|header, span| (header, span));

    let join = join_header
        .then(block_body(statement))
        .then(block_end())
        .validate(
            |(((((binder, iterable), separator), opened_at), body), end), _span, emit| {
                check_block_end(BlockKind::Join, opened_at, end, emit);
                TemplateStatement::Join(JoinStatement {
                    binder,
                    iterable,
                    separator,
                    body,
                })
            },
        );

    choice((expression_statement.boxed(), for_in.boxed(), join.boxed())).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templaty::lexer::{LexMode, Segmenter};
    use chumsky::Stream;
    use crate::templaty::parser::error::SyntaxErrorKind;

    fn run<O>(
        parser: impl Parser<Token, O, Error = SyntaxError>,
        source: &str,
    ) -> Result<O, Vec<SyntaxError>> {
        let len = source.len();
        parser.parse(Stream::from_iter(len..len, Segmenter::new(source, LexMode::Code)))
    }

    #[test]
    fn test_standalone_expression_kinds() {
        assert_eq!(
            run(standalone_expression(), "items"),
            Ok(Expression::reference("items"))
        );
        assert_eq!(run(standalone_expression(), "'a'"), Ok(Expression::string("a")));
        assert_eq!(run(standalone_expression(), "12"), Ok(Expression::integer("12")));
    }

    #[test]
    fn test_expression_rejects_punctuation() {
        let errors = run(standalone_expression(), ",").unwrap_err();
        assert_eq!(errors[0].kind, SyntaxErrorKind::UnexpectedToken);
        assert_eq!(errors[0].found, Some(Token::Comma));
    }

    #[test]
    fn test_nested_tuple_pattern() {
        let parsed = run(pattern().then_ignore(end()), "(a, (b, c))");
        assert_eq!(
            parsed,
            Ok(Pattern::tuple([
                Pattern::var("a"),
                Pattern::tuple([Pattern::var("b"), Pattern::var("c")]),
            ]))
        );
    }

    #[test]
    fn test_empty_tuple_pattern() {
        assert_eq!(run(pattern(), "()"), Ok(Pattern::tuple([])));
    }

    #[test]
    fn test_trailing_comma_is_invalid_pattern() {
        let errors = run(pattern().then_ignore(end()), "(a, b,)").unwrap_err();
        assert_eq!(errors[0].kind, SyntaxErrorKind::InvalidPattern);
    }

    #[test]
    fn test_literal_is_not_a_pattern() {
        let errors = run(pattern(), "\"x\"").unwrap_err();
        assert_eq!(errors[0].kind, SyntaxErrorKind::InvalidPattern);
        assert_eq!(errors[0].span, 0..3);
    }

    #[test]
    fn test_block_end_variants() {
        assert_eq!(
            run(block_end(), "{% endjoin %}"),
            Ok(BlockEnd::Directive(Keyword::EndJoin, 0..13))
        );
        assert_eq!(run(block_end(), ""), Ok(BlockEnd::EndOfInput(0..0)));
    }

    fn text_body(source: &str) -> Result<Vec<String>, Vec<SyntaxError>> {
        let len = source.len();
        let parser = block_body(text().boxed()).then_ignore(block_end());
        parser.parse(Stream::from_iter(len..len, Segmenter::new(source, LexMode::Text)))
    }

    #[test]
    fn test_block_body_drops_edge_padding() {
        assert_eq!(text_body(" \t{% endfor %}"), Ok(vec![]));
        assert_eq!(text_body(""), Ok(vec![]));
    }

    #[test]
    fn test_block_body_keeps_line_breaks_and_inner_text() {
        assert_eq!(text_body("\n{% endjoin %}"), Ok(vec!["\n".to_string()]));
        assert_eq!(text_body(" a {% endfor %}"), Ok(vec![" a ".to_string()]));
    }

    #[test]
    fn test_check_block_end() {
        let mut emitted = Vec::new();
        check_block_end(
            BlockKind::ForIn,
            0..5,
            BlockEnd::Directive(Keyword::EndFor, 9..14),
            &mut |e: SyntaxError| emitted.push(e),
        );
        assert!(emitted.is_empty());

        check_block_end(
            BlockKind::Join,
            0..5,
            BlockEnd::Directive(Keyword::EndFor, 9..14),
            &mut |e: SyntaxError| emitted.push(e),
        );
        assert_eq!(emitted.len(), 1);
        assert!(matches!(
            emitted[0].kind,
            SyntaxErrorKind::MismatchedEndDirective {
                construct: BlockKind::Join,
                found: Keyword::EndFor,
                ..
            }
        ));
    }
}
