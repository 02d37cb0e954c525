//! What an expression and a statement are in a given parsing mode

use chumsky::prelude::*;

use crate::templaty::ast::{Expression, Statement};
use crate::templaty::lexer::LexMode;
use crate::templaty::parser::combinators::{
    standalone_expression, template_statement, text, BoxedTokenParser,
};

/// Parsing strategy injected into the shared directive grammar
pub trait Dialect {
    type Expression: Clone + 'static;
    type Statement: Clone + 'static;

    /// The lexer a source buffer of this dialect starts in
    fn lex_mode(&self) -> LexMode;

    /// Parser for the expression nonterminal
    fn expression(&self) -> BoxedTokenParser<'static, Self::Expression>;

    /// Parser for the statement nonterminal (one statement)
    fn statement(&self) -> BoxedTokenParser<'static, Self::Statement>;
}

/// Templates over raw text and the minimal expression language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Standalone;

impl Dialect for Standalone {
    type Expression = Expression;
    type Statement = Statement;

    fn lex_mode(&self) -> LexMode {
        LexMode::Text
    }

    fn expression(&self) -> BoxedTokenParser<'static, Expression> {
        standalone_expression()
    }

    fn statement(&self) -> BoxedTokenParser<'static, Statement> {
        recursive(|statement| {
            let directive =
                template_statement(standalone_expression(), statement.boxed()).map(Statement::from);
            text().map(Statement::text).or(directive)
        })
        .boxed()
    }
}

/// `source_file := statement*`
pub fn source_file<D: Dialect + ?Sized>(
    dialect: &D,
) -> BoxedTokenParser<'static, Vec<D::Statement>> {
    dialect.statement().repeated().then_ignore(end()).boxed()
}
