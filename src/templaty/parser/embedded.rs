//! Embedding the directives into a host grammar
//!
//! A host supplies its own expression and statement productions as chumsky
//! parsers. [Embedded] ties them together with the directive grammar:
//!
//! ```text
//! expression := host expression | '{{' expression '}}'
//! statement  := host statement  | template statement
//! ```
//!
//! Host alternatives are always tried first, which is the ordered-choice form
//! of the host statement's elevated precedence. Both nonterminals are
//! recursive: the host receives the spliced parsers and uses them wherever
//! its own grammar refers to an expression or a statement, so directives can
//! appear anywhere the host accepts one.

use chumsky::prelude::*;

use crate::templaty::ast::{EmbeddedExpression, EmbeddedStatement};
use crate::templaty::compose::{
    compose, template_rules, ComposedGrammar, CompositionError, Conflict, GrammarRules,
    SplicePoints,
};
use crate::templaty::lexer::{LexMode, Token};
use crate::templaty::parser::combinators::{interpolation, template_statement, BoxedTokenParser};
use crate::templaty::parser::dialect::Dialect;
use crate::templaty::parser::error::SyntaxError;

/// The host's expression nonterminal after splicing
pub type SplicedExpression<H> = EmbeddedExpression<<H as HostGrammar>::Expression>;

/// The host's statement nonterminal after splicing
pub type SplicedStatement<H> =
    EmbeddedStatement<<H as HostGrammar>::Expression, <H as HostGrammar>::Statement>;

/// A host language the directives can be embedded into.
///
/// The parsers returned here must consume at least one token before they
/// refer back to the spliced expression: chumsky parsers are recursive
/// descent, so a left-recursive host production would not terminate.
pub trait HostGrammar {
    type Expression: Clone + 'static;
    type Statement: Clone + 'static;

    fn name(&self) -> &str;

    /// The host grammar, for composition checks
    fn rules(&self) -> GrammarRules;

    /// Where the directives are spliced in
    fn splice_points(&self) -> SplicePoints {
        SplicePoints::default()
    }

    /// Ambiguities the host grammar resolves on purpose
    fn conflicts(&self) -> Vec<Conflict> {
        Vec::new()
    }

    /// The host's own expression productions.
    ///
    /// `expression` parses a spliced expression (host or interpolation).
    fn expression(
        &self,
        expression: BoxedTokenParser<'static, EmbeddedExpression<Self::Expression>>,
    ) -> BoxedTokenParser<'static, Self::Expression>;

    /// The host's own statement productions.
    ///
    /// `statement` parses a spliced statement, `expression` a spliced expression.
    fn statement(
        &self,
        statement: BoxedTokenParser<
            'static,
            EmbeddedStatement<Self::Expression, Self::Statement>,
        >,
        expression: BoxedTokenParser<'static, EmbeddedExpression<Self::Expression>>,
    ) -> BoxedTokenParser<'static, Self::Statement>;
}

/// A host grammar with the directives spliced in
#[derive(Debug, Clone)]
pub struct Embedded<H> {
    host: H,
    grammar: ComposedGrammar,
}

impl<H: HostGrammar> Embedded<H> {
    /// Compose the host with the template grammar.
    ///
    /// Fails when the host's declared grammar cannot take the splice.
    pub fn new(host: H) -> Result<Self, Vec<CompositionError>> {
        let grammar = compose(
            &host.rules(),
            &host.conflicts(),
            &host.splice_points(),
            &template_rules(LexMode::Code),
        )?;
        tracing::debug!(host = host.name(), summary = %grammar.summary(), "embedded dialect ready");
        Ok(Self { host, grammar })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn grammar(&self) -> &ComposedGrammar {
        &self.grammar
    }

    fn spliced_expression(&self) -> BoxedTokenParser<'static, SplicedExpression<H>> {
        recursive(
            |spliced: Recursive<'static, Token, SplicedExpression<H>, SyntaxError>| {
                let spliced = spliced.boxed();
                let host = self
                    .host
                    .expression(spliced.clone())
                    .map(EmbeddedExpression::Host);
                let directive = interpolation(spliced)
                    .map(|statement| EmbeddedExpression::Interpolation(Box::new(statement)));
                host.or(directive)
            },
        )
        .boxed()
    }

    fn spliced_statement(&self) -> BoxedTokenParser<'static, SplicedStatement<H>> {
        let expression = self.spliced_expression();
        recursive(
            |spliced: Recursive<'static, Token, SplicedStatement<H>, SyntaxError>| {
                let spliced = spliced.boxed();
                let host = self
                    .host
                    .statement(spliced.clone(), expression.clone())
                    .map(EmbeddedStatement::Host);
                let directive =
                    template_statement(expression, spliced).map(EmbeddedStatement::Template);
                host.or(directive)
            },
        )
        .boxed()
    }
}

impl<H: HostGrammar> Dialect for Embedded<H> {
    type Expression = SplicedExpression<H>;
    type Statement = SplicedStatement<H>;

    fn lex_mode(&self) -> LexMode {
        LexMode::Code
    }

    fn expression(&self) -> BoxedTokenParser<'static, Self::Expression> {
        self.spliced_expression()
    }

    fn statement(&self) -> BoxedTokenParser<'static, Self::Statement> {
        self.spliced_statement()
    }
}
