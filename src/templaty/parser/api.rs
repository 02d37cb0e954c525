//! Public API for the parser.

use chumsky::{prelude::*, Stream};
use std::cell::Cell;

use crate::templaty::ast::{Expression, Pattern, SourceLocation, Statement};
use crate::templaty::lexer::{LexMode, Segmenter};
use crate::templaty::parser::combinators::{pattern, BoxedTokenParser};
use crate::templaty::parser::dialect::{source_file, Dialect, Standalone};
use crate::templaty::parser::error::ParseError;

/// Run `parser` over `source`, pulling tokens from the segmenter on demand
fn run<O>(
    parser: BoxedTokenParser<'static, O>,
    source: &str,
    mode: LexMode,
    source_name: Option<&str>,
) -> Result<O, Vec<ParseError>> {
    let end = source.len();
    let token_count = Cell::new(0usize);
    let tokens = Segmenter::new(source, mode).inspect(|_| token_count.set(token_count.get() + 1));

    let result = parser.parse(Stream::from_iter(end..end, tokens));

    match result {
        Ok(output) => {
            tracing::debug!(?mode, tokens = token_count.get(), "parse succeeded");
            Ok(output)
        }
        Err(errors) => {
            let location = SourceLocation::new(source);
            let mut errors: Vec<ParseError> = errors
                .into_iter()
                .map(|e| e.into_parse_error(&location, source_name))
                .collect();
            errors.sort_by_key(|e| e.span.start);
            tracing::debug!(
                ?mode,
                tokens = token_count.get(),
                errors = errors.len(),
                "parse failed"
            );
            Err(errors)
        }
    }
}

/// Parse a standalone template
pub fn parse(source: &str) -> Result<Vec<Statement>, Vec<ParseError>> {
    parse_with(&Standalone, source)
}

/// Parse a whole source buffer with any dialect
pub fn parse_with<D: Dialect + ?Sized>(
    dialect: &D,
    source: &str,
) -> Result<Vec<D::Statement>, Vec<ParseError>> {
    TemplateParser::new(dialect).parse(source)
}

/// Parse a loop binder on its own, such as `(key, (first, second))`
pub fn parse_pattern(source: &str) -> Result<Pattern, Vec<ParseError>> {
    run(
        pattern().then_ignore(end()).boxed(),
        source,
        LexMode::Code,
        None,
    )
}

/// Parse a standalone expression on its own, such as `items` or `", "`
pub fn parse_expression(source: &str) -> Result<Expression, Vec<ParseError>> {
    run(
        Standalone.expression().then_ignore(end()).boxed(),
        source,
        LexMode::Code,
        None,
    )
}

/// Parse exactly one standalone statement spanning the whole input
pub fn parse_statement(source: &str) -> Result<Statement, Vec<ParseError>> {
    run(
        Standalone.statement().then_ignore(end()).boxed(),
        source,
        LexMode::Text,
        None,
    )
}

/// A reusable parser for one dialect
pub struct TemplateParser<'d, D: ?Sized> {
    dialect: &'d D,
    source_name: Option<String>,
}

impl<'d, D: Dialect + ?Sized> TemplateParser<'d, D> {
    pub fn new(dialect: &'d D) -> Self {
        Self {
            dialect,
            source_name: None,
        }
    }

    /// Name reported with every error, usually a file name
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn parse(&self, source: &str) -> Result<Vec<D::Statement>, Vec<ParseError>> {
        let statements = run(
            source_file(self.dialect),
            source,
            self.dialect.lex_mode(),
            self.source_name.as_deref(),
        )?;
        tracing::debug!(statements = statements.len(), "parsed source file");
        Ok(statements)
    }
}
