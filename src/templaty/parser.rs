//! Parser module for templaty
//!
//! The grammar is written once as chumsky combinators over the segmenter's
//! token stream. What counts as an expression or a statement at the splice
//! points is supplied by a [Dialect]:
//!
//! - [Standalone] uses the minimal expression language (references, string and
//!   integer literals) and keeps raw text as statements.
//! - [Embedded] splices the directives into a [HostGrammar]: the host's
//!   expression and statement nonterminals become a choice between the host's
//!   own production and the template one.
//!
//! ## Testing
//!
//! Tree assertions go through [crate::templaty::testing::assert_tree].

pub mod api;
pub mod combinators;
pub mod dialect;
pub mod embedded;
pub mod error;
#[cfg(test)]
mod tests;

pub use api::{
    parse, parse_expression, parse_pattern, parse_statement, parse_with, TemplateParser,
};
pub use combinators::{
    interpolation, pattern, standalone_expression, template_statement, BoxedTokenParser,
};
pub use dialect::{source_file, Dialect, Standalone};
pub use embedded::{Embedded, HostGrammar, SplicedExpression, SplicedStatement};
pub use error::{BlockKind, ParseError, ParseErrorKind, SyntaxError};
