//! Main module for templaty library functionality
//!
//! The pipeline is the same in both modes:
//!
//! 1. [lexer]: a logos segmenter splits the buffer into tokens. In standalone mode raw
//!    text between directives is one token; in embedded mode everything is lexed as code
//!    and the host grammar sees the same token vocabulary.
//! 2. [parser]: chumsky combinators build the tree. What an "expression" and a
//!    "statement" are is supplied by a [parser::Dialect].
//! 3. [compose]: for embedded mode, a declarative check that splicing the template
//!    productions into the host grammar does not introduce unresolved ambiguities.

pub mod ast;
pub mod compose;
pub mod config;
pub mod formats;
pub mod lexer;
pub mod parser;
pub mod processor;
pub mod testing;
