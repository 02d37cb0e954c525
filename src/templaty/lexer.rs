//! Lexer module for templaty
//!
//! Tokenization is done by two logos lexers, one per lexing mode, and the
//! [Segmenter] morphs between them at directive boundaries:
//!
//! - Text mode only knows directive openers and raw text. Raw text is the
//!   maximal run that does not start a directive, so a lone `{` is text while
//!   `{{` and `{%` are openers.
//! - Code mode knows the directive vocabulary (closers, keywords, identifiers,
//!   literals, punctuation) plus a catch-all symbol class for host grammars.
//!   Whitespace between code tokens is skipped, which is what makes directive
//!   syntax whitespace-insensitive.
//!
//! Standalone templates start in text mode and switch to code mode inside
//! directives. Embedded templates are lexed entirely in code mode: outside a
//! directive the tokens belong to the host grammar, and only the openers hand
//! control back to the template grammar.

pub mod segmenter;
pub mod tokens;

pub use segmenter::Segmenter;
pub use tokens::Token;

use serde::Serialize;
use std::ops::Range;

/// Which lexer a buffer starts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LexMode {
    /// Raw text outside directives (standalone templates)
    Text,
    /// Host code outside directives (embedded templates, and directive fragments)
    Code,
}

/// Convenience function to tokenize a string and collect tokens with their spans
pub fn tokenize(source: &str, mode: LexMode) -> Vec<(Token, Range<usize>)> {
    Segmenter::new(source, mode).collect()
}

/// Tokenize and drop the spans
pub fn lex(source: &str, mode: LexMode) -> Vec<Token> {
    Segmenter::new(source, mode).map(|(token, _)| token).collect()
}
