//! Lazy, mode-switching tokenizer
//!
//! The segmenter owns one logos lexer at a time and morphs it into the other
//! mode when a directive opens or closes. Tokens are produced on demand, so the
//! parser pulls them one by one instead of tokenizing the whole buffer up front.

use super::tokens::{CodeToken, TextToken, Token};
use super::LexMode;
use logos::Logos;
use std::ops::Range;

enum Lexing<'src> {
    Text(logos::Lexer<'src, TextToken>),
    Code(logos::Lexer<'src, CodeToken>),
}

/// Splits a source buffer into tokens with their byte spans
pub struct Segmenter<'src> {
    mode: LexMode,
    state: Option<Lexing<'src>>,
}

impl<'src> Segmenter<'src> {
    pub fn new(source: &'src str, mode: LexMode) -> Self {
        let state = match mode {
            LexMode::Text => Lexing::Text(TextToken::lexer(source)),
            LexMode::Code => Lexing::Code(CodeToken::lexer(source)),
        };
        Self {
            mode,
            state: Some(state),
        }
    }

    pub fn mode(&self) -> LexMode {
        self.mode
    }
}

impl Iterator for Segmenter<'_> {
    type Item = (Token, Range<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        // An exhausted lexer is not put back, so the iterator stays fused
        match self.state.take()? {
            Lexing::Text(mut lexer) => {
                let result = lexer.next()?;
                let span = lexer.span();
                let token = match result {
                    Ok(token) => Token::from(token),
                    Err(()) => Token::Invalid(lexer.slice().to_owned()),
                };

                self.state = Some(if token.opens_directive() {
                    tracing::trace!(at = span.start, "entering directive");
                    Lexing::Code(lexer.morph())
                } else {
                    Lexing::Text(lexer)
                });
                Some((token, span))
            }
            Lexing::Code(mut lexer) => {
                let result = lexer.next()?;
                let span = lexer.span();
                let token = match result {
                    Ok(token) => Token::from(token),
                    Err(()) => Token::Invalid(lexer.slice().to_owned()),
                };

                // Embedded buffers never leave code mode
                self.state = Some(if self.mode == LexMode::Text && token.closes_directive() {
                    tracing::trace!(at = span.end, "leaving directive");
                    Lexing::Text(lexer.morph())
                } else {
                    Lexing::Code(lexer)
                });
                Some((token, span))
            }
        }
    }
}
