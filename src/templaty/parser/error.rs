//! Parse errors
//!
//! Two layers: [SyntaxError] is the error type the chumsky combinators work
//! with (byte spans, token classes), and [ParseError] is what callers get back
//! (line/column spans, optional source name). The grammar is fail-fast: every
//! error is terminal for the parse call and no partial tree is returned.

use crate::templaty::ast::{SourceLocation, Span};
use crate::templaty::lexer::tokens::Keyword;
use crate::templaty::lexer::Token;
use std::fmt;
use std::ops::Range;

/// The two block constructs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    ForIn,
    Join,
}

impl BlockKind {
    pub fn opening_keyword(&self) -> Keyword {
        match self {
            BlockKind::ForIn => Keyword::For,
            BlockKind::Join => Keyword::Join,
        }
    }

    pub fn end_keyword(&self) -> Keyword {
        match self {
            BlockKind::ForIn => Keyword::EndFor,
            BlockKind::Join => Keyword::EndJoin,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.opening_keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnexpectedToken,
    InvalidPattern,
    UnterminatedBlock {
        construct: BlockKind,
        opened_at: Range<usize>,
    },
    MismatchedEndDirective {
        construct: BlockKind,
        found: Keyword,
        opened_at: Range<usize>,
    },
}

/// The error type threaded through the combinators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Range<usize>,
    /// Token classes that would have been accepted ("end of input" included)
    pub expected: Vec<String>,
    pub found: Option<Token>,
    pub label: Option<&'static str>,
}

impl SyntaxError {
    pub fn unexpected(span: Range<usize>, expected: &[&str], found: Option<Token>) -> Self {
        Self {
            kind: SyntaxErrorKind::UnexpectedToken,
            span,
            expected: expected.iter().map(|e| e.to_string()).collect(),
            found,
            label: None,
        }
    }

    pub(crate) fn unterminated(
        construct: BlockKind,
        opened_at: Range<usize>,
        span: Range<usize>,
    ) -> Self {
        Self {
            kind: SyntaxErrorKind::UnterminatedBlock {
                construct,
                opened_at,
            },
            span,
            expected: vec![format!("'{{% {} %}}'", construct.end_keyword())],
            found: None,
            label: None,
        }
    }

    pub(crate) fn mismatched(
        construct: BlockKind,
        found: Keyword,
        opened_at: Range<usize>,
        span: Range<usize>,
    ) -> Self {
        Self {
            kind: SyntaxErrorKind::MismatchedEndDirective {
                construct,
                found,
                opened_at,
            },
            span,
            expected: vec![format!("'{{% {} %}}'", construct.end_keyword())],
            found: Some(Token::Keyword(found)),
            label: None,
        }
    }

    /// Reclassify an error raised while parsing a loop binder
    pub(crate) fn into_invalid_pattern(mut self) -> Self {
        if self.kind == SyntaxErrorKind::UnexpectedToken {
            self.kind = SyntaxErrorKind::InvalidPattern;
        }
        self
    }

    /// Convert into a caller-facing error with line/column positions
    pub fn into_parse_error(self, location: &SourceLocation, source_name: Option<&str>) -> ParseError {
        let span = location.range_to_span(&self.span);
        let expected = if self.expected.is_empty() {
            self.label.map(|l| vec![l.to_string()]).unwrap_or_default()
        } else {
            self.expected
        };
        let found = self.found.map(|t| t.to_string());

        let kind = match self.kind {
            SyntaxErrorKind::UnexpectedToken => ParseErrorKind::UnexpectedToken { expected, found },
            SyntaxErrorKind::InvalidPattern => ParseErrorKind::InvalidPattern { expected, found },
            SyntaxErrorKind::UnterminatedBlock {
                construct,
                opened_at,
            } => ParseErrorKind::UnterminatedBlock {
                construct,
                opened_at: location.range_to_span(&opened_at),
            },
            SyntaxErrorKind::MismatchedEndDirective {
                construct,
                found,
                opened_at,
            } => ParseErrorKind::MismatchedEndDirective {
                construct,
                found,
                opened_at: location.range_to_span(&opened_at),
            },
        };

        ParseError {
            kind,
            span,
            source_name: source_name.map(str::to_string),
        }
    }
}

impl chumsky::Error<Token> for SyntaxError {
    type Span = Range<usize>;
    type Label = &'static str;

    fn expected_input_found<Iter: IntoIterator<Item = Option<Token>>>(
        span: Self::Span,
        expected: Iter,
        found: Option<Token>,
    ) -> Self {
        let mut names: Vec<String> = Vec::new();
        for token in expected {
            let name = match token {
                Some(t) => t.kind_name().to_string(),
                None => "end of input".to_string(),
            };
            if !names.contains(&name) {
                names.push(name);
            }
        }

        Self {
            kind: SyntaxErrorKind::UnexpectedToken,
            span,
            expected: names,
            found,
            label: None,
        }
    }

    fn with_label(mut self, label: Self::Label) -> Self {
        self.label.get_or_insert(label);
        self
    }

    fn merge(mut self, other: Self) -> Self {
        // A block or pattern diagnosis says more than a bare unexpected token
        if self.kind == SyntaxErrorKind::UnexpectedToken {
            self.kind = other.kind;
        }
        for name in other.expected {
            if !self.expected.contains(&name) {
                self.expected.push(name);
            }
        }
        if self.label.is_none() {
            self.label = other.label;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token class was required but something else was found
    UnexpectedToken {
        expected: Vec<String>,
        found: Option<String>,
    },
    /// Malformed loop binder
    InvalidPattern {
        expected: Vec<String>,
        found: Option<String>,
    },
    /// End of input while a block body was still open
    UnterminatedBlock {
        construct: BlockKind,
        opened_at: Span,
    },
    /// An end directive that does not close the innermost open block
    MismatchedEndDirective {
        construct: BlockKind,
        found: Keyword,
        opened_at: Span,
    },
}

/// A parse failure, positioned in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub source_name: Option<String>,
}

impl ParseError {
    pub fn is_unterminated_block(&self) -> bool {
        matches!(self.kind, ParseErrorKind::UnterminatedBlock { .. })
    }

    pub fn is_mismatched_end(&self) -> bool {
        matches!(self.kind, ParseErrorKind::MismatchedEndDirective { .. })
    }

    pub fn is_invalid_pattern(&self) -> bool {
        matches!(self.kind, ParseErrorKind::InvalidPattern { .. })
    }

    pub fn is_unexpected_token(&self) -> bool {
        matches!(self.kind, ParseErrorKind::UnexpectedToken { .. })
    }
}

fn write_expected_found(
    f: &mut fmt::Formatter<'_>,
    expected: &[String],
    found: &Option<String>,
) -> fmt::Result {
    match expected {
        [] => write!(f, "unexpected ")?,
        [only] => write!(f, "expected {}, found ", only)?,
        [init @ .., last] => write!(f, "expected {} or {}, found ", init.join(", "), last)?,
    }
    match found {
        Some(token) => write!(f, "{}", token),
        None => write!(f, "end of input"),
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.source_name {
            write!(f, "{}:", name)?;
        }
        write!(f, "{}: ", self.span.start)?;

        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write_expected_found(f, expected, found)
            }
            ParseErrorKind::InvalidPattern { expected, found } => {
                write!(f, "invalid pattern: ")?;
                write_expected_found(f, expected, found)
            }
            ParseErrorKind::UnterminatedBlock {
                construct,
                opened_at,
            } => write!(
                f,
                "unterminated {} block opened at {}: expected '{{% {} %}}' before end of input",
                construct,
                opened_at.start,
                construct.end_keyword()
            ),
            ParseErrorKind::MismatchedEndDirective {
                construct,
                found,
                opened_at,
            } => write!(
                f,
                "'{{% {} %}}' does not close the {} block opened at {}, expected '{{% {} %}}'",
                found,
                construct,
                opened_at.start,
                construct.end_keyword()
            ),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chumsky::Error as _;

    #[test]
    fn test_expected_names_are_deduplicated() {
        let error = SyntaxError::expected_input_found(
            3..4,
            vec![
                Some(Token::Identifier("a".to_string())),
                Some(Token::Identifier("b".to_string())),
                None,
            ],
            Some(Token::Comma),
        );
        assert_eq!(error.expected, vec!["an identifier", "end of input"]);
    }

    #[test]
    fn test_merge_keeps_specific_kind() {
        let plain = SyntaxError::unexpected(0..1, &["'('"], None);
        let unterminated = SyntaxError::unterminated(BlockKind::ForIn, 0..17, 20..20);

        let merged = plain.merge(unterminated);
        assert!(matches!(
            merged.kind,
            SyntaxErrorKind::UnterminatedBlock { .. }
        ));
        assert_eq!(merged.expected, vec!["'('", "'{% endfor %}'"]);
    }

    #[test]
    fn test_display_with_source_name() {
        let location = SourceLocation::new("{% for x in xs %}\n{{ x }}");
        let error = SyntaxError::unterminated(BlockKind::ForIn, 0..17, 25..25)
            .into_parse_error(&location, Some("list.tpl"));

        assert_eq!(
            error.to_string(),
            "list.tpl:2:8: unterminated 'for' block opened at 1:1: expected '{% endfor %}' before end of input"
        );
    }

    #[test]
    fn test_display_unexpected_token() {
        let location = SourceLocation::new("{{ + }}");
        let error = SyntaxError::unexpected(
            3..4,
            &["an identifier", "a string literal", "an integer"],
            Some(Token::Symbol("+".to_string())),
        )
        .into_parse_error(&location, None);

        assert_eq!(
            error.to_string(),
            "1:4: expected an identifier, a string literal or an integer, found '+'"
        );
    }
}
