//! Token definitions for templaty
//!
//! The two logos enums ([TextToken], [CodeToken]) are the per-mode lexers; the
//! parser only ever sees the unified [Token], which is what both of them
//! convert into.
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// Tokens recognised in text mode
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum TextToken {
    #[token("{{")]
    OpenExpression,
    #[token("{%")]
    OpenStatement,

    // A run of non-brace characters, or a lone brace that does not open a
    // directive. The callback extends the match to the whole run.
    #[regex(r"[^{]+|\{", text_run)]
    Text(String),
}

/// Extend a text match up to (not including) the next `{{` or `{%`
fn text_run(lex: &mut logos::Lexer<TextToken>) -> String {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let mut end = 0;

    while let Some(offset) = rest[end..].find('{') {
        let brace = end + offset;
        if matches!(bytes.get(brace + 1), Some(b'{') | Some(b'%')) {
            lex.bump(brace);
            return lex.slice().to_owned();
        }
        end = brace + 1;
    }

    lex.bump(rest.len());
    lex.slice().to_owned()
}

fn quoted_contents(lex: &mut logos::Lexer<CodeToken>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_owned()
}

/// Tokens recognised in code mode (directive interiors and host code)
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"\s+")]
pub enum CodeToken {
    #[token("{{")]
    OpenExpression,
    #[token("}}")]
    CloseExpression,
    #[token("{%")]
    OpenStatement,
    #[token("%}")]
    CloseStatement,

    // Keywords
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("with")]
    With,
    #[token("join")]
    Join,
    #[token("endfor")]
    EndFor,
    #[token("endjoin")]
    EndJoin,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_owned())]
    Identifier(String),
    // No escapes: a quote ends the string
    #[regex(r#""[^"]*""#, quoted_contents)]
    #[regex(r"'[^']*'", quoted_contents)]
    String(String),
    #[regex(r"[0-9]+", |lex| lex.slice().to_owned())]
    Integer(String),

    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token(",")]
    Comma,

    // Anything else a host grammar may want; never valid inside a standalone directive
    #[regex(r"[-+*/%=<>!&|^~@.:;\[\]{}]", |lex| lex.slice().to_owned())]
    Symbol(String),
}

/// A directive keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Keyword {
    For,
    In,
    With,
    Join,
    EndFor,
    EndJoin,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::For => "for",
            Keyword::In => "in",
            Keyword::With => "with",
            Keyword::Join => "join",
            Keyword::EndFor => "endfor",
            Keyword::EndJoin => "endjoin",
        }
    }

    /// Check if this keyword closes a block
    pub fn is_end(&self) -> bool {
        matches!(self, Keyword::EndFor | Keyword::EndJoin)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified lexical unit, as seen by the parser
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Token {
    /// A maximal run of raw text (text mode only)
    Text(String),
    OpenExpression,
    CloseExpression,
    OpenStatement,
    CloseStatement,
    Keyword(Keyword),
    Identifier(String),
    /// String contents, quotes removed
    String(String),
    Integer(String),
    OpenParen,
    CloseParen,
    Comma,
    Symbol(String),
    /// Input no lexer rule accepts
    Invalid(String),
}

impl Token {
    /// Check if this token opens a directive
    pub fn opens_directive(&self) -> bool {
        matches!(self, Token::OpenExpression | Token::OpenStatement)
    }

    /// Check if this token closes a directive
    pub fn closes_directive(&self) -> bool {
        matches!(self, Token::CloseExpression | Token::CloseStatement)
    }

    /// Check if this token is raw text
    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text(_))
    }

    /// A description of the token's class, used for "expected ..." lists
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Text(_) => "some text",
            Token::OpenExpression => "'{{'",
            Token::CloseExpression => "'}}'",
            Token::OpenStatement => "'{%'",
            Token::CloseStatement => "'%}'",
            Token::Keyword(Keyword::For) => "'for'",
            Token::Keyword(Keyword::In) => "'in'",
            Token::Keyword(Keyword::With) => "'with'",
            Token::Keyword(Keyword::Join) => "'join'",
            Token::Keyword(Keyword::EndFor) => "'endfor'",
            Token::Keyword(Keyword::EndJoin) => "'endjoin'",
            Token::Identifier(_) => "an identifier",
            Token::String(_) => "a string literal",
            Token::Integer(_) => "an integer",
            Token::OpenParen => "'('",
            Token::CloseParen => "')'",
            Token::Comma => "','",
            Token::Symbol(_) => "a symbol",
            Token::Invalid(_) => "invalid input",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(text) => write!(f, "text {:?}", text),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::String(value) => write!(f, "string {:?}", value),
            Token::Integer(digits) => write!(f, "integer {}", digits),
            Token::Symbol(symbol) => write!(f, "'{}'", symbol),
            Token::Invalid(text) => write!(f, "invalid input {:?}", text),
            other => write!(f, "{}", other.kind_name()),
        }
    }
}

impl From<TextToken> for Token {
    fn from(token: TextToken) -> Self {
        match token {
            TextToken::OpenExpression => Token::OpenExpression,
            TextToken::OpenStatement => Token::OpenStatement,
            TextToken::Text(text) => Token::Text(text),
        }
    }
}

impl From<CodeToken> for Token {
    fn from(token: CodeToken) -> Self {
        match token {
            CodeToken::OpenExpression => Token::OpenExpression,
            CodeToken::CloseExpression => Token::CloseExpression,
            CodeToken::OpenStatement => Token::OpenStatement,
            CodeToken::CloseStatement => Token::CloseStatement,
            CodeToken::For => Token::Keyword(Keyword::For),
            CodeToken::In => Token::Keyword(Keyword::In),
            CodeToken::With => Token::Keyword(Keyword::With),
            CodeToken::Join => Token::Keyword(Keyword::Join),
            CodeToken::EndFor => Token::Keyword(Keyword::EndFor),
            CodeToken::EndJoin => Token::Keyword(Keyword::EndJoin),
            CodeToken::Identifier(name) => Token::Identifier(name),
            CodeToken::String(value) => Token::String(value),
            CodeToken::Integer(digits) => Token::Integer(digits),
            CodeToken::OpenParen => Token::OpenParen,
            CodeToken::CloseParen => Token::CloseParen,
            CodeToken::Comma => Token::Comma,
            CodeToken::Symbol(symbol) => Token::Symbol(symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_run_is_maximal() {
        let mut lexer = TextToken::lexer("a { b } c");
        assert_eq!(lexer.next(), Some(Ok(TextToken::Text("a { b } c".to_string()))));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_text_stops_before_openers() {
        let mut lexer = TextToken::lexer("a{{");
        assert_eq!(lexer.next(), Some(Ok(TextToken::Text("a".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(TextToken::OpenExpression)));
        assert_eq!(lexer.next(), None);

        let mut lexer = TextToken::lexer("{x{%");
        assert_eq!(lexer.next(), Some(Ok(TextToken::Text("{x".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(TextToken::OpenStatement)));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_lone_trailing_brace_is_text() {
        let mut lexer = TextToken::lexer("{");
        assert_eq!(lexer.next(), Some(Ok(TextToken::Text("{".to_string()))));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let mut lexer = CodeToken::lexer("for forx in_ endjoin");
        assert_eq!(lexer.next(), Some(Ok(CodeToken::For)));
        assert_eq!(lexer.next(), Some(Ok(CodeToken::Identifier("forx".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(CodeToken::Identifier("in_".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(CodeToken::EndJoin)));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_literals() {
        let mut lexer = CodeToken::lexer(r#"", " 'a"b' 0042"#);
        assert_eq!(lexer.next(), Some(Ok(CodeToken::String(", ".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(CodeToken::String("a\"b".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(CodeToken::Integer("0042".to_string()))));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_closers_win_over_symbols() {
        let mut lexer = CodeToken::lexer("%} }} % }");
        assert_eq!(lexer.next(), Some(Ok(CodeToken::CloseStatement)));
        assert_eq!(lexer.next(), Some(Ok(CodeToken::CloseExpression)));
        assert_eq!(lexer.next(), Some(Ok(CodeToken::Symbol("%".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(CodeToken::Symbol("}".to_string()))));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let mut lexer = CodeToken::lexer("\"abc");
        assert_eq!(lexer.next(), Some(Err(())));
    }

    #[test]
    fn test_token_predicates() {
        assert!(Token::OpenExpression.opens_directive());
        assert!(Token::OpenStatement.opens_directive());
        assert!(!Token::CloseStatement.opens_directive());

        assert!(Token::CloseExpression.closes_directive());
        assert!(!Token::Comma.closes_directive());

        assert!(Token::Text("x".to_string()).is_text());
        assert!(!Token::Identifier("x".to_string()).is_text());

        assert!(Keyword::EndFor.is_end());
        assert!(!Keyword::With.is_end());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::Keyword(Keyword::EndJoin).to_string(), "'endjoin'");
        assert_eq!(Token::Identifier("xs".to_string()).to_string(), "identifier 'xs'");
        assert_eq!(Token::Identifier(String::new()).kind_name(), "an identifier");
    }
}
