//! AST node type definitions and trait implementations
//!
//! The tree handed to a renderer is an ordered `Vec` of statements. Block
//! statements own their bodies exclusively, so the result is a plain tree with
//! no sharing and no cycles. Nodes own their strings and do not borrow the
//! source buffer.
//!
//! Standalone trees use [Statement] and [Expression]. Embedded trees use the
//! same block structs, instantiated over [EmbeddedExpression] and
//! [EmbeddedStatement], so both modes share one definition of what a `for` or
//! `join` block is.

use serde::Serialize;
use std::fmt;

// ============================================================================
// AST Traits
// ============================================================================

/// Common interface for all AST nodes
pub trait AstNode {
    fn node_type(&self) -> &'static str;
    fn display_label(&self) -> String;

    /// Child nodes in source order. Leaves have none.
    fn children(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }
}

// ============================================================================
// Patterns
// ============================================================================

/// A loop binder: a single name or a (possibly nested) tuple of binders.
///
/// Tuple elements are positional; `()` is accepted by the grammar and left for
/// a later binding check to reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Var(String),
    Tuple(Vec<Pattern>),
}

impl Pattern {
    pub fn var(name: impl Into<String>) -> Self {
        Pattern::Var(name.into())
    }

    pub fn tuple(elements: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern::Tuple(elements.into_iter().collect())
    }

    /// Names bound by this pattern, left to right
    pub fn bound_names(&self) -> Vec<&str> {
        match self {
            Pattern::Var(name) => vec![name.as_str()],
            Pattern::Tuple(elements) => elements.iter().flat_map(|p| p.bound_names()).collect(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Var(name) => write!(f, "{}", name),
            Pattern::Tuple(elements) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl AstNode for Pattern {
    fn node_type(&self) -> &'static str {
        match self {
            Pattern::Var(_) => "VarPattern",
            Pattern::Tuple(_) => "TuplePattern",
        }
    }

    fn display_label(&self) -> String {
        self.to_string()
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        match self {
            Pattern::Var(_) => Vec::new(),
            Pattern::Tuple(elements) => elements.iter().map(|p| p as &dyn AstNode).collect(),
        }
    }
}

// ============================================================================
// Expressions (standalone mode)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    /// String contents without the quotes. No escape processing is done.
    String(String),
    /// Decimal digits as written.
    Integer(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Strings cannot contain both quote kinds, so one of them always fits
            Literal::String(value) if value.contains('"') => write!(f, "'{}'", value),
            Literal::String(value) => write!(f, "\"{}\"", value),
            Literal::Integer(digits) => write!(f, "{}", digits),
        }
    }
}

/// The minimal expression language of standalone mode
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Reference(String),
    Literal(Literal),
}

impl Expression {
    pub fn reference(name: impl Into<String>) -> Self {
        Expression::Reference(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::Literal(Literal::String(value.into()))
    }

    pub fn integer(digits: impl Into<String>) -> Self {
        Expression::Literal(Literal::Integer(digits.into()))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Reference(name) => write!(f, "{}", name),
            Expression::Literal(literal) => write!(f, "{}", literal),
        }
    }
}

impl AstNode for Expression {
    fn node_type(&self) -> &'static str {
        match self {
            Expression::Reference(_) => "ReferenceExpr",
            Expression::Literal(_) => "LiteralExpr",
        }
    }

    fn display_label(&self) -> String {
        self.to_string()
    }
}

// ============================================================================
// Statements
// ============================================================================

/// A run of raw text (standalone mode only)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TextStatement {
    pub text: String,
}

/// `{{ expression }}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExpressionStatement<E = Expression> {
    pub expression: E,
}

/// `{% for binder in iterable %} body {% endfor %}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ForInStatement<E = Expression, S = Statement> {
    pub binder: Pattern,
    pub iterable: E,
    pub body: Vec<S>,
}

/// `{% join binder in iterable with separator %} body {% endjoin %}`
///
/// Renders like a for-in block with the separator's value placed between
/// consecutive iterations (never before the first or after the last).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct JoinStatement<E = Expression, S = Statement> {
    pub binder: Pattern,
    pub iterable: E,
    pub separator: E,
    pub body: Vec<S>,
}

/// A statement of a standalone template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    Text(TextStatement),
    Expression(ExpressionStatement),
    ForIn(ForInStatement),
    Join(JoinStatement),
}

impl Statement {
    pub fn text(text: impl Into<String>) -> Self {
        Statement::Text(TextStatement { text: text.into() })
    }

    pub fn expression(expression: Expression) -> Self {
        Statement::Expression(ExpressionStatement { expression })
    }

    pub fn for_in(binder: Pattern, iterable: Expression, body: Vec<Statement>) -> Self {
        Statement::ForIn(ForInStatement {
            binder,
            iterable,
            body,
        })
    }

    pub fn join(
        binder: Pattern,
        iterable: Expression,
        separator: Expression,
        body: Vec<Statement>,
    ) -> Self {
        Statement::Join(JoinStatement {
            binder,
            iterable,
            separator,
            body,
        })
    }
}

/// The directive statements, without raw text. This is what a splice point
/// adds next to the host's own statements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateStatement<E, S> {
    Expression(ExpressionStatement<E>),
    ForIn(ForInStatement<E, S>),
    Join(JoinStatement<E, S>),
}

impl From<TemplateStatement<Expression, Statement>> for Statement {
    fn from(statement: TemplateStatement<Expression, Statement>) -> Self {
        match statement {
            TemplateStatement::Expression(s) => Statement::Expression(s),
            TemplateStatement::ForIn(s) => Statement::ForIn(s),
            TemplateStatement::Join(s) => Statement::Join(s),
        }
    }
}

// ============================================================================
// Embedded mode
// ============================================================================

/// The host's expression nonterminal after splicing: the host's own
/// expression, or a `{{ }}` interpolation whose inner expression is again a
/// spliced expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddedExpression<H> {
    Host(H),
    Interpolation(Box<ExpressionStatement<EmbeddedExpression<H>>>),
}

/// The host's statement nonterminal after splicing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddedStatement<HE, HS> {
    Host(HS),
    Template(TemplateStatement<EmbeddedExpression<HE>, EmbeddedStatement<HE, HS>>),
}

// ============================================================================
// AstNode implementations
// ============================================================================

fn for_in_label<E: AstNode>(binder: &Pattern, iterable: &E) -> String {
    format!("{} in {}", binder, iterable.display_label())
}

fn join_label<E: AstNode>(binder: &Pattern, iterable: &E, separator: &E) -> String {
    format!(
        "{} in {} with {}",
        binder,
        iterable.display_label(),
        separator.display_label()
    )
}

fn body_children<S: AstNode>(body: &[S]) -> Vec<&dyn AstNode> {
    body.iter().map(|s| s as &dyn AstNode).collect()
}

impl AstNode for Statement {
    fn node_type(&self) -> &'static str {
        match self {
            Statement::Text(_) => "TextStatement",
            Statement::Expression(_) => "ExpressionStatement",
            Statement::ForIn(_) => "ForInStatement",
            Statement::Join(_) => "JoinStatement",
        }
    }

    fn display_label(&self) -> String {
        match self {
            Statement::Text(t) => format!("{:?}", t.text),
            Statement::Expression(e) => e.expression.display_label(),
            Statement::ForIn(f) => for_in_label(&f.binder, &f.iterable),
            Statement::Join(j) => join_label(&j.binder, &j.iterable, &j.separator),
        }
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        match self {
            Statement::Text(_) | Statement::Expression(_) => Vec::new(),
            Statement::ForIn(f) => body_children(&f.body),
            Statement::Join(j) => body_children(&j.body),
        }
    }
}

impl<E: AstNode, S: AstNode> AstNode for TemplateStatement<E, S> {
    fn node_type(&self) -> &'static str {
        match self {
            TemplateStatement::Expression(_) => "ExpressionStatement",
            TemplateStatement::ForIn(_) => "ForInStatement",
            TemplateStatement::Join(_) => "JoinStatement",
        }
    }

    fn display_label(&self) -> String {
        match self {
            TemplateStatement::Expression(e) => e.expression.display_label(),
            TemplateStatement::ForIn(f) => for_in_label(&f.binder, &f.iterable),
            TemplateStatement::Join(j) => join_label(&j.binder, &j.iterable, &j.separator),
        }
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        match self {
            TemplateStatement::Expression(_) => Vec::new(),
            TemplateStatement::ForIn(f) => body_children(&f.body),
            TemplateStatement::Join(j) => body_children(&j.body),
        }
    }
}

impl<H: AstNode> AstNode for EmbeddedExpression<H> {
    fn node_type(&self) -> &'static str {
        match self {
            EmbeddedExpression::Host(h) => h.node_type(),
            EmbeddedExpression::Interpolation(_) => "Interpolation",
        }
    }

    fn display_label(&self) -> String {
        match self {
            EmbeddedExpression::Host(h) => h.display_label(),
            EmbeddedExpression::Interpolation(i) => {
                format!("{{{{ {} }}}}", i.expression.display_label())
            }
        }
    }
}

impl<HE: AstNode, HS: AstNode> AstNode for EmbeddedStatement<HE, HS> {
    fn node_type(&self) -> &'static str {
        match self {
            EmbeddedStatement::Host(h) => h.node_type(),
            EmbeddedStatement::Template(t) => t.node_type(),
        }
    }

    fn display_label(&self) -> String {
        match self {
            EmbeddedStatement::Host(h) => h.display_label(),
            EmbeddedStatement::Template(t) => t.display_label(),
        }
    }

    fn children(&self) -> Vec<&dyn AstNode> {
        match self {
            EmbeddedStatement::Host(h) => h.children(),
            EmbeddedStatement::Template(t) => t.children(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_display() {
        let pattern = Pattern::tuple([
            Pattern::var("a"),
            Pattern::tuple([Pattern::var("b"), Pattern::var("c")]),
        ]);
        assert_eq!(pattern.to_string(), "(a, (b, c))");
        assert_eq!(Pattern::tuple([]).to_string(), "()");
    }

    #[test]
    fn test_bound_names_in_order() {
        let pattern = Pattern::tuple([
            Pattern::var("key"),
            Pattern::tuple([Pattern::var("first"), Pattern::var("second")]),
        ]);
        assert_eq!(pattern.bound_names(), vec!["key", "first", "second"]);
    }

    #[test]
    fn test_string_literal_picks_free_quote() {
        assert_eq!(Expression::string("a, b").to_string(), "\"a, b\"");
        assert_eq!(Expression::string("say \"hi\"").to_string(), "'say \"hi\"'");
        assert_eq!(Expression::integer("042").to_string(), "042");
    }

    #[test]
    fn test_block_children_follow_body_order() {
        let stmt = Statement::for_in(
            Pattern::var("x"),
            Expression::reference("xs"),
            vec![
                Statement::text("- "),
                Statement::expression(Expression::reference("x")),
            ],
        );

        assert_eq!(stmt.node_type(), "ForInStatement");
        assert_eq!(stmt.display_label(), "x in xs");
        let children: Vec<_> = stmt.children().iter().map(|c| c.node_type()).collect();
        assert_eq!(children, vec!["TextStatement", "ExpressionStatement"]);
    }

    #[test]
    fn test_template_statement_converts_to_standalone() {
        let template: TemplateStatement<Expression, Statement> =
            TemplateStatement::Join(JoinStatement {
                binder: Pattern::var("x"),
                iterable: Expression::reference("xs"),
                separator: Expression::string(", "),
                body: vec![],
            });

        let stmt: Statement = template.into();
        assert_eq!(stmt.display_label(), "x in xs with \", \"");
    }
}
