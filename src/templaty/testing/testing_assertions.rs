//! Fluent assertion API for standalone trees

use super::testing_matchers::TextMatch;
use crate::templaty::ast::{AstNode, Expression, Pattern, Statement};

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for a parsed template
pub fn assert_tree(statements: &[Statement]) -> TreeAssertion<'_> {
    TreeAssertion { statements }
}

// ============================================================================
// Tree Assertions
// ============================================================================

pub struct TreeAssertion<'a> {
    statements: &'a [Statement],
}

impl<'a> TreeAssertion<'a> {
    /// Assert the number of top-level statements
    pub fn statement_count(self, expected: usize) -> Self {
        let actual = self.statements.len();
        assert_eq!(
            actual,
            expected,
            "Expected {} statements, found {}: [{}]",
            expected,
            actual,
            summarize(self.statements)
        );
        self
    }

    /// Assert on a specific top-level statement by index
    pub fn statement<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(StatementAssertion<'a>),
    {
        assert!(
            index < self.statements.len(),
            "Statement index {} out of bounds (template has {} statements)",
            index,
            self.statements.len()
        );

        assertion(StatementAssertion {
            statement: &self.statements[index],
            context: format!("statements[{}]", index),
        });
        self
    }

    /// Assert the concatenated raw text of the top-level text statements
    pub fn text(self, expected: &str) -> Self {
        let actual: String = self
            .statements
            .iter()
            .filter_map(|s| match s {
                Statement::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        TextMatch::Exact(expected.to_string()).assert(&actual, "statements");
        self
    }
}

// ============================================================================
// Statement Assertions
// ============================================================================

pub struct StatementAssertion<'a> {
    statement: &'a Statement,
    context: String,
}

impl<'a> StatementAssertion<'a> {
    fn mismatch(&self, expected: &str) -> ! {
        panic!(
            "{}: Expected {}, found {} {}",
            self.context,
            expected,
            self.statement.node_type(),
            self.statement.display_label()
        )
    }

    /// Assert this statement is raw text
    pub fn assert_text(self) -> TextAssertion<'a> {
        match self.statement {
            Statement::Text(t) => TextAssertion {
                text: &t.text,
                context: self.context,
            },
            _ => self.mismatch("TextStatement"),
        }
    }

    /// Assert this statement is a `{{ }}` interpolation
    pub fn assert_expression(self) -> ExpressionAssertion<'a> {
        match self.statement {
            Statement::Expression(e) => ExpressionAssertion {
                expression: &e.expression,
                context: self.context,
            },
            _ => self.mismatch("ExpressionStatement"),
        }
    }

    /// Assert this statement is a `for` block
    pub fn assert_for_in(self) -> BlockAssertion<'a> {
        match self.statement {
            Statement::ForIn(f) => BlockAssertion {
                binder: &f.binder,
                iterable: &f.iterable,
                separator: None,
                body: &f.body,
                context: self.context,
            },
            _ => self.mismatch("ForInStatement"),
        }
    }

    /// Assert this statement is a `join` block
    pub fn assert_join(self) -> BlockAssertion<'a> {
        match self.statement {
            Statement::Join(j) => BlockAssertion {
                binder: &j.binder,
                iterable: &j.iterable,
                separator: Some(&j.separator),
                body: &j.body,
                context: self.context,
            },
            _ => self.mismatch("JoinStatement"),
        }
    }

    /// Check if this statement is raw text (non-panicking)
    pub fn is_text(&self) -> bool {
        matches!(self.statement, Statement::Text(_))
    }

    /// Check if this statement is a block (non-panicking)
    pub fn is_block(&self) -> bool {
        matches!(self.statement, Statement::ForIn(_) | Statement::Join(_))
    }
}

// ============================================================================
// Text Assertions
// ============================================================================

pub struct TextAssertion<'a> {
    text: &'a str,
    context: String,
}

impl TextAssertion<'_> {
    /// Assert exact text match
    pub fn text(self, expected: &str) -> Self {
        TextMatch::Exact(expected.to_string()).assert(self.text, &self.context);
        self
    }

    /// Assert text starts with prefix
    pub fn text_starts_with(self, prefix: &str) -> Self {
        TextMatch::StartsWith(prefix.to_string()).assert(self.text, &self.context);
        self
    }

    /// Assert text contains substring
    pub fn text_contains(self, substring: &str) -> Self {
        TextMatch::Contains(substring.to_string()).assert(self.text, &self.context);
        self
    }
}

// ============================================================================
// Expression Assertions
// ============================================================================

pub struct ExpressionAssertion<'a> {
    expression: &'a Expression,
    context: String,
}

impl ExpressionAssertion<'_> {
    fn assert_is(self, expected: Expression) -> Self {
        assert_eq!(
            self.expression, &expected,
            "{}: Expected expression {}, but got {}",
            self.context, expected, self.expression
        );
        self
    }

    /// Assert the expression is a reference to `name`
    pub fn reference(self, name: &str) -> Self {
        self.assert_is(Expression::reference(name))
    }

    /// Assert the expression is a string literal with these contents
    pub fn string(self, value: &str) -> Self {
        self.assert_is(Expression::string(value))
    }

    /// Assert the expression is an integer literal with these digits
    pub fn integer(self, digits: &str) -> Self {
        self.assert_is(Expression::integer(digits))
    }

    /// Check if the expression is a literal (non-panicking)
    pub fn is_literal(&self) -> bool {
        matches!(self.expression, Expression::Literal(_))
    }
}

// ============================================================================
// Block Assertions (for and join)
// ============================================================================

pub struct BlockAssertion<'a> {
    binder: &'a Pattern,
    iterable: &'a Expression,
    separator: Option<&'a Expression>,
    body: &'a [Statement],
    context: String,
}

impl<'a> BlockAssertion<'a> {
    /// Assert the binder, written as in the source: `x` or `(k, (a, b))`
    pub fn binder(self, expected: &str) -> Self {
        let actual = self.binder.to_string();
        assert_eq!(
            actual, expected,
            "{}: Expected binder '{}', but got '{}'",
            self.context, expected, actual
        );
        self
    }

    /// Assert the binder structurally
    pub fn binder_is(self, expected: &Pattern) -> Self {
        assert_eq!(
            self.binder, expected,
            "{}: Expected binder {}, but got {}",
            self.context, expected, self.binder
        );
        self
    }

    /// Assert the iterable, written as in the source
    pub fn iterable(self, expected: &str) -> Self {
        let actual = self.iterable.to_string();
        assert_eq!(
            actual, expected,
            "{}: Expected iterable '{}', but got '{}'",
            self.context, expected, actual
        );
        self
    }

    /// Assert the separator of a join block
    pub fn separator(self, expected: &Expression) -> Self {
        match self.separator {
            Some(actual) => assert_eq!(
                actual, expected,
                "{}: Expected separator {}, but got {}",
                self.context, expected, actual
            ),
            None => panic!(
                "{}: Expected a join block with separator {}, found a for block",
                self.context, expected
            ),
        }
        self
    }

    /// Assert the number of body statements
    pub fn body_count(self, expected: usize) -> Self {
        let actual = self.body.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} body statements, found {}: [{}]",
            self.context,
            expected,
            actual,
            summarize(self.body)
        );
        self
    }

    /// Assert on a specific body statement by index
    pub fn body<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(StatementAssertion<'a>),
    {
        assert!(
            index < self.body.len(),
            "{}: Body index {} out of bounds (block has {} statements)",
            self.context,
            index,
            self.body.len()
        );

        assertion(StatementAssertion {
            statement: &self.body[index],
            context: format!("{}:body[{}]", self.context, index),
        });
        self
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Summarize statements as "TextStatement, ForInStatement"
fn summarize(statements: &[Statement]) -> String {
    statements
        .iter()
        .map(|s| s.node_type())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Statement> {
        vec![
            Statement::text("Items: "),
            Statement::join(
                Pattern::var("x"),
                Expression::reference("items"),
                Expression::string(", "),
                vec![Statement::expression(Expression::reference("x"))],
            ),
        ]
    }

    #[test]
    fn test_statement_count() {
        assert_tree(&sample()).statement_count(2);
    }

    #[test]
    fn test_nested_block_assertions() {
        assert_tree(&sample())
            .statement(0, |s| {
                s.assert_text().text("Items: ").text_starts_with("Item");
            })
            .statement(1, |s| {
                s.assert_join()
                    .binder("x")
                    .iterable("items")
                    .separator(&Expression::string(", "))
                    .body_count(1)
                    .body(0, |b| {
                        b.assert_expression().reference("x");
                    });
            });
    }

    #[test]
    #[should_panic(expected = "statements[0]: Expected ForInStatement, found TextStatement")]
    fn test_kind_mismatch_names_the_path() {
        assert_tree(&sample()).statement(0, |s| {
            s.assert_for_in();
        });
    }

    #[test]
    #[should_panic(expected = "Expected 3 statements, found 2: [TextStatement, JoinStatement]")]
    fn test_count_mismatch_summarizes() {
        assert_tree(&sample()).statement_count(3);
    }

    #[test]
    #[should_panic(expected = "found a for block")]
    fn test_separator_on_for_block() {
        let tree = vec![Statement::for_in(
            Pattern::var("x"),
            Expression::reference("xs"),
            vec![],
        )];
        assert_tree(&tree).statement(0, |s| {
            s.assert_for_in().separator(&Expression::string(","));
        });
    }
}
