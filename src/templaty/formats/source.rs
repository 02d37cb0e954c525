//! Re-serialisation to directive syntax
//!
//! Writing a parsed standalone tree back out and parsing the result again
//! gives an equal tree. Directive interiors are normalised to single spaces;
//! raw text is written verbatim.
//!
//! Embedded trees are written through the host's own [ToSource] impls, so the
//! round trip holds there as long as the host writes its nodes in a form its
//! parser accepts.

use crate::templaty::ast::{
    EmbeddedExpression, EmbeddedStatement, Expression, ExpressionStatement, ForInStatement,
    JoinStatement, Literal, Pattern, Statement, TemplateStatement, TextStatement,
};

/// Trait for writing a node back to source text
pub trait ToSource {
    fn write_source(&self, out: &mut String);

    fn to_source_string(&self) -> String {
        let mut out = String::new();
        self.write_source(&mut out);
        out
    }
}

/// Write a statement sequence back to source text
pub fn to_source<S: ToSource>(statements: &[S]) -> String {
    let mut out = String::new();
    write_body(statements, &mut out);
    out
}

fn write_body<S: ToSource>(body: &[S], out: &mut String) {
    for statement in body {
        statement.write_source(out);
    }
}

impl<T: ToSource + ?Sized> ToSource for Box<T> {
    fn write_source(&self, out: &mut String) {
        (**self).write_source(out)
    }
}

impl ToSource for Pattern {
    fn write_source(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }
}

impl ToSource for Literal {
    fn write_source(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }
}

impl ToSource for Expression {
    fn write_source(&self, out: &mut String) {
        match self {
            Expression::Reference(name) => out.push_str(name),
            Expression::Literal(literal) => literal.write_source(out),
        }
    }
}

impl ToSource for TextStatement {
    fn write_source(&self, out: &mut String) {
        out.push_str(&self.text);
    }
}

impl<E: ToSource> ToSource for ExpressionStatement<E> {
    fn write_source(&self, out: &mut String) {
        out.push_str("{{ ");
        self.expression.write_source(out);
        out.push_str(" }}");
    }
}

impl<E: ToSource, S: ToSource> ToSource for ForInStatement<E, S> {
    fn write_source(&self, out: &mut String) {
        out.push_str("{% for ");
        self.binder.write_source(out);
        out.push_str(" in ");
        self.iterable.write_source(out);
        out.push_str(" %}");
        write_body(&self.body, out);
        out.push_str("{% endfor %}");
    }
}

impl<E: ToSource, S: ToSource> ToSource for JoinStatement<E, S> {
    fn write_source(&self, out: &mut String) {
        out.push_str("{% join ");
        self.binder.write_source(out);
        out.push_str(" in ");
        self.iterable.write_source(out);
        out.push_str(" with ");
        self.separator.write_source(out);
        out.push_str(" %}");
        write_body(&self.body, out);
        out.push_str("{% endjoin %}");
    }
}

impl ToSource for Statement {
    fn write_source(&self, out: &mut String) {
        match self {
            Statement::Text(s) => s.write_source(out),
            Statement::Expression(s) => s.write_source(out),
            Statement::ForIn(s) => s.write_source(out),
            Statement::Join(s) => s.write_source(out),
        }
    }
}

impl<E: ToSource, S: ToSource> ToSource for TemplateStatement<E, S> {
    fn write_source(&self, out: &mut String) {
        match self {
            TemplateStatement::Expression(s) => s.write_source(out),
            TemplateStatement::ForIn(s) => s.write_source(out),
            TemplateStatement::Join(s) => s.write_source(out),
        }
    }
}

impl<H: ToSource> ToSource for EmbeddedExpression<H> {
    fn write_source(&self, out: &mut String) {
        match self {
            EmbeddedExpression::Host(host) => host.write_source(out),
            EmbeddedExpression::Interpolation(interpolation) => interpolation.write_source(out),
        }
    }
}

impl<HE: ToSource, HS: ToSource> ToSource for EmbeddedStatement<HE, HS> {
    fn write_source(&self, out: &mut String) {
        match self {
            EmbeddedStatement::Host(host) => host.write_source(out),
            EmbeddedStatement::Template(template) => template.write_source(out),
        }
    }
}
