//! AST definitions and utilities for templaty
//!
//! ## Modules
//!
//! - `node` - Pattern, expression and statement node types
//! - `span` - Position and Span types for source code locations
//! - `position` - Converts byte offsets into line/column positions

pub mod node;
pub mod position;
pub mod span;

pub use node::{
    AstNode, EmbeddedExpression, EmbeddedStatement, Expression, ExpressionStatement,
    ForInStatement, JoinStatement, Literal, Pattern, Statement, TemplateStatement, TextStatement,
};
pub use position::SourceLocation;
pub use span::{Position, Span};
