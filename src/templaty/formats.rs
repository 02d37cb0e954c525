//! Output formats for parsed templates
//!
//! - `source` - Writes a tree back out as directive syntax
//! - `treeviz` - Box-drawing tree view of any [AstNode](crate::templaty::ast::AstNode) slice
//! - `json` - serde_json rendering of trees and token streams

pub mod json;
pub mod source;
pub mod treeviz;

pub use json::to_json;
pub use source::{to_source, ToSource};
pub use treeviz::{to_treeviz_str, to_treeviz_str_with};
