//! # templaty
//!
//! A parser for the templaty directive language: raw text, `{{ expression }}`
//! interpolation, and `{% for %}` / `{% join %}` blocks. The grammar runs either
//! standalone, over its own minimal expression language, or spliced into a host
//! grammar so directives and host code share one source text.
//!
//! ## Testing
//!
//! Tree assertions go through the [testing module](templaty::testing), which
//! mirrors the shape of the parse tree.

pub mod templaty;
