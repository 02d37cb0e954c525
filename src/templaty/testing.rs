//! Testing utilities for tree assertions
//!
//! Parser tests check the whole shape of a parsed template: which statement
//! kinds appear, in which order, and what each one carries. Writing that with
//! nested `match` blocks buries the intent, so tests go through the fluent
//! [assert_tree](fn@assert_tree) API instead:
//!
//! ```rust,ignore
//! use templaty::templaty::parser::parse;
//! use templaty::templaty::testing::assert_tree;
//!
//! let tree = parse("{% for x in xs %}- {{ x }}\n{% endfor %}").unwrap();
//!
//! assert_tree(&tree)
//!     .statement_count(1)
//!     .statement(0, |s| {
//!         s.assert_for_in()
//!             .binder("x")
//!             .iterable("xs")
//!             .body_count(3)
//!             .body(0, |b| {
//!                 b.assert_text().text("- ");
//!             })
//!             .body(1, |b| {
//!                 b.assert_expression().reference("x");
//!             });
//!     });
//! ```
//!
//! Failures name the path to the offending node:
//!
//! ```text
//! statements[0]:body[1]: Expected ExpressionStatement, found TextStatement "- "
//! ```
//!
//! Count mismatches list what was actually there:
//!
//! ```text
//! statements[0]: Expected 2 body statements, found 3: [TextStatement, ExpressionStatement, TextStatement]
//! ```

mod testing_assertions;
mod testing_matchers;

pub use testing_assertions::{
    assert_tree, BlockAssertion, ExpressionAssertion, StatementAssertion, TextAssertion,
    TreeAssertion,
};
pub use testing_matchers::TextMatch;
