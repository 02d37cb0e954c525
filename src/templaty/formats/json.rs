//! JSON rendering through serde_json

use serde::Serialize;

/// Serialise any tree or token stream, pretty-printed or compact
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templaty::ast::{Expression, Pattern, Statement};

    #[test]
    fn test_statement_shape() {
        let tree = vec![
            Statement::text("Hi "),
            Statement::for_in(
                Pattern::tuple([Pattern::var("k"), Pattern::var("v")]),
                Expression::reference("m"),
                vec![Statement::expression(Expression::integer("1"))],
            ),
        ];
        assert_eq!(
            to_json(&tree, false).unwrap(),
            concat!(
                r#"[{"text":{"text":"Hi "}},"#,
                r#"{"for_in":{"binder":{"tuple":[{"var":"k"},{"var":"v"}]},"#,
                r#""iterable":{"reference":"m"},"#,
                r#""body":[{"expression":{"expression":{"literal":{"integer":"1"}}}}]}}]"#
            )
        );
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let json = to_json(&Expression::string("x"), true).unwrap();
        assert!(json.contains('\n'));
    }
}
