//! Treeviz formatter for AST nodes

use crate::templaty::ast::AstNode;

/// Label width used when no configuration is given
pub const DEFAULT_LABEL_WIDTH: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// Render a statement sequence as a box-drawing tree
pub fn to_treeviz_str<N: AstNode>(nodes: &[N]) -> String {
    to_treeviz_str_with(nodes, DEFAULT_LABEL_WIDTH)
}

/// Render a statement sequence, truncating labels to `max_label` characters
pub fn to_treeviz_str_with<N: AstNode>(nodes: &[N], max_label: usize) -> String {
    let roots: Vec<&dyn AstNode> = nodes.iter().map(|n| n as &dyn AstNode).collect();
    let mut result = String::new();
    append_children(&mut result, &roots, "", max_label);
    result
}

fn append_node(result: &mut String, node: &dyn AstNode, prefix: &str, is_last: bool, max: usize) {
    let connector = if is_last { "└─" } else { "├─" };
    let display_label = truncate(&node.display_label(), max);

    result.push_str(&format!(
        "{}{} {}: {}\n",
        prefix,
        connector,
        node.node_type(),
        display_label
    ));

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    append_children(result, &node.children(), &new_prefix, max);
}

fn append_children(result: &mut String, children: &[&dyn AstNode], prefix: &str, max: usize) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        append_node(result, *child, prefix, is_last, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templaty::parser::parse;

    #[test]
    fn test_nested_blocks() {
        let tree = parse("{% for row in rows %}{% join c in row with ', ' %}{{ c }}{% endjoin %}\n{% endfor %}")
            .unwrap();
        insta::assert_snapshot!(to_treeviz_str(&tree), @r###"
        └─ ForInStatement: row in rows
          ├─ JoinStatement: c in row with ", "
          │ └─ ExpressionStatement: c
          └─ TextStatement: "\n"
        "###);
    }

    #[test]
    fn test_labels_are_truncated() {
        let tree = parse("abcdefghij").unwrap();
        assert_eq!(to_treeviz_str_with(&tree, 4), "└─ TextStatement: \"abc...\n");
    }

    #[test]
    fn test_empty_tree() {
        let tree = parse("").unwrap();
        assert_eq!(to_treeviz_str(&tree), "");
    }
}
