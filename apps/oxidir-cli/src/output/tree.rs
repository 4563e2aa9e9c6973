//! Hierarchy rendering for tree output

use oxidir_engine::model::TreeNode;

/// Render a container hierarchy with box-drawing branches.
///
/// The root is printed as its full DN; children are printed by label so
/// the nesting carries the DN suffix implicitly.
pub fn render_tree(root: &TreeNode) -> String {
    let mut out = String::new();
    out.push_str(&root.dn.to_string());
    out.push('\n');
    render_children(&root.children, "", &mut out);
    out
}

fn render_children(children: &[TreeNode], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let branch = if last { "└── " } else { "├── " };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&child.label);
        out.push('\n');

        let child_prefix = if last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        render_children(&child.children, &child_prefix, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxidir_engine::dn::Dn;

    fn node(dn: &str) -> TreeNode {
        TreeNode::new(Dn::parse(dn))
    }

    #[test]
    fn test_render_single_node() {
        let root = node("dc=example,dc=com");
        assert_eq!(render_tree(&root), "dc=example,dc=com\n");
    }

    #[test]
    fn test_render_nested_branches() {
        let mut root = node("dc=example,dc=com");
        let mut people = node("ou=people,dc=example,dc=com");
        people
            .children
            .push(node("ou=interns,ou=people,dc=example,dc=com"));
        root.children.push(people);
        root.children.push(node("ou=groups,dc=example,dc=com"));

        let rendered = render_tree(&root);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "dc=example,dc=com");
        assert_eq!(lines[1], "├── people");
        assert_eq!(lines[2], "│   └── interns");
        assert_eq!(lines[3], "└── groups");
    }
}
