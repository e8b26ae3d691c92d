//! Sibling ordering.
//!
//! Positioned nodes come first, by ascending position. Unpositioned nodes
//! follow: folders (and the image group) before documents, each group
//! alphabetical by label. Remaining ties fall back to the path so the order
//! is total.

use std::cmp::Ordering;

use super::node::{DocNode, NodeKind};

fn is_folder_like(node: &DocNode) -> bool {
    match node.kind {
        NodeKind::Category { .. } | NodeKind::PlainFolder | NodeKind::ImageGroup { .. } => true,
        NodeKind::Document { .. } | NodeKind::ImageAsset => false,
    }
}

fn by_label(a: &DocNode, b: &DocNode) -> Ordering {
    a.label
        .to_lowercase()
        .cmp(&b.label.to_lowercase())
        .then_with(|| a.label.cmp(&b.label))
        .then_with(|| a.path.cmp(&b.path))
}

fn folders_first(a: &DocNode, b: &DocNode) -> Ordering {
    is_folder_like(b).cmp(&is_folder_like(a))
}

/// Total order over siblings.
pub fn compare(a: &DocNode, b: &DocNode) -> Ordering {
    match (a.position, b.position) {
        (Some(x), Some(y)) => x
            .cmp(&y)
            .then_with(|| folders_first(a, b))
            .then_with(|| by_label(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => folders_first(a, b).then_with(|| by_label(a, b)),
    }
}

/// Sort siblings in display order.
pub fn sort_nodes(nodes: &mut [DocNode]) {
    nodes.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn node(label: &str, position: Option<i64>, kind: NodeKind) -> DocNode {
        DocNode {
            label: label.to_string(),
            path: PathBuf::from(format!("docs/{}", label)),
            position,
            kind,
            children: None,
        }
    }

    fn doc(label: &str, position: Option<i64>) -> DocNode {
        node(
            label,
            position,
            NodeKind::Document {
                id: None,
                title: None,
            },
        )
    }

    fn labels(nodes: &[DocNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.label.as_str()).collect()
    }

    #[test]
    fn test_positioned_ascending_then_unpositioned() {
        let mut nodes = vec![doc("c", Some(3)), doc("D", None), doc("a", Some(1)), doc("b", Some(2))];
        sort_nodes(&mut nodes);
        assert_eq!(labels(&nodes), vec!["a", "b", "c", "D"]);
    }

    #[test]
    fn test_unpositioned_folders_before_documents() {
        let mut nodes = vec![
            doc("alpha", None),
            node("zeta", None, NodeKind::PlainFolder),
            doc("Beta", None),
            node("images (2)", None, NodeKind::ImageGroup { count: 2 }),
            node("first", Some(1), NodeKind::Category { description: None }),
        ];
        sort_nodes(&mut nodes);
        assert_eq!(labels(&nodes), vec!["first", "images (2)", "zeta", "alpha", "Beta"]);
    }

    #[test]
    fn test_equal_positions_are_deterministic() {
        let mut nodes = vec![doc("b", Some(1)), doc("a", Some(1)), node("c", Some(1), NodeKind::PlainFolder)];
        sort_nodes(&mut nodes);
        assert_eq!(labels(&nodes), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_negative_and_zero_positions_sort_numerically() {
        let mut nodes = vec![doc("z", Some(0)), doc("y", Some(-2)), doc("x", Some(10))];
        sort_nodes(&mut nodes);
        assert_eq!(labels(&nodes), vec!["y", "z", "x"]);
    }
}
