//! Tree node types and text rendering.

use std::path::{Path, PathBuf};

use serde::Serialize;
use ts_rs::TS;

/// What a [`DocNode`] stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum NodeKind {
    /// A `.md`/`.mdx` file
    Document {
        id: Option<String>,
        title: Option<String>,
    },
    /// A folder with a `_category_.json` sidecar
    Category { description: Option<String> },
    /// A folder without a sidecar
    PlainFolder,
    /// An image file inside an image group
    ImageAsset,
    /// Synthetic node listing a folder's images. Its path is the real folder
    /// that holds them.
    ImageGroup { count: usize },
}

/// One entry in the documentation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DocNode {
    pub label: String,
    pub path: PathBuf,
    #[ts(type = "number | null")]
    pub position: Option<i64>,
    pub kind: NodeKind,
    /// Present when the children were built along with the node
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub children: Option<Vec<DocNode>>,
}

impl DocNode {
    /// True for categories and plain folders.
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Category { .. } | NodeKind::PlainFolder)
    }

    pub fn is_document(&self) -> bool {
        matches!(self.kind, NodeKind::Document { .. })
    }

    pub fn is_category(&self) -> bool {
        matches!(self.kind, NodeKind::Category { .. })
    }

    /// Whether the node takes part in sibling ordering. Image groups and
    /// image assets never carry a position.
    pub fn is_orderable(&self) -> bool {
        match self.kind {
            NodeKind::Document { .. } | NodeKind::Category { .. } | NodeKind::PlainFolder => true,
            NodeKind::ImageAsset | NodeKind::ImageGroup { .. } => false,
        }
    }

    /// The folder whose sibling set this node belongs to.
    pub fn parent_dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// File or folder name of the underlying path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Depth-first search for the node at `path`, this node included.
    pub fn find(&self, path: &Path) -> Option<&DocNode> {
        if self.path == path && !matches!(self.kind, NodeKind::ImageGroup { .. }) {
            return Some(self);
        }
        self.children
            .as_deref()
            .and_then(|children| find_in(children, path))
    }
}

/// Depth-first search over a forest. Image groups are skipped as matches
/// because they share their path with a real folder.
pub fn find_in<'a>(nodes: &'a [DocNode], path: &Path) -> Option<&'a DocNode> {
    nodes.iter().find_map(|node| node.find(path))
}

fn node_line(node: &DocNode) -> String {
    match node.position {
        Some(position) => format!("{} [{}]", node.label, position),
        None => node.label.clone(),
    }
}

/// Format a forest for display, like the `tree` command.
pub fn format_tree(nodes: &[DocNode]) -> String {
    let mut result = String::new();
    for node in nodes {
        result.push_str(&node_line(node));
        result.push('\n');
        if let Some(children) = &node.children {
            format_children(children, "", &mut result);
        }
    }
    result
}

fn format_children(children: &[DocNode], prefix: &str, result: &mut String) {
    let count = children.len();
    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { "└── " } else { "├── " };
        let child_prefix = if is_last { "    " } else { "│   " };

        result.push_str(prefix);
        result.push_str(connector);
        result.push_str(&node_line(child));
        result.push('\n');

        if let Some(grandchildren) = &child.children {
            format_children(grandchildren, &format!("{}{}", prefix, child_prefix), result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(label: &str, path: &str, position: Option<i64>) -> DocNode {
        DocNode {
            label: label.to_string(),
            path: PathBuf::from(path),
            position,
            kind: NodeKind::Document {
                id: None,
                title: None,
            },
            children: None,
        }
    }

    #[test]
    fn test_format_tree() {
        let root = DocNode {
            label: "Docs".to_string(),
            path: PathBuf::from("docs"),
            position: None,
            kind: NodeKind::PlainFolder,
            children: Some(vec![
                doc("Intro", "docs/intro.md", Some(1)),
                DocNode {
                    label: "Guide".to_string(),
                    path: PathBuf::from("docs/guide"),
                    position: Some(2),
                    kind: NodeKind::Category { description: None },
                    children: Some(vec![doc("Setup", "docs/guide/setup.md", None)]),
                },
            ]),
        };

        let expected = "Docs\n├── Intro [1]\n└── Guide [2]\n    └── Setup\n";
        assert_eq!(format_tree(&[root]), expected);
    }

    #[test]
    fn test_find_skips_image_groups() {
        let images = DocNode {
            label: "images (1)".to_string(),
            path: PathBuf::from("docs/images"),
            position: None,
            kind: NodeKind::ImageGroup { count: 1 },
            children: Some(vec![DocNode {
                label: "a.png".to_string(),
                path: PathBuf::from("docs/images/a.png"),
                position: None,
                kind: NodeKind::ImageAsset,
                children: None,
            }]),
        };
        let nodes = vec![doc("Intro", "docs/intro.md", None), images];

        assert!(find_in(&nodes, Path::new("docs/images")).is_none());
        assert_eq!(
            find_in(&nodes, Path::new("docs/images/a.png")).map(|n| n.label.as_str()),
            Some("a.png")
        );
    }

    #[test]
    fn test_serializes_kind_as_tag() {
        let json = serde_json::to_value(doc("Intro", "docs/intro.md", Some(1))).unwrap();
        assert_eq!(json["kind"]["type"], "document");
        assert_eq!(json["position"], 1);
        assert!(json.get("children").is_none());
    }
}
