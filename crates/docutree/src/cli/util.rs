//! Shared CLI utilities

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use docutree_core::error::DocutreeError;
use docutree_core::tree::find_in;
use docutree_core::{Confirm, ConfirmRequest, DocNode, NodeKind};

/// Absolute form of `path`, resolved against the current directory.
///
/// Existing paths are canonicalized so they compare equal to the paths in
/// the tree; missing ones are joined as given.
pub fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    }
}

/// The project root from `--project`, defaulting to the current directory.
pub fn project_root(project: Option<PathBuf>) -> PathBuf {
    resolve_path(&project.unwrap_or_else(|| PathBuf::from(".")))
}

/// Ask a yes/no question. Anything but "y"/"yes" is a no.
pub fn prompt_confirm(message: &str) -> bool {
    print!("{} [y/N] ", message);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Ask for a value, keeping `default` on empty input.
pub fn prompt_value(message: &str, default: &str) -> String {
    if default.is_empty() {
        print!("{}: ", message);
    } else {
        print!("{} [{}]: ", message, default);
    }
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return default.to_string();
    }
    match input.trim() {
        "" => default.to_string(),
        value => value.to_string(),
    }
}

/// Confirmations answered on the terminal, or all at once with `--yes`.
pub struct StdinConfirm {
    pub yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        if self.yes {
            log::info!("{} (yes)", request.message());
            return true;
        }
        prompt_confirm(&request.message())
    }
}

/// Find the node for `path`, falling back to an image group whose folder is
/// `path`.
pub fn lookup(tree: &[DocNode], path: &Path) -> Option<DocNode> {
    if let Some(node) = find_in(tree, path) {
        return Some(node.clone());
    }
    find_group(tree, path).cloned()
}

fn find_group<'a>(nodes: &'a [DocNode], path: &Path) -> Option<&'a DocNode> {
    nodes.iter().find_map(|node| {
        if node.path == path && matches!(node.kind, NodeKind::ImageGroup { .. }) {
            return Some(node);
        }
        node.children
            .as_deref()
            .and_then(|children| find_group(children, path))
    })
}

/// Print the outcome of a failed operation. Returns false, except for a
/// declined confirmation, which is not a failure.
pub fn report_error(error: &DocutreeError) -> bool {
    match error {
        DocutreeError::ConfirmationRequired(_) => {
            println!("Cancelled.");
            true
        }
        DocutreeError::RenumberIncomplete { completed, failed } => {
            eprintln!("✗ Renumbered {} entries, {} failed:", completed, failed.len());
            for (path, reason) in failed {
                eprintln!("  {}: {}", path.display(), reason);
            }
            false
        }
        e => {
            eprintln!("✗ {}", e);
            false
        }
    }
}

/// Print `value` as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            eprintln!("✗ Could not serialize output: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(path: &str, kind: NodeKind, children: Option<Vec<DocNode>>) -> DocNode {
        DocNode {
            label: path.to_string(),
            path: PathBuf::from(path),
            position: None,
            kind,
            children,
        }
    }

    #[test]
    fn test_lookup_finds_image_group_by_folder() {
        let tree = vec![node(
            "docs",
            NodeKind::PlainFolder,
            Some(vec![
                node(
                    "docs/a.md",
                    NodeKind::Document {
                        id: None,
                        title: None,
                    },
                    None,
                ),
                node("docs/images", NodeKind::ImageGroup { count: 0 }, Some(vec![])),
            ]),
        )];

        assert_eq!(
            lookup(&tree, Path::new("docs/a.md")).map(|n| n.path),
            Some(PathBuf::from("docs/a.md"))
        );
        assert!(matches!(
            lookup(&tree, Path::new("docs/images")).map(|n| n.kind),
            Some(NodeKind::ImageGroup { .. })
        ));
        assert!(lookup(&tree, Path::new("docs/missing.md")).is_none());
    }

    #[test]
    fn test_declined_confirmation_is_not_a_failure() {
        assert!(report_error(&DocutreeError::ConfirmationRequired(
            PathBuf::from("docs/a.md")
        )));
        assert!(!report_error(&DocutreeError::MissingTitle));
    }

    #[test]
    fn test_yes_flag_confirms_everything() {
        let mut confirm = StdinConfirm { yes: true };
        assert!(confirm.confirm(&ConfirmRequest::DeleteFolder {
            path: PathBuf::from("docs/guide")
        }));
    }
}
