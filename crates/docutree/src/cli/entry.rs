//! `new`, `move`, `reorder` and `delete`

use std::path::PathBuf;

use chrono::NaiveDate;
use docutree_core::fs::FileSystem;
use docutree_core::workspace::{DocumentFields, ReorderOutcome};
use docutree_core::{DocNode, DocutreeError, Workspace};

use super::CliWorkspace;
use super::util::{StdinConfirm, lookup, report_error, resolve_path};

#[allow(clippy::too_many_arguments)]
pub fn handle_new(
    ws: &CliWorkspace,
    folder: PathBuf,
    title: String,
    template: Option<String>,
    description: Option<String>,
    slug: Option<String>,
    id: Option<String>,
    date: Option<String>,
    authors: Vec<String>,
    tags: Vec<String>,
) -> bool {
    let date = match date.as_deref().map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d")) {
        None => None,
        Some(Ok(date)) => Some(date),
        Some(Err(e)) => {
            eprintln!("✗ Invalid date (expected YYYY-MM-DD): {}", e);
            return false;
        }
    };

    let fields = DocumentFields {
        title,
        description,
        id,
        slug,
        date,
        authors,
        tags,
    };
    match ws.create_document(&resolve_path(&folder), template.as_deref(), fields) {
        Ok(path) => {
            println!("✓ Created {}", path.display());
            true
        }
        Err(e) => report_error(&e),
    }
}

pub fn handle_move(ws: &CliWorkspace, source: PathBuf, folder: PathBuf) -> bool {
    match ws.move_into_folder(&resolve_path(&source), &resolve_path(&folder)) {
        Ok(ReorderOutcome::Moved { to }) => {
            println!("✓ Moved to {}", to.display());
            true
        }
        Ok(_) => {
            println!("Already in {}", folder.display());
            true
        }
        Err(e) => report_error(&e),
    }
}

/// Put `source` just before `before` in their shared folder. A folder target
/// is a sibling here, not a destination.
fn place_before<FS: FileSystem>(
    ws: &Workspace<FS>,
    source: &DocNode,
    before: &DocNode,
) -> docutree_core::Result<ReorderOutcome> {
    if !source.is_orderable() {
        return Err(DocutreeError::NotMovable(source.path.clone()));
    }
    ws.reorder_before(&source.path, &before.path)
}

pub fn handle_reorder(ws: &CliWorkspace, source: PathBuf, before: PathBuf) -> bool {
    let tree = ws.tree();
    let source = resolve_path(&source);
    let before = resolve_path(&before);
    let (Some(source_node), Some(target_node)) = (lookup(&tree, &source), lookup(&tree, &before))
    else {
        eprintln!("✗ Both entries must be part of the content tree");
        return false;
    };

    match place_before(ws, &source_node, &target_node) {
        Ok(ReorderOutcome::Reordered) => {
            println!(
                "✓ Placed {} before {}",
                source_node.file_name(),
                target_node.file_name()
            );
            true
        }
        Ok(ReorderOutcome::Moved { to }) => {
            println!("✓ Moved to {}", to.display());
            true
        }
        Ok(ReorderOutcome::Unchanged) => {
            println!("Nothing to do");
            true
        }
        Err(e) => report_error(&e),
    }
}

pub fn handle_delete(ws: &CliWorkspace, path: PathBuf, yes: bool) -> bool {
    let tree = ws.tree();
    let path = resolve_path(&path);
    let Some(node) = lookup(&tree, &path) else {
        eprintln!("✗ '{}' is not part of the content tree", path.display());
        return false;
    };

    match ws.delete_entry(&node, &mut StdinConfirm { yes }) {
        Ok(()) => {
            println!("✓ Deleted {}", path.display());
            true
        }
        Err(e) => report_error(&e),
    }
}
