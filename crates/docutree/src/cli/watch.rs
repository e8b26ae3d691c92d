//! `watch`: refresh and reprint the tree when content changes on disk

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use docutree_core::category::CATEGORY_FILE;
use docutree_core::fs::{FileSystem, is_markdown};
use docutree_core::{DocNode, Workspace};
use docutree_core::tree::format_tree;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::CliWorkspace;

/// Whether a change to `path` can alter the tree.
fn is_relevant(ws: &CliWorkspace, path: &Path) -> bool {
    let hidden = path
        .strip_prefix(ws.project_root())
        .unwrap_or(path)
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
    if hidden {
        return false;
    }
    is_markdown(path)
        || path.file_name().is_some_and(|name| name == CATEGORY_FILE)
        || ws.config().is_image(path)
        || path.extension().is_none()
}

fn print_tree(tree: &[DocNode]) {
    println!("--- {}", chrono::Local::now().format("%H:%M:%S"));
    print!("{}", format_tree(tree));
}

/// Refresh and return the new tree if it differs from `shown`.
///
/// Images moved by the refresh itself fire another batch of events; that
/// batch rebuilds the same tree and prints nothing.
fn refreshed<FS: FileSystem>(ws: &mut Workspace<FS>, shown: &[DocNode]) -> Option<Vec<DocNode>> {
    let tree = ws.refresh();
    (tree != shown).then_some(tree)
}

pub fn handle_watch(ws: &mut CliWorkspace, debounce_ms: u64) -> bool {
    let (tx, rx) = mpsc::channel::<Event>();
    let mut watcher = match RecommendedWatcher::new(
        move |result: notify::Result<Event>| match result {
            Ok(event) => {
                if tx.send(event).is_err() {
                    log::debug!("Watch channel closed");
                }
            }
            Err(e) => log::warn!("Watch error: {}", e),
        },
        notify::Config::default(),
    ) {
        Ok(watcher) => watcher,
        Err(e) => {
            eprintln!("✗ Failed to create file watcher: {}", e);
            return false;
        }
    };

    let root = ws.project_root().to_path_buf();
    if let Err(e) = watcher.watch(&root, RecursiveMode::Recursive) {
        eprintln!("✗ Failed to watch {}: {}", root.display(), e);
        return false;
    }
    log::info!("Watching {}", root.display());

    let mut shown = ws.refresh();
    print_tree(&shown);
    let quiet = Duration::from_millis(debounce_ms);

    while let Ok(event) = rx.recv() {
        let mut relevant = is_change(&event) && event.paths.iter().any(|p| is_relevant(ws, p));

        // Collapse a burst of events into one refresh.
        loop {
            match rx.recv_timeout(quiet) {
                Ok(event) => {
                    relevant |= is_change(&event) && event.paths.iter().any(|p| is_relevant(ws, p));
                }
                Err(mpsc::RecvTimeoutError::Timeout) => break,
                Err(mpsc::RecvTimeoutError::Disconnected) => return true,
            }
        }

        if relevant && let Some(tree) = refreshed(ws, &shown) {
            print_tree(&tree);
            shown = tree;
        } else if relevant {
            log::debug!("Tree unchanged");
        }
    }
    true
}

fn is_change(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
