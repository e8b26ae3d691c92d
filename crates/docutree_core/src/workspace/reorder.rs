//! Drag-and-drop: moving entries into folders and reordering siblings.
//!
//! Both gestures end by renumbering one folder's orderable children 1..N in
//! their new order: `sidebar_position` for documents, sidecar `position` for
//! folders (a plain folder gains a sidecar and becomes a category).

use std::path::{Path, PathBuf};

use crate::category;
use crate::error::{DocutreeError, Result};
use crate::frontmatter;
use crate::fs::FileSystem;
use crate::tree::{DocNode, NodeKind};

use super::Workspace;

/// What a drag-and-drop gesture did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// The entry now lives at `to`
    Moved { to: PathBuf },
    /// The entry kept its folder and its siblings were renumbered
    Reordered,
    /// Nothing to do
    Unchanged,
}

impl<FS: FileSystem> Workspace<FS> {
    /// Apply a drop of `source` onto `target`.
    ///
    /// Dropping on a folder moves the source into it. Dropping on a document
    /// reorders the source just before it, which is only allowed within one
    /// folder. Image groups and image assets can be neither dragged nor
    /// dropped on.
    pub fn move_or_reorder(&self, source: &DocNode, target: &DocNode) -> Result<ReorderOutcome> {
        if !source.is_orderable() {
            return Err(DocutreeError::NotMovable(source.path.clone()));
        }
        match target.kind {
            NodeKind::Category { .. } | NodeKind::PlainFolder => {
                self.move_into_folder(&source.path, &target.path)
            }
            NodeKind::Document { .. } => self.reorder_before(&source.path, &target.path),
            NodeKind::ImageAsset | NodeKind::ImageGroup { .. } => {
                Err(DocutreeError::NotMovable(target.path.clone()))
            }
        }
    }

    /// Move `source` into `folder`, place it last, and renumber `folder`.
    ///
    /// Checks run before anything is touched; a failed move aborts before
    /// renumbering. The folder the entry came from is not renumbered.
    pub fn move_into_folder(&self, source: &Path, folder: &Path) -> Result<ReorderOutcome> {
        if !self.fs.is_dir(folder) {
            return Err(DocutreeError::NotAFolder(folder.to_path_buf()));
        }
        if !self.fs.exists(source) {
            return Err(DocutreeError::read(
                source,
                std::io::Error::new(std::io::ErrorKind::NotFound, "entry does not exist"),
            ));
        }
        if source.parent() == Some(folder) {
            return Ok(ReorderOutcome::Unchanged);
        }
        if folder.starts_with(source) {
            // A folder cannot be dropped into itself or its own descendants.
            return Err(DocutreeError::NotMovable(source.to_path_buf()));
        }

        let name = source
            .file_name()
            .ok_or_else(|| DocutreeError::NotMovable(source.to_path_buf()))?;
        let destination = folder.join(name);
        if self.fs.exists(&destination) {
            return Err(DocutreeError::AlreadyExists(destination));
        }

        self.fs
            .move_path(source, &destination)
            .map_err(|e| DocutreeError::MovePath {
                from: source.to_path_buf(),
                to: destination.clone(),
                source: e,
            })?;
        log::debug!("Moved {} to {}", source.display(), destination.display());

        let mut siblings = self.builder_for(folder).orderable_children(folder);
        if let Some(index) = siblings.iter().position(|n| n.path == destination) {
            let moved = siblings.remove(index);
            siblings.push(moved);
        }
        self.renumber(&siblings)?;

        Ok(ReorderOutcome::Moved { to: destination })
    }

    /// Put `source` immediately before `target` and renumber their folder.
    ///
    /// Both must be orderable children of the same folder; otherwise nothing
    /// is written.
    pub fn reorder_before(&self, source: &Path, target: &Path) -> Result<ReorderOutcome> {
        let parent = match (source.parent(), target.parent()) {
            (Some(a), Some(b)) if a == b => a,
            _ => {
                return Err(DocutreeError::CrossDirectoryReorder {
                    source_path: source.to_path_buf(),
                    target: target.to_path_buf(),
                });
            }
        };
        if source == target {
            return Ok(ReorderOutcome::Unchanged);
        }

        let mut siblings = self.builder_for(parent).orderable_children(parent);
        let from = siblings
            .iter()
            .position(|n| n.path == source)
            .ok_or_else(|| DocutreeError::NotMovable(source.to_path_buf()))?;
        if !siblings.iter().any(|n| n.path == target) {
            return Err(DocutreeError::NotMovable(target.to_path_buf()));
        }

        let moved = siblings.remove(from);
        let to = siblings
            .iter()
            .position(|n| n.path == target)
            .unwrap_or(siblings.len());
        siblings.insert(to, moved);

        self.renumber(&siblings)?;
        Ok(ReorderOutcome::Reordered)
    }

    /// Write positions 1..N for `siblings` in the given order.
    ///
    /// Every sibling is attempted. Failures are collected and reported
    /// together as `RenumberIncomplete`; entries already at their position
    /// are not rewritten.
    pub fn renumber(&self, siblings: &[DocNode]) -> Result<usize> {
        let mut completed = 0;
        let mut failed = Vec::new();

        for (index, node) in siblings.iter().enumerate() {
            let position = index as i64 + 1;
            let result = match node.kind {
                NodeKind::Document { .. } => {
                    frontmatter::set_sidebar_position(&self.fs, &node.path, position)
                }
                NodeKind::Category { .. } | NodeKind::PlainFolder => {
                    category::set_position(&self.fs, &node.path, position)
                }
                NodeKind::ImageAsset | NodeKind::ImageGroup { .. } => continue,
            };
            match result {
                Ok(written) => {
                    if written {
                        log::debug!("Set position {} on {}", position, node.path.display());
                    }
                    completed += 1;
                }
                Err(e) => {
                    log::warn!("Could not renumber {}: {}", node.path.display(), e);
                    failed.push((node.path.clone(), e.to_string()));
                }
            }
        }

        if failed.is_empty() {
            Ok(completed)
        } else {
            Err(DocutreeError::RenumberIncomplete { completed, failed })
        }
    }
}
