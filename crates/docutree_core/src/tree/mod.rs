//! Tree model builder.
//!
//! [`TreeBuilder::children`] lists one folder: documents, categories, plain
//! folders and at most one image group, sorted. [`TreeBuilder::build`] does the
//! same recursively and materializes every folder's children.
//!
//! Folders named in [`Config::ignored_folders`] are never listed. A builder
//! made with [`TreeBuilder::moving_images`]`(false)` groups images where they
//! are instead of moving them.

mod images;
mod node;
mod sort;

pub use images::{
    IMAGE_FOLDER_NAMES, ImageSet, find_image_folder, gather, group_in_place, list_images,
};
pub use node::{DocNode, NodeKind, find_in, format_tree};
pub use sort::{compare, sort_nodes};

use std::path::Path;

use crate::category::{self, CATEGORY_FILE};
use crate::config::Config;
use crate::discovery::ContentRoot;
use crate::frontmatter;
use crate::fs::{FileSystem, is_markdown};

use images::is_hidden;

/// Folders nested deeper than this are not expanded.
pub const MAX_DEPTH: usize = 32;

/// Builds [`DocNode`]s from the filesystem.
pub struct TreeBuilder<'a, FS: FileSystem> {
    fs: &'a FS,
    config: &'a Config,
    move_images: bool,
}

impl<'a, FS: FileSystem> TreeBuilder<'a, FS> {
    pub fn new(fs: &'a FS, config: &'a Config) -> Self {
        Self {
            fs,
            config,
            move_images: true,
        }
    }

    /// Whether loose images are moved into an image folder (the default).
    pub fn moving_images(mut self, enabled: bool) -> Self {
        self.move_images = enabled;
        self
    }

    fn is_ignored(&self, folder: &Path) -> bool {
        folder.file_name().is_some_and(|name| {
            self.config
                .ignored_folders
                .iter()
                .any(|ignored| name == ignored.as_str())
        })
    }

    /// The sorted immediate children of `folder`, without grandchildren.
    ///
    /// An unreadable folder has no children.
    pub fn children(&self, folder: &Path) -> Vec<DocNode> {
        let mut entries = match self.fs.list_entries(folder) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Could not read {}: {}", folder.display(), e);
                return Vec::new();
            }
        };
        entries.sort();

        let mut folders = Vec::new();
        let mut nodes = Vec::new();
        let mut loose_images = Vec::new();

        for path in entries {
            if is_hidden(&path) || path.file_name().is_some_and(|n| n == CATEGORY_FILE) {
                continue;
            }
            if self.fs.is_dir(&path) {
                if !self.is_ignored(&path) {
                    folders.push(path);
                }
            } else if is_markdown(&path) {
                nodes.push(self.document_node(&path));
            } else if self.config.is_image(&path) {
                loose_images.push(path);
            }
        }

        let group = if self.move_images {
            images::gather(self.fs, folder, loose_images, self.config)
        } else {
            images::group_in_place(self.fs, folder, loose_images, self.config)
        };
        let group_folder = group.as_ref().map(|set| set.folder.clone());

        // A folder created for loose images is not in `folders` yet, and the
        // group stands in for it either way.
        nodes.extend(
            folders
                .iter()
                .filter(|path| Some(*path) != group_folder.as_ref())
                .map(|path| self.folder_node(path)),
        );
        if let Some(set) = group {
            nodes.push(set.into_group());
        }

        sort_nodes(&mut nodes);
        nodes
    }

    /// Children of `folder` with every sub-folder's children materialized.
    pub fn build(&self, folder: &Path) -> Vec<DocNode> {
        self.build_with_depth(folder, MAX_DEPTH)
    }

    fn build_with_depth(&self, folder: &Path, depth: usize) -> Vec<DocNode> {
        let mut nodes = self.children(folder);
        for node in nodes.iter_mut().filter(|n| n.is_folder()) {
            if depth == 0 {
                log::warn!("Not expanding {}: nested too deeply", node.path.display());
                continue;
            }
            node.children = Some(self.build_with_depth(&node.path, depth - 1));
        }
        nodes
    }

    /// Top-level node for a content root, children materialized.
    pub fn root_node(&self, root: &ContentRoot) -> DocNode {
        let mut node = self.folder_node(&root.path);
        node.label = root.label.clone();
        node.children = Some(self.build(&root.path));
        node
    }

    /// Node for a markdown file.
    pub fn document_node(&self, path: &Path) -> DocNode {
        let meta = frontmatter::read_metadata(self.fs, path);
        let label = meta.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default()
        });
        DocNode {
            label,
            path: path.to_path_buf(),
            position: meta.sidebar_position,
            kind: NodeKind::Document {
                id: meta.id,
                title: meta.title,
            },
            children: None,
        }
    }

    /// Node for a folder: a category if it has a sidecar, a plain folder otherwise.
    pub fn folder_node(&self, path: &Path) -> DocNode {
        match category::read(self.fs, path) {
            Some(meta) => DocNode {
                label: meta.label.unwrap_or_else(|| category::folder_label(path)),
                path: path.to_path_buf(),
                position: meta.position,
                kind: NodeKind::Category {
                    description: meta.description,
                },
                children: None,
            },
            None => DocNode {
                label: category::folder_label(path),
                path: path.to_path_buf(),
                position: None,
                kind: NodeKind::PlainFolder,
                children: None,
            },
        }
    }

    /// The siblings of `folder` that take part in ordering, in display order.
    pub fn orderable_children(&self, folder: &Path) -> Vec<DocNode> {
        self.children(folder)
            .into_iter()
            .filter(DocNode::is_orderable)
            .collect()
    }

    /// Markdown files anywhere below `folder`.
    pub fn count_documents(&self, folder: &Path) -> usize {
        self.fs
            .list_md_files_recursive(folder)
            .map(|files| files.len())
            .unwrap_or(0)
    }
}
