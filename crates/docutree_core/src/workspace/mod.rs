//! The workspace session.
//!
//! A [`Workspace`] bundles everything the tree operations need: the
//! filesystem, the project root, the loaded [`Config`] and the content roots
//! found by the last discovery. Every host-facing operation is a method on it.
//!
//! Mutating methods change files only. The caller follows every mutation,
//! successful or not, with [`Workspace::refresh`] so the displayed tree
//! matches the disk.
//!
//! # Module Structure
//!
//! - `category` - category create/edit/delete and the creation draft
//! - `document` - new documents and blog posts from templates
//! - `reorder` - drag-and-drop moves and sibling renumbering

mod category;
mod document;
mod reorder;

pub use category::{CategoryDraft, DeletePlan, DraftState, validate_category_name};
pub use document::DocumentFields;
pub use reorder::ReorderOutcome;

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::discovery::{self, ContentKind, ContentRoot, DiscoveredRoots, DiscoverySource};
use crate::error::{DocutreeError, Result};
use crate::fs::FileSystem;
use crate::tree::{DocNode, NodeKind, TreeBuilder};

/// A question the host must put to the user before a destructive step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmRequest {
    /// Delete a single document or image file
    DeleteFile { path: PathBuf },
    /// Delete an image group's folder and every image in it
    DeleteImages { folder: PathBuf, count: usize },
    /// Delete a folder (first confirmation)
    DeleteFolder { path: PathBuf },
    /// The folder holds documents; the stronger second confirmation
    DeleteFolderWithDocuments { path: PathBuf, document_count: usize },
}

impl ConfirmRequest {
    /// Prompt text for the user.
    pub fn message(&self) -> String {
        match self {
            ConfirmRequest::DeleteFile { path } => format!("Delete '{}'?", path.display()),
            ConfirmRequest::DeleteImages { folder, count } => format!(
                "Delete '{}' and its {} image(s)?",
                folder.display(),
                count
            ),
            ConfirmRequest::DeleteFolder { path } => {
                format!("Delete folder '{}'? This cannot be undone.", path.display())
            }
            ConfirmRequest::DeleteFolderWithDocuments {
                path,
                document_count,
            } => format!(
                "'{}' contains {} document(s). Delete them all permanently?",
                path.display(),
                document_count
            ),
        }
    }

    /// The path the request is about.
    pub fn path(&self) -> &Path {
        match self {
            ConfirmRequest::DeleteFile { path }
            | ConfirmRequest::DeleteFolder { path }
            | ConfirmRequest::DeleteFolderWithDocuments { path, .. } => path,
            ConfirmRequest::DeleteImages { folder, .. } => folder,
        }
    }
}

/// Asks the user to confirm destructive operations.
pub trait Confirm {
    /// Returns true if the user agreed.
    fn confirm(&mut self, request: &ConfirmRequest) -> bool;
}

impl<F: FnMut(&ConfirmRequest) -> bool> Confirm for F {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        self(request)
    }
}

/// A project opened for tree operations.
pub struct Workspace<FS: FileSystem> {
    fs: FS,
    project_root: PathBuf,
    config: Config,
    roots: DiscoveredRoots,
}

impl<FS: FileSystem> Workspace<FS> {
    /// Open a project: load its config and discover its content roots.
    pub fn open(fs: FS, project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let config = Config::load_for_project(&fs, &project_root);
        Self::with_config(fs, project_root, config)
    }

    /// Open a project with an explicit config.
    pub fn with_config(fs: FS, project_root: impl Into<PathBuf>, config: Config) -> Self {
        let mut workspace = Self {
            fs,
            project_root: project_root.into(),
            config,
            roots: DiscoveredRoots::default(),
        };
        workspace.rediscover();
        workspace
    }

    /// Get a reference to the underlying filesystem
    pub fn fs_ref(&self) -> &FS {
        &self.fs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Every root found by the last discovery.
    pub fn discovered(&self) -> &DiscoveredRoots {
        &self.roots
    }

    /// The roots of one content type.
    pub fn roots(&self, kind: ContentKind) -> &[ContentRoot] {
        self.roots.get(kind)
    }

    /// Builder over this workspace's filesystem and config.
    pub fn builder(&self) -> TreeBuilder<'_, FS> {
        TreeBuilder::new(&self.fs, &self.config)
    }

    /// Builder for listing `folder`.
    ///
    /// Under a root that is only the project root standing in for missing
    /// docs, images are grouped where they are and never moved.
    pub fn builder_for(&self, folder: &Path) -> TreeBuilder<'_, FS> {
        let fallback = self
            .roots
            .root_containing(folder)
            .is_none_or(|root| root.source == DiscoverySource::Fallback);
        self.builder().moving_images(!fallback)
    }

    /// Re-run content discovery.
    pub fn rediscover(&mut self) {
        self.roots = discovery::discover(&self.fs, &self.project_root, &self.config);
        log::debug!(
            "Discovered {} docs and {} blog root(s) in {}",
            self.roots.docs.len(),
            self.roots.blog.len(),
            self.project_root.display()
        );
    }

    /// Discard the model and rebuild it from disk: one fully built node per root.
    pub fn refresh(&mut self) -> Vec<DocNode> {
        self.rediscover();
        self.tree()
    }

    /// Build the tree for the roots already discovered.
    pub fn tree(&self) -> Vec<DocNode> {
        self.roots
            .iter()
            .map(|root| self.builder_for(&root.path).root_node(root))
            .collect()
    }

    /// Children of `node`, or the top-level root nodes for `None`.
    ///
    /// Children built along with the node are returned as they are; others
    /// are read from disk.
    pub fn get_children(&self, node: Option<&DocNode>) -> Vec<DocNode> {
        let builder = self.builder();
        let Some(node) = node else {
            return self
                .roots
                .iter()
                .map(|root| {
                    let mut top = builder.folder_node(&root.path);
                    top.label = root.label.clone();
                    top
                })
                .collect();
        };

        if let Some(children) = &node.children {
            return children.clone();
        }
        if node.is_folder() {
            self.builder_for(&node.path).children(&node.path)
        } else {
            Vec::new()
        }
    }

    /// Kind of content `path` belongs to; docs when outside every root.
    pub fn content_kind_of(&self, path: &Path) -> ContentKind {
        self.roots
            .root_containing(path)
            .map(|root| root.kind)
            .unwrap_or(ContentKind::Docs)
    }

    /// Delete whatever `node` stands for, after confirmation.
    ///
    /// An image group is unwrapped to its real folder (and any images that
    /// could not be moved into it). Folders go through the category delete
    /// flow. A declined confirmation is `ConfirmationRequired` and nothing is
    /// deleted.
    pub fn delete_entry(&self, node: &DocNode, confirm: &mut dyn Confirm) -> Result<()> {
        match &node.kind {
            NodeKind::Document { .. } | NodeKind::ImageAsset => {
                let request = ConfirmRequest::DeleteFile {
                    path: node.path.clone(),
                };
                if !confirm.confirm(&request) {
                    return Err(DocutreeError::ConfirmationRequired(node.path.clone()));
                }
                self.fs
                    .delete_file(&node.path)
                    .map_err(|e| DocutreeError::DeletePath {
                        path: node.path.clone(),
                        source: e,
                    })?;
                log::debug!("Deleted {}", node.path.display());
                Ok(())
            }
            NodeKind::ImageGroup { count } => self.delete_image_group(node, *count, confirm),
            NodeKind::Category { .. } | NodeKind::PlainFolder => {
                let plan = self.plan_category_delete(&node.path)?;
                self.delete_category(&plan, confirm)
            }
        }
    }

    fn delete_image_group(
        &self,
        group: &DocNode,
        count: usize,
        confirm: &mut dyn Confirm,
    ) -> Result<()> {
        let folder = &group.path;
        let request = ConfirmRequest::DeleteImages {
            folder: folder.clone(),
            count,
        };
        if !confirm.confirm(&request) {
            return Err(DocutreeError::ConfirmationRequired(folder.clone()));
        }

        let delete_error = |path: &Path, e| DocutreeError::DeletePath {
            path: path.to_path_buf(),
            source: e,
        };

        let stragglers: Vec<PathBuf> = group
            .children
            .iter()
            .flatten()
            .map(|image| image.path.clone())
            .filter(|path| !path.starts_with(folder))
            .collect();
        for image in stragglers {
            if self.fs.exists(&image) {
                self.fs
                    .delete_file(&image)
                    .map_err(|e| delete_error(&image, e))?;
            }
        }

        if self.fs.is_dir(folder) {
            self.fs
                .remove_dir_all(folder)
                .map_err(|e| delete_error(folder, e))?;
        }
        log::debug!("Deleted image group {}", folder.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;
    use crate::test_utils::{doc_with_position, sample_project};
    use crate::tree::find_in;

    fn always(answer: bool) -> impl FnMut(&ConfirmRequest) -> bool {
        move |_| answer
    }

    #[test]
    fn test_refresh_builds_one_node_per_root() {
        let fs = sample_project();
        let mut workspace = Workspace::with_config(fs, "site", Config::default());

        let tree = workspace.refresh();
        let labels: Vec<_> = tree.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Docs", "Blog"]);
        assert!(tree.iter().all(|n| n.children.is_some()));
        assert_eq!(workspace.roots(ContentKind::Blog).len(), 1);
    }

    #[test]
    fn test_get_children_lazily() {
        let workspace = Workspace::with_config(sample_project(), "site", Config::default());

        let top = workspace.get_children(None);
        assert_eq!(top.len(), 2);
        assert!(top[0].children.is_none());

        let docs = workspace.get_children(Some(&top[0]));
        let labels: Vec<_> = docs.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A", "Guide"]);

        let guide = workspace.get_children(Some(&docs[2]));
        assert_eq!(guide.len(), 1);
        assert!(workspace.get_children(Some(&docs[0])).is_empty());
    }

    #[test]
    fn test_delete_document_requires_confirmation() {
        let fs = sample_project();
        let mut workspace = Workspace::with_config(fs.clone(), "site", Config::default());
        let tree = workspace.refresh();
        let a = find_in(&tree, Path::new("site/docs/a.md")).unwrap().clone();

        let err = workspace.delete_entry(&a, &mut always(false)).unwrap_err();
        assert!(matches!(err, DocutreeError::ConfirmationRequired(_)));
        assert!(fs.exists(Path::new("site/docs/a.md")));

        workspace.delete_entry(&a, &mut always(true)).unwrap();
        assert!(!fs.exists(Path::new("site/docs/a.md")));
        let tree = workspace.refresh();
        assert!(find_in(&tree, Path::new("site/docs/a.md")).is_none());
    }

    #[test]
    fn test_delete_image_group_targets_real_folder() {
        let fs = InMemoryFileSystem::with_files([
            ("site/docs/a.md", doc_with_position("A", 1)),
            ("site/docs/one.png", "img".to_string()),
            ("site/docs/two.png", "img".to_string()),
        ]);
        let mut workspace = Workspace::with_config(fs.clone(), "site", Config::default());
        let tree = workspace.refresh();
        let docs = &tree[0];
        let group = docs
            .children
            .as_ref()
            .and_then(|c| c.iter().find(|n| matches!(n.kind, NodeKind::ImageGroup { .. })))
            .unwrap()
            .clone();
        assert_eq!(group.path, PathBuf::from("site/docs/images"));

        let mut asked = Vec::new();
        let mut confirm = |request: &ConfirmRequest| {
            asked.push(request.clone());
            true
        };
        workspace.delete_entry(&group, &mut confirm).unwrap();

        assert_eq!(
            asked,
            vec![ConfirmRequest::DeleteImages {
                folder: PathBuf::from("site/docs/images"),
                count: 2
            }]
        );
        assert!(!fs.exists(Path::new("site/docs/images")));
        assert!(fs.exists(Path::new("site/docs/a.md")));
    }
}
