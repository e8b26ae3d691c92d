//! Category create, edit and delete.
//!
//! Creation is a small state machine so the host can ask the user for the
//! label and description between creating the folder and writing the
//! sidecar:
//!
//! ```text
//! Named -> FolderCreated -> AwaitingUserConfirmation -> Committed
//!                                                    \-> Cancelled
//! ```
//!
//! [`Workspace::begin_category`] runs the first two steps and hands back a
//! [`CategoryDraft`] waiting for the user.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::category::{self, CategoryData};
use crate::error::{DocutreeError, Result};
use crate::fs::FileSystem;

use super::{Confirm, ConfirmRequest, Workspace};

/// Check a new category's folder name: letters, digits, `-` and `_` only.
pub fn validate_category_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DocutreeError::InvalidCategoryName(name.to_string()))
    }
}

/// Where a category draft is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Named,
    FolderCreated,
    AwaitingUserConfirmation,
    Committed,
    Cancelled,
}

impl DraftState {
    fn can_advance_to(self, next: DraftState) -> bool {
        matches!(
            (self, next),
            (DraftState::Named, DraftState::FolderCreated)
                | (DraftState::FolderCreated, DraftState::AwaitingUserConfirmation)
                | (DraftState::AwaitingUserConfirmation, DraftState::Committed)
                | (DraftState::AwaitingUserConfirmation, DraftState::Cancelled)
        )
    }
}

impl fmt::Display for DraftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DraftState::Named => "named",
            DraftState::FolderCreated => "folder created",
            DraftState::AwaitingUserConfirmation => "awaiting confirmation",
            DraftState::Committed => "committed",
            DraftState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// A category whose folder exists but whose sidecar is not written yet.
#[derive(Debug)]
pub struct CategoryDraft<'a, FS: FileSystem> {
    fs: &'a FS,
    path: PathBuf,
    state: DraftState,
    proposed: CategoryData,
}

impl<'a, FS: FileSystem> CategoryDraft<'a, FS> {
    /// The new category's folder.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> DraftState {
        self.state
    }

    /// Defaults to offer the user: label from the name, next free position.
    pub fn proposed(&self) -> &CategoryData {
        &self.proposed
    }

    fn advance(&mut self, next: DraftState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(DocutreeError::InvalidTransition {
                path: self.path.clone(),
                state: self.state.to_string(),
            });
        }
        self.state = next;
        Ok(())
    }

    fn ensure_awaiting(&self) -> Result<()> {
        if self.state == DraftState::AwaitingUserConfirmation {
            Ok(())
        } else {
            Err(DocutreeError::InvalidTransition {
                path: self.path.clone(),
                state: self.state.to_string(),
            })
        }
    }

    /// Write the sidecar with the user's data.
    ///
    /// If the write fails the draft stays awaiting confirmation, so the user
    /// can retry or cancel.
    pub fn commit(&mut self, data: CategoryData) -> Result<PathBuf> {
        self.ensure_awaiting()?;
        category::write(self.fs, &self.path, &data)?;
        self.advance(DraftState::Committed)?;
        log::debug!("Created category {}", self.path.display());
        Ok(self.path.clone())
    }

    /// Abandon the draft, removing the folder if it is still empty.
    ///
    /// Returns whether the folder was removed. A folder that gained entries in
    /// the meantime is left alone.
    pub fn cancel(&mut self) -> Result<bool> {
        self.ensure_awaiting()?;
        let empty = self
            .fs
            .list_entries(&self.path)
            .map(|entries| entries.is_empty())
            .unwrap_or(false);

        let removed = if empty {
            self.fs
                .remove_dir(&self.path)
                .map_err(|e| DocutreeError::DeletePath {
                    path: self.path.clone(),
                    source: e,
                })?;
            true
        } else {
            log::warn!(
                "Keeping {}: it is no longer empty",
                self.path.display()
            );
            false
        };
        self.advance(DraftState::Cancelled)?;
        Ok(removed)
    }
}

/// What deleting a folder involves, computed before asking the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    pub path: PathBuf,
    /// Markdown files anywhere below the folder
    pub document_count: usize,
    pub needs_second_confirmation: bool,
}

impl<FS: FileSystem> Workspace<FS> {
    /// Position for a new category in `parent`: one past the highest category
    /// position there. Document positions are not considered.
    pub fn next_category_position(&self, parent: &Path) -> i64 {
        self.builder_for(parent)
            .children(parent)
            .iter()
            .filter(|node| node.is_category())
            .filter_map(|node| node.position)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Validate `name`, create the folder, and wait for the user's data.
    pub fn begin_category(&self, parent: &Path, name: &str) -> Result<CategoryDraft<'_, FS>> {
        validate_category_name(name)?;
        if !self.fs.is_dir(parent) {
            return Err(DocutreeError::NotAFolder(parent.to_path_buf()));
        }
        let path = parent.join(name);
        if self.fs.exists(&path) {
            return Err(DocutreeError::AlreadyExists(path));
        }

        let mut draft = CategoryDraft {
            fs: &self.fs,
            path,
            state: DraftState::Named,
            proposed: CategoryData {
                label: category::folder_label(Path::new(name)),
                position: self.next_category_position(parent),
                description: String::new(),
            },
        };

        self.fs
            .create_dir(&draft.path)
            .map_err(|e| DocutreeError::CreateDir {
                path: draft.path.clone(),
                source: e,
            })?;
        draft.advance(DraftState::FolderCreated)?;
        draft.advance(DraftState::AwaitingUserConfirmation)?;
        Ok(draft)
    }

    /// Create a category in one step.
    ///
    /// `data` of `None` takes the proposed defaults. If the sidecar cannot be
    /// written, the empty folder is removed again and the error returned.
    pub fn create_category(
        &self,
        parent: &Path,
        name: &str,
        data: Option<CategoryData>,
    ) -> Result<PathBuf> {
        let mut draft = self.begin_category(parent, name)?;
        let data = data.unwrap_or_else(|| draft.proposed().clone());
        match draft.commit(data) {
            Ok(path) => Ok(path),
            Err(e) => {
                if let Err(cleanup) = draft.cancel() {
                    log::warn!("Could not clean up {}: {}", draft.path().display(), cleanup);
                }
                Err(e)
            }
        }
    }

    /// Current data of a category, with derived defaults for anything the
    /// sidecar does not say (or when it cannot be parsed).
    pub fn load_category(&self, path: &Path) -> Result<CategoryData> {
        if !self.fs.is_dir(path) {
            return Err(DocutreeError::NotAFolder(path.to_path_buf()));
        }
        let meta = category::read(&self.fs, path).unwrap_or_default();
        let position = match meta.position {
            Some(position) => position,
            None => path
                .parent()
                .map(|parent| self.next_category_position(parent))
                .unwrap_or(1),
        };
        Ok(CategoryData {
            label: meta.label.unwrap_or_else(|| category::folder_label(path)),
            position,
            description: meta.description.unwrap_or_default(),
        })
    }

    /// Overwrite a category's sidecar with `data`.
    pub fn edit_category(&self, path: &Path, data: &CategoryData) -> Result<()> {
        if !self.fs.is_dir(path) {
            return Err(DocutreeError::NotAFolder(path.to_path_buf()));
        }
        category::write(&self.fs, path, data)
    }

    /// Inspect a folder before deleting it.
    pub fn plan_category_delete(&self, path: &Path) -> Result<DeletePlan> {
        if !self.fs.is_dir(path) {
            return Err(DocutreeError::NotAFolder(path.to_path_buf()));
        }
        let document_count = self.builder().count_documents(path);
        Ok(DeletePlan {
            path: path.to_path_buf(),
            document_count,
            needs_second_confirmation: document_count > 0,
        })
    }

    /// Recursively delete a folder after the confirmations the plan calls for.
    ///
    /// Documents added since the plan was made still trigger the second
    /// confirmation.
    pub fn delete_category(&self, plan: &DeletePlan, confirm: &mut dyn Confirm) -> Result<()> {
        let path = &plan.path;
        if !confirm.confirm(&ConfirmRequest::DeleteFolder { path: path.clone() }) {
            return Err(DocutreeError::ConfirmationRequired(path.clone()));
        }

        let document_count = self.builder().count_documents(path).max(plan.document_count);
        if (plan.needs_second_confirmation || document_count > 0)
            && !confirm.confirm(&ConfirmRequest::DeleteFolderWithDocuments {
                path: path.clone(),
                document_count,
            })
        {
            return Err(DocutreeError::ConfirmationRequired(path.clone()));
        }

        self.fs
            .remove_dir_all(path)
            .map_err(|e| DocutreeError::DeletePath {
                path: path.clone(),
                source: e,
            })?;
        log::debug!("Deleted {}", path.display());
        Ok(())
    }
}
