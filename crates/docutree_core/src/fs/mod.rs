//! Filesystem abstraction module.
//!
//! This module provides the `FileSystem` trait for abstracting filesystem operations,
//! allowing the tree model to run against the real disk or an in-memory tree.
//!
//! - [`RealFileSystem`]: maps every call to `std::fs`
//! - [`InMemoryFileSystem`]: a shared in-memory tree, used by tests and by hosts
//!   without direct disk access

mod memory;
#[cfg(not(target_arch = "wasm32"))]
mod native;

pub use memory::InMemoryFileSystem;
#[cfg(not(target_arch = "wasm32"))]
pub use native::RealFileSystem;

use std::io::Result;
use std::path::{Path, PathBuf};

/// Abstraction over filesystem operations.
///
/// Send + Sync required so a host can share one workspace across threads
/// (the watcher thread triggers refreshes).
pub trait FileSystem: Send + Sync {
    /// Reads the file content (for parsing frontmatter and sidecars)
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Overwrites a file, creating it if needed
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Creates a file ONLY if it doesn't exist (for new documents)
    /// Should return an error if file exists.
    fn create_new(&self, path: &Path, content: &str) -> Result<()>;

    /// Deletes a file
    fn delete_file(&self, path: &Path) -> Result<()>;

    /// Checks if a file or directory exists
    fn exists(&self, path: &Path) -> bool;

    /// Checks if a path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Creates a single directory. Errors if it already exists.
    fn create_dir(&self, path: &Path) -> Result<()>;

    /// Creates a directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Move/rename a file or directory from `from` to `to`.
    ///
    /// Errors if the source does not exist or if the destination already exists.
    fn move_path(&self, from: &Path, to: &Path) -> Result<()>;

    /// List the direct children (files and directories) of a directory
    fn list_entries(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Removes an empty directory. Errors if it still has entries.
    fn remove_dir(&self, path: &Path) -> Result<()>;

    /// Removes a directory and everything below it
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// List markdown (`.md`/`.mdx`) files directly inside a directory
    fn list_md_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .list_entries(dir)?
            .into_iter()
            .filter(|p| is_markdown(p) && !self.is_dir(p))
            .collect())
    }

    /// Recursively list markdown files below a directory
    fn list_md_files_recursive(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut all_files = Vec::new();
        for entry in self.list_entries(dir)? {
            if self.is_dir(&entry) {
                if let Ok(nested) = self.list_md_files_recursive(&entry) {
                    all_files.extend(nested);
                }
            } else if is_markdown(&entry) {
                all_files.push(entry);
            }
        }
        Ok(all_files)
    }
}

/// Returns true for `.md` and `.mdx` paths.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("mdx"))
}

// Blanket implementation for references to FileSystem
impl<T: FileSystem> FileSystem for &T {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        (*self).read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        (*self).write_file(path, content)
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        (*self).create_new(path, content)
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        (*self).delete_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (*self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (*self).is_dir(path)
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        (*self).create_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        (*self).create_dir_all(path)
    }

    fn move_path(&self, from: &Path, to: &Path) -> Result<()> {
        (*self).move_path(from, to)
    }

    fn list_entries(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        (*self).list_entries(dir)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        (*self).remove_dir(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        (*self).remove_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("docs/intro.md")));
        assert!(is_markdown(Path::new("docs/intro.MDX")));
        assert!(!is_markdown(Path::new("docs/logo.png")));
        assert!(!is_markdown(Path::new("docs/README")));
    }

    #[test]
    fn test_list_md_files_recursive_through_reference() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("docs/a.md"), "a").unwrap();
        fs.write_file(Path::new("docs/guide/b.mdx"), "b").unwrap();
        fs.write_file(Path::new("docs/guide/logo.png"), "png").unwrap();

        let by_ref = &fs;
        let mut files = by_ref.list_md_files_recursive(Path::new("docs")).unwrap();
        files.sort();
        assert_eq!(
            files,
            vec![PathBuf::from("docs/a.md"), PathBuf::from("docs/guide/b.mdx")]
        );
    }
}
