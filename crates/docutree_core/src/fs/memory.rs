//! In-memory filesystem, available on all targets.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Error, ErrorKind, Result};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::FileSystem;

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

/// An in-memory filesystem implementation.
///
/// Clones share the same underlying tree, so a test can hand one clone to a
/// `Workspace` and inspect the result through another.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFileSystem {
    tree: Arc<RwLock<Tree>>,
}

impl InMemoryFileSystem {
    /// Create a new empty in-memory filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filesystem pre-populated with files
    pub fn with_files<P: Into<PathBuf>>(entries: impl IntoIterator<Item = (P, String)>) -> Self {
        let fs = Self::new();
        {
            let mut tree = fs.write();
            for (path, content) in entries {
                let path = normalize_path(&path.into());
                add_parents(&mut tree.directories, &path);
                tree.files.insert(path, content);
            }
        }
        fs
    }

    /// Get a list of all file paths in the filesystem
    pub fn list_all_files(&self) -> Vec<PathBuf> {
        self.read().files.keys().cloned().collect()
    }

    /// Clear all files and directories
    pub fn clear(&self) {
        let mut tree = self.write();
        tree.files.clear();
        tree.directories.clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Remove `.` and `..` components so equivalent spellings share a key.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                components.pop();
            }
            c => components.push(c),
        }
    }
    components.iter().collect()
}

fn add_parents(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = path;
    while let Some(parent) = current.parent() {
        if parent.as_os_str().is_empty() {
            break;
        }
        directories.insert(parent.to_path_buf());
        current = parent;
    }
}

fn not_found(path: &Path) -> Error {
    Error::new(ErrorKind::NotFound, format!("Not found: {:?}", path))
}

fn already_exists(path: &Path) -> Error {
    Error::new(
        ErrorKind::AlreadyExists,
        format!("Already exists: {:?}", path),
    )
}

impl Tree {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn parent_missing(&self, path: &Path) -> bool {
        path.parent()
            .is_some_and(|p| !p.as_os_str().is_empty() && !self.directories.contains(p))
    }
}

impl FileSystem for InMemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let normalized = normalize_path(path);
        self.read()
            .files
            .get(&normalized)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let normalized = normalize_path(path);
        let mut tree = self.write();
        if tree.directories.contains(&normalized) {
            return Err(Error::new(
                ErrorKind::IsADirectory,
                format!("Is a directory: {:?}", path),
            ));
        }
        add_parents(&mut tree.directories, &normalized);
        tree.files.insert(normalized, content.to_string());
        Ok(())
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        let normalized = normalize_path(path);
        let mut tree = self.write();
        if tree.exists(&normalized) {
            return Err(already_exists(path));
        }
        add_parents(&mut tree.directories, &normalized);
        tree.files.insert(normalized, content.to_string());
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        let normalized = normalize_path(path);
        self.write()
            .files
            .remove(&normalized)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.read().exists(&normalize_path(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read().directories.contains(&normalize_path(path))
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        let normalized = normalize_path(path);
        let mut tree = self.write();
        if tree.exists(&normalized) {
            return Err(already_exists(path));
        }
        if tree.parent_missing(&normalized) {
            return Err(not_found(path));
        }
        tree.directories.insert(normalized);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let normalized = normalize_path(path);
        let mut tree = self.write();
        if tree.files.contains_key(&normalized) {
            return Err(already_exists(path));
        }
        add_parents(&mut tree.directories, &normalized);
        if !normalized.as_os_str().is_empty() {
            tree.directories.insert(normalized);
        }
        Ok(())
    }

    fn move_path(&self, from: &Path, to: &Path) -> Result<()> {
        let from_norm = normalize_path(from);
        let to_norm = normalize_path(to);
        let mut tree = self.write();

        if !tree.exists(&from_norm) {
            return Err(not_found(from));
        }
        if tree.exists(&to_norm) {
            return Err(already_exists(to));
        }
        if to_norm.starts_with(&from_norm) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Cannot move {:?} into itself", from),
            ));
        }

        add_parents(&mut tree.directories, &to_norm);

        if let Some(content) = tree.files.remove(&from_norm) {
            tree.files.insert(to_norm, content);
            return Ok(());
        }

        // Directory move: relocate every file and subdirectory under the prefix
        let moved_files: Vec<PathBuf> = tree
            .files
            .keys()
            .filter(|p| p.starts_with(&from_norm))
            .cloned()
            .collect();
        for old in moved_files {
            if let (Some(content), Ok(rel)) = (tree.files.remove(&old), old.strip_prefix(&from_norm))
            {
                tree.files.insert(to_norm.join(rel), content);
            }
        }

        let moved_dirs: Vec<PathBuf> = tree
            .directories
            .iter()
            .filter(|d| d.starts_with(&from_norm))
            .cloned()
            .collect();
        for old in moved_dirs {
            tree.directories.remove(&old);
            if let Ok(rel) = old.strip_prefix(&from_norm) {
                tree.directories.insert(to_norm.join(rel));
            }
        }

        Ok(())
    }

    fn list_entries(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let normalized = normalize_path(dir);
        let tree = self.read();
        if !tree.directories.contains(&normalized) {
            return Err(not_found(dir));
        }

        let is_child = |p: &&PathBuf| p.parent() == Some(normalized.as_path());
        let mut entries: Vec<PathBuf> = tree.directories.iter().filter(is_child).cloned().collect();
        entries.extend(tree.files.keys().filter(is_child).cloned());
        Ok(entries)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        let normalized = normalize_path(path);
        let mut tree = self.write();
        if !tree.directories.contains(&normalized) {
            return Err(not_found(path));
        }
        let has_entries = tree
            .files
            .keys()
            .chain(tree.directories.iter())
            .any(|p| p.parent() == Some(normalized.as_path()));
        if has_entries {
            return Err(Error::new(
                ErrorKind::DirectoryNotEmpty,
                format!("Directory not empty: {:?}", path),
            ));
        }
        tree.directories.remove(&normalized);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let normalized = normalize_path(path);
        let mut tree = self.write();
        if !tree.directories.contains(&normalized) {
            return Err(not_found(path));
        }
        tree.files.retain(|p, _| !p.starts_with(&normalized));
        tree.directories.retain(|d| !d.starts_with(&normalized));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_fs_basic_operations() {
        let fs = InMemoryFileSystem::new();

        fs.write_file(Path::new("test.md"), "Hello, World!").unwrap();
        assert_eq!(
            fs.read_to_string(Path::new("test.md")).unwrap(),
            "Hello, World!"
        );

        assert!(fs.exists(Path::new("test.md")));
        assert!(!fs.exists(Path::new("nonexistent.md")));

        fs.delete_file(Path::new("test.md")).unwrap();
        assert!(!fs.exists(Path::new("test.md")));
    }

    #[test]
    fn test_in_memory_fs_create_new() {
        let fs = InMemoryFileSystem::new();

        fs.create_new(Path::new("new.md"), "Content").unwrap();
        assert_eq!(fs.read_to_string(Path::new("new.md")).unwrap(), "Content");

        let result = fs.create_new(Path::new("new.md"), "Other content");
        assert!(result.is_err());
    }

    #[test]
    fn test_in_memory_fs_directories() {
        let fs = InMemoryFileSystem::new();

        fs.write_file(Path::new("a/b/c/file.md"), "Content").unwrap();

        assert!(fs.is_dir(Path::new("a")));
        assert!(fs.is_dir(Path::new("a/b")));
        assert!(fs.is_dir(Path::new("a/b/c")));
        assert!(fs.exists(Path::new("a/b/c/file.md")));
    }

    #[test]
    fn test_list_entries_includes_directories() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("docs/a.md"), "a").unwrap();
        fs.create_dir_all(Path::new("docs/empty")).unwrap();
        fs.write_file(Path::new("docs/guide/b.md"), "b").unwrap();

        let mut entries = fs.list_entries(Path::new("docs")).unwrap();
        entries.sort();
        assert_eq!(
            entries,
            vec![
                PathBuf::from("docs/a.md"),
                PathBuf::from("docs/empty"),
                PathBuf::from("docs/guide"),
            ]
        );
    }

    #[test]
    fn test_create_dir_requires_parent_and_absence() {
        let fs = InMemoryFileSystem::new();
        assert!(fs.create_dir(Path::new("missing/child")).is_err());

        fs.create_dir(Path::new("docs")).unwrap();
        fs.create_dir(Path::new("docs/cat")).unwrap();
        assert!(fs.create_dir(Path::new("docs/cat")).is_err());
    }

    #[test]
    fn test_move_directory_relocates_contents() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("docs/guide/intro.md"), "intro").unwrap();
        fs.write_file(Path::new("docs/guide/deep/x.md"), "x").unwrap();
        fs.create_dir_all(Path::new("docs/other")).unwrap();

        fs.move_path(Path::new("docs/guide"), Path::new("docs/other/guide"))
            .unwrap();

        assert!(!fs.exists(Path::new("docs/guide")));
        assert!(fs.is_dir(Path::new("docs/other/guide/deep")));
        assert_eq!(
            fs.read_to_string(Path::new("docs/other/guide/intro.md")).unwrap(),
            "intro"
        );
    }

    #[test]
    fn test_move_into_itself_is_rejected() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("docs/guide/intro.md"), "intro").unwrap();

        let err = fs
            .move_path(Path::new("docs/guide"), Path::new("docs/guide/inner"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_remove_dir_only_when_empty() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("docs/cat/a.md"), "a").unwrap();

        assert!(fs.remove_dir(Path::new("docs/cat")).is_err());
        fs.remove_dir_all(Path::new("docs/cat")).unwrap();
        assert!(!fs.exists(Path::new("docs/cat")));
        assert!(!fs.exists(Path::new("docs/cat/a.md")));
        assert!(fs.is_dir(Path::new("docs")));
    }

    #[test]
    fn test_in_memory_fs_path_normalization() {
        let fs = InMemoryFileSystem::new();

        fs.write_file(Path::new("dir/file.md"), "Content").unwrap();

        assert!(fs.exists(Path::new("dir/file.md")));
        assert!(fs.exists(Path::new("dir/./file.md")));
        assert!(fs.exists(Path::new("dir/subdir/../file.md")));
    }
}
