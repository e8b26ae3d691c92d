//! Native filesystem implementation.
//!
//! Only available on non-WASM targets.

use std::fs::{self, OpenOptions};
use std::io::{Error, ErrorKind, Result, Write};
use std::path::{Path, PathBuf};

use super::FileSystem;

#[derive(Clone, Copy, Debug, Default)]
/// This is a simple filesystem implementation that simply maps to std::fs methods
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content)
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        // This atomic check prevents race conditions
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(content.as_bytes())
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
    }

    fn move_path(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.exists() {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("Source not found: {:?}", from),
            ));
        }
        if to.exists() {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("Destination already exists: {:?}", to),
            ));
        }

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::rename(from, to)
    }

    fn list_entries(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            entries.push(entry?.path());
        }
        Ok(entries)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        fs::remove_dir(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_path_refuses_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();

        let err = RealFileSystem.move_path(&a, &b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&b).unwrap(), "b");
    }

    #[test]
    fn test_move_path_moves_directories() {
        let dir = tempfile::tempdir().unwrap();
        let guide = dir.path().join("guide");
        fs::create_dir(&guide).unwrap();
        fs::write(guide.join("intro.md"), "intro").unwrap();

        let target = dir.path().join("nested").join("guide");
        RealFileSystem.move_path(&guide, &target).unwrap();

        assert!(!guide.exists());
        assert!(target.join("intro.md").exists());
    }

    #[test]
    fn test_remove_dir_refuses_non_empty() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("cat");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("x.md"), "x").unwrap();

        assert!(RealFileSystem.remove_dir(&folder).is_err());
        assert!(folder.exists());
    }
}
