//! Test fixtures shared by the unit tests.

use std::path::Path;

use crate::category::{self, CategoryData};
use crate::frontmatter;
use crate::fs::{FileSystem, InMemoryFileSystem, is_markdown};

/// A document with a title and `sidebar_position`.
pub fn doc_with_position(title: &str, position: i64) -> String {
    format!("---\ntitle: {}\nsidebar_position: {}\n---\n# {}\n", title, position, title)
}

/// Normalized sidecar content.
pub fn category_json(label: &str, position: i64, description: &str) -> String {
    category::render(&CategoryData {
        label: label.to_string(),
        position,
        description: description.to_string(),
    })
    .unwrap()
}

/// A small project with a docs root and a blog root:
///
/// ```text
/// site/docs/a.md          sidebar_position 2
/// site/docs/b.md          sidebar_position 1
/// site/docs/guide/        category, position 3
/// site/docs/guide/intro.md
/// site/blog/2024-01-01-hello.md
/// ```
pub fn sample_project() -> InMemoryFileSystem {
    InMemoryFileSystem::with_files([
        ("site/docs/a.md", doc_with_position("A", 2)),
        ("site/docs/b.md", doc_with_position("B", 1)),
        ("site/docs/guide/_category_.json", category_json("Guide", 3, "")),
        ("site/docs/guide/intro.md", "# Intro\n".to_string()),
        (
            "site/blog/2024-01-01-hello.md",
            "---\ntitle: Hello\ndate: 2024-01-01\n---\nHi\n".to_string(),
        ),
    ])
}

/// `(name, position)` for every positioned entry of `folder`, by position.
pub fn positions_in(fs: &InMemoryFileSystem, folder: &str) -> Vec<(String, i64)> {
    let mut positions: Vec<(String, i64)> = fs
        .list_entries(Path::new(folder))
        .unwrap()
        .into_iter()
        .filter_map(|path| {
            let position = if fs.is_dir(&path) {
                category::read(fs, &path).and_then(|meta| meta.position)
            } else if is_markdown(&path) {
                frontmatter::read_metadata(fs, &path).sidebar_position
            } else {
                None
            }?;
            let name = path.file_name()?.to_string_lossy().to_string();
            Some((name, position))
        })
        .collect();
    positions.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    positions
}
