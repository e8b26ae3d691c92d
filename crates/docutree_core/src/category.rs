//! Category sidecar (`_category_.json`) access.
//!
//! Reads are lenient: Docusaurus accepts several shapes (description at the top
//! level or inside `link`, `link: null`, `link` pointing at a doc), and any of
//! them yields a [`CategoryMeta`]. Writes always produce the normalized shape
//! `{label, position, link: {type: "generated-index", description}}`, replacing
//! whatever was there.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DocutreeError, Result};
use crate::fs::FileSystem;

/// File name of the per-folder sidecar config.
pub const CATEGORY_FILE: &str = "_category_.json";

/// Link type written into every normalized sidecar.
pub const GENERATED_INDEX: &str = "generated-index";

/// Path of the sidecar belonging to `folder`.
pub fn sidecar_path(folder: &Path) -> PathBuf {
    folder.join(CATEGORY_FILE)
}

/// What a sidecar on disk says about its folder. Every field is optional
/// because an unparsable sidecar still marks the folder as a category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMeta {
    pub label: Option<String>,
    pub position: Option<i64>,
    pub description: Option<String>,
}

/// The data a caller supplies to create or overwrite a sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryData {
    pub label: String,
    pub position: i64,
    pub description: String,
}

#[derive(Serialize)]
struct NormalizedLink<'a> {
    #[serde(rename = "type")]
    link_type: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct NormalizedSidecar<'a> {
    label: &'a str,
    position: i64,
    link: NormalizedLink<'a>,
}

/// Interpret parsed sidecar JSON.
fn meta_from_json(value: &Value) -> CategoryMeta {
    let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);
    let position = value.get("position").and_then(|p| match p {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });

    CategoryMeta {
        label: text(value.get("label")),
        position,
        description: text(value.get("link").and_then(|l| l.get("description")))
            .or_else(|| text(value.get("description"))),
    }
}

/// Render the normalized sidecar content for `data`.
///
/// Output is deterministic: same data, same bytes.
pub fn render(data: &CategoryData) -> Result<String> {
    let sidecar = NormalizedSidecar {
        label: &data.label,
        position: data.position,
        link: NormalizedLink {
            link_type: GENERATED_INDEX,
            description: &data.description,
        },
    };
    let mut json = serde_json::to_string_pretty(&sidecar)?;
    json.push('\n');
    Ok(json)
}

/// Read a folder's sidecar.
///
/// - `None`: no sidecar, the folder is a plain folder
/// - `Some(meta)`: a category; unreadable or malformed sidecars are logged and
///   give an empty `CategoryMeta` (unlabeled, unordered)
pub fn read<FS: FileSystem>(fs: &FS, folder: &Path) -> Option<CategoryMeta> {
    let path = sidecar_path(folder);
    if !fs.exists(&path) {
        return None;
    }

    let content = match fs.read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Could not read {}: {}", path.display(), e);
            return Some(CategoryMeta::default());
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(value) if value.is_object() => Some(meta_from_json(&value)),
        Ok(_) => {
            log::warn!("Ignoring {}: not a JSON object", path.display());
            Some(CategoryMeta::default())
        }
        Err(e) => {
            log::warn!("Ignoring malformed {}: {}", path.display(), e);
            Some(CategoryMeta::default())
        }
    }
}

/// Overwrite a folder's sidecar with the normalized shape.
pub fn write<FS: FileSystem>(fs: &FS, folder: &Path, data: &CategoryData) -> Result<()> {
    let path = sidecar_path(folder);
    let content = render(data)?;
    fs.write_file(&path, &content)
        .map_err(|e| DocutreeError::write(path, e))
}

/// Set a folder's position, creating the sidecar if it is absent.
///
/// Label and description are carried forward from the existing sidecar, or
/// derived from the folder name. Returns `Ok(false)` if nothing changed.
pub fn set_position<FS: FileSystem>(fs: &FS, folder: &Path, position: i64) -> Result<bool> {
    let existing = read(fs, folder);
    if existing
        .as_ref()
        .is_some_and(|meta| meta.position == Some(position))
    {
        return Ok(false);
    }

    let meta = existing.unwrap_or_default();
    let data = CategoryData {
        label: meta.label.unwrap_or_else(|| folder_label(folder)),
        position,
        description: meta.description.unwrap_or_default(),
    };
    write(fs, folder, &data)?;
    Ok(true)
}

/// Human label for a folder without a sidecar label: `getting-started` ->
/// `Getting Started`.
pub fn folder_label(folder: &Path) -> String {
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| folder.display().to_string());

    name.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;

    fn data(label: &str, position: i64, description: &str) -> CategoryData {
        CategoryData {
            label: label.to_string(),
            position,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_render_is_normalized() {
        let rendered = render(&data("A", 2, "d")).unwrap();
        assert_eq!(
            rendered,
            "{\n  \"label\": \"A\",\n  \"position\": 2,\n  \"link\": {\n    \"type\": \"generated-index\",\n    \"description\": \"d\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_write_read_rewrite_is_byte_identical() {
        let fs = InMemoryFileSystem::new();
        let folder = Path::new("docs/guide");
        fs.create_dir_all(folder).unwrap();

        write(&fs, folder, &data("A", 2, "d")).unwrap();
        let first = fs.read_to_string(&sidecar_path(folder)).unwrap();

        let meta = read(&fs, folder).unwrap();
        let again = data(
            meta.label.as_deref().unwrap(),
            meta.position.unwrap(),
            meta.description.as_deref().unwrap(),
        );
        write(&fs, folder, &again).unwrap();
        let second = fs.read_to_string(&sidecar_path(folder)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_read_absent_is_plain_folder() {
        let fs = InMemoryFileSystem::new();
        fs.create_dir_all(Path::new("docs/plain")).unwrap();
        assert_eq!(read(&fs, Path::new("docs/plain")), None);
    }

    #[test]
    fn test_read_malformed_is_empty_category() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("docs/broken/_category_.json"), "{ label: ")
            .unwrap();
        assert_eq!(
            read(&fs, Path::new("docs/broken")),
            Some(CategoryMeta::default())
        );
    }

    #[test]
    fn test_read_accepts_other_shapes() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(
            Path::new("docs/api/_category_.json"),
            r#"{"label": "API", "position": "4", "description": "top", "link": null, "collapsed": false}"#,
        )
        .unwrap();

        let meta = read(&fs, Path::new("docs/api")).unwrap();
        assert_eq!(meta.label.as_deref(), Some("API"));
        assert_eq!(meta.position, Some(4));
        assert_eq!(meta.description.as_deref(), Some("top"));
    }

    #[test]
    fn test_set_position_creates_and_carries_forward() {
        let fs = InMemoryFileSystem::new();
        let folder = Path::new("docs/getting-started");
        fs.create_dir_all(folder).unwrap();

        assert!(set_position(&fs, folder, 3).unwrap());
        let meta = read(&fs, folder).unwrap();
        assert_eq!(meta.label.as_deref(), Some("Getting Started"));
        assert_eq!(meta.position, Some(3));

        write(&fs, folder, &data("Start", 3, "Begin here")).unwrap();
        assert!(!set_position(&fs, folder, 3).unwrap());
        assert!(set_position(&fs, folder, 1).unwrap());
        let meta = read(&fs, folder).unwrap();
        assert_eq!(meta.label.as_deref(), Some("Start"));
        assert_eq!(meta.description.as_deref(), Some("Begin here"));
        assert_eq!(meta.position, Some(1));
    }

    #[test]
    fn test_folder_label() {
        assert_eq!(folder_label(Path::new("docs/getting-started")), "Getting Started");
        assert_eq!(folder_label(Path::new("docs/api_reference")), "Api Reference");
        assert_eq!(folder_label(Path::new("docs/FAQ")), "FAQ");
    }
}
