//! Frontmatter parsing and manipulation for Docusaurus documents.
//!
//! Two levels are provided:
//! - raw helpers ([`parse`], [`parse_or_empty`], [`serialize`]) that work on an
//!   ordered YAML map and keep unknown keys in their original order
//! - the typed [`DocFrontmatter`] record with the fields the tree model reads
//!   (`id`, `title`, `sidebar_position`) plus blog fields and an `extra` bag
//!
//! Reading for the tree is soft: [`read_metadata`] never fails, it logs and
//! returns empty metadata so the document sorts as unpositioned.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::{DocutreeError, Result};
use crate::fs::FileSystem;

/// Frontmatter key holding a document's sort position.
pub const SIDEBAR_POSITION: &str = "sidebar_position";

/// Result of parsing a markdown file with frontmatter.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// The parsed frontmatter as an ordered map.
    pub frontmatter: IndexMap<String, Value>,
    /// The body content after the frontmatter.
    pub body: String,
}

/// Split content into (frontmatter block, body). `None` if there is no
/// complete `---` delimited block at the start.
fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    // Empty block: closing delimiter immediately follows the opening one
    for close in ["---\n", "---\r\n"] {
        if let Some(body) = rest.strip_prefix(close) {
            return Some(("", body));
        }
    }
    if rest == "---" {
        return Some(("", ""));
    }

    for close in ["\n---\n", "\n---\r\n"] {
        if let Some(idx) = rest.find(close) {
            return Some((&rest[..idx], &rest[idx + close.len()..]));
        }
    }
    rest.strip_suffix("\n---").map(|fm| (fm, ""))
}

fn parse_block(block: &str) -> Result<IndexMap<String, Value>> {
    if block.trim().is_empty() {
        return Ok(IndexMap::new());
    }
    Ok(serde_yaml::from_str(block)?)
}

/// Parse frontmatter and body from markdown content.
///
/// Returns `Ok(None)` if the content has no frontmatter block.
pub fn parse(content: &str) -> Result<Option<ParsedFile>> {
    match split(content) {
        Some((block, body)) => Ok(Some(ParsedFile {
            frontmatter: parse_block(block)?,
            body: body.to_string(),
        })),
        None => Ok(None),
    }
}

/// Parse frontmatter and body, returning empty frontmatter if none exists.
///
/// A block that exists but is not valid YAML is still an error.
pub fn parse_or_empty(content: &str) -> Result<ParsedFile> {
    Ok(parse(content)?.unwrap_or_else(|| ParsedFile {
        frontmatter: IndexMap::new(),
        body: content.to_string(),
    }))
}

/// Serialize frontmatter and body back to markdown content.
pub fn serialize(frontmatter: &IndexMap<String, Value>, body: &str) -> Result<String> {
    if frontmatter.is_empty() {
        return Ok(format!("---\n---\n{}", body));
    }
    let yaml_str = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{}---\n{}", yaml_str, body))
}

/// Extract only the body from markdown content, stripping frontmatter.
///
/// If no frontmatter exists, returns the content unchanged.
pub fn extract_body(content: &str) -> &str {
    split(content).map(|(_, body)| body).unwrap_or(content)
}

// ============================================================================
// Typed frontmatter
// ============================================================================

/// An author or tag reference: either a key into `authors.yml`/`tags.yml`
/// or an inline definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Key(String),
    Inline(IndexMap<String, Value>),
}

impl Reference {
    /// Display text: the key, or the inline `name`/`label`.
    pub fn display(&self) -> String {
        match self {
            Reference::Key(key) => key.clone(),
            Reference::Inline(map) => map
                .get("name")
                .or_else(|| map.get("label"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Known document frontmatter fields plus everything else in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocFrontmatter {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_string_lenient"
    )]
    pub id: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_string_lenient"
    )]
    pub title: Option<String>,

    /// Sort key within the parent folder
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_position_lenient"
    )]
    pub sidebar_position: Option<i64>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_string_lenient"
    )]
    pub slug: Option<String>,

    /// Blog publication date, kept as written
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_string_lenient"
    )]
    pub date: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_references"
    )]
    pub authors: Vec<Reference>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_references"
    )]
    pub tags: Vec<Reference>,

    /// Additional frontmatter properties, in file order
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl DocFrontmatter {
    /// Returns true if any blog-typical field is present.
    pub fn looks_like_blog_post(&self) -> bool {
        self.date.is_some()
            || !self.authors.is_empty()
            || !self.tags.is_empty()
            || self.extra.contains_key("author")
    }
}

/// Deserializes a value that should be a string, but may be another scalar
/// or a sequence (first string element wins).
fn deserialize_string_lenient<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Sequence(seq)) => seq.into_iter().find_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        }),
        _ => None,
    })
}

/// Read a position from an integer, an integer-valued float, or a numeric string.
pub fn position_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn deserialize_position_lenient<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(position_from_value))
}

fn deserialize_references<'de, D>(deserializer: D) -> std::result::Result<Vec<Reference>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    let to_reference = |v: Value| match v {
        Value::String(s) => Some(Reference::Key(s)),
        Value::Mapping(_) => serde_yaml::from_value(v).ok().map(Reference::Inline),
        _ => None,
    };
    Ok(match value {
        Some(Value::Sequence(seq)) => seq.into_iter().filter_map(to_reference).collect(),
        Some(other) => to_reference(other).into_iter().collect(),
        None => Vec::new(),
    })
}

/// A document read from disk: typed frontmatter and untouched body.
#[derive(Debug, Clone)]
pub struct Document {
    pub frontmatter: DocFrontmatter,
    pub body: String,
}

/// Parse a document's content into typed frontmatter and body.
pub fn parse_document(content: &str) -> Result<Document> {
    match split(content) {
        Some((block, body)) => {
            let frontmatter = if block.trim().is_empty() {
                DocFrontmatter::default()
            } else {
                serde_yaml::from_str(block)?
            };
            Ok(Document {
                frontmatter,
                body: body.to_string(),
            })
        }
        None => Ok(Document {
            frontmatter: DocFrontmatter::default(),
            body: content.to_string(),
        }),
    }
}

/// Read a document from disk.
pub fn read_document<FS: FileSystem>(fs: &FS, path: &Path) -> Result<Document> {
    let content = fs
        .read_to_string(path)
        .map_err(|e| DocutreeError::read(path, e))?;
    parse_document(&content)
}

/// Read a document's metadata for the tree, never failing.
///
/// Unreadable files and malformed blocks are logged and produce empty
/// metadata, the same as a file with no `sidebar_position`.
pub fn read_metadata<FS: FileSystem>(fs: &FS, path: &Path) -> DocFrontmatter {
    match read_document(fs, path) {
        Ok(doc) => doc.frontmatter,
        Err(e) => {
            log::warn!("Ignoring frontmatter of {}: {}", path.display(), e);
            DocFrontmatter::default()
        }
    }
}

/// Write a document: serialized metadata block followed by `body` as given.
pub fn write_document<FS: FileSystem>(
    fs: &FS,
    path: &Path,
    frontmatter: &DocFrontmatter,
    body: &str,
) -> Result<()> {
    let content = render_document(frontmatter, body)?;
    fs.write_file(path, &content)
        .map_err(|e| DocutreeError::write(path, e))
}

/// Render typed frontmatter and body into file content.
pub fn render_document(frontmatter: &DocFrontmatter, body: &str) -> Result<String> {
    let value = serde_yaml::to_value(frontmatter)?;
    let map: IndexMap<String, Value> = serde_yaml::from_value(value)?;
    serialize(&map, body)
}

/// Set `sidebar_position` in place, keeping every other key and the body.
///
/// Returns `Ok(false)` without writing if the file already has that position.
/// A file whose block is not valid YAML is left alone and reported as an error.
pub fn set_sidebar_position<FS: FileSystem>(fs: &FS, path: &Path, position: i64) -> Result<bool> {
    let content = fs
        .read_to_string(path)
        .map_err(|e| DocutreeError::read(path, e))?;
    let mut parsed = parse_or_empty(&content)?;

    let current = parsed
        .frontmatter
        .get(SIDEBAR_POSITION)
        .and_then(position_from_value);
    if current == Some(position) {
        return Ok(false);
    }

    parsed
        .frontmatter
        .insert(SIDEBAR_POSITION.to_string(), Value::from(position));
    let updated = serialize(&parsed.frontmatter, &parsed.body)?;
    fs.write_file(path, &updated)
        .map_err(|e| DocutreeError::write(path, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;

    #[test]
    fn test_parse_valid_frontmatter() {
        let content = "---\ntitle: Test\n---\n\nBody content";
        let parsed = parse(content).unwrap().unwrap();
        assert_eq!(parsed.frontmatter.get("title").unwrap().as_str(), Some("Test"));
        assert_eq!(parsed.body, "\nBody content");
    }

    #[test]
    fn test_parse_no_frontmatter() {
        assert!(parse("Just body content").unwrap().is_none());
        let parsed = parse_or_empty("Just body content").unwrap();
        assert!(parsed.frontmatter.is_empty());
        assert_eq!(parsed.body, "Just body content");
    }

    #[test]
    fn test_parse_empty_block_and_eof_delimiter() {
        let parsed = parse("---\n---\nBody").unwrap().unwrap();
        assert!(parsed.frontmatter.is_empty());
        assert_eq!(parsed.body, "Body");

        let parsed = parse("---\ntitle: T\n---").unwrap().unwrap();
        assert_eq!(parsed.frontmatter.len(), 1);
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn test_extract_body() {
        assert_eq!(extract_body("---\ntitle: Test\n---\nBody"), "Body");
        assert_eq!(extract_body("No block"), "No block");
    }

    #[test]
    fn test_typed_fields_are_lenient() {
        let doc = parse_document(
            "---\nid: intro\ntitle: 42\nsidebar_position: \"3\"\nauthors: jane\ntags: [a, b]\nhide_table_of_contents: true\n---\nBody",
        )
        .unwrap();
        let fm = doc.frontmatter;
        assert_eq!(fm.id.as_deref(), Some("intro"));
        assert_eq!(fm.title.as_deref(), Some("42"));
        assert_eq!(fm.sidebar_position, Some(3));
        assert_eq!(fm.authors, vec![Reference::Key("jane".to_string())]);
        assert_eq!(fm.tags.len(), 2);
        assert_eq!(fm.extra.get("hide_table_of_contents"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_non_integer_position_is_unpositioned() {
        let doc = parse_document("---\nsidebar_position: 2.5\n---\n").unwrap();
        assert_eq!(doc.frontmatter.sidebar_position, None);

        let doc = parse_document("---\nsidebar_position: 4.0\n---\n").unwrap();
        assert_eq!(doc.frontmatter.sidebar_position, Some(4));
    }

    #[test]
    fn test_inline_authors_survive_rewrite() {
        let doc = parse_document(
            "---\nauthors:\n  - name: Jane\n    url: https://example.com\n---\nBody",
        )
        .unwrap();
        assert_eq!(doc.frontmatter.authors[0].display(), "Jane");

        let rendered = render_document(&doc.frontmatter, &doc.body).unwrap();
        let again = parse_document(&rendered).unwrap();
        assert_eq!(again.frontmatter, doc.frontmatter);
    }

    #[test]
    fn test_round_trip_keeps_fields_and_body() {
        let fs = InMemoryFileSystem::new();
        let path = Path::new("docs/x.md");
        let body = "\n# Heading\n\nSome *body*\r\nwith --- dashes\n";
        let fm = DocFrontmatter {
            sidebar_position: Some(5),
            title: Some("X".to_string()),
            ..Default::default()
        };

        write_document(&fs, path, &fm, body).unwrap();
        let doc = read_document(&fs, path).unwrap();

        assert_eq!(doc.frontmatter.sidebar_position, Some(5));
        assert_eq!(doc.frontmatter.title.as_deref(), Some("X"));
        assert_eq!(doc.body, body);
    }

    #[test]
    fn test_read_metadata_is_soft() {
        let fs = InMemoryFileSystem::new();
        let path = Path::new("docs/bad.md");
        fs.write_file(path, "---\ntitle: [unclosed\n---\nBody").unwrap();

        assert_eq!(read_metadata(&fs, path), DocFrontmatter::default());
        assert_eq!(
            read_metadata(&fs, Path::new("docs/missing.md")),
            DocFrontmatter::default()
        );
    }

    #[test]
    fn test_set_sidebar_position_keeps_other_keys_in_order() {
        let fs = InMemoryFileSystem::new();
        let path = Path::new("docs/a.md");
        fs.write_file(path, "---\ntitle: A\nsidebar_position: 7\ndescription: d\n---\nBody\n")
            .unwrap();

        assert!(set_sidebar_position(&fs, path, 1).unwrap());
        let content = fs.read_to_string(path).unwrap();
        assert_eq!(
            content,
            "---\ntitle: A\nsidebar_position: 1\ndescription: d\n---\nBody\n"
        );

        // Same value again is a no-op
        assert!(!set_sidebar_position(&fs, path, 1).unwrap());
    }

    #[test]
    fn test_set_sidebar_position_adds_block_when_missing() {
        let fs = InMemoryFileSystem::new();
        let path = Path::new("docs/plain.md");
        fs.write_file(path, "# Plain\n").unwrap();

        set_sidebar_position(&fs, path, 2).unwrap();
        assert_eq!(
            fs.read_to_string(path).unwrap(),
            "---\nsidebar_position: 2\n---\n# Plain\n"
        );
    }

    #[test]
    fn test_set_sidebar_position_refuses_malformed_block() {
        let fs = InMemoryFileSystem::new();
        let path = Path::new("docs/bad.md");
        let original = "---\ntitle: [unclosed\n---\nBody";
        fs.write_file(path, original).unwrap();

        assert!(set_sidebar_position(&fs, path, 1).is_err());
        assert_eq!(fs.read_to_string(path).unwrap(), original);
    }
}
