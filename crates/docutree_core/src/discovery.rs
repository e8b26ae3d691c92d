//! Content discovery: locating the documentation and blog roots of a project.
//!
//! Sources are tried in priority order and the first one that yields at least
//! one existing folder wins, separately for docs and for blog:
//!
//! 1. plugin and preset declarations in `docusaurus.config.*`
//! 2. conventional folder names at the project root
//! 3. a scan of top-level folders that hold markdown
//! 4. docs only: the project root itself
//!
//! Versioned docs (`versioned_docs/version-*`) are always added as extra docs
//! roots. Nothing in here fails: unreadable or unrecognized configuration is
//! logged and discovery moves on to the next tier.

use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use ts_rs::TS;

use crate::category::folder_label;
use crate::config::Config;
use crate::error::Result;
use crate::frontmatter;
use crate::fs::FileSystem;

/// Project configuration files, in lookup order.
pub const CONFIG_FILES: [&str; 4] = [
    "docusaurus.config.js",
    "docusaurus.config.ts",
    "docusaurus.config.mjs",
    "docusaurus.config.cjs",
];

/// Folder holding one sub-folder per released docs version.
pub const VERSIONED_DOCS_DIR: &str = "versioned_docs";

/// The two content types a project serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ContentKind {
    Docs,
    Blog,
}

impl ContentKind {
    /// Folder Docusaurus uses when a declaration has no `path`.
    pub fn default_folder(self) -> &'static str {
        match self {
            ContentKind::Docs => "docs",
            ContentKind::Blog => "blog",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_folder())
    }
}

/// Which discovery tier produced a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum DiscoverySource {
    Config,
    Convention,
    Version,
    Scan,
    Fallback,
}

/// A discovered top-level content folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ContentRoot {
    pub kind: ContentKind,
    pub path: PathBuf,
    /// Plugin instance id, when declared
    pub id: Option<String>,
    pub route_base_path: Option<String>,
    pub label: String,
    pub source: DiscoverySource,
}

/// Every root found for a project, docs and blog kept apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveredRoots {
    pub docs: Vec<ContentRoot>,
    pub blog: Vec<ContentRoot>,
}

impl DiscoveredRoots {
    /// Roots of one content type.
    pub fn get(&self, kind: ContentKind) -> &[ContentRoot] {
        match kind {
            ContentKind::Docs => &self.docs,
            ContentKind::Blog => &self.blog,
        }
    }

    /// Docs roots first, then blog roots.
    pub fn iter(&self) -> impl Iterator<Item = &ContentRoot> {
        self.docs.iter().chain(self.blog.iter())
    }

    /// The root whose folder is exactly `path`.
    pub fn root_at(&self, path: &Path) -> Option<&ContentRoot> {
        self.iter().find(|root| root.path == path)
    }

    /// The innermost root containing `path`.
    pub fn root_containing(&self, path: &Path) -> Option<&ContentRoot> {
        self.iter()
            .filter(|root| path.starts_with(&root.path))
            .max_by_key(|root| root.path.components().count())
    }
}

// ============================================================================
// Configuration scanning
// ============================================================================

/// Where in the config file a declaration was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationOrigin {
    /// `['@docusaurus/plugin-content-docs', { ... }]`
    Plugin,
    /// `docs: { ... }` inside the classic preset
    Preset,
}

/// One content plugin instance declared in the project config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDeclaration {
    pub kind: ContentKind,
    pub origin: DeclarationOrigin,
    pub path: Option<String>,
    pub id: Option<String>,
    pub route_base_path: Option<String>,
}

/// Extracts content declarations from project config source text.
///
/// Implementations are best-effort: unrecognized shapes yield no declarations.
pub trait ConfigScanner {
    /// All declarations found in `source`, in source order.
    fn scan(&self, source: &str) -> Vec<ConfigDeclaration>;
}

/// A [`ConfigScanner`] built on regular expressions and brace matching.
///
/// Comments are blanked first, then plugin tuples and preset blocks are
/// located, and only fields at the top level of each options object are read.
#[derive(Debug, Clone)]
pub struct PatternConfigScanner {
    plugin: Regex,
    presets: Regex,
    preset_key: Regex,
    field: Regex,
}

impl PatternConfigScanner {
    /// Compile the scanner's patterns.
    pub fn new() -> Result<Self> {
        Ok(Self {
            plugin: Regex::new(r#"content-(docs|blog)['"`]\s*\)?\s*,\s*(?:\(\s*)?\{"#)?,
            presets: Regex::new(r"\bpresets\s*:\s*\[")?,
            preset_key: Regex::new(r"\b(docs|blog)\s*:\s*(?:\(\s*)?(\{|false\b)")?,
            field: Regex::new(r#"\b(path|id|routeBasePath)\s*:\s*['"`]([^'"`]*)['"`]"#)?,
        })
    }

    fn declaration(&self, kind: ContentKind, origin: DeclarationOrigin, block: &str) -> ConfigDeclaration {
        let mut declaration = ConfigDeclaration {
            kind,
            origin,
            path: None,
            id: None,
            route_base_path: None,
        };

        let fields = top_level(block);
        for caps in self.field.captures_iter(&fields) {
            let value = Some(caps[2].to_string());
            match &caps[1] {
                "path" => declaration.path = value,
                "id" => declaration.id = value,
                _ => declaration.route_base_path = value,
            }
        }
        declaration
    }
}

fn kind_from(name: &str) -> ContentKind {
    if name == "blog" {
        ContentKind::Blog
    } else {
        ContentKind::Docs
    }
}

impl ConfigScanner for PatternConfigScanner {
    fn scan(&self, source: &str) -> Vec<ConfigDeclaration> {
        let source = strip_comments(source);
        let mut found: Vec<(usize, ConfigDeclaration)> = Vec::new();

        for caps in self.plugin.captures_iter(&source) {
            let (Some(whole), Some(kind)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let open = whole.end() - 1;
            match balanced_block(&source, open, '{', '}') {
                Some(block) => found.push((
                    whole.start(),
                    self.declaration(kind_from(kind.as_str()), DeclarationOrigin::Plugin, block),
                )),
                None => log::debug!("Unbalanced options for content plugin at byte {}", open),
            }
        }

        for presets in self.presets.find_iter(&source) {
            let open = presets.end() - 1;
            let Some(block) = balanced_block(&source, open, '[', ']') else {
                log::debug!("Unbalanced presets list at byte {}", open);
                continue;
            };
            for caps in self.preset_key.captures_iter(block) {
                let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let kind = kind_from(key.as_str());
                if value.as_str() == "false" {
                    log::debug!("Preset {} content is disabled", kind);
                    continue;
                }
                if let Some(options) = balanced_block(block, value.start(), '{', '}') {
                    found.push((
                        open + key.start(),
                        self.declaration(kind, DeclarationOrigin::Preset, options),
                    ));
                }
            }
        }

        found.sort_by_key(|(offset, _)| *offset);
        found.into_iter().map(|(_, declaration)| declaration).collect()
    }
}

/// Replace `//` and `/* */` comments with whitespace, leaving string literals alone.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

/// The `open`..`close` block that starts at byte `start`, skipping string literals.
fn balanced_block(source: &str, start: usize, open: char, close: char) -> Option<&str> {
    let tail = source.get(start..)?;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in tail.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        if c == '\'' || c == '"' || c == '`' {
            quote = Some(c);
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return tail.get(..offset + c.len_utf8());
            }
        }
    }
    None
}

/// Blank out everything nested below the outermost delimiters of `block`.
fn top_level(block: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in block.chars() {
        let nested_before = depth > 1;
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
        } else {
            match c {
                '\'' | '"' | '`' => quote = Some(c),
                '{' | '[' | '(' => depth += 1,
                '}' | ']' | ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        out.push(if nested_before || depth > 1 { ' ' } else { c });
    }
    out
}

// ============================================================================
// Discovery
// ============================================================================

/// Returns true for names like `2024-01-31-release.md`.
pub fn is_date_prefixed(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > 11
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
        && bytes[10] == b'-'
}

/// Join a config-relative path onto the project root without `.` components.
fn resolve_relative(project_root: &Path, relative: &str) -> PathBuf {
    let relative: PathBuf = Path::new(relative)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    project_root.join(relative)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Discover the content roots of a project with the default scanner.
pub fn discover<FS: FileSystem>(fs: &FS, project_root: &Path, config: &Config) -> DiscoveredRoots {
    match PatternConfigScanner::new() {
        Ok(scanner) => Discovery::new(fs, project_root, config)
            .with_scanner(&scanner)
            .run(),
        Err(e) => {
            log::warn!("Config scanning disabled: {}", e);
            Discovery::new(fs, project_root, config).run()
        }
    }
}

/// One discovery pass over a project.
pub struct Discovery<'a, FS: FileSystem> {
    fs: &'a FS,
    project_root: &'a Path,
    config: &'a Config,
    scanner: Option<&'a dyn ConfigScanner>,
}

impl<'a, FS: FileSystem> Discovery<'a, FS> {
    /// Discovery without config scanning; tier 1 is skipped until a scanner is set.
    pub fn new(fs: &'a FS, project_root: &'a Path, config: &'a Config) -> Self {
        Self {
            fs,
            project_root,
            config,
            scanner: None,
        }
    }

    /// Use `scanner` for tier 1.
    pub fn with_scanner(mut self, scanner: &'a dyn ConfigScanner) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Run every tier and collect the roots.
    pub fn run(&self) -> DiscoveredRoots {
        let declarations = self.declarations();
        let mut roots = DiscoveredRoots::default();
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for kind in [ContentKind::Docs, ContentKind::Blog] {
            let mut found = self.from_config(kind, &declarations, &claimed);
            if found.is_empty() {
                log::debug!("No {} roots declared in config, trying conventional names", kind);
                found = self.from_conventions(kind, &claimed);
            }
            claimed.extend(found.iter().map(|root| root.path.clone()));
            match kind {
                ContentKind::Docs => roots.docs = found,
                ContentKind::Blog => roots.blog = found,
            }
        }

        if roots.docs.is_empty() || roots.blog.is_empty() {
            log::debug!("Scanning top-level folders for content");
            let (docs, blog) = self.scan_top_level(&claimed);
            if roots.docs.is_empty() {
                roots.docs = docs;
            }
            if roots.blog.is_empty() {
                roots.blog = blog;
            }
            claimed.extend(roots.iter().map(|root| root.path.clone()));
        }

        roots.docs.extend(self.versioned_docs(&claimed));

        if roots.docs.is_empty() {
            log::debug!("No docs found, using the project root");
            roots.docs.push(ContentRoot {
                kind: ContentKind::Docs,
                path: self.project_root.to_path_buf(),
                id: None,
                route_base_path: None,
                label: folder_label(self.project_root),
                source: DiscoverySource::Fallback,
            });
        }

        roots
    }

    fn declarations(&self) -> Vec<ConfigDeclaration> {
        let Some(scanner) = self.scanner else {
            return Vec::new();
        };

        let Some(config_file) = CONFIG_FILES
            .iter()
            .map(|name| self.project_root.join(name))
            .find(|path| self.fs.exists(path))
        else {
            log::debug!("No Docusaurus config in {}", self.project_root.display());
            return Vec::new();
        };

        match self.fs.read_to_string(&config_file) {
            Ok(source) => scanner.scan(&source),
            Err(e) => {
                log::warn!("Could not read {}: {}", config_file.display(), e);
                Vec::new()
            }
        }
    }

    fn from_config(
        &self,
        kind: ContentKind,
        declarations: &[ConfigDeclaration],
        claimed: &HashSet<PathBuf>,
    ) -> Vec<ContentRoot> {
        let mut roots: Vec<ContentRoot> = Vec::new();
        for declaration in declarations.iter().filter(|d| d.kind == kind) {
            let relative = declaration
                .path
                .as_deref()
                .unwrap_or_else(|| kind.default_folder());
            let path = resolve_relative(self.project_root, relative);

            if !self.fs.is_dir(&path) {
                log::debug!("Declared {} path {} does not exist", kind, path.display());
                continue;
            }
            if claimed.contains(&path) || roots.iter().any(|r| r.path == path) {
                continue;
            }

            let id = declaration.id.clone().filter(|id| id != "default");
            let label = match &id {
                Some(id) => folder_label(Path::new(id)),
                None => folder_label(&path),
            };
            roots.push(ContentRoot {
                kind,
                path,
                id,
                route_base_path: declaration.route_base_path.clone(),
                label,
                source: DiscoverySource::Config,
            });
        }
        roots
    }

    fn from_conventions(&self, kind: ContentKind, claimed: &HashSet<PathBuf>) -> Vec<ContentRoot> {
        let names = match kind {
            ContentKind::Docs => &self.config.docs_folder_names,
            ContentKind::Blog => &self.config.blog_folder_names,
        };

        let mut roots: Vec<ContentRoot> = Vec::new();
        for name in names {
            let path = self.project_root.join(name);
            if self.fs.is_dir(&path)
                && !claimed.contains(&path)
                && !roots.iter().any(|r| r.path == path)
            {
                roots.push(ContentRoot {
                    kind,
                    label: folder_label(&path),
                    path,
                    id: None,
                    route_base_path: None,
                    source: DiscoverySource::Convention,
                });
            }
        }
        roots
    }

    /// Tier 3: top-level folders holding markdown, split into docs-like and blog-like.
    fn scan_top_level(&self, claimed: &HashSet<PathBuf>) -> (Vec<ContentRoot>, Vec<ContentRoot>) {
        let mut entries = match self.fs.list_entries(self.project_root) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Could not scan {}: {}", self.project_root.display(), e);
                return (Vec::new(), Vec::new());
            }
        };
        entries.sort();

        let mut docs = Vec::new();
        let mut blog = Vec::new();
        for dir in entries {
            let name = file_name(&dir);
            if name.starts_with('.')
                || name == VERSIONED_DOCS_DIR
                || self.config.ignored_folders.contains(&name)
                || claimed.contains(&dir)
                || !self.fs.is_dir(&dir)
            {
                continue;
            }

            let direct = self.fs.list_md_files(&dir).unwrap_or_default();
            let kind = if !direct.is_empty() {
                if self.is_blog_like(&direct) {
                    ContentKind::Blog
                } else {
                    ContentKind::Docs
                }
            } else if self.has_nested_markdown(&dir) {
                ContentKind::Docs
            } else {
                continue;
            };

            let root = ContentRoot {
                kind,
                label: folder_label(&dir),
                path: dir,
                id: None,
                route_base_path: None,
                source: DiscoverySource::Scan,
            };
            match kind {
                ContentKind::Docs => docs.push(root),
                ContentKind::Blog => blog.push(root),
            }
        }
        (docs, blog)
    }

    fn has_nested_markdown(&self, dir: &Path) -> bool {
        self.fs
            .list_entries(dir)
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !file_name(p).starts_with('.') && self.fs.is_dir(p))
            .any(|sub| {
                self.fs
                    .list_md_files(&sub)
                    .is_ok_and(|files| !files.is_empty())
            })
    }

    fn is_blog_like(&self, files: &[PathBuf]) -> bool {
        files.iter().any(|file| {
            is_date_prefixed(&file_name(file))
                || frontmatter::read_metadata(self.fs, file).looks_like_blog_post()
        })
    }

    fn versioned_docs(&self, claimed: &HashSet<PathBuf>) -> Vec<ContentRoot> {
        let dir = self.project_root.join(VERSIONED_DOCS_DIR);
        if !self.fs.is_dir(&dir) {
            return Vec::new();
        }

        let mut versions: Vec<PathBuf> = match self.fs.list_entries(&dir) {
            Ok(entries) => entries
                .into_iter()
                .filter(|p| self.fs.is_dir(p) && !claimed.contains(p))
                .filter(|p| file_name(p).starts_with("version-"))
                .collect(),
            Err(e) => {
                log::warn!("Could not list {}: {}", dir.display(), e);
                return Vec::new();
            }
        };
        // Newest release first, the order Docusaurus lists them in.
        versions.sort();
        versions.reverse();

        versions
            .into_iter()
            .map(|path| {
                let name = file_name(&path);
                let version = name.trim_start_matches("version-").to_string();
                ContentRoot {
                    kind: ContentKind::Docs,
                    label: format!("Docs {}", version),
                    id: None,
                    route_base_path: None,
                    path,
                    source: DiscoverySource::Version,
                }
            })
            .collect()
    }
}
