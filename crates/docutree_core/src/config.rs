//! Configuration types for docutree.
//!
//! [`Config`] holds the knobs of content discovery and tree building. It is
//! persisted as TOML, looked up in this order:
//!
//! 1. `<project>/docutree.toml`
//! 2. the user config file (`~/.config/docutree/config.toml` on Unix)
//! 3. built-in defaults
//!
//! A config file that fails to parse is logged and skipped; discovery must
//! never fail because of it.
//!
//! # Example
//!
//! ```toml
//! docs_folder_names = ["docs", "handbook"]
//! image_folder_name = "img"
//! include_ico = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocutreeError, Result};
use crate::fs::FileSystem;

/// Name of the per-project config file.
pub const PROJECT_CONFIG_FILE: &str = "docutree.toml";

/// `Config` represents the parts of docutree that the user can configure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conventional folder names probed for documentation roots
    pub docs_folder_names: Vec<String>,

    /// Conventional folder names probed for blog roots
    pub blog_folder_names: Vec<String>,

    /// Folder created to hold loose images
    pub image_folder_name: String,

    /// Treat `.ico` files as images
    pub include_ico: bool,

    /// Template used when none is named
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_template: Option<String>,

    /// Project-relative folder holding user templates
    pub templates_dir: PathBuf,

    /// Top-level folders never considered by the content scan
    pub ignored_folders: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            docs_folder_names: strings(&["docs", "documentation", "doc", "guides", "content"]),
            blog_folder_names: strings(&["blog", "blogs"]),
            image_folder_name: "images".to_string(),
            include_ico: false,
            default_template: None,
            templates_dir: PathBuf::from(".docutree/templates"),
            ignored_folders: strings(&[
                "node_modules",
                "build",
                "src",
                "static",
                "i18n",
                ".docusaurus",
            ]),
        }
    }
}

impl Config {
    /// Parse config from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load config from a specific path.
    pub fn load_from<FS: FileSystem>(fs: &FS, path: &Path) -> Result<Self> {
        let contents = fs
            .read_to_string(path)
            .map_err(|e| DocutreeError::read(path, e))?;
        Self::from_toml(&contents)
    }

    /// Resolve the config for a project: project file, then user file, then defaults.
    pub fn load_for_project<FS: FileSystem>(fs: &FS, project_root: &Path) -> Self {
        let project_file = project_root.join(PROJECT_CONFIG_FILE);
        if fs.exists(&project_file) {
            match Self::load_from(fs, &project_file) {
                Ok(config) => return config,
                Err(e) => log::warn!("Ignoring {}: {}", project_file.display(), e),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(user_file) = Self::config_path()
            && user_file.exists()
        {
            match std::fs::read_to_string(&user_file)
                .map_err(|e| DocutreeError::read(&user_file, e))
                .and_then(|c| Self::from_toml(&c))
            {
                Ok(config) => return config,
                Err(e) => log::warn!("Ignoring {}: {}", user_file.display(), e),
            }
        }

        Self::default()
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Image extensions recognized by the tree builder.
    pub fn image_extensions(&self) -> Vec<&'static str> {
        let mut exts = vec!["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp"];
        if self.include_ico {
            exts.push("ico");
        }
        exts
    }

    /// Returns true if `path` has a recognized image extension.
    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.image_extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Config {
    /// Get the user config file path (~/.config/docutree/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docutree").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("image_folder_name = \"img\"\ninclude_ico = true\n").unwrap();
        assert_eq!(config.image_folder_name, "img");
        assert!(config.include_ico);
        assert_eq!(config.blog_folder_names, vec!["blog", "blogs"]);
    }

    #[test]
    fn test_project_file_wins() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(
            Path::new("site/docutree.toml"),
            "docs_folder_names = [\"handbook\"]\n",
        )
        .unwrap();

        let config = Config::load_for_project(&fs, Path::new("site"));
        assert_eq!(config.docs_folder_names, vec!["handbook"]);
    }

    #[test]
    fn test_malformed_project_file_is_not_fatal() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("site/docutree.toml"), "docs_folder_names = [")
            .unwrap();

        let config = Config::load_for_project(&fs, Path::new("site"));
        assert_eq!(config.image_folder_name, "images");
    }

    #[test]
    fn test_is_image() {
        let mut config = Config::default();
        assert!(config.is_image(Path::new("docs/logo.PNG")));
        assert!(!config.is_image(Path::new("docs/favicon.ico")));
        config.include_ico = true;
        assert!(config.is_image(Path::new("docs/favicon.ico")));
        assert!(!config.is_image(Path::new("docs/intro.md")));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
