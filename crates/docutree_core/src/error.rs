use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Unified error type for docutree operations
#[derive(Debug, Error)]
pub enum DocutreeError {
    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create folder '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to move '{from}' to '{to}': {source}")]
    MovePath {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to delete '{path}': {source}")]
    DeletePath {
        path: PathBuf,
        source: std::io::Error,
    },

    // Metadata errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    // Validation errors
    #[error("Invalid category name '{0}': use only letters, digits, '-' and '_'")]
    InvalidCategoryName(String),

    #[error("'{0}' already exists")]
    AlreadyExists(PathBuf),

    #[error("A title is required")]
    MissingTitle,

    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("'{0}' is not a folder")]
    NotAFolder(PathBuf),

    #[error("'{0}' cannot be moved or reordered")]
    NotMovable(PathBuf),

    #[error("Cannot reorder '{source_path}' next to '{target}': they are in different folders")]
    CrossDirectoryReorder { source_path: PathBuf, target: PathBuf },

    #[error("Deleting '{0}' was not confirmed")]
    ConfirmationRequired(PathBuf),

    #[error("Category draft for '{path}' is already {state}")]
    InvalidTransition { path: PathBuf, state: String },

    // Partial mutation
    #[error("Renumbered {completed} entries but {} failed: {}", .failed.len(), summarize(.failed))]
    RenumberIncomplete {
        completed: usize,
        failed: Vec<(PathBuf, String)>,
    },
}

fn summarize(failed: &[(PathBuf, String)]) -> String {
    failed
        .iter()
        .map(|(path, message)| format!("{} ({})", path.display(), message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for docutree operations
pub type Result<T> = std::result::Result<T, DocutreeError>;

/// How an error should be handled by the top-level operation handler.
///
/// Discovery and parse problems are recovered inside the component that hits
/// them and never become a `DocutreeError`, so only two classes remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorClass {
    /// Disk state may have changed; message the user and refresh.
    Mutation,
    /// Rejected before touching disk; show inline.
    Validation,
}

impl DocutreeError {
    /// Classify this error for user messaging.
    pub fn class(&self) -> ErrorClass {
        match self {
            DocutreeError::InvalidCategoryName(_)
            | DocutreeError::AlreadyExists(_)
            | DocutreeError::MissingTitle
            | DocutreeError::UnknownTemplate(_)
            | DocutreeError::NotAFolder(_)
            | DocutreeError::NotMovable(_)
            | DocutreeError::CrossDirectoryReorder { .. }
            | DocutreeError::ConfirmationRequired(_)
            | DocutreeError::InvalidTransition { .. } => ErrorClass::Validation,
            _ => ErrorClass::Mutation,
        }
    }

    /// Convert to a serializable representation for IPC
    pub fn to_serializable(&self) -> SerializableError {
        SerializableError::from(self)
    }

    /// Build a `FileRead` error for `path`.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocutreeError::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Build a `FileWrite` error for `path`.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocutreeError::FileWrite {
            path: path.into(),
            source,
        }
    }
}

/// A serializable representation of DocutreeError for IPC with a host UI
#[derive(Debug, Clone, Serialize)]
pub struct SerializableError {
    /// Error kind/variant name
    pub kind: String,
    /// Mutation or validation
    pub class: ErrorClass,
    /// Human-readable error message
    pub message: String,
    /// Associated path (if applicable)
    pub path: Option<PathBuf>,
}

impl From<&DocutreeError> for SerializableError {
    fn from(err: &DocutreeError) -> Self {
        let kind = match err {
            DocutreeError::Io(_) => "Io",
            DocutreeError::FileRead { .. } => "FileRead",
            DocutreeError::FileWrite { .. } => "FileWrite",
            DocutreeError::CreateDir { .. } => "CreateDir",
            DocutreeError::MovePath { .. } => "MovePath",
            DocutreeError::DeletePath { .. } => "DeletePath",
            DocutreeError::Yaml(_) => "Yaml",
            DocutreeError::Json(_) => "Json",
            DocutreeError::ConfigParse(_) => "ConfigParse",
            DocutreeError::Pattern(_) => "Pattern",
            DocutreeError::InvalidCategoryName(_) => "InvalidCategoryName",
            DocutreeError::AlreadyExists(_) => "AlreadyExists",
            DocutreeError::MissingTitle => "MissingTitle",
            DocutreeError::UnknownTemplate(_) => "UnknownTemplate",
            DocutreeError::NotAFolder(_) => "NotAFolder",
            DocutreeError::NotMovable(_) => "NotMovable",
            DocutreeError::CrossDirectoryReorder { .. } => "CrossDirectoryReorder",
            DocutreeError::ConfirmationRequired(_) => "ConfirmationRequired",
            DocutreeError::InvalidTransition { .. } => "InvalidTransition",
            DocutreeError::RenumberIncomplete { .. } => "RenumberIncomplete",
        }
        .to_string();

        let path = match err {
            DocutreeError::FileRead { path, .. }
            | DocutreeError::FileWrite { path, .. }
            | DocutreeError::CreateDir { path, .. }
            | DocutreeError::DeletePath { path, .. }
            | DocutreeError::InvalidTransition { path, .. } => Some(path.clone()),
            DocutreeError::MovePath { from, .. } => Some(from.clone()),
            DocutreeError::AlreadyExists(path)
            | DocutreeError::NotAFolder(path)
            | DocutreeError::NotMovable(path)
            | DocutreeError::ConfirmationRequired(path) => Some(path.clone()),
            DocutreeError::CrossDirectoryReorder { source_path, .. } => Some(source_path.clone()),
            _ => None,
        };

        Self {
            kind,
            class: err.class(),
            message: err.to_string(),
            path,
        }
    }
}

impl From<DocutreeError> for SerializableError {
    fn from(err: DocutreeError) -> Self {
        SerializableError::from(&err)
    }
}
