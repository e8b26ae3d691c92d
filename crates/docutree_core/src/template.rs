//! Templates for new documents and blog posts.
//!
//! Templates are Markdown files with `{{variable}}` placeholders. Dates accept
//! a format specifier: `{{date:%B %d, %Y}}`. Project templates live in the
//! configured templates folder and override built-ins of the same name.

use std::collections::HashSet;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::error::{DocutreeError, Result};
use crate::fs::FileSystem;

/// Available template variables and their descriptions
pub const TEMPLATE_VARIABLES: &[(&str, &str)] = &[
    ("title", "The document title, escaped for a double-quoted YAML string"),
    ("slug", "URL slug derived from the title"),
    ("id", "Document id (defaults to the slug)"),
    ("date", "Date (default: %Y-%m-%d). Use {{date:%B %d, %Y}} for custom format"),
    ("position", "sidebar_position for the new document"),
    ("description", "Short description, escaped like the title"),
    ("authors", "Author keys as a YAML flow list"),
    ("tags", "Tags as a YAML flow list"),
];

/// Built-in template for a plain doc page
pub const DOC_TEMPLATE: &str = r#"---
id: {{id}}
title: "{{title}}"
sidebar_position: {{position}}
description: "{{description}}"
---

# {{title}}

"#;

/// Built-in template for a step-by-step tutorial
pub const TUTORIAL_TEMPLATE: &str = r#"---
id: {{id}}
title: "{{title}}"
sidebar_position: {{position}}
description: "{{description}}"
---

# {{title}}

## What you'll learn

## Prerequisites

## Steps

### 1. Getting set up

## Next steps

"#;

/// Built-in template for a reference page
pub const REFERENCE_TEMPLATE: &str = r#"---
id: {{id}}
title: "{{title}}"
sidebar_position: {{position}}
description: "{{description}}"
---

# {{title}}

## Overview

## Options

| Name | Type | Default | Description |
| ---- | ---- | ------- | ----------- |

## Examples

"#;

/// Built-in template for a blog post
pub const BLOG_TEMPLATE: &str = r#"---
slug: {{slug}}
title: "{{title}}"
date: {{date}}
authors: {{authors}}
tags: {{tags}}
---

{{description}}

<!-- truncate -->

"#;

const BUILTIN_NAMES: [&str; 4] = ["doc", "tutorial", "reference", "blog"];

/// A named template.
#[derive(Debug, Clone)]
pub struct Template {
    /// Template name (derived from filename)
    pub name: String,
    /// Raw template content (before variable substitution)
    pub raw_content: String,
}

impl Template {
    pub fn new(name: impl Into<String>, raw_content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_content: raw_content.into(),
        }
    }

    /// Load a template from a file
    pub fn from_file<FS: FileSystem>(fs: &FS, path: &Path) -> Result<Self> {
        let content = fs
            .read_to_string(path)
            .map_err(|e| DocutreeError::read(path, e))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self::new(name, content))
    }

    /// A built-in template by name.
    pub fn builtin(name: &str) -> Option<Self> {
        let content = match name {
            "doc" => DOC_TEMPLATE,
            "tutorial" => TUTORIAL_TEMPLATE,
            "reference" => REFERENCE_TEMPLATE,
            "blog" => BLOG_TEMPLATE,
            _ => return None,
        };
        Some(Self::new(name, content))
    }

    /// Render the template with the given context
    pub fn render(&self, context: &TemplateContext) -> String {
        substitute_variables(&self.raw_content, context)
    }
}

/// Values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    pub title: String,
    pub slug: String,
    pub id: Option<String>,
    /// Date to use (defaults to today)
    pub date: Option<NaiveDate>,
    pub position: Option<i64>,
    pub description: Option<String>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
}

impl TemplateContext {
    /// Context for `title`, with the slug derived from it.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title),
            title,
            ..Self::default()
        }
    }

    /// Get the effective date (provided or today)
    pub fn effective_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Lower-case ASCII slug: alphanumerics kept, every other run becomes one `-`.
pub fn slugify(title: &str) -> String {
    title
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Escape a value for use inside a double-quoted YAML scalar.
fn yaml_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
}

/// Render a list as a YAML flow sequence.
fn yaml_list(values: &[String]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", yaml_quoted(v)))
        .collect();
    format!("[{}]", items.join(", "))
}

/// Substitute template variables in a string
fn substitute_variables(content: &str, context: &TemplateContext) -> String {
    let date = context.effective_date();
    let mut result = substitute_formatted_variables(content, "date", |fmt| {
        let mut formatted = String::new();
        match write!(formatted, "{}", date.format(fmt)) {
            Ok(()) => Some(formatted),
            Err(_) => {
                log::warn!("Ignoring invalid date format '{}' in template", fmt);
                None
            }
        }
    });

    let replacements: Vec<(&str, String)> = vec![
        ("title", yaml_quoted(&context.title)),
        ("slug", context.slug.clone()),
        ("id", context.id.clone().unwrap_or_else(|| context.slug.clone())),
        ("date", date.format("%Y-%m-%d").to_string()),
        (
            "position",
            context.position.map(|p| p.to_string()).unwrap_or_default(),
        ),
        (
            "description",
            yaml_quoted(context.description.as_deref().unwrap_or_default()),
        ),
        ("authors", yaml_list(&context.authors)),
        ("tags", yaml_list(&context.tags)),
    ];

    for (var, value) in replacements {
        let pattern = format!("{{{{{}}}}}", var);
        result = result.replace(&pattern, &value);
    }

    result
}

/// Substitute variables with format specifiers like {{var:FORMAT}}.
///
/// A placeholder the formatter rejects is left as written.
fn substitute_formatted_variables<F>(content: &str, var_name: &str, formatter: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = format!("{{{{{}:", var_name);
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find(&prefix) {
        let after = &rest[start + prefix.len()..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let placeholder_len = prefix.len() + end + 2;
        result.push_str(&rest[..start]);
        match formatter(&after[..end]) {
            Some(value) => result.push_str(&value),
            None => result.push_str(&rest[start..start + placeholder_len]),
        }
        rest = &rest[start + placeholder_len..];
    }
    result.push_str(rest);

    result
}

/// Where a template comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    Builtin,
    /// The project's templates folder
    Project,
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::Builtin => write!(f, "built-in"),
            TemplateSource::Project => write!(f, "project"),
        }
    }
}

/// Information about a template
#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub name: String,
    pub source: TemplateSource,
    /// Path to the template file (None for built-in)
    pub path: Option<PathBuf>,
}

/// Looks templates up in the project templates folder, then the built-ins.
pub struct TemplateManager<'a, FS: FileSystem> {
    fs: &'a FS,
    templates_dir: Option<PathBuf>,
}

impl<'a, FS: FileSystem> TemplateManager<'a, FS> {
    pub fn new(fs: &'a FS) -> Self {
        Self {
            fs,
            templates_dir: None,
        }
    }

    /// Also search `dir` (ahead of the built-ins).
    pub fn with_templates_dir(mut self, dir: PathBuf) -> Self {
        self.templates_dir = Some(dir);
        self
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Option<Template> {
        if let Some(dir) = &self.templates_dir {
            for ext in ["md", "mdx"] {
                let path = dir.join(format!("{}.{}", name, ext));
                if self.fs.exists(&path) {
                    match Template::from_file(self.fs, &path) {
                        Ok(template) => return Some(template),
                        Err(e) => log::warn!("Skipping template {}: {}", path.display(), e),
                    }
                }
            }
        }
        Template::builtin(name)
    }

    /// List all available templates, sorted by name
    pub fn list(&self) -> Vec<TemplateInfo> {
        let mut templates = Vec::new();
        let mut seen = HashSet::new();

        if let Some(dir) = &self.templates_dir
            && let Ok(files) = self.fs.list_md_files(dir)
        {
            for path in files {
                if let Some(name) = path.file_stem().and_then(|s| s.to_str())
                    && seen.insert(name.to_string())
                {
                    templates.push(TemplateInfo {
                        name: name.to_string(),
                        source: TemplateSource::Project,
                        path: Some(path.clone()),
                    });
                }
            }
        }

        for name in BUILTIN_NAMES {
            if seen.insert(name.to_string()) {
                templates.push(TemplateInfo {
                    name: name.to_string(),
                    source: TemplateSource::Builtin,
                    path: None,
                });
            }
        }

        templates.sort_by(|a, b| a.name.cmp(&b.name));
        templates
    }
}
