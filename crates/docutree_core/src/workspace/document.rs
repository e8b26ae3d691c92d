//! New documents and blog posts.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::discovery::ContentKind;
use crate::error::{DocutreeError, Result};
use crate::frontmatter;
use crate::fs::FileSystem;
use crate::template::{TemplateContext, TemplateManager, slugify};

use super::Workspace;

/// Frontmatter values supplied for a new document.
#[derive(Debug, Clone, Default)]
pub struct DocumentFields {
    /// Required
    pub title: String,
    pub description: Option<String>,
    /// Defaults to the slug
    pub id: Option<String>,
    /// Defaults to the slugified title
    pub slug: Option<String>,
    /// Blog posts only; defaults to today
    pub date: Option<NaiveDate>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
}

impl DocumentFields {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl<FS: FileSystem> Workspace<FS> {
    /// Templates of this project: its templates folder, then the built-ins.
    pub fn templates(&self) -> TemplateManager<'_, FS> {
        TemplateManager::new(&self.fs)
            .with_templates_dir(self.project_root.join(&self.config.templates_dir))
    }

    /// Create a document in `folder` from a template.
    ///
    /// The template defaults to the configured one, else `blog` inside blog
    /// roots and `doc` elsewhere. Docs are named `<slug>.md` and placed after
    /// their siblings; blog posts are named `YYYY-MM-DD-<slug>.md`. Nothing is
    /// written if validation fails or the file already exists.
    pub fn create_document(
        &self,
        folder: &Path,
        template: Option<&str>,
        fields: DocumentFields,
    ) -> Result<PathBuf> {
        let title = fields.title.trim();
        if title.is_empty() {
            return Err(DocutreeError::MissingTitle);
        }
        if !self.fs.is_dir(folder) {
            return Err(DocutreeError::NotAFolder(folder.to_path_buf()));
        }

        let kind = self.content_kind_of(folder);
        let template_name = template
            .map(str::to_string)
            .or_else(|| self.config.default_template.clone())
            .unwrap_or_else(|| match kind {
                ContentKind::Blog => "blog".to_string(),
                ContentKind::Docs => "doc".to_string(),
            });
        let template = self
            .templates()
            .get(&template_name)
            .ok_or(DocutreeError::UnknownTemplate(template_name))?;

        let mut context = TemplateContext::new(title);
        if let Some(slug) = fields.slug.as_deref().map(slugify).filter(|s| !s.is_empty()) {
            context.slug = slug;
        }
        if context.slug.is_empty() {
            context.slug = "untitled".to_string();
        }
        context.id = fields.id;
        context.date = fields.date;
        context.description = fields.description;
        context.authors = fields.authors;
        context.tags = fields.tags;

        let file_name = match kind {
            ContentKind::Blog => format!(
                "{}-{}.md",
                context.effective_date().format("%Y-%m-%d"),
                context.slug
            ),
            ContentKind::Docs => {
                context.position = Some(self.next_document_position(folder));
                format!("{}.md", context.slug)
            }
        };

        let path = folder.join(file_name);
        if self.fs.exists(&path) {
            return Err(DocutreeError::AlreadyExists(path));
        }

        let content = template.render(&context);
        frontmatter::parse_document(&content)?;

        self.fs
            .create_new(&path, &content)
            .map_err(|e| DocutreeError::write(&path, e))?;
        log::debug!("Created {} from template '{}'", path.display(), template.name);
        Ok(path)
    }

    /// One past the highest position among `folder`'s children.
    pub fn next_document_position(&self, folder: &Path) -> i64 {
        self.builder_for(folder)
            .children(folder)
            .iter()
            .filter_map(|node| node.position)
            .max()
            .unwrap_or(0)
            + 1
    }
}
