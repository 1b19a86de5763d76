//! Per-directory page processing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use folio_markdown::parse_document;

use crate::config::{SiteConfig, DEFAULT_TEMPLATE, HIDDEN_PREFIX};
use crate::error::BuildError;
use crate::output::OutputWriter;
use crate::page::PageData;
use crate::paths::PathMapper;
use crate::templates::TemplateEngine;
use crate::walker::DirListing;

/// Turns one directory's files into rendered pages and copied assets.
pub struct PageProcessor<'a> {
    config: Arc<SiteConfig>,
    paths: &'a PathMapper,
    templates: &'a TemplateEngine,
    writer: &'a OutputWriter,
}

impl<'a> PageProcessor<'a> {
    pub fn new(
        config: Arc<SiteConfig>,
        paths: &'a PathMapper,
        templates: &'a TemplateEngine,
        writer: &'a OutputWriter,
    ) -> Self {
        Self {
            config,
            paths,
            templates,
            writer,
        }
    }

    /// Process one directory.
    ///
    /// Every document's front matter is read before any page is rendered, so
    /// each page sees the complete sibling list. The index document renders
    /// last. Returns the metadata-only sibling list.
    pub fn process_dir(&self, listing: &DirListing) -> Result<Vec<PageData>, BuildError> {
        tracing::info!("Processing folder: {}", listing.dir.display());

        let mut dir_pages = Vec::new();
        for file in &listing.files {
            if self.paths.is_document(file) {
                dir_pages.push(self.read_page(file, false)?);
            }
        }
        let siblings: Arc<[PageData]> = Arc::from(dir_pages.clone());

        let mut index_file: Option<&PathBuf> = None;

        for file in &listing.files {
            if self.paths.is_index(file) {
                index_file = Some(file);
            } else if self.paths.is_document(file) {
                self.generate_document(file, &siblings)?;
            } else if !is_hidden(file) {
                let output = self.paths.output_path_for(file)?;
                tracing::info!("Copying: {} -> {}", file.display(), output.display());
                self.writer.copy(file.clone(), output);
            }
        }

        if let Some(index) = index_file {
            self.generate_document(index, &siblings)?;
        }

        Ok(dir_pages)
    }

    /// Read and parse a document into page data.
    pub fn read_page(&self, file: &Path, include_content: bool) -> Result<PageData, BuildError> {
        let text = fs::read_to_string(file).map_err(|source| BuildError::Read {
            path: file.to_path_buf(),
            source,
        })?;

        let doc = parse_document(&text, include_content).map_err(|source| {
            tracing::error!("can't parse {}: {}", file.display(), source);
            BuildError::Parse {
                path: file.to_path_buf(),
                source,
            }
        })?;

        Ok(PageData::new(
            doc.front_matter,
            doc.content,
            self.paths.url_for(file)?,
            Arc::clone(&self.config),
        ))
    }

    fn generate_document(&self, file: &Path, siblings: &Arc<[PageData]>) -> Result<(), BuildError> {
        let page = self.read_page(file, true)?.with_pages(Arc::clone(siblings));
        let output = self.paths.output_html_path_for(file)?;

        tracing::info!("Generating: {} -> {}", file.display(), output.display());
        generate_page(self.templates, self.writer, output, DEFAULT_TEMPLATE, &page)
    }
}

/// Render `page` and schedule it to be written at `output`.
pub fn generate_page(
    templates: &TemplateEngine,
    writer: &OutputWriter,
    output: PathBuf,
    default_template: &str,
    page: &PageData,
) -> Result<(), BuildError> {
    match templates.render_page(default_template, page) {
        Ok(html) => {
            writer.write(output, html);
            Ok(())
        }
        Err(source) => {
            tracing::error!("can't create {}: {}", output.display(), source);
            Err(BuildError::Template {
                path: output,
                source,
            })
        }
    }
}

fn is_hidden(file: &Path) -> bool {
    file.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(HIDDEN_PREFIX))
}
