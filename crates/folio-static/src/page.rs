//! Page model handed to templates.

use std::sync::Arc;

use folio_markdown::FrontMatter;
use serde::Serialize;

use crate::config::SiteConfig;

/// One source document, as seen by templates.
///
/// Serialized as the root template context: `front_matter`, `content`, `url`,
/// `pages` and `config` are all reachable by name.
#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    /// Parsed front matter
    pub front_matter: FrontMatter,

    /// Rendered HTML body; absent for metadata-only reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Canonical site-relative URL
    pub url: String,

    /// Documents in the same directory, this one included
    pub pages: Arc<[PageData]>,

    /// Configuration shared by every page of a run
    pub config: Arc<SiteConfig>,
}

impl PageData {
    /// Create a page with no sibling list attached.
    pub fn new(
        front_matter: FrontMatter,
        content: Option<String>,
        url: String,
        config: Arc<SiteConfig>,
    ) -> Self {
        Self {
            front_matter,
            content,
            url,
            pages: Arc::from(Vec::new()),
            config,
        }
    }

    /// Attach the sibling list.
    pub fn with_pages(mut self, pages: Arc<[PageData]>) -> Self {
        self.pages = pages;
        self
    }
}
