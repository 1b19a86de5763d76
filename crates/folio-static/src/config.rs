//! Build configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Reserved theme directory, relative to the source root.
pub const THEME_DIR: &str = ".theme";

/// Basename of the document that becomes its directory's index page.
pub const INDEX_FILE: &str = "index.md";

/// Extension of source documents.
pub const SOURCE_EXTENSION: &str = ".md";

/// Template used when a document does not name one.
pub const DEFAULT_TEMPLATE: &str = "main";

/// Template used for the synthesized sitemap page.
pub const SITEMAP_TEMPLATE: &str = "sitemap";

/// Basename prefix of files that are never copied to the output.
pub const HIDDEN_PREFIX: char = '.';

/// Full configuration of one site.
///
/// `site` is free-form and only consumed by templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub build: BuildConfig,
    pub site: serde_json::Map<String, serde_json::Value>,
}

/// Configuration for building a static site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Source content directory
    pub source_dir: PathBuf,

    /// Output directory, emptied at the start of every build
    pub output_dir: PathBuf,

    /// Prefix of every generated page URL
    pub url_prefix: String,

    /// Sitemap page location, relative to the output directory
    pub sitemap_page: Option<PathBuf>,

    /// Extra files or directories copied once the site is written
    pub copy: Vec<CopyPair>,

    /// External scripts bundled into `js/`
    pub scripts: Vec<PathBuf>,

    /// External stylesheets bundled into `css/`
    pub styles: Vec<PathBuf>,

    /// Ask themes to include the dev server reload script
    pub live_reload: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("dist"),
            url_prefix: "/".to_string(),
            sitemap_page: None,
            copy: vec![],
            scripts: vec![],
            styles: vec![],
            live_reload: false,
        }
    }
}

impl BuildConfig {
    /// Theme directory inside the source tree.
    pub fn theme_dir(&self) -> PathBuf {
        self.source_dir.join(THEME_DIR)
    }
}

/// An explicit source to destination copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPair {
    pub src: PathBuf,
    pub dst: PathBuf,
}
