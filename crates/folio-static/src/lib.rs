//! Static site generator for folio.
//!
//! Turns a folder of markdown documents with YAML front matter into a static
//! website: every document is rendered through a template into a clean-URL
//! `index.html`, other files are copied as they are, and a final pass writes
//! the sitemap and bundles extra assets.

pub mod config;
pub mod error;
pub mod generator;
pub mod output;
pub mod page;
pub mod paths;
pub mod postprocess;
pub mod processor;
pub mod templates;
pub mod tracker;
pub mod walker;

pub use config::{BuildConfig, CopyPair, SiteConfig};
pub use error::BuildError;
pub use generator::{BuildResult, Generator, GeneratorState};
pub use page::PageData;
pub use paths::PathMapper;
pub use tracker::WriteTracker;
