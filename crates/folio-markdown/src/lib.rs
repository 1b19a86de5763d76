//! Markdown documents with YAML front matter.
//!
//! This crate splits a source document into its front matter block and body,
//! parses the front matter as a generic YAML mapping, and renders the body
//! from markdown to HTML.

pub mod frontmatter;
pub mod parser;

pub use frontmatter::{extract_frontmatter, FrontMatter, FrontmatterError};
pub use parser::{parse_document, render_markdown, ParseError, ParsedDoc};
