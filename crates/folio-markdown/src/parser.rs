//! Document parser.

use pulldown_cmark::{html, Options, Parser};

use crate::frontmatter::{extract_frontmatter, FrontMatter, FrontmatterError};

/// A parsed source document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed front matter (empty when the document has none)
    pub front_matter: FrontMatter,

    /// Rendered HTML body, present only when content was requested
    pub content: Option<String>,
}

/// Errors that can occur when parsing a document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Front matter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Parse a document.
///
/// With `include_content` unset only the front matter is parsed; the markdown
/// body is left unrendered.
pub fn parse_document(source: &str, include_content: bool) -> Result<ParsedDoc, ParseError> {
    let (front_matter, body) = extract_frontmatter(source)?;

    let content = include_content.then(|| render_markdown(body));

    Ok(ParsedDoc {
        front_matter,
        content,
    })
}

/// Render markdown to HTML.
pub fn render_markdown(content: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(content, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}
