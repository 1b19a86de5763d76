//! Scaffold a new site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio site...");
    scaffold(Path::new("."), config_path, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio dev' to start the development server.");

    Ok(())
}

/// Write the starter files under `root`, skipping existing ones unless `overwrite` is set.
fn scaffold(root: &Path, config_path: &Path, overwrite: bool) -> Result<()> {
    let content_dir = root.join("content");

    if content_dir.exists() && !overwrite {
        tracing::warn!("content/ directory already exists. Use --yes to overwrite.");
        return Ok(());
    }

    let files = [
        (root.join(config_path), DEFAULT_CONFIG),
        (content_dir.join("index.md"), DEFAULT_INDEX),
        (content_dir.join("blog/index.md"), DEFAULT_BLOG_INDEX),
        (content_dir.join("blog/hello.md"), DEFAULT_POST),
        (content_dir.join(".theme/main.jinja"), DEFAULT_THEME),
        (content_dir.join(".theme/css/site.css"), DEFAULT_CSS),
    ];

    for (path, contents) in files {
        if path.exists() && !overwrite {
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Folio Configuration

[build]
# Source directory for content
source_dir = "content"

# Output directory for the built site (emptied on every build)
output_dir = "dist"

# Prefix of every page URL
url_prefix = "/"

# Generate a site map page
sitemap_page = "sitemap/index.html"

# Extra files to copy after the build
# copy = [{ src = "CNAME", dst = "dist/CNAME" }]

# External scripts and stylesheets bundled into dist/js and dist/css
# scripts = ["vendor/app.js"]
# styles = ["vendor/fonts.css"]

[site]
title = "My Site"
"#;

const DEFAULT_INDEX: &str = r#"---
title: Home
---

# Welcome

This site is built with **folio**. Read the [blog](/blog/).
"#;

const DEFAULT_BLOG_INDEX: &str = r#"---
title: Blog
---

# Blog
"#;

const DEFAULT_POST: &str = r#"---
title: Hello
---

Every markdown file becomes a page at a clean URL: this one lives at `/blog/hello`.
"#;

const DEFAULT_THEME: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ front_matter.title }} - {{ config.site.title }}</title>
  <link rel="stylesheet" href="{{ config.build.url_prefix }}css/site.css">
</head>
<body>
  <header><a href="{{ config.build.url_prefix }}">{{ config.site.title }}</a></header>
  <main>
    {{ content | safe }}
    {% if pages | length > 1 %}
    <ul>
      {% for page in pages %}{% if page.url != url %}<li><a href="{{ page.url }}">{{ page.front_matter.title }}</a></li>{% endif %}{% endfor %}
    </ul>
    {% endif %}
  </main>
  {% if config.build.live_reload %}<script src="/__reload.js"></script>{% endif %}
</body>
</html>
"#;

const DEFAULT_CSS: &str = r#"body {
  font-family: system-ui, -apple-system, sans-serif;
  max-width: 42rem;
  margin: 2rem auto;
  padding: 0 1rem;
  line-height: 1.6;
}
"#;
