//! Template engine for rendering pages.
//!
//! Templates live in the theme directory as `<name>.jinja`. A theme that does
//! not provide `base`, `main` or `sitemap` gets the built-in version. Every
//! template is HTML-escaped regardless of its name; mark trusted markup with
//! the `safe` filter.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment};

use crate::page::PageData;

/// File extension of template sources.
pub const TEMPLATE_EXTENSION: &str = ".jinja";

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
    theme_root: PathBuf,
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("theme_root", &self.theme_root)
            .finish()
    }
}

impl TemplateEngine {
    /// Create a template engine that loads templates from `theme_root`.
    pub fn new(theme_root: impl Into<PathBuf>) -> Self {
        let theme_root = theme_root.into();
        let mut env = Environment::new();

        let root = theme_root.clone();
        env.set_loader(move |name| load_template(&root, name));
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_filter("basename", basename);

        Self { env, theme_root }
    }

    /// Extension that marks a file as a template source.
    pub fn template_extension(&self) -> &'static str {
        TEMPLATE_EXTENSION
    }

    /// Render a page with the template its front matter names, or with
    /// `default_template` when it names none.
    pub fn render_page(
        &self,
        default_template: &str,
        page: &PageData,
    ) -> Result<String, minijinja::Error> {
        let name = page.front_matter.template().unwrap_or(default_template);
        let tmpl = self.env.get_template(name)?;

        tmpl.render(page)
    }
}

fn load_template(theme_root: &Path, name: &str) -> Result<Option<String>, minijinja::Error> {
    let path = theme_root.join(format!("{name}{TEMPLATE_EXTENSION}"));

    match std::fs::read_to_string(&path) {
        Ok(source) => Ok(Some(source)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(builtin(name).map(str::to_string)),
        Err(e) => Err(minijinja::Error::new(
            minijinja::ErrorKind::InvalidOperation,
            format!("could not read template {}", path.display()),
        )
        .with_source(e)),
    }
}

/// File name component of a path, used to link bundled assets.
fn basename(value: String) -> String {
    Path::new(&value)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(value)
}

fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "base" => Some(BASE_TEMPLATE),
        "main" => Some(MAIN_TEMPLATE),
        "sitemap" => Some(SITEMAP_TEMPLATE),
        _ => None,
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if front_matter.title %}{{ front_matter.title }}{% if config.site.title %} - {% endif %}{% endif %}{{ config.site.title }}</title>
  {% for style in config.build.styles %}<link rel="stylesheet" href="{{ config.build.url_prefix }}css/{{ style | basename }}">
  {% endfor %}
</head>
<body>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
  {% for script in config.build.scripts %}<script src="{{ config.build.url_prefix }}js/{{ script | basename }}"></script>
  {% endfor %}
  {% if config.build.live_reload %}<script src="/__reload.js"></script>{% endif %}
</body>
</html>"##;

const MAIN_TEMPLATE: &str = r##"{% extends "base" %}

{% block content %}
<article class="page">
  {{ content | safe }}
</article>

{% if pages | length > 1 %}
<nav class="siblings">
  <ul>
  {% for sibling in pages %}
    {% if sibling.url != url %}<li><a href="{{ sibling.url }}">{{ sibling.front_matter.title or sibling.url }}</a></li>{% endif %}
  {% endfor %}
  </ul>
</nav>
{% endif %}
{% endblock %}"##;

const SITEMAP_TEMPLATE: &str = r##"{% extends "base" %}

{% block content %}
<h1>{{ front_matter.title }}</h1>
<ul class="sitemap">
{% for page in pages %}
  <li><a href="{{ page.url }}">{{ page.front_matter.title or page.url }}</a></li>
{% endfor %}
</ul>
{% endblock %}"##;
