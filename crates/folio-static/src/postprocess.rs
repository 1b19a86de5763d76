//! Work that runs once every page has been written.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use folio_markdown::FrontMatter;

use crate::config::{SiteConfig, DEFAULT_TEMPLATE, SITEMAP_TEMPLATE};
use crate::error::BuildError;
use crate::output::OutputWriter;
use crate::page::PageData;
use crate::paths::join_url;
use crate::processor::generate_page;
use crate::templates::TemplateEngine;

/// Generate the sitemap and schedule the configured copies.
///
/// Copies are scheduled on the writer and not awaited here.
pub fn post_process(
    config: &Arc<SiteConfig>,
    templates: &TemplateEngine,
    writer: &OutputWriter,
    all_pages: Vec<PageData>,
) -> Result<(), BuildError> {
    let build = &config.build;

    if let Some(sitemap) = &build.sitemap_page {
        generate_sitemap(config, templates, writer, sitemap, all_pages)?;
    }

    for pair in &build.copy {
        tracing::info!("Copying: {} -> {}", pair.src.display(), pair.dst.display());
        writer.copy(pair.src.clone(), pair.dst.clone());
    }

    bundle(writer, &build.scripts, &build.output_dir.join("js"));
    bundle(writer, &build.styles, &build.output_dir.join("css"));

    Ok(())
}

fn generate_sitemap(
    config: &Arc<SiteConfig>,
    templates: &TemplateEngine,
    writer: &OutputWriter,
    sitemap: &Path,
    all_pages: Vec<PageData>,
) -> Result<(), BuildError> {
    let mut front_matter = FrontMatter::default();
    front_matter.insert("template", SITEMAP_TEMPLATE);
    front_matter.insert("title", "Site Map");

    let url = join_url(&config.build.url_prefix, &sitemap.to_string_lossy());
    let page = PageData::new(front_matter, None, url, Arc::clone(config))
        .with_pages(Arc::from(all_pages));

    let output = config.build.output_dir.join(sitemap);
    tracing::info!("Generating: {}", output.display());
    generate_page(templates, writer, output, DEFAULT_TEMPLATE, &page)
}

fn bundle(writer: &OutputWriter, files: &[PathBuf], target_dir: &Path) {
    for file in files {
        let Some(name) = file.file_name() else {
            tracing::warn!("Skipping bundle entry without a file name: {}", file.display());
            continue;
        };
        let dst = target_dir.join(name);
        tracing::info!("Bundling: {} -> {}", file.display(), dst.display());
        writer.copy(file.clone(), dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use crate::config::{BuildConfig, CopyPair};
    use crate::tracker::WriteTracker;

    #[tokio::test]
    async fn writes_sitemap_with_all_pages() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        let config = Arc::new(SiteConfig {
            build: BuildConfig {
                source_dir: temp.path().join("content"),
                output_dir: out.clone(),
                sitemap_page: Some(PathBuf::from("sitemap/index.html")),
                ..Default::default()
            },
            ..Default::default()
        });
        let templates = TemplateEngine::new(config.build.theme_dir());
        let writer = OutputWriter::current(WriteTracker::new());
        let pages = vec![
            PageData::new(FrontMatter::default(), None, "/".to_string(), Arc::clone(&config)),
            PageData::new(FrontMatter::default(), None, "/blog/post".to_string(), Arc::clone(&config)),
        ];

        post_process(&config, &templates, &writer, pages).unwrap();
        writer.tracker().wait_idle().await;

        let html = fs::read_to_string(out.join("sitemap/index.html")).unwrap();
        assert!(html.contains("<h1>Site Map</h1>"));
        assert!(html.contains(r#"<a href="&#x2f;blog&#x2f;post">"#));
        assert!(html.contains(r#"<a href="&#x2f;">"#));
    }

    #[tokio::test]
    async fn copies_and_bundles_assets() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        let vendor = temp.path().join("vendor");
        fs::create_dir_all(&vendor).unwrap();
        fs::write(vendor.join("app.js"), "console.log(1)").unwrap();
        fs::write(vendor.join("site.css"), "body{}").unwrap();
        fs::write(vendor.join("CNAME"), "example.com").unwrap();
        let config = Arc::new(SiteConfig {
            build: BuildConfig {
                output_dir: out.clone(),
                copy: vec![CopyPair {
                    src: vendor.join("CNAME"),
                    dst: out.join("CNAME"),
                }],
                scripts: vec![vendor.join("app.js")],
                styles: vec![vendor.join("site.css")],
                ..Default::default()
            },
            ..Default::default()
        });
        let templates = TemplateEngine::new(config.build.theme_dir());
        let writer = OutputWriter::current(WriteTracker::new());

        post_process(&config, &templates, &writer, Vec::new()).unwrap();
        writer.tracker().wait_idle().await;

        assert_eq!(fs::read_to_string(out.join("CNAME")).unwrap(), "example.com");
        assert!(out.join("js/app.js").exists());
        assert!(out.join("css/site.css").exists());
        assert!(!out.join("sitemap").exists());
    }
}
