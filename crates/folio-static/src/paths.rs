//! Source path to output path and URL mapping.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

use crate::config::{BuildConfig, INDEX_FILE, SOURCE_EXTENSION};
use crate::error::BuildError;

/// Derives output locations and URLs from source locations.
///
/// Raw URLs are relative paths with the OS separator; only [`PathMapper::url_for`]
/// produces a value that is safe to embed in HTML.
#[derive(Debug, Clone)]
pub struct PathMapper {
    source_root: PathBuf,
    output_root: PathBuf,
    theme_root: PathBuf,
    url_prefix: String,
    index_file: String,
    extension: String,
}

impl PathMapper {
    /// Create a mapper using the default index and extension conventions.
    pub fn new(config: &BuildConfig) -> Self {
        Self {
            source_root: config.source_dir.clone(),
            output_root: config.output_dir.clone(),
            theme_root: config.theme_dir(),
            url_prefix: config.url_prefix.clone(),
            index_file: INDEX_FILE.to_string(),
            extension: SOURCE_EXTENSION.to_string(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn theme_root(&self) -> &Path {
        &self.theme_root
    }

    /// Whether `path` names the reserved index document.
    pub fn is_index(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n == self.index_file)
    }

    /// Whether `path` is a source document.
    pub fn is_document(&self, path: &Path) -> bool {
        path.to_str().is_some_and(|p| p.ends_with(&self.extension))
    }

    /// Output path mirroring `source` under the output root.
    ///
    /// Theme files are placed relative to the theme root instead.
    pub fn output_path_for(&self, source: &Path) -> Result<PathBuf, BuildError> {
        let relative = source
            .strip_prefix(&self.theme_root)
            .or_else(|_| source.strip_prefix(&self.source_root))
            .map_err(|_| BuildError::OutOfTree(source.to_path_buf()))?;

        Ok(self.output_root.join(relative))
    }

    /// Path relative to the source root with the index file name or the
    /// extension removed, joined with the OS separator.
    pub fn raw_url_for(&self, source: &Path) -> Result<String, BuildError> {
        let relative = source
            .strip_prefix(&self.source_root)
            .map_err(|_| BuildError::OutOfTree(source.to_path_buf()))?;

        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let Some((file, dirs)) = segments.split_last() else {
            return Ok(String::new());
        };

        if *file == self.index_file {
            let mut raw = dirs.join(MAIN_SEPARATOR_STR);
            if !raw.is_empty() {
                raw.push(MAIN_SEPARATOR);
            }
            return Ok(raw);
        }

        let stem = match file.rfind('.') {
            Some(dot) => &file[..dot],
            None => file.as_str(),
        };

        let mut parts: Vec<&str> = dirs.iter().map(String::as_str).collect();
        parts.push(stem);
        Ok(parts.join(MAIN_SEPARATOR_STR))
    }

    /// Canonical URL of a document: the URL prefix joined with its raw URL,
    /// forward slashes only.
    pub fn url_for(&self, source: &Path) -> Result<String, BuildError> {
        let raw = self.raw_url_for(source)?;
        Ok(join_url(&self.url_prefix, &raw))
    }

    /// Published location of a document: `<output>/<raw url>/index.html`.
    pub fn output_html_path_for(&self, source: &Path) -> Result<PathBuf, BuildError> {
        let raw = self.raw_url_for(source)?;
        let path = self.output_root.join(raw).join("index.html");
        Ok(PathBuf::from(to_forward_slashes(&path.to_string_lossy())))
    }
}

/// Join a URL prefix and a raw relative path.
pub fn join_url(prefix: &str, raw: &str) -> String {
    let raw = to_forward_slashes(raw);
    let raw = raw.trim_start_matches('/');

    if raw.is_empty() {
        return to_forward_slashes(prefix);
    }

    let prefix = to_forward_slashes(prefix);
    format!("{}/{}", prefix.trim_end_matches('/'), raw)
}

fn to_forward_slashes(s: &str) -> String {
    s.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PathMapper {
        PathMapper::new(&BuildConfig {
            source_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("out"),
            ..Default::default()
        })
    }

    #[test]
    fn document_maps_to_clean_url_directory() {
        let m = mapper();

        assert_eq!(
            m.output_html_path_for(Path::new("src/blog/post.md")).unwrap(),
            PathBuf::from("out/blog/post/index.html")
        );
        assert_eq!(m.url_for(Path::new("src/blog/post.md")).unwrap(), "/blog/post");
    }

    #[test]
    fn index_maps_to_its_directory() {
        let m = mapper();

        assert_eq!(
            m.output_html_path_for(Path::new("src/index.md")).unwrap(),
            PathBuf::from("out/index.html")
        );
        assert_eq!(
            m.output_html_path_for(Path::new("src/blog/index.md")).unwrap(),
            PathBuf::from("out/blog/index.html")
        );
        assert_eq!(m.url_for(Path::new("src/index.md")).unwrap(), "/");
        assert_eq!(m.url_for(Path::new("src/blog/index.md")).unwrap(), "/blog/");
    }

    #[test]
    fn only_exact_index_name_is_index() {
        let m = mapper();

        assert!(m.is_index(Path::new("src/a/index.md")));
        assert!(!m.is_index(Path::new("src/a/myindex.md")));
        assert_eq!(
            m.output_html_path_for(Path::new("src/a/myindex.md")).unwrap(),
            PathBuf::from("out/a/myindex/index.html")
        );
    }

    #[test]
    fn raw_url_strips_only_last_extension() {
        let m = mapper();

        let raw = m.raw_url_for(Path::new("src/notes/v1.2.md")).unwrap();

        assert_eq!(raw, format!("notes{}v1.2", MAIN_SEPARATOR));
    }

    #[test]
    fn urls_use_prefix_and_forward_slashes() {
        let m = PathMapper::new(&BuildConfig {
            source_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("out"),
            url_prefix: "/docs/".to_string(),
            ..Default::default()
        });

        let url = m.url_for(Path::new("src/a/b/c.md")).unwrap();

        assert_eq!(url, "/docs/a/b/c");
        assert!(!url.contains('\\'));
    }

    #[test]
    fn join_url_normalizes_backslashes() {
        assert_eq!(join_url("/", "a\\b\\c"), "/a/b/c");
        assert_eq!(join_url("/", ""), "/");
        assert_eq!(join_url("/site", "a/"), "/site/a/");
    }

    #[test]
    fn assets_mirror_source_tree() {
        let m = mapper();

        assert_eq!(
            m.output_path_for(Path::new("src/assets/logo.png")).unwrap(),
            PathBuf::from("out/assets/logo.png")
        );
    }

    #[test]
    fn theme_files_map_relative_to_theme_root() {
        let m = mapper();

        assert_eq!(
            m.output_path_for(Path::new("src/.theme/css/site.css")).unwrap(),
            PathBuf::from("out/css/site.css")
        );
    }

    #[test]
    fn rejects_paths_outside_both_roots() {
        let m = mapper();

        assert!(matches!(
            m.output_path_for(Path::new("elsewhere/file.txt")),
            Err(BuildError::OutOfTree(_))
        ));
        assert!(matches!(
            m.url_for(Path::new("elsewhere/page.md")),
            Err(BuildError::OutOfTree(_))
        ));
    }
}
