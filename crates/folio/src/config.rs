//! Loading of `folio.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use folio_static::SiteConfig;

/// Load the site configuration.
///
/// A missing file yields the defaults; a malformed one is an error.
pub fn load_config(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        tracing::debug!("{} not found, using defaults", path.display());
        return Ok(SiteConfig::default());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: SiteConfig =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("folio.toml")).unwrap();

        assert_eq!(config.build.source_dir, PathBuf::from("content"));
        assert_eq!(config.build.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn reads_build_and_site_tables() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("folio.toml");
        fs::write(
            &path,
            "[build]\nsource_dir = \"docs\"\nscripts = [\"vendor/app.js\"]\n\n[site]\ntitle = \"Docs\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.build.source_dir, PathBuf::from("docs"));
        assert_eq!(config.build.scripts, vec![PathBuf::from("vendor/app.js")]);
        assert_eq!(config.site["title"], "Docs");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("folio.toml");
        fs::write(&path, "[build\nsource_dir = ").unwrap();

        let err = load_config(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse"));
    }
}
