//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use folio_static::Generator;

use crate::config::load_config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Building static site...");

    let mut config = load_config(config_path)?;
    if let Some(output) = output {
        config.build.output_dir = output;
    }

    let generator = Generator::new();
    let result = generator.generate(config).await?;

    // Post-processing copies are still in flight when generate returns.
    generator.wait_idle().await;

    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);
    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
