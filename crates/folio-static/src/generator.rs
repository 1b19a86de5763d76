//! Static site generator.
//!
//! A run moves through these states:
//!
//! ```text
//! Idle ─► Clearing ─► Walking ─► AwaitingWrites ─► PostProcessing ─► Idle
//! ```
//!
//! A run does not start clearing the output directory while writes from the
//! previous run are still in flight, and post-processing only starts once
//! every write issued while walking has settled.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::output::{empty_dir, OutputWriter};
use crate::page::PageData;
use crate::paths::PathMapper;
use crate::postprocess::post_process;
use crate::processor::PageProcessor;
use crate::templates::TemplateEngine;
use crate::tracker::WriteTracker;
use crate::walker::walk_dir;

/// Phase of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Idle,
    Clearing,
    Walking,
    AwaitingWrites,
    PostProcessing,
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of documents found
    pub pages: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Static site generator.
///
/// One generator is meant to be reused across runs so that a new run can wait
/// for the previous run's writes.
#[derive(Debug)]
pub struct Generator {
    tracker: WriteTracker,
    state: Arc<Mutex<GeneratorState>>,
    run_lock: tokio::sync::Mutex<()>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Self {
            tracker: WriteTracker::new(),
            state: Arc::new(Mutex::new(GeneratorState::Idle)),
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Current phase.
    pub fn state(&self) -> GeneratorState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Tracker of this generator's in-flight writes.
    pub fn tracker(&self) -> &WriteTracker {
        &self.tracker
    }

    /// Wait for every scheduled write and copy, post-processing included.
    pub async fn wait_idle(&self) {
        self.tracker.wait_idle().await;
    }

    /// Run a full build.
    ///
    /// Returns once post-processing has been scheduled. Copies issued by
    /// post-processing may still be in flight; use [`Generator::wait_idle`]
    /// to wait for them.
    pub async fn generate(&self, config: SiteConfig) -> Result<BuildResult, BuildError> {
        let _run = self.run_lock.lock().await;
        let _reset = StateReset(Arc::clone(&self.state));
        let start = Instant::now();

        // Writes from an earlier run must not race the clear below.
        self.tracker.wait_idle().await;

        let config = Arc::new(config);
        let output_dir = config.build.output_dir.clone();

        self.set_state(GeneratorState::Clearing);
        empty_dir(&output_dir)
            .await
            .map_err(|source| BuildError::Clear {
                path: output_dir.clone(),
                source,
            })?;

        self.set_state(GeneratorState::Walking);
        let paths = PathMapper::new(&config.build);
        let templates = Arc::new(TemplateEngine::new(paths.theme_root()));
        let writer = OutputWriter::current(self.tracker.clone());

        let all_pages = {
            let config = Arc::clone(&config);
            let templates = Arc::clone(&templates);
            let writer = writer.clone();
            tokio::task::spawn_blocking(move || {
                generate_output(config, &paths, &templates, &writer)
            })
            .await
            .map_err(|e| BuildError::Task(e.to_string()))??
        };

        self.set_state(GeneratorState::AwaitingWrites);
        self.tracker.wait_idle().await;

        self.set_state(GeneratorState::PostProcessing);
        let pages = all_pages.len();
        post_process(&config, &templates, &writer, all_pages)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages,
            duration_ms: duration.as_millis() as u64,
            output_dir,
        })
    }

    fn set_state(&self, state: GeneratorState) {
        tracing::debug!("generator state: {:?}", state);
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }
}

/// Returns the generator to `Idle` when a run ends, successfully or not.
struct StateReset(Arc<Mutex<GeneratorState>>);

impl Drop for StateReset {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(|e| e.into_inner()) = GeneratorState::Idle;
    }
}

/// Walk the source tree and process every directory, collecting the
/// whole-site page list.
fn generate_output(
    config: Arc<SiteConfig>,
    paths: &PathMapper,
    templates: &TemplateEngine,
    writer: &OutputWriter,
) -> Result<Vec<PageData>, BuildError> {
    let listings = walk_dir(paths.source_root(), None, templates.template_extension())?;
    let processor = PageProcessor::new(config, paths, templates, writer);

    let mut all_pages = Vec::new();
    for listing in &listings {
        all_pages.extend(processor.process_dir(listing)?);
    }

    Ok(all_pages)
}
