/*!
 * Fan-out/fan-in over the pending work units.
 *
 * Every pending descriptor becomes one file task. All file tasks are driven
 * together by `join_all` on the calling task, so they enter the file gate in
 * ordinal order. Each file task fans out one call per missing language,
 * waits for all of them, applies the successes and persists the fragment.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::join_all;
use log::{debug, error, info, warn};
use tokio::time::Instant;

use crate::catalog::{CatalogStore, PendingDescriptor};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::translation::concurrency::ConcurrencySettings;
use crate::translation::core::Translator;
use crate::translation::dispatcher::Dispatcher;

/// Progress callback: `(completed units, total units)`
pub type ProgressFn<'a> = Box<dyn Fn(usize, usize) + Send + Sync + 'a>;

/// Totals of a translate run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Descriptors found
    pub units: usize,
    /// Descriptors that could be read
    pub read: usize,
    /// Fragments written
    pub persisted: usize,
    /// Descriptors that were unreadable or whose fragment could not be written
    pub failed_units: Vec<String>,
    /// Successful (unit, language) calls
    pub languages_translated: usize,
    /// Failed (unit, language) calls
    pub languages_failed: usize,
    /// Highest number of files in flight
    pub peak_files: usize,
    /// Highest number of calls in flight
    pub peak_calls: usize,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn is_empty(&self) -> bool {
        self.units == 0
    }
}

/// How one file task ended
#[derive(Debug)]
enum FileOutcome {
    Persisted { translated: usize, failed: usize },
    Unreadable,
    NotPersisted { translated: usize, failed: usize },
}

/// Runs the translate stage over a catalog store
pub struct Orchestrator<'a, T: Translator + ?Sized> {
    store: &'a CatalogStore,
    dispatcher: Dispatcher<'a, T>,
    progress: Option<ProgressFn<'a>>,
}

impl<'a, T: Translator + ?Sized> Orchestrator<'a, T> {
    pub fn new(store: &'a CatalogStore, translator: &'a T, settings: ConcurrencySettings) -> Self {
        Self {
            store,
            dispatcher: Dispatcher::new(translator, settings),
            progress: None,
        }
    }

    /// Call `progress` after each unit finishes
    pub fn with_progress(mut self, progress: impl Fn(usize, usize) + Send + Sync + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher<'a, T> {
        &self.dispatcher
    }

    /// Translate every pending descriptor.
    ///
    /// Translation failures never abort the run. It fails only when
    /// descriptors exist and none of them could be read.
    pub async fn run(&self) -> Result<RunSummary, AppError> {
        let start = Instant::now();
        let layout = self.store.layout();

        if !FileManager::dir_exists(layout.needs_translation_dir()) {
            info!("No {:?} directory found. Nothing to do.", layout.needs_translation_dir());
            return Ok(RunSummary::default());
        }
        FileManager::ensure_dir(layout.translated_dir())?;

        let pending = self.store.list_pending()?;
        if pending.is_empty() {
            info!("No files found in the translation directory. Nothing to do.");
            return Ok(RunSummary::default());
        }

        let settings = self.dispatcher.settings();
        info!(
            "Found {} keys to translate (files: {}, languages per file: {}, delay: {}ms)",
            pending.len(),
            settings.max_concurrent_files,
            settings.max_concurrent_languages,
            settings.api_delay.as_millis()
        );

        let total = pending.len();
        let completed = AtomicUsize::new(0);
        let outcomes = join_all(
            pending
                .iter()
                .map(|descriptor| self.process_file(descriptor, &completed, total)),
        )
        .await;

        let mut summary = RunSummary {
            units: total,
            ..Default::default()
        };
        for (descriptor, outcome) in pending.iter().zip(outcomes) {
            match outcome {
                FileOutcome::Persisted { translated, failed } => {
                    summary.read += 1;
                    summary.persisted += 1;
                    summary.languages_translated += translated;
                    summary.languages_failed += failed;
                }
                FileOutcome::NotPersisted { translated, failed } => {
                    summary.read += 1;
                    summary.languages_translated += translated;
                    summary.languages_failed += failed;
                    summary.failed_units.push(descriptor.file_name.clone());
                }
                FileOutcome::Unreadable => summary.failed_units.push(descriptor.file_name.clone()),
            }
        }
        summary.peak_files = self.dispatcher.file_gate().peak_occupancy();
        summary.peak_calls = self.dispatcher.call_gate().peak_occupancy();
        summary.elapsed = start.elapsed();

        if summary.read == 0 {
            return Err(AppError::NoUnitsRead(total));
        }
        if !summary.failed_units.is_empty() {
            warn!("{} keys could not be processed: {}", summary.failed_units.len(), summary.failed_units.join(", "));
        }
        Ok(summary)
    }

    /// One file task: holds a file slot from descriptor read to fragment write
    async fn process_file(&self, descriptor: &PendingDescriptor, completed: &AtomicUsize, total: usize) -> FileOutcome {
        let outcome = {
            let _slot = self.dispatcher.admit_file().await;
            self.translate_file(descriptor).await
        };

        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(progress) = &self.progress {
            progress(done, total);
        }
        outcome
    }

    async fn translate_file(&self, descriptor: &PendingDescriptor) -> FileOutcome {
        let (unit, mut fragment) = match self.store.read_descriptor(descriptor) {
            Ok(loaded) => loaded,
            Err(e) => {
                error!("Error processing file {}: {}", descriptor.file_name, e);
                return FileOutcome::Unreadable;
            }
        };

        info!("Processing Key #{} ({})", unit.ordinal, unit.file_name);
        debug!("  Text: \"{}\"", unit.source_text.replace('\n', "\\n"));
        if let Some(comment) = &unit.comment {
            debug!("  Comment: \"{}\"", comment.replace('\n', " "));
        }
        info!("  Missing languages: {}", unit.missing_languages.join(", "));

        match fragment.ensure_localizations() {
            Ok(true) => debug!("  Initializing 'localizations' for key #{}", unit.ordinal),
            Ok(false) => {}
            Err(e) => {
                error!("Error processing file {}: {}", descriptor.file_name, e);
                return FileOutcome::Unreadable;
            }
        }

        let results = self.dispatcher.translate_unit(&unit).await;

        let mut translated = 0;
        let mut failed = 0;
        for result in &results {
            match fragment.apply(result) {
                Ok(true) => translated += 1,
                Ok(false) => failed += 1,
                Err(e) => {
                    error!("  Could not apply {} to key #{}: {}", result, unit.ordinal, e);
                    failed += 1;
                }
            }
        }

        match self.store.write_fragment(&unit.file_name, &fragment) {
            Ok(path) => {
                debug!("  Saved {:?}", path);
                info!(
                    "  Key #{} completed ({} translated, {} failed)",
                    unit.ordinal, translated, failed
                );
                FileOutcome::Persisted { translated, failed }
            }
            Err(e) => {
                error!("Error saving key #{} ({}): {}", unit.ordinal, unit.file_name, e);
                FileOutcome::NotPersisted { translated, failed }
            }
        }
    }
}
