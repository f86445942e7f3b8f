use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::catalog::split::load_catalog;
use crate::catalog::{
    CatalogLayout, CatalogStore, MergeSummary, MissingReport, SplitSummary, merge_catalog,
    missing_report, split_catalog,
};
use crate::translation::{Orchestrator, RunSummary, TranslationService, Translator};

// @module: Application controller for the split, translate and merge stages

/// Summaries of a full pipeline run
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub split: SplitSummary,
    pub translate: RunSummary,
    pub merge: MergeSummary,
}

/// Main application controller for catalog translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Draw a progress bar during the translate stage
    show_progress: bool,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Ok(Self::with_config(Config::default())?.without_progress())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            show_progress: true,
        })
    }

    /// Do not draw the translate progress bar
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stage directories for the configured output root
    pub fn layout(&self) -> CatalogLayout {
        CatalogLayout::new(&self.config.paths.output_dir, &self.config.paths.final_file_name)
    }

    /// Split the configured input catalog into chunk files
    pub fn split(&self) -> Result<SplitSummary> {
        let input = &self.config.paths.input_file;
        info!("Splitting {:?} into {:?}", input, self.config.paths.output_dir);
        split_catalog(input, &self.layout())
    }

    /// Log the per-key missing languages of the configured input catalog
    pub fn report(&self) -> Result<MissingReport> {
        let catalog = load_catalog(&self.config.paths.input_file)?;
        let report = missing_report(&catalog);

        info!(
            "Found {} languages in the catalog: {}",
            report.languages.len(),
            report.languages.join(", ")
        );
        info!("Source language: {}", report.source_language);
        if report.is_complete() {
            info!("All {} keys are fully translated", report.total_keys);
        } else {
            info!(
                "{} of {} keys have missing translations:",
                report.keys.len(),
                report.total_keys
            );
            for missing in &report.keys {
                info!("  \"{}\" -> {}", missing.key, missing.missing.join(", "));
            }
        }
        Ok(report)
    }

    /// Build the configured translation service.
    ///
    /// Fails before any work when the provider needs an API key and none is set.
    pub fn translation_service(&self) -> Result<TranslationService> {
        let service = TranslationService::new(self.config.translation.clone())?;
        info!(
            "Using {} with model {}",
            self.config.translation.provider.display_name(),
            service.model()
        );
        Ok(service)
    }

    /// Translate every pending descriptor with the configured provider
    pub async fn translate(&self) -> Result<RunSummary> {
        let service = self.translation_service()?;
        self.translate_with(&service).await
    }

    /// Translate every pending descriptor with `translator`
    pub async fn translate_with<T: Translator + ?Sized>(&self, translator: &T) -> Result<RunSummary> {
        let store = CatalogStore::new(self.layout());
        let settings = self.config.concurrency_settings();

        let progress_bar = self.progress_bar();
        let orchestrator = Orchestrator::new(&store, translator, settings).with_progress(|done, total| {
            if let Some(pb) = &progress_bar {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            }
        });

        let result = orchestrator.run().await;
        if let Some(pb) = &progress_bar {
            pb.finish_and_clear();
        }
        let summary = result?;

        Self::log_run_summary(&summary);
        Ok(summary)
    }

    /// Merge the complete and translated fragments into the final catalog
    pub fn merge(&self) -> Result<MergeSummary> {
        let summary = merge_catalog(&self.layout())?;
        if summary.incomplete_keys > 0 {
            info!(
                "Merge finished: {} keys, {} still missing translations",
                summary.keys, summary.incomplete_keys
            );
        }
        Ok(summary)
    }

    /// Split, translate and merge with the configured provider
    pub async fn run(&self) -> Result<PipelineSummary> {
        // Credentials are checked before the output directory is touched
        let service = self.translation_service()?;
        self.run_with(&service).await
    }

    /// Split, translate and merge with `translator`
    pub async fn run_with<T: Translator + ?Sized>(&self, translator: &T) -> Result<PipelineSummary> {
        let start_time = Instant::now();

        let split = self.split()?;
        let translate = self.translate_with(translator).await?;
        let merge = self.merge()?;

        info!(
            "Pipeline finished in {}: {} keys merged into {:?}",
            Self::format_duration(start_time.elapsed()),
            merge.keys,
            merge.output
        );
        Ok(PipelineSummary { split, translate, merge })
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} keys ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(template_result.progress_chars("█▓▒░"));
        Some(pb)
    }

    fn log_run_summary(summary: &RunSummary) {
        if summary.is_empty() {
            return;
        }
        info!(
            "Translation finished in {}: {}/{} keys saved, {} languages translated, {} failed",
            Self::format_duration(summary.elapsed),
            summary.persisted,
            summary.units,
            summary.languages_translated,
            summary.languages_failed
        );
        info!(
            "Peak concurrency: {} files, {} calls",
            summary.peak_files, summary.peak_calls
        );
        if !summary.failed_units.is_empty() {
            warn!(
                "Re-run translate after fixing: {}",
                summary.failed_units.join(", ")
            );
        }
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
