/*!
 * Dual-gate dispatcher.
 *
 * The file gate bounds how many work units are processed at once. The call
 * gate is shared by every file and bounds how many translation calls are in
 * flight; its capacity is files × languages per file. A language call holds
 * its call slot for the remote call plus the pacing delay that follows it.
 */

use futures::future::join_all;
use log::{error, info};
use tokio::time::sleep;

use crate::catalog::{TranslationResult, WorkUnit};
use crate::errors::ProviderError;
use crate::translation::concurrency::ConcurrencySettings;
use crate::translation::core::{TranslationRequest, Translator};
use crate::translation::gate::{AdmissionGate, GatePermit};

/// Routes work units and their language calls through the two gates
pub struct Dispatcher<'a, T: Translator + ?Sized> {
    translator: &'a T,
    settings: ConcurrencySettings,
    file_gate: AdmissionGate,
    call_gate: AdmissionGate,
}

impl<'a, T: Translator + ?Sized> Dispatcher<'a, T> {
    pub fn new(translator: &'a T, settings: ConcurrencySettings) -> Self {
        Self {
            translator,
            file_gate: AdmissionGate::new("files", settings.max_concurrent_files),
            call_gate: AdmissionGate::new("calls", settings.max_concurrent_calls()),
            settings,
        }
    }

    pub fn settings(&self) -> &ConcurrencySettings {
        &self.settings
    }

    pub fn file_gate(&self) -> &AdmissionGate {
        &self.file_gate
    }

    pub fn call_gate(&self) -> &AdmissionGate {
        &self.call_gate
    }

    /// Wait for a file slot
    pub async fn admit_file(&self) -> GatePermit<'_> {
        self.file_gate.acquire().await
    }

    /// Translate a unit into each of its missing languages.
    ///
    /// Every language resolves; results follow the order of
    /// `unit.missing_languages`.
    pub async fn translate_unit(&self, unit: &WorkUnit) -> Vec<TranslationResult> {
        join_all(
            unit.missing_languages
                .iter()
                .map(|language| self.translate_language(unit, language)),
        )
        .await
    }

    /// Translate a unit into one language. Never fails; errors become a
    /// `Failed` result.
    pub async fn translate_language(&self, unit: &WorkUnit, language: &str) -> TranslationResult {
        let request = TranslationRequest {
            source_text: unit.source_text.clone(),
            source_language: unit.source_language.clone(),
            target_language: language.to_string(),
            comment: unit.comment.clone(),
        };

        let _slot = self.call_gate.acquire().await;

        let result = match self.call(&request).await {
            Ok(value) => {
                info!("  Key #{} [{}] -> \"{}\"", unit.ordinal, language, value);
                TranslationResult::translated(language, value)
            }
            Err(e) => {
                error!("  Failed to translate Key #{} to '{}': {}", unit.ordinal, language, e);
                TranslationResult::failed(language, e.to_string())
            }
        };

        let delay = self.settings.api_delay;
        if !delay.is_zero() && (result.is_success() || self.settings.pace_after_failure) {
            sleep(delay).await;
        }

        result
    }

    async fn call(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let raw = self.translator.translate(request).await?;
        let value = raw.trim();
        if value.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(value.to_string())
    }
}
