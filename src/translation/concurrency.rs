/*!
 * Provider-specific concurrency tuning.
 *
 * Each provider gets a default number of files in flight, language calls
 * per file, and pacing delay. Values set in the config file override them.
 */

use std::time::Duration;

use crate::app_config::{ConcurrencyConfig, TranslationProvider};

/// Provider-specific concurrency profile with tuned defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    /// Files processed at the same time
    pub max_concurrent_files: usize,
    /// Language calls in flight per file
    pub max_concurrent_languages: usize,
    /// Pause after each call, in milliseconds
    pub api_delay_ms: u64,
}

impl ProviderProfile {
    /// Get the profile for a given provider
    pub fn for_provider(provider: TranslationProvider) -> Self {
        match provider {
            TranslationProvider::OpenAI => Self {
                max_concurrent_files: 5,
                max_concurrent_languages: 3,
                api_delay_ms: 100,
            },
            TranslationProvider::Anthropic => Self {
                // Lower request-per-minute ceiling
                max_concurrent_files: 2,
                max_concurrent_languages: 2,
                api_delay_ms: 150,
            },
            TranslationProvider::LMStudio => Self {
                // A local server usually runs one model instance
                max_concurrent_files: 2,
                max_concurrent_languages: 1,
                api_delay_ms: 0,
            },
        }
    }

    /// Apply config overrides to this profile
    pub fn settings(&self, overrides: &ConcurrencyConfig) -> ConcurrencySettings {
        ConcurrencySettings {
            max_concurrent_files: overrides
                .max_concurrent_files
                .unwrap_or(self.max_concurrent_files),
            max_concurrent_languages: overrides
                .max_concurrent_languages
                .unwrap_or(self.max_concurrent_languages),
            api_delay: Duration::from_millis(overrides.api_delay_ms.unwrap_or(self.api_delay_ms)),
            pace_after_failure: overrides.pace_after_failure,
        }
    }
}

/// Resolved limits used by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencySettings {
    pub max_concurrent_files: usize,
    pub max_concurrent_languages: usize,
    pub api_delay: Duration,
    pub pace_after_failure: bool,
}

impl ConcurrencySettings {
    /// Capacity of the shared call gate
    pub fn max_concurrent_calls(&self) -> usize {
        self.max_concurrent_files
            .max(1)
            .saturating_mul(self.max_concurrent_languages.max(1))
    }
}

impl Default for ConcurrencySettings {
    fn default() -> Self {
        ProviderProfile::for_provider(TranslationProvider::default())
            .settings(&ConcurrencyConfig::default())
    }
}
