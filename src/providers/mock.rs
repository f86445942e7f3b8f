/*!
 * Mock provider for testing.
 *
 * Behaviour is set once for every call and can be overridden per target
 * language:
 * - `MockProvider::working()` - echoes `[lang] text`
 * - `MockProvider::failing()` - always errors
 * - `MockProvider::intermittent(n)` - every nth call errors
 * - `.respond(lang, text)`, `.fail(lang, reason)`, `.delay(lang, ms)` - per-language script
 *
 * Clones share their counters, so a test can keep a handle while the
 * dispatcher owns another.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::translation::core::{TranslationRequest, Translator};

/// Mock request for testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    /// Source language
    pub source_language: String,
    /// Target language
    pub target_language: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The translated text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
}

/// Scripted answer for one target language
#[derive(Debug, Clone, PartialEq)]
pub enum LanguageScript {
    /// Answer with this text
    Respond(String),
    /// Fail with this message
    Fail(String),
}

#[derive(Debug, Default)]
struct MockStats {
    requests: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    history: Mutex<Vec<MockRequest>>,
}

/// Decrements the in-flight counter even if the call future is dropped
struct InFlight<'a>(&'a MockStats);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Per-language overrides
    scripts: HashMap<String, LanguageScript>,
    /// Per-language latency
    delays: HashMap<String, Duration>,
    /// Latency for languages without their own
    default_delay: Duration,
    /// Counters shared between clones
    stats: Arc<MockStats>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            scripts: HashMap::new(),
            delays: HashMap::new(),
            default_delay: Duration::ZERO,
            stats: Arc::new(MockStats::default()),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent {
            fail_every: fail_every.max(1),
        })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Answer `text` for `language`
    pub fn respond(mut self, language: &str, text: &str) -> Self {
        self.scripts
            .insert(language.to_string(), LanguageScript::Respond(text.to_string()));
        self
    }

    /// Fail every call for `language`
    pub fn fail(mut self, language: &str, reason: &str) -> Self {
        self.scripts
            .insert(language.to_string(), LanguageScript::Fail(reason.to_string()));
        self
    }

    /// Take `millis` before answering for `language`
    pub fn delay(mut self, language: &str, millis: u64) -> Self {
        self.delays
            .insert(language.to_string(), Duration::from_millis(millis));
        self
    }

    /// Take `millis` before answering any language without its own delay
    pub fn with_latency(mut self, millis: u64) -> Self {
        self.default_delay = Duration::from_millis(millis);
        self
    }

    /// Calls received so far
    pub fn request_count(&self) -> usize {
        self.stats.requests.load(Ordering::SeqCst)
    }

    /// Highest number of calls in progress at once
    pub fn peak_in_flight(&self) -> usize {
        self.stats.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Every request, in arrival order
    pub fn history(&self) -> Vec<MockRequest> {
        self.stats.history.lock().clone()
    }

    fn latency_for(&self, language: &str) -> Duration {
        self.delays
            .get(language)
            .copied()
            .unwrap_or(self.default_delay)
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.stats.requests.fetch_add(1, Ordering::SeqCst);
        let current = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        let _in_flight = InFlight(&self.stats);
        self.stats.history.lock().push(request.clone());

        let latency = self.latency_for(&request.target_language);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if let Some(script) = self.scripts.get(&request.target_language) {
            return match script {
                LanguageScript::Respond(text) => Ok(MockResponse { text: text.clone() }),
                LanguageScript::Fail(reason) => Err(ProviderError::RequestFailed(reason.clone())),
            };
        }

        match self.behavior {
            MockBehavior::Working => Ok(MockResponse {
                text: format!("[{}] {}", request.target_language, request.text),
            }),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(MockResponse {
                        text: format!("[{}] {}", request.target_language, request.text),
                    })
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(MockResponse { text: String::new() }),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}

#[async_trait]
impl Translator for MockProvider {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let response = self
            .complete(MockRequest {
                text: request.source_text.clone(),
                source_language: request.source_language.clone(),
                target_language: request.target_language.clone(),
            })
            .await?;
        Ok(Self::extract_text(&response))
    }
}
