/*!
 * Core translation service implementation.
 *
 * `Translator` is the seam the dispatcher calls through. `TranslationService`
 * implements it on top of the configured HTTP provider; tests plug in the
 * mock provider instead.
 */

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, info};

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{AppError, ProviderError};
use crate::providers::Provider;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::translation::prompts::TranslationPromptBuilder;

/// Upper bound for a single string's translation
const MAX_TOKENS: u32 = 1024;

/// One string to translate into one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub source_text: String,
    pub source_language: String,
    pub target_language: String,
    pub comment: Option<String>,
}

/// Anything that can translate a single request
#[async_trait]
pub trait Translator: Send + Sync {
    /// Raw translated text; callers trim and validate it
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// OpenAI API service
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio {
        /// Client instance (OpenAI-compatible)
        client: OpenAI,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },
}

/// Main translation service for catalog strings
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    model: String,
}

impl TranslationService {
    /// Create a service for the configured provider.
    ///
    /// Fails with `MissingCredential` when the provider needs an API key and
    /// none is configured.
    pub fn new(config: TranslationConfig) -> Result<Self, AppError> {
        let api_key = config.require_api_key()?;
        Ok(Self::with_api_key(config, api_key))
    }

    /// Create a service with an explicit API key
    pub fn with_api_key(config: TranslationConfig, api_key: String) -> Self {
        let endpoint = config.get_endpoint();
        let timeout = Duration::from_secs(config.get_timeout_secs());

        let provider = match config.provider {
            TranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new(api_key, endpoint, timeout),
            },
            TranslationProvider::LMStudio => TranslationProviderImpl::LMStudio {
                client: OpenAI::new(api_key, endpoint, timeout),
            },
            TranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(api_key, endpoint, timeout),
            },
        };

        Self {
            provider,
            model: config.get_model(),
            config,
        }
    }

    /// Model name sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        info!(
            "Testing connection to {} with model {}",
            self.config.provider.display_name(),
            self.model
        );
        match &self.provider {
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                client.test_connection().await
            }
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
        }
    }

    /// Translate a single string
    pub async fn translate_text(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let start_time = Instant::now();
        let prompt = TranslationPromptBuilder::from_request(request).build();
        let temperature = self.config.common.temperature;

        let text = match &self.provider {
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                let request = OpenAIRequest::new(&self.model)
                    .add_message("user", prompt)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                if let Some(usage) = &response.usage {
                    debug!(
                        "Token usage: {} prompt, {} completion",
                        usage.prompt_tokens, usage.completion_tokens
                    );
                }
                OpenAI::extract_text(&response)
            }
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(&self.model, MAX_TOKENS)
                    .add_message("user", prompt)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                debug!(
                    "Token usage: {} input, {} output",
                    response.usage.input_tokens, response.usage.output_tokens
                );
                Anthropic::extract_text(&response)
            }
        };

        debug!(
            "{} response for '{}' received in {:?}",
            self.config.provider.display_name(),
            request.target_language,
            start_time.elapsed()
        );
        Ok(text)
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        self.translate_text(request).await
    }
}
