/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported LLM APIs:
 * - OpenAI: chat completions, also used for OpenAI-compatible local servers
 * - Anthropic: messages API
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use reqwest::Response;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Turn a non-success HTTP response into the matching error
pub(crate) async fn error_for_status(provider: &str, response: Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    log::debug!("{} API error ({}): {}", provider, status, body);
    ProviderError::from_status(status, body)
}

pub mod anthropic;
pub mod mock;
pub mod openai;
