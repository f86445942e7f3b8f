/*!
 * Error types for the xcstrans application.
 *
 * Provider failures are recovered per language by the dispatcher, catalog
 * failures abort only the unit or stage that hit them, and application
 * errors are fatal for the command being run.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider answered, but with nothing usable
    #[error("Empty response from provider")]
    EmptyResponse,
}

impl ProviderError {
    /// Map a non-success HTTP status and body onto the matching variant
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::ConnectionError(format!("request timed out: {}", error))
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised while reading or writing catalog documents
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog or descriptor file does not exist
    #[error("File not found: {0:?}")]
    NotFound(PathBuf),

    /// Reading or writing a file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid catalog JSON
    #[error("Invalid JSON in {path:?}: {source}")]
    InvalidJson {
        /// File being parsed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// A pending-work descriptor does not hold exactly one key
    #[error("Descriptor {path:?} must contain exactly one key, found {found}")]
    NotSingleKey {
        /// Descriptor file
        path: PathBuf,
        /// Number of keys present
        found: usize,
    },

    /// A string entry is not a JSON object
    #[error("Entry for key {0:?} is not an object")]
    MalformedEntry(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// No API key for a provider that needs one
    #[error("Missing API key for {provider}: set it in the config file or the {env_var} environment variable")]
    MissingCredential {
        /// Provider display name
        provider: String,
        /// Environment variable consulted
        env_var: String,
    },

    /// Descriptors existed but none of them could be read
    #[error("None of the {0} pending descriptors could be read")]
    NoUnitsRead(usize),

    /// The merge stage found no fragments
    #[error("No files found in {0:?} or {1:?}; nothing to merge")]
    NothingToMerge(PathBuf, PathBuf),

    /// The output root would swallow a file that must survive a split
    #[error("Refusing to reset {root:?}: it contains {protected:?}")]
    UnsafeOutputRoot {
        /// Output root that would be removed
        root: PathBuf,
        /// File or directory that lives inside it
        protected: PathBuf,
    },

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from catalog processing
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
