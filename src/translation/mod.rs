/*!
 * Translation stage: bounded-concurrency calls to an AI provider.
 *
 * - `core`: the `Translator` seam and the provider-backed service
 * - `prompts`: prompt templates and builder
 * - `concurrency`: provider profiles and resolved limits
 * - `gate`: FIFO admission gate
 * - `dispatcher`: file and call gates, per-language task
 * - `orchestrator`: fan-out/fan-in over pending work units
 */

// Re-export main types for easier usage
pub use self::concurrency::{ConcurrencySettings, ProviderProfile};
pub use self::core::{TranslationRequest, TranslationService, Translator};
pub use self::dispatcher::Dispatcher;
pub use self::gate::{AdmissionGate, GatePermit};
pub use self::orchestrator::{Orchestrator, RunSummary};

// Re-export prompt types
pub use self::prompts::{PromptTemplate, TranslationPromptBuilder};

// Submodules
pub mod concurrency;
pub mod core;
pub mod dispatcher;
pub mod gate;
pub mod orchestrator;
pub mod prompts;
