/*!
 * Prompt construction for catalog string translation.
 */

pub mod templates;

// Re-export main types
pub use templates::{PromptTemplate, TranslationPromptBuilder, clean_comment};
