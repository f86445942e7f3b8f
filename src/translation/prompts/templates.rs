/*!
 * Prompt templates for catalog string translation.
 *
 * Each request carries a single string, so the prompt is one user message
 * and the reply is expected to be the bare translated text.
 */

use crate::translation::core::TranslationRequest;

/// Prompt template with `{placeholder}` variables.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// Opening sentence naming the languages and the text.
    pub const APP_STRING: &'static str = "Translate the following text for an iOS app from {source_language} to the language with code '{target_language}'. The text to translate is: \"{text}\".";

    /// Context sentence, added only when the key has a comment.
    pub const COMMENT_CONTEXT: &'static str = " A helpful comment for context is: \"{comment}\".";

    /// Output rules appended to every prompt.
    pub const OUTPUT_RULES: &'static str = " Your response should ONLY contain the translated string, with no additional explanation, commentary, or quotation marks. Preserve placeholders like '%@', '%d', and '%1$@' exactly as they are.";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// The default app string template.
    pub fn app_string() -> Self {
        Self::new(Self::APP_STRING)
    }

    /// Render the template, replacing each `{name}` with its value.
    pub fn render(&self, variables: &[(&str, &str)]) -> String {
        variables
            .iter()
            .fold(self.template.clone(), |rendered, (name, value)| {
                rendered.replace(&format!("{{{}}}", name), value)
            })
    }
}

/// Builder for the prompt sent for one (string, language) pair.
#[derive(Debug, Clone)]
pub struct TranslationPromptBuilder {
    source_language: String,
    target_language: String,
    text: String,
    comment: Option<String>,
}

impl TranslationPromptBuilder {
    /// Create a new prompt builder.
    pub fn new(source_language: &str, target_language: &str, text: &str) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            text: text.to_string(),
            comment: None,
        }
    }

    /// Builder pre-filled from a translation request.
    pub fn from_request(request: &TranslationRequest) -> Self {
        let builder = Self::new(
            &request.source_language,
            &request.target_language,
            &request.source_text,
        );
        match request.comment.as_deref() {
            Some(comment) => builder.with_comment(comment),
            None => builder,
        }
    }

    /// Set the developer comment used as context.
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string()).filter(|c| !c.trim().is_empty());
        self
    }

    /// Build the complete prompt.
    pub fn build(&self) -> String {
        let mut prompt = PromptTemplate::app_string().render(&[
            ("source_language", self.source_language.as_str()),
            ("target_language", self.target_language.as_str()),
            ("text", self.text.as_str()),
        ]);

        if let Some(comment) = &self.comment {
            let clean = clean_comment(comment);
            prompt.push_str(&PromptTemplate::new(PromptTemplate::COMMENT_CONTEXT).render(&[("comment", clean.as_str())]));
        }

        prompt.push_str(PromptTemplate::OUTPUT_RULES);
        prompt
    }
}

/// Escape double quotes and flatten line breaks
pub fn clean_comment(comment: &str) -> String {
    comment.replace('"', "\\\"").replace('\n', " ")
}
