//! Delivery instruction templates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Text wrapped around each phrase to steer delivery.
///
/// The template must contain [`InstructionTemplate::PLACEHOLDER`]; every
/// occurrence is replaced by the phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstructionTemplate(String);

impl InstructionTemplate {
    /// Marker replaced by the phrase text.
    pub const PLACEHOLDER: &'static str = "{phrase}";
    /// Default template.
    pub const DEFAULT: &'static str = "Say quickly and in an australian accent: {phrase}";

    /// Create a template, checking it contains the placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `{phrase}` does not appear in `template`.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(Self::PLACEHOLDER) {
            return Err(Error::config(format!(
                "instruction template {template:?} must contain {}",
                Self::PLACEHOLDER
            )));
        }
        Ok(Self(template))
    }

    /// Render the prompt for a phrase.
    #[must_use]
    pub fn render(&self, phrase: &str) -> String {
        self.0.replace(Self::PLACEHOLDER, phrase)
    }

    /// The raw template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for InstructionTemplate {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for InstructionTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for InstructionTemplate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<InstructionTemplate> for String {
    fn from(template: InstructionTemplate) -> Self {
        template.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_renders_phrase() {
        let prompt = InstructionTemplate::default().render("G'day mate");
        assert_eq!(prompt, "Say quickly and in an australian accent: G'day mate");
    }

    #[test]
    fn phrase_is_inserted_verbatim() {
        let template = InstructionTemplate::new("Whisper: {phrase}").unwrap();
        assert_eq!(template.render("{not a placeholder}!"), "Whisper: {not a placeholder}!");
    }

    #[test]
    fn every_placeholder_is_replaced() {
        let template = InstructionTemplate::new("{phrase}, I said {phrase}").unwrap();
        assert_eq!(template.render("hi"), "hi, I said hi");
    }

    #[test]
    fn missing_placeholder_is_rejected() {
        let err = InstructionTemplate::new("Say something").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn deserializes_with_validation() {
        let ok: InstructionTemplate = serde_json::from_str(r#""Slowly: {phrase}""#).unwrap();
        assert_eq!(ok.as_str(), "Slowly: {phrase}");

        assert!(serde_json::from_str::<InstructionTemplate>(r#""no marker""#).is_err());
    }
}
