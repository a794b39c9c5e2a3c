use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::placeholder::ReplacementScope;
use crate::resolve::DEFAULT_KEY_SEPARATOR;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "keySeparator")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatorSettings {
    /// Separator between translation key segments.
    pub key_separator: String,

    /// Separator between the key and the placeholder JSON in a binding value
    /// (`key:{"name":"value"}`). Only the first occurrence splits.
    pub binding_separator: String,

    /// Whether a placeholder replaces the first or every occurrence of its token.
    pub replacement: ReplacementScope,

    /// Directory relative bundle sources are read from.
    /// Relative paths are resolved against the workspace root.
    pub bundle_root: Option<PathBuf>,

    /// Source activated at startup by the command-line front end.
    pub initial_source: Option<String>,
}

impl TranslatorSettings {
    /// # Errors
    /// - Empty separator
    /// - Empty initial source
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.binding_separator.is_empty() {
            errors.push(ValidationError::new(
                "bindingSeparator",
                "The separator cannot be empty. Please specify a separator, for example: \":\" (colon)",
            ));
        }

        if let Some(source) = &self.initial_source
            && source.is_empty()
        {
            errors.push(ValidationError::new(
                "initialSource",
                "The source cannot be empty. Please specify a bundle path, or remove this field",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            key_separator: DEFAULT_KEY_SEPARATOR.to_string(),
            binding_separator: ":".to_string(),
            replacement: ReplacementScope::default(),
            bundle_root: None,
            initial_source: None,
        }
    }
}
