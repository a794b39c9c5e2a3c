use thiserror::Error;

use crate::types::Source;

/// Failure while fetching or parsing a locale bundle.
///
/// Neither variant is retried; both leave the active locale untouched.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Transport failure (missing file, unreadable resource, non-success status)
    #[error("Failed to fetch bundle '{src}': {source}")]
    Fetch {
        src: Source,
        #[source]
        source: std::io::Error,
    },
    /// Payload is not a nested string mapping
    #[error("Failed to parse bundle '{src}': {source}")]
    Parse {
        src: Source,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// The source the failed load was for.
    #[must_use]
    pub const fn src(&self) -> &Source {
        match self {
            Self::Fetch { src, .. } | Self::Parse { src, .. } => src,
        }
    }
}

/// Errors raised while interpreting a binding value such as `key:{"name":"value"}`.
#[derive(Error, Debug)]
pub enum BindingError {
    #[error("Invalid placeholder JSON in binding '{value}': {source}")]
    InvalidPlaceholders {
        value: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Placeholders in binding '{value}' must be a JSON object")]
    PlaceholdersNotObject { value: String },
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn fetch_error_message_names_source() {
        let error = LoadError::Fetch {
            src: Source::from("locales/de.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };

        expect_that!(error.to_string(), contains_substring("locales/de.json"));
        expect_that!(error.to_string(), contains_substring("no such file"));
        expect_that!(error.src().as_str(), eq("locales/de.json"));
    }

    #[googletest::test]
    fn parse_error_exposes_source_chain() {
        let Err(json_error) = serde_json::from_str::<serde_json::Value>("{") else {
            return;
        };
        let error = LoadError::Parse { src: Source::from("fr.json"), source: json_error };

        expect_that!(std::error::Error::source(&error).is_some(), eq(true));
        expect_that!(error.to_string(), contains_substring("Failed to parse bundle 'fr.json'"));
    }
}
