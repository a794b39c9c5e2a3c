//! `{{ name }}` placeholder substitution.

use regex::{
    NoExpand,
    Regex,
};
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

/// How many occurrences of a repeated token one placeholder entry replaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplacementScope {
    /// Only the first occurrence of each token.
    #[default]
    First,
    /// Every occurrence of each token.
    All,
}

/// Ordered placeholder values supplied at lookup time.
///
/// Entries are applied in insertion order. Inserting a name that is already
/// present replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    /// Name → value, in application order
    entries: Vec<(String, String)>,
}

impl Placeholders {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            *existing = value;
        } else {
            self.entries.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from a JSON object, keeping key order.
    ///
    /// String values are used as-is; any other value uses its JSON text
    /// (`3`, `true`, `null`).
    #[must_use]
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        object
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (name.clone(), value)
            })
            .collect()
    }
}

impl<N, V> FromIterator<(N, V)> for Placeholders
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut placeholders = Self::new();
        for (name, value) in iter {
            placeholders.insert(name, value);
        }
        placeholders
    }
}

/// Pattern matching `{{ name }}` with any whitespace around the name.
fn token_pattern(name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(name)))
}

/// Replace placeholder tokens in `text`.
///
/// Each entry is applied in order to the running text, so a value inserted by
/// an earlier entry can itself be substituted by a later one. Tokens without a
/// matching entry are left verbatim.
///
/// # Examples
/// ```
/// use locale_strings::placeholder::{Placeholders, ReplacementScope, substitute};
///
/// let values = Placeholders::new().with("name", "world");
/// assert_eq!(substitute("hello {{ name }}", Some(&values), ReplacementScope::First), "hello world");
/// assert_eq!(substitute("{{a}} {{b}}", Some(&Placeholders::new().with("a", "x")), ReplacementScope::First), "x {{b}}");
/// ```
#[must_use]
pub fn substitute(
    text: &str,
    placeholders: Option<&Placeholders>,
    scope: ReplacementScope,
) -> String {
    let Some(placeholders) = placeholders else {
        return text.to_string();
    };

    let mut result = text.to_string();
    for (name, value) in placeholders.iter() {
        let pattern = match token_pattern(name) {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::warn!(name, "Skipping placeholder with unusable name: {e}");
                continue;
            }
        };
        let replaced = match scope {
            ReplacementScope::First => pattern.replace(&result, NoExpand(value)),
            ReplacementScope::All => pattern.replace_all(&result, NoExpand(value)),
        };
        result = replaced.into_owned();
    }
    result
}
