//! Binds a translation key to a piece of displayed text.
//!
//! A binding value is either `key` or `key:{"name":"value"}`. The binding
//! renders the resolved string into its [`TextTarget`] when attached and again
//! after every locale change until it is detached.

use std::sync::{
    Arc,
    Mutex,
    PoisonError,
    Weak,
};

use serde_json::Value;

use crate::error::BindingError;
use crate::notifier::ListenerId;
use crate::placeholder::Placeholders;
use crate::translator::Translator;

/// The UI node a binding writes into.
pub trait TextTarget: Send + Sync {
    fn set_text(&self, text: &str);
}

impl<T: TextTarget + ?Sized> TextTarget for Arc<T> {
    fn set_text(&self, text: &str) {
        (**self).set_text(text);
    }
}

/// A parsed binding value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingValue {
    /// Translation key
    key: String,
    /// Values from the JSON object after the separator
    placeholders: Option<Placeholders>,
}

impl BindingValue {
    /// Split `raw` at the first `separator` into a key and a JSON object of
    /// placeholder values.
    ///
    /// # Errors
    /// - The text after the separator is not valid JSON
    /// - It is valid JSON but not an object
    pub fn parse(raw: &str, separator: &str) -> Result<Self, BindingError> {
        let split = if separator.is_empty() { None } else { raw.split_once(separator) };
        let Some((key, json)) = split else {
            return Ok(Self { key: raw.to_string(), placeholders: None });
        };

        let value: Value = serde_json::from_str(json)
            .map_err(|e| BindingError::InvalidPlaceholders { value: raw.to_string(), source: e })?;
        let Value::Object(object) = value else {
            return Err(BindingError::PlaceholdersNotObject { value: raw.to_string() });
        };

        Ok(Self { key: key.to_string(), placeholders: Some(Placeholders::from_json_object(&object)) })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn placeholders(&self) -> Option<&Placeholders> {
        self.placeholders.as_ref()
    }

    /// Text shown when the key does not resolve.
    #[must_use]
    pub fn fallback(&self) -> String {
        format!("{{{{{}}}}}", self.key)
    }
}

/// The bound value as given and as parsed.
#[derive(Debug)]
struct Current {
    raw: String,
    value: BindingValue,
}

/// Shared between the binding and its listener.
#[derive(Debug)]
struct BindingState<T> {
    /// Where rendered text goes
    target: T,
    current: Mutex<Current>,
}

impl<T: TextTarget> BindingState<T> {
    /// Snapshot of the parsed value, taken so no lock is held while rendering.
    fn value(&self) -> BindingValue {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).value.clone()
    }

    /// Resolve the value and write it, or its fallback, to the target.
    fn render<L>(&self, translator: &Translator<L>) {
        let value = self.value();
        let text =
            translator.get(value.key(), value.placeholders()).unwrap_or_else(|| value.fallback());
        self.target.set_text(&text);
    }
}

/// A key bound to a [`TextTarget`], kept current across locale switches.
///
/// The listener registered on attach holds only a weak reference to the
/// translator. Dropping an attached binding detaches it.
#[derive(Debug)]
pub struct TranslationBinding<L, T> {
    translator: Arc<Translator<L>>,
    state: Arc<BindingState<T>>,
    /// Set while attached
    listener: Option<ListenerId>,
}

impl<L, T> TranslationBinding<L, T>
where
    L: Send + Sync + 'static,
    T: TextTarget + 'static,
{
    /// Create a detached binding. Nothing is rendered until [`Self::on_attach`].
    ///
    /// # Errors
    /// - `raw` carries malformed placeholder JSON
    pub fn new(
        translator: Arc<Translator<L>>,
        target: T,
        raw: impl Into<String>,
    ) -> Result<Self, BindingError> {
        let raw = raw.into();
        let value = BindingValue::parse(&raw, &translator.settings().binding_separator)?;
        let state = BindingState { target, current: Mutex::new(Current { raw, value }) };
        Ok(Self { translator, state: Arc::new(state), listener: None })
    }

    /// Render now and re-render on every locale change.
    pub fn on_attach(&mut self) {
        self.state.render(&self.translator);
        if self.listener.is_some() {
            return;
        }

        let translator: Weak<Translator<L>> = Arc::downgrade(&self.translator);
        let state = Arc::clone(&self.state);
        let id = self.translator.subscribe(move |_| {
            if let Some(translator) = translator.upgrade() {
                state.render(&translator);
            }
        });
        self.listener = Some(id);
    }

    /// Re-parse and re-render after the bound value changes.
    ///
    /// Returns `false` when `raw` equals the current value. On error the
    /// previous value is kept.
    ///
    /// # Errors
    /// - `raw` carries malformed placeholder JSON
    pub fn on_value_changed(&self, raw: &str) -> Result<bool, BindingError> {
        {
            let mut current = self.state.current.lock().unwrap_or_else(PoisonError::into_inner);
            if current.raw == raw {
                return Ok(false);
            }
            let value = BindingValue::parse(raw, &self.translator.settings().binding_separator)?;
            *current = Current { raw: raw.to_string(), value };
        }
        self.state.render(&self.translator);
        Ok(true)
    }

    /// The current parsed value.
    #[must_use]
    pub fn value(&self) -> BindingValue {
        self.state.value()
    }
}

impl<L, T> TranslationBinding<L, T> {
    /// Stop following locale changes.
    pub fn on_detach(&mut self) {
        if let Some(id) = self.listener.take() {
            self.translator.unsubscribe(id);
        }
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.state.target
    }
}

impl<L, T> Drop for TranslationBinding<L, T> {
    fn drop(&mut self) {
        self.on_detach();
    }
}
