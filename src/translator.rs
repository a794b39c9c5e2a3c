//! The translation engine: active locale, bundle cache and change broadcast.

use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::sync::{
    Arc,
    Mutex,
    PoisonError,
    RwLock,
};

use futures::future::try_join_all;

use crate::bundle::Bundle;
use crate::cache::LocaleCache;
use crate::config::TranslatorSettings;
use crate::error::LoadError;
use crate::loader::BundleLoader;
use crate::notifier::{
    ChangeNotifier,
    ListenerId,
    TranslationChanged,
};
use crate::placeholder::{
    Placeholders,
    substitute,
};
use crate::resolve::resolve;
use crate::types::Source;

/// The source/bundle pair currently used for lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLocale {
    /// Where `bundle` was loaded from
    pub source: Source,
    pub bundle: Bundle,
}

/// Lifecycle of a [`Translator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No locale has been activated and nothing is loading.
    Unset,
    /// At least one bundle fetch is in flight.
    Loading,
    /// A locale is active and no fetch is in flight.
    Ready,
}

/// Counts an in-flight fetch for as long as it lives.
struct PendingFetch<'a>(
    /// Shared in-flight counter
    &'a AtomicUsize,
);

impl<'a> PendingFetch<'a> {
    /// Increment `counter` until the guard is dropped.
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Resolves translated strings for the active locale.
///
/// Switching locale consults the cache, loads the bundle on a miss, makes it
/// active and then notifies every listener before returning. Only the loader
/// suspends; every other step runs to completion.
///
/// Overlapping switches are neither ordered nor coalesced: whichever fetch
/// finishes last becomes active, and two switches to the same uncached source
/// fetch it twice. Activation and its broadcast happen as one step, so the
/// last event delivered always names the active source, even across threads.
pub struct Translator<L> {
    /// Fetches bundles on a cache miss
    loader: L,
    /// Separators and replacement scope used by lookups
    settings: TranslatorSettings,
    /// Every bundle loaded so far
    cache: LocaleCache,
    /// Replaced whole on every successful switch
    active: RwLock<Option<Arc<ActiveLocale>>>,
    /// Listeners told about every switch
    notifier: ChangeNotifier,
    /// Held while a switch activates its bundle and broadcasts
    publish: Mutex<()>,
    /// Number of fetches in flight
    pending: AtomicUsize,
}

impl<L> std::fmt::Debug for Translator<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("settings", &self.settings)
            .field("source", &self.get_source())
            .field("cache", &self.cache)
            .field("notifier", &self.notifier)
            .field("pending", &self.pending.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<L: BundleLoader> Translator<L> {
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self::with_settings(loader, TranslatorSettings::default())
    }

    #[must_use]
    pub fn with_settings(loader: L, settings: TranslatorSettings) -> Self {
        Self {
            loader,
            settings,
            cache: LocaleCache::new(),
            active: RwLock::new(None),
            notifier: ChangeNotifier::new(),
            publish: Mutex::new(()),
            pending: AtomicUsize::new(0),
        }
    }

    /// Activate `source` unless it is already the active one.
    ///
    /// Setting the current source again is a no-op: no fetch and no event.
    pub async fn set_source(&self, source: impl Into<Source>) -> Result<(), LoadError> {
        let source = source.into();
        if self.get_source().as_ref() == Some(&source) {
            tracing::debug!(src = %source, "Source already active");
            return Ok(());
        }
        self.switch_to(source).await
    }

    /// Activate `source` and broadcast the change.
    ///
    /// Always broadcasts, even if `source` is already active. On failure the
    /// previous locale stays active, nothing is cached and nothing is
    /// broadcast.
    pub async fn switch_to(&self, source: impl Into<Source>) -> Result<(), LoadError> {
        let source = source.into();

        let bundle = if let Some(bundle) = self.cache.lookup(source.as_str()) {
            tracing::debug!(src = %source, "Bundle cache hit");
            bundle
        } else {
            tracing::debug!(src = %source, "Bundle cache miss, loading");
            let bundle = self.fetch(&source).await?;
            self.cache.store(source.clone(), bundle.clone());
            bundle
        };

        let publish = self.publish.lock().unwrap_or_else(PoisonError::into_inner);
        self.activate(source.clone(), bundle.clone());
        tracing::info!(src = %source, "Switched locale");

        self.notifier.broadcast(&TranslationChanged { strings: bundle, src: source });
        drop(publish);
        Ok(())
    }

    /// Fetch every uncached source concurrently and cache the results.
    ///
    /// Does not change the active locale and does not broadcast. Returns the
    /// number of bundles fetched. On failure the first error is returned;
    /// bundles fetched before it stay cached.
    pub async fn preload<I>(&self, sources: I) -> Result<usize, LoadError>
    where
        I: IntoIterator,
        I::Item: Into<Source>,
    {
        let mut missing: Vec<Source> = Vec::new();
        for source in sources {
            let source = source.into();
            if !self.cache.contains(source.as_str()) && !missing.contains(&source) {
                missing.push(source);
            }
        }

        let loads = missing.iter().map(|source| async move {
            let bundle = self.fetch(source).await?;
            self.cache.store(source.clone(), bundle);
            Ok::<(), LoadError>(())
        });
        try_join_all(loads).await?;

        tracing::debug!(count = missing.len(), "Preloaded bundles");
        Ok(missing.len())
    }

    /// Load a bundle, tracking it as in flight.
    async fn fetch(&self, source: &Source) -> Result<Bundle, LoadError> {
        let _pending = PendingFetch::start(&self.pending);
        self.loader.load(source).await.inspect_err(|e| {
            tracing::warn!(src = %source, "Failed to load bundle: {e}");
        })
    }
}

impl<L> Translator<L> {
    /// Replace the active locale.
    fn activate(&self, source: Source, bundle: Bundle) {
        let next = Arc::new(ActiveLocale { source, bundle });
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(next);
    }

    /// The active locale, if any.
    #[must_use]
    pub fn active(&self) -> Option<Arc<ActiveLocale>> {
        self.active.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn get_source(&self) -> Option<Source> {
        self.active().map(|active| active.source.clone())
    }

    /// The active bundle, if any.
    #[must_use]
    pub fn strings(&self) -> Option<Bundle> {
        self.active().map(|active| active.bundle.clone())
    }

    /// Look up `key` in the active bundle and fill in `placeholders`.
    ///
    /// Returns `None` when no locale is active or the key does not resolve to
    /// a non-empty string.
    #[must_use]
    pub fn get(&self, key: &str, placeholders: Option<&Placeholders>) -> Option<String> {
        let active = self.active()?;
        let text = resolve(&active.bundle, key, &self.settings.key_separator)?;
        Some(substitute(text, placeholders, self.settings.replacement))
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        if self.pending.load(Ordering::SeqCst) > 0 {
            EngineState::Loading
        } else if self.active().is_some() {
            EngineState::Ready
        } else {
            EngineState::Unset
        }
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&TranslationChanged) + Send + Sync + 'static,
    ) -> ListenerId {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Forget every cached bundle. The active locale is kept.
    pub fn clear_cache(&self) -> usize {
        let removed = self.cache.clear();
        tracing::debug!(removed, "Cleared bundle cache");
        removed
    }

    #[must_use]
    pub const fn settings(&self) -> &TranslatorSettings {
        &self.settings
    }

    #[must_use]
    pub const fn cache(&self) -> &LocaleCache {
        &self.cache
    }

    #[must_use]
    pub const fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    #[must_use]
    pub const fn loader(&self) -> &L {
        &self.loader
    }
}
