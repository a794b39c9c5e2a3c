//! Locale bundle cache.

use std::collections::HashMap;
use std::sync::{
    Mutex,
    MutexGuard,
    PoisonError,
};

use crate::bundle::Bundle;
use crate::types::Source;

/// Bundles loaded so far, keyed by source.
///
/// Append-only apart from [`LocaleCache::clear`]: once a source is stored the
/// engine never fetches it again. There is no eviction.
#[derive(Debug, Default)]
pub struct LocaleCache {
    /// Source → bundle
    bundles: Mutex<HashMap<Source, Bundle>>,
}

impl LocaleCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the map. A poisoned lock is recovered since entries are only ever
    /// inserted or removed whole.
    fn bundles(&self) -> MutexGuard<'_, HashMap<Source, Bundle>> {
        self.bundles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn lookup(&self, source: &str) -> Option<Bundle> {
        self.bundles().get(source).cloned()
    }

    /// Store a bundle, returning the one it replaced (last write wins).
    pub fn store(&self, source: Source, bundle: Bundle) -> Option<Bundle> {
        self.bundles().insert(source, bundle)
    }

    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.bundles().contains_key(source)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles().is_empty()
    }

    /// Cached sources, sorted.
    #[must_use]
    pub fn sources(&self) -> Vec<Source> {
        let mut sources: Vec<Source> = self.bundles().keys().cloned().collect();
        sources.sort();
        sources
    }

    /// Drop every entry, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut bundles = self.bundles();
        let removed = bundles.len();
        bundles.clear();
        removed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    fn bundle(json: &str) -> Bundle {
        Bundle::from_json_str(json).unwrap()
    }

    #[googletest::test]
    fn lookup_returns_stored_bundle() {
        let cache = LocaleCache::new();
        let en = bundle(r#"{"hello": "Hello"}"#);

        expect_that!(cache.store(Source::from("en.json"), en.clone()).is_none(), eq(true));

        let cached = cache.lookup("en.json");
        expect_that!(cached.is_some_and(|b| b.ptr_eq(&en)), eq(true));
        expect_that!(cache.lookup("fr.json").is_none(), eq(true));
        expect_that!(cache.contains("en.json"), eq(true));
        expect_that!(cache.len(), eq(1));
    }

    #[googletest::test]
    fn store_twice_last_write_wins() {
        let cache = LocaleCache::new();
        let first = bundle(r#"{"v": "1"}"#);
        let second = bundle(r#"{"v": "2"}"#);

        cache.store(Source::from("en.json"), first.clone());
        let replaced = cache.store(Source::from("en.json"), second.clone());

        expect_that!(replaced.is_some_and(|b| b.ptr_eq(&first)), eq(true));
        expect_that!(cache.lookup("en.json").is_some_and(|b| b.ptr_eq(&second)), eq(true));
        expect_that!(cache.len(), eq(1));
    }

    #[googletest::test]
    fn keys_compare_exactly() {
        let cache = LocaleCache::new();
        cache.store(Source::from("en.json"), Bundle::default());

        expect_that!(cache.contains("./en.json"), eq(false));
        expect_that!(cache.contains("EN.json"), eq(false));
    }

    #[googletest::test]
    fn clear_empties_cache() {
        let cache = LocaleCache::new();
        cache.store(Source::from("fr.json"), Bundle::default());
        cache.store(Source::from("en.json"), Bundle::default());

        expect_that!(
            cache.sources(),
            elements_are![eq(&Source::from("en.json")), eq(&Source::from("fr.json"))]
        );
        expect_that!(cache.clear(), eq(2));
        expect_that!(cache.is_empty(), eq(true));
    }
}
