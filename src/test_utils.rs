//! テスト用ユーティリティ
//!
//! 複数のテストモジュールで使用されるローダーとサンプルバンドルを提供します。
#![cfg(test)]

use std::collections::HashMap;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::sync::{
    Arc,
    Mutex,
};

use tokio::sync::Notify;

use crate::bundle::Bundle;
use crate::error::LoadError;
use crate::loader::{
    BundleLoader,
    MemoryLoader,
};
use crate::types::Source;

/// `en.json` / `fr.json` と、パースに失敗する `broken.json` を持つローダー
pub(crate) fn sample_loader() -> MemoryLoader {
    MemoryLoader::new()
        .with_payload(
            "en.json",
            r#"{
  "greeting": "hi {{n}}",
  "title": "Welcome",
  "menu": { "file": { "open": "Open" } }
}"#,
        )
        .with_payload(
            "fr.json",
            r#"{
  "greeting": "salut {{n}}",
  "title": "Bienvenue",
  "menu": { "file": { "open": "Ouvrir" } }
}"#,
        )
        .with_payload("broken.json", r#"{"title": 1}"#)
}

/// ソースごとの `load` 呼び出し回数を数えるローダー
#[derive(Debug)]
pub(crate) struct CountingLoader<L> {
    /// 実際の読み込みを行うローダー
    inner: L,
    /// ソース → 呼び出し回数
    calls: Mutex<HashMap<Source, usize>>,
    /// 全呼び出し回数
    total: AtomicUsize,
}

impl<L> CountingLoader<L> {
    pub(crate) fn new(inner: L) -> Self {
        Self { inner, calls: Mutex::new(HashMap::new()), total: AtomicUsize::new(0) }
    }

    #[allow(clippy::unwrap_used)]
    pub(crate) fn calls(&self, source: &str) -> usize {
        self.calls.lock().unwrap().get(source).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl<L: BundleLoader> BundleLoader for CountingLoader<L> {
    #[allow(clippy::unwrap_used)]
    async fn load(&self, source: &Source) -> Result<Bundle, LoadError> {
        *self.calls.lock().unwrap().entry(source.clone()).or_insert(0) += 1;
        self.total.fetch_add(1, Ordering::SeqCst);
        self.inner.load(source).await
    }
}

/// 指定したソースの読み込みを `Notify` が通知されるまで止めるローダー
///
/// 並行する切り替えの完了順序を制御するために使う。
#[derive(Debug)]
pub(crate) struct GatedLoader<L> {
    /// 実際の読み込みを行うローダー
    inner: L,
    /// ソース → ゲート
    gates: HashMap<Source, Arc<Notify>>,
}

impl<L> GatedLoader<L> {
    pub(crate) fn new(inner: L) -> Self {
        Self { inner, gates: HashMap::new() }
    }

    pub(crate) fn with_gate(mut self, source: &str, gate: Arc<Notify>) -> Self {
        self.gates.insert(Source::from(source), gate);
        self
    }

    pub(crate) const fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: BundleLoader> BundleLoader for GatedLoader<L> {
    async fn load(&self, source: &Source) -> Result<Bundle, LoadError> {
        if let Some(gate) = self.gates.get(source) {
            gate.notified().await;
        }
        self.inner.load(source).await
    }
}
