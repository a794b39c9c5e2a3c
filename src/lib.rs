//! locale-strings
//!
//! ロケールごとの翻訳バンドルを読み込み、ドット区切りのキーを解決して
//! `{{ name }}` プレースホルダーを埋めるランタイム翻訳エンジン

pub mod binding;
pub mod bundle;
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod notifier;
pub mod placeholder;
pub mod resolve;
pub mod translator;
pub mod types;

mod test_utils;

// 主要な型を再エクスポート
pub use binding::{
    BindingValue,
    TextTarget,
    TranslationBinding,
};
pub use bundle::{
    Bundle,
    BundleNode,
};
pub use error::{
    BindingError,
    LoadError,
};
pub use loader::{
    BundleLoader,
    FileLoader,
    MemoryLoader,
};
pub use notifier::{
    ListenerId,
    TranslationChanged,
};
pub use placeholder::{
    Placeholders,
    ReplacementScope,
};
pub use translator::{
    EngineState,
    Translator,
};
pub use types::Source;
