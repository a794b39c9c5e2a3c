//! ファイルから読み込んだバンドルでのロケール切り替えに関するテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use std::fs;
use std::sync::{
    Arc,
    Mutex,
};

use locale_strings::config::{
    CONFIG_FILE_NAME,
    ConfigManager,
};
use locale_strings::{
    EngineState,
    FileLoader,
    LoadError,
    Placeholders,
    TextTarget,
    TranslationBinding,
    Translator,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[derive(Debug, Default)]
struct Label {
    text: Mutex<String>,
}

impl Label {
    fn text(&self) -> String {
        self.text.lock().unwrap().clone()
    }
}

impl TextTarget for Label {
    fn set_text(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }
}

fn create_workspace(config: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("locales")).unwrap();
    fs::write(
        temp_dir.path().join("locales/en.json"),
        r#"{"nav": {"home": "Home"}, "welcome": "Welcome, {{ user }}!"}"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("locales/ja.json"),
        r#"{"nav": {"home": "ホーム"}, "welcome": "ようこそ、{{ user }}さん"}"#,
    )
    .unwrap();
    fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config).unwrap();
    temp_dir
}

fn create_translator(workspace: &TempDir) -> Translator<FileLoader> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(workspace.path().to_path_buf())).unwrap();
    let loader = FileLoader::with_root(config_manager.bundle_root().unwrap());
    Translator::with_settings(loader, config_manager.get_settings().clone())
}

#[tokio::test]
async fn test_switch_between_file_bundles() {
    let workspace = create_workspace(r#"{"bundleRoot": "locales"}"#);
    let translator = create_translator(&workspace);
    let user = Placeholders::new().with("user", "Aiko");

    translator.switch_to("en.json").await.unwrap();
    assert_eq!(translator.get("nav.home", None).as_deref(), Some("Home"));
    assert_eq!(translator.get("welcome", Some(&user)).as_deref(), Some("Welcome, Aiko!"));

    translator.switch_to("ja.json").await.unwrap();
    assert_eq!(translator.get("nav.home", None).as_deref(), Some("ホーム"));
    assert_eq!(translator.get("welcome", Some(&user)).as_deref(), Some("ようこそ、Aikoさん"));
    assert_eq!(translator.cache().len(), 2);
    assert_eq!(translator.state(), EngineState::Ready);
}

#[tokio::test]
async fn test_missing_bundle_file_keeps_active_locale() {
    let workspace = create_workspace(r#"{"bundleRoot": "locales"}"#);
    let translator = create_translator(&workspace);
    translator.switch_to("en.json").await.unwrap();

    let result = translator.switch_to("de.json").await;

    match result {
        Err(LoadError::Fetch { src, .. }) => assert_eq!(src.as_str(), "de.json"),
        other => panic!("expected fetch error, got {other:?}"),
    }
    assert_eq!(translator.get_source().unwrap().as_str(), "en.json");
}

#[tokio::test]
async fn test_cached_bundle_survives_file_removal() {
    let workspace = create_workspace(r#"{"bundleRoot": "locales"}"#);
    let translator = create_translator(&workspace);
    translator.switch_to("en.json").await.unwrap();
    translator.switch_to("ja.json").await.unwrap();

    fs::remove_file(workspace.path().join("locales/en.json")).unwrap();
    translator.switch_to("en.json").await.unwrap();

    assert_eq!(translator.get("nav.home", None).as_deref(), Some("Home"));
}

#[tokio::test]
async fn test_binding_follows_switches_with_configured_separators() {
    let workspace = create_workspace(
        r#"{"bundleRoot": "locales", "keySeparator": "/", "bindingSeparator": "|"}"#,
    );
    let translator = Arc::new(create_translator(&workspace));
    let label = Arc::new(Label::default());
    let mut binding = TranslationBinding::new(
        Arc::clone(&translator),
        Arc::clone(&label),
        r#"welcome|{"user": "Ren"}"#,
    )
    .unwrap();
    let mut nav =
        TranslationBinding::new(Arc::clone(&translator), Arc::new(Label::default()), "nav/home")
            .unwrap();

    binding.on_attach();
    nav.on_attach();
    assert_eq!(label.text(), "{{welcome}}");
    assert_eq!(nav.target().text(), "{{nav/home}}");

    translator.switch_to("en.json").await.unwrap();
    assert_eq!(label.text(), "Welcome, Ren!");
    assert_eq!(nav.target().text(), "Home");

    translator.switch_to("ja.json").await.unwrap();
    assert_eq!(label.text(), "ようこそ、Renさん");
    assert_eq!(nav.target().text(), "ホーム");

    drop(binding);
    drop(nav);
    assert_eq!(translator.notifier().listener_count(), 0);
}
