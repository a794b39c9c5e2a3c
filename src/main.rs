//! Command-line front end: print translated strings from a locale bundle.

use std::io::Write;
use std::process::ExitCode;

use locale_strings::config::ConfigManager;
use locale_strings::{
    BindingValue,
    FileLoader,
    Translator,
};
use tracing_subscriber::EnvFilter;

/// Shown on `--help` and on bad arguments
const USAGE: &str = "Usage: locale-strings [--src SOURCE] [--list] KEY...";

/// Parsed command-line arguments
#[derive(Debug, Default)]
struct Args {
    /// Bundle to activate, overriding `initialSource`
    source: Option<String>,
    /// Print every key instead of the requested ones
    list: bool,
    /// Binding values to look up
    keys: Vec<String>,
}

/// Parse arguments, excluding the program name.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--src" => {
                let source = args.next().ok_or("--src requires a value")?;
                parsed.source = Some(source);
            }
            "--list" => parsed.list = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => parsed.keys.push(arg),
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            let _ = writeln!(std::io::stderr(), "{message}");
            return ExitCode::from(2);
        }
    };

    let mut config_manager = ConfigManager::new();
    if let Err(e) = config_manager.load_settings(std::env::current_dir().ok()) {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }
    let settings = config_manager.get_settings().clone();

    let Some(source) = args.source.or_else(|| settings.initial_source.clone()) else {
        tracing::error!("No source given. Pass --src or set initialSource");
        let _ = writeln!(std::io::stderr(), "{USAGE}");
        return ExitCode::from(2);
    };

    let loader = config_manager.bundle_root().map_or_else(FileLoader::new, FileLoader::with_root);
    let translator = Translator::with_settings(loader, settings);
    if let Err(e) = translator.switch_to(source).await {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }

    let mut stdout = std::io::stdout().lock();
    let written = if args.list {
        print_all(&translator, &mut stdout)
    } else {
        print_keys(&translator, &args.keys, &mut stdout)
    };
    match written {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Failed to write output: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Print every leaf of the active bundle, sorted by key.
fn print_all<L>(translator: &Translator<L>, out: &mut impl Write) -> std::io::Result<ExitCode> {
    let Some(bundle) = translator.strings() else {
        return Ok(ExitCode::FAILURE);
    };
    let mut entries: Vec<(String, String)> =
        bundle.flatten(&translator.settings().key_separator).into_iter().collect();
    entries.sort();
    for (key, text) in entries {
        writeln!(out, "{key} = {text}")?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Print `key = text` for each binding value. Unresolved keys print their
/// fallback and make the exit code a failure.
fn print_keys<L>(
    translator: &Translator<L>,
    keys: &[String],
    out: &mut impl Write,
) -> std::io::Result<ExitCode> {
    let mut code = ExitCode::SUCCESS;
    for raw in keys {
        let value = match BindingValue::parse(raw, &translator.settings().binding_separator) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("{e}");
                code = ExitCode::FAILURE;
                continue;
            }
        };
        match translator.get(value.key(), value.placeholders()) {
            Some(text) => writeln!(out, "{} = {text}", value.key())?,
            None => {
                tracing::warn!(key = value.key(), "Key not found");
                writeln!(out, "{} = {}", value.key(), value.fallback())?;
                code = ExitCode::FAILURE;
            }
        }
    }
    Ok(code)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use locale_strings::MemoryLoader;
    use pretty_assertions::assert_eq;
    use rstest::*;

    use super::*;

    fn args(values: &[&str]) -> Result<Args, String> {
        parse_args(values.iter().map(|value| (*value).to_string()))
    }

    #[fixture]
    fn translator() -> Translator<MemoryLoader> {
        let loader = MemoryLoader::new().with_payload(
            "en.json",
            r#"{"title": "Welcome", "greeting": "hi {{n}}", "menu": {"open": "Open"}}"#,
        );
        let translator = Translator::new(loader);
        tokio_test::block_on(translator.switch_to("en.json")).unwrap();
        translator
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[rstest]
    fn parse_args_reads_source_flag_and_keys() {
        let parsed = args(&["--src", "fr.json", "title", r#"greeting:{"n":"Sam"}"#]).unwrap();

        assert_eq!(parsed.source.as_deref(), Some("fr.json"));
        assert_eq!(parsed.keys, vec!["title".to_string(), r#"greeting:{"n":"Sam"}"#.to_string()]);
        assert!(!parsed.list);
    }

    #[rstest]
    fn parse_args_list_without_source() {
        let parsed = args(&["--list"]).unwrap();

        assert!(parsed.list);
        assert!(parsed.source.is_none());
        assert!(parsed.keys.is_empty());
    }

    #[rstest]
    #[case::missing_source_value(&["title", "--src"], "--src requires a value")]
    #[case::help(&["--help"], USAGE)]
    #[case::short_help(&["-h", "title"], USAGE)]
    fn parse_args_errors(#[case] values: &[&str], #[case] expected: &str) {
        assert_eq!(args(values).unwrap_err(), expected);
    }

    #[rstest]
    fn print_keys_writes_resolved_text(translator: Translator<MemoryLoader>) {
        let mut out: Vec<u8> = Vec::new();
        let keys = vec!["title".to_string(), r#"greeting:{"n":"Sam"}"#.to_string()];

        let code = print_keys(&translator, &keys, &mut out).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(output(out), "title = Welcome\ngreeting = hi Sam\n");
    }

    #[rstest]
    fn print_keys_missing_key_prints_fallback_and_fails(translator: Translator<MemoryLoader>) {
        let mut out: Vec<u8> = Vec::new();
        let keys = vec!["menu.close".to_string(), "menu.open".to_string()];

        let code = print_keys(&translator, &keys, &mut out).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(output(out), "menu.close = {{menu.close}}\nmenu.open = Open\n");
    }

    #[rstest]
    fn print_keys_malformed_value_is_skipped_and_fails(translator: Translator<MemoryLoader>) {
        let mut out: Vec<u8> = Vec::new();
        let keys = vec!["greeting:{oops".to_string(), "title".to_string()];

        let code = print_keys(&translator, &keys, &mut out).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(output(out), "title = Welcome\n");
    }

    #[rstest]
    fn print_all_lists_sorted_flattened_keys(translator: Translator<MemoryLoader>) {
        let mut out: Vec<u8> = Vec::new();

        let code = print_all(&translator, &mut out).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(output(out), "greeting = hi {{n}}\nmenu.open = Open\ntitle = Welcome\n");
    }

    #[rstest]
    fn print_all_without_active_locale_fails() {
        let translator = Translator::new(MemoryLoader::new());
        let mut out: Vec<u8> = Vec::new();

        let code = print_all(&translator, &mut out).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.is_empty());
    }
}
