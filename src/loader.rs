//! Bundle loaders: the transport that turns a [`Source`] into a [`Bundle`].

use std::collections::HashMap;
use std::future::Future;
use std::path::{
    Path,
    PathBuf,
};

use crate::bundle::Bundle;
use crate::error::LoadError;
use crate::types::Source;

/// Fetches and parses the bundle a source names.
///
/// Implementations report transport failures as [`LoadError::Fetch`] and
/// malformed payloads as [`LoadError::Parse`]. Callers never retry.
pub trait BundleLoader: Send + Sync {
    fn load(&self, source: &Source) -> impl Future<Output = Result<Bundle, LoadError>> + Send;
}

/// Parse a raw payload, tagging failures with the source.
fn parse_payload(source: &Source, payload: &[u8]) -> Result<Bundle, LoadError> {
    Bundle::from_json_slice(payload)
        .map_err(|e| LoadError::Parse { src: source.clone(), source: e })
}

/// Loads bundles from the file system.
///
/// Relative sources are resolved against `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    /// Base directory for relative sources
    root: Option<PathBuf>,
}

impl FileLoader {
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Path a source is read from.
    #[must_use]
    pub fn resolve_path(&self, source: &Source) -> PathBuf {
        let path = Path::new(source.as_str());
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl BundleLoader for FileLoader {
    async fn load(&self, source: &Source) -> Result<Bundle, LoadError> {
        let path = self.resolve_path(source);
        tracing::debug!(path = %path.display(), "Reading bundle file");

        let payload = tokio::fs::read(&path)
            .await
            .map_err(|e| LoadError::Fetch { src: source.clone(), source: e })?;

        parse_payload(source, &payload)
    }
}

/// Serves bundles from raw JSON payloads held in memory.
///
/// Useful for bundles embedded with `include_str!`. Payloads are parsed on
/// every load, the same way a fetched file would be.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    /// Source → raw JSON payload
    payloads: HashMap<Source, String>,
}

impl MemoryLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_payload(mut self, source: impl Into<Source>, payload: impl Into<String>) -> Self {
        self.insert(source, payload);
        self
    }

    pub fn insert(&mut self, source: impl Into<Source>, payload: impl Into<String>) {
        self.payloads.insert(source.into(), payload.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl BundleLoader for MemoryLoader {
    async fn load(&self, source: &Source) -> Result<Bundle, LoadError> {
        let Some(payload) = self.payloads.get(source) else {
            return Err(LoadError::Fetch {
                src: source.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no payload registered for '{source}'"),
                ),
            });
        };

        parse_payload(source, payload.as_bytes())
    }
}
