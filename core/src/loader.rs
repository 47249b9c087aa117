//! # Document Loading
//!
//! The collaborator the reference resolver calls to fetch an external
//! document. Loaders receive an absolute URL and return a parsed document.

use crate::config::GeneratorConfig;
use crate::document::{parse_document, SchemaDocument};
use crate::error::{SchemaError, SchemaResult};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;
use url::Url;

/// Fetches and parses schema documents.
pub trait DocumentLoader {
    /// Loads the document at `location` (no fragment).
    fn load(&self, location: &Url) -> SchemaResult<SchemaDocument>;
}

/// Loads `file:` URLs from the local filesystem.
///
/// Each read runs on a worker thread and is abandoned after `timeout`, so an
/// unreachable network mount cannot hang generation.
#[derive(Debug, Clone)]
pub struct FsLoader {
    timeout: Duration,
}

impl FsLoader {
    /// Creates a loader with the given read timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Creates a loader using `config.load_timeout_ms`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.load_timeout())
    }
}

impl Default for FsLoader {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl DocumentLoader for FsLoader {
    fn load(&self, location: &Url) -> SchemaResult<SchemaDocument> {
        if location.scheme() != "file" {
            return Err(SchemaError::General(format!(
                "Filesystem loader cannot fetch '{}'",
                location
            )));
        }
        let path = location.to_file_path().map_err(|_| {
            SchemaError::General(format!("'{}' is not a local file path", location))
        })?;

        tracing::debug!(path = %path.display(), "loading schema document");
        let text = read_with_timeout(path, self.timeout)?;
        parse_document(&text, location.as_str())
    }
}

fn read_with_timeout(path: PathBuf, timeout: Duration) -> SchemaResult<String> {
    let display = path.display().to_string();
    run_with_timeout(&display, timeout, move || std::fs::read_to_string(&path))
}

/// Runs a blocking `read` on a worker thread, waiting at most `timeout`.
fn run_with_timeout<T, F>(display: &str, timeout: Duration, read: F) -> SchemaResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> std::io::Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        // The receiver is gone when the read timed out.
        let _ = tx.send(read());
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => Ok(result?),
        Err(RecvTimeoutError::Timeout) => Err(SchemaError::General(format!(
            "Timed out after {:?} reading '{}'",
            timeout, display
        ))),
        Err(RecvTimeoutError::Disconnected) => Err(SchemaError::General(format!(
            "Reader for '{}' exited without a result",
            display
        ))),
    }
}

/// Serves documents from memory, keyed by absolute URL.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    documents: HashMap<String, String>,
}

impl InMemoryLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the text of the document at `url`.
    pub fn insert(&mut self, url: &str, text: &str) {
        self.documents.insert(url.to_string(), text.to_string());
    }

    /// Builder form of [`InMemoryLoader::insert`].
    pub fn with(mut self, url: &str, text: &str) -> Self {
        self.insert(url, text);
        self
    }
}

impl DocumentLoader for InMemoryLoader {
    fn load(&self, location: &Url) -> SchemaResult<SchemaDocument> {
        let text = self.documents.get(location.as_str()).ok_or_else(|| {
            SchemaError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no document registered at '{}'", location),
            ))
        })?;
        parse_document(text, location.as_str())
    }
}
