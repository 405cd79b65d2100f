//! Sources of file contents for the analyzer and for edit application.

use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::LinterError;

/// Resolves package-relative URLs to file contents.
pub trait UrlLoader: Send + Sync {
    fn load(&self, url: &str) -> Result<String, LinterError>;

    /// Every HTML file this loader can serve.
    fn list(&self) -> Result<Vec<String>, LinterError>;
}

/// Loads files below a root directory. URLs use `/` separators and may not
/// leave the root.
#[derive(Debug, Clone)]
pub struct FsUrlLoader {
    root: PathBuf,
}

impl FsUrlLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, url: &str) -> Result<PathBuf, LinterError> {
        let relative = Path::new(url);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(LinterError::LoadError {
                url: url.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "url must stay inside the package root",
                ),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl UrlLoader for FsUrlLoader {
    fn load(&self, url: &str) -> Result<String, LinterError> {
        let path = self.resolve(url)?;
        std::fs::read_to_string(&path).map_err(|source| LinterError::LoadError {
            url: url.to_string(),
            source,
        })
    }

    fn list(&self) -> Result<Vec<String>, LinterError> {
        let mut urls = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| LinterError::IoError(e.into()))?;
            if !entry.file_type().is_file()
                || entry.path().extension().and_then(|e| e.to_str()) != Some("html")
            {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                let url: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect();
                urls.push(url.join("/"));
            }
        }
        Ok(urls)
    }
}

/// Serves contents from memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUrlLoader {
    files: BTreeMap<String, String>,
}

impl InMemoryUrlLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, url: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(url, contents);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(url.into(), contents.into());
    }
}

impl UrlLoader for InMemoryUrlLoader {
    fn load(&self, url: &str) -> Result<String, LinterError> {
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| LinterError::LoadError {
                url: url.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
    }

    fn list(&self) -> Result<Vec<String>, LinterError> {
        Ok(self
            .files
            .keys()
            .filter(|url| url.ends_with(".html"))
            .cloned()
            .collect())
    }
}

/// Serves the contents a lint run actually analyzed, falling back to another
/// loader for everything else.
#[derive(Clone)]
pub struct OverlayUrlLoader {
    overlay: HashMap<String, String>,
    fallback: Arc<dyn UrlLoader>,
}

impl OverlayUrlLoader {
    pub fn new(overlay: HashMap<String, String>, fallback: Arc<dyn UrlLoader>) -> Self {
        Self { overlay, fallback }
    }
}

impl UrlLoader for OverlayUrlLoader {
    fn load(&self, url: &str) -> Result<String, LinterError> {
        match self.overlay.get(url) {
            Some(contents) => Ok(contents.clone()),
            None => self.fallback.load(url),
        }
    }

    fn list(&self) -> Result<Vec<String>, LinterError> {
        let mut urls = self.fallback.list()?;
        urls.extend(self.overlay.keys().cloned());
        urls.sort();
        urls.dedup();
        Ok(urls)
    }
}
