use std::sync::Arc;

use tracing::debug;

use crate::document::ParsedDocument;
use crate::loader::UrlLoader;
use crate::LinterError;

/// Loads and parses documents.
#[derive(Clone)]
pub struct Analyzer {
    loader: Arc<dyn UrlLoader>,
}

impl Analyzer {
    pub fn new(loader: impl UrlLoader + 'static) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }

    pub fn from_shared(loader: Arc<dyn UrlLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> Arc<dyn UrlLoader> {
        Arc::clone(&self.loader)
    }

    pub fn load(&self, url: &str) -> Result<String, LinterError> {
        self.loader.load(url)
    }

    pub fn analyze(&self, url: &str) -> Result<ParsedDocument, LinterError> {
        let contents = self.load(url)?;
        debug!(url, bytes = contents.len(), "parsing document");
        ParsedDocument::parse(url, contents)
    }
}
