//! Lint rules for Polymer element definitions, with source-mapped fixes.
//!
//! ```no_run
//! use polymer_lint::{apply_edits, Analyzer, FsUrlLoader, Linter, RuleRegistry};
//!
//! # fn main() -> Result<(), polymer_lint::LinterError> {
//! let registry = RuleRegistry::with_builtin_rules()?;
//! let analyzer = Analyzer::new(FsUrlLoader::new("src"));
//! let linter = Linter::new(registry.get_rules(Some(&["paper-button-style"]))?, analyzer);
//!
//! let results = linter.lint(&["my-element.html"])?;
//! for warning in results.iter() {
//!     println!("{}", warning);
//! }
//! let fixed = apply_edits(&results.fixes(), &results.loader())?;
//! # let _ = fixed;
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod analyzer;
mod checks;
mod config;
mod document;
mod dom;
mod edits;
mod linter;
mod loader;
mod printer;
mod registry;
mod rule;
mod warning;

pub use analyzer::Analyzer;
pub use checks::{ContentToSlotUsages, PaperButtonStyle};
pub use config::LinterConfig;
pub use document::{predicates, DomModule, NodeId, NodeRef, ParsedDocument};
pub use edits::{apply_edits, EditResult};
pub use linter::{LintResults, Linter, COULD_NOT_LOAD, INTERNAL_LINT_ERROR};
pub use loader::{FsUrlLoader, InMemoryUrlLoader, OverlayUrlLoader, UrlLoader};
pub use printer::WarningPrettyPrinter;
pub use registry::RuleRegistry;
pub use rule::HtmlRule;
pub use warning::{Edit, Position, Replacement, Severity, SourceRange, Warning};

#[derive(Error, Debug)]
pub enum LinterError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Rule error: {0}")]
    RuleError(String),
    #[error("Duplicate rule code: {0}")]
    DuplicateRule(String),
    #[error("Unknown rule code: {0}")]
    UnknownRule(String),
    #[error("Could not load {url}: {source}")]
    LoadError {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("A lint worker panicked")]
    WorkerPanicked,
}
