use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam::queue::SegQueue;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::analyzer::Analyzer;
use crate::config::LinterConfig;
use crate::loader::{OverlayUrlLoader, UrlLoader};
use crate::registry::RuleRegistry;
use crate::rule::HtmlRule;
use crate::warning::{Edit, Position, Severity, SourceRange, Warning};
use crate::LinterError;

/// Code of the warning reported for a file that could not be loaded or parsed.
pub const COULD_NOT_LOAD: &str = "could-not-load";
/// Code of the warning reported when a rule fails on a file.
pub const INTERNAL_LINT_ERROR: &str = "internal-lint-error";

/// Runs a set of rules over documents.
pub struct Linter {
    rules: Vec<Arc<dyn HtmlRule>>,
    analyzer: Analyzer,
    ignore_warnings: HashSet<String>,
    files_to_ignore: Vec<glob::Pattern>,
    workers: usize,
}

struct FileOutcome {
    warnings: Vec<Warning>,
    contents: Option<String>,
}

impl Linter {
    pub fn new(rules: Vec<Arc<dyn HtmlRule>>, analyzer: Analyzer) -> Self {
        let workers = std::thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            rules,
            analyzer,
            ignore_warnings: HashSet::new(),
            files_to_ignore: Vec::new(),
            workers,
        }
    }

    pub fn from_config(
        registry: &RuleRegistry,
        analyzer: Analyzer,
        config: &LinterConfig,
    ) -> Result<Self, LinterError> {
        let codes = config.rule_codes();
        let rules = registry.get_rules(codes.as_deref())?;
        let mut linter = Self::new(rules, analyzer);
        linter.ignore_warnings = config.ignore_warnings.iter().cloned().collect();
        linter.files_to_ignore = config.ignore_patterns()?;
        if let Some(workers) = config.workers {
            linter.workers = workers.max(1);
        }
        Ok(linter)
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn HtmlRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Lints the given files. Warnings come back grouped by file in the order
    /// given, and by position within each file.
    pub fn lint<S: AsRef<str>>(&self, files: &[S]) -> Result<LintResults, LinterError> {
        let files: Vec<&str> = files
            .iter()
            .map(AsRef::as_ref)
            .filter(|url| !self.is_ignored(url))
            .collect();
        debug!(files = files.len(), rules = self.rules.len(), "starting lint run");

        let queue = SegQueue::new();
        for job in files.iter().copied().enumerate() {
            queue.push(job);
        }
        let outcomes: Mutex<Vec<(usize, FileOutcome)>> = Mutex::new(Vec::with_capacity(files.len()));
        let workers = self.workers.min(files.len());

        crossbeam::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|_| {
                    while let Some((position, url)) = queue.pop() {
                        let outcome = self.lint_file(url);
                        outcomes.lock().push((position, outcome));
                    }
                });
            }
        })
        .map_err(|_| LinterError::WorkerPanicked)?;

        let mut outcomes = outcomes.into_inner();
        outcomes.sort_by_key(|(position, _)| *position);

        let mut warnings = Vec::new();
        let mut contents = HashMap::new();
        for ((_, outcome), url) in outcomes.into_iter().zip(files) {
            warnings.extend(outcome.warnings);
            if let Some(text) = outcome.contents {
                contents.insert(url.to_string(), text);
            }
        }

        Ok(LintResults {
            warnings,
            contents,
            loader: self.analyzer.loader(),
        })
    }

    /// Lints every HTML file the analyzer's loader can list.
    pub fn lint_package(&self) -> Result<LintResults, LinterError> {
        let files = self.analyzer.loader().list()?;
        self.lint(&files)
    }

    fn is_ignored(&self, url: &str) -> bool {
        self.files_to_ignore.iter().any(|pattern| pattern.matches(url))
    }

    fn lint_file(&self, url: &str) -> FileOutcome {
        let document = match self.analyzer.analyze(url) {
            Ok(document) => document,
            Err(error) => {
                warn!(url, %error, "could not load document");
                let warning = Warning::new(
                    COULD_NOT_LOAD,
                    Severity::Error,
                    error.to_string(),
                    SourceRange {
                        file: url.to_string(),
                        start: Position::default(),
                        end: Position::default(),
                        offsets: 0..0,
                    },
                );
                return FileOutcome {
                    warnings: self.filter(vec![warning]),
                    contents: None,
                };
            }
        };

        let mut warnings = Vec::new();
        for rule in &self.rules {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.check_document(&document)))
                .unwrap_or_else(|payload| {
                    Err(LinterError::RuleError(format!(
                        "panicked: {}",
                        panic_message(payload.as_ref())
                    )))
                });
            match outcome {
                Ok(found) => {
                    debug!(url, rule = rule.code(), warnings = found.len(), "rule finished");
                    warnings.extend(found);
                }
                Err(error) => {
                    warn!(url, rule = rule.code(), %error, "lint rule failed");
                    warnings.push(Warning::new(
                        INTERNAL_LINT_ERROR,
                        Severity::Error,
                        format!("Rule {} failed on {}: {}", rule.code(), url, error),
                        document.source_range(0..0),
                    ));
                }
            }
        }
        warnings.sort_by_key(|warning| warning.source_range.offsets.start);

        FileOutcome {
            warnings: self.filter(warnings),
            contents: Some(document.contents().to_string()),
        }
    }

    fn filter(&self, mut warnings: Vec<Warning>) -> Vec<Warning> {
        warnings.retain(|warning| !self.ignore_warnings.contains(&warning.code));
        warnings
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Warnings of one lint run, plus the file contents they refer to.
pub struct LintResults {
    warnings: Vec<Warning>,
    contents: HashMap<String, String>,
    loader: Arc<dyn UrlLoader>,
}

impl LintResults {
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    /// The text of an analyzed file, exactly as the rules saw it.
    pub fn contents(&self, url: &str) -> Option<&str> {
        self.contents.get(url).map(String::as_str)
    }

    /// A loader that serves the analyzed contents first.
    pub fn loader(&self) -> OverlayUrlLoader {
        OverlayUrlLoader::new(self.contents.clone(), Arc::clone(&self.loader))
    }

    /// Fixes of every warning that carries one, in warning order.
    pub fn fixes(&self) -> Vec<Edit> {
        self.warnings
            .iter()
            .filter_map(|warning| warning.fix.clone())
            .collect()
    }
}

impl Deref for LintResults {
    type Target = [Warning];

    fn deref(&self) -> &Self::Target {
        &self.warnings
    }
}
