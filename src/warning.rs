use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
            Severity::Info => f.write_str("info"),
        }
    }
}

/// Zero-based line and column; columns count characters, not bytes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SourceRange {
    pub file: String,
    pub start: Position,
    pub end: Position,
    /// Byte offsets into the file's text.
    pub offsets: Range<usize>,
}

impl SourceRange {
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Whether two ranges of the same file touch the same text. Insertions at
    /// one offset collide with each other.
    pub fn overlaps(&self, other: &SourceRange) -> bool {
        if self.file != other.file {
            return false;
        }
        if self.is_empty() && other.is_empty() {
            return self.offsets.start == other.offsets.start;
        }
        self.offsets.start < other.offsets.end && other.offsets.start < self.offsets.end
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub range: SourceRange,
    pub replacement_text: String,
}

/// A fix: replacements applied together against one document.
pub type Edit = Vec<Replacement>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Warning {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    pub source_range: SourceRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Edit>,
}

impl Warning {
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        source_range: SourceRange,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
            source_range,
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: Edit) -> Self {
        self.fix = Some(fix);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} {} [{}] {}",
            self.source_range.file,
            self.source_range.start.line + 1,
            self.source_range.start.column + 1,
            self.severity,
            self.code,
            self.message
        )
    }
}
