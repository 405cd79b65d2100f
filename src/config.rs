use serde::{Deserialize, Serialize};

use crate::LinterError;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LinterConfig {
    /// Rule codes to run; empty runs every registered rule.
    pub rules: Vec<String>,
    /// Warning codes dropped from the results.
    pub ignore_warnings: Vec<String>,
    /// Glob patterns of files that are never linted.
    pub files_to_ignore: Vec<String>,
    /// Upper bound on parallel lint workers.
    pub workers: Option<usize>,
}

impl LinterConfig {
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        serde_json::from_str(json)
            .map_err(|e| LinterError::ConfigError(format!("Failed to parse config JSON: {}", e)))
    }

    pub fn from_json_file(path: &str) -> Result<Self, LinterError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub(crate) fn ignore_patterns(&self) -> Result<Vec<glob::Pattern>, LinterError> {
        self.files_to_ignore
            .iter()
            .map(|p| {
                glob::Pattern::new(p)
                    .map_err(|e| LinterError::ConfigError(format!("Invalid pattern '{}': {}", p, e)))
            })
            .collect()
    }

    pub(crate) fn rule_codes(&self) -> Option<Vec<&str>> {
        if self.rules.is_empty() {
            None
        } else {
            Some(self.rules.iter().map(String::as_str).collect())
        }
    }
}
