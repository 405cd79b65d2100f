use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::checks::{ContentToSlotUsages, PaperButtonStyle};
use crate::rule::HtmlRule;
use crate::LinterError;

/// Rules available to a linter, keyed by code.
///
/// Build one at startup and hand the selected rules to [`crate::Linter`].
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn HtmlRule>>,
    by_code: HashMap<&'static str, usize>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_rules() -> Result<Self, LinterError> {
        let mut registry = Self::new();
        registry.register(PaperButtonStyle)?;
        registry.register(ContentToSlotUsages)?;
        Ok(registry)
    }

    pub fn register<R: HtmlRule + 'static>(&mut self, rule: R) -> Result<(), LinterError> {
        self.register_arc(Arc::new(rule))
    }

    pub fn register_arc(&mut self, rule: Arc<dyn HtmlRule>) -> Result<(), LinterError> {
        let code = rule.code();
        if self.by_code.contains_key(code) {
            return Err(LinterError::DuplicateRule(code.to_string()));
        }
        debug!(rule = code, "registered lint rule");
        self.by_code.insert(code, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Rules for the requested codes, in request order; all rules for `None`.
    pub fn get_rules(&self, codes: Option<&[&str]>) -> Result<Vec<Arc<dyn HtmlRule>>, LinterError> {
        let Some(codes) = codes else {
            return Ok(self.rules.clone());
        };

        let mut selected: Vec<Arc<dyn HtmlRule>> = Vec::with_capacity(codes.len());
        for &code in codes {
            let idx = self
                .by_code
                .get(code)
                .ok_or_else(|| LinterError::UnknownRule(code.to_string()))?;
            if !selected.iter().any(|rule| rule.code() == code) {
                selected.push(Arc::clone(&self.rules[*idx]));
            }
        }
        Ok(selected)
    }

    /// `(code, description)` of every rule, in registration order.
    pub fn rules(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.rules.iter().map(|rule| (rule.code(), rule.description()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
