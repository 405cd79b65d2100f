use crate::document::{predicates, ParsedDocument};
use crate::dom::utils::{indent_block, line_indentation};
use crate::rule::HtmlRule;
use crate::warning::{Severity, Warning};
use crate::LinterError;

const CODE: &str = "paper-button-style";

const CSS_RULE: &str = "<!-- Remove this to enable the vertical alignment of button content -->
<style>
  paper-button {
    display: inline-block;
  }
</style>";

/// `paper-button` now renders with `display: inline-flex`. Element templates
/// that use it get a snippet restoring the old `inline-block` display.
pub struct PaperButtonStyle;

impl HtmlRule for PaperButtonStyle {
    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns when a dom-module template uses paper-button, whose default display changed from inline-block to inline-flex."
    }

    fn check_document(&self, document: &ParsedDocument) -> Result<Vec<Warning>, LinterError> {
        let mut warnings = Vec::new();

        for dom_module in document.dom_modules() {
            let Some(template) = dom_module.node.query(predicates::has_tag_name("template")) else {
                continue;
            };
            let Some(content) = template.template_content() else {
                continue;
            };
            // Only the first button matters: one snippet covers the whole template.
            let Some(button) = content.query(predicates::has_tag_name("paper-button")) else {
                continue;
            };

            let indent = match content.children().next() {
                Some(first) if first.is_text() => line_indentation(first.text().unwrap_or_default()),
                _ => String::new(),
            };

            let source_range = document.source_range_for_node(button.id()).ok_or_else(|| {
                LinterError::RuleError(format!(
                    "no source location for <paper-button> in {}",
                    document.url()
                ))
            })?;
            let insertion = document
                .prepend_content_into(template.id(), indent_block(CSS_RULE, &indent))
                .ok_or_else(|| {
                    LinterError::RuleError(format!(
                        "no source location for <template> in {}",
                        document.url()
                    ))
                })?;

            warnings.push(
                Warning::new(
                    CODE,
                    Severity::Warning,
                    "paper-button style changed to display: inline-flex. Force its display to inline-block to have previous rendering.",
                    source_range,
                )
                .with_fix(vec![insertion]),
            );
        }

        Ok(warnings)
    }
}
