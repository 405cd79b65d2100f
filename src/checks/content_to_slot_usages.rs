use crate::document::{predicates, NodeRef, ParsedDocument};
use crate::dom::select::{ContentSelector, SelectorProblem};
use crate::rule::HtmlRule;
use crate::warning::{Severity, Warning};
use crate::LinterError;

const CODE: &str = "content-to-slot-usages";
const SELECTOR_ATTRIBUTE: &str = "old-content-selector";

struct NamedSlot {
    name: String,
    selector: ContentSelector,
}

/// Moves light-DOM children of element usages onto named slots via `slot=""`,
/// using the `old-content-selector` each slot kept from its `<content select>`.
pub struct ContentToSlotUsages;

impl ContentToSlotUsages {
    /// Validates every `old-content-selector` of one definition and returns the
    /// named slots whose selectors can be used for migration.
    fn collect_slots(
        &self,
        document: &ParsedDocument,
        content: NodeRef<'_>,
        warnings: &mut Vec<Warning>,
    ) -> Result<Vec<NamedSlot>, LinterError> {
        let mut slots = Vec::new();
        let candidates = content.query_all(predicates::and(
            predicates::has_tag_name("slot"),
            predicates::has_attribute(SELECTOR_ATTRIBUTE),
        ));

        for slot in candidates {
            let raw = slot.attribute(SELECTOR_ATTRIBUTE).unwrap_or_default();
            let problem = match ContentSelector::parse(raw) {
                Ok(selector) => {
                    if let Some(name) = slot.attribute("name") {
                        slots.push(NamedSlot {
                            name: name.to_string(),
                            selector,
                        });
                    }
                    continue;
                }
                Err(SelectorProblem::Unparseable) => format!("Unmatched selector: {}", raw),
                Err(SelectorProblem::Combinator(combinator)) => {
                    format!("Unsupported CSS operator: {}", combinator)
                }
            };

            let source_range = document
                .source_range_for_attribute_value(slot.id(), SELECTOR_ATTRIBUTE)
                .ok_or_else(|| {
                    LinterError::RuleError(format!(
                        "no source location for {} in {}",
                        SELECTOR_ATTRIBUTE,
                        document.url()
                    ))
                })?;
            warnings.push(Warning::new(CODE, Severity::Warning, problem, source_range));
        }

        Ok(slots)
    }

    fn check_usage(
        &self,
        document: &ParsedDocument,
        usage: NodeRef<'_>,
        slots: &[NamedSlot],
    ) -> Result<Option<Warning>, LinterError> {
        let mut fix = Vec::new();

        for child in usage.child_elements() {
            if child.has_attribute("slot") {
                continue;
            }
            let tag_name = child.tag_name().unwrap_or_default();
            let Some(slot) = slots
                .iter()
                .find(|slot| slot.selector.matches(tag_name, |name| child.attribute(name)))
            else {
                continue;
            };
            if let Some(insertion) =
                document.insert_after_tag_name(child.id(), format!(" slot=\"{}\"", slot.name))
            {
                fix.push(insertion);
            }
        }

        if fix.is_empty() {
            return Ok(None);
        }

        let tag_name = usage.tag_name().unwrap_or_default();
        let source_range = document.source_range_for_start_tag(usage.id()).ok_or_else(|| {
            LinterError::RuleError(format!(
                "no source location for <{}> in {}",
                tag_name,
                document.url()
            ))
        })?;

        Ok(Some(
            Warning::new(
                CODE,
                Severity::Warning,
                format!(
                    "Deprecated <content>-based distribution into <{}>. Must use the `slot` attribute for named distribution.",
                    tag_name
                ),
                source_range,
            )
            .with_fix(fix),
        ))
    }
}

impl HtmlRule for ContentToSlotUsages {
    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns about old-content-selector values that slots cannot express, and adds slot attributes to children of element usages."
    }

    fn check_document(&self, document: &ParsedDocument) -> Result<Vec<Warning>, LinterError> {
        let mut warnings = Vec::new();

        for dom_module in document.dom_modules() {
            let Some(content) = dom_module
                .node
                .query(predicates::has_tag_name("template"))
                .and_then(|template| template.template_content())
            else {
                continue;
            };

            let slots = self.collect_slots(document, content, &mut warnings)?;
            let Some(element_name) = dom_module.id else {
                continue;
            };
            if slots.is_empty() {
                continue;
            }

            for usage in document.elements_named(element_name) {
                if let Some(warning) = self.check_usage(document, usage, &slots)? {
                    warnings.push(warning);
                }
            }
        }

        Ok(warnings)
    }
}
