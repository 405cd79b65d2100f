use crate::linter::LintResults;
use crate::warning::Warning;

/// Renders warnings as the offending source line with the range underlined:
///
/// ```text
///
///     <slot name="bar" old-content-selector=".bar .baz"></slot>
///                                           ~~~~~~~~~~~
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WarningPrettyPrinter;

impl WarningPrettyPrinter {
    pub fn new() -> Self {
        Self
    }

    pub fn pretty_print(&self, results: &LintResults) -> Vec<String> {
        results
            .iter()
            .map(|warning| match results.contents(&warning.source_range.file) {
                Some(contents) => self.pretty_print_warning(warning, contents),
                None => format!("\n{}", warning.message),
            })
            .collect()
    }

    /// Underlines `warning` within `contents`, the text of its file.
    pub fn pretty_print_warning(&self, warning: &Warning, contents: &str) -> String {
        let range = &warning.source_range;
        let line = contents.lines().nth(range.start.line).unwrap_or_default();
        let line_width = line.chars().count();

        let start = range.start.column.min(line_width);
        let end = if range.end.line == range.start.line {
            range.end.column.min(line_width)
        } else {
            line_width
        };
        let width = end.saturating_sub(start).max(1);

        format!("\n{}\n{}{}", line, " ".repeat(start), "~".repeat(width))
    }
}
