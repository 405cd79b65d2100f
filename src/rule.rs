use crate::document::ParsedDocument;
use crate::warning::Warning;
use crate::LinterError;

/// A lint rule over parsed HTML documents.
///
/// Rules only read the document; everything they find comes back as
/// [`Warning`] values. A rule returning `Err` does not stop the lint run:
/// the driver turns the error into a diagnostic for that rule and file.
pub trait HtmlRule: Send + Sync {
    /// Stable identifier, used for rule selection and warning filtering.
    fn code(&self) -> &'static str;

    /// Human-readable summary for rule listings.
    fn description(&self) -> &'static str;

    fn check_document(&self, document: &ParsedDocument) -> Result<Vec<Warning>, LinterError>;
}
