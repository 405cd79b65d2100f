//! Application of fixes to file contents.

use std::collections::HashMap;

use ropey::Rope;
use tracing::{debug, warn};

use crate::loader::UrlLoader;
use crate::warning::{Edit, Replacement};
use crate::LinterError;

#[derive(Debug, Clone, Default)]
pub struct EditResult {
    /// Edits that were applied, in the order given.
    pub applied_edits: Vec<Edit>,
    /// Edits skipped because they overlap an earlier edit.
    pub incompatible_edits: Vec<Edit>,
    /// New contents of every file touched by an applied edit.
    pub edited_files: HashMap<String, String>,
}

/// Applies `edits` to the files `loader` serves.
///
/// Edits are taken in order; one that overlaps an already accepted edit (or
/// itself) is skipped as a whole. Files are never written, only returned.
pub fn apply_edits(edits: &[Edit], loader: &dyn UrlLoader) -> Result<EditResult, LinterError> {
    let mut result = EditResult::default();
    let mut accepted: Vec<&Replacement> = Vec::new();

    for edit in edits {
        if is_compatible(edit, &accepted) {
            accepted.extend(edit.iter());
            result.applied_edits.push(edit.clone());
        } else {
            warn!(replacements = edit.len(), "skipping edit that overlaps an earlier one");
            result.incompatible_edits.push(edit.clone());
        }
    }

    let mut by_file: HashMap<&str, Vec<&Replacement>> = HashMap::new();
    for replacement in accepted {
        by_file
            .entry(replacement.range.file.as_str())
            .or_default()
            .push(replacement);
    }

    for (file, mut replacements) in by_file {
        let original = loader.load(file)?;
        // Apply from the end so earlier offsets stay valid.
        replacements.sort_by(|a, b| b.range.offsets.start.cmp(&a.range.offsets.start));

        let mut rope = Rope::from_str(&original);
        for replacement in replacements {
            let offsets = &replacement.range.offsets;
            if offsets.start > offsets.end
                || offsets.end > original.len()
                || !original.is_char_boundary(offsets.start)
                || !original.is_char_boundary(offsets.end)
            {
                return Err(LinterError::InvalidEdit(format!(
                    "range {}..{} does not fit {} ({} bytes)",
                    offsets.start,
                    offsets.end,
                    file,
                    original.len()
                )));
            }
            let start = rope.byte_to_char(offsets.start);
            let end = rope.byte_to_char(offsets.end);
            rope.remove(start..end);
            rope.insert(start, &replacement.replacement_text);
        }

        debug!(file, "applied edits");
        result.edited_files.insert(file.to_string(), rope.to_string());
    }

    Ok(result)
}

fn is_compatible(edit: &Edit, accepted: &[&Replacement]) -> bool {
    edit.iter().enumerate().all(|(i, replacement)| {
        let clashes_with_accepted = accepted
            .iter()
            .any(|other| other.range.overlaps(&replacement.range));
        let clashes_with_self = edit[i + 1..]
            .iter()
            .any(|other| other.range.overlaps(&replacement.range));
        !clashes_with_accepted && !clashes_with_self
    })
}
