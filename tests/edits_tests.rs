use polymer_lint::{
    apply_edits, InMemoryUrlLoader, LinterError, ParsedDocument, Replacement, SourceRange,
};

fn replacement(document: &ParsedDocument, start: usize, end: usize, text: &str) -> Replacement {
    Replacement {
        range: document.source_range(start..end),
        replacement_text: text.to_string(),
    }
}

fn setup() -> (ParsedDocument, InMemoryUrlLoader) {
    let html = "<div>\n  <span>héllo</span>\n</div>";
    let document = ParsedDocument::parse("page.html", html).unwrap();
    let loader = InMemoryUrlLoader::new().with_file("page.html", html);
    (document, loader)
}

#[test]
fn test_replacements_apply_back_to_front() {
    let (document, loader) = setup();
    let edits = vec![
        vec![replacement(&document, 1, 4, "section")],
        vec![replacement(&document, 30, 33, "section")],
    ];
    let result = apply_edits(&edits, &loader).unwrap();

    assert_eq!(result.applied_edits.len(), 2);
    assert_eq!(
        result.edited_files.get("page.html").map(String::as_str),
        Some("<section>\n  <span>héllo</span>\n</section>")
    );
}

#[test]
fn test_overlapping_edits_are_incompatible() {
    let (document, loader) = setup();
    let edits = vec![
        vec![replacement(&document, 8, 14, "<b>")],
        vec![replacement(&document, 10, 12, "x")],
        vec![replacement(&document, 5, 5, "\n"), replacement(&document, 5, 5, "\n")],
    ];
    let result = apply_edits(&edits, &loader).unwrap();

    assert_eq!(result.applied_edits.len(), 1);
    assert_eq!(result.incompatible_edits.len(), 2);
    assert_eq!(
        result.edited_files.get("page.html").map(String::as_str),
        Some("<div>\n  <b>héllo</span>\n</div>")
    );
}

#[test]
fn test_edits_outside_the_file_are_rejected() {
    let (document, loader) = setup();
    let mut out_of_range = replacement(&document, 0, 0, "x");
    out_of_range.range.offsets = 500..501;
    assert!(matches!(
        apply_edits(&[vec![out_of_range]], &loader),
        Err(LinterError::InvalidEdit(_))
    ));

    // Inside the two-byte "é".
    let split_char = replacement(&document, 16, 16, "x");
    assert!(matches!(
        apply_edits(&[vec![split_char]], &loader),
        Err(LinterError::InvalidEdit(_))
    ));
}

#[test]
fn test_missing_file_fails() {
    let (document, _) = setup();
    let edit = vec![replacement(&document, 0, 0, "x")];
    let result = apply_edits(&[edit], &InMemoryUrlLoader::new());
    assert!(matches!(result, Err(LinterError::LoadError { .. })));
}

#[test]
fn test_source_range_positions() {
    let (document, _) = setup();
    let range: SourceRange = document.source_range(20..30);
    assert_eq!(range.file, "page.html");
    assert_eq!((range.start.line, range.start.column), (1, 13));
    assert_eq!((range.end.line, range.end.column), (2, 2));
}
