use polymer_lint::{
    apply_edits, Analyzer, FsUrlLoader, HtmlRule, InMemoryUrlLoader, Linter, PaperButtonStyle,
    ParsedDocument, RuleRegistry, Severity,
};
use std::path::PathBuf;

const RULE_ID: &str = "paper-button-style";

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn create_linter(analyzer: Analyzer) -> Linter {
    let registry = RuleRegistry::with_builtin_rules().unwrap();
    Linter::new(registry.get_rules(Some(&[RULE_ID])).unwrap(), analyzer)
}

#[test]
fn test_document_without_dom_modules() {
    let document = ParsedDocument::parse(
        "plain.html",
        "<html><body><paper-button>Loose</paper-button></body></html>",
    )
    .unwrap();
    let warnings = PaperButtonStyle.check_document(&document).unwrap();
    assert!(warnings.is_empty());
}

#[test]
fn test_template_without_paper_button() {
    let html = r#"<dom-module id="x-plain">
  <template>
    <button>Native</button>
  </template>
</dom-module>"#;
    let document = ParsedDocument::parse("plain.html", html).unwrap();
    let warnings = PaperButtonStyle.check_document(&document).unwrap();
    assert_eq!(warnings.len(), 0);
}

#[test]
fn test_dom_module_without_template() {
    let html = r#"<dom-module id="x-empty"><paper-button>Outside a template</paper-button></dom-module>"#;
    let document = ParsedDocument::parse("empty.html", html).unwrap();
    let warnings = PaperButtonStyle.check_document(&document).unwrap();
    assert_eq!(warnings.len(), 0, "only buttons inside the template count");
}

#[test]
fn test_single_paper_button_yields_one_warning() {
    let html = "<dom-module><template><paper-button>Text</paper-button></template></dom-module>";
    let document = ParsedDocument::parse("button.html", html).unwrap();
    let warnings = PaperButtonStyle.check_document(&document).unwrap();

    assert_eq!(warnings.len(), 1);
    let warning = &warnings[0];
    assert_eq!(warning.code, RULE_ID);
    assert_eq!(warning.severity, Severity::Warning);
    assert!(warning.message.contains("display: inline-flex"));
    assert!(warning.message.contains("inline-block"));
    assert_eq!(
        &html[warning.source_range.offsets.clone()],
        "<paper-button>Text</paper-button>"
    );
    assert_eq!(warning.source_range.file, "button.html");
}

#[test]
fn test_fix_for_unindented_template() {
    let html = "<dom-module><template><paper-button>Text</paper-button></template></dom-module>";
    let loader = InMemoryUrlLoader::new().with_file("button.html", html);
    let linter = create_linter(Analyzer::new(loader));

    let results = linter.lint(&["button.html"]).unwrap();
    assert_eq!(results.len(), 1);

    let edited = apply_edits(&results.fixes(), &results.loader()).unwrap();
    assert_eq!(
        edited.edited_files.get("button.html").map(String::as_str),
        Some(
            "<dom-module><template>\n\
             <!-- Remove this to enable the vertical alignment of button content -->\n\
             <style>\n  paper-button {\n    display: inline-block;\n  }\n</style>\
             <paper-button>Text</paper-button></template></dom-module>"
        )
    );
}

#[test]
fn test_only_first_button_per_template_is_reported() {
    let html = r#"<dom-module id="x-many">
  <template>
    <paper-button>One</paper-button>
    <div><paper-button>Two</paper-button></div>
  </template>
</dom-module>"#;
    let document = ParsedDocument::parse("many.html", html).unwrap();
    let warnings = PaperButtonStyle.check_document(&document).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].source_range.start.line, 2);
    assert_eq!(warnings[0].source_range.start.column, 4);
}

#[test]
fn test_nested_template_content_is_not_searched() {
    let html = r#"<dom-module id="x-nested">
  <template>
    <template is="dom-if" if="[[show]]">
      <paper-button>Hidden</paper-button>
    </template>
  </template>
</dom-module>"#;
    let document = ParsedDocument::parse("nested.html", html).unwrap();
    let warnings = PaperButtonStyle.check_document(&document).unwrap();
    assert!(warnings.is_empty());
}

#[test]
fn test_buttons_inside_noscript_are_text() {
    let html = "<dom-module><template><noscript><paper-button>a</paper-button></noscript><paper-button>B</paper-button></template></dom-module>";
    let document = ParsedDocument::parse("noscript.html", html).unwrap();
    let warnings = PaperButtonStyle.check_document(&document).unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(
        &html[warnings[0].source_range.offsets.clone()],
        "<paper-button>B</paper-button>"
    );
}

#[test]
fn test_warns_once_per_dom_module() {
    let analyzer = Analyzer::new(FsUrlLoader::new(fixtures_dir()));
    let linter = create_linter(analyzer);
    let results = linter
        .lint(&[format!("{}/before-fixes.html", RULE_ID)])
        .unwrap();

    let sources: Vec<_> = results
        .iter()
        .map(|w| {
            let contents = results.contents(&w.source_range.file).unwrap();
            contents[w.source_range.offsets.clone()].to_string()
        })
        .collect();
    assert_eq!(
        sources,
        vec![
            "<paper-button raised>Click</paper-button>".to_string(),
            "<paper-button>One</paper-button>".to_string(),
        ]
    );
}

#[test]
fn test_applies_fixes() {
    let analyzer = Analyzer::new(FsUrlLoader::new(fixtures_dir()));
    let linter = create_linter(analyzer);
    let before = format!("{}/before-fixes.html", RULE_ID);
    let results = linter.lint(&[before.as_str()]).unwrap();

    let loader = results.loader();
    let edits = results.fixes();
    assert_eq!(edits.len(), 2);
    let result = apply_edits(&edits, &loader).unwrap();
    assert!(result.incompatible_edits.is_empty());

    let expected = std::fs::read_to_string(
        fixtures_dir().join(RULE_ID).join("after-fixes.html"),
    )
    .unwrap();
    assert_eq!(result.edited_files.get(&before), Some(&expected));
}
