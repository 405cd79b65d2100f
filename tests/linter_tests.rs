use polymer_lint::{
    Analyzer, FsUrlLoader, HtmlRule, InMemoryUrlLoader, Linter, LinterConfig, LinterError,
    ParsedDocument, RuleRegistry, Severity, Warning, COULD_NOT_LOAD, INTERNAL_LINT_ERROR,
};
use std::sync::Arc;

const BUTTON_HTML: &str = "<dom-module id=\"x-a\">\n  <template>\n    <paper-button>A</paper-button>\n  </template>\n</dom-module>\n";

struct FailingRule;

impl HtmlRule for FailingRule {
    fn code(&self) -> &'static str {
        "always-fails"
    }

    fn description(&self) -> &'static str {
        "Fails on every document."
    }

    fn check_document(&self, _document: &ParsedDocument) -> Result<Vec<Warning>, LinterError> {
        Err(LinterError::RuleError("boom".to_string()))
    }
}

struct PanickingRule;

impl HtmlRule for PanickingRule {
    fn code(&self) -> &'static str {
        "always-panics"
    }

    fn description(&self) -> &'static str {
        "Panics on every document."
    }

    fn check_document(&self, _document: &ParsedDocument) -> Result<Vec<Warning>, LinterError> {
        let found: Vec<Warning> = Vec::new();
        let index = found.len() + 3;
        Ok(vec![found[index].clone()])
    }
}

struct ShadowingRule;

impl HtmlRule for ShadowingRule {
    fn code(&self) -> &'static str {
        "paper-button-style"
    }

    fn description(&self) -> &'static str {
        "Shadows a built-in code."
    }

    fn check_document(&self, _document: &ParsedDocument) -> Result<Vec<Warning>, LinterError> {
        Ok(Vec::new())
    }
}

fn in_memory_analyzer() -> Analyzer {
    Analyzer::new(
        InMemoryUrlLoader::new()
            .with_file("a.html", BUTTON_HTML)
            .with_file("b.html", BUTTON_HTML.replace("x-a", "x-b"))
            .with_file("clean.html", "<p>Nothing to see</p>"),
    )
}

#[test]
fn test_registry_lists_builtin_rules() {
    let registry = RuleRegistry::with_builtin_rules().unwrap();
    let codes: Vec<_> = registry.rules().map(|(code, _)| code).collect();
    assert_eq!(codes, vec!["paper-button-style", "content-to-slot-usages"]);
    assert_eq!(registry.get_rules(None).unwrap().len(), 2);
}

#[test]
fn test_registry_rejects_duplicate_codes() {
    let mut registry = RuleRegistry::with_builtin_rules().unwrap();
    let result = registry.register(ShadowingRule);
    assert!(matches!(result, Err(LinterError::DuplicateRule(code)) if code == "paper-button-style"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_registry_rejects_unknown_codes() {
    let registry = RuleRegistry::with_builtin_rules().unwrap();
    let result = registry.get_rules(Some(&["paper-button-style", "no-such-rule"]));
    assert!(matches!(result, Err(LinterError::UnknownRule(code)) if code == "no-such-rule"));
}

#[test]
fn test_registries_are_isolated() {
    let mut first = RuleRegistry::new();
    first.register(FailingRule).unwrap();
    let second = RuleRegistry::new();
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}

#[test]
fn test_results_follow_file_order() {
    let registry = RuleRegistry::with_builtin_rules().unwrap();
    let linter = Linter::new(registry.get_rules(None).unwrap(), in_memory_analyzer());

    let results = linter.lint(&["b.html", "clean.html", "a.html"]).unwrap();
    let files: Vec<_> = results
        .iter()
        .map(|w| w.source_range.file.as_str())
        .collect();
    assert_eq!(files, vec!["b.html", "a.html"]);
    assert_eq!(results.contents("clean.html"), Some("<p>Nothing to see</p>"));
}

#[test]
fn test_failing_rule_does_not_abort_the_run() {
    let mut registry = RuleRegistry::with_builtin_rules().unwrap();
    registry.register(FailingRule).unwrap();
    let linter = Linter::new(registry.get_rules(None).unwrap(), in_memory_analyzer());

    let results = linter.lint(&["a.html"]).unwrap();
    let codes: Vec<_> = results.iter().map(|w| w.code.as_str()).collect();
    // Rule failures are anchored at the start of the file.
    assert_eq!(codes, vec![INTERNAL_LINT_ERROR, "paper-button-style"]);

    let failure = &results[0];
    assert_eq!(failure.severity, Severity::Error);
    assert!(failure.message.contains("always-fails"));
    assert!(failure.message.contains("a.html"));
}

#[test]
fn test_panicking_rule_does_not_abort_the_run() {
    let mut registry = RuleRegistry::with_builtin_rules().unwrap();
    registry.register(PanickingRule).unwrap();
    let linter = Linter::new(registry.get_rules(None).unwrap(), in_memory_analyzer());

    let results = linter.lint(&["a.html", "b.html"]).unwrap();
    let codes: Vec<_> = results.iter().map(|w| w.code.as_str()).collect();
    assert_eq!(
        codes,
        vec![
            INTERNAL_LINT_ERROR,
            "paper-button-style",
            INTERNAL_LINT_ERROR,
            "paper-button-style"
        ]
    );

    let failure = &results[0];
    assert_eq!(failure.severity, Severity::Error);
    assert!(failure.message.contains("always-panics"));
    assert!(failure.message.contains("panicked"));
    assert_eq!(results[2].source_range.file, "b.html");
}

#[test]
fn test_missing_file_is_reported_not_fatal() {
    let registry = RuleRegistry::with_builtin_rules().unwrap();
    let linter = Linter::new(registry.get_rules(None).unwrap(), in_memory_analyzer());

    let results = linter.lint(&["missing.html", "a.html"]).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].code, COULD_NOT_LOAD);
    assert_eq!(results[0].source_range.file, "missing.html");
    assert_eq!(results[1].code, "paper-button-style");
}

#[test]
fn test_config_selects_and_filters() {
    let config = LinterConfig::from_json(
        r#"{
            "rules": ["paper-button-style"],
            "ignore_warnings": [],
            "files_to_ignore": ["b.*"],
            "workers": 2
        }"#,
    )
    .unwrap();
    let registry = RuleRegistry::with_builtin_rules().unwrap();
    let linter = Linter::from_config(&registry, in_memory_analyzer(), &config).unwrap();

    let codes: Vec<_> = linter.rules().map(|rule| rule.code()).collect();
    assert_eq!(codes, vec!["paper-button-style"]);

    let results = linter.lint(&["a.html", "b.html"]).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source_range.file, "a.html");
}

#[test]
fn test_config_ignores_warning_codes() {
    let config = LinterConfig {
        ignore_warnings: vec!["paper-button-style".to_string()],
        ..LinterConfig::default()
    };
    let registry = RuleRegistry::with_builtin_rules().unwrap();
    let linter = Linter::from_config(&registry, in_memory_analyzer(), &config).unwrap();

    let results = linter.lint(&["a.html", "b.html"]).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_config_errors() {
    assert!(matches!(
        LinterConfig::from_json("{ \"rules\": 3 }"),
        Err(LinterError::ConfigError(_))
    ));

    let config = LinterConfig {
        files_to_ignore: vec!["[".to_string()],
        ..LinterConfig::default()
    };
    let registry = RuleRegistry::with_builtin_rules().unwrap();
    assert!(Linter::from_config(&registry, in_memory_analyzer(), &config).is_err());
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lint.json");
    std::fs::write(&path, r#"{ "ignore_warnings": ["could-not-load"] }"#).unwrap();

    let config = LinterConfig::from_json_file(path.to_str().unwrap()).unwrap();
    assert_eq!(config.ignore_warnings, vec!["could-not-load".to_string()]);
    assert!(config.rules.is_empty());
    assert_eq!(config.workers, None);
}

#[test]
fn test_lint_package_walks_the_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("elements")).unwrap();
    std::fs::write(dir.path().join("elements").join("x-a.html"), BUTTON_HTML).unwrap();
    std::fs::write(dir.path().join("index.html"), "<p>hi</p>").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "<paper-button>").unwrap();

    let registry = RuleRegistry::with_builtin_rules().unwrap();
    let linter = Linter::new(
        registry.get_rules(None).unwrap(),
        Analyzer::new(FsUrlLoader::new(dir.path())),
    );

    let results = linter.lint_package().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source_range.file, "elements/x-a.html");
    assert!(results.contents("index.html").is_some());
}

#[test]
fn test_fs_loader_stays_inside_root() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = Analyzer::new(FsUrlLoader::new(dir.path()));
    assert!(matches!(
        analyzer.load("../outside.html"),
        Err(LinterError::LoadError { .. })
    ));
}

#[test]
fn test_linter_is_shareable_across_threads() {
    let registry = RuleRegistry::with_builtin_rules().unwrap();
    let linter = Arc::new(Linter::new(
        registry.get_rules(None).unwrap(),
        in_memory_analyzer(),
    ));

    let handles: Vec<_> = ["a.html", "b.html"]
        .into_iter()
        .map(|file| {
            let linter = Arc::clone(&linter);
            std::thread::spawn(move || linter.lint(&[file]).unwrap().len())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}
