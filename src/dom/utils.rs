use std::sync::OnceLock;

use regex::Regex;

static INDENT_PATTERN: OnceLock<Regex> = OnceLock::new();

pub(crate) fn is_void_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content the tokenizer does not scan for markup. The parser
/// runs with scripting enabled, so `noscript` is among them. `plaintext` never
/// closes.
pub(crate) fn is_raw_text_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "script"
            | "style"
            | "textarea"
            | "title"
            | "xmp"
            | "iframe"
            | "noembed"
            | "noframes"
            | "noscript"
            | "plaintext"
    )
}

/// The run of spaces and tabs that starts the first indented line of `text`.
pub(crate) fn line_indentation(text: &str) -> String {
    let regex = INDENT_PATTERN
        .get_or_init(|| Regex::new(r"\n([ \t]+)").expect("indentation pattern is valid"));
    regex
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|indent| indent.as_str().to_string())
        .unwrap_or_default()
}


/// Re-indents every line of `snippet` and prefixes it with a newline, ready to
/// be inserted right after an opening tag.
pub(crate) fn indent_block(snippet: &str, indent: &str) -> String {
    format!("\n{indent}{}", snippet.replace('\n', &format!("\n{indent}")))
}
