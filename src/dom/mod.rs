pub(crate) mod index;
pub(crate) mod select;
pub(crate) mod spans;
pub(crate) mod utils;

use string_interner::DefaultSymbol;

use crate::warning::Position;

pub(crate) use self::index::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Document,
    /// Inert content of a `<template>`.
    Fragment,
    Element,
    Text,
    Comment,
    Other,
}

#[derive(Debug)]
pub(crate) struct IndexedNode {
    pub kind: NodeKind,
    pub tag_name: Option<DefaultSymbol>,
    pub attributes: Vec<IndexedAttribute>,
    pub children: Vec<usize>,
    pub template_content: Option<usize>,
    pub text: Option<String>,
    /// Index into the scanned tag spans; `None` for elements the parser implied.
    pub span: Option<usize>,
}

impl IndexedNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            tag_name: None,
            attributes: Vec::new(),
            children: Vec::new(),
            template_content: None,
            text: None,
            span: None,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct IndexedAttribute {
    pub name: DefaultSymbol,
    pub value: String,
}

pub(crate) struct SourceMap {
    line_offsets: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        let mut line_offsets = vec![0];
        line_offsets.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_offsets }
    }

    /// Zero-based line and character column of a byte offset.
    pub fn position(&self, source: &str, offset: usize) -> Position {
        let line = match self.line_offsets.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let line_start = self.line_offsets[line];
        let column = source
            .get(line_start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        Position { line, column }
    }
}
