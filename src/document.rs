//! Parsed HTML documents and read-only views over their nodes.

use std::ops::Range;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;

use crate::dom::{DOMIndex, IndexedNode, NodeKind};
use crate::warning::{Replacement, SourceRange};
use crate::LinterError;

/// Handle to a node of one [`ParsedDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One parsed HTML file: its text, its tree, and the mapping between them.
///
/// Elements the parser implied (a missing `<body>`, say) have no source
/// location; every element written in the source does.
pub struct ParsedDocument {
    url: String,
    contents: String,
    index: DOMIndex,
}

impl ParsedDocument {
    pub fn parse(url: impl Into<String>, contents: impl Into<String>) -> Result<Self, LinterError> {
        let contents = contents.into();
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut contents.as_bytes())
            .map_err(|e| LinterError::ParseError(e.to_string()))?;
        let index = DOMIndex::new(&dom, &contents);

        Ok(Self {
            url: url.into(),
            contents,
            index,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.node(NodeId(0))
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { document: self, id }
    }

    /// The `<dom-module>` definitions of this document, in source order.
    pub fn dom_modules(&self) -> Vec<DomModule<'_>> {
        self.root()
            .query_all(predicates::has_tag_name("dom-module"))
            .into_iter()
            .map(|node| DomModule {
                id: node.attribute("id"),
                node,
            })
            .collect()
    }

    /// Every element named `tag_name`, including those inside template contents.
    pub fn elements_named(&self, tag_name: &str) -> Vec<NodeRef<'_>> {
        self.index
            .elements_named(tag_name)
            .iter()
            .map(|&idx| self.node(NodeId(idx)))
            .collect()
    }

    /// The whole element, from its start tag to the end of its end tag.
    pub fn source_range_for_node(&self, id: NodeId) -> Option<SourceRange> {
        let span = self.span(id)?;
        Some(self.source_range(span.start..span.end))
    }

    pub fn source_range_for_start_tag(&self, id: NodeId) -> Option<SourceRange> {
        let span = self.span(id)?;
        Some(self.source_range(span.start..span.start_tag_end))
    }

    /// The attribute's value as written, quotes included.
    pub fn source_range_for_attribute_value(&self, id: NodeId, name: &str) -> Option<SourceRange> {
        let span = self.span(id)?;
        let value = span
            .attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))?
            .value
            .clone()?;
        Some(self.source_range(value))
    }

    /// An insertion of `text` right after the tag name of `id`'s start tag,
    /// where a new attribute can go.
    pub fn insert_after_tag_name(&self, id: NodeId, text: impl Into<String>) -> Option<Replacement> {
        let span = self.span(id)?;
        Some(Replacement {
            range: self.source_range(span.name_end..span.name_end),
            replacement_text: text.into(),
        })
    }

    /// An insertion of `text` as the first content of `id`, right after its start tag.
    pub fn prepend_content_into(&self, id: NodeId, text: impl Into<String>) -> Option<Replacement> {
        let span = self.span(id)?;
        Some(Replacement {
            range: self.source_range(span.start_tag_end..span.start_tag_end),
            replacement_text: text.into(),
        })
    }

    pub fn source_range(&self, offsets: Range<usize>) -> SourceRange {
        let source_map = self.index.get_source_map();
        SourceRange {
            file: self.url.clone(),
            start: source_map.position(&self.contents, offsets.start),
            end: source_map.position(&self.contents, offsets.end),
            offsets,
        }
    }

    fn span(&self, id: NodeId) -> Option<&crate::dom::spans::TagSpan> {
        self.index.get_span(self.indexed(id)?)
    }

    fn indexed(&self, id: NodeId) -> Option<&IndexedNode> {
        self.index.get_node(id.0)
    }
}

/// A `<dom-module>` element and its `id`.
#[derive(Clone, Copy)]
pub struct DomModule<'a> {
    pub id: Option<&'a str>,
    pub node: NodeRef<'a>,
}

/// Borrowed view of one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    document: &'a ParsedDocument,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a ParsedDocument {
        self.document
    }

    fn indexed(&self) -> Option<&'a IndexedNode> {
        self.document.indexed(self.id)
    }

    pub fn is_element(&self) -> bool {
        self.indexed()
            .is_some_and(|node| node.kind == NodeKind::Element)
    }

    pub fn tag_name(&self) -> Option<&'a str> {
        let symbol = self.indexed()?.tag_name?;
        self.document.index.resolve_symbol(symbol)
    }

    pub fn has_tag_name(&self, name: &str) -> bool {
        let Some(symbol) = self.document.index.lookup_symbol(name) else {
            return false;
        };
        self.indexed()
            .is_some_and(|node| node.tag_name == Some(symbol))
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        let symbol = self.document.index.lookup_symbol(name)?;
        self.indexed()?
            .attributes
            .iter()
            .find(|attr| attr.name == symbol)
            .map(|attr| attr.value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Contents of a text or comment node.
    pub fn text(&self) -> Option<&'a str> {
        let node = self.indexed()?;
        match node.kind {
            NodeKind::Text | NodeKind::Comment => node.text.as_deref(),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.indexed().is_some_and(|node| node.kind == NodeKind::Text)
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let document = self.document;
        self.indexed()
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&idx| document.node(NodeId(idx)))
    }

    pub fn child_elements(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.children().filter(NodeRef::is_element)
    }

    /// The inert content fragment of a `<template>` element.
    pub fn template_content(&self) -> Option<NodeRef<'a>> {
        let content = self.indexed()?.template_content?;
        Some(self.document.node(NodeId(content)))
    }

    /// First descendant matching `predicate`, in document order. Like
    /// `dom5.query`, this does not look inside template contents.
    pub fn query<P>(&self, predicate: P) -> Option<NodeRef<'a>>
    where
        P: Fn(&NodeRef<'a>) -> bool,
    {
        let document = self.document;
        document
            .index
            .find_first(self.id.0, |idx| predicate(&document.node(NodeId(idx))))
            .map(|idx| document.node(NodeId(idx)))
    }

    pub fn query_all<P>(&self, predicate: P) -> Vec<NodeRef<'a>>
    where
        P: Fn(&NodeRef<'a>) -> bool,
    {
        let document = self.document;
        document
            .index
            .find_all(self.id.0, |idx| predicate(&document.node(NodeId(idx))))
            .into_iter()
            .map(|idx| document.node(NodeId(idx)))
            .collect()
    }
}

/// Ready-made predicates for [`NodeRef::query`].
pub mod predicates {
    use super::NodeRef;

    pub fn has_tag_name<'n>(name: &'n str) -> impl Fn(&NodeRef<'_>) -> bool + 'n {
        move |node| node.has_tag_name(name)
    }

    pub fn has_attribute<'n>(name: &'n str) -> impl Fn(&NodeRef<'_>) -> bool + 'n {
        move |node| node.has_attribute(name)
    }

    pub fn and<A, B>(a: A, b: B) -> impl Fn(&NodeRef<'_>) -> bool
    where
        A: Fn(&NodeRef<'_>) -> bool,
        B: Fn(&NodeRef<'_>) -> bool,
    {
        move |node| a(node) && b(node)
    }
}
