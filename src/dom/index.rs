use std::collections::HashMap;

use markup5ever_rcdom::{Handle, NodeData, RcDom};
use string_interner::{DefaultSymbol, StringInterner};

use crate::dom::spans::{scan_tags, TagSpan};
use crate::dom::{IndexedAttribute, IndexedNode, NodeKind, SourceMap};

/// Tags the tree builder inserts on its own when the source omits them.
const IMPLIED_ELEMENTS: &[&str] = &["html", "head", "body", "tbody", "colgroup", "tr"];

pub struct NodeArena {
    nodes: Vec<IndexedNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(1024),
        }
    }

    #[inline]
    pub(crate) fn allocate(&mut self, node: IndexedNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&IndexedNode> {
        self.nodes.get(index)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut IndexedNode> {
        self.nodes.get_mut(index)
    }
}

/// Walks the scanned spans alongside the tree, pairing each element with the
/// next start tag of the same name.
struct SpanCursor<'a> {
    spans: &'a [TagSpan],
    next: usize,
}

impl SpanCursor<'_> {
    fn claim(&mut self, name: &str) -> Option<usize> {
        let matches = |span: &TagSpan| span.name.eq_ignore_ascii_case(name);

        if self.spans.get(self.next).is_some_and(matches) {
            self.next += 1;
            return Some(self.next - 1);
        }
        if IMPLIED_ELEMENTS.contains(&name) {
            return None;
        }
        // Tags the parser dropped are skipped over.
        let found = self.spans[self.next.min(self.spans.len())..]
            .iter()
            .position(matches)?;
        self.next += found + 1;
        Some(self.next - 1)
    }
}

pub struct DOMIndex {
    pub arena: NodeArena,
    elements: HashMap<DefaultSymbol, Vec<usize>>,
    interner: StringInterner,
    spans: Vec<TagSpan>,
    source_map: SourceMap,
}

impl DOMIndex {
    pub fn new(dom: &RcDom, source: &str) -> Self {
        let spans = scan_tags(source);
        let mut index = Self {
            arena: NodeArena::new(),
            elements: HashMap::with_capacity(256),
            interner: StringInterner::with_capacity(256),
            spans: Vec::new(),
            source_map: SourceMap::new(source),
        };

        let mut cursor = SpanCursor {
            spans: &spans,
            next: 0,
        };
        index.build_from_node(&dom.document, false, &mut cursor);
        index.spans = spans;
        index
    }

    fn build_from_node(&mut self, handle: &Handle, fragment: bool, cursor: &mut SpanCursor) -> usize {
        let mut node = IndexedNode::new(NodeKind::Other);
        let mut template_content = None;

        match &handle.data {
            NodeData::Document => {
                node.kind = if fragment {
                    NodeKind::Fragment
                } else {
                    NodeKind::Document
                };
            }
            NodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                node.kind = NodeKind::Element;
                node.tag_name = Some(self.interner.get_or_intern(&*name.local));
                node.span = cursor.claim(&name.local);
                for attr in attrs.borrow().iter() {
                    node.attributes.push(IndexedAttribute {
                        name: self.interner.get_or_intern(&*attr.name.local),
                        value: attr.value.to_string(),
                    });
                }
                template_content = template_contents.borrow().clone();
            }
            NodeData::Text { contents } => {
                node.kind = NodeKind::Text;
                node.text = Some(contents.borrow().to_string());
            }
            NodeData::Comment { contents } => {
                node.kind = NodeKind::Comment;
                node.text = Some(contents.to_string());
            }
            _ => {}
        }

        let tag_name = node.tag_name;
        let idx = self.arena.allocate(node);
        if let Some(tag) = tag_name {
            self.elements.entry(tag).or_default().push(idx);
        }

        // Template content precedes the (always empty) child list in source order.
        let content_idx = template_content.map(|content| self.build_from_node(&content, true, cursor));

        let children: Vec<usize> = handle
            .children
            .borrow()
            .iter()
            .map(|child| self.build_from_node(child, false, cursor))
            .collect();

        if let Some(node) = self.arena.get_mut(idx) {
            node.children = children;
            node.template_content = content_idx;
        }

        idx
    }

    pub(crate) fn get_node(&self, index: usize) -> Option<&IndexedNode> {
        self.arena.get(index)
    }

    pub(crate) fn get_span(&self, node: &IndexedNode) -> Option<&TagSpan> {
        node.span.and_then(|span| self.spans.get(span))
    }

    pub fn resolve_symbol(&self, symbol: DefaultSymbol) -> Option<&str> {
        self.interner.resolve(symbol)
    }

    pub fn lookup_symbol(&self, name: &str) -> Option<DefaultSymbol> {
        self.interner.get(name)
    }

    pub(crate) fn get_source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Every element with the given tag name, template contents included.
    pub fn elements_named(&self, name: &str) -> &[usize] {
        self.lookup_symbol(name)
            .and_then(|symbol| self.elements.get(&symbol))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First descendant of `root` in document order accepted by `predicate`.
    /// Template contents are not entered.
    pub fn find_first<F>(&self, root: usize, mut predicate: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool,
    {
        let mut stack: Vec<usize> = self.children_of(root).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if predicate(current) {
                return Some(current);
            }
            stack.extend(self.children_of(current).iter().rev());
        }
        None
    }

    /// Every descendant of `root` accepted by `predicate`, in document order.
    /// Template contents are not entered.
    pub fn find_all<F>(&self, root: usize, mut predicate: F) -> Vec<usize>
    where
        F: FnMut(usize) -> bool,
    {
        let mut found = Vec::new();
        let mut stack: Vec<usize> = self.children_of(root).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if predicate(current) {
                found.push(current);
            }
            stack.extend(self.children_of(current).iter().rev());
        }
        found
    }

    fn children_of(&self, index: usize) -> &[usize] {
        self.get_node(index)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }
}
