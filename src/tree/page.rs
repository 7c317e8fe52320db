//! Arena-backed document tree
//!
//! Nodes are stored in document order, so a [`NodeId`] doubles as the
//! node's position in a pre-order walk. Text is kept once, in a single
//! buffer: a subtree's text is a contiguous slice of it, so each node only
//! records a byte range.

use std::borrow::Cow;
use std::ops::Range;

use super::{Geometry, VisualTree};

/// Handle to a node of a [`Page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PageNode {
    pub(crate) tag: String,
    pub(crate) text_span: Range<usize>,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) geometry: Geometry,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// Owned element tree with layout information attached
#[derive(Debug, Clone, Default)]
pub struct Page {
    nodes: Vec<PageNode>,
    text: String,
}

impl Page {
    /// Append a node under `parent`. Callers must push in pre-order, append
    /// the subtree's text with [`Page::push_text`] and then [`Page::close`] it.
    pub(crate) fn push(
        &mut self,
        parent: Option<NodeId>,
        tag: String,
        attrs: Vec<(String, String)>,
        geometry: Geometry,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let start = self.text.len();
        self.nodes.push(PageNode {
            tag,
            text_span: start..start,
            attrs,
            geometry,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    /// Append a text run to the innermost open node
    pub(crate) fn push_text(&mut self, chunk: &str) {
        self.text.push_str(chunk);
    }

    /// End `id`: its text is everything appended since it was pushed
    pub(crate) fn close(&mut self, id: NodeId) {
        let end = self.text.len();
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.text_span.end = end;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node whose `id` attribute equals `id`
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.attrs.iter().any(|(k, v)| k == "id" && v == id))
            .map(NodeId)
    }
}

impl VisualTree for Page {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn tag(&self, node: NodeId) -> &str {
        self.nodes.get(node.0).map(|n| n.tag.as_str()).unwrap_or("")
    }

    fn text(&self, node: NodeId) -> Cow<'_, str> {
        let text = self
            .nodes
            .get(node.0)
            .and_then(|n| self.text.get(n.text_span.clone()))
            .unwrap_or("");
        Cow::Borrowed(text)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node.0)?
            .attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn attributes(&self, node: NodeId) -> Vec<(&str, &str)> {
        self.nodes
            .get(node.0)
            .map(|n| {
                n.attrs
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn geometry(&self, node: NodeId) -> Geometry {
        self.nodes
            .get(node.0)
            .map(|n| n.geometry)
            .unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    // Pre-order storage makes the subtree a contiguous id range.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let end = self.subtree_end(node);
        (node.0 + 1..end).map(NodeId).collect()
    }
}

impl Page {
    fn subtree_end(&self, node: NodeId) -> usize {
        let mut current = node;
        loop {
            if let Some(&last) = self.nodes.get(current.0).and_then(|n| n.children.last()) {
                current = last;
            } else {
                return current.0 + 1;
            }
        }
    }
}
