//! Record assembly, container claims and highlight requests

use std::collections::HashSet;
use std::hash::Hash;

use tracing::debug;

use super::{resolve_image_url, ContainerMatch, DetectionConfig, ProductRecord};
use crate::patterns::normalize_text;
use crate::tree::VisualTree;

/// Containers already backing a record in the current pass
#[derive(Debug, Clone)]
pub struct ClaimedSet<N> {
    nodes: HashSet<N>,
}

impl<N: Copy + Eq + Hash> ClaimedSet<N> {
    pub fn new() -> Self {
        Self {
            nodes: HashSet::new(),
        }
    }

    /// Returns false if `node` was already claimed
    pub fn claim(&mut self, node: N) -> bool {
        self.nodes.insert(node)
    }

    pub fn contains(&self, node: N) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N: Copy + Eq + Hash> Default for ClaimedSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which part of a product a highlighted node is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightRole {
    Image,
    Title,
    Price,
}

impl HighlightRole {
    /// Style class the host applies to the node
    pub fn class_name(self) -> &'static str {
        match self {
            HighlightRole::Image => "product-lens-image",
            HighlightRole::Title => "product-lens-title",
            HighlightRole::Price => "product-lens-price",
        }
    }
}

/// Receives highlight requests; rendering them is up to the host
pub trait HighlightSink<N> {
    fn highlight(&mut self, node: N, role: HighlightRole);
}

/// Discards every request
impl<N> HighlightSink<N> for () {
    fn highlight(&mut self, _node: N, _role: HighlightRole) {}
}

/// Collects requests in the order they were made
#[derive(Debug, Clone)]
pub struct HighlightLog<N> {
    pub requests: Vec<(N, HighlightRole)>,
}

impl<N> Default for HighlightLog<N> {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
        }
    }
}

impl<N> HighlightLog<N> {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl<N> HighlightSink<N> for HighlightLog<N> {
    fn highlight(&mut self, node: N, role: HighlightRole) {
        self.requests.push((node, role));
    }
}

/// Claim the container and turn the match into a record
pub fn build_record<T, H>(
    tree: &T,
    price: T::Node,
    found: &ContainerMatch<T::Node>,
    claimed: &mut ClaimedSet<T::Node>,
    config: &DetectionConfig,
    highlighter: &mut H,
) -> ProductRecord
where
    T: VisualTree,
    H: HighlightSink<T::Node>,
{
    let newly_claimed = claimed.claim(found.container);
    debug_assert!(newly_claimed, "container claimed twice in one pass");

    let record = ProductRecord {
        title: normalize_text(&tree.text(found.title)),
        price: normalize_text(&tree.text(price)),
        image_url: resolve_image_url(tree, found.image, config),
    };

    highlighter.highlight(found.image, HighlightRole::Image);
    highlighter.highlight(found.title, HighlightRole::Title);
    highlighter.highlight(price, HighlightRole::Price);

    debug!(
        container = ?found.container,
        title = %record.title,
        price = %record.price,
        image = %record.image_url,
        "product detected"
    );
    record
}
