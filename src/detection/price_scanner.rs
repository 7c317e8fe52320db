//! Price candidate scanning
//!
//! Walks the page in document order and keeps nodes whose text (or
//! attributes) denote a price, after throwing out anything that reads like
//! a rating or sits inside a review block. Only the innermost candidate
//! of a nested run survives, so a wrapper never stands in for the price it
//! wraps.

use std::collections::HashSet;

use tracing::trace;

use super::{DetectionConfig, HighlightRole};
use crate::patterns;
use crate::tree::VisualTree;

/// All price candidates of the page, in document order
pub fn scan_price_candidates<T: VisualTree>(tree: &T, config: &DetectionConfig) -> Vec<T::Node> {
    let root = tree.root();
    let candidates: Vec<T::Node> = std::iter::once(root)
        .chain(tree.descendants(root))
        .filter(|&node| patterns::is_scanned_element(tree.tag(node), &tree.attributes(node)))
        .filter(|&node| is_price_candidate(tree, node, config))
        .collect();
    innermost(tree, candidates)
}

/// Drop every candidate that has another candidate below it
fn innermost<T: VisualTree>(tree: &T, candidates: Vec<T::Node>) -> Vec<T::Node> {
    // Nodes with a candidate somewhere beneath them; always closed upwards
    let mut covered = HashSet::new();
    let mut kept = Vec::with_capacity(candidates.len());

    for &node in candidates.iter().rev() {
        if covered.contains(&node) {
            trace!(?node, "wraps a nested price");
        } else {
            kept.push(node);
        }
        for ancestor in tree.ancestors(node) {
            if !covered.insert(ancestor) {
                break;
            }
        }
    }

    kept.reverse();
    kept
}

/// Apply the candidate rules to a single node
pub fn is_price_candidate<T: VisualTree>(tree: &T, node: T::Node, config: &DetectionConfig) -> bool {
    if !tree.geometry(node).is_rendered() {
        return false;
    }

    let text = tree.text(node);
    let text = text.trim();
    if text.is_empty() || text.chars().count() > config.max_price_text_len {
        return false;
    }

    if config.skip_highlighted && tree.has_class(node, HighlightRole::Price.class_name()) {
        trace!(?node, "already highlighted");
        return false;
    }

    if inside_review_container(tree, node, config.review_ancestor_depth) {
        trace!(?node, text, "inside review block");
        return false;
    }

    let attrs = tree.attributes(node);
    if patterns::carries_review_value(&attrs) {
        trace!(?node, text, "carries rating attribute");
        return false;
    }

    if patterns::is_review_text(text) {
        trace!(?node, text, "review-like text");
        return false;
    }

    let accepted = patterns::is_price_text(text) || patterns::carries_price_attribute(&attrs);
    if accepted {
        trace!(?node, text, "price candidate");
    }
    accepted
}

/// Whether `node` or one of its nearest `depth` ancestors marks a review block
fn inside_review_container<T: VisualTree>(tree: &T, node: T::Node, depth: usize) -> bool {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .take(depth + 1)
        .any(|n| patterns::marks_review_container(&tree.attributes(n)))
}
