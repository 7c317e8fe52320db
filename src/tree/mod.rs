//! Read-only view over a rendered document
//!
//! Detection only needs text, attributes, rendered geometry and the
//! parent/child links of a page. [`VisualTree`] captures exactly that, so
//! the same pass runs over a live host document or over a [`Page`] built
//! from markup or a layout snapshot.

mod html_loader;
mod page;
mod snapshot_loader;

pub use html_loader::*;
pub use page::*;
pub use snapshot_loader::*;

use std::borrow::Cow;
use std::fmt::Debug;
use std::hash::Hash;

/// Rendered box of a node as reported by layout
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
    /// Whether the node participates in layout at all
    pub visible: bool,
    /// Intrinsic size for replaced content (images); zero when unknown
    pub natural_width: f64,
    pub natural_height: f64,
}

impl Geometry {
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Visible and occupying a nonzero box
    pub fn is_rendered(&self) -> bool {
        self.visible && self.has_area()
    }
}

/// Capability set the detector needs from a document tree.
///
/// `Node` is a cheap handle; two handles are the same node iff they compare
/// equal.
pub trait VisualTree {
    type Node: Copy + Eq + Hash + Debug;

    fn root(&self) -> Self::Node;

    /// Lowercase tag name
    fn tag(&self, node: Self::Node) -> &str;

    /// Concatenated text of all descendant text nodes
    fn text(&self, node: Self::Node) -> Cow<'_, str>;

    fn attr(&self, node: Self::Node, name: &str) -> Option<&str>;

    fn attributes(&self, node: Self::Node) -> Vec<(&str, &str)>;

    fn geometry(&self, node: Self::Node) -> Geometry;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Element children in document order
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Strict ancestors, nearest first
    fn ancestors(&self, node: Self::Node) -> Ancestors<'_, Self> {
        Ancestors {
            tree: self,
            next: self.parent(node),
        }
    }

    /// Nearest of `node` and its ancestors satisfying `pred`
    fn closest<F>(&self, node: Self::Node, mut pred: F) -> Option<Self::Node>
    where
        F: FnMut(Self::Node) -> bool,
    {
        if pred(node) {
            return Some(node);
        }
        self.ancestors(node).find(|&n| pred(n))
    }

    /// All descendants in document order, `node` excluded
    fn descendants(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(node).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }
        out
    }

    fn find_descendants<F>(&self, node: Self::Node, mut pred: F) -> Vec<Self::Node>
    where
        F: FnMut(Self::Node) -> bool,
    {
        self.descendants(node).into_iter().filter(|&n| pred(n)).collect()
    }

    /// True when `node` is `ancestor` or lies inside it
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        node == ancestor || self.ancestors(node).any(|n| n == ancestor)
    }

    fn has_class(&self, node: Self::Node, class: &str) -> bool {
        self.attr(node, "class")
            .map(|c| c.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    }
}

/// Iterator over the strict ancestors of a node
pub struct Ancestors<'a, T: VisualTree + ?Sized> {
    tree: &'a T,
    next: Option<T::Node>,
}

impl<T: VisualTree + ?Sized> Iterator for Ancestors<'_, T> {
    type Item = T::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_queries() {
        let html = r#"
        <html><body>
            <div id="outer" style="width: 400px; height: 300px">
                <section id="inner">
                    <span id="leaf">hello</span>
                </section>
                <p id="sibling">world</p>
            </div>
        </body></html>
        "#;
        let page = Page::from_html(html, &LayoutOptions::default());

        let outer = page.find_by_id("outer").unwrap();
        let inner = page.find_by_id("inner").unwrap();
        let leaf = page.find_by_id("leaf").unwrap();
        let sibling = page.find_by_id("sibling").unwrap();

        let ancestors: Vec<_> = page.ancestors(leaf).take(2).collect();
        assert_eq!(ancestors, vec![inner, outer]);

        assert_eq!(page.descendants(outer), vec![inner, leaf, sibling]);
        assert!(page.contains(outer, leaf));
        assert!(page.contains(leaf, leaf));
        assert!(!page.contains(inner, sibling));

        let found = page.closest(leaf, |n| page.tag(n) == "div");
        assert_eq!(found, Some(outer));
        assert_eq!(page.closest(leaf, |n| page.tag(n) == "span"), Some(leaf));

        let paragraphs = page.find_descendants(page.root(), |n| page.tag(n) == "p");
        assert_eq!(paragraphs, vec![sibling]);
    }

    #[test]
    fn test_has_class_matches_whole_tokens() {
        let page = Page::from_html(
            r#"<div id="x" class="card product-card">x</div>"#,
            &LayoutOptions::default(),
        );
        let node = page.find_by_id("x").unwrap();
        assert!(page.has_class(node, "card"));
        assert!(page.has_class(node, "product-card"));
        assert!(!page.has_class(node, "product"));
    }
}
