//! Build a [`Page`] from HTML markup
//!
//! Markup carries no layout, so geometry is read from what the author
//! declared:
//! - inline `style` width/height (`px`, unitless or `%` of the parent)
//! - `width` / `height` attributes
//! - otherwise the parent's box, with the root taking the viewport
//!
//! Visibility follows `hidden`, `display: none`, `visibility: hidden` and
//! `<head>`; hidden parents hide their whole subtree. Intrinsic image size
//! is taken from `data-natural-width` / `data-natural-height`.

use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};

use super::{Geometry, NodeId, Page};

/// Elements that never render and whose text is not page content
const SKIPPED_TAGS: &[&str] = &["script", "style", "template", "noscript"];

/// Viewport used as the root box when loading markup
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            viewport_width: 1920.0,
            viewport_height: 1080.0,
        }
    }
}

impl Page {
    /// Parse an HTML document into a page
    pub fn from_html(html: &str, layout: &LayoutOptions) -> Page {
        let document = Html::parse_document(html);
        let mut page = Page::default();

        let viewport = Geometry {
            width: layout.viewport_width,
            height: layout.viewport_height,
            visible: true,
            ..Geometry::default()
        };

        // Explicit stack instead of recursion: nesting depth is up to the markup
        let mut stack = vec![Step::Open(document.root_element(), None, viewport)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(element, parent, parent_box) => {
                    let (id, geometry) = open_element(&mut page, element, parent, parent_box);
                    stack.push(Step::Close(id));

                    let children: Vec<_> = element.children().collect();
                    for child in children.into_iter().rev() {
                        match child.value() {
                            Node::Text(t) => stack.push(Step::Text(&t.text)),
                            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
                            Node::Element(_) => {
                                if let Some(child_ref) = ElementRef::wrap(child) {
                                    stack.push(Step::Open(child_ref, Some(id), geometry));
                                }
                            }
                            _ => {}
                        }
                    }
                }
                Step::Text(chunk) => page.push_text(chunk),
                Step::Close(id) => page.close(id),
            }
        }
        page
    }
}

enum Step<'a> {
    Open(ElementRef<'a>, Option<NodeId>, Geometry),
    Text(&'a str),
    Close(NodeId),
}

fn open_element(
    page: &mut Page,
    element: ElementRef,
    parent: Option<NodeId>,
    parent_box: Geometry,
) -> (NodeId, Geometry) {
    let el = element.value();
    let tag = el.name().to_ascii_lowercase();
    let attrs: Vec<(String, String)> = el
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let style = el.attr("style").map(parse_style).unwrap_or_default();
    let style_value = |prop: &str| {
        style
            .iter()
            .find(|(k, _)| k == prop)
            .map(|(_, v)| v.as_str())
    };

    let width = style_value("width")
        .and_then(|v| parse_length(v, parent_box.width))
        .or_else(|| el.attr("width").and_then(|v| parse_length(v, parent_box.width)))
        .unwrap_or(parent_box.width);
    let height = style_value("height")
        .and_then(|v| parse_length(v, parent_box.height))
        .or_else(|| el.attr("height").and_then(|v| parse_length(v, parent_box.height)))
        .unwrap_or(parent_box.height);

    let visible = parent_box.visible
        && tag != "head"
        && el.attr("hidden").is_none()
        && style_value("display") != Some("none")
        && style_value("visibility") != Some("hidden");

    let natural = |name: &str| {
        el.attr(name)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    let geometry = Geometry {
        width,
        height,
        visible,
        natural_width: natural("data-natural-width"),
        natural_height: natural("data-natural-height"),
    };

    (page.push(parent, tag, attrs, geometry), geometry)
}

/// Split an inline style into lowercase `(property, value)` pairs
fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let value = value.trim().trim_end_matches("!important").trim();
            Some((prop.trim().to_ascii_lowercase(), value.to_ascii_lowercase()))
        })
        .collect()
}

fn parse_length(value: &str, parent: f64) -> Option<f64> {
    let value = value.trim();
    if let Some(pct) = value.strip_suffix('%') {
        return pct.trim().parse::<f64>().ok().map(|p| parent * p / 100.0);
    }
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| *n >= 0.0)
}
