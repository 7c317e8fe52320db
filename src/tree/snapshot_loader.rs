//! Build a [`Page`] from a host layout snapshot
//!
//! A host that has a real layout engine can serialize its document as
//! nested JSON nodes carrying the measured boxes, which keeps detection
//! exact without shipping the renderer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Geometry, NodeId, Page};

/// One element of a serialized layout tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotNode {
    pub tag: String,
    /// Text directly owned by this element, before its children
    pub text: String,
    pub attrs: BTreeMap<String, String>,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
    pub natural_width: f64,
    pub natural_height: f64,
    pub children: Vec<SnapshotNode>,
}

impl Default for SnapshotNode {
    fn default() -> Self {
        Self {
            tag: String::new(),
            text: String::new(),
            attrs: BTreeMap::new(),
            width: 0.0,
            height: 0.0,
            visible: true,
            natural_width: 0.0,
            natural_height: 0.0,
            children: Vec::new(),
        }
    }
}

impl Page {
    pub fn from_snapshot(root: &SnapshotNode) -> Page {
        let mut page = Page::default();
        let mut stack = vec![Step::Open(root, None, true)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(node, parent, parent_visible) => {
                    let (id, visible) = open_snapshot(&mut page, node, parent, parent_visible);
                    page.push_text(&node.text);
                    stack.push(Step::Close(id));
                    stack.extend(
                        node.children
                            .iter()
                            .rev()
                            .map(|child| Step::Open(child, Some(id), visible)),
                    );
                }
                Step::Close(id) => page.close(id),
            }
        }
        page
    }

    pub fn from_snapshot_json(json: &str) -> crate::Result<Page> {
        let root: SnapshotNode =
            serde_json::from_str(json).map_err(crate::DetectError::InvalidSnapshot)?;
        Ok(Page::from_snapshot(&root))
    }
}

enum Step<'a> {
    Open(&'a SnapshotNode, Option<NodeId>, bool),
    Close(NodeId),
}

fn open_snapshot(
    page: &mut Page,
    node: &SnapshotNode,
    parent: Option<NodeId>,
    parent_visible: bool,
) -> (NodeId, bool) {
    let geometry = Geometry {
        width: node.width,
        height: node.height,
        visible: parent_visible && node.visible,
        natural_width: node.natural_width,
        natural_height: node.natural_height,
    };
    let attrs = node
        .attrs
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let id = page.push(parent, node.tag.to_ascii_lowercase(), attrs, geometry);
    (id, geometry.visible)
}
