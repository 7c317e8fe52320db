//! Container climbing
//!
//! From a price candidate, walk up the ancestor chain and stop at the first
//! unclaimed, reasonably sized box that holds both a product image and a
//! title. The innermost match wins; larger ancestors are never compared.

use tracing::{debug, trace};

use super::{find_product_image, find_title, ClaimedSet, DetectionConfig};
use crate::tree::{Geometry, VisualTree};

/// A box chosen for a price candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerMatch<N> {
    pub container: N,
    pub image: N,
    pub title: N,
}

pub fn climb_for_container<T: VisualTree>(
    tree: &T,
    candidate: T::Node,
    claimed: &ClaimedSet<T::Node>,
    config: &DetectionConfig,
) -> Option<ContainerMatch<T::Node>> {
    for (step, ancestor) in tree.ancestors(candidate).take(config.max_climb_levels).enumerate() {
        if claimed.contains(ancestor) {
            trace!(step, ?ancestor, "already claimed");
            continue;
        }
        if !within_bounds(&tree.geometry(ancestor), config) {
            continue;
        }

        let Some(image) = find_product_image(tree, ancestor, config) else {
            continue;
        };
        let Some(title) = find_title(tree, ancestor, candidate, config) else {
            continue;
        };

        debug!(step, ?candidate, ?ancestor, "container found");
        return Some(ContainerMatch {
            container: ancestor,
            image,
            title,
        });
    }

    trace!(?candidate, "no container within climb bound");
    None
}

/// Size bounds for a product box, inclusive on both ends
pub fn within_bounds(geometry: &Geometry, config: &DetectionConfig) -> bool {
    (config.container_min_width..=config.container_max_width).contains(&geometry.width)
        && (config.container_min_height..=config.container_max_height).contains(&geometry.height)
}
