//! Product image lookup and URL resolution

use tracing::warn;
use url::Url;

use super::DetectionConfig;
use crate::patterns::{self, NOT_AVAILABLE};
use crate::tree::VisualTree;

/// First image in `container` that looks like a real product picture
pub fn find_product_image<T: VisualTree>(
    tree: &T,
    container: T::Node,
    config: &DetectionConfig,
) -> Option<T::Node> {
    tree.descendants(container)
        .into_iter()
        .filter(|&node| tree.tag(node) == "img")
        .find(|&img| is_product_image(tree, img, config))
}

/// Large enough, and backed by a real, lazy, responsive or intrinsically
/// sized source.
pub fn is_product_image<T: VisualTree>(tree: &T, img: T::Node, config: &DetectionConfig) -> bool {
    let geometry = tree.geometry(img);
    if !geometry.visible
        || geometry.width <= config.min_image_size
        || geometry.height <= config.min_image_size
    {
        return false;
    }

    let attrs = tree.attributes(img);
    let direct = tree
        .attr(img, "src")
        .is_some_and(|src| !patterns::is_placeholder_src(src));
    let lazy = patterns::has_lazy_marker(&attrs);
    let responsive = tree.attr(img, "srcset").is_some_and(|s| !s.trim().is_empty());
    let intrinsic = !lazy
        && geometry.natural_width > config.min_natural_image_size
        && geometry.natural_height > config.min_natural_image_size;

    direct || lazy || responsive || intrinsic
}

/// Canonical URL of `img`, or `"N/A"`.
///
/// Preference: real `src`, lazy-load attributes, last `srcset` entry.
pub fn resolve_image_url<T: VisualTree>(tree: &T, img: T::Node, config: &DetectionConfig) -> String {
    let attrs = tree.attributes(img);

    let src = tree
        .attr(img, "src")
        .map(str::trim)
        .filter(|s| !patterns::is_placeholder_src(s));
    let resolved = src
        .or_else(|| patterns::lazy_source(&attrs))
        .or_else(|| tree.attr(img, "srcset").and_then(patterns::last_srcset_url))
        .filter(|url| !url.is_empty() && !patterns::is_data_uri(url));

    match resolved {
        Some(url) => absolutize(url, config.base_url.as_deref()),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Join `url` onto `base` when one is configured; keep it as-is otherwise
fn absolutize(url: &str, base: Option<&str>) -> String {
    let Some(base) = base else {
        return url.to_string();
    };
    match Url::parse(base).and_then(|b| b.join(url)) {
        Ok(joined) => joined.to_string(),
        Err(e) => {
            warn!(base, url, error = %e, "cannot resolve image URL against base");
            url.to_string()
        }
    }
}
