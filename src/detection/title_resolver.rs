//! Product title lookup

use super::DetectionConfig;
use crate::patterns;
use crate::tree::VisualTree;

/// First title-like node in `container` whose text reads like a product name.
///
/// A node wrapping `price` is skipped: the title has to sit next to the
/// price, not around it.
pub fn find_title<T: VisualTree>(
    tree: &T,
    container: T::Node,
    price: T::Node,
    config: &DetectionConfig,
) -> Option<T::Node> {
    tree.descendants(container)
        .into_iter()
        .filter(|&node| patterns::is_title_element(tree.tag(node), &tree.attributes(node)))
        .find(|&node| is_qualifying_title(tree, node, price, config))
}

fn is_qualifying_title<T: VisualTree>(
    tree: &T,
    node: T::Node,
    price: T::Node,
    config: &DetectionConfig,
) -> bool {
    let text = tree.text(node);
    let text = text.trim();
    let len = text.chars().count();

    (config.min_title_len..=config.max_title_len).contains(&len)
        && !tree.contains(node, price)
        && !patterns::is_price_text(text)
        && !patterns::is_purely_numeric(text)
        && !patterns::is_review_text(text)
        && tree.geometry(node).is_rendered()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{LayoutOptions, Page};

    fn title_text(html: &str) -> Option<String> {
        let page = Page::from_html(html, &LayoutOptions::default());
        let container = page.find_by_id("c").unwrap();
        let price = page.find_by_id("price").unwrap();
        find_title(&page, container, price, &DetectionConfig::default())
            .map(|n| page.text(n).trim().to_string())
    }

    #[test]
    fn test_rejected_titles_are_skipped() {
        let html = r#"
        <div id="c">
            <h4>New</h4>
            <h3>$24.99</h3>
            <h3>1,299.00</h3>
            <h3>Rated 4.8 by 200 buyers</h3>
            <h3 style="display:none">Hidden Product Name</h3>
            <div class="product-title">Noise Cancelling Headphones</div>
            <span id="price">$199.00</span>
        </div>
        "#;
        assert_eq!(title_text(html).as_deref(), Some("Noise Cancelling Headphones"));
    }

    #[test]
    fn test_wrapper_around_price_is_not_a_title() {
        let html = r#"
        <div id="c">
            <a href="/chair">Ergonomic Office Chair <span id="price" data-price="249">Ask us</span></a>
        </div>
        "#;
        assert_eq!(title_text(html), None);

        let html = r#"
        <div id="c">
            <a href="/chair">Ergonomic Office Chair <span id="price" data-price="249">Ask us</span></a>
            <span itemprop="name">Ergonomic Office Chair</span>
        </div>
        "#;
        assert_eq!(title_text(html).as_deref(), Some("Ergonomic Office Chair"));
    }

    #[test]
    fn test_title_length_limits() {
        let long = "x".repeat(201);
        let html = format!(
            r#"<div id="c"><h2>{long}</h2><h2>Desk Lamp</h2><span id="price">$9.99</span></div>"#
        );
        assert_eq!(title_text(&html).as_deref(), Some("Desk Lamp"));
    }
}
