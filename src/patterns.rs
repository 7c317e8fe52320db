//! Pattern tables for price, review and title classification
//!
//! Everything here is a pure predicate over text or attributes. Update the
//! tables when a family of sites slips through; add a test case alongside.

use regex::Regex;
use std::sync::LazyLock;

/// Sentinel returned when no image URL can be resolved
pub const NOT_AVAILABLE: &str = "N/A";

/// Elements whose text is scanned for prices
pub const SCANNED_TAGS: &[&str] = &[
    "span", "div", "p", "strong", "b", "em", "i", "ins", "small", "label", "bdi", "td", "li",
    "dd", "font", "sup",
];

/// Attributes that mark a node as a price even when its text does not look like one
pub const PRICE_ATTRIBUTES: &[&str] = &[
    "data-price",
    "data-price-amount",
    "data-product-price",
    "data-sale-price",
];

/// `itemprop` values that carry a price
const PRICE_ITEMPROPS: &[&str] = &["price", "lowprice", "highprice"];

/// Substrings of class/id/attribute names that mark review or rating blocks
pub const REVIEW_CONTAINER_TOKENS: &[&str] = &["review", "rating", "score", "stars"];

/// Attributes that carry a rating or review value on the node itself
pub const REVIEW_VALUE_ATTRIBUTES: &[&str] = &[
    "data-rating",
    "data-rating-value",
    "data-score",
    "data-stars",
    "data-review-count",
    "data-reviews",
];

/// `itemprop` values used by schema.org ratings
const REVIEW_ITEMPROPS: &[&str] = &[
    "ratingvalue",
    "reviewcount",
    "ratingcount",
    "bestrating",
    "worstrating",
];

/// Lazy-load source attributes, in order of preference
pub const LAZY_SRC_ATTRIBUTES: &[&str] = &[
    "data-src",
    "data-lazy-src",
    "data-original",
    "data-lazy",
    "data-url",
];

/// Lazy-load source-set attributes
const LAZY_SRCSET_ATTRIBUTES: &[&str] = &["data-srcset", "data-lazy-srcset"];

/// Known blank/tracking image markers
const PLACEHOLDER_MARKERS: &[&str] = &[
    "blank.gif",
    "blank.png",
    "spacer.gif",
    "pixel.gif",
    "transparent.gif",
    "transparent.png",
    "placeholder",
    "1x1",
    "grey.gif",
];

/// Class substrings used for product titles
const TITLE_CLASS_TOKENS: &[&str] = &[
    "title",
    "product-name",
    "productname",
    "product_name",
    "item-name",
];

const CURRENCY_SYMBOLS: &str = "$€£¥₹₩₽₺₪₫฿₱";
const CURRENCY_CODES: &str =
    "USD|EUR|GBP|JPY|CAD|AUD|CHF|CNY|INR|SEK|NOK|DKK|PLN|CZK|HUF|BRL|MXN|KRW|RUB|TRY|ZAR|NZD|HKD|SGD";
const AMOUNT: &str = r"\d{1,3}(?:[.,\s]?\d{3})*(?:[.,]\d{1,2})?";

/// Currency before the amount: `$12.99`, `$1,299.00 incl. VAT`, `EUR 1.234,56`.
/// Anchored at the start. A symbol may be followed by trailing text, an ISO
/// code may not, so `Try 5 colours` is not Turkish lira.
static PRICE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:[{CURRENCY_SYMBOLS}]\s?{AMOUNT}\b|(?:{CURRENCY_CODES})\s?{AMOUNT}$)"
    ))
    .unwrap()
});

/// Currency after the amount: `19,99 €`, `1.234,56 EUR`. Whole string.
static PRICE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^{AMOUNT}\s?(?:[{CURRENCY_SYMBOLS}]|{CURRENCY_CODES}|kr|zł|kč|lei)$"
    ))
    .unwrap()
});

static REVIEW_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:stars?|ratings?|rated|reviews?|avis|étoiles?|sterne|bewertung(?:en)?|estrellas?|reseñas?|opiniones|recensioni|valutazioni?|beoordelingen)\b|\b(?:out\s+of|sur|from|von|van)\s+\d",
    )
    .unwrap()
});

/// `4.5/5`, `9 / 10`
static RATIO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:[.,]\d+)?\s*/\s*\d+\b").unwrap());

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\d\s.,]+$").unwrap());

/// Text shaped like a price in prefix or suffix form
pub fn is_price_text(text: &str) -> bool {
    let text = text.trim();
    PRICE_PREFIX_RE.is_match(text) || PRICE_SUFFIX_RE.is_match(text)
}

/// Text that talks about ratings or reviews, or looks like a score ratio
pub fn is_review_text(text: &str) -> bool {
    REVIEW_KEYWORD_RE.is_match(text) || RATIO_RE.is_match(text)
}

pub fn is_purely_numeric(text: &str) -> bool {
    NUMERIC_RE.is_match(text.trim())
}

pub fn is_data_uri(src: &str) -> bool {
    src.trim_start()
        .get(..5)
        .is_some_and(|p| p.eq_ignore_ascii_case("data:"))
}

/// Empty, data-URI or known blank images
pub fn is_placeholder_src(src: &str) -> bool {
    let src = src.trim();
    if src.is_empty() || is_data_uri(src) {
        return true;
    }
    let lower = src.to_ascii_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m))
}

/// URL of the last candidate in a `srcset` value
pub fn last_srcset_url(srcset: &str) -> Option<&str> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .last()
}

fn attr_value<'a>(attrs: &[(&str, &'a str)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| *v)
}

fn has_attr(attrs: &[(&str, &str)], name: &str) -> bool {
    attr_value(attrs, name).is_some()
}

fn itemprop_in(attrs: &[(&str, &str)], values: &[&str]) -> bool {
    attr_value(attrs, "itemprop")
        .map(|v| {
            v.split_whitespace()
                .any(|p| values.contains(&p.to_ascii_lowercase().as_str()))
        })
        .unwrap_or(false)
}

pub fn carries_price_attribute(attrs: &[(&str, &str)]) -> bool {
    PRICE_ATTRIBUTES.iter().any(|a| has_attr(attrs, a)) || itemprop_in(attrs, PRICE_ITEMPROPS)
}

pub fn carries_review_value(attrs: &[(&str, &str)]) -> bool {
    REVIEW_VALUE_ATTRIBUTES.iter().any(|a| has_attr(attrs, a))
        || itemprop_in(attrs, REVIEW_ITEMPROPS)
}

/// Whether an element looks like a review/rating block, judged from its
/// attribute names and its class, id and itemprop values
pub fn marks_review_container(attrs: &[(&str, &str)]) -> bool {
    attrs.iter().any(|(name, value)| {
        let name = name.to_ascii_lowercase();
        let contains_token = |s: &str| REVIEW_CONTAINER_TOKENS.iter().any(|t| s.contains(t));

        if contains_token(&name) {
            return true;
        }
        match name.as_str() {
            "class" | "id" | "itemprop" | "itemtype" => contains_token(&value.to_ascii_lowercase()),
            _ => false,
        }
    })
}

/// Element kinds scanned for prices
pub fn is_scanned_element(tag: &str, attrs: &[(&str, &str)]) -> bool {
    SCANNED_TAGS.contains(&tag) || carries_price_attribute(attrs)
}

/// Headings, heading roles, name properties, anchors and title-like classes
pub fn is_title_element(tag: &str, attrs: &[(&str, &str)]) -> bool {
    if matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "a") {
        return true;
    }
    if attr_value(attrs, "role").is_some_and(|r| r.eq_ignore_ascii_case("heading")) {
        return true;
    }
    if itemprop_in(attrs, &["name"]) {
        return true;
    }
    attr_value(attrs, "class")
        .map(|c| {
            let c = c.to_ascii_lowercase();
            TITLE_CLASS_TOKENS.iter().any(|t| c.contains(t))
        })
        .unwrap_or(false)
}

/// A lazy-load source attribute or `loading="lazy"`
pub fn has_lazy_marker(attrs: &[(&str, &str)]) -> bool {
    LAZY_SRC_ATTRIBUTES
        .iter()
        .chain(LAZY_SRCSET_ATTRIBUTES)
        .any(|a| has_attr(attrs, a))
        || attr_value(attrs, "loading").is_some_and(|v| v.eq_ignore_ascii_case("lazy"))
}

/// First non-empty lazy-load source, then the last entry of a lazy source set
pub fn lazy_source<'a>(attrs: &[(&str, &'a str)]) -> Option<&'a str> {
    LAZY_SRC_ATTRIBUTES
        .iter()
        .filter_map(|a| attr_value(attrs, a))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .or_else(|| {
            LAZY_SRCSET_ATTRIBUTES
                .iter()
                .filter_map(|a| attr_value(attrs, a))
                .find_map(last_srcset_url)
        })
}

/// Collapse runs of whitespace into single spaces and trim
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_text() {
        assert!(is_price_text("$12.99"));
        assert!(is_price_text("19,99 €"));
        assert!(is_price_text("1.234,56 EUR"));
        assert!(is_price_text("£5"));
        assert!(is_price_text("EUR 49,00"));
        assert!(is_price_text("1 234 kr"));
        assert!(is_price_text("$1,299.00 incl. VAT"));

        assert!(!is_price_text("12.99"));
        assert!(!is_price_text("Now only $1,299.00"));
        assert!(!is_price_text("Wireless Mouse$19.99"));
        assert!(!is_price_text("Only 19,99 € today"));
        assert!(!is_price_text("Wireless Mouse"));
        assert!(!is_price_text("4.5 out of 5 stars"));
    }

    #[test]
    fn test_currency_codes_ignore_case() {
        assert!(is_price_text("19,99 eur"));
        assert!(is_price_text("usd 5.00"));
        assert!(is_price_text("1.234,56 Eur"));

        assert!(!is_price_text("Try 5 colours"));
        assert!(!is_price_text("usda 5"));
        assert!(!is_price_text("19,99 euros off"));
    }

    #[test]
    fn test_review_text() {
        assert!(is_review_text("4.5 out of 5 stars"));
        assert!(is_review_text("4.5/5"));
        assert!(is_review_text("4,2 sur 5"));
        assert!(is_review_text("128 Reviews"));
        assert!(is_review_text("Rated 4 from 5"));
        assert!(is_review_text("5 étoiles"));

        assert!(!is_review_text("$19.99"));
        assert!(!is_review_text("Wireless Mouse"));
        assert!(!is_review_text("From $19.99"));
    }

    #[test]
    fn test_numeric_and_placeholders() {
        assert!(is_purely_numeric(" 1,234.56 "));
        assert!(!is_purely_numeric("Model 42"));

        assert!(is_placeholder_src(""));
        assert!(is_placeholder_src("data:image/gif;base64,R0lGOD"));
        assert!(is_placeholder_src("/static/blank.gif"));
        assert!(is_placeholder_src("https://cdn.example.com/img/Placeholder.png"));
        assert!(!is_placeholder_src("a.jpg"));
    }

    #[test]
    fn test_srcset_last_entry() {
        assert_eq!(
            last_srcset_url("small.jpg 320w, medium.jpg 640w, large.jpg 1280w"),
            Some("large.jpg")
        );
        assert_eq!(last_srcset_url("only.jpg"), Some("only.jpg"));
        assert_eq!(last_srcset_url("  "), None);
    }

    #[test]
    fn test_attribute_tables() {
        assert!(carries_price_attribute(&[("itemprop", "price")]));
        assert!(carries_price_attribute(&[("data-price", "19.99")]));
        assert!(!carries_price_attribute(&[("class", "price")]));

        assert!(carries_review_value(&[("itemprop", "ratingValue")]));
        assert!(carries_review_value(&[("data-rating", "4")]));

        assert!(marks_review_container(&[("class", "product-reviews")]));
        assert!(marks_review_container(&[("id", "ScoreBox")]));
        assert!(marks_review_container(&[("data-review-id", "7")]));
        assert!(marks_review_container(&[("itemprop", "aggregateRating")]));
        assert!(!marks_review_container(&[("class", "product-card"), ("href", "/reviews")]));
    }

    #[test]
    fn test_title_elements() {
        assert!(is_title_element("h2", &[]));
        assert!(is_title_element("a", &[]));
        assert!(is_title_element("div", &[("role", "heading")]));
        assert!(is_title_element("span", &[("itemprop", "name")]));
        assert!(is_title_element("div", &[("class", "card__Title")]));
        assert!(!is_title_element("div", &[("class", "card")]));
    }

    #[test]
    fn test_lazy_sources() {
        let attrs = [("data-lazy-src", "b.jpg"), ("data-original", "c.jpg")];
        assert!(has_lazy_marker(&attrs));
        assert_eq!(lazy_source(&attrs), Some("b.jpg"));

        let attrs = [("data-srcset", "s.jpg 1x, l.jpg 2x")];
        assert_eq!(lazy_source(&attrs), Some("l.jpg"));

        assert!(has_lazy_marker(&[("loading", "LAZY")]));
        assert!(!has_lazy_marker(&[("src", "a.jpg")]));
        assert_eq!(lazy_source(&[("loading", "lazy")]), None);
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Wireless \n   Mouse "), "Wireless Mouse");
    }
}
