//! Product detection over a rendered page
//!
//! A pass runs four stages per price candidate:
//! - `price_scanner` finds price-shaped nodes outside review blocks
//! - `container_climber` walks up to the smallest box holding an image and a title
//! - `image_resolver` / `title_resolver` judge what is inside that box
//! - `record_builder` claims the box and emits the record
//!
//! Claims made by earlier candidates are visible to later ones, so the
//! order of candidates matters and the pass is strictly sequential.

mod container_climber;
mod image_resolver;
mod price_scanner;
mod record_builder;
mod title_resolver;

pub use container_climber::*;
pub use image_resolver::*;
pub use price_scanner::*;
pub use record_builder::*;
pub use title_resolver::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tree::{LayoutOptions, VisualTree};

/// Request sent by the host alongside the document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionRequest {
    pub config: DetectionConfig,
    pub layout: LayoutOptions,
}

/// Thresholds for a detection pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionConfig {
    /// Longest trimmed text (in chars) still considered a price
    pub max_price_text_len: usize,
    /// Ancestors inspected for review/rating markers above a price
    pub review_ancestor_depth: usize,
    /// Ancestors tried as containers, starting at the parent
    pub max_climb_levels: usize,
    pub container_min_width: f64,
    pub container_max_width: f64,
    pub container_min_height: f64,
    pub container_max_height: f64,
    /// Rendered width and height an image must exceed
    pub min_image_size: f64,
    /// Intrinsic width and height an eagerly loaded image must exceed
    pub min_natural_image_size: f64,
    pub min_title_len: usize,
    pub max_title_len: usize,
    /// Base for resolving relative image URLs
    pub base_url: Option<String>,
    /// Ignore prices already highlighted by an earlier pass
    pub skip_highlighted: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_price_text_len: 50,
            review_ancestor_depth: 6,
            max_climb_levels: 10,
            container_min_width: 100.0,
            container_max_width: 1000.0,
            container_min_height: 100.0,
            container_max_height: 1500.0,
            min_image_size: 60.0,
            min_natural_image_size: 50.0,
            min_title_len: 5,
            max_title_len: 200,
            base_url: None,
            skip_highlighted: false,
        }
    }
}

/// One detected product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub title: String,
    pub price: String,
    /// Resolved image URL or `"N/A"`
    pub image_url: String,
}

/// Outcome reported to whoever triggered the pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassStatus {
    Success { count: usize },
    NoProducts,
    Error { message: String },
}

impl PassStatus {
    pub fn from_records(records: &[ProductRecord]) -> Self {
        if records.is_empty() {
            PassStatus::NoProducts
        } else {
            PassStatus::Success {
                count: records.len(),
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            PassStatus::Success { count } => format!("Found {} products", count),
            PassStatus::NoProducts => "No products found on this page".to_string(),
            PassStatus::Error { message } => format!("Error: {}", message),
        }
    }
}

/// Everything a pass produces
#[derive(Debug, Clone)]
pub struct DetectionOutcome<N> {
    pub records: Vec<ProductRecord>,
    pub status: PassStatus,
    pub highlights: HighlightLog<N>,
}

/// Run a detection pass, sending highlight requests to `highlighter`.
///
/// Records come out in the document order of their price nodes.
pub fn detect_products<T, H>(tree: &T, config: &DetectionConfig, highlighter: &mut H) -> Vec<ProductRecord>
where
    T: VisualTree,
    H: HighlightSink<T::Node>,
{
    let candidates = scan_price_candidates(tree, config);
    let mut claimed = ClaimedSet::new();
    let mut records = Vec::new();

    for candidate in &candidates {
        if let Some(found) = climb_for_container(tree, *candidate, &claimed, config) {
            records.push(build_record(tree, *candidate, &found, &mut claimed, config, highlighter));
        }
    }

    debug!(
        candidates = candidates.len(),
        records = records.len(),
        "detection pass finished"
    );
    records
}

/// Run a pass and collect records, status and highlight requests
pub fn run_pass<T: VisualTree>(tree: &T, config: &DetectionConfig) -> DetectionOutcome<T::Node> {
    let mut highlights = HighlightLog::default();
    let records = detect_products(tree, config, &mut highlights);
    let status = PassStatus::from_records(&records);
    DetectionOutcome {
        records,
        status,
        highlights,
    }
}
