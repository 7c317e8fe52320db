//! Product detection for arbitrary rendered pages
//!
//! Finds `{title, price, image}` records on pages with unknown markup by
//! pairing a price-shaped text node with a large image and a title inside
//! the smallest reasonably sized box around it, while skipping ratings and
//! reviews that look like prices.
//!
//! Provides:
//! - a [`VisualTree`] abstraction with an owned [`Page`] built from HTML or a layout snapshot
//! - the detection pass ([`run_pass`], [`detect_products`])
//! - a plain-text report ([`format_report`])
//! - a C ABI for hosts that own the document

pub mod detection;
pub mod error;
pub mod ffi;
pub mod patterns;
pub mod report;
pub mod tree;

pub use detection::*;
pub use error::{DetectError, Result};
pub use ffi::*;
pub use report::*;
pub use tree::*;
