//! Plain-text product report

use std::fmt::Write;

use crate::detection::ProductRecord;

/// Suggested file name when the host offers the report as a download
pub const REPORT_FILE_NAME: &str = "products.txt";

/// Render records as `Title:` / `Image:` / `Price:` blocks separated by a
/// blank line
pub fn format_report(records: &[ProductRecord]) -> String {
    let mut out = String::new();
    for record in records {
        // Writing into a String cannot fail
        let _ = writeln!(out, "Title: {}", record.title);
        let _ = writeln!(out, "Image: {}", record.image_url);
        let _ = writeln!(out, "Price: {}", record.price);
        out.push('\n');
    }
    out
}
