//! Plain text rendering of detected headings.

use crate::model::Heading;

/// Render headings as an indented outline, one per line.
///
/// Larger headings are indented less. Each line ends with the page number.
pub fn to_outline(headings: &[Heading]) -> String {
    let mut sizes: Vec<i64> = headings
        .iter()
        .map(|h| h.font_size.round() as i64)
        .collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes.dedup();

    let mut output = String::new();
    for heading in headings {
        let level = sizes
            .iter()
            .position(|&s| s == heading.font_size.round() as i64)
            .unwrap_or(0);
        output.push_str(&"  ".repeat(level));
        output.push_str(&heading.text);
        output.push_str(&format!(" (p. {})\n", heading.page));
    }

    output
}
