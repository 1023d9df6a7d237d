//! Heading detection by font size clustering.
//!
//! A line is a heading candidate when its size sits close to one of the
//! largest distinct font sizes in the document. Candidates that follow each
//! other closely on the same page are merged, which recovers titles that wrap
//! onto a second visual line.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Heading, Line};

use super::config::LayoutHeuristicsConfig;

/// Selects and merges heading lines.
#[derive(Debug, Clone, Default)]
pub struct HeadingDetector {
    config: LayoutHeuristicsConfig,
}

impl HeadingDetector {
    /// Create a detector with the given thresholds.
    pub fn new(config: LayoutHeuristicsConfig) -> Self {
        Self { config }
    }

    /// Detect headings in document order.
    pub fn detect(&self, lines: &[Line]) -> Vec<Heading> {
        let candidates = self.candidates(lines);
        let headings = merge_multiline(candidates, self.config.merge_vertical_gap);
        log::debug!(
            "Detected {} headings from {} lines",
            headings.len(),
            lines.len()
        );
        headings
    }

    /// Heading candidates sorted by `(page, y0)`, before merging.
    pub fn candidates(&self, lines: &[Line]) -> Vec<Line> {
        let tiers = self.heading_tiers(lines);
        let tolerance = self.config.size_tolerance;

        let mut candidates: Vec<Line> = lines
            .iter()
            .filter(|l| l.char_len() > self.config.min_heading_chars)
            .filter(|l| tiers.iter().any(|t| (l.font_size - t).abs() < tolerance))
            .cloned()
            .collect();

        candidates.sort_by(|a, b| {
            a.page.cmp(&b.page).then(
                a.y0.partial_cmp(&b.y0)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });
        candidates
    }

    /// The heading-tier font sizes, largest first.
    pub fn heading_tiers(&self, lines: &[Line]) -> Vec<f32> {
        let mut sizes: BTreeSet<i64> = lines
            .iter()
            .filter(|l| l.char_len() > self.config.min_heading_chars)
            .map(|l| rounded_size(l.font_size))
            .collect();

        if self.config.exclude_body_cluster {
            if let Some(body) = body_size(lines) {
                let tolerance = self.config.size_tolerance;
                sizes.retain(|&s| (s - body) as f32 >= tolerance);
            }
        }

        sizes
            .iter()
            .rev()
            .take(self.config.heading_size_tiers)
            .map(|&s| s as f32)
            .collect()
    }
}

/// Most common rounded font size over all lines; the smallest wins ties.
pub fn body_size(lines: &[Line]) -> Option<i64> {
    let mut histogram: BTreeMap<i64, usize> = BTreeMap::new();
    for line in lines {
        *histogram.entry(rounded_size(line.font_size)).or_insert(0) += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    for (size, count) in histogram {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((size, count));
        }
    }
    best.map(|(size, _)| size)
}

fn rounded_size(size: f32) -> i64 {
    size.round_ties_even() as i64
}

/// Merge consecutive candidates into headings.
///
/// A candidate joins the current heading when it is on the same page and its
/// `y0` is within `gap` of the heading's own `y0`, which stays anchored at the
/// first fragment.
pub fn merge_multiline(candidates: Vec<Line>, gap: f32) -> Vec<Heading> {
    let mut headings: Vec<Heading> = Vec::new();

    for line in candidates {
        match headings.last_mut() {
            Some(current) if current.page == line.page && (line.y0 - current.y0).abs() < gap => {
                current.absorb(&line);
            }
            _ => headings.push(Heading::from(line)),
        }
    }

    headings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, size: f32, y0: f32, page: u32) -> Line {
        Line::new(text, size, y0, page)
    }

    fn detector() -> HeadingDetector {
        HeadingDetector::default()
    }

    #[test]
    fn test_only_top_cluster_qualifies() {
        let lines = vec![
            line("body text line one", 8.0, 200.0, 1),
            line("body text line two", 8.0, 212.0, 1),
            line("body text line three", 8.0, 224.0, 1),
            line("Introduction to Systems", 24.0, 100.0, 1),
            line("Conclusion and Summary", 24.0, 400.0, 1),
            line("caption under a figure", 9.0, 300.0, 1),
        ];

        let candidates = detector().candidates(&lines);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|l| (l.font_size - 24.0).abs() < 1.5));
        assert_eq!(candidates[0].text, "Introduction to Systems");
    }

    #[test]
    fn test_all_sizes_qualify_without_body_exclusion() {
        let lines = vec![
            line("body text line one", 8.0, 200.0, 1),
            line("Introduction to Systems", 24.0, 100.0, 1),
            line("caption under a figure", 9.0, 300.0, 1),
        ];
        let detector =
            HeadingDetector::new(LayoutHeuristicsConfig::new().with_body_cluster_exclusion(false));

        assert_eq!(detector.heading_tiers(&lines), vec![24.0, 9.0, 8.0]);
        assert_eq!(detector.candidates(&lines).len(), 3);
    }

    #[test]
    fn test_top_four_tiers() {
        let mut lines = Vec::new();
        for i in 0..10 {
            lines.push(line("ordinary body paragraph", 10.0, 300.0 + i as f32 * 12.0, 1));
        }
        for (i, size) in [30.0, 26.0, 22.0, 18.0, 14.0].iter().enumerate() {
            lines.push(line("A heading of some size", *size, 50.0 * i as f32, 2));
        }

        let detector = detector();
        assert_eq!(detector.heading_tiers(&lines), vec![30.0, 26.0, 22.0, 18.0]);

        let candidates = detector.candidates(&lines);
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|l| l.font_size >= 18.0));
    }

    #[test]
    fn test_short_lines_are_not_headings() {
        let lines = vec![
            line("Overview", 24.0, 50.0, 1),
            line("body text line one", 10.0, 200.0, 1),
            line("body text line two", 10.0, 212.0, 1),
        ];
        assert!(detector().candidates(&lines).is_empty());
    }

    #[test]
    fn test_candidates_sorted_by_page_then_y() {
        let lines = vec![
            line("Second page heading", 20.0, 10.0, 2),
            line("Lower first page heading", 20.0, 500.0, 1),
            line("Upper first page heading", 20.0, 40.0, 1),
            line("body text line one", 10.0, 200.0, 1),
            line("body text line two", 10.0, 220.0, 1),
            line("body text line three", 10.0, 240.0, 1),
        ];
        let texts: Vec<String> = detector()
            .candidates(&lines)
            .into_iter()
            .map(|l| l.text)
            .collect();
        assert_eq!(
            texts,
            vec![
                "Upper first page heading",
                "Lower first page heading",
                "Second page heading"
            ]
        );
    }

    #[test]
    fn test_body_size_prefers_smallest_on_tie() {
        let lines = vec![
            line("a", 12.0, 0.0, 1),
            line("b", 10.0, 0.0, 1),
            line("c", 12.0, 0.0, 1),
            line("d", 10.0, 0.0, 1),
        ];
        assert_eq!(body_size(&lines), Some(10));
        assert_eq!(body_size(&[]), None);
    }

    // ==================== Merge Tests ====================

    #[test]
    fn test_merge_gap_15() {
        let merged = merge_multiline(
            vec![
                line("Planning a Trip to", 24.0, 100.0, 1),
                line("the South of France", 24.0, 115.0, 1),
            ],
            20.0,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Planning a Trip to the South of France");
        assert_eq!(merged[0].y0, 100.0);
    }

    #[test]
    fn test_no_merge_gap_25() {
        let merged = merge_multiline(
            vec![
                line("Planning a Trip to", 24.0, 100.0, 1),
                line("the South of France", 24.0, 125.0, 1),
            ],
            20.0,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_measures_from_group_start() {
        let merged = merge_multiline(
            vec![
                line("First fragment", 24.0, 100.0, 1),
                line("second fragment", 24.0, 115.0, 1),
                line("third fragment", 24.0, 130.0, 1),
            ],
            20.0,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "First fragment second fragment");
        assert_eq!(merged[1].text, "third fragment");
        assert_eq!(merged[1].y0, 130.0);
    }

    #[test]
    fn test_no_merge_across_pages() {
        let merged = merge_multiline(
            vec![
                line("Bottom of page one", 24.0, 780.0, 1),
                line("Top of page two here", 24.0, 775.0, 2),
            ],
            20.0,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_detect_end_to_end() {
        let lines = vec![
            line("Comprehensive Guide to", 24.0, 100.0, 1),
            line("Major Cities in the South", 24.0, 118.0, 1),
            line("body text line one", 11.0, 200.0, 1),
            line("body text line two", 11.0, 212.0, 1),
            line("body text line three", 11.0, 224.0, 1),
            line("Nice: The Jewel of the Riviera", 24.0, 50.0, 2),
        ];
        let headings = detector().detect(&lines);
        assert_eq!(headings.len(), 2);
        assert_eq!(
            headings[0].text,
            "Comprehensive Guide to Major Cities in the South"
        );
        assert_eq!(headings[1].page, 2);
    }

    #[test]
    fn test_detect_empty() {
        assert!(detector().detect(&[]).is_empty());
    }
}
