//! Section capture from raw page text.
//!
//! Headings come from the layout pass, but bodies are taken from the plain
//! page text: for each heading, capture opens on the first raw line that
//! marks the heading and closes on the first line that marks the next one.

use crate::model::{Heading, Section};

use super::config::LayoutHeuristicsConfig;

/// Decides whether a raw text line marks a given heading.
///
/// Used both to open a capture window (current heading) and to close it
/// (next heading).
pub trait BoundaryMatcher: Send + Sync {
    /// Check whether `line` marks the heading titled `title`.
    fn matches(&self, line: &str, title: &str) -> bool;
}

/// Case-insensitive containment of the first `window` characters of the title.
///
/// Titles sharing their first `window` characters ("Chapter One: Arrival",
/// "Chapter One: Departure") are indistinguishable and can open or close a
/// window at the wrong place. Widen the window for such documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatcher {
    window: usize,
}

impl PrefixMatcher {
    /// Create a matcher using the first `window` characters of each title.
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Default for PrefixMatcher {
    fn default() -> Self {
        Self::new(LayoutHeuristicsConfig::default().title_match_chars)
    }
}

impl BoundaryMatcher for PrefixMatcher {
    fn matches(&self, line: &str, title: &str) -> bool {
        let prefix = title
            .chars()
            .take(self.window)
            .collect::<String>()
            .to_lowercase();
        line.to_lowercase().contains(&prefix)
    }
}

/// Case-insensitive containment of the whole title, whitespace-normalized.
///
/// Headings merged from wrapped lines never appear on a single raw line, so
/// this matcher misses them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullTitleMatcher;

impl BoundaryMatcher for FullTitleMatcher {
    fn matches(&self, line: &str, title: &str) -> bool {
        let title = normalize(title);
        !title.is_empty() && normalize(line).contains(&title)
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Captures section bodies between consecutive headings.
pub struct SectionExtractor {
    min_body_chars: usize,
    matcher: Box<dyn BoundaryMatcher>,
}

impl SectionExtractor {
    /// Create an extractor using a [`PrefixMatcher`] sized from the config.
    pub fn new(config: &LayoutHeuristicsConfig) -> Self {
        Self {
            min_body_chars: config.min_body_chars,
            matcher: Box::new(PrefixMatcher::new(config.title_match_chars)),
        }
    }

    /// Replace the boundary matcher.
    pub fn with_matcher(mut self, matcher: impl BoundaryMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Extract sections for one document.
    ///
    /// `pages` holds the raw text of each page, page 1 first. Sections whose
    /// body is not longer than the configured minimum are dropped.
    pub fn extract(&self, document: &str, pages: &[String], headings: &[Heading]) -> Vec<Section> {
        let mut ordered: Vec<&Heading> = headings.iter().collect();
        ordered.sort_by(|a, b| {
            a.page.cmp(&b.page).then(
                a.y0.partial_cmp(&b.y0)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });

        let mut sections = Vec::new();
        for (idx, heading) in ordered.iter().enumerate() {
            let next = ordered.get(idx + 1).copied();
            let body = self.capture_body(pages, heading, next);

            if body.chars().count() > self.min_body_chars {
                sections.push(Section {
                    document: document.to_string(),
                    section_title: heading.text.clone(),
                    page_number: heading.page,
                    body,
                });
            } else {
                log::trace!(
                    "Dropping section {:?} in {} ({} body chars)",
                    heading.text,
                    document,
                    body.chars().count()
                );
            }
        }

        log::debug!(
            "Extracted {} of {} sections from {}",
            sections.len(),
            ordered.len(),
            document
        );
        sections
    }

    /// Capture the body under `heading`.
    ///
    /// Scanning starts on the heading's page. Once past that page, it stops at
    /// the end of the first page on which no window is open, so a missing
    /// closing marker cannot drag the capture through the whole document.
    fn capture_body(&self, pages: &[String], heading: &Heading, next: Option<&Heading>) -> String {
        let start = (heading.page as usize).max(1);
        let mut body_lines: Vec<&str> = Vec::new();
        let mut capturing = false;

        for page in start..=pages.len() {
            for raw in pages[page - 1].split('\n') {
                let line = raw.trim();
                if !capturing {
                    if self.matcher.matches(line, &heading.text) {
                        capturing = true;
                    }
                    continue;
                }
                if next.is_some_and(|n| self.matcher.matches(line, &n.text)) {
                    capturing = false;
                    break;
                }
                body_lines.push(line);
            }

            if !capturing && page != start {
                break;
            }
        }

        body_lines.join(" ").trim().to_string()
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new(&LayoutHeuristicsConfig::default())
    }
}

impl std::fmt::Debug for SectionExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionExtractor")
            .field("min_body_chars", &self.min_body_chars)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(text: &str, page: u32, y0: f32) -> Heading {
        Heading {
            text: text.to_string(),
            font_size: 24.0,
            y0,
            page,
        }
    }

    fn filler(words: usize, tag: &str) -> String {
        (0..words)
            .map(|i| format!("{}{}", tag, i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_prefix_matcher() {
        let matcher = PrefixMatcher::new(10);
        assert!(matcher.matches("1. INTRODUCTION TO SYSTEMS", "Introduction to Systems"));
        assert!(matcher.matches("see introducti", "Introducti"));
        assert!(!matcher.matches("Introduction", "Intro to Systems"));
        // A title shorter than the window is used whole
        assert!(matcher.matches("short one", "Short"));
    }

    #[test]
    fn test_full_title_matcher() {
        let matcher = FullTitleMatcher;
        assert!(matcher.matches("  Chapter One:   Arrival ", "chapter one: arrival"));
        assert!(!matcher.matches("Chapter One: Departure", "Chapter One: Arrival"));
        assert!(!matcher.matches("anything", "   "));
    }

    #[test]
    fn test_two_sections_on_one_page() {
        let pages = vec![format!(
            "Introduction to Systems\n{}\n{}\nConclusion and Summary\n{}",
            filler(15, "alpha"),
            filler(15, "beta"),
            filler(25, "gamma")
        )];
        let headings = vec![
            heading("Introduction to Systems", 1, 50.0),
            heading("Conclusion and Summary", 1, 400.0),
        ];

        let sections = SectionExtractor::default().extract("doc.pdf", &pages, &headings);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].section_title, "Introduction to Systems");
        assert!(sections[0].body.starts_with("alpha0"));
        assert!(sections[0].body.ends_with("beta14"));
        assert!(!sections[0].body.contains("gamma"));
        assert!(sections[1].body.starts_with("gamma0"));
        assert_eq!(sections[1].document, "doc.pdf");
    }

    #[test]
    fn test_capture_spans_pages() {
        let pages = vec![
            format!("Header\nIntroduction to Systems\n{}", filler(15, "one")),
            format!("{}\nConclusion and Summary\n{}", filler(15, "two"), filler(20, "three")),
        ];
        let headings = vec![
            heading("Introduction to Systems", 1, 50.0),
            heading("Conclusion and Summary", 2, 300.0),
        ];

        let sections = SectionExtractor::default().extract("doc.pdf", &pages, &headings);
        assert_eq!(sections.len(), 2);
        assert!(sections[0].body.contains("one14 two0"));
        assert!(sections[0].body.ends_with("two14"));
        assert!(!sections[0].body.contains("three"));
        assert_eq!(sections[1].page_number, 2);
    }

    #[test]
    fn test_last_section_runs_to_document_end() {
        // No next heading closes the window, so every later page is captured.
        let pages = vec![
            format!("Final Remarks Here\n{}", filler(30, "tail")),
            filler(30, "later"),
            filler(30, "much_later"),
        ];
        let headings = vec![heading("Final Remarks Here", 1, 50.0)];

        let sections = SectionExtractor::default().extract("doc.pdf", &pages, &headings);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].body.contains("later0"));
        assert!(sections[0].body.ends_with("much_later29"));
    }

    #[test]
    fn test_heading_not_found_yields_nothing() {
        let pages = vec![filler(50, "x"), filler(50, "y")];
        let headings = vec![heading("Missing Heading Text", 1, 10.0)];
        assert!(SectionExtractor::default()
            .extract("doc.pdf", &pages, &headings)
            .is_empty());
    }

    #[test]
    fn test_short_bodies_dropped() {
        let pages = vec![
            "Introduction to Systems\nway too short\nConclusion and Summary\nalso short".to_string(),
        ];
        let headings = vec![
            heading("Introduction to Systems", 1, 50.0),
            heading("Conclusion and Summary", 1, 400.0),
        ];
        assert!(SectionExtractor::default()
            .extract("doc.pdf", &pages, &headings)
            .is_empty());
    }

    #[test]
    fn test_no_emitted_body_is_100_chars_or_less() {
        for len in [99usize, 100, 101, 102] {
            let pages = vec![format!("Heading For Test\n{}", "z".repeat(len))];
            let headings = vec![heading("Heading For Test", 1, 10.0)];
            let sections = SectionExtractor::default().extract("doc.pdf", &pages, &headings);
            assert_eq!(sections.len(), usize::from(len > 100), "len {}", len);
            assert!(sections.iter().all(|s| s.body.chars().count() > 100));
        }
    }

    #[test]
    fn test_headings_resorted_into_reading_order() {
        let pages = vec![format!(
            "Introduction to Systems\n{}\nConclusion and Summary\n{}",
            filler(30, "a"),
            filler(30, "b")
        )];
        let headings = vec![
            heading("Conclusion and Summary", 1, 400.0),
            heading("Introduction to Systems", 1, 50.0),
        ];
        let sections = SectionExtractor::default().extract("doc.pdf", &pages, &headings);
        assert_eq!(sections[0].section_title, "Introduction to Systems");
        assert!(!sections[0].body.contains("b0"));
    }

    // ==================== Matcher Limitation Tests ====================

    #[test]
    fn test_shared_prefix_confuses_prefix_matcher() {
        let pages = vec![format!(
            "Chapter One: Arrival\n{}\nChapter One: Departure\n{}",
            filler(30, "arr"),
            filler(30, "dep")
        )];
        let headings = vec![
            heading("Chapter One: Arrival", 1, 50.0),
            heading("Chapter One: Departure", 1, 400.0),
        ];

        let prefix = SectionExtractor::default().extract("doc.pdf", &pages, &headings);
        // The departure window opens on the arrival line
        let departure = prefix
            .iter()
            .find(|s| s.section_title == "Chapter One: Departure")
            .unwrap();
        assert!(departure.body.contains("arr0"));

        let full = SectionExtractor::default()
            .with_matcher(FullTitleMatcher)
            .extract("doc.pdf", &pages, &headings);
        let departure = full
            .iter()
            .find(|s| s.section_title == "Chapter One: Departure")
            .unwrap();
        assert!(!departure.body.contains("arr0"));
        assert!(departure.body.starts_with("dep0"));
    }

    #[test]
    fn test_wider_window_separates_shared_prefix() {
        let config = LayoutHeuristicsConfig::new().with_title_match_chars(20);
        let pages = vec![format!(
            "Chapter One: Arrival\n{}\nChapter One: Departure\n{}",
            filler(30, "arr"),
            filler(30, "dep")
        )];
        let headings = vec![
            heading("Chapter One: Arrival", 1, 50.0),
            heading("Chapter One: Departure", 1, 400.0),
        ];
        let sections = SectionExtractor::new(&config).extract("doc.pdf", &pages, &headings);
        assert_eq!(sections.len(), 2);
        assert!(!sections[1].body.contains("arr0"));
    }
}
