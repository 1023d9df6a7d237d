//! Layout-based structure recovery.
//!
//! PDFs carry no explicit structure, so sections are recovered from font size,
//! vertical position and page number alone:
//!
//! 1. [`LineAssembler`] groups positioned words into visual lines.
//! 2. [`HeadingDetector`] picks heading lines by font-size clustering and
//!    merges wrapped titles.
//! 3. [`SectionExtractor`] captures the raw page text between consecutive
//!    headings.
//!
//! [`StructureRecovery`] runs all three over an [`ExtractedDocument`].

mod config;
mod headings;
mod lines;
mod sections;

pub use config::LayoutHeuristicsConfig;
pub use headings::{body_size, merge_multiline, HeadingDetector};
pub use lines::{clean_line, LineAssembler};
pub use sections::{BoundaryMatcher, FullTitleMatcher, PrefixMatcher, SectionExtractor};

use crate::model::{Heading, Section};
use crate::source::ExtractedDocument;

/// Words to lines to headings to sections, for one document at a time.
#[derive(Debug)]
pub struct StructureRecovery {
    assembler: LineAssembler,
    detector: HeadingDetector,
    extractor: SectionExtractor,
}

impl StructureRecovery {
    /// Create the stages from one set of thresholds.
    pub fn new(config: &LayoutHeuristicsConfig) -> Self {
        Self {
            assembler: LineAssembler::from_config(config),
            detector: HeadingDetector::new(config.clone()),
            extractor: SectionExtractor::new(config),
        }
    }

    /// Replace the section boundary matcher.
    pub fn with_matcher(mut self, matcher: impl BoundaryMatcher + 'static) -> Self {
        self.extractor = self.extractor.with_matcher(matcher);
        self
    }

    /// Detect the headings of a document, in reading order.
    pub fn headings(&self, document: &ExtractedDocument) -> Vec<Heading> {
        let lines = self.assembler.assemble(&document.words());
        self.detector.detect(&lines)
    }

    /// Recover the sections of a document.
    ///
    /// `name` is recorded as the section's document (the input filename).
    pub fn sections(&self, document: &ExtractedDocument, name: &str) -> Vec<Section> {
        let headings = self.headings(document);
        if headings.is_empty() {
            return Vec::new();
        }
        self.extractor.extract(name, &document.page_texts(), &headings)
    }
}

impl Default for StructureRecovery {
    fn default() -> Self {
        Self::new(&LayoutHeuristicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WordToken;
    use crate::source::PageContent;

    fn page(number: u32, rows: &[(&str, f32, f32)]) -> PageContent {
        let mut words = Vec::new();
        let mut text = String::new();
        for (line, size, top) in rows {
            let mut x = 72.0;
            for w in line.split_whitespace() {
                words.push(WordToken::new(w, number, x, *top, *size));
                x += (w.chars().count() as f32 + 1.0) * size * 0.5;
            }
            text.push_str(line);
            text.push('\n');
        }
        PageContent::new(text, words)
    }

    #[test]
    fn test_sections_from_document() {
        let body = "The quick brown fox jumps over the lazy dog near the river bank";
        let doc = ExtractedDocument::new(vec![
            page(
                1,
                &[
                    ("Getting Started Guide", 22.0, 60.0),
                    (body, 10.0, 100.0),
                    (body, 10.0, 114.0),
                    (body, 10.0, 128.0),
                ],
            ),
            page(
                2,
                &[
                    ("Advanced Configuration", 22.0, 60.0),
                    (body, 10.0, 100.0),
                    (body, 10.0, 114.0),
                ],
            ),
        ]);

        let recovery = StructureRecovery::default();
        let headings = recovery.headings(&doc);
        assert_eq!(headings.len(), 2);

        let sections = recovery.sections(&doc, "guide.pdf");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].section_title, "Getting Started Guide");
        assert_eq!(sections[0].page_number, 1);
        assert_eq!(sections[1].section_title, "Advanced Configuration");
        assert_eq!(sections[1].page_number, 2);
        assert!(sections.iter().all(|s| s.document == "guide.pdf"));
    }

    #[test]
    fn test_document_without_text() {
        let doc = ExtractedDocument::new(vec![PageContent::default(), PageContent::default()]);
        assert!(StructureRecovery::default().sections(&doc, "blank.pdf").is_empty());
    }
}
