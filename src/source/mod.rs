//! PDF text sources.
//!
//! The layout stages only need two things per page: the plain text in reading
//! order and the positioned words. [`PdfTextSource`] is the seam that
//! provides them; [`LopdfTextSource`] is the implementation over `lopdf`.

pub mod detect;
mod lopdf_source;

pub use detect::{is_pdf, parse_header, sniff_header, PdfHeader};
pub use lopdf_source::LopdfTextSource;

use std::path::Path;

use crate::error::Result;
use crate::model::WordToken;

/// Produces page text and positioned words from a PDF file.
pub trait PdfTextSource: Send + Sync {
    /// Extract every page of the document at `path`, page 1 first.
    fn extract(&self, path: &Path) -> Result<ExtractedDocument>;
}

/// Text content of a single page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    /// Plain text, one visual line per `\n`
    pub text: String,

    /// Positioned words on the page
    pub words: Vec<WordToken>,
}

impl PageContent {
    /// Create page content from text and words.
    pub fn new(text: impl Into<String>, words: Vec<WordToken>) -> Self {
        Self {
            text: text.into(),
            words,
        }
    }

    /// Check if the page has no text at all.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.words.is_empty()
    }
}

/// All pages of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDocument {
    pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Create a document from pages in page order.
    pub fn new(pages: Vec<PageContent>) -> Self {
        Self { pages }
    }

    /// Pages in order.
    pub fn pages(&self) -> &[PageContent] {
        &self.pages
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Plain text of each page.
    pub fn page_texts(&self) -> Vec<String> {
        self.pages.iter().map(|p| p.text.clone()).collect()
    }

    /// Words of every page, in page order.
    pub fn words(&self) -> Vec<WordToken> {
        self.pages
            .iter()
            .flat_map(|p| p.words.iter().cloned())
            .collect()
    }

    /// Check if no page carries any text.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(PageContent::is_empty)
    }
}

impl<S: PdfTextSource + ?Sized> PdfTextSource for &S {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        (**self).extract(path)
    }
}

impl<S: PdfTextSource + ?Sized> PdfTextSource for Box<S> {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        (**self).extract(path)
    }
}
