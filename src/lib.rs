//! # sectrank
//!
//! Persona-driven section extraction, ranking and summarization for
//! collections of PDF documents.
//!
//! PDFs carry no explicit structure, so sections are recovered from layout
//! alone: words are grouped into lines, the largest font sizes mark headings,
//! and the text between consecutive headings becomes a section body. Sections
//! pooled across a collection are ranked by TF-IDF similarity to the persona
//! and task, and the best ones get an extractive summary.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sectrank::Sectrank;
//!
//! fn main() -> sectrank::Result<()> {
//!     let report = Sectrank::new().with_top_k(5).run_batch(".")?;
//!     println!(
//!         "{} processed, {} failed",
//!         report.processed(),
//!         report.failed()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Collection layout
//!
//! ```text
//! <collection>/
//!     challenge1b_input.json    documents, persona and task
//!     PDFs/                     the documents
//!     challenge1b_output.json   written by the pipeline
//! ```

pub mod error;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use layout::{
    BoundaryMatcher, FullTitleMatcher, HeadingDetector, LayoutHeuristicsConfig, LineAssembler,
    PrefixMatcher, SectionExtractor, StructureRecovery,
};
pub use model::{
    CollectionInput, CollectionOutput, Heading, Line, OutputMetadata, RankedExtract, Section,
    SubsectionSummary, WordToken,
};
pub use pipeline::{BatchReport, CollectionOutcome, CollectionPipeline, ErrorMode, PipelineOptions};
pub use rank::{fit_and_score, RelevanceRanker, Summarizer};
pub use render::{to_json, JsonFormat};
pub use source::{ExtractedDocument, LopdfTextSource, PageContent, PdfTextSource};

use std::path::Path;

/// Recover the sections of a PDF file with default thresholds.
///
/// The file name is recorded as each section's document.
///
/// # Example
///
/// ```no_run
/// use sectrank::extract_sections;
///
/// for section in extract_sections("guide.pdf")? {
///     println!("p.{} {}", section.page_number, section.section_title);
/// }
/// # Ok::<(), sectrank::Error>(())
/// ```
pub fn extract_sections<P: AsRef<Path>>(path: P) -> Result<Vec<Section>> {
    let path = path.as_ref();
    let document = LopdfTextSource::new().extract(path)?;
    Ok(StructureRecovery::default().sections(&document, &file_name(path)))
}

/// Detect the headings of a PDF file with default thresholds.
pub fn detect_headings<P: AsRef<Path>>(path: P) -> Result<Vec<Heading>> {
    let document = LopdfTextSource::new().extract(path.as_ref())?;
    Ok(StructureRecovery::default().headings(&document))
}

/// Process one collection directory with default options.
///
/// Returns `None` when the directory is not a collection.
pub fn process_collection<P: AsRef<Path>>(dir: P) -> Result<Option<CollectionOutput>> {
    CollectionPipeline::new(PipelineOptions::default())?.process_collection(dir.as_ref())
}

/// Process every collection under `root` with default options.
pub fn run_batch<P: AsRef<Path>>(root: P) -> Result<BatchReport> {
    CollectionPipeline::new(PipelineOptions::default())?.run_batch(root.as_ref())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Builder for configuring and running the collection pipeline.
///
/// # Example
///
/// ```no_run
/// use sectrank::{LayoutHeuristicsConfig, Sectrank};
///
/// let output = Sectrank::new()
///     .with_layout(LayoutHeuristicsConfig::new().with_title_match_chars(20))
///     .with_max_summary_chars(400)
///     .strict()
///     .process_collection("Collection 1")?;
/// # Ok::<(), sectrank::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sectrank {
    options: PipelineOptions,
}

impl Sectrank {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout thresholds.
    pub fn with_layout(mut self, layout: LayoutHeuristicsConfig) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Set the number of ranked sections per collection.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.options = self.options.with_top_k(top_k);
        self
    }

    /// Set the summary character budget.
    pub fn with_max_summary_chars(mut self, chars: usize) -> Self {
        self.options = self.options.with_max_summary_chars(chars);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Fail a collection on the first unreadable PDF.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Process without writing output files.
    pub fn dry_run(mut self) -> Self {
        self.options = self.options.with_dry_run(true);
        self
    }

    /// The options collected so far.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Build a pipeline reading PDFs with `lopdf`.
    pub fn build(self) -> Result<CollectionPipeline> {
        CollectionPipeline::new(self.options)
    }

    /// Build a pipeline over a custom text source.
    pub fn build_with_source<S: PdfTextSource>(self, source: S) -> Result<CollectionPipeline<S>> {
        CollectionPipeline::with_source(source, self.options)
    }

    /// Process one collection directory.
    pub fn process_collection<P: AsRef<Path>>(self, dir: P) -> Result<Option<CollectionOutput>> {
        self.build()?.process_collection(dir.as_ref())
    }

    /// Process every collection under `root`.
    pub fn run_batch<P: AsRef<Path>>(self, root: P) -> Result<BatchReport> {
        self.build()?.run_batch(root.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let builder = Sectrank::default();
        assert_eq!(builder.options(), &PipelineOptions::default());
    }

    #[test]
    fn test_builder_chained() {
        let builder = Sectrank::new()
            .with_top_k(3)
            .with_max_summary_chars(100)
            .sequential()
            .strict()
            .dry_run();

        let options = builder.options();
        assert_eq!(options.top_k, 3);
        assert_eq!(options.max_summary_chars, 100);
        assert!(!options.parallel);
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.dry_run);
    }

    #[test]
    fn test_builder_rejects_invalid_layout() {
        let result = Sectrank::new()
            .with_layout(LayoutHeuristicsConfig::new().with_heading_size_tiers(0))
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_extract_sections_not_a_pdf() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"Not a PDF file at all").unwrap();
        assert!(matches!(
            extract_sections(file.path()),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_extract_sections_missing_file() {
        assert!(matches!(
            extract_sections("/nonexistent/guide.pdf"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_process_collection_not_a_collection() {
        let dir = tempfile::tempdir().unwrap();
        assert!(process_collection(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("/a/b/guide.pdf")), "guide.pdf");
    }
}
