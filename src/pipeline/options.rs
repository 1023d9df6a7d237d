//! Pipeline options and configuration.

use crate::error::{Error, Result};
use crate::layout::LayoutHeuristicsConfig;
use crate::rank::DEFAULT_MAX_CHARS;

/// Input file read from each collection directory.
pub const DEFAULT_INPUT_FILE: &str = "challenge1b_input.json";

/// Output file written into each collection directory.
pub const DEFAULT_OUTPUT_FILE: &str = "challenge1b_output.json";

/// Directory holding a collection's PDFs.
pub const DEFAULT_PDF_DIR: &str = "PDFs";

/// Options for processing collections.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Layout heuristics thresholds
    pub layout: LayoutHeuristicsConfig,

    /// Number of sections to keep per collection
    pub top_k: usize,

    /// Character budget of each refined summary
    pub max_summary_chars: usize,

    /// Whether to use parallel processing
    pub parallel: bool,

    /// How unreadable PDFs are handled
    pub error_mode: ErrorMode,

    /// Name of the input file inside a collection
    pub input_file_name: String,

    /// Name of the output file inside a collection
    pub output_file_name: String,

    /// Name of the PDF directory inside a collection
    pub pdf_dir_name: String,

    /// Process collections without writing output files
    pub dry_run: bool,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout thresholds.
    pub fn with_layout(mut self, layout: LayoutHeuristicsConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set the number of ranked sections.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the summary character budget.
    pub fn with_max_summary_chars(mut self, chars: usize) -> Self {
        self.max_summary_chars = chars;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail a collection on the first unreadable PDF.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set the input file name.
    pub fn with_input_file_name(mut self, name: impl Into<String>) -> Self {
        self.input_file_name = name.into();
        self
    }

    /// Set the output file name.
    pub fn with_output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = name.into();
        self
    }

    /// Set the PDF directory name.
    pub fn with_pdf_dir_name(mut self, name: impl Into<String>) -> Self {
        self.pdf_dir_name = name.into();
        self
    }

    /// Enable or disable dry runs.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check that the options are usable.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        for (field, value) in [
            ("input_file_name", &self.input_file_name),
            ("output_file_name", &self.output_file_name),
            ("pdf_dir_name", &self.pdf_dir_name),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} must not be empty", field)));
            }
        }
        if self.input_file_name == self.output_file_name {
            return Err(Error::Config(
                "input and output file names must differ".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            layout: LayoutHeuristicsConfig::default(),
            top_k: 5,
            max_summary_chars: DEFAULT_MAX_CHARS,
            parallel: true,
            error_mode: ErrorMode::Lenient,
            input_file_name: DEFAULT_INPUT_FILE.to_string(),
            output_file_name: DEFAULT_OUTPUT_FILE.to_string(),
            pdf_dir_name: DEFAULT_PDF_DIR.to_string(),
            dry_run: false,
        }
    }
}

/// How a PDF that exists but cannot be read is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the collection
    Strict,
    /// Log a warning and treat the document as having no sections
    #[default]
    Lenient,
}
