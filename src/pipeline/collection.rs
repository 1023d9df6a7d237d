//! Collection processing: extract, pool, rank and summarize.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, Timelike};
use rayon::prelude::*;

use super::options::{ErrorMode, PipelineOptions};
use crate::error::Result;
use crate::layout::{BoundaryMatcher, StructureRecovery};
use crate::model::{
    CollectionInput, CollectionOutput, OutputMetadata, RankedExtract, Section, SubsectionSummary,
};
use crate::rank::{RelevanceRanker, Summarizer};
use crate::render::{to_json, JsonFormat};
use crate::source::{LopdfTextSource, PdfTextSource};

/// Runs the section pipeline over collection directories.
///
/// A collection directory holds an input file describing the persona, the
/// task and the documents, plus a directory of PDFs. Processing writes the
/// ranked sections and their summaries next to the input.
#[derive(Debug)]
pub struct CollectionPipeline<S: PdfTextSource = LopdfTextSource> {
    source: S,
    options: PipelineOptions,
    recovery: StructureRecovery,
}

impl CollectionPipeline<LopdfTextSource> {
    /// Create a pipeline reading PDFs with `lopdf`.
    ///
    /// In strict mode an unreadable page fails its document; in lenient mode
    /// the page is read as empty.
    pub fn new(options: PipelineOptions) -> Result<Self> {
        let strict = options.error_mode == ErrorMode::Strict;
        Self::with_source(LopdfTextSource::new().with_strict_pages(strict), options)
    }
}

impl<S: PdfTextSource> CollectionPipeline<S> {
    /// Create a pipeline over a custom text source.
    pub fn with_source(source: S, options: PipelineOptions) -> Result<Self> {
        options.validate()?;
        let recovery = StructureRecovery::new(&options.layout);
        Ok(Self {
            source,
            options,
            recovery,
        })
    }

    /// Replace the section boundary matcher.
    pub fn with_matcher(mut self, matcher: impl BoundaryMatcher + 'static) -> Self {
        self.recovery = self.recovery.with_matcher(matcher);
        self
    }

    /// The options in use.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// The text source in use.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The structure recovery stages in use.
    pub fn recovery(&self) -> &StructureRecovery {
        &self.recovery
    }

    /// Check whether `dir` has both the input file and the PDF directory.
    pub fn is_collection(&self, dir: &Path) -> bool {
        dir.join(&self.options.input_file_name).is_file()
            && dir.join(&self.options.pdf_dir_name).is_dir()
    }

    /// Recover the sections of one PDF.
    ///
    /// `name` is recorded as each section's document.
    pub fn document_sections(&self, path: &Path, name: &str) -> Result<Vec<Section>> {
        let document = self.source.extract(path)?;
        let sections = self.recovery.sections(&document, name);
        log::debug!(
            "{}: {} pages, {} sections",
            name,
            document.page_count(),
            sections.len()
        );
        Ok(sections)
    }

    /// Sections of every input document, pooled in input order.
    ///
    /// Missing files are skipped. Unreadable files are skipped in lenient mode
    /// and fail the collection in strict mode.
    pub fn pooled_sections(&self, input: &CollectionInput, pdf_dir: &Path) -> Result<Vec<Section>> {
        let extract = |filename: &String| -> Result<Vec<Section>> {
            let path = pdf_dir.join(filename);
            if !path.is_file() {
                log::warn!("Skipping missing document {}", path.display());
                return Ok(Vec::new());
            }
            match self.document_sections(&path, filename) {
                Ok(sections) => Ok(sections),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping unreadable document {}: {}", path.display(), e);
                    Ok(Vec::new())
                }
                Err(e) => Err(e),
            }
        };

        let filenames = input.filenames();
        let per_document: Vec<Result<Vec<Section>>> = if self.options.parallel {
            filenames.par_iter().map(extract).collect()
        } else {
            filenames.iter().map(extract).collect()
        };

        let mut pooled = Vec::new();
        for sections in per_document {
            pooled.extend(sections?);
        }
        Ok(pooled)
    }

    /// Rank pooled sections and summarize the best ones.
    pub fn rank_sections(
        &self,
        input: &CollectionInput,
        sections: &[Section],
        processing_timestamp: NaiveDateTime,
    ) -> CollectionOutput {
        let query = input.query();
        let texts: Vec<String> = sections.iter().map(Section::ranking_text).collect();
        let top = RelevanceRanker::top_k(&query, &texts, self.options.top_k);
        let summarizer = Summarizer::new(self.options.max_summary_chars);

        let mut extracted_sections = Vec::with_capacity(top.len());
        let mut subsection_analysis = Vec::with_capacity(top.len());
        for (rank, &index) in top.iter().enumerate() {
            let section = &sections[index];
            extracted_sections.push(RankedExtract {
                document: section.document.clone(),
                section_title: section.section_title.clone(),
                importance_rank: rank as u32 + 1,
                page_number: section.page_number,
            });
            subsection_analysis.push(SubsectionSummary {
                document: section.document.clone(),
                refined_text: summarizer.summarize(&section.body, &query),
                page_number: section.page_number,
            });
        }

        CollectionOutput {
            metadata: OutputMetadata {
                input_documents: input.filenames(),
                persona: input.persona.role.clone(),
                job_to_be_done: input.job_to_be_done.task.clone(),
                processing_timestamp,
            },
            extracted_sections,
            subsection_analysis,
        }
    }

    /// Build the output for a parsed input without touching the output file.
    pub fn build_output(&self, input: &CollectionInput, pdf_dir: &Path) -> Result<CollectionOutput> {
        let sections = self.pooled_sections(input, pdf_dir)?;
        log::debug!("Ranking {} pooled sections", sections.len());
        Ok(self.rank_sections(input, &sections, local_timestamp()))
    }

    /// Process one collection directory and write its output file.
    ///
    /// Returns `None`, writing nothing, when `dir` lacks the input file or the
    /// PDF directory.
    pub fn process_collection(&self, dir: &Path) -> Result<Option<CollectionOutput>> {
        if !self.is_collection(dir) {
            log::debug!("Not a collection: {}", dir.display());
            return Ok(None);
        }

        let input = CollectionInput::load(dir.join(&self.options.input_file_name))?;
        let output = self.build_output(&input, &dir.join(&self.options.pdf_dir_name))?;

        if self.options.dry_run {
            log::info!(
                "Processed {} ({} sections, not written)",
                dir.display(),
                output.extracted_sections.len()
            );
        } else {
            let output_path = dir.join(&self.options.output_file_name);
            fs::write(&output_path, to_json(&output, JsonFormat::Pretty)?)?;
            log::info!(
                "Processed {} ({} sections) -> {}",
                dir.display(),
                output.extracted_sections.len(),
                output_path.display()
            );
        }

        Ok(Some(output))
    }

    /// Process every immediate subdirectory of `root`.
    pub fn run_batch(&self, root: &Path) -> Result<BatchReport> {
        self.run_batch_with(root, |_, _| {})
    }

    /// Like [`run_batch`](Self::run_batch), calling `on_done` as each
    /// directory finishes.
    pub fn run_batch_with<F>(&self, root: &Path, on_done: F) -> Result<BatchReport>
    where
        F: Fn(&Path, &CollectionOutcome) + Sync,
    {
        let dirs = discover_collections(root)?;

        let run = |dir: &PathBuf| -> (PathBuf, CollectionOutcome) {
            let outcome = match self.process_collection(dir) {
                Ok(Some(output)) => CollectionOutcome::Processed {
                    sections: output.extracted_sections.len(),
                },
                Ok(None) => CollectionOutcome::Skipped,
                Err(e) => {
                    log::error!("Failed to process {}: {}", dir.display(), e);
                    CollectionOutcome::Failed(e)
                }
            };
            on_done(dir, &outcome);
            (dir.clone(), outcome)
        };

        let outcomes = if self.options.parallel {
            dirs.par_iter().map(run).collect()
        } else {
            dirs.iter().map(run).collect()
        };

        Ok(BatchReport { outcomes })
    }
}

/// Immediate subdirectories of `root`, sorted by path.
pub fn discover_collections(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Current local time at microsecond precision.
pub fn local_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    let micros = now.nanosecond() / 1_000 * 1_000;
    now.with_nanosecond(micros).unwrap_or(now)
}

/// Result of processing one directory in a batch.
#[derive(Debug)]
pub enum CollectionOutcome {
    /// Output was produced
    Processed {
        /// Number of ranked sections in the output
        sections: usize,
    },
    /// Not a collection directory
    Skipped,
    /// Processing failed
    Failed(crate::error::Error),
}

/// Outcomes of a batch run, in directory order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Directory and outcome pairs
    pub outcomes: Vec<(PathBuf, CollectionOutcome)>,
}

impl BatchReport {
    /// Number of processed collections.
    pub fn processed(&self) -> usize {
        self.count(|o| matches!(o, CollectionOutcome::Processed { .. }))
    }

    /// Number of skipped directories.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CollectionOutcome::Skipped))
    }

    /// Number of failed collections.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CollectionOutcome::Failed(_)))
    }

    /// Check whether every collection succeeded.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Failed collections with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &crate::error::Error)> {
        self.outcomes.iter().filter_map(|(dir, o)| match o {
            CollectionOutcome::Failed(e) => Some((dir.as_path(), e)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&CollectionOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}
