//! Collection orchestration.
//!
//! Per document: text source, line assembly, heading detection and section
//! capture. Per collection: pooling, ranking and summarization of the top
//! sections. Per batch: every collection directory under a root.

mod collection;
mod options;

pub use collection::{
    discover_collections, local_timestamp, BatchReport, CollectionOutcome, CollectionPipeline,
};
pub use options::{
    ErrorMode, PipelineOptions, DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_PDF_DIR,
};
