//! Value types passed between the extraction and ranking stages.
//!
//! Every record here is produced by one stage and consumed read-only by the
//! next. Nothing is shared or mutated across collections.

mod collection;
mod section;
mod word;

pub use collection::{
    CollectionInput, CollectionOutput, DocumentRef, JobToBeDone, OutputMetadata, Persona,
    RankedExtract, SubsectionSummary,
};
pub use section::{Heading, Section};
pub use word::{Line, WordToken};
