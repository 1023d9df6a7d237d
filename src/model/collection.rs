//! Collection input and output records.
//!
//! These mirror the on-disk JSON files of a collection directory:
//! `challenge1b_input.json` is read into [`CollectionInput`] and
//! [`CollectionOutput`] is written to `challenge1b_output.json`.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parsed collection input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInput {
    /// Documents to process, in order
    pub documents: Vec<DocumentRef>,

    /// Who the excerpts are for
    pub persona: Persona,

    /// What the persona is trying to do
    pub job_to_be_done: JobToBeDone,
}

/// Reference to a PDF inside the collection's PDF directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// File name relative to the PDF directory
    pub filename: String,
}

/// Persona block of the input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Persona role, e.g. "Travel Planner"
    pub role: String,
}

/// Task block of the input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobToBeDone {
    /// Task description
    pub task: String,
}

impl CollectionInput {
    /// Load and validate an input file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data, path)
    }

    /// Parse and validate input JSON. `origin` is only used in error messages.
    pub fn from_json_str(data: &str, origin: impl AsRef<Path>) -> Result<Self> {
        let input: CollectionInput =
            serde_json::from_str(data).map_err(|e| Error::schema(&origin, e.to_string()))?;
        input.validate(origin)?;
        Ok(input)
    }

    fn validate(&self, origin: impl AsRef<Path>) -> Result<()> {
        if let Some(idx) = self
            .documents
            .iter()
            .position(|d| d.filename.trim().is_empty())
        {
            return Err(Error::schema(
                origin,
                format!("documents[{}].filename is empty", idx),
            ));
        }
        Ok(())
    }

    /// The ranking query: persona role followed by the task.
    pub fn query(&self) -> String {
        format!("{} {}", self.persona.role, self.job_to_be_done.task)
    }

    /// Document file names in input order.
    pub fn filenames(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }
}

/// Output written for a processed collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionOutput {
    /// Run metadata
    pub metadata: OutputMetadata,

    /// Top-ranked sections, best first
    pub extracted_sections: Vec<RankedExtract>,

    /// One refined summary per extracted section, same order
    pub subsection_analysis: Vec<SubsectionSummary>,
}

impl CollectionOutput {
    /// Check whether no sections were extracted.
    pub fn is_empty(&self) -> bool {
        self.extracted_sections.is_empty()
    }
}

/// Metadata block of the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMetadata {
    /// Input document file names, in input order
    pub input_documents: Vec<String>,

    /// Persona role
    pub persona: String,

    /// Task description
    pub job_to_be_done: String,

    /// Local time the collection was processed
    #[serde(with = "iso_timestamp")]
    pub processing_timestamp: NaiveDateTime,
}

/// ISO-8601 timestamps with six fractional digits, or none when the fraction
/// is zero.
mod iso_timestamp {
    use chrono::{NaiveDateTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const WHOLE_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
    const MICROSECONDS: &str = "%Y-%m-%dT%H:%M:%S%.6f";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        let format = if ts.nanosecond() == 0 {
            WHOLE_SECONDS
        } else {
            MICROSECONDS
        };
        serializer.collect_str(&ts.format(format))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<NaiveDateTime>().map_err(de::Error::custom)
    }
}

/// A section selected for the output, with its rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedExtract {
    /// Source document filename
    pub document: String,

    /// Section title
    pub section_title: String,

    /// 1-based rank within the collection
    pub importance_rank: u32,

    /// Page the section starts on
    pub page_number: u32,
}

/// Extractive summary of a ranked section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionSummary {
    /// Source document filename
    pub document: String,

    /// Summary text
    pub refined_text: String,

    /// Page the section starts on
    pub page_number: u32,
}
