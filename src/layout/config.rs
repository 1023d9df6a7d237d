//! Thresholds for layout-based structure recovery.

use crate::error::{Error, Result};

/// Named thresholds used by line assembly, heading detection and section capture.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutHeuristicsConfig {
    /// Vertical bucket size used to group words into lines
    pub line_tolerance: f32,

    /// A heading's text must be longer than this many characters
    pub min_heading_chars: usize,

    /// Number of largest distinct font sizes treated as heading tiers
    pub heading_size_tiers: usize,

    /// A line matches a tier if its size is strictly within this distance
    pub size_tolerance: f32,

    /// Candidates closer than this to a heading's `y0` are merged into it
    pub merge_vertical_gap: f32,

    /// Characters of a title used to find it in raw page text
    pub title_match_chars: usize,

    /// A section body must be longer than this many characters
    pub min_body_chars: usize,

    /// Drop the dominant body font size and anything near or below it from the tiers
    pub exclude_body_cluster: bool,
}

impl LayoutHeuristicsConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vertical line grouping tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the minimum heading length.
    pub fn with_min_heading_chars(mut self, chars: usize) -> Self {
        self.min_heading_chars = chars;
        self
    }

    /// Set how many distinct sizes count as heading tiers.
    pub fn with_heading_size_tiers(mut self, tiers: usize) -> Self {
        self.heading_size_tiers = tiers;
        self
    }

    /// Set the font size tolerance around each tier.
    pub fn with_size_tolerance(mut self, tolerance: f32) -> Self {
        self.size_tolerance = tolerance;
        self
    }

    /// Set the vertical distance for merging wrapped headings.
    pub fn with_merge_vertical_gap(mut self, gap: f32) -> Self {
        self.merge_vertical_gap = gap;
        self
    }

    /// Set the title prefix length used for section boundaries.
    pub fn with_title_match_chars(mut self, chars: usize) -> Self {
        self.title_match_chars = chars;
        self
    }

    /// Set the minimum body length for a section to be kept.
    pub fn with_min_body_chars(mut self, chars: usize) -> Self {
        self.min_body_chars = chars;
        self
    }

    /// Enable or disable body-size exclusion.
    pub fn with_body_cluster_exclusion(mut self, exclude: bool) -> Self {
        self.exclude_body_cluster = exclude;
        self
    }

    /// Check that the thresholds are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.line_tolerance > 0.0) {
            return Err(Error::Config(format!(
                "line_tolerance must be positive, got {}",
                self.line_tolerance
            )));
        }
        if !(self.size_tolerance > 0.0) {
            return Err(Error::Config(format!(
                "size_tolerance must be positive, got {}",
                self.size_tolerance
            )));
        }
        if self.merge_vertical_gap < 0.0 || self.merge_vertical_gap.is_nan() {
            return Err(Error::Config(format!(
                "merge_vertical_gap must not be negative, got {}",
                self.merge_vertical_gap
            )));
        }
        if self.heading_size_tiers == 0 {
            return Err(Error::Config(
                "heading_size_tiers must be at least 1".to_string(),
            ));
        }
        if self.title_match_chars == 0 {
            return Err(Error::Config(
                "title_match_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LayoutHeuristicsConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 2.0,
            min_heading_chars: 8,
            heading_size_tiers: 4,
            size_tolerance: 1.5,
            merge_vertical_gap: 20.0,
            title_match_chars: 10,
            min_body_chars: 100,
            exclude_body_cluster: true,
        }
    }
}
