//! Headings and the sections captured beneath them.

use serde::{Deserialize, Serialize};

use super::Line;

/// A heading recovered from one or more merged lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading text; fragments are joined with a single space
    pub text: String,

    /// Font size of the first fragment
    pub font_size: f32,

    /// Vertical position of the first fragment
    pub y0: f32,

    /// Page number (1-indexed)
    pub page: u32,
}

impl Heading {
    /// Absorb a continuation line, keeping the original position.
    pub fn absorb(&mut self, line: &Line) {
        self.text.push(' ');
        self.text.push_str(&line.text);
    }
}

impl From<Line> for Heading {
    fn from(line: Line) -> Self {
        Self {
            text: line.text,
            font_size: line.font_size,
            y0: line.y0,
            page: line.page,
        }
    }
}

/// A titled section of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Source document filename
    pub document: String,

    /// Section title (the merged heading text)
    pub section_title: String,

    /// Page the heading appears on (1-indexed)
    pub page_number: u32,

    /// Raw body text captured under the heading
    pub body: String,
}

impl Section {
    /// Text used when ranking the section: title followed by body.
    pub fn ranking_text(&self) -> String {
        format!("{} {}", self.section_title, self.body)
    }
}
