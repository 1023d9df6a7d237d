//! Positioned words and the visual lines assembled from them.

use serde::{Deserialize, Serialize};

/// A single word as positioned on a page by the PDF text source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordToken {
    /// The word text
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Horizontal start coordinate
    pub x0: f32,

    /// Distance from the top edge of the page (grows downward)
    pub top: f32,

    /// Font size in points
    pub font_size: f32,
}

impl WordToken {
    /// Create a new word token.
    pub fn new(text: impl Into<String>, page: u32, x0: f32, top: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            page,
            x0,
            top,
            font_size,
        }
    }
}

/// A visual line: words sharing a page and a vertical bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Cleaned line text
    pub text: String,

    /// Average font size of the words in the line
    pub font_size: f32,

    /// Smallest `top` among the words in the line
    pub y0: f32,

    /// Page number (1-indexed)
    pub page: u32,
}

impl Line {
    /// Create a new line.
    pub fn new(text: impl Into<String>, font_size: f32, y0: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            y0,
            page,
        }
    }

    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
