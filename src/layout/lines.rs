//! Grouping positioned words into visual lines.

use std::collections::BTreeMap;

use crate::model::{Line, WordToken};

use super::config::LayoutHeuristicsConfig;

/// Groups words into lines by page and quantized vertical position.
#[derive(Debug, Clone)]
pub struct LineAssembler {
    tolerance: f32,
}

impl LineAssembler {
    /// Create an assembler with the given vertical tolerance.
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// Create an assembler from heuristics config.
    pub fn from_config(config: &LayoutHeuristicsConfig) -> Self {
        Self::new(config.line_tolerance)
    }

    /// Vertical bucket for a `top` coordinate. Halves round to even.
    fn bucket(&self, top: f32) -> i64 {
        (top / self.tolerance).round_ties_even() as i64
    }

    /// Assemble lines from the words of one document.
    ///
    /// Lines come back ordered by page and bucket. Consumers that care about
    /// reading order sort them again by `(page, y0)`.
    pub fn assemble(&self, words: &[WordToken]) -> Vec<Line> {
        let mut groups: BTreeMap<(u32, i64), Vec<&WordToken>> = BTreeMap::new();
        for word in words {
            groups
                .entry((word.page, self.bucket(word.top)))
                .or_default()
                .push(word);
        }

        let lines: Vec<Line> = groups
            .into_iter()
            .map(|((page, _), mut group)| {
                group.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));

                let text = group
                    .iter()
                    .map(|w| w.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let font_size =
                    group.iter().map(|w| w.font_size).sum::<f32>() / group.len() as f32;
                let y0 = group.iter().map(|w| w.top).fold(f32::INFINITY, f32::min);

                Line::new(clean_line(&text), font_size, y0, page)
            })
            .collect();

        log::debug!("Assembled {} lines from {} words", lines.len(), words.len());
        lines
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::from_config(&LayoutHeuristicsConfig::default())
    }
}

/// Clean extracted line text.
///
/// Runs of three or more identical ASCII letters collapse to one (a common
/// duplicated-glyph artifact in PDF text), then whitespace runs collapse to a
/// single space and the ends are trimmed.
pub fn clean_line(text: &str) -> String {
    collapse_repeated_letters(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_repeated_letters(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        let keep = if c.is_ascii_alphabetic() && run >= 3 {
            1
        } else {
            run
        };
        out.extend(std::iter::repeat(c).take(keep));
    }

    out
}
