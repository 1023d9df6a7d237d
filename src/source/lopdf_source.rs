//! [`PdfTextSource`] backed by `lopdf`.
//!
//! lopdf exposes no positioned text, so each page content stream is walked
//! while tracking the text matrix. The walk yields both the positioned words
//! and the plain page text, which starts a new line whenever the baseline
//! moves.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::{detect, ExtractedDocument, PageContent, PdfTextSource};
use crate::error::{Error, Result};
use crate::model::WordToken;

/// Default page height (US Letter) when no MediaBox is found.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Estimated glyph advance as a fraction of the font size.
const CHAR_WIDTH_RATIO: f32 = 0.5;

/// Ascender height as a fraction of the font size.
const ASCENT_RATIO: f32 = 0.8;

/// Baselines closer than this belong to the same text line.
const BASELINE_TOLERANCE: f32 = 1.0;

/// A horizontal jump wider than this fraction of the font size is a word gap.
const WORD_GAP_RATIO: f32 = 0.2;

/// Extracts page text and positioned words with `lopdf`.
#[derive(Debug, Clone)]
pub struct LopdfTextSource {
    lenient_pages: bool,
}

impl LopdfTextSource {
    /// Create a source that tolerates unreadable pages.
    pub fn new() -> Self {
        Self {
            lenient_pages: true,
        }
    }

    /// Fail the whole document on the first unreadable page instead of
    /// treating that page as empty.
    pub fn with_strict_pages(mut self, strict: bool) -> Self {
        self.lenient_pages = !strict;
        self
    }

    /// Check whether an unreadable page fails the document.
    pub fn is_strict_pages(&self) -> bool {
        !self.lenient_pages
    }

    /// Extract a document held in memory.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<ExtractedDocument> {
        detect::parse_header(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        self.extract_document(&doc)
    }

    fn extract_document(&self, doc: &LopdfDocument) -> Result<ExtractedDocument> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let pages = self.collect_pages(&doc.get_pages(), |number, page_id| {
            extract_page(doc, number, page_id)
        })?;

        log::debug!(
            "Extracted {} pages ({} words)",
            pages.len(),
            pages.iter().map(|p| p.words.len()).sum::<usize>()
        );
        Ok(ExtractedDocument::new(pages))
    }

    /// Extract pages in order, applying the page error policy.
    fn collect_pages<F>(
        &self,
        page_ids: &BTreeMap<u32, ObjectId>,
        mut extract: F,
    ) -> Result<Vec<PageContent>>
    where
        F: FnMut(u32, ObjectId) -> Result<PageContent>,
    {
        let mut pages = Vec::with_capacity(page_ids.len());

        for (&number, &page_id) in page_ids {
            match extract(number, page_id) {
                Ok(page) => pages.push(page),
                Err(e) if self.lenient_pages => {
                    log::warn!("Skipping unreadable page {}: {}", number, e);
                    pages.push(PageContent::default());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(pages)
    }
}

impl Default for LopdfTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfTextSource for LopdfTextSource {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        detect::sniff_header(path)?;
        let doc = LopdfDocument::load(path)?;
        self.extract_document(&doc)
    }
}

fn extract_page(doc: &LopdfDocument, number: u32, page_id: ObjectId) -> Result<PageContent> {
    let fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;
    let content = doc
        .get_page_content(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let height = page_height(doc, page_id);
    walk_page(doc, &content, &fonts, number, height)
}

/// Page height from the MediaBox, following inherited attributes.
fn page_height(doc: &LopdfDocument, page_id: ObjectId) -> f32 {
    let mut node = doc.get_dictionary(page_id).ok();

    while let Some(dict) = node {
        if let Some(height) = dict
            .get(b"MediaBox")
            .ok()
            .and_then(|o| media_box_height(doc, o))
        {
            return height;
        }
        node = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .ok();
    }

    DEFAULT_PAGE_HEIGHT
}

fn media_box_height(doc: &LopdfDocument, obj: &Object) -> Option<f32> {
    let obj = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let array = obj.as_array().ok()?;
    if array.len() < 4 {
        return None;
    }
    let y0 = get_number(&array[1])?;
    let y1 = get_number(&array[3])?;
    Some((y1 - y0).abs())
}

/// Text state needed to place glyphs: the text matrix and the line matrix.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    /// Start a text object; leading survives across objects.
    fn begin(&mut self) {
        *self = Self {
            leading: self.leading,
            ..Self::default()
        };
    }

    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    /// Move to the start of the next line, offset from the current line start.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    /// Advance the current point along the baseline.
    fn advance(&mut self, tx: f32) {
        self.e += tx * self.a;
        self.f += tx * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn vertical_scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

/// Page text assembled span by span, one visual line per `\n`.
#[derive(Debug, Default)]
struct LineText {
    text: String,
    /// Baseline y and end x of the previous span
    last: Option<(f32, f32)>,
}

impl LineText {
    fn push_span(&mut self, span: &str, x: f32, y: f32, end_x: f32, size: f32) {
        if span.is_empty() {
            return;
        }

        match self.last {
            Some((prev_y, _)) if (y - prev_y).abs() > BASELINE_TOLERANCE => self.text.push('\n'),
            Some((_, prev_end))
                if x - prev_end > size * WORD_GAP_RATIO
                    && !self.text.ends_with(char::is_whitespace)
                    && !span.starts_with(char::is_whitespace) =>
            {
                self.text.push(' ')
            }
            _ => {}
        }

        self.text.push_str(span);
        self.last = Some((y, end_x));
    }

    fn finish(mut self) -> String {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text
    }
}

/// Walk a content stream, emitting the page text and its positioned words.
fn walk_page(
    doc: &LopdfDocument,
    content: &[u8],
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    page: u32,
    page_height: f32,
) -> Result<PageContent> {
    let content = Content::decode(content)
        .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;

    let mut text = LineText::default();
    let mut words = Vec::new();
    let mut matrix = TextMatrix::default();
    let mut font_name: Vec<u8> = Vec::new();
    let mut font_size: f32 = 12.0;
    let mut in_text = false;

    let decode = |font: &[u8], bytes: &[u8]| -> String {
        fonts
            .get(font)
            .and_then(|f| f.get_font_encoding(doc).ok())
            .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    };

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                matrix.begin();
            }
            "ET" => in_text = false,
            "Tf" => {
                if let [Object::Name(name), size, ..] = op.operands.as_slice() {
                    font_name = name.clone();
                    font_size = get_number(size).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = op.operands.first().and_then(get_number) {
                    matrix.leading = leading;
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        matrix.leading = -ty;
                    }
                    matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    let n: Vec<f32> = op
                        .operands
                        .iter()
                        .take(6)
                        .map(|o| get_number(o).unwrap_or(0.0))
                        .collect();
                    matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                }
            }
            "T*" => matrix.next_line(),
            "Tj" | "TJ" | "'" | "\"" if in_text => {
                if op.operator != "Tj" && op.operator != "TJ" {
                    matrix.next_line();
                }

                let shown = match op.operator.as_str() {
                    "TJ" => match op.operands.first() {
                        Some(Object::Array(items)) => show_array(items, font_size, |b| {
                            decode(&font_name, b)
                        }),
                        _ => String::new(),
                    },
                    "\"" => string_operand(op.operands.get(2))
                        .map(|b| decode(&font_name, b))
                        .unwrap_or_default(),
                    _ => string_operand(op.operands.first())
                        .map(|b| decode(&font_name, b))
                        .unwrap_or_default(),
                };

                let size = font_size * matrix.vertical_scale();
                let (x, y) = matrix.position();
                let top = page_height - (y + size * ASCENT_RATIO);
                push_words(&mut words, &shown, page, x, top, size);

                matrix.advance(shown.chars().count() as f32 * font_size * CHAR_WIDTH_RATIO);
                text.push_span(&shown, x, y, matrix.position().0, size);
            }
            _ => {}
        }
    }

    Ok(PageContent::new(text.finish(), words))
}

/// Decode a `TJ` array. Large negative adjustments are word gaps.
fn show_array(items: &[Object], font_size: f32, decode: impl Fn(&[u8]) -> String) -> String {
    const SPACE_THRESHOLD: f32 = 200.0;

    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode(bytes)),
            other => {
                if let Some(n) = get_number(other) {
                    if -n > SPACE_THRESHOLD && !combined.is_empty() && !combined.ends_with(' ') {
                        combined.push(' ');
                    }
                }
            }
        }
    }

    log::trace!("TJ at {}pt: {:?}", font_size, combined);
    combined
}

/// Split a shown string on whitespace and place each word along the baseline.
fn push_words(words: &mut Vec<WordToken>, text: &str, page: u32, x: f32, top: f32, size: f32) {
    let advance = size * CHAR_WIDTH_RATIO;
    let mut start: Option<(usize, String)> = None;

    for (offset, c) in text.chars().chain(std::iter::once(' ')).enumerate() {
        if c.is_whitespace() {
            if let Some((first, word)) = start.take() {
                words.push(WordToken::new(word, page, x + first as f32 * advance, top, size));
            }
        } else {
            start
                .get_or_insert_with(|| (offset, String::new()))
                .1
                .push(c);
        }
    }
}

fn string_operand(obj: Option<&Object>) -> Option<&[u8]> {
    match obj {
        Some(Object::String(bytes, _)) => Some(bytes.as_slice()),
        _ => None,
    }
}

/// Fallback decoding when the font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
