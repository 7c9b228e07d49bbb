//! PDF page decoding using lopdf.
//!
//! Walks each page's content stream and records every shown string at the
//! current text-matrix position. The result is a bag of [`PageFragment`]s;
//! ordering them is the layout reconstructor's job.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{Page, PageFragment};

use super::options::{ErrorMode, ParseOptions};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Kerning adjustment (1/1000 text space units) treated as a word break in TJ arrays.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Check if data starts with the PDF magic bytes.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// PDF issue decoder.
pub struct PdfParser {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Decode a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Decode a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        if !is_pdf_bytes(data) {
            return Err(Error::UnknownFormat);
        }

        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc, options })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Decode every page, in physical order.
    ///
    /// In lenient mode a page whose content stream cannot be decoded is
    /// logged and kept with no fragments, so later pages keep their numbers
    /// and the raw-text fallback still applies to it.
    pub fn parse(&self) -> Result<Vec<Page>> {
        let page_ids = self.doc.get_pages();
        let mut pages = Vec::with_capacity(page_ids.len());

        for (&page_num, &page_id) in page_ids.iter() {
            pages.push(self.parse_page_object(page_num, page_id)?);
        }

        log::debug!("Decoded {} pages", pages.len());
        Ok(pages)
    }

    /// Decode a single page by number (1-indexed).
    pub fn parse_page(&self, page_num: u32) -> Result<Page> {
        let pages = self.doc.get_pages();
        let page_id = pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;
        self.parse_page_object(page_num, *page_id)
    }

    fn parse_page_object(&self, page_num: u32, page_id: ObjectId) -> Result<Page> {
        let fragments = match self.extract_page_fragments(page_id) {
            Ok(fragments) => fragments,
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Undecodable content on page {}: {}", page_num, e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let page = Page::from_fragments(page_num, fragments);

        if !self.options.raw_text_fallback {
            return Ok(page);
        }

        match self.doc.extract_text(&[page_num]) {
            Ok(raw) => Ok(page.with_raw_text(raw)),
            Err(e) => {
                log::debug!("No raw text for page {}: {}", page_num, e);
                Ok(page)
            }
        }
    }

    /// Extract positioned fragments from a page's content streams.
    fn extract_page_fragments(&self, page_id: ObjectId) -> Result<Vec<PageFragment>> {
        let fonts = self.doc.get_page_fonts(page_id)?;
        let content = self.get_page_content(page_id)?;
        self.parse_content_stream(&content, &fonts)
    }

    /// Concatenate the page's content streams, decoding filtered ones.
    ///
    /// A page without `/Contents` is blank and yields no bytes.
    fn get_page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        for stream_id in self.doc.get_page_contents(page_id) {
            let stream = self.doc.get_object(stream_id)?.as_stream()?;
            content.extend_from_slice(&stream.get_plain_content()?);
            content.push(b'\n');
        }
        Ok(content)
    }

    /// Walk text operators and emit one fragment per shown string.
    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<PageFragment>> {
        if content.is_empty() {
            return Ok(Vec::new());
        }

        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut fragments = Vec::new();
        let mut current_font: Vec<u8> = Vec::new();
        let mut leading: f32 = 12.0;
        let mut text_matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    text_matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if let Some(Object::Name(font_name)) = op.operands.first() {
                        current_font = font_name.clone();
                    }
                }
                "TL" => {
                    if let Some(tl) = op.operands.first().and_then(get_number) {
                        leading = tl;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            leading = -ty;
                        }
                        text_matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        text_matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    text_matrix.next_line(leading);
                }
                "Tj" | "TJ" | "'" | "\"" if in_text_block => {
                    if op.operator == "'" || op.operator == "\"" {
                        text_matrix.next_line(leading);
                    }

                    let encoding = fonts
                        .get(&current_font)
                        .and_then(|f| f.get_font_encoding(&self.doc).ok());
                    let decode = |bytes: &[u8]| match &encoding {
                        Some(enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
                        None => decode_text_simple(bytes),
                    };

                    let text = match op.operator.as_str() {
                        "TJ" => match op.operands.first() {
                            Some(Object::Array(arr)) => decode_tj_array(arr, &decode),
                            _ => String::new(),
                        },
                        "\"" => match op.operands.get(2) {
                            Some(Object::String(bytes, _)) => decode(bytes),
                            _ => String::new(),
                        },
                        _ => match op.operands.first() {
                            Some(Object::String(bytes, _)) => decode(bytes),
                            _ => String::new(),
                        },
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = text_matrix.position();
                        fragments.push(PageFragment::new(x, y, text));
                    }
                }
                _ => {}
            }
        }

        Ok(fragments)
    }
}

/// Decode a TJ array: strings interleaved with kerning adjustments.
///
/// Large negative adjustments move the pen right far enough to read as a
/// word space.
fn decode_tj_array<F>(arr: &[Object], decode: F) -> String
where
    F: Fn(&[u8]) -> String,
{
    let mut combined = String::new();
    for item in arr {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode(bytes)),
            Object::Integer(_) | Object::Real(_) => {
                let adjustment = -get_number(item).unwrap_or(0.0);
                let ends_with_space = combined.ends_with(' ') || combined.ends_with('\u{00A0}');
                if adjustment > TJ_SPACE_THRESHOLD && !combined.is_empty() && !ends_with_space {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
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
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
