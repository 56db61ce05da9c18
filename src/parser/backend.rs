//! PDF backend: document access behind the block-source seam.
//!
//! [`BlockSource`] is the only interface the classification pipeline sees,
//! so tests can drive it with injected block sequences instead of real
//! documents. [`LopdfBackend`] is the concrete source backed by `lopdf`.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object, Stream};

use crate::error::{Error, Result};
use crate::model::{ImageBlock, PageBlock};

use super::layout::PageLayout;

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// A value from a PDF content stream operand.
#[derive(Debug, Clone)]
pub(crate) enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub(crate) struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// Source of ordered page blocks.
///
/// Implementations yield every block of the document in reading order:
/// pages ascending, top-to-bottom within a page. Order is the only
/// timeline the downstream pipeline has.
pub trait BlockSource {
    /// All blocks of the document, in document order.
    fn blocks(&self) -> Result<Vec<PageBlock>>;
}

/// Simple text decoding fallback when no font encoding is available.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE carries a BOM marker
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Concrete [`BlockSource`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path. Encrypted documents are rejected.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Self::from_doc(LopdfDocument::load(path)?)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        Self::from_doc(LopdfDocument::load_mem(data)?)
    }

    /// Load from a reader.
    pub fn load_reader<R: std::io::Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    fn from_doc(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Pages as (page number → PageId), ascending.
    pub(crate) fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    /// Raw content stream bytes for a page, decompressed and concatenated.
    ///
    /// A page without a `Contents` entry yields no bytes.
    pub(crate) fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        let contents = match page_dict.get(b"Contents") {
            Ok(obj) => obj,
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => {
                let stream = self.doc.get_object(*r)?.as_stream()?;
                Ok(stream_data(stream))
            }
            Object::Stream(s) => Ok(stream_data(s)),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(stream) = self.doc.get_object(*r).and_then(|o| o.as_stream()) {
                            content.extend_from_slice(&stream_data(stream));
                            content.push(b' ');
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("invalid content stream".to_string())),
        }
    }

    /// Parse raw content stream bytes into a sequence of operations.
    pub(crate) fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    /// Decode text bytes using the named font's encoding on the given page,
    /// falling back to simple decoding.
    pub(crate) fn decode_text(&self, page_id: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(fonts) = self.doc.get_page_fonts(page_id) {
            if let Some(font_dict) = fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    /// Resolve an image XObject by resource name: `(payload, extension)`.
    ///
    /// Returns `None` for form XObjects and unresolvable names.
    pub(crate) fn xobject_image(
        &self,
        page_id: PageId,
        name: &[u8],
    ) -> Result<Option<(Vec<u8>, String)>> {
        let Some(resources) = self.page_resources(page_id)? else {
            return Ok(None);
        };
        let Ok(xobjects) = resources.get(b"XObject") else {
            return Ok(None);
        };
        let xobjects = self.resolve_dict(xobjects)?;
        let Ok(entry) = xobjects.get(name) else {
            return Ok(None);
        };
        let object = match entry {
            Object::Reference(r) => self.doc.get_object(*r)?,
            other => other,
        };
        let Ok(stream) = object.as_stream() else {
            return Ok(None);
        };
        let is_image = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Image");
        if !is_image {
            return Ok(None);
        }
        Ok(Some(image_payload(stream)))
    }

    /// Page resources, walking `Parent` links for inherited entries.
    fn page_resources(&self, page_id: PageId) -> Result<Option<&Dictionary>> {
        let mut dict = self.doc.get_dictionary(page_id)?;
        loop {
            if let Ok(obj) = dict.get(b"Resources") {
                return self.resolve_dict(obj).map(Some);
            }
            match dict.get(b"Parent") {
                Ok(Object::Reference(r)) => dict = self.doc.get_dictionary(*r)?,
                _ => return Ok(None),
            }
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Result<&'a Dictionary> {
        match obj {
            Object::Reference(r) => Ok(self.doc.get_object(*r)?.as_dict()?),
            Object::Dictionary(dict) => Ok(dict),
            _ => Err(Error::PdfParse("expected dictionary".to_string())),
        }
    }
}

impl BlockSource for LopdfBackend {
    fn blocks(&self) -> Result<Vec<PageBlock>> {
        let mut blocks = Vec::new();
        for (page_number, page_id) in self.pages() {
            let page_blocks = PageLayout::new(self, page_id, page_number).blocks()?;
            log::debug!("page {}: {} blocks", page_number, page_blocks.len());
            blocks.extend(page_blocks);
        }
        Ok(blocks)
    }
}

/// Stream bytes, decompressed when a filter is declared.
fn stream_data(stream: &Stream) -> Vec<u8> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone())
    } else {
        stream.content.clone()
    }
}

/// Image stream payload plus a file-extension hint.
///
/// DCT and JPX payloads are usable as-is; anything else is decompressed
/// and sniffed, defaulting to an opaque `bin`.
fn image_payload(stream: &Stream) -> (Vec<u8>, String) {
    match filter_name(&stream.dict) {
        Some(f) if f == b"DCTDecode" => (stream.content.clone(), "jpg".to_string()),
        Some(f) if f == b"JPXDecode" => (stream.content.clone(), "jp2".to_string()),
        _ => {
            let data = stream_data(stream);
            let ext = ImageBlock::sniff_extension(&data).unwrap_or("bin");
            (data, ext.to_string())
        }
    }
}

/// First filter name of a stream, if any (`Filter` may be a name or array).
fn filter_name(dict: &Dictionary) -> Option<&[u8]> {
    match dict.get(b"Filter").ok()? {
        Object::Name(n) => Some(n.as_slice()),
        Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
        _ => None,
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Helper: extract a number from a [`PdfValue`].
pub(crate) fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}
