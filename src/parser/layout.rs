//! Content-stream interpretation: positioned text and image placements,
//! grouped into the ordered block stream for one page.

use log::warn;

use crate::error::Result;
use crate::model::{ImageBlock, PageBlock, TextBlock, TextLine};

use super::backend::{get_number_from_value, ContentOp, LopdfBackend, PageId, PdfValue};

/// A positioned text run from one show-text operation.
#[derive(Debug, Clone)]
struct PlacedSpan {
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
}

/// Spans sharing a baseline, left to right.
#[derive(Debug, Clone)]
struct PlacedLine {
    y: f32,
    spans: Vec<PlacedSpan>,
}

/// An image placement resolved from a `Do` operator.
#[derive(Debug)]
struct PlacedImage {
    y: f32,
    data: Vec<u8>,
    ext: String,
}

/// Interprets one page's content stream into ordered page blocks.
pub(crate) struct PageLayout<'a> {
    backend: &'a LopdfBackend,
    page_id: PageId,
    page: u32,
}

impl<'a> PageLayout<'a> {
    pub fn new(backend: &'a LopdfBackend, page_id: PageId, page: u32) -> Self {
        Self {
            backend,
            page_id,
            page,
        }
    }

    /// Ordered blocks for the page, top to bottom.
    ///
    /// Consecutive text lines form one block; a placed image closes the
    /// current block and becomes a block of its own.
    pub fn blocks(&self) -> Result<Vec<PageBlock>> {
        let data = self.backend.page_content(self.page_id)?;
        let ops = self.backend.decode_content(&data)?;
        let (spans, images) = self.interpret(&ops)?;
        let lines = group_spans_into_lines(spans);
        Ok(merge_into_blocks(self.page, lines, images))
    }

    /// Walk the operations, tracking the text matrix for spans and the
    /// graphics-state matrix for image placements.
    fn interpret(&self, ops: &[ContentOp]) -> Result<(Vec<PlacedSpan>, Vec<PlacedImage>)> {
        let mut spans = Vec::new();
        let mut images = Vec::new();

        let mut current_font: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut text_matrix = TextMatrix::default();
        let mut in_text = false;

        let mut ctm = GraphicsMatrix::default();
        let mut ctm_stack: Vec<GraphicsMatrix> = Vec::new();

        for op in ops {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    text_matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let PdfValue::Name(name) = &op.operands[0] {
                            current_font = name.clone();
                        }
                        current_font_size =
                            get_number_from_value(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                        text_matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        text_matrix.set(
                            get_number_from_value(&op.operands[0]).unwrap_or(1.0),
                            get_number_from_value(&op.operands[1]).unwrap_or(0.0),
                            get_number_from_value(&op.operands[2]).unwrap_or(0.0),
                            get_number_from_value(&op.operands[3]).unwrap_or(1.0),
                            get_number_from_value(&op.operands[4]).unwrap_or(0.0),
                            get_number_from_value(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    text_matrix.next_line();
                }
                "Tj" => {
                    if in_text {
                        if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                            let text =
                                self.backend.decode_text(self.page_id, &current_font, bytes);
                            push_span(&mut spans, text, &text_matrix, current_font_size);
                        }
                    }
                }
                "TJ" => {
                    if in_text {
                        if let Some(PdfValue::Array(items)) = op.operands.first() {
                            let text = self.join_show_array(items, &current_font);
                            push_span(&mut spans, text, &text_matrix, current_font_size);
                        }
                    }
                }
                "'" | "\"" => {
                    text_matrix.next_line();
                    if in_text {
                        let text_idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(PdfValue::Str(bytes)) = op.operands.get(text_idx) {
                            let text =
                                self.backend.decode_text(self.page_id, &current_font, bytes);
                            push_span(&mut spans, text, &text_matrix, current_font_size);
                        }
                    }
                }
                "q" => {
                    ctm_stack.push(ctm);
                }
                "Q" => {
                    ctm = ctm_stack.pop().unwrap_or_default();
                }
                "cm" => {
                    if op.operands.len() >= 6 {
                        let m = GraphicsMatrix::from_operands(&op.operands);
                        ctm = m.concat(&ctm);
                    }
                }
                "Do" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        match self.backend.xobject_image(self.page_id, name)? {
                            Some((data, ext)) => images.push(PlacedImage {
                                y: ctm.image_top(),
                                data,
                                ext,
                            }),
                            None => warn!(
                                "page {}: skipping non-image XObject {}",
                                self.page,
                                String::from_utf8_lossy(name)
                            ),
                        }
                    }
                }
                _ => {}
            }
        }

        Ok((spans, images))
    }

    /// Join a `TJ` show array into one string.
    ///
    /// Numbers are kerning adjustments in thousandths of text space; large
    /// negative values stand in for word spaces.
    fn join_show_array(&self, items: &[PdfValue], font: &[u8]) -> String {
        let mut combined = String::new();
        let space_threshold = 200.0;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    combined.push_str(&self.backend.decode_text(self.page_id, font, bytes));
                }
                PdfValue::Integer(n) => {
                    if -(*n as f32) > space_threshold
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                    {
                        combined.push(' ');
                    }
                }
                PdfValue::Real(n) => {
                    if -n > space_threshold && !combined.is_empty() && !combined.ends_with(' ') {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }

        combined
    }
}

fn push_span(spans: &mut Vec<PlacedSpan>, text: String, matrix: &TextMatrix, font_size: f32) {
    if text.trim().is_empty() {
        return;
    }
    let (x, y) = matrix.position();
    spans.push(PlacedSpan {
        text,
        x,
        y,
        font_size: font_size * matrix.scale(),
    });
}

/// Group spans into baseline lines: sort by Y descending (PDF Y grows
/// upward) then X ascending, and merge spans within 30% of the font size.
fn group_spans_into_lines(mut spans: Vec<PlacedSpan>) -> Vec<PlacedLine> {
    if spans.is_empty() {
        return vec![];
    }

    spans.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<PlacedLine> = Vec::new();
    let mut current: Vec<PlacedSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(line_from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(line_from_spans(current));
    }

    lines
}

fn line_from_spans(mut spans: Vec<PlacedSpan>) -> PlacedLine {
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    PlacedLine {
        y: spans[0].y,
        spans,
    }
}

/// Merge lines and images into the page's block sequence, top to bottom.
fn merge_into_blocks(
    page: u32,
    lines: Vec<PlacedLine>,
    images: Vec<PlacedImage>,
) -> Vec<PageBlock> {
    enum Placed {
        Line(PlacedLine),
        Image(PlacedImage),
    }

    let mut entries: Vec<(f32, Placed)> = Vec::with_capacity(lines.len() + images.len());
    for line in lines {
        entries.push((line.y, Placed::Line(line)));
    }
    for image in images {
        entries.push((image.y, Placed::Image(image)));
    }
    // Stable sort: a line and an image at the same height keep text first.
    entries.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut blocks = Vec::new();
    let mut current = TextBlock::new(page);

    for (_, entry) in entries {
        match entry {
            Placed::Line(line) => {
                let spans = line.spans.into_iter().map(|s| s.text).collect();
                current.add_line(TextLine::new(spans));
            }
            Placed::Image(image) => {
                if !current.is_empty() {
                    blocks.push(PageBlock::Text(std::mem::replace(
                        &mut current,
                        TextBlock::new(page),
                    )));
                }
                blocks.push(PageBlock::Image(ImageBlock::new(page, image.data, image.ext)));
            }
        }
    }

    if !current.is_empty() {
        blocks.push(PageBlock::Text(current));
    }

    blocks
}

/// Text matrix for tracking position in a content stream.
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

    fn next_line(&mut self) {
        // Default leading; a TL operator would refine this.
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Graphics-state matrix (CTM), tracked for image placement.
#[derive(Debug, Clone, Copy)]
struct GraphicsMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for GraphicsMatrix {
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

impl GraphicsMatrix {
    fn from_operands(operands: &[PdfValue]) -> Self {
        Self {
            a: get_number_from_value(&operands[0]).unwrap_or(1.0),
            b: get_number_from_value(&operands[1]).unwrap_or(0.0),
            c: get_number_from_value(&operands[2]).unwrap_or(0.0),
            d: get_number_from_value(&operands[3]).unwrap_or(1.0),
            e: get_number_from_value(&operands[4]).unwrap_or(0.0),
            f: get_number_from_value(&operands[5]).unwrap_or(0.0),
        }
    }

    /// Concatenation: `self` applied before `other`.
    fn concat(&self, other: &GraphicsMatrix) -> GraphicsMatrix {
        GraphicsMatrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Highest device-space Y of the unit square under this matrix.
    ///
    /// Images paint the unit square, so this is the image's top edge.
    fn image_top(&self) -> f32 {
        let ys = [
            self.f,
            self.b + self.f,
            self.d + self.f,
            self.b + self.d + self.f,
        ];
        ys.into_iter().fold(f32::MIN, f32::max)
    }
}
