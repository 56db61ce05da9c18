//! Page blocks: the ordered units the classifier consumes.

/// A single line of text, as a sequence of spans.
///
/// Spans are text runs in reading order. Classification only ever looks at
/// the first span of a line, which carries the line's leading text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    /// Text runs in reading order.
    pub spans: Vec<String>,
}

impl TextLine {
    /// Create a line from its spans.
    pub fn new(spans: Vec<String>) -> Self {
        Self { spans }
    }

    /// Create a line holding a single span.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            spans: vec![text.into()],
        }
    }

    /// The first span's text, if the line has any spans at all.
    pub fn first_span(&self) -> Option<&str> {
        self.spans.first().map(|s| s.as_str())
    }
}

/// A run of consecutive text lines on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Page number (1-indexed).
    pub page: u32,

    /// Lines in top-to-bottom order.
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    /// Create an empty text block for a page.
    pub fn new(page: u32) -> Self {
        Self {
            page,
            lines: Vec::new(),
        }
    }

    /// Append a line to the block.
    pub fn add_line(&mut self, line: TextLine) {
        self.lines.push(line);
    }

    /// Check whether the block has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// An embedded image placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    /// Page number (1-indexed).
    pub page: u32,

    /// Raw image payload as stored in the document.
    pub data: Vec<u8>,

    /// File extension hint ("jpg", "png", ...).
    pub ext: String,
}

impl ImageBlock {
    /// Create an image block.
    pub fn new(page: u32, data: Vec<u8>, ext: impl Into<String>) -> Self {
        Self {
            page,
            data,
            ext: ext.into(),
        }
    }

    /// Guess a file extension from the payload's magic bytes.
    pub fn sniff_extension(data: &[u8]) -> Option<&'static str> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some("jpg")
        } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some("png")
        } else if data.starts_with(b"GIF8") {
            Some("gif")
        } else if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20]) {
            Some("jp2")
        } else if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            Some("tiff")
        } else if data.starts_with(b"BM") {
            Some("bmp")
        } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            Some("webp")
        } else {
            None
        }
    }
}

/// One atomic unit from a page, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBlock {
    /// A run of text lines.
    Text(TextBlock),

    /// An embedded image.
    Image(ImageBlock),
}

impl PageBlock {
    /// Page number the block sits on.
    pub fn page(&self) -> u32 {
        match self {
            PageBlock::Text(block) => block.page,
            PageBlock::Image(block) => block.page,
        }
    }

    /// Check if this block is text.
    pub fn is_text(&self) -> bool {
        matches!(self, PageBlock::Text(_))
    }

    /// Check if this block is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, PageBlock::Image(_))
    }
}
