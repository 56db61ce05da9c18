//! Tagged images produced by the stream classifier.

use std::fmt;

/// How an image relates to the question text seen most recently before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// The image belongs to the question body.
    Question,

    /// The image belongs to an answer option.
    Option,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRole::Question => write!(f, "question"),
            ImageRole::Option => write!(f, "option"),
        }
    }
}

/// An image plus the classifier state active when it was encountered.
///
/// Created at classification time, consumed exactly once by the assembler,
/// which persists the payload to disk and records the resulting path.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedImage {
    /// Question number parsed from the surrounding text at tag time.
    pub question_number: u32,

    /// Role of the most recent text fragment before the image.
    pub role: ImageRole,

    /// Option letter active when the image appeared.
    pub option_letter: char,

    /// Page number (1-indexed).
    pub page: u32,

    /// Document-global image counter; never resets.
    pub sequence: u32,

    /// Raw payload.
    pub data: Vec<u8>,

    /// File extension hint.
    pub ext: String,
}

impl TaggedImage {
    /// Synthesize the on-disk file name encoding the tag.
    ///
    /// Question images become `img_q{N}_{seq}.{ext}`, option images
    /// `q{N}_option{L}_{seq}.{ext}`.
    pub fn file_name(&self) -> String {
        match self.role {
            ImageRole::Question => format!(
                "img_q{}_{}.{}",
                self.question_number, self.sequence, self.ext
            ),
            ImageRole::Option => format!(
                "q{}_option{}_{}.{}",
                self.question_number, self.option_letter, self.sequence, self.ext
            ),
        }
    }

    /// Whether the tag claims the given record number.
    ///
    /// Compares the parsed integer field, so question 1 never claims an
    /// image tagged for question 10.
    pub fn belongs_to(&self, record_number: u32) -> bool {
        self.question_number == record_number
    }
}
