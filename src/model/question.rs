//! The serialized question record.

use serde::{Deserialize, Serialize};

/// One extracted question with its attached image paths.
///
/// `question_number` is assigned by assembly order starting at 1, not taken
/// from the numeral printed in the document. Records are immutable once
/// built and serialize directly into `questions_structured.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Position of the question in the document, starting at 1.
    pub question_number: u32,

    /// Cleaned question text.
    pub question: String,

    /// Stored paths of images belonging to the question body, in order.
    pub question_images: Vec<String>,

    /// Stored paths of images belonging to the answer options, in order.
    pub option_images: Vec<String>,
}

impl QuestionRecord {
    /// Create a record with no images attached yet.
    pub fn new(question_number: u32, question: impl Into<String>) -> Self {
        Self {
            question_number,
            question: question.into(),
            question_images: Vec::new(),
            option_images: Vec::new(),
        }
    }
}
