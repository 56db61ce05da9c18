//! Stream classification: fold the ordered block stream into a flat text
//! timeline plus context-tagged images.
//!
//! The classifier tracks which question and option the reader is "inside"
//! at every point of the document. Text fragments move the state; images
//! are tagged with whatever state is active when they appear.

use log::debug;
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{ImageBlock, ImageRole, PageBlock, TaggedImage};

/// Accumulator threaded through the classification fold.
///
/// Returned from each observation rather than mutated in place, so a state
/// transition is an ordinary value computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierState {
    /// Question number most recently parsed from the text.
    pub question_number: u32,

    /// Option letter most recently parsed from the text.
    pub option_letter: char,

    /// Role governing how the next image is tagged.
    pub role: ImageRole,
}

impl Default for ClassifierState {
    fn default() -> Self {
        Self {
            question_number: 1,
            option_letter: 'A',
            role: ImageRole::Question,
        }
    }
}

impl ClassifierState {
    /// Tag an image block with the current context.
    fn tag_image(&self, block: &ImageBlock, sequence: u32) -> TaggedImage {
        TaggedImage {
            question_number: self.question_number,
            role: self.role,
            option_letter: self.option_letter,
            page: block.page,
            sequence,
            data: block.data.clone(),
            ext: block.ext.clone(),
        }
    }
}

/// Output of classification: the flat text timeline and the tagged images.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedStream {
    /// First-span text of every consumed line, in document order.
    pub flat_text: Vec<String>,

    /// Images in encounter order, tagged with the state at encounter time.
    pub images: Vec<TaggedImage>,
}

impl ClassifiedStream {
    /// The newline-joined document the assembler re-segments.
    pub fn joined_text(&self) -> String {
        self.flat_text.join("\n")
    }
}

/// The stream classifier: precompiled patterns plus the fold.
pub struct Classifier {
    question: Regex,
    option: Regex,
}

impl Classifier {
    /// Create a classifier with the question-start and option-label patterns.
    pub fn new() -> Self {
        Self {
            // Numeral followed by a period not immediately followed by a
            // line break ("12. ..." but not "12.\n").
            question: Regex::new(r"\b(\d+)\.(?:[^\n]|$)").unwrap(),
            option: Regex::new(r"\[([A-D])\]").unwrap(),
        }
    }

    /// Advance the state by one text fragment.
    ///
    /// Both patterns are checked independently; a fragment carrying both a
    /// question start and an option label updates the number and the
    /// letter, and the option match (checked second) decides the role.
    pub fn observe(&self, mut state: ClassifierState, fragment: &str) -> ClassifierState {
        if let Some(caps) = self.question.captures(fragment) {
            if let Ok(number) = caps[1].parse::<u32>() {
                state.question_number = number;
            }
            state.role = ImageRole::Question;
        }
        if let Some(caps) = self.option.captures(fragment) {
            if let Some(letter) = caps[1].chars().next() {
                state.option_letter = letter;
            }
            state.role = ImageRole::Option;
        }
        state
    }

    /// Fold the block stream left to right.
    ///
    /// Text lines feed the flat text and move the state; image blocks are
    /// tagged with the state active at that moment. The image counter is
    /// global across the whole document and never resets.
    pub fn classify(&self, blocks: &[PageBlock]) -> Result<ClassifiedStream> {
        let mut state = ClassifierState::default();
        let mut stream = ClassifiedStream::default();
        let mut counter: u32 = 0;

        for block in blocks {
            match block {
                PageBlock::Text(text_block) => {
                    for line in &text_block.lines {
                        let Some(first) = line.first_span() else {
                            return Err(Error::MalformedBlock(format!(
                                "page {}: text line without spans",
                                text_block.page
                            )));
                        };
                        if first.is_empty() {
                            continue;
                        }
                        stream.flat_text.push(first.to_string());
                        state = self.observe(state, first);
                    }
                }
                PageBlock::Image(image_block) => {
                    let tagged = state.tag_image(image_block, counter);
                    debug!("image {} tagged as {}", counter, tagged.file_name());
                    stream.images.push(tagged);
                    counter += 1;
                }
            }
        }

        debug!(
            "classified {} text lines and {} images",
            stream.flat_text.len(),
            stream.images.len()
        );
        Ok(stream)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
