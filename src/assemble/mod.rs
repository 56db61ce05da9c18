//! Question assembly: re-segment the classified text into question spans,
//! clean them, and attach persisted images in record order.

mod cleanup;

pub use cleanup::{CleanupPipeline, CleanupRule, Truncation};

use std::fs;
use std::path::Path;

use log::warn;
use regex::Regex;

use crate::error::Result;
use crate::model::{ImageRole, QuestionRecord, TaggedImage};

/// The question assembler.
///
/// Splits the joined text on the question-boundary pattern, numbers the
/// resulting spans positionally (the printed numeral is captured but not
/// trusted), cleans each span, and walks the tagged image list with a
/// monotonically advancing cursor to attach images to records.
pub struct Assembler {
    boundary: Regex,
    cleanup: CleanupPipeline,
}

impl Assembler {
    /// Create an assembler with the standard boundary pattern and cleanup.
    pub fn new() -> Self {
        Self {
            // One or two digits, a period, one whitespace, at the start of
            // the text or of a line. Three-digit numerals never open a span.
            boundary: Regex::new(r"(?:^|\n)(\d{1,2})\.\s").unwrap(),
            cleanup: CleanupPipeline::new(),
        }
    }

    /// Build the ordered question records and persist their images under
    /// `image_dir`.
    ///
    /// Records are numbered 1..N by position. Images are consumed in order:
    /// each record's walk persists the image at the cursor, claims it when
    /// its tag matches the record number (question or option list per its
    /// role), and stops without advancing at the first foreign tag, leaving
    /// that image for the next record.
    pub fn assemble(
        &self,
        combined_text: &str,
        images: &[TaggedImage],
        image_dir: &Path,
    ) -> Result<Vec<QuestionRecord>> {
        let spans = self.split_spans(combined_text);
        let mut records = Vec::with_capacity(spans.len());
        let mut cursor = 0usize;

        for (index, raw) in spans.iter().enumerate() {
            let record_number = index as u32 + 1;
            let mut record = QuestionRecord::new(record_number, self.cleanup.clean(raw));
            self.attach_images(&mut record, images, &mut cursor, image_dir)?;
            records.push(record);
        }

        if cursor < images.len() {
            warn!(
                "{} trailing image(s) left unclaimed by any record",
                images.len() - cursor
            );
        }

        Ok(records)
    }

    /// Raw question bodies between boundary matches.
    ///
    /// Text before the first boundary is dropped; no boundary at all means
    /// no records.
    fn split_spans<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let matches: Vec<_> = self.boundary.find_iter(text).collect();
        let mut spans = Vec::with_capacity(matches.len());
        for (i, m) in matches.iter().enumerate() {
            let end = matches.get(i + 1).map_or(text.len(), |next| next.start());
            spans.push(text[m.end()..end].trim());
        }
        spans
    }

    /// Advance the image cursor for one record.
    ///
    /// Every visited image is written to disk first, including the foreign
    /// one that stops the walk; that one stays at the cursor and is written
    /// again, byte-identical, by the next record's walk.
    fn attach_images(
        &self,
        record: &mut QuestionRecord,
        images: &[TaggedImage],
        cursor: &mut usize,
        image_dir: &Path,
    ) -> Result<()> {
        while let Some(image) = images.get(*cursor) {
            let path = image_dir.join(image.file_name());
            fs::write(&path, &image.data)?;

            if !image.belongs_to(record.question_number) {
                break;
            }

            let stored = path.display().to_string();
            match image.role {
                ImageRole::Question => record.question_images.push(stored),
                ImageRole::Option => record.option_images.push(stored),
            }
            *cursor += 1;
        }
        Ok(())
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_spans_between_boundaries() {
        let assembler = Assembler::new();
        let text = "1. first body\nfiller\n2. second body";
        let spans = assembler.split_spans(text);
        assert_eq!(spans, vec!["first body\nfiller", "second body"]);
    }

    #[test]
    fn test_split_spans_drops_preamble() {
        let assembler = Assembler::new();
        let text = "EXAM PAPER 2024\n1. only question";
        let spans = assembler.split_spans(text);
        assert_eq!(spans, vec!["only question"]);
    }

    #[test]
    fn test_split_spans_ignores_three_digit_numerals() {
        let assembler = Assembler::new();
        let spans = assembler.split_spans("123. not a boundary");
        assert!(spans.is_empty());
    }

    #[test]
    fn test_no_boundaries_yields_no_records() {
        let assembler = Assembler::new();
        let records = assembler
            .assemble("no questions here", &[], Path::new("unused"))
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_records_numbered_by_position_not_printed_numeral() {
        let assembler = Assembler::new();
        let records = assembler
            .assemble("7. out of order\n9. also skewed", &[], Path::new("unused"))
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question_number, 1);
        assert_eq!(records[0].question, "out of order");
        assert_eq!(records[1].question_number, 2);
        assert_eq!(records[1].question, "also skewed");
    }

    #[test]
    fn test_two_question_paper() {
        let assembler = Assembler::new();
        let text = "1. What is 2+2?\n[A] 3\n[B] 4\nAns [B]\n\
                    2. What is the capital of France?\n[A] Paris\n[B] Lyon\nAns [A]";
        let records = assembler.assemble(text, &[], Path::new("unused")).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "What is 2+2?");
        assert_eq!(records[1].question, "What is the capital of France?");
        assert!(records.iter().all(|r| r.question_images.is_empty()));
        assert!(records.iter().all(|r| r.option_images.is_empty()));
    }
}
