//! # pdfquest
//!
//! Extract exam-style questions, together with their images, from PDF
//! papers into structured JSON.
//!
//! The pipeline reads a document's layout blocks in order, classifies each
//! text fragment and image against the running question/option state,
//! re-segments the text into per-question spans, scrubs option lines and
//! answer keys from each span, and writes one record per question with the
//! images that belong to its body and to its options.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfquest::Extractor;
//!
//! fn main() -> pdfquest::Result<()> {
//!     let json_path = Extractor::open("exam.pdf", "output")?.extract()?;
//!     println!("questions saved to {}", json_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Output layout
//!
//! - `{output_dir}/images/`: one file per extracted image, named
//!   `img_q{N}_{counter}.{ext}` for question images and
//!   `q{N}_option{L}_{counter}.{ext}` for option images
//! - `{output_dir}/questions_structured.json`: the ordered record list
//!
//! ## Features
//!
//! - **Stateful stream classification**: question/option context tracked
//!   across pages as an explicit fold
//! - **Positional numbering**: records are numbered by assembly order, not
//!   by the numerals printed in the paper
//! - **Auditable cleanup**: an explicit ordered rule list scrubs each span
//!   in one deterministic pass
//! - **Pure-Rust PDF access**: `lopdf` behind a swappable block source

pub mod assemble;
pub mod classify;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use assemble::{Assembler, CleanupPipeline, CleanupRule, Truncation};
pub use classify::{ClassifiedStream, Classifier, ClassifierState};
pub use error::{Error, Result};
pub use extract::{extract_records, Extractor};
pub use model::{
    ImageBlock, ImageRole, PageBlock, QuestionRecord, TaggedImage, TextBlock, TextLine,
};
pub use parser::{BlockSource, LopdfBackend};
pub use render::{to_json, JsonFormat};

use std::io::Read;
use std::path::{Path, PathBuf};

/// Extract questions from a PDF file into an output directory.
///
/// # Arguments
///
/// * `pdf_path` - Path to the PDF file
/// * `output_dir` - Directory receiving `images/` and the JSON document
///
/// # Returns
///
/// A `Result` containing the path of the written JSON file.
///
/// # Example
///
/// ```no_run
/// use pdfquest::extract_file;
///
/// let json_path = extract_file("exam.pdf", "output").unwrap();
/// println!("saved to {}", json_path.display());
/// ```
pub fn extract_file<P: AsRef<Path>, Q: AsRef<Path>>(
    pdf_path: P,
    output_dir: Q,
) -> Result<PathBuf> {
    Extractor::open(pdf_path, output_dir)?.extract()
}

/// Extract questions from in-memory PDF data.
///
/// # Arguments
///
/// * `data` - PDF file content as bytes
/// * `output_dir` - Directory receiving `images/` and the JSON document
///
/// # Example
///
/// ```no_run
/// use pdfquest::extract_bytes;
///
/// let data = std::fs::read("exam.pdf").unwrap();
/// let json_path = extract_bytes(&data, "output").unwrap();
/// ```
pub fn extract_bytes<Q: AsRef<Path>>(data: &[u8], output_dir: Q) -> Result<PathBuf> {
    Extractor::from_bytes(data, output_dir)?.extract()
}

/// Extract questions from a reader.
///
/// # Example
///
/// ```no_run
/// use pdfquest::extract_reader;
/// use std::fs::File;
///
/// let file = File::open("exam.pdf").unwrap();
/// let json_path = extract_reader(file, "output").unwrap();
/// ```
pub fn extract_reader<R: Read, Q: AsRef<Path>>(reader: R, output_dir: Q) -> Result<PathBuf> {
    Extractor::from_reader(reader, output_dir)?.extract()
}
