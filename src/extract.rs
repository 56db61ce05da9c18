//! The extraction pipeline: document in, images and structured JSON out.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;

use crate::assemble::Assembler;
use crate::classify::Classifier;
use crate::error::Result;
use crate::model::QuestionRecord;
use crate::parser::{BlockSource, LopdfBackend};
use crate::render::{to_json, JsonFormat};

/// Run classification and assembly over any block source, persisting
/// images under `image_dir`.
///
/// This is the document-independent core: [`Extractor`] drives it with a
/// PDF backend, tests drive it with injected block sequences.
pub fn extract_records(
    source: &impl BlockSource,
    image_dir: &Path,
) -> Result<Vec<QuestionRecord>> {
    let blocks = source.blocks()?;
    debug!("source yielded {} blocks", blocks.len());

    let stream = Classifier::new().classify(&blocks)?;
    Assembler::new().assemble(&stream.joined_text(), &stream.images, image_dir)
}

/// Extracts exam questions from one document into an output directory.
///
/// Output layout: `{output_dir}/images/` holds one file per extracted
/// image and `{output_dir}/questions_structured.json` holds the ordered
/// record list. Both are created on [`extract`](Self::extract).
pub struct Extractor {
    backend: LopdfBackend,
    output_dir: PathBuf,
    image_dir: PathBuf,
    json_path: PathBuf,
    json_format: JsonFormat,
}

impl Extractor {
    /// Open a PDF file for extraction into `output_dir`.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(pdf_path: P, output_dir: Q) -> Result<Self> {
        Ok(Self::with_backend(
            LopdfBackend::load_file(pdf_path)?,
            output_dir,
        ))
    }

    /// Extract from an in-memory PDF.
    pub fn from_bytes<Q: AsRef<Path>>(data: &[u8], output_dir: Q) -> Result<Self> {
        Ok(Self::with_backend(
            LopdfBackend::load_bytes(data)?,
            output_dir,
        ))
    }

    /// Extract from a reader.
    pub fn from_reader<R: Read, Q: AsRef<Path>>(reader: R, output_dir: Q) -> Result<Self> {
        Ok(Self::with_backend(
            LopdfBackend::load_reader(reader)?,
            output_dir,
        ))
    }

    fn with_backend(backend: LopdfBackend, output_dir: impl AsRef<Path>) -> Self {
        let output_dir = output_dir.as_ref().to_path_buf();
        let image_dir = output_dir.join("images");
        let json_path = output_dir.join("questions_structured.json");
        Self {
            backend,
            output_dir,
            image_dir,
            json_path,
            json_format: JsonFormat::default(),
        }
    }

    /// Set the JSON output format (pretty-printed by default).
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// The output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where images are persisted.
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Where the JSON document is written.
    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    /// Run the full pipeline and return the path of the written JSON file.
    ///
    /// Creates the output directory and its `images` subdirectory if
    /// absent; the `images` directory exists afterwards even when the
    /// document contains no images.
    pub fn extract(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.image_dir)?;

        let records = extract_records(&self.backend, &self.image_dir)?;
        let json = to_json(&records, self.json_format)?;
        fs::write(&self.json_path, json)?;

        debug!(
            "wrote {} question(s) to {}",
            records.len(),
            self.json_path.display()
        );
        Ok(self.json_path.clone())
    }
}
