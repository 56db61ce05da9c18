//! Data model for the extraction pipeline.
//!
//! These types form the intermediate representation between PDF parsing
//! and question assembly: an ordered stream of page blocks goes in, tagged
//! images and question records come out.

mod block;
mod image;
mod question;

pub use block::{ImageBlock, PageBlock, TextBlock, TextLine};
pub use image::{ImageRole, TaggedImage};
pub use question::QuestionRecord;
