//! PDF parsing: turns a document into the ordered block stream the
//! classifier consumes.

mod backend;
mod layout;

pub use backend::{BlockSource, LopdfBackend, PageId};
