//! Rendering: serializing question records to the output document.

mod json;

pub use json::{to_json, JsonFormat};
