//! File storage helpers
//!
//! Writes go through a sibling temp file and a rename.

pub mod file_io;

pub use file_io::{read_json, write_bytes_atomic, write_json_atomic, write_text_atomic};
