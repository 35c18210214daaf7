//! Extraction of tar entries onto the filesystem.

mod engine;
mod entry;
mod fs;
mod lookup;
mod walker;

pub use engine::Extractor;
pub use lookup::extract_file_from_archive;
