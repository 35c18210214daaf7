//! Tar stream extraction with link containment checks.
//!
//! `untar-core` materializes the entries of a tar stream (regular files,
//! directories, hard links, symbolic links and device nodes) under a
//! destination directory. Entry paths and link targets that would resolve
//! outside the destination are rejected, and entry modes are applied
//! verbatim without touching the process umask.
//!
//! The archive itself is decoded by the [`tar`] crate.
//!
//! # Examples
//!
//! ```no_run
//! use untar_core::extract_all;
//! use untar_core::extract_file_from_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut archive = tar::Archive::new(std::fs::File::open("image.tar")?);
//! let report = extract_all(&mut archive, "/tmp/image")?;
//! println!("Extracted {} files", report.files_extracted);
//!
//! let mut archive = tar::Archive::new(std::fs::File::open("image.tar")?);
//! let os_release = extract_file_from_archive(&mut archive, "etc/os-release")?;
//! println!("{}", String::from_utf8_lossy(&os_release));
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod device;
pub mod error;
pub mod extraction;
pub mod report;
pub mod security;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;

pub use tar;

// Re-export main API types
pub use api::extract_all;
pub use api::extract_entry;
pub use config::ExtractConfig;
pub use device::make_device;
pub use error::ExtractionError;
pub use error::Result;
pub use extraction::Extractor;
pub use extraction::extract_file_from_archive;
pub use report::ExtractionReport;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::EntryHeader;
pub use types::EntryKind;
