//! High-level public API for tar extraction.
//!
//! These functions use [`ExtractConfig::default`], which reproduces every
//! entry kind the archive describes. Build an [`Extractor`] to choose a
//! different policy.

use std::io::Read;
use std::path::Path;

use crate::ExtractConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::extraction::Extractor;
use crate::types::EntryHeader;

/// Extracts every entry of `archive` under `output_dir`.
///
/// # Arguments
///
/// * `archive` - Tar reader positioned at the first entry
/// * `output_dir` - Directory the entries are materialized under; created
///   on demand
///
/// # Errors
///
/// Returns an error if:
/// - The archive stream cannot be decoded
/// - An entry or link target resolves outside `output_dir`
/// - An entry has a type with no filesystem counterpart
/// - I/O operations fail
///
/// The error names the failing entry. Entries extracted before it are left
/// on disk.
///
/// # Examples
///
/// ```no_run
/// use untar_core::extract_all;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("rootfs.tar")?;
/// let mut archive = tar::Archive::new(file);
/// let report = extract_all(&mut archive, "/tmp/rootfs")?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_all<R: Read, P: AsRef<Path>>(
    archive: &mut tar::Archive<R>,
    output_dir: P,
) -> Result<ExtractionReport> {
    Extractor::new(output_dir, ExtractConfig::default()).extract_all(archive)
}

/// Extracts one entry under `output_dir`, reading file content from
/// `content`.
///
/// # Errors
///
/// Same conditions as [`extract_all`], for this entry only.
///
/// # Examples
///
/// ```no_run
/// use untar_core::extract_entry;
/// use untar_core::types::EntryHeader;
/// use untar_core::types::EntryKind;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let header = EntryHeader::new("etc/motd", EntryKind::File, 0o644);
/// extract_entry(&header, &mut &b"welcome\n"[..], "/tmp/rootfs")?;
/// # Ok(())
/// # }
/// ```
pub fn extract_entry<R: Read + ?Sized, P: AsRef<Path>>(
    header: &EntryHeader,
    content: &mut R,
    output_dir: P,
) -> Result<()> {
    let mut report = ExtractionReport::new();
    Extractor::new(output_dir, ExtractConfig::default()).extract_entry(header, content, &mut report)
}
