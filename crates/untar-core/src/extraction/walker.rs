//! Archive walker: applies every entry of a tar stream in order.

use std::io::Read;
use std::time::Instant;

use super::Extractor;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::Result;
use crate::types::EntryHeader;
use crate::types::EntryKind;
use crate::types::entry_type::raw_entry_path;

/// Type flag of a PAX global extended header.
const PAX_GLOBAL_HEADER: u8 = b'g';

impl Extractor {
    /// Extracts every entry of `archive` under the destination.
    ///
    /// Entries are applied strictly in stream order. The first failing entry
    /// stops the walk; entries extracted before it stay on disk.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveRead` if the stream cannot be decoded, or `Entry`
    /// wrapping the cause and the failing entry's path.
    pub fn extract_all<R: Read>(&self, archive: &mut tar::Archive<R>) -> Result<ExtractionReport> {
        let start = Instant::now();
        let mut report = ExtractionReport::new();

        tracing::info!(dest = %self.dest.as_path().display(), "extracting archive");

        let entries = archive
            .entries()
            .map_err(|source| ExtractionError::ArchiveRead { source })?;

        for entry in entries {
            let mut entry = entry.map_err(|source| ExtractionError::ArchiveRead { source })?;
            let header = EntryHeader::from_entry(&entry)
                .map_err(|e| e.in_entry(raw_entry_path(&entry)))?;

            if header.kind == EntryKind::Other(PAX_GLOBAL_HEADER) {
                tracing::debug!(path = %header.path.display(), "skipping pax global header");
                report.record(header.kind);
                continue;
            }

            if let Err(e) = self.extract_entry(&header, &mut entry, &mut report) {
                tracing::error!(path = %header.path.display(), error = %e, "extraction aborted");
                return Err(e.in_entry(header.path));
            }
        }

        report.duration = start.elapsed();
        tracing::info!(
            files = report.files_extracted,
            directories = report.directories_created,
            links = report.hardlinks_created + report.symlinks_created,
            devices = report.devices_created,
            bytes = report.bytes_written,
            elapsed_ms = report.duration.as_millis(),
            "extraction complete"
        );
        Ok(report)
    }
}
