//! Extraction statistics.

use std::time::Duration;

use crate::types::EntryKind;

/// Report of one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Regular files written.
    pub files_extracted: usize,

    /// Directory entries applied.
    pub directories_created: usize,

    /// Hard links created.
    pub hardlinks_created: usize,

    /// Symbolic links created.
    pub symlinks_created: usize,

    /// Character and block device nodes created.
    pub devices_created: usize,

    /// Metadata-only entries passed over (PAX global headers).
    pub entries_skipped: usize,

    /// Bytes of file content written.
    pub bytes_written: u64,

    /// Wall time of the call.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one created object of the given kind.
    pub fn record(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::File => self.files_extracted += 1,
            EntryKind::Directory => self.directories_created += 1,
            EntryKind::Hardlink => self.hardlinks_created += 1,
            EntryKind::Symlink => self.symlinks_created += 1,
            EntryKind::CharDevice | EntryKind::BlockDevice => self.devices_created += 1,
            EntryKind::Other(_) => self.entries_skipped += 1,
        }
    }

    /// Returns the number of filesystem objects created.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted
            + self.directories_created
            + self.hardlinks_created
            + self.symlinks_created
            + self.devices_created
    }
}
