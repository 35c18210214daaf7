//! Archive entry kinds and decoded entry headers.

use std::io::Read;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;

/// Kind of filesystem object an archive entry describes.
///
/// The set is closed: every tar type flag without a filesystem counterpart
/// here lands in [`EntryKind::Other`] with its raw flag byte, and the entry
/// extractor refuses it.
///
/// # Examples
///
/// ```
/// use untar_core::types::EntryKind;
///
/// assert_eq!(EntryKind::from(tar::EntryType::Regular), EntryKind::File);
/// assert_eq!(EntryKind::from(tar::EntryType::Fifo), EntryKind::Other(b'6'));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Hard link to an earlier entry.
    Hardlink,
    /// Symbolic link.
    Symlink,
    /// Character device node.
    CharDevice,
    /// Block device node.
    BlockDevice,
    /// Any other type flag, kept raw.
    Other(u8),
}

impl EntryKind {
    /// Returns the tar type flag for this kind.
    #[must_use]
    pub const fn type_flag(self) -> u8 {
        match self {
            Self::File => b'0',
            Self::Hardlink => b'1',
            Self::Symlink => b'2',
            Self::CharDevice => b'3',
            Self::BlockDevice => b'4',
            Self::Directory => b'5',
            Self::Other(flag) => flag,
        }
    }

    /// Returns `true` for character and block devices.
    #[must_use]
    pub const fn is_device(self) -> bool {
        matches!(self, Self::CharDevice | Self::BlockDevice)
    }
}

impl From<tar::EntryType> for EntryKind {
    fn from(entry_type: tar::EntryType) -> Self {
        match entry_type {
            // covers both '0' and the pre-POSIX NUL flag
            tar::EntryType::Regular => Self::File,
            tar::EntryType::Directory => Self::Directory,
            tar::EntryType::Link => Self::Hardlink,
            tar::EntryType::Symlink => Self::Symlink,
            tar::EntryType::Char => Self::CharDevice,
            tar::EntryType::Block => Self::BlockDevice,
            other => Self::Other(other.as_byte()),
        }
    }
}

/// Metadata of one archive entry, decoded from the tar stream.
///
/// The extractor only ever reads these fields. `link_target` is meaningful
/// for links, the device numbers for device nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Path of the entry inside the archive.
    pub path: PathBuf,
    /// What the entry describes.
    pub kind: EntryKind,
    /// Permission bits, including setuid/setgid/sticky.
    pub mode: u32,
    /// Raw link target as recorded in the archive.
    pub link_target: Option<PathBuf>,
    /// Device major number.
    pub device_major: Option<u32>,
    /// Device minor number.
    pub device_minor: Option<u32>,
    /// Size of the entry content in bytes.
    pub size: u64,
}

impl EntryHeader {
    /// Creates a header with no link target, device numbers or content.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind, mode: u32) -> Self {
        Self {
            path: path.into(),
            kind,
            mode: mode & 0o7777,
            link_target: None,
            device_major: None,
            device_minor: None,
            size: 0,
        }
    }

    /// Sets the link target.
    #[must_use]
    pub fn with_link_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.link_target = Some(target.into());
        self
    }

    /// Sets the device numbers.
    #[must_use]
    pub fn with_device(mut self, major: u32, minor: u32) -> Self {
        self.device_major = Some(major);
        self.device_minor = Some(minor);
        self
    }

    /// Sets the content size.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Decodes the header of a tar entry.
    ///
    /// Long names and PAX path overrides are honoured because the path and
    /// link name come from the entry rather than the raw header block.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveRead` if a header field cannot be decoded.
    pub fn from_entry<R: Read>(entry: &tar::Entry<'_, R>) -> Result<Self> {
        let header = entry.header();
        let kind = EntryKind::from(header.entry_type());

        let path = entry.path().map_err(archive_read)?.into_owned();
        let mode = header.mode().map_err(archive_read)? & 0o7777;
        let link_target = entry
            .link_name()
            .map_err(archive_read)?
            .map(std::borrow::Cow::into_owned);

        let (device_major, device_minor) = if kind.is_device() {
            (
                header.device_major().map_err(archive_read)?,
                header.device_minor().map_err(archive_read)?,
            )
        } else {
            (None, None)
        };

        Ok(Self {
            path,
            kind,
            mode,
            link_target,
            device_major,
            device_minor,
            size: entry.size(),
        })
    }
}

/// Path of a tar entry for error context, decoded lossily so it is available
/// even when the header cannot be decoded properly.
pub(crate) fn raw_entry_path<R: Read>(entry: &tar::Entry<'_, R>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&entry.path_bytes()).into_owned())
}

fn archive_read(source: std::io::Error) -> ExtractionError {
    ExtractionError::ArchiveRead { source }
}
