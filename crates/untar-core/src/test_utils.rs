//! In-memory tar fixtures for tests and benchmarks.
//!
//! Builders here go through the `tar` crate for well-formed entries. Names
//! the crate refuses to write (`..` components, absolute paths) are placed
//! into the header block directly by [`TarTestBuilder::add_raw_entry`], so
//! hostile archives can be reproduced too.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

/// Builder for creating TAR test archives with various entry types.
///
/// # Examples
///
/// ```
/// use untar_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_directory("dir/")
///     .add_file("dir/file.txt", b"content")
///     .add_symlink("link", "dir/file.txt")
///     .build();
/// assert_eq!(tar_data.len() % 512, 0);
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file with mode 0o644.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with custom mode.
    #[must_use]
    pub fn add_file_with_mode(mut self, path: &str, data: &[u8], mode: u32) -> Self {
        let mut header = header(tar::EntryType::Regular, mode);
        header.set_size(data.len() as u64);
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a directory with mode 0o755.
    #[must_use]
    pub fn add_directory(self, path: &str) -> Self {
        self.add_directory_with_mode(path, 0o755)
    }

    /// Adds a directory with custom mode.
    #[must_use]
    pub fn add_directory_with_mode(mut self, path: &str, mode: u32) -> Self {
        let mut header = header(tar::EntryType::Directory, mode);
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a symlink storing `target` verbatim.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = header(tar::EntryType::Symlink, 0o777);
        self.builder.append_link(&mut header, path, target).unwrap();
        self
    }

    /// Adds a hardlink to `target`, a name relative to the archive root.
    #[must_use]
    pub fn add_hardlink(mut self, path: &str, target: &str) -> Self {
        let mut header = header(tar::EntryType::Link, 0o644);
        self.builder.append_link(&mut header, path, target).unwrap();
        self
    }

    /// Adds a character device node with mode 0o666.
    #[must_use]
    pub fn add_char_device(self, path: &str, major: u32, minor: u32) -> Self {
        self.add_device(path, tar::EntryType::Char, major, minor)
    }

    /// Adds a block device node with mode 0o660.
    #[must_use]
    pub fn add_block_device(self, path: &str, major: u32, minor: u32) -> Self {
        self.add_device(path, tar::EntryType::Block, major, minor)
    }

    fn add_device(mut self, path: &str, kind: tar::EntryType, major: u32, minor: u32) -> Self {
        let mode = if kind == tar::EntryType::Char { 0o666 } else { 0o660 };
        let mut header = header(kind, mode);
        header.set_device_major(major).unwrap();
        header.set_device_minor(minor).unwrap();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds an empty entry of an arbitrary type, such as a FIFO.
    #[must_use]
    pub fn add_entry_type(mut self, path: &str, kind: tar::EntryType) -> Self {
        let mut header = header(kind, 0o644);
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds an entry with its name and link name copied byte for byte into
    /// the header, bypassing the path checks of `tar::Builder`.
    ///
    /// Both names must fit in the 100-byte ustar fields.
    #[must_use]
    pub fn add_raw_entry(
        mut self,
        path: &str,
        kind: tar::EntryType,
        link_target: Option<&str>,
        data: &[u8],
    ) -> Self {
        let mut header = header(kind, 0o644);
        header.set_size(data.len() as u64);
        {
            let old = header.as_old_mut();
            old.name[..path.len()].copy_from_slice(path.as_bytes());
            if let Some(target) = link_target {
                old.linkname[..target.len()].copy_from_slice(target.as_bytes());
            }
        }
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Builds and returns the TAR archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn header(kind: tar::EntryType, mode: u32) -> tar::Header {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(kind);
    header.set_size(0);
    header.set_mode(mode);
    header
}
