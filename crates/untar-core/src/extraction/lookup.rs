//! Single-file lookup: reads one regular file out of an archive into memory.

use std::io::Read;
use std::path::Path;

use crate::ExtractionError;
use crate::Result;
use crate::security::normalize;
use crate::types::EntryKind;
use crate::types::entry_type::raw_entry_path;

/// Returns the content of the regular file `wanted` inside `archive`.
///
/// Names are compared after lexical normalization, so `./a/b.txt` finds
/// `a/b.txt`. Entries before the match are skipped without being written
/// anywhere. The archive is consumed up to and including the match.
///
/// # Errors
///
/// - `NotAFile` if the first entry with a matching name is not a regular
///   file; the scan stops there
/// - `NotFound` if no entry matches
/// - `ArchiveRead` if the stream cannot be decoded, wrapped in `Entry` with
///   the entry's name when the failure belongs to one
///
/// # Examples
///
/// ```
/// use untar_core::extract_file_from_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut builder = tar::Builder::new(Vec::new());
/// let mut header = tar::Header::new_gnu();
/// header.set_size(5);
/// header.set_mode(0o644);
/// builder.append_data(&mut header, "a/b.txt", &b"hello"[..])?;
/// let data = builder.into_inner()?;
///
/// let mut archive = tar::Archive::new(data.as_slice());
/// let content = extract_file_from_archive(&mut archive, "./a/b.txt")?;
/// assert_eq!(content, b"hello");
/// # Ok(())
/// # }
/// ```
pub fn extract_file_from_archive<R: Read>(
    archive: &mut tar::Archive<R>,
    wanted: impl AsRef<Path>,
) -> Result<Vec<u8>> {
    let wanted = wanted.as_ref();
    let wanted_normalized = normalize(wanted);

    let entries = archive
        .entries()
        .map_err(|source| ExtractionError::ArchiveRead { source })?;

    for entry in entries {
        let mut entry = entry.map_err(|source| ExtractionError::ArchiveRead { source })?;
        let path = entry.path().map_err(|source| {
            ExtractionError::ArchiveRead { source }.in_entry(raw_entry_path(&entry))
        })?;
        if normalize(&path) != wanted_normalized {
            continue;
        }

        let kind = EntryKind::from(entry.header().entry_type());
        if kind != EntryKind::File {
            return Err(ExtractionError::NotAFile {
                path: wanted.to_path_buf(),
                entry_type: kind.type_flag(),
            });
        }

        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .map_err(|source| ExtractionError::ArchiveRead { source }.in_entry(wanted))?;
        tracing::debug!(path = %wanted.display(), bytes = content.len(), "read file from archive");
        return Ok(content);
    }

    Err(ExtractionError::NotFound {
        path: wanted.to_path_buf(),
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;

    fn sample() -> Vec<u8> {
        TarTestBuilder::new()
            .add_file("a/b.txt", b"hello")
            .add_directory("a/")
            .add_symlink("a/link", "b.txt")
            .build()
    }

    fn lookup(wanted: &str) -> Result<Vec<u8>> {
        let data = sample();
        let mut archive = tar::Archive::new(data.as_slice());
        extract_file_from_archive(&mut archive, wanted)
    }

    #[test]
    fn test_finds_regular_file() {
        assert_eq!(lookup("a/b.txt").unwrap(), b"hello");
        assert_eq!(lookup("./a//b.txt").unwrap(), b"hello");
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let err = lookup("a/").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::NotAFile { entry_type: b'5', .. }
        ));
        assert!(matches!(lookup("a").unwrap_err(), ExtractionError::NotAFile { .. }));
    }

    #[test]
    fn test_symlink_is_not_a_file() {
        let err = lookup("a/link").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::NotAFile { entry_type: b'2', .. }
        ));
    }

    #[test]
    fn test_missing() {
        let err = lookup("missing").unwrap_err();
        assert!(matches!(err, ExtractionError::NotFound { ref path } if path == Path::new("missing")));
    }

    /// Serves `data` up to `limit` bytes, then fails every read.
    struct FailingReader {
        data: Vec<u8>,
        pos: usize,
        limit: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.limit {
                return Err(std::io::Error::other("device went away"));
            }
            let end = self.limit.min(self.pos + buf.len());
            let n = end - self.pos;
            buf[..n].copy_from_slice(&self.data[self.pos..end]);
            self.pos = end;
            Ok(n)
        }
    }

    #[test]
    fn test_content_read_failure_names_entry() {
        let data = TarTestBuilder::new().add_file("big.bin", &[7u8; 4096]).build();
        let reader = FailingReader {
            data,
            pos: 0,
            limit: 512 + 100,
        };
        let mut archive = tar::Archive::new(reader);

        let err = extract_file_from_archive(&mut archive, "big.bin").unwrap_err();

        assert_eq!(err.entry_path(), Some(Path::new("big.bin")));
        assert!(matches!(
            err.root_cause(),
            ExtractionError::ArchiveRead { .. }
        ));
    }

    #[test]
    fn test_empty_file() {
        let data = TarTestBuilder::new().add_file("empty", b"").build();
        let mut archive = tar::Archive::new(data.as_slice());
        assert!(extract_file_from_archive(&mut archive, "empty").unwrap().is_empty());
    }
}
