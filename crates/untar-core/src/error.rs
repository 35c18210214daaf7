//! Error types for tar extraction operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur while extracting a tar stream.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The archive stream could not be decoded.
    #[error("error reading archive: {source}")]
    ArchiveRead {
        /// Underlying decoder error.
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDirectory {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A regular file could not be created or opened.
    #[error("failed to create file {}: {source}", .path.display())]
    CreateFile {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Copying entry content into a file failed.
    #[error("failed to write file {}: {source}", .path.display())]
    WriteFile {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Applying the recorded mode to a created object failed.
    #[error("failed to set mode {mode:#o} on {}: {source}", .path.display())]
    SetPermissions {
        /// Path of the object.
        path: PathBuf,
        /// Mode that was being applied.
        mode: u32,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A hard link or symbolic link could not be created.
    #[error("failed to create link {} -> {}: {source}", .path.display(), .target.display())]
    CreateLink {
        /// Path of the link being created.
        path: PathBuf,
        /// Link target.
        target: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A link target resolves outside the destination directory.
    #[error("insecure link {} -> {}", .path.display(), .target.display())]
    InsecureLink {
        /// Path of the link that was refused.
        path: PathBuf,
        /// Target as recorded in the archive.
        target: PathBuf,
    },

    /// An entry path resolves outside the destination directory.
    #[error("path traversal detected: {}", .path.display())]
    PathTraversal {
        /// The entry path as recorded in the archive.
        path: PathBuf,
    },

    /// The entry type has no filesystem counterpart here.
    #[error("unsupported entry type: {:?}", type_flag(.entry_type))]
    UnsupportedType {
        /// Raw tar type flag.
        entry_type: u8,
    },

    /// The looked-up entry exists but is not a regular file.
    #[error("requested entry {} is not a regular file (type {:?})", .path.display(), type_flag(.entry_type))]
    NotAFile {
        /// Requested path.
        path: PathBuf,
        /// Raw tar type flag of the matching entry.
        entry_type: u8,
    },

    /// The looked-up entry does not exist in the archive.
    #[error("file {} not found in archive", .path.display())]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// A character or block device node could not be created.
    #[error("failed to create device node {}: {source}", .path.display())]
    DeviceNode {
        /// Path of the device node.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Link entries of this kind are disabled by configuration.
    #[error("{kind} entries are not allowed: {}", .path.display())]
    LinkDenied {
        /// Entry path.
        path: PathBuf,
        /// `"symlink"` or `"hardlink"`.
        kind: &'static str,
    },

    /// Device entries are disabled by configuration.
    #[error("device entries are not allowed: {}", .path.display())]
    DeviceDenied {
        /// Entry path.
        path: PathBuf,
    },

    /// Extracting one entry of an archive failed.
    #[error("error extracting {}: {source}", .path.display())]
    Entry {
        /// Entry path as recorded in the archive.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: Box<ExtractionError>,
    },
}

/// Renders a raw tar type flag for messages.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn type_flag(flag: &u8) -> char {
    char::from(*flag)
}

impl ExtractionError {
    /// Wraps `self` with the name of the entry being extracted.
    #[must_use]
    pub fn in_entry(self, path: impl Into<PathBuf>) -> Self {
        Self::Entry {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, looking through `Entry` wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::Entry { source, .. } = current {
            current = &**source;
        }
        current
    }

    /// Returns the path of the entry that failed, if the error came from the
    /// archive walker.
    #[must_use]
    pub fn entry_path(&self) -> Option<&Path> {
        match self {
            Self::Entry { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns `true` if this error is a security rejection rather than an
    /// I/O fault.
    ///
    /// Security rejections are containment violations (`InsecureLink`,
    /// `PathTraversal`) and entries refused by configuration. The check looks
    /// through `Entry` wrappers.
    ///
    /// # Examples
    ///
    /// ```
    /// use untar_core::ExtractionError;
    /// use std::path::PathBuf;
    ///
    /// let err = ExtractionError::InsecureLink {
    ///     path: PathBuf::from("out/link"),
    ///     target: PathBuf::from("../../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ExtractionError::NotFound {
    ///     path: PathBuf::from("missing"),
    /// };
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub fn is_security_violation(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::InsecureLink { .. }
                | Self::PathTraversal { .. }
                | Self::LinkDenied { .. }
                | Self::DeviceDenied { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insecure_link_display() {
        let err = ExtractionError::InsecureLink {
            path: PathBuf::from("/out/link"),
            target: PathBuf::from("../../etc/passwd"),
        };
        let display = err.to_string();
        assert!(display.contains("insecure link"));
        assert!(display.contains("/out/link"));
        assert!(display.contains("../../etc/passwd"));
        assert!(err.is_security_violation());
    }

    #[test]
    fn test_unsupported_type_display() {
        let err = ExtractionError::UnsupportedType { entry_type: b'p' };
        assert_eq!(err.to_string(), "unsupported entry type: 'p'");
        assert!(!err.is_security_violation());
    }

    #[test]
    fn test_not_a_file_display() {
        let err = ExtractionError::NotAFile {
            path: PathBuf::from("a/"),
            entry_type: b'5',
        };
        let display = err.to_string();
        assert!(display.contains("not a regular file"));
        assert!(display.contains("'5'"));
    }

    #[test]
    fn test_entry_wrapper_keeps_cause() {
        use std::error::Error;

        let err = ExtractionError::PathTraversal {
            path: PathBuf::from("../evil"),
        }
        .in_entry("../evil");

        assert_eq!(err.entry_path(), Some(Path::new("../evil")));
        assert!(err.is_security_violation());
        assert!(matches!(
            err.root_cause(),
            ExtractionError::PathTraversal { .. }
        ));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("error extracting ../evil"));
    }

    #[test]
    fn test_io_faults_are_not_security_violations() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ExtractionError::CreateFile {
            path: PathBuf::from("f"),
            source: io_err,
        }
        .in_entry("f");
        assert!(!err.is_security_violation());
    }

    #[test]
    fn test_set_permissions_display_octal() {
        let err = ExtractionError::SetPermissions {
            path: PathBuf::from("file.txt"),
            mode: 0o4755,
            source: std::io::Error::other("boom"),
        };
        assert!(err.to_string().contains("0o4755"));
    }
}
