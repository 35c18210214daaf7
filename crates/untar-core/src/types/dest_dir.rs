//! Destination root for extraction.

use std::path::Path;
use std::path::PathBuf;

use crate::security::path::is_within;
use crate::security::path::join_relative;
use crate::security::path::normalize;

/// The directory an archive is extracted into.
///
/// The root may be absolute or relative and does not have to exist yet: it
/// is created on demand together with the first entry's parent directories.
/// It is kept in lexically normalized form, and every path handed out by
/// [`DestDir::resolve`] is normalized the same way so that containment can be
/// decided component by component.
///
/// # Examples
///
/// ```
/// use untar_core::types::DestDir;
/// use std::path::Path;
///
/// let dest = DestDir::new("/tmp/out/./x/..");
/// assert_eq!(dest.as_path(), Path::new("/tmp/out"));
///
/// let resolved = dest.resolve(Path::new("a/../b.txt"));
/// assert_eq!(resolved, Path::new("/tmp/out/b.txt"));
/// assert!(dest.contains(&resolved));
/// assert!(!dest.contains(Path::new("/tmp/outside")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Creates a destination root from a caller-supplied path.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(normalize(path.as_ref()))
    }

    /// Returns the normalized root.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins an archive path onto the root and normalizes the result.
    ///
    /// Absolute archive paths are taken relative to the root. The result is
    /// NOT guaranteed to stay inside the root; check it with
    /// [`DestDir::contains`].
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        normalize(&join_relative(&self.0, path))
    }

    /// Returns `true` if the normalized `path` lies inside the root.
    ///
    /// The check compares whole components, so `/tmp/out` does not contain
    /// `/tmp/outside`.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        is_within(&self.0, path)
    }

    /// Returns the canonical form of the root, or `None` if it does not
    /// exist yet.
    #[must_use]
    pub fn canonical(&self) -> Option<PathBuf> {
        self.0.canonicalize().ok()
    }
}

impl AsRef<Path> for DestDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
