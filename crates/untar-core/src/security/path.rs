//! Lexical path handling and containment checks.
//!
//! Archive paths are untrusted text. Everything here works on path
//! components rather than string prefixes, so a root of `/tmp/out` never
//! admits `/tmp/outside`.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::types::DestDir;

/// Lexically normalizes a path.
///
/// Removes `.` components and empty segments, and folds each `..` into the
/// preceding normal component. Leading `..` of a relative path are kept;
/// `..` directly under the root is dropped. An empty result becomes `.`.
/// The filesystem is never consulted.
///
/// # Examples
///
/// ```
/// use untar_core::security::normalize;
/// use std::path::Path;
///
/// assert_eq!(normalize(Path::new("a/./b/../c/")), Path::new("a/c"));
/// assert_eq!(normalize(Path::new("../x/..")), Path::new(".."));
/// assert_eq!(normalize(Path::new("/../etc")), Path::new("/etc"));
/// assert_eq!(normalize(Path::new("a/..")), Path::new("."));
/// ```
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.iter().collect()
    }
}

/// Joins `path` onto `base`, treating an absolute `path` as relative.
///
/// `Path::join` replaces the base when given an absolute path; archive names
/// such as `/etc/passwd` must instead land under the base.
#[must_use]
pub fn join_relative(base: &Path, path: &Path) -> PathBuf {
    let relative: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    base.join(relative)
}

/// Returns `true` if normalized `candidate` lies inside normalized `root`.
///
/// A root of `.` contains every relative path that does not start with `..`.
#[must_use]
pub fn is_within(root: &Path, candidate: &Path) -> bool {
    if root == Path::new(".") {
        return candidate.is_relative()
            && !matches!(candidate.components().next(), Some(Component::ParentDir));
    }
    candidate.starts_with(root)
}

/// Rejects writes that an existing symlink would redirect out of `dest`.
///
/// Lexical containment cannot see symlinks already on disk. This walks from
/// `resolved` towards the root, canonicalizes the deepest component that
/// exists, and requires it to stay under the canonical root. Nothing needs
/// checking while the root itself does not exist.
///
/// # Errors
///
/// Returns `PathTraversal` naming `entry_path` when the existing prefix of
/// `resolved` escapes.
pub fn verify_no_symlink_escape(dest: &DestDir, resolved: &Path, entry_path: &Path) -> Result<()> {
    let Some(canonical_root) = dest.canonical() else {
        return Ok(());
    };

    for ancestor in resolved.ancestors() {
        if ancestor == dest.as_path() || !dest.contains(ancestor) {
            break;
        }
        if let Ok(canonical) = ancestor.canonicalize() {
            if canonical.starts_with(&canonical_root) {
                return Ok(());
            }
            return Err(ExtractionError::PathTraversal {
                path: entry_path.to_path_buf(),
            });
        }
    }

    Ok(())
}
