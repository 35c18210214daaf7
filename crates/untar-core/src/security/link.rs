//! Hardlink and symlink target resolution.
//!
//! The two link kinds resolve their targets differently. A hardlink names
//! another archive member, so its target is taken relative to the
//! destination root. A symlink is interpreted by the kernel relative to the
//! directory holding the link; an absolute symlink target is appended to
//! that directory the same way. Either way the resolved location must stay
//! inside the destination.

use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::security::path::join_relative;
use crate::security::path::normalize;
use crate::types::DestDir;

/// Resolves a hardlink target against the destination root.
///
/// Returns the normalized path the new link will point at.
///
/// # Errors
///
/// Returns `InsecureLink` if the target resolves outside `dest`.
///
/// # Examples
///
/// ```
/// use untar_core::security::resolve_hardlink;
/// use untar_core::types::DestDir;
/// use std::path::Path;
///
/// let dest = DestDir::new("/srv/out");
/// let link = Path::new("/srv/out/b/link");
///
/// let source = resolve_hardlink(&dest, link, Path::new("a/file")).unwrap();
/// assert_eq!(source, Path::new("/srv/out/a/file"));
///
/// assert!(resolve_hardlink(&dest, link, Path::new("../../etc/passwd")).is_err());
/// ```
pub fn resolve_hardlink(dest: &DestDir, link_path: &Path, target: &Path) -> Result<PathBuf> {
    let resolved = dest.resolve(target);
    ensure_inside(dest, link_path, target, &resolved)?;
    Ok(resolved)
}

/// Resolves a symlink target against the directory containing the link.
///
/// Returns the normalized location the link would point at. An absolute
/// `target` is joined onto the link's directory like a relative one, so
/// `/usr/lib` from `etc/link` resolves to `etc/usr/lib`. The symlink itself
/// must still be created with the raw `target` text.
///
/// # Errors
///
/// Returns `InsecureLink` if the target resolves outside `dest`.
///
/// # Examples
///
/// ```
/// use untar_core::security::resolve_symlink;
/// use untar_core::types::DestDir;
/// use std::path::Path;
///
/// let dest = DestDir::new("/srv/out");
/// let link = Path::new("/srv/out/a/link");
///
/// let points_at = resolve_symlink(&dest, link, Path::new("../b/file")).unwrap();
/// assert_eq!(points_at, Path::new("/srv/out/b/file"));
///
/// assert!(resolve_symlink(&dest, link, Path::new("../../x")).is_err());
///
/// let absolute = resolve_symlink(&dest, link, Path::new("/etc/passwd")).unwrap();
/// assert_eq!(absolute, Path::new("/srv/out/a/etc/passwd"));
/// ```
pub fn resolve_symlink(dest: &DestDir, link_path: &Path, target: &Path) -> Result<PathBuf> {
    let parent = link_path.parent().unwrap_or_else(|| Path::new(""));
    let resolved = normalize(&join_relative(parent, target));
    ensure_inside(dest, link_path, target, &resolved)?;
    Ok(resolved)
}

fn ensure_inside(dest: &DestDir, link_path: &Path, target: &Path, resolved: &Path) -> Result<()> {
    if dest.contains(resolved) {
        return Ok(());
    }
    tracing::warn!(
        link = %link_path.display(),
        target = %target.display(),
        resolved = %resolved.display(),
        "refusing link that resolves outside destination"
    );
    Err(ExtractionError::InsecureLink {
        path: link_path.to_path_buf(),
        target: target.to_path_buf(),
    })
}
