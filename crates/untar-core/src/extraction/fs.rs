//! Filesystem helpers shared by the entry handlers.

use std::fs::DirBuilder;
use std::io::ErrorKind;
use std::path::Path;

use crate::ExtractionError;
use crate::Result;

/// Creates `path` and any missing ancestors, each with `mode`.
///
/// Directories that already exist are left untouched. Newly created ones get
/// an explicit chmod so the process umask does not alter `mode`.
///
/// # Errors
///
/// Returns `CreateDirectory` if a component cannot be created (for example
/// because a regular file is in the way) and `SetPermissions` if the mode
/// cannot be applied.
pub fn create_dir_chain(path: &Path, mode: u32) -> Result<()> {
    if path.as_os_str().is_empty() || path.is_dir() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        create_dir_chain(parent, mode)?;
    }

    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }

    match builder.create(path) {
        Ok(()) => set_mode(path, mode),
        // lost a race with another creator, or a symlink to a directory
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(source) => Err(ExtractionError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Applies `mode` to `path` verbatim.
///
/// On non-Unix platforms permission bits have no equivalent and this is a
/// no-op.
///
/// # Errors
///
/// Returns `SetPermissions` if chmod fails.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|source| {
        ExtractionError::SetPermissions {
            path: path.to_path_buf(),
            mode,
            source,
        }
    })
}

/// Applies `mode` to `path` verbatim.
#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
pub fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Removes `path` if it is a symbolic link, so a following write replaces
/// the link instead of going through it.
///
/// # Errors
///
/// Returns `CreateFile` if the link exists but cannot be removed.
pub fn remove_symlink(path: &Path) -> Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            std::fs::remove_file(path).map_err(|source| ExtractionError::CreateFile {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_create_dir_chain_nested() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("a/b/c");
        create_dir_chain(&path, 0o755).unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_create_dir_chain_existing_is_noop() {
        let temp = TempDir::new().expect("failed to create temp dir");
        create_dir_chain(temp.path(), 0o700).unwrap();
        create_dir_chain(Path::new(""), 0o700).unwrap();
    }

    #[test]
    fn test_create_dir_chain_file_in_the_way() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::write(temp.path().join("blocker"), b"x").unwrap();
        let result = create_dir_chain(&temp.path().join("blocker/sub"), 0o755);
        assert!(matches!(
            result,
            Err(ExtractionError::CreateDirectory { .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_create_dir_chain_applies_mode_and_keeps_existing() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("failed to create temp dir");
        let existing = temp.path().join("existing");
        fs::create_dir(&existing).unwrap();
        fs::set_permissions(&existing, fs::Permissions::from_mode(0o700)).unwrap();

        let leaf = existing.join("x/y");
        create_dir_chain(&leaf, 0o751).unwrap();

        let mode_of = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode_of(&existing), 0o700);
        assert_eq!(mode_of(&existing.join("x")), 0o751);
        assert_eq!(mode_of(&leaf), 0o751);
    }

    #[test]
    #[cfg(unix)]
    fn test_remove_symlink_only_touches_links() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let file = temp.path().join("file");
        let link = temp.path().join("link");
        fs::write(&file, b"data").unwrap();
        std::os::unix::fs::symlink(&file, &link).unwrap();

        remove_symlink(&file).unwrap();
        remove_symlink(&link).unwrap();
        remove_symlink(&temp.path().join("missing")).unwrap();

        assert!(file.exists());
        assert!(fs::symlink_metadata(&link).is_err());
    }
}
