//! Device number encoding and device node creation.
//!
//! Device nodes are created with `mknod(2)` on Linux. Other targets have no
//! implementation and report device entries as unsupported.

use std::path::Path;

use crate::ExtractionError;
use crate::Result;
use crate::types::EntryKind;

/// Combines a major/minor pair into a Linux `dev_t`.
///
/// Bit-exact with glibc's `gnu_dev_makedev`: the low 8 bits of `minor` and
/// the low 12 bits of `major` form the low 20 bits, the remaining bits of
/// `minor` go to bits 20..44 and those of `major` to bits 44..64.
///
/// # Examples
///
/// ```
/// use untar_core::make_device;
///
/// assert_eq!(make_device(1, 3), 0x103); // /dev/null
/// assert_eq!(make_device(8, 1), 0x801); // /dev/sda1
/// ```
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn make_device(major: u32, minor: u32) -> u64 {
    let major = major as u64;
    let minor = minor as u64;
    (minor & 0xff) | ((major & 0xfff) << 8) | ((minor & !0xff) << 12) | ((major & !0xfff) << 32)
}

/// Creates a character or block device node at `path`.
///
/// `mode` holds permission bits only; the file type bit is derived from
/// `kind`. The result is still subject to the process umask, so callers
/// apply the final mode separately.
///
/// # Errors
///
/// Returns `UnsupportedType` for non-device kinds and on targets without
/// `mknod`, and `DeviceNode` if the system call fails.
#[cfg(target_os = "linux")]
pub fn create_device_node(path: &Path, kind: EntryKind, mode: u32, device: u64) -> Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let file_type = match kind {
        EntryKind::CharDevice => libc::S_IFCHR,
        EntryKind::BlockDevice => libc::S_IFBLK,
        other => {
            return Err(ExtractionError::UnsupportedType {
                entry_type: other.type_flag(),
            });
        }
    };

    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        ExtractionError::DeviceNode {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path contains null byte",
            ),
        }
    })?;

    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the
    // call, and mknod() does not retain the pointer.
    #[allow(unsafe_code)]
    let result = unsafe { libc::mknod(c_path.as_ptr(), file_type | (mode & 0o7777), device) };

    if result != 0 {
        return Err(ExtractionError::DeviceNode {
            path: path.to_path_buf(),
            source: std::io::Error::last_os_error(),
        });
    }

    Ok(())
}

/// Creates a character or block device node at `path`.
///
/// # Errors
///
/// Always returns `UnsupportedType`: this target has no device node support.
#[cfg(not(target_os = "linux"))]
pub fn create_device_node(_path: &Path, kind: EntryKind, _mode: u32, _device: u64) -> Result<()> {
    Err(ExtractionError::UnsupportedType {
        entry_type: kind.type_flag(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    // glibc gnu_dev_major / gnu_dev_minor
    fn major(dev: u64) -> u64 {
        ((dev >> 8) & 0xfff) | ((dev >> 32) & 0xffff_f000)
    }

    fn minor(dev: u64) -> u64 {
        (dev & 0xff) | ((dev >> 12) & 0xffff_ff00)
    }

    #[test]
    fn test_make_device_known_pairs() {
        assert_eq!(make_device(0, 0), 0);
        assert_eq!(make_device(1, 3), 259);
        assert_eq!(make_device(1, 5), 0x105);
        assert_eq!(make_device(8, 1), 2049);
        assert_eq!(make_device(259, 0), 0x10300);
        assert_eq!(make_device(4095, 255), 0xf_ffff);
    }

    #[test]
    fn test_make_device_high_bits() {
        assert_eq!(make_device(0, 256), 0x10_0000);
        assert_eq!(make_device(4096, 0), 0x1000_0000_0000);
        assert_eq!(make_device(u32::MAX, u32::MAX), u64::MAX);
    }

    #[test]
    fn test_make_device_decodes() {
        for (maj, min) in [(1, 3), (8, 17), (4096, 256), (0xfff_ffff, 0xff_ffff)] {
            let dev = make_device(maj, min);
            assert_eq!(major(dev), u64::from(maj));
            assert_eq!(minor(dev), u64::from(min));
        }
    }

    #[test]
    fn test_create_device_node_rejects_other_kinds() {
        let temp = tempfile::TempDir::new().expect("failed to create temp dir");
        let result = create_device_node(&temp.path().join("x"), EntryKind::File, 0o644, 0);
        assert!(matches!(
            result,
            Err(ExtractionError::UnsupportedType { entry_type: b'0' })
        ));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_create_char_device_or_permission_error() {
        use std::os::unix::fs::FileTypeExt;
        use std::os::unix::fs::MetadataExt;

        let temp = tempfile::TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("null");
        match create_device_node(&path, EntryKind::CharDevice, 0o666, make_device(1, 3)) {
            Ok(()) => {
                let meta = std::fs::symlink_metadata(&path).unwrap();
                assert!(meta.file_type().is_char_device());
                assert_eq!(meta.rdev(), make_device(1, 3));
            }
            // unprivileged runs lack CAP_MKNOD
            Err(ExtractionError::DeviceNode { source, .. }) => {
                assert!(!path.exists(), "failed mknod must not leave a node: {source}");
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
