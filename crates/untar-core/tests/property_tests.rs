//! Property-based tests for path containment and device numbers.
//!
//! These tests use proptest to generate arbitrary inputs and verify
//! security properties hold across a wide range of cases.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::path::PathBuf;

use proptest::prelude::*;
use untar_core::DestDir;
use untar_core::make_device;
use untar_core::security::is_within;
use untar_core::security::normalize;
use untar_core::security::resolve_hardlink;
use untar_core::security::resolve_symlink;

/// Generated names are lowercase, so none can climb back into the root.
const DEST: &str = "/srv/Out9";

/// Relative archive names built from ordinary names, `.` and `..`.
fn archive_path() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => "[a-z]{1,6}",
            1 => Just(".".to_string()),
            2 => Just("..".to_string()),
        ],
        1..8,
    )
    .prop_map(|parts| parts.join("/"))
}

fn escapes(relative: &str) -> bool {
    normalize(Path::new(relative)).starts_with("..")
}

proptest! {
    /// Normalization is idempotent and free of `.` components.
    #[test]
    fn prop_normalize_idempotent(path in archive_path()) {
        let once = normalize(Path::new(&path));
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert!(once == Path::new(".") || !once.components().any(|c| c.as_os_str() == "."));
    }

    /// An entry lands inside the destination exactly when its normalized
    /// name does not climb above it.
    #[test]
    fn prop_resolve_contained_iff_no_leading_parent(path in archive_path()) {
        let dest = DestDir::new(DEST);
        let resolved = dest.resolve(Path::new(&path));
        prop_assert_eq!(dest.contains(&resolved), !escapes(&path));
    }

    /// Hardlink targets resolve from the root, so acceptance depends only on
    /// the target.
    #[test]
    fn prop_hardlink_ignores_link_location(
        link in "[a-z]{1,4}(/[a-z]{1,4}){0,3}",
        target in archive_path(),
    ) {
        let dest = DestDir::new(DEST);
        let link_path = dest.as_path().join(&link);
        let result = resolve_hardlink(&dest, &link_path, Path::new(&target));
        prop_assert_eq!(result.is_ok(), !escapes(&target));
    }

    /// Every accepted symlink resolves inside the destination.
    #[test]
    fn prop_symlink_accepted_implies_inside(
        link in "[a-z]{1,4}(/[a-z]{1,4}){0,3}",
        target in archive_path(),
    ) {
        let dest = DestDir::new(DEST);
        let link_path = dest.as_path().join(&link);
        if let Ok(resolved) = resolve_symlink(&dest, &link_path, Path::new(&target)) {
            prop_assert!(resolved.starts_with(DEST));
        }
    }

    /// Sibling directories sharing a textual prefix are never inside.
    #[test]
    fn prop_shared_prefix_not_contained(suffix in "[a-z0-9_-]{1,8}", rest in "(/[a-z]{1,4}){0,3}") {
        let root = Path::new("/tmp/out");
        let sibling = PathBuf::from(format!("/tmp/out{suffix}{rest}"));
        prop_assert!(!is_within(root, &sibling));
        let child = PathBuf::from(format!("/tmp/out/{suffix}{rest}"));
        prop_assert!(is_within(root, &child));
    }

    /// glibc's major()/minor() recover both halves of every pair.
    #[test]
    fn prop_make_device_decodes(major in any::<u32>(), minor in any::<u32>()) {
        let dev = make_device(major, minor);
        let decoded_major = ((dev >> 8) & 0xfff) | ((dev >> 32) & 0xffff_f000);
        let decoded_minor = (dev & 0xff) | ((dev >> 12) & 0xffff_ff00);
        prop_assert_eq!(decoded_major, u64::from(major));
        prop_assert_eq!(decoded_minor, u64::from(minor));
    }
}
