//! Per-entry extraction: one archive entry becomes one filesystem object.

use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use super::Extractor;
use super::fs::create_dir_chain;
use super::fs::remove_symlink;
use super::fs::set_mode;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::Result;
use crate::device::create_device_node;
use crate::device::make_device;
use crate::security::resolve_hardlink;
use crate::security::resolve_symlink;
use crate::security::verify_no_symlink_escape;
use crate::types::EntryHeader;
use crate::types::EntryKind;

/// Buffer size for writing file content (64KB).
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

impl Extractor {
    /// Extracts a single entry under the destination.
    ///
    /// `content` is only read for regular files. The entry's parent directory
    /// is created first if missing, using the configured default mode.
    ///
    /// # Errors
    ///
    /// - `PathTraversal` if the entry path resolves outside the destination,
    ///   directly or through a symlink already on disk
    /// - `InsecureLink` if a link target resolves outside the destination
    /// - `UnsupportedType` for entry kinds without a filesystem counterpart
    /// - `LinkDenied` / `DeviceDenied` for kinds refused by configuration
    /// - an I/O variant naming the path if a filesystem operation fails
    pub fn extract_entry<R: Read + ?Sized>(
        &self,
        header: &EntryHeader,
        content: &mut R,
        report: &mut ExtractionReport,
    ) -> Result<()> {
        self.check_policy(header)?;

        let target = self.dest.resolve(&header.path);
        if !self.dest.contains(&target)
            || (target == self.dest.as_path() && header.kind != EntryKind::Directory)
        {
            tracing::warn!(path = %header.path.display(), "refusing entry outside destination");
            return Err(ExtractionError::PathTraversal {
                path: header.path.clone(),
            });
        }
        // Only directories are applied through a symlink in the last
        // component; every other kind replaces it or fails on it.
        let checked = match header.kind {
            EntryKind::Directory => target.as_path(),
            _ => target.parent().unwrap_or(target.as_path()),
        };
        verify_no_symlink_escape(&self.dest, checked, &header.path)?;

        if let Some(parent) = target.parent() {
            create_dir_chain(parent, self.config.default_dir_mode)?;
        }

        match header.kind {
            EntryKind::File => write_file(header, content, &target, report)?,
            EntryKind::Directory => {
                create_dir_chain(&target, header.mode)?;
                // pre-existing directories take the recorded mode too
                set_mode(&target, header.mode)?;
            }
            EntryKind::Hardlink => self.create_hardlink(header, &target)?,
            EntryKind::Symlink => self.create_symlink(header, &target)?,
            EntryKind::CharDevice | EntryKind::BlockDevice => {
                let device = make_device(
                    header.device_major.unwrap_or(0),
                    header.device_minor.unwrap_or(0),
                );
                create_device_node(&target, header.kind, header.mode, device)?;
                set_mode(&target, header.mode)?;
            }
            EntryKind::Other(flag) => {
                return Err(ExtractionError::UnsupportedType { entry_type: flag });
            }
        }

        report.record(header.kind);
        tracing::debug!(
            path = %header.path.display(),
            kind = ?header.kind,
            mode = format_args!("{:#o}", header.mode),
            size = header.size,
            "extracted entry"
        );
        Ok(())
    }

    /// Refuses kinds the policy or platform rules out, before touching disk.
    fn check_policy(&self, header: &EntryHeader) -> Result<()> {
        match header.kind {
            EntryKind::Symlink if !self.config.allow_symlinks => Err(ExtractionError::LinkDenied {
                path: header.path.clone(),
                kind: "symlink",
            }),
            EntryKind::Hardlink if !self.config.allow_hardlinks => {
                Err(ExtractionError::LinkDenied {
                    path: header.path.clone(),
                    kind: "hardlink",
                })
            }
            EntryKind::CharDevice | EntryKind::BlockDevice if !self.config.allow_devices => {
                Err(ExtractionError::DeviceDenied {
                    path: header.path.clone(),
                })
            }
            EntryKind::Other(flag) => Err(ExtractionError::UnsupportedType { entry_type: flag }),
            _ => Ok(()),
        }
    }

    fn create_hardlink(&self, header: &EntryHeader, target: &Path) -> Result<()> {
        let link_target = link_target(header);
        let source = resolve_hardlink(&self.dest, target, link_target)?;
        verify_no_symlink_escape(&self.dest, &source, &header.path)?;

        std::fs::hard_link(&source, target).map_err(|e| ExtractionError::CreateLink {
            path: target.to_path_buf(),
            target: source,
            source: e,
        })
    }

    fn create_symlink(&self, header: &EntryHeader, target: &Path) -> Result<()> {
        let link_target = link_target(header);
        resolve_symlink(&self.dest, target, link_target)?;

        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(link_target, target).map_err(|source| {
                ExtractionError::CreateLink {
                    path: target.to_path_buf(),
                    target: link_target.to_path_buf(),
                    source,
                }
            })
        }

        #[cfg(not(unix))]
        {
            Err(ExtractionError::UnsupportedType {
                entry_type: EntryKind::Symlink.type_flag(),
            })
        }
    }
}

fn write_file<R: Read + ?Sized>(
    header: &EntryHeader,
    content: &mut R,
    target: &Path,
    report: &mut ExtractionReport,
) -> Result<()> {
    remove_symlink(target)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(header.mode);
    }

    let file = options
        .open(target)
        .map_err(|source| ExtractionError::CreateFile {
            path: target.to_path_buf(),
            source,
        })?;

    let write_error = |source| ExtractionError::WriteFile {
        path: target.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    let written = std::io::copy(content, &mut writer).map_err(write_error)?;
    writer.flush().map_err(write_error)?;
    drop(writer);

    set_mode(target, header.mode)?;
    report.bytes_written = report.bytes_written.saturating_add(written);
    Ok(())
}

/// Raw link target; a link entry without one resolves to the root itself.
fn link_target(header: &EntryHeader) -> &Path {
    header
        .link_target
        .as_deref()
        .unwrap_or_else(|| Path::new(""))
}
