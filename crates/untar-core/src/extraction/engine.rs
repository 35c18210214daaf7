//! Extractor bound to one destination and policy.

use std::path::Path;

use crate::ExtractConfig;
use crate::types::DestDir;

/// Extracts archive entries into a destination directory.
///
/// Holds no state between calls besides the destination and the policy, so
/// one extractor can be reused for several archives. Concurrent use against
/// the same destination is not coordinated and must be serialized by the
/// caller.
///
/// # Examples
///
/// ```no_run
/// use untar_core::ExtractConfig;
/// use untar_core::Extractor;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("image.tar")?;
/// let mut archive = tar::Archive::new(file);
///
/// let extractor = Extractor::new("/tmp/rootfs", ExtractConfig::strict());
/// let report = extractor.extract_all(&mut archive)?;
/// println!("extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    pub(super) dest: DestDir,
    pub(super) config: ExtractConfig,
}

impl Extractor {
    /// Creates an extractor writing under `dest`.
    #[must_use]
    pub fn new(dest: impl AsRef<Path>, config: ExtractConfig) -> Self {
        Self {
            dest: DestDir::new(dest),
            config,
        }
    }

    /// Returns the destination root.
    #[must_use]
    pub fn dest(&self) -> &DestDir {
        &self.dest
    }

    /// Returns the extraction policy.
    #[must_use]
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_new() {
        let extractor = Extractor::new("out/./x", ExtractConfig::default());
        assert_eq!(extractor.dest().as_path(), Path::new("out/x"));
        assert_eq!(extractor.config(), &ExtractConfig::default());
    }
}
