//! Extraction policy.

/// Default mode for directories synthesized to hold an entry (`rwxr-xr-x`).
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Policy applied while extracting an archive.
///
/// The default reproduces every entry kind the archive describes. Tighter
/// presets refuse link or device entries outright; refused entries fail with
/// a security error rather than being skipped.
///
/// # Examples
///
/// ```
/// use untar_core::ExtractConfig;
///
/// let config = ExtractConfig::default();
/// assert!(config.allow_symlinks);
///
/// let custom = ExtractConfig {
///     allow_devices: false,
///     ..Default::default()
/// };
/// assert!(!custom.allow_devices);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Mode for parent directories created on demand.
    pub default_dir_mode: u32,

    /// Create symbolic link entries.
    pub allow_symlinks: bool,

    /// Create hard link entries.
    pub allow_hardlinks: bool,

    /// Create character and block device entries.
    pub allow_devices: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            default_dir_mode: DEFAULT_DIR_MODE,
            allow_symlinks: true,
            allow_hardlinks: true,
            allow_devices: true,
        }
    }
}

impl ExtractConfig {
    /// Configuration for archives from untrusted sources.
    ///
    /// Refuses hardlinks and device nodes; symlinks remain subject to the
    /// containment check.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            allow_hardlinks: false,
            allow_devices: false,
            ..Default::default()
        }
    }

    /// Sets the mode for synthesized parent directories.
    #[must_use]
    pub fn with_default_dir_mode(mut self, mode: u32) -> Self {
        self.default_dir_mode = mode & 0o7777;
        self
    }
}
