//! Containment checks for entry paths and link targets.

pub mod link;
pub mod path;

pub use link::resolve_hardlink;
pub use link::resolve_symlink;
pub use path::is_within;
pub use path::normalize;
pub use path::verify_no_symlink_escape;
