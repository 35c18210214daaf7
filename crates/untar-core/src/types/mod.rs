//! Types shared by the extractor and its callers.
//!
//! [`EntryHeader`] is the extractor's read-only view of one archive entry,
//! [`EntryKind`] the closed set of objects it knows how to create, and
//! [`DestDir`] the normalized root everything is contained in.

pub mod dest_dir;
pub mod entry_type;

pub use dest_dir::DestDir;
pub use entry_type::EntryHeader;
pub use entry_type::EntryKind;
