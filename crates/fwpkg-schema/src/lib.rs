//! Shared types and archive layout for firmware update packages.
//!
//! Everything a device updater parses out of a package lives here: the
//! closed flag enumerations, the `info.json` manifest record and the fixed
//! member names of the archive.

pub mod hash;
pub mod manifest;
pub mod types;

// Re-exports
pub use hash::Md5Digest;
pub use manifest::{ArtifactKind, Checksums, FirmwareInfo, Manifest, ManifestError};
pub use types::*;

/// The only manifest schema version this crate knows how to produce.
pub const SCHEMA_VERSION: i64 = 1;

/// Archive member holding the plaintext firmware image.
pub const MEMBER_BIN: &str = "FIRM.bin";

/// Archive member holding the transformed (encrypted) firmware image.
pub const MEMBER_ENC: &str = "FIRM.bin.enc";

/// Archive member holding the serialized [`Manifest`].
pub const MEMBER_MANIFEST: &str = "info.json";

/// Archive member holding free-text update parameters.
pub const MEMBER_PARAMS: &str = "params.txt";
