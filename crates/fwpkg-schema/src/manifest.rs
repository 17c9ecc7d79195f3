//! The `info.json` manifest.
//!
//! The manifest is a fixed nested record rather than a free-form map so the
//! key order and the optional checksum entries are checked at compile time.
//! Field order in these structs *is* the serialized key order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash::Md5Digest;
use crate::types::{EncryptionMode, FirmwareType};

/// Indentation of the serialized manifest. Updaters in the field were
/// written against four-space output.
const INDENT: &[u8] = b"    ";

/// Errors produced while serializing a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// `serde_json` failed to serialize the record.
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Kind of firmware artifact a checksum belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The plaintext image, `FIRM.bin`.
    Bin,
    /// The transformed image, `FIRM.bin.enc`.
    Enc,
}

impl ArtifactKind {
    /// Key of this artifact inside the manifest's `md5` object.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bin => "bin",
            Self::Enc => "enc",
        }
    }

    /// Archive member name the artifact is stored under.
    pub fn member_name(&self) -> &'static str {
        match self {
            Self::Bin => crate::MEMBER_BIN,
            Self::Enc => crate::MEMBER_ENC,
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// MD5 digests of the artifacts actually present in the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    /// Digest of `FIRM.bin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<Md5Digest>,
    /// Digest of `FIRM.bin.enc` (the ciphertext, not the plaintext).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enc: Option<Md5Digest>,
}

impl Checksums {
    /// Look up the digest recorded for `kind`.
    pub fn get(&self, kind: ArtifactKind) -> Option<&Md5Digest> {
        match kind {
            ArtifactKind::Bin => self.bin.as_ref(),
            ArtifactKind::Enc => self.enc.as_ref(),
        }
    }

    /// Number of recorded digests.
    pub fn len(&self) -> usize {
        usize::from(self.bin.is_some()) + usize::from(self.enc.is_some())
    }

    /// True when no artifact has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Description of the packaged firmware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareInfo {
    /// Free-form name shown to the user before flashing.
    pub display_name: String,
    /// Vehicle model the image is built for.
    pub model: String,
    /// Whether the updater should refuse a mismatching model.
    pub enforce_model: bool,
    /// Target controller.
    #[serde(rename = "type")]
    pub kind: FirmwareType,
    /// Compatible board identifiers, first entry is the primary board.
    pub compatible: Vec<String>,
    /// Which artifacts the archive carries.
    pub encryption: EncryptionMode,
    /// Digests keyed by artifact kind.
    pub md5: Checksums,
}

/// Top-level `info.json` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Manifest layout version.
    pub schema_version: i64,
    /// The firmware description.
    pub firmware: FirmwareInfo,
}

impl Manifest {
    /// Seed a manifest with the passthrough fields and no checksums.
    pub fn new(schema_version: i64, firmware: FirmwareInfo) -> Self {
        Self {
            schema_version,
            firmware,
        }
    }

    /// Record the digest of an artifact that has been emitted.
    pub fn record_checksum(&mut self, kind: ArtifactKind, digest: Md5Digest) {
        let md5 = &mut self.firmware.md5;
        match kind {
            ArtifactKind::Bin => md5.bin = Some(digest),
            ArtifactKind::Enc => md5.enc = Some(digest),
        }
    }

    /// Serialize to the canonical archive form: UTF-8 JSON, four-space
    /// indentation, keys in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Serialize`] if `serde_json` fails.
    pub fn to_json(&self) -> Result<Vec<u8>, ManifestError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }
}
