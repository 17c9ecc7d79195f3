//! Package assembly.
//!
//! Artifacts are staged in memory first: the plaintext digest is taken, the
//! transform is run and the manifest is completed. Only then is the zip
//! writer opened, so a failed build never leaves a half-written archive
//! behind.
//!
//! ## Member layout
//!
//! | Member | Present when |
//! |---|---|
//! | `FIRM.bin` | encryption is `plain` or `both` |
//! | `FIRM.bin.enc` | encryption is `encrypted` or `both` |
//! | `info.json` | always |
//! | `params.txt` | params are non-empty |
//!
//! Members are written in exactly this order.

use thiserror::Error;

use fwpkg_schema::{
    ArtifactKind, MEMBER_MANIFEST, MEMBER_PARAMS, Manifest, ManifestError, Md5Digest,
};

use crate::archive::{ArchiveError, Member, write_archive};
use crate::spec::FirmwareSpec;
use crate::transform::{Transform, TransformError};
use crate::validate::{ValidatedSpec, ValidationError};

/// Errors that abort a build.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The firmware definition or image was rejected.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The transform failed; no archive is produced, not even a plain one.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(#[source] TransformError),

    /// The manifest could not be serialized.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The zip container could not be written.
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

/// A finished package.
#[derive(Debug, Clone)]
pub struct Package {
    /// The zip archive bytes.
    pub archive: Vec<u8>,
    /// The manifest stored as `info.json`.
    pub manifest: Manifest,
}

impl Package {
    /// Consume the package, keeping only the archive bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.archive
    }
}

/// Validate `spec` and package `data`.
///
/// # Errors
///
/// Returns [`BuildError::Validation`] for a rejected definition or empty
/// image, [`BuildError::EncryptionFailed`] if `transform` fails, and the
/// remaining variants for serialization or container failures.
pub fn build<T>(data: &[u8], spec: &FirmwareSpec, transform: &T) -> Result<Package, BuildError>
where
    T: Transform + ?Sized,
{
    let spec = spec.validate()?;
    build_validated(data, &spec, transform)
}

/// Package `data` for an already validated definition.
///
/// # Errors
///
/// See [`build`].
pub fn build_validated<T>(
    data: &[u8],
    spec: &ValidatedSpec,
    transform: &T,
) -> Result<Package, BuildError>
where
    T: Transform + ?Sized,
{
    if data.is_empty() {
        return Err(ValidationError::EmptyFirmware.into());
    }

    let mut manifest = spec.manifest();
    let mut members = Vec::with_capacity(4);

    if spec.encryption.includes_plain() {
        record(&mut manifest, ArtifactKind::Bin, data);
        members.push(Member::borrowed(ArtifactKind::Bin.member_name(), data));
    }

    if spec.encryption.includes_encrypted() {
        let encrypted = transform
            .transform(data)
            .map_err(BuildError::EncryptionFailed)?;
        record(&mut manifest, ArtifactKind::Enc, &encrypted);
        members.push(Member::owned(ArtifactKind::Enc.member_name(), encrypted));
    }

    members.push(Member::owned(MEMBER_MANIFEST, manifest.to_json()?));

    if let Some(params) = spec.params() {
        members.push(Member::borrowed(MEMBER_PARAMS, params.as_bytes()));
    }

    let archive = write_archive(&members)?;
    tracing::info!(
        "Packaged {} ({}, {} members, {} bytes)",
        spec.model,
        spec.encryption,
        members.len(),
        archive.len()
    );

    Ok(Package { archive, manifest })
}

fn record(manifest: &mut Manifest, kind: ArtifactKind, bytes: &[u8]) {
    let digest = Md5Digest::compute(bytes);
    tracing::debug!("      md5 {kind}: {digest}");
    manifest.record_checksum(kind, digest);
}
