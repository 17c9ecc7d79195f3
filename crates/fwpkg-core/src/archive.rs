//! Zip container writer.
//!
//! Members are deflated and stamped with the zip epoch, so the same members
//! always produce the same bytes. The container adds no encryption of its own.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Errors from the zip container.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The zip writer rejected an entry or failed to finish.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Writing member contents failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One named file inside the archive.
#[derive(Debug, Clone)]
pub struct Member<'a> {
    /// Case-sensitive member name.
    pub name: &'static str,
    /// Uncompressed contents.
    pub contents: Cow<'a, [u8]>,
}

impl<'a> Member<'a> {
    /// Member backed by caller-owned bytes.
    pub fn borrowed(name: &'static str, contents: &'a [u8]) -> Self {
        Self {
            name,
            contents: Cow::Borrowed(contents),
        }
    }

    /// Member that owns its bytes.
    pub fn owned(name: &'static str, contents: Vec<u8>) -> Self {
        Self {
            name,
            contents: Cow::Owned(contents),
        }
    }
}

/// Write `members` in the given order into an in-memory zip.
///
/// # Errors
///
/// Returns an [`ArchiveError`] if the zip writer fails. No bytes are
/// returned in that case.
pub fn write_archive(members: &[Member<'_>]) -> Result<Vec<u8>, ArchiveError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for member in members {
        zip.start_file(member.name, options)?;
        zip.write_all(&member.contents)?;
        tracing::debug!(
            "      wrote {} ({} bytes)",
            member.name,
            member.contents.len()
        );
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_members_keep_order_and_contents() {
        let members = [
            Member::borrowed("b.txt", b"second"),
            Member::owned("a.txt", b"first".to_vec()),
        ];
        let bytes = write_archive(&members).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut file = archive.by_index(0).unwrap();
        assert_eq!(file.name(), "b.txt");
        assert_eq!(file.compression(), CompressionMethod::Deflated);
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "second");
        drop(file);

        assert_eq!(archive.by_index(1).unwrap().name(), "a.txt");
    }

    #[test]
    fn test_output_is_reproducible() {
        let members = [Member::borrowed("x", b"payload")];
        assert_eq!(
            write_archive(&members).unwrap(),
            write_archive(&members).unwrap()
        );
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let bytes = write_archive(&[]).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
