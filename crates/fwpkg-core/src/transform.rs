//! Firmware transforms.
//!
//! The builder does not know how encryption works. It is handed a
//! [`Transform`] and calls it once per encrypted artifact; any error aborts
//! the whole build. [`Tea`] is the transform the stock updaters expect.

use thiserror::Error;

/// Size of a TEA block in bytes.
pub const TEA_BLOCK_SIZE: usize = 8;

/// TEA key schedule constant.
const DELTA: u32 = 0x9E37_79B9;

/// TEA rounds (each cycle is two Feistel rounds).
const CYCLES: u32 = 32;

/// Errors reported by a transform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Nothing to transform.
    #[error("Input is empty")]
    EmptyInput,

    /// Encryption was requested but no key was configured.
    #[error("No encryption key configured")]
    MissingKey,

    /// Any other failure reported by an external transform.
    #[error("{0}")]
    Failed(String),
}

/// Errors parsing a textual key.
#[derive(Error, Debug)]
pub enum KeyError {
    /// The key is not valid hex.
    #[error("Invalid hex key: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The key decodes to the wrong number of bytes.
    #[error("Key must be 16 bytes, got {0}")]
    Length(usize),
}

/// A reversible byte transform applied to produce `FIRM.bin.enc`.
///
/// Implementations must be deterministic on success and must not depend on
/// state shared with other builds.
pub trait Transform {
    /// Transform a full firmware image.
    ///
    /// # Errors
    ///
    /// Returns a [`TransformError`] when the input or key material is
    /// unusable.
    fn transform(&self, data: &[u8]) -> Result<Vec<u8>, TransformError>;
}

impl<F> Transform for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, TransformError>,
{
    fn transform(&self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self(data)
    }
}

/// Transform that always fails with [`TransformError::MissingKey`].
///
/// Used when no key is configured, so `plain` builds still work and
/// `encrypted`/`both` builds fail after validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unkeyed;

impl Transform for Unkeyed {
    fn transform(&self, _data: &[u8]) -> Result<Vec<u8>, TransformError> {
        Err(TransformError::MissingKey)
    }
}

/// 128-bit TEA key, stored as four little-endian words.
#[derive(Clone, PartialEq, Eq)]
pub struct TeaKey([u32; 4]);

impl TeaKey {
    /// Build a key from 16 raw bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self(words)
    }

    /// Parse a key from 32 hex characters.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Hex`] for non-hex input and [`KeyError::Length`]
    /// when the decoded key is not 16 bytes.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s.trim())?;
        let bytes: [u8; 16] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::Length(bytes.len()))?;
        Ok(Self::from_bytes(bytes))
    }
}

// Never print key material.
impl std::fmt::Debug for TeaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TeaKey(..)")
    }
}

/// TEA in ECB mode over little-endian words.
///
/// The final block is zero-padded, so the output length is the input length
/// rounded up to [`TEA_BLOCK_SIZE`].
#[derive(Debug, Clone)]
pub struct Tea {
    key: TeaKey,
}

impl Tea {
    /// Create a cipher with the given key.
    pub fn new(key: TeaKey) -> Self {
        Self { key }
    }

    /// Encrypt `data`, zero-padding the final block.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::EmptyInput`] for empty input.
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        if data.is_empty() {
            return Err(TransformError::EmptyInput);
        }
        let mut out = data.to_vec();
        out.resize(data.len().next_multiple_of(TEA_BLOCK_SIZE), 0);
        for block in out.chunks_exact_mut(TEA_BLOCK_SIZE) {
            let (v0, v1) = read_block(block);
            let (v0, v1) = self.encrypt_block(v0, v1);
            write_block(block, v0, v1);
        }
        Ok(out)
    }

    /// Reverse [`Tea::encrypt`]. Padding is left in place.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Failed`] if `data` is not a whole number
    /// of blocks, and [`TransformError::EmptyInput`] for empty input.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        if data.is_empty() {
            return Err(TransformError::EmptyInput);
        }
        if data.len() % TEA_BLOCK_SIZE != 0 {
            return Err(TransformError::Failed(format!(
                "Ciphertext length {} is not a multiple of {TEA_BLOCK_SIZE}",
                data.len()
            )));
        }
        let mut out = data.to_vec();
        for block in out.chunks_exact_mut(TEA_BLOCK_SIZE) {
            let (v0, v1) = read_block(block);
            let (v0, v1) = self.decrypt_block(v0, v1);
            write_block(block, v0, v1);
        }
        Ok(out)
    }

    fn encrypt_block(&self, mut v0: u32, mut v1: u32) -> (u32, u32) {
        let [k0, k1, k2, k3] = self.key.0;
        let mut sum = 0u32;
        for _ in 0..CYCLES {
            sum = sum.wrapping_add(DELTA);
            v0 = v0.wrapping_add(
                (v1 << 4).wrapping_add(k0) ^ v1.wrapping_add(sum) ^ (v1 >> 5).wrapping_add(k1),
            );
            v1 = v1.wrapping_add(
                (v0 << 4).wrapping_add(k2) ^ v0.wrapping_add(sum) ^ (v0 >> 5).wrapping_add(k3),
            );
        }
        (v0, v1)
    }

    fn decrypt_block(&self, mut v0: u32, mut v1: u32) -> (u32, u32) {
        let [k0, k1, k2, k3] = self.key.0;
        let mut sum = DELTA.wrapping_mul(CYCLES);
        for _ in 0..CYCLES {
            v1 = v1.wrapping_sub(
                (v0 << 4).wrapping_add(k2) ^ v0.wrapping_add(sum) ^ (v0 >> 5).wrapping_add(k3),
            );
            v0 = v0.wrapping_sub(
                (v1 << 4).wrapping_add(k0) ^ v1.wrapping_add(sum) ^ (v1 >> 5).wrapping_add(k1),
            );
            sum = sum.wrapping_sub(DELTA);
        }
        (v0, v1)
    }
}

impl Transform for Tea {
    fn transform(&self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.encrypt(data)
    }
}

fn read_block(block: &[u8]) -> (u32, u32) {
    (
        u32::from_le_bytes([block[0], block[1], block[2], block[3]]),
        u32::from_le_bytes([block[4], block[5], block[6], block[7]]),
    )
}

fn write_block(block: &mut [u8], v0: u32, v1: u32) {
    block[..4].copy_from_slice(&v0.to_le_bytes());
    block[4..].copy_from_slice(&v1.to_le_bytes());
}
