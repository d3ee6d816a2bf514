//! The cipher engine seam and the per-record scheme tag.
//!
//! Every stored ciphertext carries the [`CipherScheme`] that produced it,
//! and is always decrypted by the engine for that scheme. Adding a scheme
//! never changes how existing records are read.

use serde::{Deserialize, Serialize};

use crate::ecb::EcbEngine;
use crate::error::CryptoError;
use crate::gcm::GcmEngine;
use crate::key::FileKey;

/// Identifies the engine that produced a ciphertext.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CipherScheme {
    /// AES-128 in electronic-codebook mode, no IV, no tag.
    #[default]
    LegacyEcb,
    /// AES-128-GCM with a random nonce per record.
    Gcm,
}

impl CipherScheme {
    /// Persisted tag for this scheme.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::LegacyEcb => 1,
            Self::Gcm => 2,
        }
    }

    /// Parse a persisted tag.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnknownScheme`] for unrecognized tags.
    pub const fn from_i64(tag: i64) -> Result<Self, CryptoError> {
        match tag {
            1 => Ok(Self::LegacyEcb),
            2 => Ok(Self::Gcm),
            other => Err(CryptoError::UnknownScheme(other)),
        }
    }
}

/// Block encryption over padded input.
///
/// `encrypt` takes plaintext that has already been PKCS#7 padded, so its
/// length is a multiple of 16; anything else is a caller bug and
/// is reported as [`CryptoError::UnalignedInput`]. `decrypt` returns the
/// padded plaintext; unpadding is the caller's job.
pub trait CipherEngine: Send + Sync {
    /// The scheme tag recorded next to ciphertexts from this engine.
    fn scheme(&self) -> CipherScheme;

    /// Encrypt block-aligned `padded` under `key`.
    ///
    /// # Errors
    ///
    /// [`CryptoError::UnalignedInput`] for unaligned input, or an engine
    /// specific failure.
    fn encrypt(&self, key: &FileKey, padded: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt `ciphertext` under `key`, returning padded plaintext.
    ///
    /// # Errors
    ///
    /// Engine specific: unaligned legacy input, malformed framing, or a
    /// failed authentication tag.
    fn decrypt(&self, key: &FileKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// The built-in engine for `scheme`.
#[must_use]
pub fn engine_for(scheme: CipherScheme) -> Box<dyn CipherEngine> {
    match scheme {
        CipherScheme::LegacyEcb => Box::new(EcbEngine),
        CipherScheme::Gcm => Box::new(GcmEngine),
    }
}

pub(crate) const fn check_aligned(input: &[u8]) -> Result<(), CryptoError> {
    if input.len() % crate::padding::BLOCK_LEN != 0 {
        return Err(CryptoError::UnalignedInput { len: input.len() });
    }
    Ok(())
}
