//! Password-to-key material.
//!
//! The per-file key is the UTF-8 bytes of the user's 16-byte password,
//! taken verbatim as an AES-128 key. There is no KDF and no salt: every
//! ciphertext already stored was produced this way, so the derivation must
//! stay exactly as it is for those files to remain readable.

use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::memory::SecretBytes;

/// AES-128 key length in bytes; also the required password length.
pub const KEY_LEN: usize = 16;

/// A per-file cipher key. Zeroized on drop, masked in `Debug`.
pub type FileKey = SecretBytes<KEY_LEN>;

/// Check that `password` is exactly [`KEY_LEN`] bytes once UTF-8 encoded.
///
/// The length is counted in bytes, not characters: a 16-character password
/// containing multibyte characters is rejected.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeyLength`] for any other length.
pub const fn validate_password(password: &str) -> Result<(), CryptoError> {
    let actual = password.len();
    if actual != KEY_LEN {
        return Err(CryptoError::InvalidKeyLength { actual });
    }
    Ok(())
}

/// Derive the file key for `password`.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeyLength`] unless the password is
/// exactly 16 bytes.
pub fn derive(password: &str) -> Result<FileKey, CryptoError> {
    validate_password(password)?;
    let mut raw: [u8; KEY_LEN] =
        password
            .as_bytes()
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                actual: password.len(),
            })?;
    let key = FileKey::new(raw);
    raw.zeroize();
    Ok(key)
}
