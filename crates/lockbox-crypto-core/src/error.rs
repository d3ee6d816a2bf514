//! Cryptographic error types for `lockbox-crypto-core`.

use thiserror::Error;

/// Errors produced by key derivation, padding, and cipher engines.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The password is not exactly 16 bytes once UTF-8 encoded.
    #[error("invalid key length: {actual} bytes (expected 16)")]
    InvalidKeyLength {
        /// Byte length of the rejected password.
        actual: usize,
    },

    /// PKCS#7 padding check failed: wrong key, corrupted or truncated data.
    #[error("invalid padding")]
    InvalidPadding,

    /// Engine input is not a whole number of 16-byte blocks.
    ///
    /// Callers pad before encrypting, so this signals a bug upstream.
    #[error("input of {len} bytes is not block aligned")]
    UnalignedInput {
        /// Length of the offending input.
        len: usize,
    },

    /// Authentication tag verification failed: tampered data or wrong key.
    #[error("decryption failed: authentication tag mismatch")]
    Decryption,

    /// Ciphertext framing is invalid (too short to hold nonce and tag).
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// The underlying encryption primitive failed.
    #[error("encryption error: {0}")]
    Encryption(String),

    /// A persisted cipher scheme tag is not known to this build.
    #[error("unknown cipher scheme tag: {0}")]
    UnknownScheme(i64),

    /// Secure memory allocation or CSPRNG failure.
    #[error("secure memory error: {0}")]
    SecureMemory(String),
}
