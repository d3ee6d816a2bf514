//! Vault error types for `lockbox-vault`.

use lockbox_crypto_core::CryptoError;
use thiserror::Error;

/// Errors produced by vault operations.
///
/// The first four variants are the caller-facing outcomes of a request and
/// are deterministic for the given input, so retrying never helps. The
/// rest indicate a bug or an environment failure.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The file password is not exactly 16 bytes. No cipher work was done.
    #[error("invalid password: expected exactly 16 bytes, got {actual}")]
    InvalidKeyLength {
        /// Byte length of the rejected password.
        actual: usize,
    },

    /// Wrong password or corrupted ciphertext; the two are indistinguishable.
    #[error("invalid password or corrupted file")]
    DecryptionFailed,

    /// No active record with that ID belongs to the requester.
    ///
    /// Covers absent, deleted, and foreign records alike.
    #[error("file not found")]
    NotFound,

    /// Upload exceeds the configured size cap.
    #[error("file size {actual_bytes} bytes exceeds maximum {max_bytes} bytes")]
    FileSizeLimitExceeded {
        /// Maximum allowed size in bytes.
        max_bytes: usize,
        /// Actual file size in bytes.
        actual_bytes: usize,
    },

    /// The `SQLCipher` database key is wrong.
    #[error("invalid database key")]
    InvalidDatabaseKey,

    /// Cipher contract violation or primitive failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// `SQLCipher` database error.
    #[error("database error: {0}")]
    Database(String),

    /// Migration error during schema upgrade.
    #[error("migration error: {0}")]
    Migration(String),

    /// Configuration could not be written.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// Whether this error describes the caller's input rather than a fault.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidKeyLength { .. }
                | Self::DecryptionFailed
                | Self::NotFound
                | Self::FileSizeLimitExceeded { .. }
        )
    }
}

impl From<rusqlite::Error> for VaultError {
    fn from(err: rusqlite::Error) -> Self {
        // SQLITE_NOTADB (code 26) signals an incorrect encryption key.
        if let rusqlite::Error::SqliteFailure(ref ffi_err, _) = err {
            if ffi_err.code == rusqlite::ffi::ErrorCode::NotADatabase {
                return Self::InvalidDatabaseKey;
            }
        }
        Self::Database(err.to_string())
    }
}
