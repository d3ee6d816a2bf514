//! The persisted file record and its listing projection.

use chrono::{SecondsFormat, Utc};
use lockbox_crypto_core::CipherScheme;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VaultError;

/// Lifecycle state of a record. `Active → Deleted` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordStatus {
    Active,
    Deleted,
}

impl RecordStatus {
    /// Persisted flag value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Active => 1,
            Self::Deleted => 0,
        }
    }

    /// Parse a persisted flag value.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] for values other than 0 and 1.
    pub fn from_i64(value: i64) -> Result<Self, VaultError> {
        match value {
            1 => Ok(Self::Active),
            0 => Ok(Self::Deleted),
            other => Err(VaultError::Database(format!(
                "unknown record status: {other}"
            ))),
        }
    }
}

/// An encrypted file owned by one user.
///
/// `ciphertext` is written once at creation. The password is never stored,
/// so the record alone cannot be decrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub owner_id: String,
    pub display_name: String,
    pub stored_file_name: String,
    #[serde(skip)]
    pub ciphertext: Vec<u8>,
    pub status: RecordStatus,
    pub cipher_scheme: CipherScheme,
    pub created_at: String,
    pub updated_at: String,
}

/// Record metadata for listings; the ciphertext column is not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecordSummary {
    pub id: String,
    pub display_name: String,
    pub stored_file_name: String,
    pub ciphertext_len: i64,
    pub cipher_scheme: CipherScheme,
    pub created_at: String,
    pub updated_at: String,
}

/// New random record identifier (UUID v4).
#[must_use]
pub(crate) fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC time, RFC 3339 with millisecond precision.
#[must_use]
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Final component of an uploaded file name, for either separator style.
#[must_use]
pub fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
