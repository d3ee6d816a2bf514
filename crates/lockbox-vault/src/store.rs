//! Record repository: the [`RecordStore`] seam and its `SQLCipher` backend.
//!
//! Lookups are always scoped to an owner in the query itself. A record
//! that exists but belongs to someone else is indistinguishable from one
//! that does not exist.

use std::sync::{Arc, Mutex, MutexGuard};

use lockbox_crypto_core::CipherScheme;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::VaultDb;
use crate::error::VaultError;
use crate::record::{FileRecord, FileRecordSummary, RecordStatus};

/// Persistence for [`FileRecord`]s.
pub trait RecordStore: Send + Sync {
    /// Persist a new record in one atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the write fails; nothing is
    /// persisted in that case.
    fn insert(&self, record: &FileRecord) -> Result<(), VaultError>;

    /// The active record `record_id` if it is owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the query fails.
    fn find_owned(&self, record_id: &str, owner_id: &str)
        -> Result<Option<FileRecord>, VaultError>;

    /// Active records of `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the query fails.
    fn list_owned(&self, owner_id: &str) -> Result<Vec<FileRecordSummary>, VaultError>;

    /// Flag an active, owned record as deleted. Returns `false` when no
    /// such record exists.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the update fails.
    fn mark_deleted(
        &self,
        record_id: &str,
        owner_id: &str,
        updated_at: &str,
    ) -> Result<bool, VaultError>;
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn insert(&self, record: &FileRecord) -> Result<(), VaultError> {
        (**self).insert(record)
    }

    fn find_owned(
        &self,
        record_id: &str,
        owner_id: &str,
    ) -> Result<Option<FileRecord>, VaultError> {
        (**self).find_owned(record_id, owner_id)
    }

    fn list_owned(&self, owner_id: &str) -> Result<Vec<FileRecordSummary>, VaultError> {
        (**self).list_owned(owner_id)
    }

    fn mark_deleted(
        &self,
        record_id: &str,
        owner_id: &str,
        updated_at: &str,
    ) -> Result<bool, VaultError> {
        (**self).mark_deleted(record_id, owner_id, updated_at)
    }
}

// ---------------------------------------------------------------------------
// SQLCipher backend
// ---------------------------------------------------------------------------

/// [`RecordStore`] over the `files` table of a [`VaultDb`].
///
/// The connection is shared behind a mutex so one database can back both
/// the record store and the activity log.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    db: Arc<Mutex<VaultDb>>,
}

impl SqliteRecordStore {
    #[must_use]
    pub const fn new(db: Arc<Mutex<VaultDb>>) -> Self {
        Self { db }
    }

    fn lock(&self) -> Result<MutexGuard<'_, VaultDb>, VaultError> {
        lock_db(&self.db)
    }
}

pub(crate) fn lock_db(db: &Mutex<VaultDb>) -> Result<MutexGuard<'_, VaultDb>, VaultError> {
    db.lock()
        .map_err(|_| VaultError::Database("vault database lock poisoned".into()))
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<(FileRecord, i64, i64)> {
    Ok((
        FileRecord {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            display_name: row.get(2)?,
            stored_file_name: row.get(3)?,
            ciphertext: row.get(4)?,
            status: RecordStatus::Active,
            cipher_scheme: CipherScheme::LegacyEcb,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        },
        row.get(5)?,
        row.get(6)?,
    ))
}

impl RecordStore for SqliteRecordStore {
    fn insert(&self, record: &FileRecord) -> Result<(), VaultError> {
        let db = self.lock()?;
        db.connection()
            .execute(
                "INSERT INTO files (id, owner_id, display_name, stored_file_name, ciphertext, \
                 status, cipher_scheme, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id,
                    record.owner_id,
                    record.display_name,
                    record.stored_file_name,
                    record.ciphertext,
                    record.status.as_i64(),
                    record.cipher_scheme.as_i64(),
                    record.created_at,
                    record.updated_at,
                ],
            )
            .map_err(|e| VaultError::Database(format!("failed to insert file record: {e}")))?;
        Ok(())
    }

    fn find_owned(
        &self,
        record_id: &str,
        owner_id: &str,
    ) -> Result<Option<FileRecord>, VaultError> {
        let db = self.lock()?;
        let row = db
            .connection()
            .query_row(
                "SELECT id, owner_id, display_name, stored_file_name, ciphertext, status, \
                 cipher_scheme, created_at, updated_at \
                 FROM files WHERE id = ?1 AND owner_id = ?2 AND status = ?3",
                params![record_id, owner_id, RecordStatus::Active.as_i64()],
                record_from_row,
            )
            .optional()
            .map_err(|e| VaultError::Database(format!("failed to query file record: {e}")))?;

        let Some((mut record, status, scheme)) = row else {
            return Ok(None);
        };
        record.status = RecordStatus::from_i64(status)?;
        record.cipher_scheme = CipherScheme::from_i64(scheme)?;
        Ok(Some(record))
    }

    fn list_owned(&self, owner_id: &str) -> Result<Vec<FileRecordSummary>, VaultError> {
        let db = self.lock()?;
        let mut stmt = db
            .connection()
            .prepare(
                "SELECT id, display_name, stored_file_name, length(ciphertext), cipher_scheme, \
                 created_at, updated_at \
                 FROM files WHERE owner_id = ?1 AND status = ?2 \
                 ORDER BY created_at DESC, rowid DESC",
            )
            .map_err(|e| VaultError::Database(format!("failed to prepare file listing: {e}")))?;

        let rows = stmt
            .query_map(params![owner_id, RecordStatus::Active.as_i64()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })
            .map_err(|e| VaultError::Database(format!("failed to list files: {e}")))?;

        let mut result = Vec::new();
        for row in rows {
            let (
                id,
                display_name,
                stored_file_name,
                ciphertext_len,
                scheme,
                created_at,
                updated_at,
            ) = row.map_err(|e| VaultError::Database(format!("failed to read file row: {e}")))?;
            result.push(FileRecordSummary {
                id,
                display_name,
                stored_file_name,
                ciphertext_len,
                cipher_scheme: CipherScheme::from_i64(scheme)?,
                created_at,
                updated_at,
            });
        }
        Ok(result)
    }

    fn mark_deleted(
        &self,
        record_id: &str,
        owner_id: &str,
        updated_at: &str,
    ) -> Result<bool, VaultError> {
        let db = self.lock()?;
        let rows_affected = db
            .connection()
            .execute(
                "UPDATE files SET status = ?1, updated_at = ?2 \
                 WHERE id = ?3 AND owner_id = ?4 AND status = ?5",
                params![
                    RecordStatus::Deleted.as_i64(),
                    updated_at,
                    record_id,
                    owner_id,
                    RecordStatus::Active.as_i64(),
                ],
            )
            .map_err(|e| VaultError::Database(format!("failed to delete file record: {e}")))?;
        Ok(rows_affected > 0)
    }
}
