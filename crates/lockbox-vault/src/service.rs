//! Encrypt-on-store and decrypt-on-retrieve for password-protected files.
//!
//! [`VaultService`] ties the cipher pipeline to a [`RecordStore`] and an
//! [`AuditSink`]:
//!
//! - store: password length → size cap → pad → derive key → encrypt →
//!   insert → `FileUpload`
//! - retrieve: owner-scoped lookup → password length → derive key →
//!   decrypt → unpad
//! - delete: owner-scoped soft delete → `DeleteFile`
//!
//! The service holds no mutable state; every method takes `&self`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::{Arc, Mutex};

use lockbox_crypto_core::{
    engine_for, key, padding, CipherEngine, CipherScheme, CryptoError, SecretBuffer, SecretBytes,
};
use zeroize::Zeroizing;

use crate::audit::{AuditEvent, AuditKind, AuditSink, RequestContext, SqliteAuditSink};
use crate::config::VaultConfig;
use crate::db::VaultDb;
use crate::error::VaultError;
use crate::record::{
    base_name, generate_id, now_rfc3339, FileRecord, FileRecordSummary, RecordStatus,
};
use crate::store::{RecordStore, SqliteRecordStore};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Parameters for [`VaultService::store`].
#[derive(Debug, Clone, Copy)]
pub struct StoreRequest<'a> {
    pub owner_id: &'a str,
    pub display_name: &'a str,
    pub data: &'a [u8],
    /// Name of the uploaded file; only its final path component is kept.
    pub file_base_name: &'a str,
    pub password: &'a str,
    pub context: Option<&'a RequestContext>,
}

/// A decrypted file and the name to offer it under.
#[derive(Debug)]
pub struct DecryptedFile {
    pub file_name: String,
    pub data: SecretBuffer,
}

/// One engine per scheme, swappable for tests.
struct EngineSet {
    legacy: Box<dyn CipherEngine>,
    gcm: Box<dyn CipherEngine>,
}

impl EngineSet {
    fn builtin() -> Self {
        Self {
            legacy: engine_for(CipherScheme::LegacyEcb),
            gcm: engine_for(CipherScheme::Gcm),
        }
    }

    fn get(&self, scheme: CipherScheme) -> &dyn CipherEngine {
        match scheme {
            CipherScheme::LegacyEcb => self.legacy.as_ref(),
            CipherScheme::Gcm => self.gcm.as_ref(),
        }
    }

    fn replace(&mut self, engine: Box<dyn CipherEngine>) {
        match engine.scheme() {
            CipherScheme::LegacyEcb => self.legacy = engine,
            CipherScheme::Gcm => self.gcm = engine,
        }
    }
}

/// Ownership-scoped encrypted file vault.
pub struct VaultService<S, A> {
    store: S,
    audit: A,
    engines: EngineSet,
    store_scheme: CipherScheme,
    max_file_size: usize,
}

impl<S, A> std::fmt::Debug for VaultService<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultService")
            .field("store_scheme", &self.store_scheme)
            .field("max_file_size", &self.max_file_size)
            .finish_non_exhaustive()
    }
}

/// The `SQLCipher`-backed service.
pub type SqliteVaultService = VaultService<SqliteRecordStore, SqliteAuditSink>;

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl<S: RecordStore, A: AuditSink> VaultService<S, A> {
    /// Build a service with the built-in engines.
    #[must_use]
    pub fn new(store: S, audit: A, config: &VaultConfig) -> Self {
        Self {
            store,
            audit,
            engines: EngineSet::builtin(),
            store_scheme: config.store_scheme,
            max_file_size: config.max_file_size_bytes,
        }
    }

    /// Replace the engine registered for `engine.scheme()`.
    #[must_use]
    pub fn with_engine(mut self, engine: Box<dyn CipherEngine>) -> Self {
        self.engines.replace(engine);
        self
    }

    /// Scheme applied to newly stored files.
    #[must_use]
    pub const fn store_scheme(&self) -> CipherScheme {
        self.store_scheme
    }
}

impl SqliteVaultService {
    /// Open the vault in `data_dir`: load `lockbox.json`, open the
    /// encrypted database, and share it between the record store and the
    /// activity log.
    ///
    /// # Errors
    ///
    /// Propagates [`VaultDb::open`] errors.
    pub fn open(data_dir: &Path, db_key: &SecretBytes<32>) -> Result<Self, VaultError> {
        let config = VaultConfig::load(data_dir);
        let db = VaultDb::open(&config.database_path(data_dir), db_key)?;
        let db = Arc::new(Mutex::new(db));
        Ok(Self::new(
            SqliteRecordStore::new(Arc::clone(&db)),
            SqliteAuditSink::new(db),
            &config,
        ))
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl<S: RecordStore, A: AuditSink> VaultService<S, A> {
    /// Encrypt `req.data` under `req.password` and persist it for
    /// `req.owner_id`.
    ///
    /// The record is written in one insert; if that fails nothing is
    /// stored and no audit event is emitted.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidKeyLength`] if the password is not 16 bytes
    /// - [`VaultError::FileSizeLimitExceeded`] if the file is over the cap
    /// - [`VaultError::Crypto`] if the engine rejects its input (a bug)
    /// - [`VaultError::Database`] if the insert fails
    pub fn store(&self, req: &StoreRequest<'_>) -> Result<FileRecord, VaultError> {
        key::validate_password(req.password).map_err(user_key_error)?;

        if req.data.len() > self.max_file_size {
            return Err(VaultError::FileSizeLimitExceeded {
                max_bytes: self.max_file_size,
                actual_bytes: req.data.len(),
            });
        }

        let padded = Zeroizing::new(padding::pad(req.data));
        let file_key = key::derive(req.password).map_err(user_key_error)?;
        let engine = self.engines.get(self.store_scheme);
        let ciphertext = engine
            .encrypt(&file_key, &padded)
            .map_err(contract_violation)?;

        let now = now_rfc3339();
        let record = FileRecord {
            id: generate_id(),
            owner_id: req.owner_id.to_string(),
            display_name: req.display_name.to_string(),
            stored_file_name: base_name(req.file_base_name).to_string(),
            ciphertext,
            status: RecordStatus::Active,
            cipher_scheme: engine.scheme(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.store.insert(&record)?;

        tracing::info!(
            record_id = %record.id,
            owner_id = %record.owner_id,
            scheme = ?record.cipher_scheme,
            size_bytes = req.data.len(),
            "file stored"
        );
        self.emit(&AuditEvent {
            owner_id: record.owner_id.clone(),
            kind: AuditKind::FileUpload,
            record_id: record.id.clone(),
            context: req.context.cloned().unwrap_or_default(),
            description: Some(format!("uploaded {}", record.stored_file_name)),
        });

        Ok(record)
    }

    /// Decrypt record `record_id` for `requester_id`.
    ///
    /// Ownership is checked before the password is even looked at.
    ///
    /// # Errors
    ///
    /// - [`VaultError::NotFound`] if the record is absent, deleted, or owned
    ///   by someone else
    /// - [`VaultError::InvalidKeyLength`] if the password is not 16 bytes
    /// - [`VaultError::DecryptionFailed`] on a wrong password or corrupted
    ///   ciphertext
    /// - [`VaultError::Database`] if the lookup fails
    pub fn retrieve(
        &self,
        requester_id: &str,
        record_id: &str,
        password: &str,
    ) -> Result<DecryptedFile, VaultError> {
        let record = self
            .store
            .find_owned(record_id, requester_id)?
            .ok_or(VaultError::NotFound)?;

        let file_key = key::derive(password).map_err(user_key_error)?;
        let engine = self.engines.get(record.cipher_scheme);

        let padded = Zeroizing::new(
            engine
                .decrypt(&file_key, &record.ciphertext)
                .map_err(|e| decrypt_error(e, &record.id))?,
        );
        let plaintext = padding::unpad(&padded).map_err(|e| decrypt_error(e, &record.id))?;

        Ok(DecryptedFile {
            file_name: record.stored_file_name,
            data: SecretBuffer::from_vec(plaintext),
        })
    }

    /// Delete record `record_id` on behalf of `requester_id`.
    ///
    /// The row is flagged deleted; every later retrieval is `NotFound`.
    ///
    /// # Errors
    ///
    /// - [`VaultError::NotFound`] if there is no active record with that ID
    ///   owned by the requester
    /// - [`VaultError::Database`] if the update fails
    pub fn delete(
        &self,
        requester_id: &str,
        record_id: &str,
        context: Option<&RequestContext>,
    ) -> Result<(), VaultError> {
        if !self
            .store
            .mark_deleted(record_id, requester_id, &now_rfc3339())?
        {
            return Err(VaultError::NotFound);
        }

        tracing::info!(record_id = %record_id, owner_id = %requester_id, "file deleted");
        self.emit(&AuditEvent {
            owner_id: requester_id.to_string(),
            kind: AuditKind::DeleteFile,
            record_id: record_id.to_string(),
            context: context.cloned().unwrap_or_default(),
            description: None,
        });
        Ok(())
    }

    /// Active files of `owner_id`, newest first. Ciphertexts are not read.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the query fails.
    pub fn list(&self, owner_id: &str) -> Result<Vec<FileRecordSummary>, VaultError> {
        self.store.list_owned(owner_id)
    }

    /// Hand `event` to the audit sink, swallowing errors and panics.
    fn emit(&self, event: &AuditEvent) {
        match catch_unwind(AssertUnwindSafe(|| self.audit.record(event))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(
                activity = event.kind.as_str(),
                record_id = %event.record_id,
                error = %e,
                "audit event dropped"
            ),
            Err(_) => tracing::warn!(
                activity = event.kind.as_str(),
                record_id = %event.record_id,
                "audit sink panicked, event dropped"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn user_key_error(err: CryptoError) -> VaultError {
    match err {
        CryptoError::InvalidKeyLength { actual } => VaultError::InvalidKeyLength { actual },
        other => VaultError::Crypto(other),
    }
}

fn contract_violation(err: CryptoError) -> VaultError {
    tracing::error!(error = %err, "cipher engine rejected its input");
    VaultError::Crypto(err)
}

/// Anything that says "these bytes do not decrypt under this key" collapses
/// to `DecryptionFailed`. A stored legacy blob that is not block aligned is
/// corrupted data, not a caller bug.
fn decrypt_error(err: CryptoError, record_id: &str) -> VaultError {
    match err {
        CryptoError::InvalidPadding
        | CryptoError::Decryption
        | CryptoError::MalformedCiphertext(_)
        | CryptoError::UnalignedInput { .. } => {
            tracing::debug!(record_id = %record_id, "file decryption failed");
            VaultError::DecryptionFailed
        }
        other => VaultError::Crypto(other),
    }
}
