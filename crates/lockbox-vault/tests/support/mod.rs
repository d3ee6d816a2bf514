//! Shared fixtures for the vault integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lockbox_crypto_core::{
    engine_for, CipherEngine, CipherScheme, CryptoError, FileKey, SecretBytes,
};
use lockbox_vault::{
    AuditError, AuditEvent, AuditSink, FileRecord, FileRecordSummary, RecordStatus, RecordStore,
    SqliteAuditSink, SqliteRecordStore, SqliteVaultService, VaultConfig, VaultDb, VaultError,
    VaultService,
};
use tempfile::TempDir;

pub const PASSWORD: &str = "ABCDEFGHIJKLMNOP";
pub const WRONG_PASSWORD: &str = "WRONGWRONGWRONG!";

/// 37 bytes, 0x00..=0x24.
pub fn sample_file() -> Vec<u8> {
    (0u8..37).collect()
}

/// A fresh encrypted database in a temp directory.
pub struct Fixture {
    pub dir: TempDir,
    pub db: Arc<Mutex<VaultDb>>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let key = SecretBytes::new([0x42; 32]);
        let db = VaultDb::open(&dir.path().join("lockbox.db"), &key).unwrap();
        Self {
            dir,
            db: Arc::new(Mutex::new(db)),
        }
    }

    pub fn records(&self) -> SqliteRecordStore {
        SqliteRecordStore::new(Arc::clone(&self.db))
    }

    pub fn service(&self, config: &VaultConfig) -> SqliteVaultService {
        VaultService::new(self.records(), SqliteAuditSink::new(Arc::clone(&self.db)), config)
    }

    pub fn service_with_audit<A: AuditSink>(
        &self,
        audit: A,
        config: &VaultConfig,
    ) -> VaultService<SqliteRecordStore, A> {
        VaultService::new(self.records(), audit, config)
    }

    /// Run raw SQL against the database, bypassing the service.
    pub fn execute(&self, sql: &str, params: impl rusqlite::Params) -> usize {
        self.db.lock().unwrap().connection().execute(sql, params).unwrap()
    }

    pub fn stored_ciphertext(&self, record_id: &str) -> Vec<u8> {
        self.db
            .lock()
            .unwrap()
            .connection()
            .query_row(
                "SELECT ciphertext FROM files WHERE id = ?1",
                [record_id],
                |row| row.get(0),
            )
            .unwrap()
    }

    pub fn activity_rows(&self) -> Vec<(String, String)> {
        let db = self.db.lock().unwrap();
        let mut stmt = db
            .connection()
            .prepare("SELECT user_id, activity_log FROM activity_logs ORDER BY id")
            .unwrap();
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        rows
    }
}

// ---------------------------------------------------------------------------
// Audit sinks
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct RecordingAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl RecordingAuditSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub struct FailingAuditSink;

impl AuditSink for FailingAuditSink {
    fn record(&self, _event: &AuditEvent) -> Result<(), AuditError> {
        Err(AuditError::Unavailable("activity log offline".into()))
    }
}

pub struct PanickingAuditSink;

impl AuditSink for PanickingAuditSink {
    fn record(&self, _event: &AuditEvent) -> Result<(), AuditError> {
        panic!("activity log exploded");
    }
}

// ---------------------------------------------------------------------------
// Engine spy
// ---------------------------------------------------------------------------

/// Wraps a built-in engine and counts calls into it.
pub struct SpyEngine {
    inner: Box<dyn CipherEngine>,
    pub encrypts: Arc<AtomicUsize>,
    pub decrypts: Arc<AtomicUsize>,
}

impl SpyEngine {
    pub fn new(scheme: CipherScheme) -> Self {
        Self {
            inner: engine_for(scheme),
            encrypts: Arc::new(AtomicUsize::new(0)),
            decrypts: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl CipherEngine for SpyEngine {
    fn scheme(&self) -> CipherScheme {
        self.inner.scheme()
    }

    fn encrypt(&self, key: &FileKey, padded: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.encrypts.fetch_add(1, Ordering::SeqCst);
        self.inner.encrypt(key, padded)
    }

    fn decrypt(&self, key: &FileKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.decrypts.fetch_add(1, Ordering::SeqCst);
        self.inner.decrypt(key, ciphertext)
    }
}

// ---------------------------------------------------------------------------
// In-memory record store
// ---------------------------------------------------------------------------

/// `RecordStore` over a `HashMap`, for tests that don't need SQLite.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, FileRecord>>,
}

impl RecordStore for MemoryStore {
    fn insert(&self, record: &FileRecord) -> Result<(), VaultError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.id) {
            return Err(VaultError::Database("duplicate id".into()));
        }
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn find_owned(
        &self,
        record_id: &str,
        owner_id: &str,
    ) -> Result<Option<FileRecord>, VaultError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(record_id)
            .filter(|r| r.owner_id == owner_id && r.status == RecordStatus::Active)
            .cloned())
    }

    fn list_owned(&self, owner_id: &str) -> Result<Vec<FileRecordSummary>, VaultError> {
        let mut listed: Vec<FileRecordSummary> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner_id == owner_id && r.status == RecordStatus::Active)
            .map(|r| FileRecordSummary {
                id: r.id.clone(),
                display_name: r.display_name.clone(),
                stored_file_name: r.stored_file_name.clone(),
                ciphertext_len: i64::try_from(r.ciphertext.len()).unwrap(),
                cipher_scheme: r.cipher_scheme,
                created_at: r.created_at.clone(),
                updated_at: r.updated_at.clone(),
            })
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    fn mark_deleted(
        &self,
        record_id: &str,
        owner_id: &str,
        updated_at: &str,
    ) -> Result<bool, VaultError> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(record_id) {
            Some(r) if r.owner_id == owner_id && r.status == RecordStatus::Active => {
                r.status = RecordStatus::Deleted;
                r.updated_at = updated_at.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
