//! `lockbox-vault`: ownership-scoped encrypted file storage for Lockbox.
//!
//! Files are encrypted with a per-file 16-byte password before they reach
//! storage, kept as opaque blobs in a `SQLCipher` database, and decrypted
//! only for their owner on presentation of the same password. Uploads and
//! deletions are reported to an injected activity log.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod config;
pub mod db;
pub mod error;

pub mod record;
pub mod store;

pub mod audit;

pub mod service;

pub use audit::{
    AuditError, AuditEvent, AuditKind, AuditSink, RequestContext, SqliteAuditSink,
    TracingAuditSink,
};
pub use config::VaultConfig;
pub use db::VaultDb;
pub use error::VaultError;
pub use record::{base_name, FileRecord, FileRecordSummary, RecordStatus};
pub use service::{DecryptedFile, SqliteVaultService, StoreRequest, VaultService};
pub use store::{RecordStore, SqliteRecordStore};
