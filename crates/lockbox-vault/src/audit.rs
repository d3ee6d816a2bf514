//! Activity-log side channel.
//!
//! The vault reports uploads and deletions through an injected
//! [`AuditSink`]. Sinks are fire-and-forget from the vault's point of
//! view: their errors are logged and never reach the caller.

use std::sync::{Arc, Mutex};

use rusqlite::params;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::VaultDb;
use crate::record::now_rfc3339;
use crate::store::lock_db;

/// Kind of activity, stored verbatim in `activity_logs.activity_log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditKind {
    FileUpload,
    DeleteFile,
}

impl AuditKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FileUpload => "FileUpload",
            Self::DeleteFile => "DeleteFile",
        }
    }
}

/// Client details forwarded by the hosting application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// One activity-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub owner_id: String,
    pub kind: AuditKind,
    pub record_id: String,
    pub context: RequestContext,
    pub description: Option<String>,
}

/// Failure to record an audit event.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),

    #[error("audit write failed: {0}")]
    Write(String),
}

/// Receiver for [`AuditEvent`]s.
pub trait AuditSink: Send + Sync {
    /// Record one event.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] if the event could not be recorded.
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        (**self).record(event)
    }
}

/// Writes events to the `activity_logs` table.
#[derive(Debug, Clone)]
pub struct SqliteAuditSink {
    db: Arc<Mutex<VaultDb>>,
}

impl SqliteAuditSink {
    #[must_use]
    pub const fn new(db: Arc<Mutex<VaultDb>>) -> Self {
        Self { db }
    }
}

impl AuditSink for SqliteAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let db = lock_db(&self.db).map_err(|e| AuditError::Unavailable(e.to_string()))?;
        let description = event
            .description
            .clone()
            .unwrap_or_else(|| format!("file {}", event.record_id));
        db.connection()
            .execute(
                "INSERT INTO activity_logs (user_id, activity_log, ip_address, user_agent, \
                 description, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    event.owner_id,
                    event.kind.as_str(),
                    event.context.ip_address,
                    event.context.user_agent,
                    description,
                    now_rfc3339(),
                ],
            )
            .map_err(|e| AuditError::Write(e.to_string()))?;
        Ok(())
    }
}

/// Emits events as structured `tracing` records at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        tracing::info!(
            target: "lockbox::audit",
            owner_id = %event.owner_id,
            activity = event.kind.as_str(),
            record_id = %event.record_id,
            ip_address = event.context.ip_address.as_deref().unwrap_or("-"),
            "activity"
        );
        Ok(())
    }
}
