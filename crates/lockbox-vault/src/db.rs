//! `SQLCipher` database connection, raw key injection, and migration runner.
//!
//! The whole database file is encrypted at rest with a 256-bit key owned by
//! the hosting application. This is independent of the per-file passwords:
//! the `files.ciphertext` column holds blobs that are already encrypted
//! before they reach SQLite.

use std::fmt;
use std::path::Path;

use lockbox_crypto_core::SecretBytes;
use rusqlite::Connection;
use zeroize::Zeroizing;

use crate::error::VaultError;

/// One forward-only schema step. `version` is the `user_version` the
/// database reports once the step is committed.
struct Migration {
    version: i32,
    name: &'static str,
    sql: &'static str,
}

/// Embedded at compile time, in ascending `version` order starting at 1.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: include_str!("../migrations/001_initial_schema.sql"),
    },
    Migration {
        version: 2,
        name: "add_cipher_scheme",
        sql: include_str!("../migrations/002_add_cipher_scheme.sql"),
    },
];

/// Schema version this build writes.
const LATEST_VERSION: i32 = 2;

/// Handle to an open, keyed and migrated `SQLCipher` database.
pub struct VaultDb {
    conn: Connection,
}

impl fmt::Debug for VaultDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultDb(***)")
    }
}

impl VaultDb {
    /// Open (or create) the encrypted database at `path`.
    ///
    /// Injects the raw key with `SQLCipher`'s internal PBKDF2 disabled,
    /// verifies the key with a first read, enables WAL, then brings the
    /// schema up to date.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidDatabaseKey`] if the key is wrong.
    /// - [`VaultError::Database`] for other `SQLCipher` errors.
    /// - [`VaultError::Migration`] if a migration fails, or the file was
    ///   written by a newer schema.
    pub fn open(path: &Path, raw_key: &SecretBytes<32>) -> Result<Self, VaultError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(&key_pragma(raw_key))?;
        conn.execute_batch("PRAGMA kdf_iter = 1;")?;
        // Wrong key surfaces as SQLITE_NOTADB on the first read.
        conn.execute_batch("SELECT count(*) FROM sqlite_master;")?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;

        let mut db = Self { conn };
        db.migrate()?;

        tracing::debug!(
            schema_version = db.schema_version()?,
            cipher_version = %db.cipher_version(),
            path = %path.display(),
            "vault database opened"
        );
        Ok(db)
    }

    /// Returns a reference to the underlying [`rusqlite::Connection`].
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns the `SQLCipher` version string, empty if not linked.
    #[must_use]
    pub fn cipher_version(&self) -> String {
        self.conn
            .pragma_query_value(None, "cipher_version", |row| row.get(0))
            .unwrap_or_default()
    }

    /// Returns the current schema version (`PRAGMA user_version`).
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the pragma query fails.
    pub fn schema_version(&self) -> Result<i32, VaultError> {
        Ok(self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?)
    }

    /// Apply every migration above the stored version.
    fn migrate(&mut self) -> Result<(), VaultError> {
        let current = self.schema_version()?;
        if current > LATEST_VERSION {
            return Err(VaultError::Migration(format!(
                "database schema v{current} is newer than supported v{LATEST_VERSION}"
            )));
        }

        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            apply(&mut self.conn, migration)?;
            tracing::info!(
                version = migration.version,
                name = migration.name,
                "applied vault migration"
            );
        }
        Ok(())
    }
}

/// Run `migration` and bump `user_version` in a single transaction.
fn apply(conn: &mut Connection, migration: &Migration) -> Result<(), VaultError> {
    let fail = |stage: &str, e: rusqlite::Error| {
        VaultError::Migration(format!(
            "migration {} ({}) {stage}: {e}",
            migration.version, migration.name
        ))
    };

    let tx = conn.transaction().map_err(|e| fail("could not begin", e))?;
    tx.execute_batch(migration.sql).map_err(|e| fail("failed", e))?;
    tx.pragma_update(None, "user_version", migration.version)
        .map_err(|e| fail("could not record version", e))?;
    tx.commit().map_err(|e| fail("could not commit", e))
}

/// `PRAGMA key = "x'<hex>'";` for a raw key, in a buffer wiped on drop.
fn key_pragma(raw_key: &SecretBytes<32>) -> Zeroizing<String> {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    const PREFIX: &str = "PRAGMA key = \"x'";
    const SUFFIX: &str = "'\";";
    const LEN: usize = PREFIX.len() + 64 + SUFFIX.len();

    let mut pragma = Zeroizing::new(String::with_capacity(LEN));
    pragma.push_str(PREFIX);
    for &b in raw_key.expose() {
        pragma.push(char::from(HEX[usize::from(b / 16)]));
        pragma.push(char::from(HEX[usize::from(b % 16)]));
    }
    pragma.push_str(SUFFIX);
    pragma
}
