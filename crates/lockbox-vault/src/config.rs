//! Vault configuration: `lockbox.json` in the vault's data directory.
//!
//! Every field has a default, so a missing, partial, or corrupt file still
//! yields a usable configuration.

use std::fs;
use std::path::{Path, PathBuf};

use lockbox_crypto_core::CipherScheme;
use serde::{Deserialize, Serialize};

use crate::error::VaultError;

const CONFIG_FILE: &str = "lockbox.json";
const CONFIG_TMP_FILE: &str = ".lockbox.json.tmp";

/// Tunables for a vault instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfig {
    /// Largest plaintext accepted by `store`, in bytes.
    ///
    /// Whole files are held in memory during encryption and decryption.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: usize,

    /// Cipher scheme used for newly stored files. Existing records keep
    /// the scheme they were written with.
    #[serde(default)]
    pub store_scheme: CipherScheme,

    /// Database file name, relative to the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            store_scheme: CipherScheme::default(),
            database_file: default_database_file(),
        }
    }
}

/// 10 MiB.
const fn default_max_file_size() -> usize {
    10_485_760
}
fn default_database_file() -> String {
    "lockbox.db".into()
}

impl VaultConfig {
    /// Load `{data_dir}/lockbox.json`, falling back to defaults when the
    /// file is missing or unparseable.
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "invalid vault config, using defaults"
                );
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Persist to `{data_dir}/lockbox.json` via write-to-tmp then rename.
    ///
    /// # Errors
    ///
    /// [`VaultError::Config`] if serialization fails, [`VaultError::Io`] if
    /// the write or rename fails.
    pub fn save(&self, data_dir: &Path) -> Result<(), VaultError> {
        let path = data_dir.join(CONFIG_FILE);
        let tmp = data_dir.join(CONFIG_TMP_FILE);

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::Config(format!("failed to serialize config: {e}")))?;
        fs::write(&tmp, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Absolute path of the database file under `data_dir`.
    #[must_use]
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database_file)
    }
}
