//! Plaintext private-key file handling.
//!
//! Keys live one per line in a newline-delimited file. Blank lines and
//! lines starting with `#` are ignored; anything that is not 64 hex chars
//! (with an optional `0x` prefix) is skipped with a warning so one typo
//! does not disable every other wallet.

use crate::error::{ConfigError, CoreError, WalletError};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Environment variable overriding the keys file location.
pub const KEYS_FILE_ENV: &str = "KEYS_FILE";

/// Default keys file, relative to the working directory.
pub const DEFAULT_KEYS_FILE: &str = "./private_keys.txt";

const FILE_TEMPLATE: &str =
    "# Add your private keys here, one per line\n# Lines starting with # are ignored\n";

/// A raw signing key as read from the keys file. Zeroed on drop; `Debug`
/// never prints the material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***REDACTED***)")
    }
}

/// Loads signing keys from a newline-delimited file.
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves the file location from `KEYS_FILE`, falling back to the
    /// default local file.
    pub fn from_env() -> Self {
        let path = env::var(KEYS_FILE_ENV).unwrap_or_else(|_| DEFAULT_KEYS_FILE.to_string());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every usable key, in file order. When the file is missing it
    /// is created with a template comment and an empty list is returned.
    pub fn load(&self) -> Result<Vec<PrivateKey>, CoreError> {
        if !self.path.exists() {
            fs::write(&self.path, FILE_TEMPLATE).map_err(|e| ConfigError::IoError {
                path: self.path.display().to_string(),
                msg: e.to_string(),
            })?;
            info!("Created empty keys file at {}", self.path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| ConfigError::IoError {
            path: self.path.display().to_string(),
            msg: e.to_string(),
        })?;

        let mut keys = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match validate_key(trimmed) {
                Ok(()) => keys.push(PrivateKey::new(trimmed)),
                Err(e) => warn!(
                    "Skipping line {} of {}: {}",
                    lineno + 1,
                    self.path.display(),
                    e
                ),
            }
        }

        Ok(keys)
    }
}

fn validate_key(raw: &str) -> Result<(), WalletError> {
    let hex_part = raw.strip_prefix("0x").unwrap_or(raw);
    if hex_part.len() != 64 {
        return Err(WalletError::InvalidKeyLength {
            length: hex_part.len(),
        });
    }
    if hex::decode(hex_part).is_err() {
        return Err(WalletError::InvalidKeyFormat);
    }
    Ok(())
}
