//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Unified error type for core-logic operations.
///
/// This enum wraps all specific error types and provides a unified
/// error interface for the application layer.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Wallet(WalletError),

    #[error(transparent)]
    Network(NetworkError),

    #[error(transparent)]
    Tx(TxError),

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl From<ConfigError> for CoreError {
    fn from(e: ConfigError) -> Self {
        CoreError::Config(e)
    }
}

impl From<WalletError> for CoreError {
    fn from(e: WalletError) -> Self {
        CoreError::Wallet(e)
    }
}

impl From<NetworkError> for CoreError {
    fn from(e: NetworkError) -> Self {
        CoreError::Network(e)
    }
}

impl From<TxError> for CoreError {
    fn from(e: TxError) -> Self {
        CoreError::Tx(e)
    }
}

/// Configuration-related errors. Fatal at startup; a running session can
/// recover from a bad keys file via the reload operation.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Missing required environment variable: '{var}'")]
    MissingEnv { var: String },

    #[error("No usable private keys in {path}")]
    NoUsableKeys { path: String },

    #[error("I/O error on {path}: {msg}")]
    IoError { path: String, msg: String },
}

/// Wallet and key-material errors
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("Invalid private key format: expected hex string")]
    InvalidKeyFormat,

    #[error("Private key has wrong length: expected 64 hex chars, got {length}")]
    InvalidKeyLength { length: usize },

    #[error("Wallet not found at index {index} (total wallets: {total})")]
    NotFound { index: usize, total: usize },
}

/// Transport failures on read queries. Callers catch these, log them, and
/// leave any cached state unchanged.
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("RPC transport error: {reason}")]
    Transport { reason: String },

    #[error("Invalid response from node: {reason}")]
    InvalidResponse { reason: String },
}

/// Failures while tracking a submitted transaction. A confirmation timeout
/// does not cancel the underlying submission; the transaction may still be
/// mined later.
#[derive(Error, Debug, Clone)]
pub enum TxError {
    #[error("Confirmation timeout after {timeout_ms}ms for {tx_hash}")]
    ConfirmationTimeout { tx_hash: String, timeout_ms: u64 },

    #[error("RPC failure while awaiting {tx_hash}: {reason}")]
    Rpc { tx_hash: String, reason: String },
}
