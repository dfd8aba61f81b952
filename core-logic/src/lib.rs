//! # Core Logic - Shared Utilities for the Multi-Wallet Bot
//!
//! This crate provides the chain-agnostic pieces of the bot: the error
//! taxonomy, logging setup, private-key file handling, and cancellable
//! delay primitives used by the orchestration loops.
//!
//! ## Modules
//!
//! - [`error`] - Typed error handling with thiserror
//! - `utils` - Utility modules (key store, logger, delays)

// Module declarations - internal modules marked pub(crate)
pub mod error;
pub(crate) mod utils;

// Selective exports - only public API types
pub use error::{ConfigError, CoreError, NetworkError, TxError, WalletError};
pub use utils::{jitter_range, setup_logger, sleep_cancellable, KeyStore, PrivateKey};
pub use utils::{DEFAULT_KEYS_FILE, KEYS_FILE_ENV};
