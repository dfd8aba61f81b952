//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

// Internal modules - not part of public API
pub(crate) mod delay;
pub(crate) mod keys;
pub(crate) mod logger;

// Selective exports - only public utilities
pub use delay::{jitter_range, sleep_cancellable};
pub use keys::{KeyStore, PrivateKey, DEFAULT_KEYS_FILE, KEYS_FILE_ENV};
pub use logger::setup_logger;
