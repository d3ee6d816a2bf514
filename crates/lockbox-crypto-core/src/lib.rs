//! `lockbox-crypto-core`: per-file cipher primitives for Lockbox.
//!
//! Pure, synchronous building blocks with no storage or logging concerns:
//! password-to-key material, PKCS#7 padding, and the block cipher engines
//! that turn padded plaintext into the ciphertext stored per file.
//!
//! # Known weaknesses
//!
//! The legacy scheme is kept bit-compatible with files stored before this
//! crate existed, and inherits their flaws:
//! - the password bytes are the AES-128 key (no KDF, no salt);
//! - AES is applied in electronic-codebook mode, so equal plaintext blocks
//!   encrypt to equal ciphertext blocks;
//! - there is no authentication tag, padding is the only integrity signal.
//!
//! [`gcm::GcmEngine`] is the opt-in alternative for new records.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod key;
pub mod padding;

pub mod engine;

pub mod ecb;
pub mod gcm;

pub use ecb::EcbEngine;
pub use engine::{engine_for, CipherEngine, CipherScheme};
pub use error::CryptoError;
pub use gcm::GcmEngine;
pub use key::{derive, validate_password, FileKey, KEY_LEN};
pub use memory::{SecretBuffer, SecretBytes};
pub use padding::{pad, padded_len, unpad, BLOCK_LEN};
