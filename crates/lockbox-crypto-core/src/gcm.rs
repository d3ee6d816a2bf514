//! AES-128-GCM engine, the opt-in authenticated scheme.
//!
//! Uses the same 16-byte password key as the legacy engine but adds a
//! random 96-bit nonce and a 128-bit tag, so tampering and wrong passwords
//! are detected by the tag rather than inferred from padding.
//!
//! Wire format: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use rand::rngs::OsRng;
use rand::RngCore;
use ring::aead;
use zeroize::Zeroize;

use crate::engine::{check_aligned, CipherEngine, CipherScheme};
use crate::error::CryptoError;
use crate::key::FileKey;

/// AES-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// Minimum valid ciphertext: nonce + empty body + tag.
const MIN_SEALED_LEN: usize = NONCE_LEN + TAG_LEN;

/// Domain separation tag bound into every record as AAD.
const FILE_AAD: &[u8] = b"lockbox-file-v2";

/// AES-128-GCM engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct GcmEngine;

impl GcmEngine {
    fn sealing_key(key: &FileKey) -> Result<aead::LessSafeKey, CryptoError> {
        let unbound = aead::UnboundKey::new(&aead::AES_128_GCM, key.expose())
            .map_err(|_| CryptoError::Encryption("failed to create AES-128-GCM key".into()))?;
        Ok(aead::LessSafeKey::new(unbound))
    }
}

impl CipherEngine for GcmEngine {
    fn scheme(&self) -> CipherScheme {
        CipherScheme::Gcm
    }

    fn encrypt(&self, key: &FileKey, padded: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_aligned(padded)?;
        let sealing_key = Self::sealing_key(key)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
        let nonce = aead::Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = padded.to_vec();
        let Ok(tag) =
            sealing_key.seal_in_place_separate_tag(nonce, aead::Aad::from(FILE_AAD), &mut in_out)
        else {
            in_out.zeroize();
            return Err(CryptoError::Encryption(
                "AES-128-GCM encryption failed".into(),
            ));
        };

        let mut out = Vec::with_capacity(MIN_SEALED_LEN.saturating_add(in_out.len()));
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&in_out);
        out.extend_from_slice(tag.as_ref());
        Ok(out)
    }

    fn decrypt(&self, key: &FileKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() < MIN_SEALED_LEN {
            return Err(CryptoError::MalformedCiphertext(format!(
                "{} bytes (minimum {MIN_SEALED_LEN})",
                ciphertext.len()
            )));
        }
        let sealing_key = Self::sealing_key(key)?;

        let (nonce_part, body_and_tag) = ciphertext.split_at(NONCE_LEN);
        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(nonce_part);
        let nonce = aead::Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = body_and_tag.to_vec();
        let plaintext = sealing_key
            .open_in_place(nonce, aead::Aad::from(FILE_AAD), &mut in_out)
            .map_err(|_| CryptoError::Decryption)?
            .to_vec();
        in_out.zeroize();
        Ok(plaintext)
    }
}
