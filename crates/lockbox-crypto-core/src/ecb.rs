//! Legacy AES-128 electronic-codebook engine.
//!
//! Each 16-byte block is encrypted independently with no IV and no
//! chaining, exactly as the stored ciphertexts were produced. This leaks
//! structure: identical plaintext blocks map to identical ciphertext
//! blocks. Kept for compatibility only; see [`crate::gcm`] for the
//! authenticated alternative.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;

use crate::engine::{check_aligned, CipherEngine, CipherScheme};
use crate::error::CryptoError;
use crate::key::FileKey;
use crate::padding::BLOCK_LEN;

/// AES-128-ECB, the default scheme for stored files.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcbEngine;

impl EcbEngine {
    fn cipher(key: &FileKey) -> Aes128 {
        Aes128::new(GenericArray::from_slice(key.expose()))
    }
}

impl CipherEngine for EcbEngine {
    fn scheme(&self) -> CipherScheme {
        CipherScheme::LegacyEcb
    }

    fn encrypt(&self, key: &FileKey, padded: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_aligned(padded)?;
        let cipher = Self::cipher(key);
        let mut out = padded.to_vec();
        for block in out.chunks_exact_mut(BLOCK_LEN) {
            cipher.encrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(out)
    }

    fn decrypt(&self, key: &FileKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_aligned(ciphertext)?;
        let cipher = Self::cipher(key);
        let mut out = ciphertext.to_vec();
        for block in out.chunks_exact_mut(BLOCK_LEN) {
            cipher.decrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(out)
    }
}
