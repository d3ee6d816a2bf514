//! NIST SP 800-38D: AES-128-GCM known-answer vector.
//!
//! Checks the `ring` primitive behind [`GcmEngine`], then the engine's own
//! framing against it.

use lockbox_crypto_core::gcm::{NONCE_LEN, TAG_LEN};
use lockbox_crypto_core::{CipherEngine, FileKey, GcmEngine};
use ring::aead;

use super::hex;

/// Test Case 2: zero key, zero IV, one zero block, no AAD.
#[test]
fn nist_test_case_2_aes128_gcm() {
    let key = [0u8; 16];
    let unbound = aead::UnboundKey::new(&aead::AES_128_GCM, &key).unwrap();
    let less_safe_key = aead::LessSafeKey::new(unbound);

    let nonce = aead::Nonce::assume_unique_for_key([0u8; 12]);
    let mut in_out = vec![0u8; 16];
    let tag = less_safe_key
        .seal_in_place_separate_tag(nonce, aead::Aad::empty(), &mut in_out)
        .unwrap();

    assert_eq!(in_out, hex("0388dace60b6a392f328c2b971b2fe78"));
    assert_eq!(tag.as_ref(), hex("ab6e47d42cec13bdf53a67b21257bddf").as_slice());
}

#[test]
fn engine_frames_nonce_body_tag() {
    let key = FileKey::new([0u8; 16]);
    let sealed = GcmEngine.encrypt(&key, &[0u8; 32]).unwrap();
    assert_eq!(sealed.len(), NONCE_LEN + 32 + TAG_LEN);
    let opened = GcmEngine.decrypt(&key, &sealed).unwrap();
    assert_eq!(opened, vec![0u8; 32]);
}
