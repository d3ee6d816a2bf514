//! FIPS-197 and NIST SP 800-38A: AES-128 ECB known-answer vectors.
//!
//! The legacy engine must be plain AES-128 applied block by block; any
//! deviation would make previously stored files unreadable.

use lockbox_crypto_core::{CipherEngine, EcbEngine, FileKey};

use super::hex;

fn key_from_hex(s: &str) -> FileKey {
    let mut raw = [0u8; 16];
    raw.copy_from_slice(&hex(s));
    FileKey::new(raw)
}

/// FIPS-197 Appendix C.1.
#[test]
fn fips197_appendix_c1() {
    let key = key_from_hex("000102030405060708090a0b0c0d0e0f");
    let plaintext = hex("00112233445566778899aabbccddeeff");
    let expected = hex("69c4e0d86a7b0430d8cdb78070b4c55a");

    let ct = EcbEngine.encrypt(&key, &plaintext).unwrap();
    assert_eq!(ct, expected, "FIPS-197 C.1 ciphertext mismatch");

    let pt = EcbEngine.decrypt(&key, &ct).unwrap();
    assert_eq!(pt, plaintext);
}

/// SP 800-38A F.1.1 / F.1.2, ECB-AES128, four blocks.
#[test]
fn sp800_38a_ecb_aes128() {
    let key = key_from_hex("2b7e151628aed2a6abf7158809cf4f3c");
    let plaintext = hex(concat!(
        "6bc1bee22e409f96e93d7e117393172a",
        "ae2d8a571e03ac9c9eb76fac45af8e51",
        "30c81c46a35ce411e5fbc1191a0a52ef",
        "f69f2445df4f9b17ad2b417be66c3710",
    ));
    let expected = hex(concat!(
        "3ad77bb40d7a3660a89ecaf32466ef97",
        "f5d3d58503b9699de785895a96fdbaaf",
        "43b1cd7f598ece23881b00e3ed030688",
        "7b0c785e27e8ad3f8223207104725dd4",
    ));

    let ct = EcbEngine.encrypt(&key, &plaintext).unwrap();
    assert_eq!(ct, expected, "SP 800-38A ECB-AES128 encrypt mismatch");

    let pt = EcbEngine.decrypt(&key, &expected).unwrap();
    assert_eq!(pt, plaintext, "SP 800-38A ECB-AES128 decrypt mismatch");
}

/// Blocks are independent: each block of the multi-block vector encrypts to
/// the same value on its own.
#[test]
fn blocks_encrypt_independently() {
    let key = key_from_hex("2b7e151628aed2a6abf7158809cf4f3c");
    let second_block = hex("ae2d8a571e03ac9c9eb76fac45af8e51");
    let ct = EcbEngine.encrypt(&key, &second_block).unwrap();
    assert_eq!(ct, hex("f5d3d58503b9699de785895a96fdbaaf"));
}
