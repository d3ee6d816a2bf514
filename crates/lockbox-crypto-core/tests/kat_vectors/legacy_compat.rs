//! Ciphertexts as stored by the original upload path: PKCS#7 padding, then
//! AES-128-ECB keyed with the raw password bytes.
//!
//! Files already in the database must keep decrypting, so the full
//! pipeline is pinned byte for byte.

use lockbox_crypto_core::{derive, pad, unpad, CipherEngine, CryptoError, EcbEngine};

use super::hex;

const PASSWORD: &str = "ABCDEFGHIJKLMNOP";

fn seal(plaintext: &[u8]) -> Vec<u8> {
    EcbEngine
        .encrypt(&derive(PASSWORD).unwrap(), &pad(plaintext))
        .unwrap()
}

#[test]
fn thirty_seven_byte_file() {
    let plaintext: Vec<u8> = (0u8..37).collect();
    let expected = hex(concat!(
        "045ae6f3321b6fc6e4e79da9eb862921",
        "62a932da074843bc254ad7d89dd77c75",
        "a7021e3d0cbc7f1b51af2a8ce1f13b4f",
    ));
    assert_eq!(seal(&plaintext), expected);

    let key = derive(PASSWORD).unwrap();
    let recovered = unpad(&EcbEngine.decrypt(&key, &expected).unwrap()).unwrap();
    assert_eq!(recovered, plaintext);
}

#[test]
fn single_block_file() {
    assert_eq!(
        seal(b"Hello, Lockbox!"),
        hex("9bc32d1b43012c521eca9907af4f05c0")
    );
}

#[test]
fn empty_file_is_one_padding_block() {
    assert_eq!(seal(b""), hex("ce48c21ed35a40facd929a1bf25fc595"));
}

#[test]
fn stored_file_rejects_wrong_password() {
    let stored = hex(concat!(
        "045ae6f3321b6fc6e4e79da9eb862921",
        "62a932da074843bc254ad7d89dd77c75",
        "a7021e3d0cbc7f1b51af2a8ce1f13b4f",
    ));
    let wrong = derive("WRONGWRONGWRONG!").unwrap();
    let padded = EcbEngine.decrypt(&wrong, &stored).unwrap();
    assert!(matches!(unpad(&padded), Err(CryptoError::InvalidPadding)));
}
