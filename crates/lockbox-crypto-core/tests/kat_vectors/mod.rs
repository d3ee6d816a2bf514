mod aes_ecb;
mod aes_gcm;
mod legacy_compat;

/// Decode a lowercase hex string. Test-only helper.
pub fn hex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).expect("valid hex"))
        .collect()
}
