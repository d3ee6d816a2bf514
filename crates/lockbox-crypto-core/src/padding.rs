//! PKCS#7 padding over 128-bit blocks.
//!
//! With no authentication tag on legacy ciphertexts, [`unpad`] is the only
//! integrity check in the decrypt path. A failure means "wrong password or
//! corrupted file" and nothing more precise.

use crate::error::CryptoError;

/// Cipher block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// Number of padding bytes [`pad`] appends to `len` bytes of data (1..=16).
const fn padding_for(len: usize) -> usize {
    BLOCK_LEN.saturating_sub(len % BLOCK_LEN)
}

/// Length of `pad(data)` for data of `len` bytes.
#[must_use]
pub const fn padded_len(len: usize) -> usize {
    len.saturating_add(padding_for(len))
}

/// Append PKCS#7 padding up to the next multiple of [`BLOCK_LEN`].
///
/// Always appends between 1 and 16 bytes; block-aligned input (including
/// empty input) gains a full block of `0x10`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = padding_for(data.len());
    let mut out = Vec::with_capacity(padded_len(data.len()));
    out.extend_from_slice(data);
    // pad_len is in 1..=16
    out.resize(padded_len(data.len()), pad_len as u8);
    out
}

/// Strip and verify PKCS#7 padding.
///
/// The trailing padding bytes are compared without an early exit so the
/// position of the first bad byte does not show up in timing.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidPadding`] if `data` is empty, not block
/// aligned, ends in a pad byte outside `1..=16`, or if any of the `n`
/// trailing bytes differs from `n`.
pub fn unpad(data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let Some(&last) = data.last() else {
        return Err(CryptoError::InvalidPadding);
    };
    if data.len() % BLOCK_LEN != 0 {
        return Err(CryptoError::InvalidPadding);
    }

    let pad_len = usize::from(last);
    if pad_len == 0 || pad_len > BLOCK_LEN {
        return Err(CryptoError::InvalidPadding);
    }

    let split = data
        .len()
        .checked_sub(pad_len)
        .ok_or(CryptoError::InvalidPadding)?;
    let (body, tail) = data.split_at(split);

    let mismatch = tail.iter().fold(0u8, |acc, &b| acc | (b ^ last));
    if mismatch != 0 {
        return Err(CryptoError::InvalidPadding);
    }

    Ok(body.to_vec())
}
