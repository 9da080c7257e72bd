//! Base62 positional encoding over the alphabet `0-9A-Za-z`.

use crate::error::DecodeError;

/// Symbols in value order: digits, then uppercase, then lowercase.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = 62;

/// Length of `u64::MAX` in base62; every `u64` fits in this many symbols.
pub const MAX_ENCODED_LEN: usize = 11;

/// Encodes `value` most-significant digit first, without padding.
///
/// Zero encodes to `"0"`.
pub fn encode(value: u64) -> String {
    if value == 0 {
        return "0".to_owned();
    }

    let mut buf = Vec::with_capacity(MAX_ENCODED_LEN);
    let mut rest = value;
    while rest > 0 {
        buf.push(ALPHABET[(rest % BASE) as usize]);
        rest /= BASE;
    }
    buf.reverse();

    // every byte comes from ALPHABET, which is ASCII
    buf.into_iter().map(char::from).collect()
}

/// Encodes `value` left-padded with `'0'` to [`MAX_ENCODED_LEN`] symbols.
///
/// Padded strings sort lexicographically in the same order as their values.
pub fn encode_padded(value: u64) -> String {
    format!("{:0>width$}", encode(value), width = MAX_ENCODED_LEN)
}

/// Decodes a base62 string back into its integer value.
///
/// Leading `'0'` symbols are accepted, so padded output round trips.
pub fn decode(input: &str) -> Result<u64, DecodeError> {
    if input.is_empty() {
        return Err(DecodeError::Empty);
    }

    input.chars().enumerate().try_fold(0_u64, |acc, (index, character)| {
        let digit = digit_value(character)
            .ok_or(DecodeError::InvalidCharacter { character, index })?;
        acc.checked_mul(BASE)
            .and_then(|acc| acc.checked_add(digit))
            .ok_or(DecodeError::Overflow)
    })
}

fn digit_value(c: char) -> Option<u64> {
    let value = match c {
        '0'..='9' => c as u64 - '0' as u64,
        'A'..='Z' => c as u64 - 'A' as u64 + 10,
        'a'..='z' => c as u64 - 'a' as u64 + 36,
        _ => return None,
    };
    Some(value)
}
