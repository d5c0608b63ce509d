//! Byte⇄integer codec for RSA plaintexts.
//!
//! A byte string is read as a base-256 big-endian integer, so `"AB"`
//! becomes `65 * 256 + 66 = 16706`. The empty string is zero. Decoding
//! reproduces the bytes exactly — plaintexts coming out of a decryption are
//! arbitrary bytes, not necessarily text — except that leading zero bytes
//! have no integer representation and are dropped.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

/// Interpret `bytes` as a base-256 big-endian integer.
#[must_use]
pub fn bytes_to_num(bytes: &[u8]) -> BigUint {
    let mut num = BigUint::zero();

    for &byte in bytes {
        num = num * 256_u32 + u32::from(byte);
    }

    num
}

/// [`bytes_to_num`] over the bytes of `s`: the entry point for plaintext
/// supplied as command-line text.
#[must_use]
pub fn string_to_num(s: &str) -> BigUint {
    bytes_to_num(s.as_bytes())
}

/// Inverse of [`bytes_to_num`]: peel off base-256 digits by repeated
/// division, most significant byte first.
///
/// Round-trips any byte sequence that does not start with a zero byte; the
/// bytes carry no encoding.
#[must_use]
pub fn num_to_bytes(num: &BigUint) -> Vec<u8> {
    let base = BigUint::from(256_u32);
    let mut num = num.clone();
    let mut bytes = Vec::new();

    while !num.is_zero() {
        let (quotient, remainder) = num.div_rem(&base);

        bytes.push(remainder.to_u8().expect("remainder fits a byte"));
        num = quotient;
    }

    bytes.reverse();

    bytes
}
