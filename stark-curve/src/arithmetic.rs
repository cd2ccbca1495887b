//! Pure Rust implementation of group operations on the STARK curve.
//!
//! Curve parameters:
//!
//! ```text
//! y² = x³ + αx + β  (mod p)
//!
//! p = 2^251 + 17·2^192 + 1
//! α = 1
//! β = 0x6f21413efbe40de150e596d72f7a8c5609ad26c15c915c1f4cdfcb99cee9e89
//! n = 0x800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f
//! ```

#[macro_use]
mod macros;

pub(crate) mod affine;
pub(crate) mod field;
pub(crate) mod scalar;

use self::field::FieldElement;
use crate::{Error, Result, U256};

/// a = 1
pub const EQUATION_A: FieldElement = FieldElement::ONE;

/// b = 0x6f21413efbe40de150e596d72f7a8c5609ad26c15c915c1f4cdfcb99cee9e89
pub const EQUATION_B: FieldElement =
    FieldElement::from_hex("06f21413efbe40de150e596d72f7a8c5609ad26c15c915c1f4cdfcb99cee9e89");

/// Longest decimal string that always fits in a [`U256`]; every bound the
/// crate checks is far below `10^76`.
const MAX_DECIMAL_DIGITS: usize = 76;

/// Longest hexadecimal string that fits in a [`U256`].
const MAX_HEX_DIGITS: usize = 64;

/// Parse hexadecimal digits (no prefix, leading zeros allowed) into a [`U256`].
///
/// Returns `Ok(None)` when the value does not fit in 256 bits.
pub(crate) fn parse_hex_digits(digits: &str) -> Result<Option<U256>> {
    if digits.is_empty() {
        return Err(Error::InvalidInput);
    }

    let significant = digits.trim_start_matches('0');
    let mut acc = U256::ZERO;

    for c in significant.chars() {
        let nibble = c.to_digit(16).ok_or(Error::InvalidInput)?;
        acc = acc.shl_vartime(4).wrapping_add(&U256::from_u32(nibble));
    }

    // Validate every character before reporting overflow.
    if significant.len() > MAX_HEX_DIGITS {
        return Ok(None);
    }

    Ok(Some(acc))
}

/// Parse decimal digits (leading zeros allowed, no sign) into a [`U256`].
///
/// Returns `Ok(None)` for values of more than 76 significant digits.
pub(crate) fn parse_decimal_digits(digits: &str) -> Result<Option<U256>> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidInput);
    }

    let significant = digits.trim_start_matches('0');

    if significant.len() > MAX_DECIMAL_DIGITS {
        return Ok(None);
    }

    let ten = U256::from_u8(10);
    let acc = significant.bytes().fold(U256::ZERO, |acc, b| {
        acc.wrapping_mul(&ten)
            .wrapping_add(&U256::from_u8(b - b'0'))
    });

    Ok(Some(acc))
}

/// Strip the mandatory `0x` prefix from a hex string.
pub(crate) fn strip_hex_prefix(s: &str) -> Result<&str> {
    s.strip_prefix("0x").ok_or(Error::MissingHexPrefix)
}
