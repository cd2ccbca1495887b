//! Scalar field arithmetic modulo n = 0x800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f

use super::{field::FieldElement, parse_hex_digits};
use crate::{FieldBytes, U256};
use elliptic_curve::{
    bigint::{modular::constant_mod::Residue, ArrayEncoding},
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeLess, CtOption},
};

impl_mont_field_element!(
    name: Scalar,
    params: ScalarParams,
    modulus: "0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f",
    multiplicative_generator: 3,
    s: 1,
    root_of_unity: "0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2e",
    root_of_unity_inv: "0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2e",
    delta: "0000000000000000000000000000000000000000000000000000000000000009",
    two_inv: "04000000000000087fffffffffffffffdbc08936e573d9190f335120d6e32698",
    doc: "Scalar modulo the order of the STARK curve group, stored in Montgomery form."
);

impl Scalar {
    /// Bit length of the group order.
    pub const NUM_BITS: usize = 252;

    /// Reduce a base field element modulo `n`.
    ///
    /// Since `p < 2n` this is at most one subtraction.
    pub fn reduce_field_element(fe: &FieldElement) -> Self {
        Self::from_uint_reduced(&fe.to_canonical())
    }

    /// Parse hexadecimal digits without a `0x` prefix into a scalar in `[0, n)`.
    ///
    /// Returns `None` for malformed input or values not below `n`.
    pub fn from_hex_digits(digits: &str) -> Option<Self> {
        parse_hex_digits(digits)
            .ok()
            .flatten()
            .and_then(|uint| Self::from_uint(&uint).into())
    }

    /// Determine if this scalar is in `[1, n)`; zero is the only excluded value.
    pub fn is_nonzero(&self) -> Choice {
        !self.is_zero()
    }
}
