//! Field arithmetic modulo p = 2^251 + 17·2^192 + 1

use super::{parse_decimal_digits, parse_hex_digits};
use crate::{Error, FieldBytes, Result, U256};
use elliptic_curve::{
    bigint::{modular::constant_mod::Residue, ArrayEncoding},
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeLess, CtOption},
};

impl_mont_field_element!(
    name: FieldElement,
    params: FieldParams,
    modulus: "0800000000000011000000000000000000000000000000000000000000000001",
    multiplicative_generator: 3,
    s: 192,
    root_of_unity: "005282db87529cfa3f0464519c8b0fa5ad187148e11a61616070024f42f8ef94",
    root_of_unity_inv: "003ae6a386329b25973ebc68dbf446534e6428affe8c0f24d90af58616019ce1",
    delta: "00f66926e0ff773515a10661aa1f4d7e5cd6a000cc515a33cea96fa9c5262e50",
    two_inv: "0400000000000008800000000000000000000000000000000000000000000001",
    doc: "Element of the STARK curve's base field, stored in Montgomery form."
);

impl FieldElement {
    /// Parse hexadecimal digits without a `0x` prefix.
    ///
    /// Values not below `p` are rejected rather than reduced.
    pub fn from_hex_digits(digits: &str) -> Result<Self> {
        parse_hex_digits(digits)?
            .and_then(|uint| Self::from_uint(&uint).into())
            .ok_or(Error::NotInField)
    }

    /// Parse a `0x`-prefixed hexadecimal string.
    pub fn from_prefixed_hex(s: &str) -> Result<Self> {
        Self::from_hex_digits(super::strip_hex_prefix(s)?)
    }

    /// Parse a decimal string.
    ///
    /// Values not below `p` are rejected rather than reduced.
    pub fn from_decimal(digits: &str) -> Result<Self> {
        parse_decimal_digits(digits)?
            .and_then(|uint| Self::from_uint(&uint).into())
            .ok_or(Error::NotInField)
    }

    /// Right-hand side of the curve equation, `x³ + αx + β`.
    pub(crate) fn curve_rhs(&self) -> Self {
        self.square() * self + super::EQUATION_A * self + super::EQUATION_B
    }
}

#[cfg(test)]
mod tests {
    use super::FieldElement;
    use crate::{Error, U256};
    use elliptic_curve::subtle::ConstantTimeEq;
    use proptest::prelude::*;
    use std::format;

    test_primefield_constants!(FieldElement);

    #[test]
    fn invert() {
        let one = FieldElement::ONE;
        assert_eq!(one.invert().unwrap(), one);

        let three = FieldElement::from_u64(3);
        assert_eq!(three * three.invert().unwrap(), one);

        assert!(bool::from(FieldElement::ZERO.invert().is_none()));
    }

    #[test]
    fn sqrt() {
        for &n in &[0u64, 1, 4, 9, 16, 25, 1_000_000] {
            let fe = FieldElement::from_u64(n);
            let sqrt = fe.sqrt().unwrap();
            assert_eq!(sqrt.square(), fe);
        }
    }

    #[test]
    fn modulus_rejected() {
        assert_eq!(
            FieldElement::from_hex_digits(
                "800000000000011000000000000000000000000000000000000000000000001"
            ),
            Err(Error::NotInField)
        );
        assert_eq!(
            FieldElement::from_hex_digits(
                "800000000000011000000000000000000000000000000000000000000000000"
            ),
            Ok(-FieldElement::ONE)
        );
    }

    #[test]
    fn prefixed_hex() {
        assert_eq!(
            FieldElement::from_prefixed_hex("0x10"),
            Ok(FieldElement::from_u64(16))
        );
        assert_eq!(
            FieldElement::from_prefixed_hex("10"),
            Err(Error::MissingHexPrefix)
        );
    }

    #[test]
    fn lower_hex() {
        assert_eq!(format!("{:x}", FieldElement::ZERO), "0");
        assert_eq!(format!("{:x}", FieldElement::from_u64(0xabc)), "abc");
        assert_eq!(format!("{:#x}", FieldElement::from_u64(0xabc)), "0xabc");
        assert_eq!(
            format!("{:x}", -FieldElement::ONE),
            "800000000000011000000000000000000000000000000000000000000000000"
        );
    }

    prop_compose! {
        fn field_element()(bytes in any::<[u8; 32]>()) -> FieldElement {
            let mut bytes = bytes;
            bytes[0] &= 0x07;
            FieldElement::from_slice(&bytes).unwrap()
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn sqrt_of_square(fe in field_element()) {
            let square = fe.square();
            let sqrt = square.sqrt().unwrap();
            prop_assert!(bool::from(sqrt.ct_eq(&fe) | sqrt.ct_eq(&-fe)));
        }

        #[test]
        fn hex_roundtrip(fe in field_element()) {
            let hex = format!("{:x}", fe);
            prop_assert_eq!(FieldElement::from_hex_digits(&hex), Ok(fe));
        }
    }
}
