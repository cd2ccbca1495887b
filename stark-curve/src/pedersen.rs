//! Pedersen hash over the STARK curve.
//!
//! ## Algorithm
//!
//! ```text
//! 1: acc = shift point
//! 2: for each input xᵢ and each bit j of xᵢ, least significant first:
//! 3:     pt = table[2 + 252·i + j]
//! 4:     fail if acc.x == pt.x
//! 5:     if bit j of xᵢ is set: acc = acc + pt
//! 6: return acc.x
//! ```
//!
//! Inputs must already be field elements: values not below the modulus are
//! rejected by the parsers rather than reduced.

use crate::{
    constant_points::{ConstantPointTable, LOW_PART_BITS, N_ELEMENT_BITS},
    Error, FieldElement, Result, Scalar,
};

#[cfg(feature = "global-table")]
use crate::constant_points::CONSTANT_POINTS;

#[cfg(all(feature = "alloc", feature = "global-table"))]
use alloc::{format, string::String, vec::Vec};

/// Pedersen hash function bound to a [`ConstantPointTable`].
#[derive(Clone, Copy, Debug)]
pub struct PedersenHasher<'a> {
    table: &'a ConstantPointTable,
}

impl<'a> PedersenHasher<'a> {
    /// Create a hasher which reads its points from `table`.
    pub fn new(table: &'a ConstantPointTable) -> Self {
        Self { table }
    }

    /// Hash a sequence of field elements.
    ///
    /// An empty sequence hashes to the x-coordinate of the shift point.
    pub fn hash(&self, inputs: &[FieldElement]) -> Result<FieldElement> {
        let max = self.table.max_inputs();

        if inputs.len() > max {
            return Err(Error::TooManyInputs { max });
        }

        let mut acc = *self.table.shift_point();

        for (input, element) in inputs.iter().enumerate() {
            let bits = element.to_canonical();

            for bit in 0..N_ELEMENT_BITS {
                let point = self
                    .table
                    .point(input, bit)
                    .ok_or(Error::TooManyInputs { max })?;

                if acc.x() == point.x() {
                    tracing::error!(input, bit, "pedersen accumulator hit a constant point");
                    return Err(Error::PointCollision { input, bit });
                }

                if bits.bit_vartime(bit) {
                    acc = acc.checked_add(point)?;
                }
            }
        }

        Ok(acc.x())
    }

    /// Hash two field elements.
    pub fn hash_pair(&self, a: &FieldElement, b: &FieldElement) -> Result<FieldElement> {
        self.hash(&[*a, *b])
    }

    /// Hash two field elements by multiplying each chain's base point by the
    /// matching slice of input bits, instead of walking the table bit by bit.
    ///
    /// ```text
    /// H(a, b) = [shift + a_low·P₀ + a_high·P₁ + b_low·P₂ + b_high·P₃].x
    /// ```
    ///
    /// `low` is the 248 least significant bits and `high` the remaining 4.
    /// Agrees with [`PedersenHasher::hash_pair`].
    pub fn hash_pair_by_base_points(
        &self,
        a: &FieldElement,
        b: &FieldElement,
    ) -> Result<FieldElement> {
        let [p0, p1, p2, p3] = self.table.base_points();
        let (a_low, a_high) = split_low_high(a);
        let (b_low, b_high) = split_low_high(b);

        let mut acc = *self.table.shift_point();

        for (point, k) in [(p0, a_low), (p1, a_high), (p2, b_low), (p3, b_high)] {
            acc = acc.checked_add(&point.mul(&k)?)?;
        }

        Ok(acc.x())
    }
}

#[cfg(feature = "global-table")]
impl Default for PedersenHasher<'static> {
    /// Hasher bound to the process-wide [`CONSTANT_POINTS`] table.
    fn default() -> Self {
        Self::new(&CONSTANT_POINTS)
    }
}

/// Split a field element into its low 248 bits and high 4 bits.
fn split_low_high(fe: &FieldElement) -> (Scalar, Scalar) {
    let uint = fe.to_canonical();
    let high = uint.shr_vartime(LOW_PART_BITS);
    let low = uint.wrapping_sub(&high.shl_vartime(LOW_PART_BITS));
    (Scalar::from_uint_reduced(&low), Scalar::from_uint_reduced(&high))
}

/// Hash hex-encoded field elements (no `0x` prefix) with the process-wide
/// table, returning the digest as lowercase hex without leading zeros.
#[cfg(all(feature = "alloc", feature = "global-table"))]
pub fn pedersen(inputs: &[&str]) -> Result<String> {
    let elements = inputs
        .iter()
        .map(|input| FieldElement::from_hex_digits(input))
        .collect::<Result<Vec<_>>>()?;

    let digest = PedersenHasher::default().hash(&elements)?;
    Ok(format!("{digest:x}"))
}

#[cfg(test)]
mod tests {
    use super::PedersenHasher;
    use crate::{ConstantPointTable, Error, FieldElement};
    use proptest::prelude::*;
    use std::sync::OnceLock;

    fn table() -> &'static ConstantPointTable {
        static TABLE: OnceLock<ConstantPointTable> = OnceLock::new();
        TABLE.get_or_init(ConstantPointTable::generate)
    }

    fn fe(hex: &str) -> FieldElement {
        FieldElement::from_hex_digits(hex).unwrap()
    }

    #[test]
    fn empty_input_is_shift_point() {
        let hasher = PedersenHasher::new(table());
        assert_eq!(hasher.hash(&[]), Ok(table().shift_point().x()));
        assert_eq!(hasher.hash(&[FieldElement::ZERO]), Ok(table().shift_point().x()));
    }

    #[test]
    fn small_inputs() {
        let hasher = PedersenHasher::new(table());

        assert_eq!(
            hasher.hash(&[FieldElement::ONE]),
            Ok(fe("268a9d47dde48af4b6e2c33932ed1c13adec25555abaa837c376af4ea2f8a94"))
        );
        assert_eq!(
            hasher.hash_pair(&FieldElement::ONE, &FieldElement::from_u64(2)),
            Ok(fe("5bb9440e27889a364bcb678b1f679ecd1347acdedcbf36e83494f857cc58026"))
        );
    }

    #[test]
    fn too_many_inputs() {
        let hasher = PedersenHasher::new(table());
        assert_eq!(
            hasher.hash(&[FieldElement::ONE; 3]),
            Err(Error::TooManyInputs { max: 2 })
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
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn base_points_agree_with_bitwise(a in field_element(), b in field_element()) {
            let hasher = PedersenHasher::new(table());
            prop_assert_eq!(
                hasher.hash_pair(&a, &b),
                hasher.hash_pair_by_base_points(&a, &b)
            );
        }
    }
}
