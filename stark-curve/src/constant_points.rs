//! Constant points consumed by the Pedersen hash.
//!
//! ## Layout
//!
//! ```text
//! table[0]                 shift point
//! table[1]                 generator G
//! table[2 + 252·i + j]     point for bit j of input i, i ∈ {0, 1}
//! ```
//!
//! Bits `0..248` of input 0 use `2^j·P₀` and bits `248..252` use
//! `2^(j-248)·P₁`; input 1 uses `P₂` and `P₃` the same way.
//!
//! ## Derivation
//!
//! Every base point is derived from a 76-digit window of the decimal
//! expansion of π (`3141592653…`). Window `w` is reduced modulo p to get a
//! candidate x-coordinate, which is incremented until `x³ + x + β` is a
//! square; the point takes the smaller of the two roots as its y-coordinate.
//! Window 0 seeds β itself, windows 1 through 6 yield the shift point, G and
//! `P₀..P₃` in that order.

use crate::{arithmetic::field::FieldElement, AffinePoint, U256};

#[cfg(all(
    feature = "global-table",
    not(any(feature = "critical-section", feature = "std"))
))]
compile_error!("`global-table` feature requires either `critical-section` or `std`");

#[cfg(all(feature = "global-table", feature = "critical-section"))]
use once_cell::sync::Lazy as LazyLock;
#[cfg(all(
    feature = "global-table",
    all(feature = "std", not(feature = "critical-section"))
))]
use std::sync::LazyLock;

/// Number of bits absorbed from each Pedersen input.
pub(crate) const N_ELEMENT_BITS: usize = 252;

/// Number of low bits of an input covered by the first doubling chain.
pub(crate) const LOW_PART_BITS: usize = 248;

/// Number of high bits of an input covered by the second doubling chain.
pub(crate) const HIGH_PART_BITS: usize = N_ELEMENT_BITS - LOW_PART_BITS;

/// Number of Pedersen inputs covered by the table.
const N_INPUTS: usize = 2;

/// Digits of π, 76 per window.
const PI_WINDOWS: [&str; 7] = [
    "3141592653589793238462643383279502884197169399375105820974944592307816406286",
    "2089986280348253421170679821480865132823066470938446095505822317253594081284",
    "8111745028410270193852110555964462294895493038196442881097566593344612847564",
    "8233786783165271201909145648566923460348610454326648213393607260249141273724",
    "5870066063155881748815209209628292540917153643678925903600113305305488204665",
    "2138414695194151160943305727036575959195309218611738193261179310511854807446",
    "2379962749567351885752724891227938183011949129833673362440656643086021394946",
];

/// Integer value of each window of [`PI_WINDOWS`].
const PI_SEEDS: [U256; 7] = [
    decimal_to_uint(PI_WINDOWS[0]),
    decimal_to_uint(PI_WINDOWS[1]),
    decimal_to_uint(PI_WINDOWS[2]),
    decimal_to_uint(PI_WINDOWS[3]),
    decimal_to_uint(PI_WINDOWS[4]),
    decimal_to_uint(PI_WINDOWS[5]),
    decimal_to_uint(PI_WINDOWS[6]),
];

/// Shift point: the starting value of every Pedersen accumulator.
pub const SHIFT_POINT: AffinePoint = AffinePoint::from_coordinates_unchecked(
    FieldElement::from_hex("049ee3eba8c1600700ee1b87eb599f16716b0b1022947733551fde4050ca6804"),
    FieldElement::from_hex("03ca0cfe4b3bc6ddf346d49d06ea0ed34e621062c0e056c1d0405d266e10268a"),
);

/// Process-wide constant point table, built on first use.
#[cfg(feature = "global-table")]
pub static CONSTANT_POINTS: LazyLock<ConstantPointTable> =
    LazyLock::new(ConstantPointTable::generate);

/// Parse a string of decimal digits at compile time.
const fn decimal_to_uint(digits: &str) -> U256 {
    let bytes = digits.as_bytes();
    let ten = U256::from_u8(10);
    let mut acc = U256::ZERO;
    let mut i = 0;

    while i < bytes.len() {
        assert!(bytes[i].is_ascii_digit(), "non-decimal digit in seed");
        acc = acc.wrapping_mul(&ten).wrapping_add(&U256::from_u8(bytes[i] - b'0'));
        i += 1;
    }

    acc
}

/// Derive the base point for the given window of π.
fn base_point(window: usize) -> AffinePoint {
    let mut x = FieldElement::from_uint_reduced(&PI_SEEDS[window]);
    let mut attempts = 0u32;

    loop {
        if let Some(point) = Option::<AffinePoint>::from(AffinePoint::decompact(&x)) {
            tracing::trace!(window, attempts, "derived pedersen base point");
            return point;
        }

        x += FieldElement::ONE;
        attempts += 1;
    }
}

/// Ordered table of the shift point, the generator and the per-bit points of
/// every Pedersen input.
#[derive(Clone)]
pub struct ConstantPointTable {
    points: [AffinePoint; Self::LEN],
}

impl ConstantPointTable {
    /// Total number of points in the table.
    pub const LEN: usize = 2 + N_INPUTS * N_ELEMENT_BITS;

    /// Regenerate the table from the digits of π.
    ///
    /// This costs one field inversion per point; callers without the
    /// `global-table` feature should build it once and share it.
    pub fn generate() -> Self {
        let mut points = [AffinePoint::IDENTITY; Self::LEN];
        points[0] = base_point(1);
        points[1] = base_point(2);

        let chains = [
            (3, LOW_PART_BITS),
            (4, HIGH_PART_BITS),
            (5, LOW_PART_BITS),
            (6, HIGH_PART_BITS),
        ];

        let mut index = 2;
        for (window, len) in chains {
            let mut point = base_point(window);

            for _ in 0..len {
                points[index] = point;
                point = point.double();
                index += 1;
            }
        }

        tracing::debug!(len = Self::LEN, "generated pedersen constant point table");
        Self { points }
    }

    /// Shift point: the Pedersen accumulator's starting value.
    pub fn shift_point(&self) -> &AffinePoint {
        &self.points[0]
    }

    /// Generator of the curve group.
    pub fn generator(&self) -> &AffinePoint {
        &self.points[1]
    }

    /// Point used for bit `bit` of input `input`.
    pub fn point(&self, input: usize, bit: usize) -> Option<&AffinePoint> {
        if bit >= N_ELEMENT_BITS {
            return None;
        }

        self.points.get(2 + input * N_ELEMENT_BITS + bit)
    }

    /// The base point of each doubling chain, in table order: `[P₀, P₁, P₂, P₃]`.
    pub fn base_points(&self) -> [AffinePoint; 4] {
        [
            self.points[2],
            self.points[2 + LOW_PART_BITS],
            self.points[2 + N_ELEMENT_BITS],
            self.points[2 + N_ELEMENT_BITS + LOW_PART_BITS],
        ]
    }

    /// Number of inputs the table can hash.
    pub fn max_inputs(&self) -> usize {
        (self.points.len() - 2) / N_ELEMENT_BITS
    }

    /// All points in table order.
    pub fn as_slice(&self) -> &[AffinePoint] {
        &self.points
    }
}

impl core::fmt::Debug for ConstantPointTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConstantPointTable")
            .field("len", &self.points.len())
            .field("shift_point", self.shift_point())
            .finish_non_exhaustive()
    }
}
