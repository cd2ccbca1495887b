//! Affine curve points.

use super::{field::FieldElement, scalar::Scalar};
use crate::{EncodedPoint, Error, Result};
use core::ops::Neg;
use elliptic_curve::{
    sec1::Coordinates,
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeLess, CtOption},
};

/// Point on the STARK curve in affine coordinates.
///
/// Addition uses the chord-and-tangent formulas directly, so each operation
/// costs one field inversion. Adding a point to its own negation is reported
/// as [`Error::DegenerateAddition`] rather than silently producing the
/// identity.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    /// x-coordinate
    pub(crate) x: FieldElement,

    /// y-coordinate
    pub(crate) y: FieldElement,

    /// Is this point the point at infinity? 0 = no, 1 = yes
    ///
    /// This is a proxy for [`Choice`], but uses `u8` instead to permit `const`
    /// constructors for `IDENTITY` and `GENERATOR`.
    pub(crate) infinity: u8,
}

impl AffinePoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        infinity: 1,
    };

    /// Base point of the curve.
    pub const GENERATOR: Self = Self::from_coordinates_unchecked(
        FieldElement::from_hex("01ef15c18599971b7beced415a40f0c7deacfd9b0d1819e03d723d8bc943cfca"),
        FieldElement::from_hex("005668060aa49730b7be4801df46ec62de53ecd11abe43a32873000c36e8dc1f"),
    );

    /// Create a point from its coordinates, checking the curve equation.
    pub fn from_coordinates(x: FieldElement, y: FieldElement) -> Result<Self> {
        let point = Self::from_coordinates_unchecked(x, y);

        if point.is_on_curve().into() {
            Ok(point)
        } else {
            Err(Error::NotOnCurve)
        }
    }

    /// Create a point from coordinates known to satisfy the curve equation.
    pub(crate) const fn from_coordinates_unchecked(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y, infinity: 0 }
    }

    /// Get the x-coordinate of this point.
    pub fn x(&self) -> FieldElement {
        self.x
    }

    /// Get the y-coordinate of this point.
    pub fn y(&self) -> FieldElement {
        self.y
    }

    /// Is this point the identity point?
    pub fn is_identity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    /// Does this point satisfy `y² = x³ + αx + β`? The identity always does.
    pub fn is_on_curve(&self) -> Choice {
        self.y.square().ct_eq(&self.x.curve_rhs()) | self.is_identity()
    }

    /// Recover a point from its x-coordinate and the parity of its y-coordinate.
    pub fn decompress(x: &FieldElement, y_is_odd: Choice) -> CtOption<Self> {
        x.curve_rhs().sqrt().map(|beta| {
            let y = FieldElement::conditional_select(&-beta, &beta, beta.is_odd().ct_eq(&y_is_odd));
            Self::from_coordinates_unchecked(*x, y)
        })
    }

    /// Recover the point with x-coordinate `x` whose y-coordinate is the
    /// smaller of the two square roots.
    pub fn decompact(x: &FieldElement) -> CtOption<Self> {
        Self::decompress(x, Choice::from(0)).map(|point| point.to_compact())
    }

    /// Choose between `self` and `-self` so that y is the smaller of the two
    /// candidate coordinates.
    fn to_compact(self) -> Self {
        let neg_self = -self;
        let choice = neg_self.y.to_canonical().ct_lt(&self.y.to_canonical());

        Self {
            x: self.x,
            y: FieldElement::conditional_select(&self.y, &neg_self.y, choice),
            infinity: self.infinity,
        }
    }

    /// Double this point using the tangent formula.
    ///
    /// ```text
    /// λ  = (3x² + α) / 2y
    /// x' = λ² - 2x
    /// y' = λ(x - x') - y
    /// ```
    pub fn double(&self) -> Self {
        // Also covers the identity, which is stored with y = 0.
        let Some(denominator) = Option::<FieldElement>::from(self.y.double().invert()) else {
            return Self::IDENTITY;
        };

        let x_squared = self.x.square();
        let lambda = (x_squared.double() + x_squared + super::EQUATION_A) * denominator;
        let x = lambda.square() - self.x.double();
        let y = lambda * (self.x - x) - self.y;
        Self::from_coordinates_unchecked(x, y)
    }

    /// Add `other` to this point using the chord formula.
    ///
    /// ```text
    /// λ  = (y₂ - y₁) / (x₂ - x₁)
    /// x' = λ² - x₁ - x₂
    /// y' = λ(x₁ - x') - y₁
    /// ```
    ///
    /// Equal points are doubled. Points sharing an x-coordinate but not a
    /// y-coordinate fail with [`Error::DegenerateAddition`].
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        if self.is_identity().into() {
            return Ok(*other);
        }

        if other.is_identity().into() {
            return Ok(*self);
        }

        if self.x == other.x {
            return if self.y == other.y {
                Ok(self.double())
            } else {
                Err(Error::DegenerateAddition)
            };
        }

        let denominator = Option::<FieldElement>::from((other.x - self.x).invert())
            .ok_or(Error::DegenerateAddition)?;
        let lambda = (other.y - self.y) * denominator;
        let x = lambda.square() - self.x - other.x;
        let y = lambda * (self.x - x) - self.y;
        Ok(Self::from_coordinates_unchecked(x, y))
    }

    /// Multiply this point by `k` with double-and-add, scanning the bits of
    /// `k` from least to most significant.
    ///
    /// Not constant time.
    pub fn mul(&self, k: &Scalar) -> Result<Self> {
        let k = k.to_canonical();
        let mut acc = Self::IDENTITY;
        let mut addend = *self;

        for i in 0..k.bits_vartime() {
            if k.bit_vartime(i) {
                acc = acc.checked_add(&addend)?;
            }

            addend = addend.double();
        }

        Ok(acc)
    }

    /// Multiply the generator by `k`.
    pub fn mul_by_generator(k: &Scalar) -> Result<Self> {
        Self::GENERATOR.mul(k)
    }

    /// Serialize this point as a SEC1 [`EncodedPoint`], optionally compressing it.
    pub fn to_encoded_point(&self, compress: bool) -> EncodedPoint {
        if self.is_identity().into() {
            EncodedPoint::identity()
        } else {
            EncodedPoint::from_affine_coordinates(&self.x.to_bytes(), &self.y.to_bytes(), compress)
        }
    }

    /// Parse a SEC1 [`EncodedPoint`].
    pub fn from_encoded_point(encoded_point: &EncodedPoint) -> Result<Self> {
        let point = match encoded_point.coordinates() {
            Coordinates::Identity => CtOption::new(Self::IDENTITY, Choice::from(1)),
            Coordinates::Compact { x } => {
                FieldElement::from_bytes(x).and_then(|x| Self::decompact(&x))
            }
            Coordinates::Compressed { x, y_is_odd } => FieldElement::from_bytes(x)
                .and_then(|x| Self::decompress(&x, Choice::from(u8::from(y_is_odd)))),
            Coordinates::Uncompressed { x, y } => FieldElement::from_bytes(y).and_then(|y| {
                FieldElement::from_bytes(x).and_then(|x| {
                    let point = Self::from_coordinates_unchecked(x, y);
                    CtOption::new(point, point.is_on_curve())
                })
            }),
        };

        Option::from(point).ok_or(Error::NotOnCurve)
    }

    /// Parse a SEC1-encoded byte string.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        let encoded_point = EncodedPoint::from_bytes(bytes).map_err(|_| Error::InvalidInput)?;
        Self::from_encoded_point(&encoded_point)
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y) & self.infinity.ct_eq(&other.infinity)
    }
}

impl Default for AffinePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Eq for AffinePoint {}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Neg for AffinePoint {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            infinity: self.infinity,
        }
    }
}

impl Neg for &AffinePoint {
    type Output = AffinePoint;

    fn neg(self) -> AffinePoint {
        -*self
    }
}
