//! Macros for defining field element types.

/// Implements a field element type whose internal representation is in
/// Montgomery form, backed by `crypto-bigint`'s constant-modulus residues.
///
/// Accepts the following parameters:
///
/// - name of the field element type
/// - name of the ZST representing the modulus
/// - hex serialization of the modulus (64 digits, big endian)
/// - multiplicative generator, a quadratic non-residue
/// - `S` such that `modulus - 1 = 2^S · T` with `T` odd
/// - `generator^T`, `generator^(-T)`, `generator^(2^S)` and `2^(-1)`, as hex
/// - documentation string for the field element type
///
/// # Inherent impls
/// - `const ZERO: Self`
/// - `const ONE: Self` (multiplicative identity)
/// - `const MODULUS: U256`
/// - `pub const fn from_hex`
/// - `pub const fn from_u64`
/// - `pub const fn from_uint_reduced`
/// - `pub fn from_uint`
/// - `pub fn from_bytes`
/// - `pub fn from_slice`
/// - `pub fn to_bytes`
/// - `pub fn to_canonical`
/// - `pub fn is_odd`
/// - `pub fn is_zero`
/// - `pub fn double`
/// - `pub fn square`
/// - `pub fn pow`
/// - `pub fn invert`
/// - `pub fn sqrt`
///
/// # Trait impls
/// - `Field`, `PrimeField`
/// - `From<u64>`
/// - `ConditionallySelectable`
/// - `ConstantTimeEq`
/// - `Default`
/// - `Eq`
/// - `PartialEq`
/// - `Debug`
/// - `LowerHex`
/// - `Add`, `AddAssign`, `Sub`, `SubAssign`, `Mul`, `MulAssign`, `Neg`
/// - `Sum`, `Product`
macro_rules! impl_mont_field_element {
    (
        name: $fe:ident,
        params: $params:ident,
        modulus: $modulus_hex:expr,
        multiplicative_generator: $generator:expr,
        s: $s:expr,
        root_of_unity: $root_of_unity_hex:expr,
        root_of_unity_inv: $root_of_unity_inv_hex:expr,
        delta: $delta_hex:expr,
        two_inv: $two_inv_hex:expr,
        doc: $doc:expr
    ) => {
        elliptic_curve::bigint::impl_modulus!($params, U256, $modulus_hex);

        #[doc = $doc]
        #[derive(Clone, Copy)]
        pub struct $fe(Residue<$params, { U256::LIMBS }>);

        impl $fe {
            /// Zero element.
            pub const ZERO: Self = Self(Residue::ZERO);

            /// Multiplicative identity.
            pub const ONE: Self = Self(Residue::ONE);

            /// Modulus of the field, as an integer.
            pub const MODULUS: U256 = U256::from_be_hex($modulus_hex);

            /// `T = (modulus - 1) >> S`
            const T: U256 = Self::MODULUS.wrapping_sub(&U256::ONE).shr_vartime($s);

            /// Decode from 64 big endian hex digits, reducing modulo the modulus.
            ///
            /// This is primarily intended for defining constants.
            ///
            /// # Panics
            ///
            /// When the hex is malformed or not exactly 64 digits long.
            pub const fn from_hex(hex: &str) -> Self {
                Self::from_uint_reduced(&U256::from_be_hex(hex))
            }

            /// Convert a `u64` into a field element.
            pub const fn from_u64(w: u64) -> Self {
                Self::from_uint_reduced(&U256::from_u64(w))
            }

            /// Convert a [`U256`] into a field element, reducing it modulo the modulus.
            pub const fn from_uint_reduced(uint: &U256) -> Self {
                Self(Residue::new(uint))
            }

            /// Convert a [`U256`] into a field element.
            ///
            /// # Returns
            ///
            /// The `CtOption` equivalent of `None` if the input overflows the modulus.
            pub fn from_uint(uint: &U256) -> CtOption<Self> {
                let is_some = uint.ct_lt(&Self::MODULUS);
                CtOption::new(Self::from_uint_reduced(uint), is_some)
            }

            /// Decode a field element from its canonical big endian encoding.
            pub fn from_bytes(bytes: &FieldBytes) -> CtOption<Self> {
                Self::from_uint(&U256::from_be_byte_array(*bytes))
            }

            /// Decode a field element from a big endian byte slice.
            ///
            /// Slice is expected to be zero padded to 32 bytes.
            pub fn from_slice(slice: &[u8]) -> Option<Self> {
                if slice.len() != 32 {
                    return None;
                }

                Self::from_bytes(FieldBytes::from_slice(slice)).into()
            }

            /// Serialize as big endian bytes.
            pub fn to_bytes(&self) -> FieldBytes {
                self.to_canonical().to_be_byte_array()
            }

            /// Translate out of Montgomery form into the canonical integer.
            pub fn to_canonical(&self) -> U256 {
                self.0.retrieve()
            }

            /// Determine if this element is odd.
            pub fn is_odd(&self) -> Choice {
                Choice::from(u8::from(self.to_canonical().bit_vartime(0)))
            }

            /// Determine if this element is zero.
            pub fn is_zero(&self) -> Choice {
                self.ct_eq(&Self::ZERO)
            }

            /// Double this element.
            pub fn double(&self) -> Self {
                Self(self.0 + self.0)
            }

            /// Square this element.
            pub fn square(&self) -> Self {
                Self(self.0.square())
            }

            /// Raise this element to the power `exp`.
            pub fn pow(&self, exp: &U256) -> Self {
                Self(self.0.pow(exp))
            }

            /// Compute the multiplicative inverse as `self^(modulus - 2)`.
            ///
            /// Returns none for zero.
            pub fn invert(&self) -> CtOption<Self> {
                let exp = Self::MODULUS.wrapping_sub(&U256::from_u8(2));
                CtOption::new(self.pow(&exp), !self.is_zero())
            }

            /// Returns the square root of self, or `None` if no square root exists.
            ///
            /// Tonelli-Shanks, from <https://eprint.iacr.org/2012/685.pdf> (page 12, algorithm 5).
            pub fn sqrt(&self) -> CtOption<Self> {
                use elliptic_curve::ff::PrimeField;

                let t_minus_1_over_2 = Self::T.shr_vartime(1);
                let w = self.pow(&t_minus_1_over_2);

                let mut v = <Self as PrimeField>::S;
                let mut x = *self * w;
                let mut b = x * w;
                let mut z = <Self as PrimeField>::ROOT_OF_UNITY;

                for max_v in (1..=<Self as PrimeField>::S).rev() {
                    let mut k = 1;
                    let mut tmp = b.square();
                    let mut j_less_than_v = Choice::from(1);

                    for j in 2..max_v {
                        let tmp_is_one = tmp.ct_eq(&Self::ONE);
                        let squared = Self::conditional_select(&tmp, &z, tmp_is_one).square();
                        tmp = Self::conditional_select(&squared, &tmp, tmp_is_one);
                        let new_z = Self::conditional_select(&z, &squared, tmp_is_one);
                        j_less_than_v &= !j.ct_eq(&v);
                        k = u32::conditional_select(&j, &k, tmp_is_one);
                        z = Self::conditional_select(&z, &new_z, j_less_than_v);
                    }

                    let result = x * z;
                    x = Self::conditional_select(&result, &x, b.ct_eq(&Self::ONE));
                    z = z.square();
                    b *= z;
                    v = k;
                }

                CtOption::new(x, x.square().ct_eq(self))
            }
        }

        impl elliptic_curve::ff::Field for $fe {
            const ZERO: Self = Self::ZERO;
            const ONE: Self = Self::ONE;

            fn random(mut rng: impl elliptic_curve::rand_core::RngCore) -> Self {
                use elliptic_curve::ff::PrimeField;

                let mask = u8::MAX >> ((8 - <Self as PrimeField>::NUM_BITS % 8) % 8);
                let mut bytes = FieldBytes::default();

                loop {
                    rng.fill_bytes(&mut bytes);
                    bytes[0] &= mask;

                    if let Some(fe) = Option::from(Self::from_bytes(&bytes)) {
                        return fe;
                    }
                }
            }

            fn is_zero(&self) -> Choice {
                self.is_zero()
            }

            fn square(&self) -> Self {
                self.square()
            }

            fn double(&self) -> Self {
                self.double()
            }

            fn invert(&self) -> CtOption<Self> {
                self.invert()
            }

            fn sqrt(&self) -> CtOption<Self> {
                self.sqrt()
            }

            fn sqrt_ratio(num: &Self, div: &Self) -> (Choice, Self) {
                elliptic_curve::ff::helpers::sqrt_ratio_generic(num, div)
            }
        }

        impl elliptic_curve::ff::PrimeField for $fe {
            type Repr = FieldBytes;

            const MODULUS: &'static str = $modulus_hex;
            const NUM_BITS: u32 = U256::from_be_hex($modulus_hex).bits_vartime() as u32;
            const CAPACITY: u32 = <Self as elliptic_curve::ff::PrimeField>::NUM_BITS - 1;
            const TWO_INV: Self = Self::from_hex($two_inv_hex);
            const MULTIPLICATIVE_GENERATOR: Self = Self::from_u64($generator);
            const S: u32 = $s;
            const ROOT_OF_UNITY: Self = Self::from_hex($root_of_unity_hex);
            const ROOT_OF_UNITY_INV: Self = Self::from_hex($root_of_unity_inv_hex);
            const DELTA: Self = Self::from_hex($delta_hex);

            fn from_repr(bytes: FieldBytes) -> CtOption<Self> {
                Self::from_bytes(&bytes)
            }

            fn to_repr(&self) -> FieldBytes {
                self.to_bytes()
            }

            fn is_odd(&self) -> Choice {
                self.is_odd()
            }
        }

        impl From<u64> for $fe {
            fn from(n: u64) -> $fe {
                Self::from_u64(n)
            }
        }

        impl ConditionallySelectable for $fe {
            fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
                Self(Residue::conditional_select(&a.0, &b.0, choice))
            }
        }

        impl ConstantTimeEq for $fe {
            fn ct_eq(&self, other: &Self) -> Choice {
                self.0.ct_eq(&other.0)
            }
        }

        impl Default for $fe {
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl Eq for $fe {}

        impl PartialEq for $fe {
            fn eq(&self, other: &Self) -> bool {
                self.ct_eq(other).into()
            }
        }

        impl core::fmt::Debug for $fe {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}(0x{:x})", stringify!($fe), self)
            }
        }

        /// Lowercase hex without leading zeros; zero renders as `0`.
        impl core::fmt::LowerHex for $fe {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                if f.alternate() {
                    f.write_str("0x")?;
                }

                let bytes = self.to_bytes();
                let mut leading = true;

                for nibble in bytes.iter().flat_map(|byte| [byte >> 4, byte & 0xf]) {
                    if leading && nibble == 0 {
                        continue;
                    }

                    leading = false;
                    write!(f, "{nibble:x}")?;
                }

                if leading {
                    f.write_str("0")?;
                }

                Ok(())
            }
        }

        impl core::ops::Add for $fe {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl core::ops::Add<&$fe> for $fe {
            type Output = Self;

            fn add(self, rhs: &Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl core::ops::AddAssign for $fe {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl core::ops::AddAssign<&$fe> for $fe {
            fn add_assign(&mut self, rhs: &Self) {
                *self = *self + rhs;
            }
        }

        impl core::ops::Sub for $fe {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl core::ops::Sub<&$fe> for $fe {
            type Output = Self;

            fn sub(self, rhs: &Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl core::ops::SubAssign for $fe {
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl core::ops::SubAssign<&$fe> for $fe {
            fn sub_assign(&mut self, rhs: &Self) {
                *self = *self - rhs;
            }
        }

        impl core::ops::Mul for $fe {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self {
                Self(self.0 * rhs.0)
            }
        }

        impl core::ops::Mul<&$fe> for $fe {
            type Output = Self;

            fn mul(self, rhs: &Self) -> Self {
                Self(self.0 * rhs.0)
            }
        }

        impl core::ops::MulAssign for $fe {
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl core::ops::MulAssign<&$fe> for $fe {
            fn mul_assign(&mut self, rhs: &Self) {
                *self = *self * rhs;
            }
        }

        impl core::ops::Neg for $fe {
            type Output = Self;

            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl core::iter::Sum for $fe {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, fe| acc + fe)
            }
        }

        impl<'a> core::iter::Sum<&'a $fe> for $fe {
            fn sum<I: Iterator<Item = &'a $fe>>(iter: I) -> Self {
                iter.copied().sum()
            }
        }

        impl core::iter::Product for $fe {
            fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ONE, |acc, fe| acc * fe)
            }
        }

        impl<'a> core::iter::Product<&'a $fe> for $fe {
            fn product<I: Iterator<Item = &'a $fe>>(iter: I) -> Self {
                iter.copied().product()
            }
        }
    };
}

/// Tests for the constants of a `PrimeField` implementation.
#[cfg(test)]
macro_rules! test_primefield_constants {
    ($fe:ident) => {
        #[test]
        fn primefield_constants() {
            use elliptic_curve::ff::{Field, PrimeField};

            // 2^S · T = modulus - 1, T odd
            let t = <$fe>::T;
            assert!(t.bit_vartime(0));
            assert_eq!(
                t.shl_vartime(<$fe as PrimeField>::S as usize),
                <$fe>::MODULUS.wrapping_sub(&U256::ONE)
            );

            // MULTIPLICATIVE_GENERATOR^T = ROOT_OF_UNITY
            assert_eq!(
                <$fe as PrimeField>::MULTIPLICATIVE_GENERATOR.pow(&t),
                <$fe as PrimeField>::ROOT_OF_UNITY
            );

            // ROOT_OF_UNITY^(2^S) = 1, and no smaller power of two
            let mut root = <$fe as PrimeField>::ROOT_OF_UNITY;
            for _ in 1..<$fe as PrimeField>::S {
                root = root.square();
            }
            assert_eq!(root, -<$fe>::ONE);
            assert_eq!(root.square(), <$fe>::ONE);

            assert_eq!(
                <$fe as PrimeField>::ROOT_OF_UNITY * <$fe as PrimeField>::ROOT_OF_UNITY_INV,
                <$fe>::ONE
            );

            // DELTA = MULTIPLICATIVE_GENERATOR^(2^S), so DELTA^T = 1
            let mut delta = <$fe as PrimeField>::MULTIPLICATIVE_GENERATOR;
            for _ in 0..<$fe as PrimeField>::S {
                delta = delta.square();
            }
            assert_eq!(delta, <$fe as PrimeField>::DELTA);
            assert_eq!(delta.pow(&t), <$fe>::ONE);

            assert_eq!(<$fe>::from(2) * <$fe as PrimeField>::TWO_INV, <$fe>::ONE);
            assert_eq!(<$fe as PrimeField>::NUM_BITS, 252);

            // the generator is a quadratic non-residue
            assert!(bool::from(
                Field::sqrt(&<$fe as PrimeField>::MULTIPLICATIVE_GENERATOR).is_none()
            ));
        }

        #[test]
        fn field_trait_sqrt_and_repr() {
            use elliptic_curve::ff::{Field, PrimeField};

            for &n in &[1u64, 4, 9, 16, 25, 36, 49, 64] {
                let fe = <$fe>::from(n);
                let sqrt = Field::sqrt(&fe).unwrap();
                assert_eq!(sqrt.square(), fe);
                assert_eq!(<$fe>::from_repr(fe.to_repr()).unwrap(), fe);
            }

            let (is_square, root) = <$fe>::sqrt_ratio(&<$fe>::from(18), &<$fe>::from(2));
            assert!(bool::from(is_square));
            assert_eq!(root.square(), <$fe>::from(9));

            let elements = [<$fe>::from(2), <$fe>::from(3), <$fe>::from(7)];
            assert_eq!(elements.iter().sum::<$fe>(), <$fe>::from(12));
            assert_eq!(elements.iter().product::<$fe>(), <$fe>::from(42));
        }
    };
}
