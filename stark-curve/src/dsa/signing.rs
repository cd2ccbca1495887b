//! Support for signing.
//!
//! ## Algorithm
//!
//! ```text
//! 1: e = bits2int(fix_message(digest)) mod n
//! 2: seed HMAC-DRBG(SHA-256) with entropy d and nonce e, both 32 bytes big endian
//! 3: k = bits2int(next 32 bytes of DRBG output), retry unless 1 < k < n - 1
//! 4: (x1, y1) = [k]G, r = x1 mod n, retry if r = 0
//! 5: s = k^(-1)·(e + r·d) mod n, retry if s = 0
//! 6: the signature is (r, s)
//! ```

use super::{bits2int, digest_from_prehash, digest_scalar, parse_digest, Signature, VerifyingKey};
use crate::{AffinePoint, Error, FieldBytes, Result, Scalar, U256};
use core::fmt::{self, Debug};
use elliptic_curve::subtle::{Choice, ConstantTimeEq};
use rfc6979::HmacDrbg;
use sha2::Sha256;
use signature::{hazmat::PrehashSigner, KeypairRef};

/// Secret key used for signing digests and producing signatures.
///
/// ## Usage
///
/// Digests are usually passed as hex with [`SigningKey::sign_hex`]. The
/// [`signature`] crate's [`PrehashSigner`] trait is also implemented, taking
/// the digest as big endian bytes.
#[derive(Clone)]
pub struct SigningKey {
    /// Secret scalar `d`.
    secret_scalar: Scalar,

    /// Verifying key for this signing key.
    verifying_key: VerifyingKey,
}

impl SigningKey {
    /// Create a signing key from a secret scalar in `[1, n)`.
    pub fn from_scalar(secret_scalar: Scalar) -> Result<Self> {
        if secret_scalar.is_zero().into() {
            return Err(Error::InvalidKey);
        }

        let public_key = AffinePoint::mul_by_generator(&secret_scalar)?;
        let verifying_key = VerifyingKey::from_affine(public_key)?;

        Ok(Self {
            secret_scalar,
            verifying_key,
        })
    }

    /// Parse signing key from big endian-encoded bytes.
    pub fn from_bytes(bytes: &FieldBytes) -> Result<Self> {
        let secret_scalar = Option::from(Scalar::from_bytes(bytes)).ok_or(Error::InvalidKey)?;
        Self::from_scalar(secret_scalar)
    }

    /// Parse signing key from a big endian-encoded byte slice.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let secret_scalar = Scalar::from_slice(slice).ok_or(Error::InvalidKey)?;
        Self::from_scalar(secret_scalar)
    }

    /// Parse signing key from hex digits without a `0x` prefix.
    pub fn from_hex(digits: &str) -> Result<Self> {
        let secret_scalar = crate::arithmetic::parse_hex_digits(digits)?
            .and_then(|uint| Scalar::from_uint(&uint).into())
            .ok_or(Error::InvalidKey)?;
        Self::from_scalar(secret_scalar)
    }

    /// Serialize as bytes.
    pub fn to_bytes(&self) -> FieldBytes {
        self.secret_scalar.to_bytes()
    }

    /// Borrow the secret [`Scalar`] value for this key.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    ///
    /// Please treat it with the care it deserves!
    pub fn as_scalar(&self) -> &Scalar {
        &self.secret_scalar
    }

    /// Get the [`VerifyingKey`] which corresponds to this [`SigningKey`].
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Sign a digest given as hex digits without a `0x` prefix.
    pub fn sign_hex(&self, msg_hash: &str) -> Result<Signature> {
        self.sign_digest(&parse_digest(msg_hash)?)
    }

    /// Sign a digest of at most 63 hex digits.
    pub fn sign_digest(&self, digest: &U256) -> Result<Signature> {
        // 1: e = bits2int(fix_message(digest)) mod n
        let e = digest_scalar(digest)?;

        // 2: seed HMAC-DRBG(SHA-256) with entropy d and nonce e
        let mut drbg =
            HmacDrbg::<Sha256>::new(&self.secret_scalar.to_bytes(), &e.to_bytes(), &[]);
        let n_minus_1 = Scalar::MODULUS.wrapping_sub(&U256::ONE);

        loop {
            // 3: k = bits2int(next 32 bytes of DRBG output), retry unless 1 < k < n - 1
            let mut k_bytes = FieldBytes::default();
            drbg.fill_bytes(&mut k_bytes);
            let k = bits2int(&U256::from_be_slice(&k_bytes));

            if k <= U256::ONE || k >= n_minus_1 {
                tracing::trace!("nonce candidate out of range, drawing another");
                continue;
            }

            let k = Scalar::from_uint_reduced(&k);

            // 4: (x1, y1) = [k]G, r = x1 mod n, retry if r = 0
            let big_r = AffinePoint::mul_by_generator(&k)?;
            let r = Scalar::reduce_field_element(&big_r.x());

            if r.is_zero().into() {
                tracing::trace!("r is zero, drawing another nonce");
                continue;
            }

            // 5: s = k^(-1)·(e + r·d) mod n, retry if s = 0
            let k_inv = Option::<Scalar>::from(k.invert()).ok_or(Error::InvalidKey)?;
            let s = k_inv * (e + r * self.secret_scalar);

            if s.is_zero().into() {
                tracing::trace!("s is zero, drawing another nonce");
                continue;
            }

            // 6: the signature is (r, s)
            return Signature::from_scalars(r, s);
        }
    }
}

//
// `*Signer` trait impls
//

impl PrehashSigner<Signature> for SigningKey {
    fn sign_prehash(&self, prehash: &[u8]) -> signature::Result<Signature> {
        Ok(self.sign_digest(&digest_from_prehash(prehash)?)?)
    }
}

//
// Other trait impls
//

impl AsRef<VerifyingKey> for SigningKey {
    fn as_ref(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl ConstantTimeEq for SigningKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.secret_scalar.ct_eq(&other.secret_scalar)
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive()
    }
}

/// Constant-time comparison
impl Eq for SigningKey {}
impl PartialEq for SigningKey {
    fn eq(&self, other: &SigningKey) -> bool {
        self.ct_eq(other).into()
    }
}

impl KeypairRef for SigningKey {
    type VerifyingKey = VerifyingKey;
}

impl TryFrom<&[u8]> for SigningKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::SigningKey;
    use crate::{Error, Scalar, U256};

    #[test]
    fn rejects_out_of_range_keys() {
        assert_eq!(SigningKey::from_scalar(Scalar::ZERO), Err(Error::InvalidKey));
        assert_eq!(SigningKey::from_hex("0"), Err(Error::InvalidKey));
        assert_eq!(
            SigningKey::from_hex(
                "800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f"
            ),
            Err(Error::InvalidKey)
        );
        assert_eq!(SigningKey::from_hex("xyz"), Err(Error::InvalidInput));
        assert_eq!(SigningKey::from_slice(&[1u8; 31]), Err(Error::InvalidKey));
    }

    #[test]
    fn largest_key_is_accepted() {
        let n_minus_1 = Scalar::MODULUS.wrapping_sub(&U256::ONE);
        let key = SigningKey::from_scalar(Scalar::from_uint(&n_minus_1).unwrap()).unwrap();
        assert_eq!(
            key.verifying_key().as_affine(),
            &-crate::AffinePoint::GENERATOR
        );
    }

    #[test]
    fn debug_hides_secret() {
        let key = SigningKey::from_scalar(Scalar::from(0x1234_5678)).unwrap();
        let debug = std::format!("{key:?}");
        assert!(debug.starts_with("SigningKey"));
        assert!(!debug.contains("12345678"));
    }
}
