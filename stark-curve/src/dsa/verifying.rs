//! Support for verifying signatures.
//!
//! ## Algorithm
//!
//! ```text
//! 1: e = bits2int(fix_message(digest)) mod n
//! 2: w = s^(-1) mod n
//! 3: X = [e·w]G + [r·w]Q
//! 4: accept iff X is not the identity and X.x mod n = r
//! ```

use super::{digest_from_prehash, digest_scalar, parse_digest, Signature, SigningKey};
use crate::{AffinePoint, EncodedPoint, Error, FieldElement, Result, Scalar, U256};
use signature::hazmat::PrehashVerifier;

#[cfg(feature = "alloc")]
use alloc::boxed::Box;

/// Public key used for verifying signatures.
///
/// StarkEx identifies accounts by the x-coordinate of this point alone, the
/// "stark key" returned by [`VerifyingKey::stark_key`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VerifyingKey {
    /// Public point `Q`.
    public_key: AffinePoint,
}

impl VerifyingKey {
    /// Initialize [`VerifyingKey`] from an affine point.
    ///
    /// Returns an [`Error`] if the point is the identity or not on the curve.
    pub fn from_affine(public_key: AffinePoint) -> Result<Self> {
        if public_key.is_identity().into() {
            return Err(Error::InvalidKey);
        }

        if !bool::from(public_key.is_on_curve()) {
            return Err(Error::NotOnCurve);
        }

        Ok(Self { public_key })
    }

    /// Initialize [`VerifyingKey`] from a SEC1-encoded public key.
    pub fn from_encoded_point(encoded_point: &EncodedPoint) -> Result<Self> {
        AffinePoint::from_encoded_point(encoded_point).and_then(Self::from_affine)
    }

    /// Initialize [`VerifyingKey`] from a SEC1-encoded byte string.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        AffinePoint::from_sec1_bytes(bytes).and_then(Self::from_affine)
    }

    /// Borrow the inner [`AffinePoint`] for this public key.
    pub fn as_affine(&self) -> &AffinePoint {
        &self.public_key
    }

    /// The x-coordinate of the public point.
    pub fn stark_key(&self) -> FieldElement {
        self.public_key.x()
    }

    /// Serialize this [`VerifyingKey`] as a SEC1 [`EncodedPoint`], optionally
    /// applying point compression.
    pub fn to_encoded_point(&self, compress: bool) -> EncodedPoint {
        self.public_key.to_encoded_point(compress)
    }

    /// Serialize this [`VerifyingKey`] as a SEC1-encoded bytestring
    /// (with point compression applied).
    #[cfg(feature = "alloc")]
    pub fn to_sec1_bytes(&self) -> Box<[u8]> {
        self.to_encoded_point(true).to_bytes()
    }

    /// Verify a signature over a digest given as hex digits without a `0x`
    /// prefix.
    pub fn verify_hex(&self, msg_hash: &str, signature: &Signature) -> Result<bool> {
        self.verify_digest(&parse_digest(msg_hash)?, signature)
    }

    /// Verify a signature over a digest of at most 63 hex digits.
    ///
    /// Malformed digests are errors. A signature that simply does not match
    /// yields `Ok(false)`.
    pub fn verify_digest(&self, digest: &U256, signature: &Signature) -> Result<bool> {
        // 1: e = bits2int(fix_message(digest)) mod n
        let e = digest_scalar(digest)?;
        let (r, _) = signature.split_scalars();

        // 2: w = s^(-1) mod n
        let w = signature.w();

        // 3: X = [e·w]G + [r·w]Q
        let big_x = AffinePoint::mul_by_generator(&(e * w))
            .and_then(|u1_g| {
                let u2_q = self.public_key.mul(&(r * w))?;
                u1_g.checked_add(&u2_q)
            });

        let big_x = match big_x {
            Ok(point) if !bool::from(point.is_identity()) => point,
            Ok(_) | Err(Error::DegenerateAddition) => {
                tracing::debug!("verification point degenerated to the identity");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        // 4: accept iff X.x mod n = r
        Ok(Scalar::reduce_field_element(&big_x.x()) == r)
    }
}

//
// `*Verifier` trait impls
//

impl PrehashVerifier<Signature> for VerifyingKey {
    fn verify_prehash(&self, prehash: &[u8], signature: &Signature) -> signature::Result<()> {
        if self.verify_digest(&digest_from_prehash(prehash)?, signature)? {
            Ok(())
        } else {
            Err(signature::Error::new())
        }
    }
}

//
// Other trait impls
//

impl AsRef<AffinePoint> for VerifyingKey {
    fn as_ref(&self) -> &AffinePoint {
        &self.public_key
    }
}

impl From<&SigningKey> for VerifyingKey {
    fn from(signing_key: &SigningKey) -> VerifyingKey {
        *signing_key.verifying_key()
    }
}

impl From<VerifyingKey> for AffinePoint {
    fn from(verifying_key: VerifyingKey) -> AffinePoint {
        verifying_key.public_key
    }
}

impl TryFrom<AffinePoint> for VerifyingKey {
    type Error = Error;

    fn try_from(public_key: AffinePoint) -> Result<Self> {
        Self::from_affine(public_key)
    }
}
