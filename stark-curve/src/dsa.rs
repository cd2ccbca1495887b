//! Deterministic ECDSA over the STARK curve, as used to sign StarkEx
//! instructions.
//!
//! ## Digests
//!
//! Messages are signed as Pedersen digests of at most 63 hex digits. A
//! 63-digit digest is shifted left by one hex digit before use, so that the
//! truncation below maps it back to its original value:
//!
//! ```text
//! bits2int(v) = v >> max(0, 8·⌈bitlen(v)/8⌉ - 252)
//! e           = bits2int(fix_message(digest)) mod n
//! ```
//!
//! ## Usage
//!
#![cfg_attr(feature = "std", doc = "```")]
#![cfg_attr(not(feature = "std"), doc = "```ignore")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use stark_curve::dsa::{SigningKey, signature::hazmat::{PrehashSigner, PrehashVerifier}};
//! use stark_curve::dsa::Signature;
//!
//! let signing_key = SigningKey::from_hex(
//!     "2dccce1da22003777062ee0870e9881b460a8b7eca276870f57c601f182136c",
//! )?;
//! let digest = "c465dd6b1bbffdb05442eb17f5ca38ad1aa78a6f56bf4415bdee219114a47";
//!
//! let signature = signing_key.sign_hex(digest)?;
//! assert!(signing_key.verifying_key().verify_hex(digest, &signature)?);
//!
//! // Prehash traits take big endian digest bytes.
//! let prehash = signing_key.verifying_key().stark_key().to_bytes();
//! let signature: Signature = signing_key.sign_prehash(&prehash)?;
//! signing_key.verifying_key().verify_prehash(&prehash, &signature)?;
//! # Ok(())
//! # }
//! ```

mod signing;
mod verifying;

pub use signature;

pub use self::{signing::SigningKey, verifying::VerifyingKey};

use crate::{arithmetic::parse_hex_digits, Error, FieldBytes, Result, Scalar, U256};
use core::fmt::{self, Debug};
use signature::SignatureEncoding;

#[cfg(feature = "alloc")]
use alloc::{format, string::String, vec::Vec};

/// Digests up to this many hex digits are signed unchanged.
const MAX_UNPADDED_DIGEST_DIGITS: usize = 62;

/// A digest of exactly this many hex digits gets a trailing zero digit.
const PADDED_DIGEST_DIGITS: usize = 63;

/// Signature serialized as bytes: `r || s`, each 32 bytes big endian.
pub type SignatureBytes = [u8; Signature::BYTE_SIZE];

/// ECDSA signature over the STARK curve.
///
/// Both components are guaranteed to lie in `[1, n)`.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

impl Signature {
    /// Size of an encoded signature in bytes.
    pub const BYTE_SIZE: usize = 64;

    /// Create a [`Signature`] from its `r` and `s` components.
    pub fn from_scalars(r: Scalar, s: Scalar) -> Result<Self> {
        if bool::from(r.is_zero() | s.is_zero()) {
            return Err(Error::InvalidSignature);
        }

        Ok(Self { r, s })
    }

    /// Parse a signature from hex-encoded `r` and `s` (no `0x` prefix).
    pub fn from_hex(r: &str, s: &str) -> Result<Self> {
        let r = Scalar::from_hex_digits(r).ok_or(Error::InvalidSignature)?;
        let s = Scalar::from_hex_digits(s).ok_or(Error::InvalidSignature)?;
        Self::from_scalars(r, s)
    }

    /// Parse a signature from a byte array.
    pub fn from_bytes(bytes: &SignatureBytes) -> signature::Result<Self> {
        let (r_bytes, s_bytes) = bytes.split_at(Self::BYTE_SIZE / 2);
        let r = Scalar::from_slice(r_bytes).ok_or_else(signature::Error::new)?;
        let s = Scalar::from_slice(s_bytes).ok_or_else(signature::Error::new)?;
        Ok(Self::from_scalars(r, s)?)
    }

    /// Parse a signature from a byte slice.
    pub fn from_slice(bytes: &[u8]) -> signature::Result<Self> {
        SignatureBytes::try_from(bytes)
            .map_err(|_| signature::Error::new())?
            .try_into()
    }

    /// Serialize this signature as bytes.
    pub fn to_bytes(&self) -> SignatureBytes {
        let mut ret = [0; Self::BYTE_SIZE];
        let (r_bytes, s_bytes) = ret.split_at_mut(Self::BYTE_SIZE / 2);
        r_bytes.copy_from_slice(&self.r.to_bytes());
        s_bytes.copy_from_slice(&self.s.to_bytes());
        ret
    }

    /// Bytes for the `r` component of a signature.
    pub fn r_bytes(&self) -> FieldBytes {
        self.r.to_bytes()
    }

    /// Bytes for the `s` component of a signature.
    pub fn s_bytes(&self) -> FieldBytes {
        self.s.to_bytes()
    }

    /// Get the `r` component of this signature.
    pub fn r(&self) -> Scalar {
        self.r
    }

    /// Get the `s` component of this signature.
    pub fn s(&self) -> Scalar {
        self.s
    }

    /// Get `w = s⁻¹ mod n`, the form in which StarkEx submits signatures.
    pub fn w(&self) -> Scalar {
        // s is nonzero, so the inverse always exists.
        self.s.invert().unwrap_or(Scalar::ZERO)
    }

    /// Split the signature into its `r` and `s` scalars.
    pub fn split_scalars(&self) -> (Scalar, Scalar) {
        (self.r, self.s)
    }

    /// Convert this signature into a byte vector.
    #[cfg(feature = "alloc")]
    pub fn to_vec(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stark_curve::dsa::Signature(r: {:#x}, s: {:#x})", self.r, self.s)
    }
}

impl From<Signature> for SignatureBytes {
    fn from(signature: Signature) -> SignatureBytes {
        signature.to_bytes()
    }
}

impl From<&Signature> for SignatureBytes {
    fn from(signature: &Signature) -> SignatureBytes {
        signature.to_bytes()
    }
}

impl SignatureEncoding for Signature {
    type Repr = SignatureBytes;

    fn to_bytes(&self) -> Self::Repr {
        self.into()
    }

    fn encoded_len(&self) -> usize {
        Self::BYTE_SIZE
    }
}

impl TryFrom<SignatureBytes> for Signature {
    type Error = signature::Error;

    fn try_from(signature: SignatureBytes) -> signature::Result<Signature> {
        Signature::from_bytes(&signature)
    }
}

impl TryFrom<&SignatureBytes> for Signature {
    type Error = signature::Error;

    fn try_from(signature: &SignatureBytes) -> signature::Result<Signature> {
        Signature::from_bytes(signature)
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = signature::Error;

    fn try_from(bytes: &[u8]) -> signature::Result<Signature> {
        Signature::from_slice(bytes)
    }
}

/// Sign a hex digest (no `0x` prefix) with a hex private key.
pub fn sign(private_key: &str, msg_hash: &str) -> Result<Signature> {
    SigningKey::from_hex(private_key)?.sign_hex(msg_hash)
}

/// Verify a signature over a hex digest (no `0x` prefix).
///
/// Returns `Ok(false)` for a well-formed signature that does not match.
pub fn verify(public_key: &VerifyingKey, msg_hash: &str, signature: &Signature) -> Result<bool> {
    public_key.verify_hex(msg_hash, signature)
}

/// Bring a digest into the form the signer expects: hex without leading
/// zeros, with a `0` appended to 63-digit digests.
///
/// Digests of 64 or more significant digits are rejected.
#[cfg(feature = "alloc")]
pub fn fix_message(msg_hash: &str) -> Result<String> {
    let fixed = fix_message_uint(&parse_digest(msg_hash)?)?;
    let hex = format!("{fixed:x}");
    let trimmed = hex.trim_start_matches('0');

    Ok(if trimmed.is_empty() {
        String::from("0")
    } else {
        String::from(trimmed)
    })
}

/// Parse a hex digest, reporting oversized input as a length error.
pub(crate) fn parse_digest(msg_hash: &str) -> Result<U256> {
    parse_hex_digits(msg_hash)?.ok_or(Error::InvalidDigestLength {
        len: msg_hash.trim_start_matches('0').len(),
    })
}

/// Parse big endian digest bytes, as passed to the prehash traits.
pub(crate) fn digest_from_prehash(prehash: &[u8]) -> Result<U256> {
    if prehash.len() > 32 {
        return Err(Error::InvalidDigestLength {
            len: prehash.len() * 2,
        });
    }

    let mut bytes = FieldBytes::default();
    bytes[32 - prehash.len()..].copy_from_slice(prehash);
    Ok(U256::from_be_slice(&bytes))
}

/// Numeric form of `fix_message`.
pub(crate) fn fix_message_uint(msg: &U256) -> Result<U256> {
    let digits = (msg.bits_vartime() + 3) / 4;

    if digits <= MAX_UNPADDED_DIGEST_DIGITS {
        Ok(*msg)
    } else if digits == PADDED_DIGEST_DIGITS {
        tracing::debug!("appending a zero digit to a 63-digit digest");
        Ok(msg.shl_vartime(4))
    } else {
        Err(Error::InvalidDigestLength { len: digits })
    }
}

/// Keep the 252 most significant bits of the byte-aligned value `v`.
pub(crate) fn bits2int(v: &U256) -> U256 {
    let byte_len = (v.bits_vartime() + 7) / 8;
    let delta = (byte_len * 8).saturating_sub(Scalar::NUM_BITS);
    v.shr_vartime(delta)
}

/// Digest scalar `e` for a (not yet fixed) digest.
pub(crate) fn digest_scalar(digest: &U256) -> Result<Scalar> {
    // bits2int yields fewer than 252 bits and n > 2^251, so one reduction suffices.
    Ok(Scalar::from_uint_reduced(&bits2int(&fix_message_uint(digest)?)))
}
