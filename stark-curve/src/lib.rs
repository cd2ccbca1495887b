#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::checked_conversions,
    clippy::implicit_saturating_sub,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! ## Crate layout
//!
//! - [`FieldElement`], [`Scalar`] and [`AffinePoint`]: arithmetic over the
//!   curve `y² = x³ + x + β` and its prime-order group.
//! - [`ConstantPointTable`]: the shift point and the doubling chains the
//!   Pedersen hash consumes, regenerated from the digits of π.
//! - [`pedersen`]: the Pedersen hash itself.
//! - [`message`]: canonical packing of limit orders and transfers.
//! - [`dsa`]: deterministic ECDSA over the curve.

#[cfg(feature = "alloc")]
#[allow(unused_extern_crates)]
extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

#[cfg(feature = "dsa")]
pub mod dsa;
pub mod message;
pub mod pedersen;

mod arithmetic;
mod constant_points;
mod error;

pub use crate::{
    arithmetic::{
        affine::AffinePoint, field::FieldElement, scalar::Scalar, EQUATION_A, EQUATION_B,
    },
    constant_points::{ConstantPointTable, SHIFT_POINT},
    error::{Error, Result},
    message::{Instruction, LimitOrder, Transfer},
    pedersen::PedersenHasher,
};
pub use elliptic_curve::{self, bigint::U256};

#[cfg(feature = "global-table")]
pub use crate::constant_points::CONSTANT_POINTS;

#[cfg(all(feature = "alloc", feature = "global-table"))]
pub use crate::{
    message::{get_limit_order_msg, get_transfer_msg},
    pedersen::pedersen,
};

#[cfg(feature = "dsa")]
pub use crate::dsa::{sign, verify, Signature};

#[cfg(all(feature = "alloc", feature = "dsa"))]
pub use crate::dsa::fix_message;

use elliptic_curve::{
    consts::{U32, U33},
    generic_array::GenericArray,
    FieldBytesEncoding,
};

/// Order of the STARK curve group (i.e. scalar modulus) serialized as
/// hexadecimal.
const ORDER_HEX: &str = "0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f";

/// STARK-friendly elliptic curve.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, PartialOrd, Ord)]
pub struct StarkCurve;

impl elliptic_curve::Curve for StarkCurve {
    /// 32-byte serialized field elements.
    type FieldBytesSize = U32;

    /// Big integer type used for representing field elements.
    type Uint = U256;

    /// Order of the STARK curve group (i.e. scalar modulus).
    const ORDER: U256 = U256::from_be_hex(ORDER_HEX);
}

impl elliptic_curve::PrimeCurve for StarkCurve {}

/// Compressed SEC1-encoded curve point.
pub type CompressedPoint = GenericArray<u8, U33>;

/// SEC1 encoded point.
pub type EncodedPoint = elliptic_curve::sec1::EncodedPoint<StarkCurve>;

/// STARK curve field element serialized as bytes.
///
/// Byte array containing a serialized field element value (base field or
/// scalar), big endian.
pub type FieldBytes = elliptic_curve::FieldBytes<StarkCurve>;

impl FieldBytesEncoding<StarkCurve> for U256 {}
