//! Error types.

use core::fmt;

/// Result type with the `stark-curve` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while parsing inputs, hashing, or signing.
///
/// Validation failures are reported before any curve arithmetic runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Numeric string is empty, negative, or contains non-digit characters.
    InvalidInput,

    /// Hexadecimal string is missing its required `0x` prefix.
    MissingHexPrefix,

    /// Value does not fit in the bit width reserved for the named field.
    RangeViolation {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Value is not smaller than the field modulus.
    NotInField,

    /// More inputs were passed to the Pedersen hash than the point table covers.
    TooManyInputs {
        /// Maximum number of inputs supported.
        max: usize,
    },

    /// Attempted to add two points sharing an x-coordinate but not a y-coordinate.
    DegenerateAddition,

    /// Coordinates do not satisfy the curve equation.
    NotOnCurve,

    /// The Pedersen accumulator collided with a table point.
    PointCollision {
        /// Index of the input being absorbed.
        input: usize,
        /// Bit of that input being absorbed.
        bit: usize,
    },

    /// Private key is outside `[1, n)`.
    InvalidKey,

    /// Signature component is outside `[1, n)`.
    InvalidSignature,

    /// Message digest has more hex digits than the signature scheme accepts.
    InvalidDigestLength {
        /// Number of significant hex digits in the digest.
        len: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput => write!(f, "malformed numeric input"),
            Error::MissingHexPrefix => write!(f, "hex string must start with 0x"),
            Error::RangeViolation { field } => write!(f, "{field} is out of range"),
            Error::NotInField => write!(f, "value exceeds the field modulus"),
            Error::TooManyInputs { max } => {
                write!(f, "pedersen hash supports at most {max} inputs")
            }
            Error::DegenerateAddition => write!(f, "adding a point to its negation"),
            Error::NotOnCurve => write!(f, "point is not on the curve"),
            Error::PointCollision { input, bit } => {
                write!(f, "unhashable input: collision at input {input}, bit {bit}")
            }
            Error::InvalidKey => write!(f, "private key is out of range"),
            Error::InvalidSignature => write!(f, "signature component is out of range"),
            Error::InvalidDigestLength { len } => {
                write!(f, "message digest has {len} hex digits, at most 63 allowed")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "dsa")]
impl From<Error> for signature::Error {
    fn from(_: Error) -> signature::Error {
        signature::Error::new()
    }
}
