//! Error types shared by the field, curve and ECDSA layers.

use thiserror::Error;

/// Error raised by this crate's field, curve and ECDSA operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EccError {
    /// Hex input was empty or contained a non-hex-digit character.
    #[error("invalid hex string")]
    InvalidHex,

    /// A parsed value was greater than or equal to the field modulus.
    #[error("value is out of range for the field")]
    ValueOutOfField,

    /// An internal small-integer constructor was handed a negative value.
    ///
    /// This should never be reachable from the public API; it exists because
    /// the underlying constructor is shared with internal callers that work
    /// in terms of signed machine integers.
    #[error("internal small-integer constructor received a negative value")]
    NegativeSmallInt,

    /// Division (or inversion) by the zero field element.
    #[error("division by zero field element")]
    DivisionByZero,

    /// The curve parameters `(a, b)` make the curve singular: `4a^3 + 27b^2 == 0`.
    #[error("curve parameters are singular: 4a^3 + 27b^2 = 0 (mod p)")]
    InvalidCurve,

    /// An affine `(x, y)` pair does not satisfy the curve equation.
    #[error("point is not on the curve")]
    PointNotOnCurve,

    /// A wNAF width fell outside the supported range `[2, 6]`.
    #[error("wNAF width must be between 2 and 6 inclusive")]
    InvalidArgument,
}

/// Convenience alias for results produced by this crate.
pub type EccResult<T> = Result<T, EccError>;
