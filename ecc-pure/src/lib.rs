//! A self-contained, pure-Rust elliptic-curve cryptography library for
//! constrained devices.
//!
//! Provides multi-precision modular arithmetic ([`field`]), short-Weierstrass
//! curves with Jacobian-projective points and width-w NAF scalar
//! multiplication ([`curve`]), and ECDSA signing/verification ([`ecdsa`]) on
//! top of them. Every type is built from plain `Vec<u32>` magnitudes; there
//! is no dependency on a big-integer crate in non-test code.
//!
//! # No side-channel resistance
//!
//! Every operation in this crate runs in data-dependent time: branch counts,
//! loop bounds and memory accesses vary with the values involved, including
//! secret scalars. This is the opposite of a constant-time implementation
//! and is a deliberate tradeoff for constrained devices where code size and
//! raw throughput dominate. Do not use this crate where timing, cache or
//! power side-channels are part of your threat model.
//!
//! # Hashing is out of scope
//!
//! [`ecdsa::Ecdsa::sign`] and [`ecdsa::Ecdsa::verify`] take an already-reduced
//! [`field::FieldElement`] as the message; hashing an arbitrary message into
//! the field and any domain separation are the caller's responsibility.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![warn(missing_docs)]

pub mod curve;
pub mod ecdsa;
pub mod error;
pub mod field;
mod limbs;

pub use curve::{Curve, Point};
pub use ecdsa::{Ecdsa, Signature, SignatureWithNonce};
pub use error::{EccError, EccResult};
pub use field::{Field, FieldElement};
