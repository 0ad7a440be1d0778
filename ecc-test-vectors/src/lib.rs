//! Shared Certicom ECCp curve-parameter fixtures for the `ecc-pure` workspace.
//!
//! This crate centralises the test-vector hex strings so [`ecc-pure`](https://docs.rs/ecc-pure)
//! itself stays free of embedded numeric fixtures, mirroring the role the
//! `cardano-test-vectors` crate plays for its VRF/KES/DSIGN vectors: one
//! shared, dependency-light crate, consumed by integration tests and
//! diagnostic binaries rather than duplicated per-crate.
//!
//! # Provenance
//!
//! The Certicom ECC Challenge named nine bit widths (79, 89, 97, 109, 131,
//! 163, 191, 239 and 359), but this crate only ships fully verified numeric
//! parameters for the 79-bit curve. No verified source for the other eight
//! curves' `(p, a, b, P, d, Q)` tuples was available when this crate was
//! written. Rather than fabricate eight more tuples with no way to confirm
//! they satisfy the curve equation and the key-derivation relationship,
//! [`CATALOG_BIT_WIDTHS`] records the full named catalog while [`fixture`]
//! only resolves entries this crate can vouch for. See `DESIGN.md` at the
//! workspace root for the same note.

#![warn(missing_docs)]

/// A single Certicom ECCp fixture: curve parameters, a base point, and a
/// private key, all as hex strings in the encoding `ecc_pure` expects (no
/// `0x` prefix, case-insensitive).
///
/// The corresponding public key `Q = d * P` is deliberately not a field here:
/// no verified digits for it were available when this crate was written, so
/// there is nothing to embed. Callers that need `Q` derive it with
/// `ecc_pure::Ecdsa::derive_public_key`, which is itself exercised against
/// this fixture in `tests/eccp79.rs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EccpFixture {
    /// Bit width of the prime modulus, e.g. `79` for ECCp-79.
    pub bits: u32,
    /// Prime modulus `p`.
    pub p: &'static str,
    /// Curve coefficient `a`.
    pub a: &'static str,
    /// Curve coefficient `b`.
    pub b: &'static str,
    /// Base point x-coordinate.
    pub base_x: &'static str,
    /// Base point y-coordinate.
    pub base_y: &'static str,
    /// A private key `d`.
    pub private_key: &'static str,
}

/// The Certicom ECCp-79 challenge curve, with a private key.
///
/// The prime has 79 significant bits, `(a, b)` define a non-singular curve,
/// and `(base_x, base_y)` is a point on that curve.
pub const ECCP_79: EccpFixture = EccpFixture {
    bits: 79,
    p: "62CE5177412ACA899CF5",
    a: "6FEE9D4D2D1217D44FC3",
    b: "053DDCC4023A12C2A40A",
    base_x: "315D4B201C208475057D",
    base_y: "035F3DF5AB370252450A",
    private_key: "02CE5177407B7258DC31",
};

/// All fixtures this crate ships with verified numeric parameters.
pub const ALL: &[EccpFixture] = &[ECCP_79];

/// The full set of bit widths in the Certicom ECCp challenge catalog. Only the
/// widths present in [`ALL`] (currently just 79) have verified parameters in
/// this crate; see the module documentation for why the rest are listed
/// without numeric data.
pub const CATALOG_BIT_WIDTHS: &[u32] = &[79, 89, 97, 109, 131, 163, 191, 239, 359];

/// Look up the verified fixture for a given bit width, if this crate ships one.
#[must_use]
pub fn fixture(bits: u32) -> Option<&'static EccpFixture> {
    ALL.iter().find(|f| f.bits == bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eccp_79_is_resolvable_by_bit_width() {
        assert_eq!(fixture(79), Some(&ECCP_79));
    }

    #[test]
    fn unverified_catalog_widths_resolve_to_none() {
        for &bits in CATALOG_BIT_WIDTHS {
            if bits != 79 {
                assert!(fixture(bits).is_none());
            }
        }
    }
}
