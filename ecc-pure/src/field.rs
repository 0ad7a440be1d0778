//! Multi-precision arithmetic over a prime field.
//!
//! [`Field`] holds a prime modulus `p` and a precomputed Barrett reduction
//! constant `mu`; it is the factory every [`FieldElement`] is spawned from
//! and logically shared (via a reference-counted handle) by every element,
//! curve and point the field produces. [`FieldElement`] is an immutable
//! non-negative integer in `[0, p)` with schoolbook add/sub/mul, Barrett
//! reduction, a binary extended-GCD division/inverse, and width-w NAF
//! scalar decomposition.
//!
//! Every arithmetic method returns a freshly allocated [`FieldElement`]; none
//! mutate their receiver, so a `Field`/`FieldElement` graph may be shared
//! read-only across threads (see the crate-level docs for the accompanying
//! variable-time caveat).

use crate::error::{EccError, EccResult};
use crate::limbs::{
    add_limbs, bit_length, cmp_limbs, compute_barrett_mu, format_hex, high_limbs, is_odd,
    is_one as limbs_is_one, is_zero as limbs_is_zero, low_limbs, mul_limbs, mul_small,
    parse_hex_magnitude, shr1, small_vec, strip, sub_limbs, sub_mod_width,
};
use core::cmp::Ordering;
use rand_core::RngCore;
use std::sync::Arc;

/// Immutable prime-field context: the modulus and its Barrett constant.
///
/// Cheap to clone (an `Arc` bump) and intended to be constructed once per
/// prime and then shared by every [`FieldElement`], `Curve` and `Point` it
/// spawns.
#[derive(Clone)]
pub struct Field {
    inner: Arc<FieldInner>,
}

pub(crate) struct FieldInner {
    /// Stripped little-endian magnitude of the modulus.
    pub(crate) p: Vec<u32>,
    /// Barrett constant `mu = floor(2^(64k) / p)`, `k = p.len()`.
    mu: Vec<u32>,
}

impl Field {
    /// Build a field from the modulus's hexadecimal representation.
    ///
    /// # Errors
    ///
    /// Returns [`EccError::InvalidHex`] if `p_hex` is empty or contains a
    /// non-hex-digit character.
    pub fn from_hex(p_hex: &str) -> EccResult<Self> {
        let mut p = parse_hex_magnitude(p_hex)?;
        strip(&mut p);
        Ok(Self::from_magnitude(p))
    }

    fn from_magnitude(p: Vec<u32>) -> Self {
        let k = p.len();
        let mu = compute_barrett_mu(&p, k);
        Field {
            inner: Arc::new(FieldInner { p, mu }),
        }
    }

    /// The modulus, as a field element.
    #[must_use]
    pub fn modulus(&self) -> FieldElement {
        FieldElement::new_raw(self.inner.p.clone(), Arc::clone(&self.inner))
    }

    /// Number of significant bits of the modulus.
    #[must_use]
    pub fn modulus_bits(&self) -> usize {
        bit_length(&self.inner.p)
    }

    /// The additive identity, `0`.
    #[must_use]
    pub fn zero(&self) -> FieldElement {
        FieldElement::new_raw(vec![0], Arc::clone(&self.inner))
    }

    /// The multiplicative identity, `1`.
    #[must_use]
    pub fn one(&self) -> FieldElement {
        FieldElement::new_raw(vec![1], Arc::clone(&self.inner))
    }

    /// Build a field element from an unsigned 64-bit integer.
    #[must_use]
    pub fn from_u64(&self, value: u64) -> FieldElement {
        FieldElement::new_raw(small_vec(value), Arc::clone(&self.inner))
    }

    /// Internal small-integer constructor mirroring the original API's signed entry
    /// point; rejects negative values rather than silently taking an absolute value.
    ///
    /// # Errors
    ///
    /// Returns [`EccError::NegativeSmallInt`] if `value` is negative. The public API
    /// never constructs a negative small integer, so reaching this error indicates a
    /// programming mistake in an internal caller.
    pub(crate) fn from_small_int(&self, value: i64) -> EccResult<FieldElement> {
        if value < 0 {
            return Err(EccError::NegativeSmallInt);
        }
        Ok(self.from_u64(value as u64))
    }

    /// Parse a field element from a hex string, reducing via the field's modulus.
    ///
    /// # Errors
    ///
    /// Returns [`EccError::InvalidHex`] for empty/non-hex input, or
    /// [`EccError::ValueOutOfField`] if the parsed value is `>= p`.
    pub fn element_from_hex(&self, hex: &str) -> EccResult<FieldElement> {
        let magnitude = parse_hex_magnitude(hex)?;
        if cmp_limbs(&magnitude, &self.inner.p) != Ordering::Less {
            return Err(EccError::ValueOutOfField);
        }
        Ok(FieldElement::new_raw(magnitude, Arc::clone(&self.inner)))
    }

    /// Build a field element from raw little-endian limbs with an explicit signum.
    ///
    /// `signum == 0` forces the zero element regardless of `magnitude`.
    ///
    /// # Errors
    ///
    /// Returns [`EccError::ValueOutOfField`] if the (stripped) magnitude is `>= p`.
    pub fn element_from_limbs(&self, mut magnitude: Vec<u32>, signum: u8) -> EccResult<FieldElement> {
        if signum == 0 {
            return Ok(self.zero());
        }
        strip(&mut magnitude);
        if cmp_limbs(&magnitude, &self.inner.p) != Ordering::Less {
            return Err(EccError::ValueOutOfField);
        }
        Ok(FieldElement::new_raw(magnitude, Arc::clone(&self.inner)))
    }

    /// Draw a uniform field element, per the RNG contract in the crate docs: limbs
    /// `0..k-1` are filled with uniform 32-bit words and the top limb is drawn
    /// uniformly in `[0, p.top_limb]`. This is biased whenever `p`'s top limb is not
    /// of the form `2^n - 1`; see [`Field::random_element_uniform`] for a resampling
    /// alternative.
    #[must_use]
    pub fn random_element<R: RngCore>(&self, rng: &mut R) -> FieldElement {
        let k = self.inner.p.len();
        let top_limb = self.inner.p[k - 1];
        let mut magnitude = Vec::with_capacity(k);
        for _ in 0..k - 1 {
            magnitude.push(rng.next_u32());
        }
        let top = if top_limb == u32::MAX {
            rng.next_u32()
        } else {
            rng.next_u32() % (top_limb + 1)
        };
        magnitude.push(top);
        strip(&mut magnitude);
        // The clamp above bounds the candidate close to p but, per the documented
        // bias, not always strictly under it; at most a handful of subtractions
        // bring it back in range (compare Barrett's own "runs at most twice").
        while cmp_limbs(&magnitude, &self.inner.p) != Ordering::Less {
            magnitude = sub_limbs(&magnitude, &self.inner.p);
        }
        FieldElement::new_raw(magnitude, Arc::clone(&self.inner))
    }

    /// Draw a uniform field element via rejection sampling, avoiding the top-limb
    /// bias documented on [`Field::random_element`].
    #[must_use]
    pub fn random_element_uniform<R: RngCore>(&self, rng: &mut R) -> FieldElement {
        let k = self.inner.p.len();
        loop {
            let mut magnitude: Vec<u32> = (0..k).map(|_| rng.next_u32()).collect();
            strip(&mut magnitude);
            if cmp_limbs(&magnitude, &self.inner.p) == Ordering::Less {
                return FieldElement::new_raw(magnitude, Arc::clone(&self.inner));
            }
        }
    }

    pub(crate) fn reduce(&self, x: &[u32]) -> Vec<u32> {
        self.inner.reduce(x)
    }
}

impl FieldInner {
    /// Barrett reduction: `x mod p`, valid for any `x` produced by this crate's
    /// schoolbook multiply (at most `2k` limbs).
    fn reduce(&self, x: &[u32]) -> Vec<u32> {
        let p = &self.p;
        if cmp_limbs(x, p) == Ordering::Less {
            let mut r = x.to_vec();
            strip(&mut r);
            return r;
        }
        let k = p.len();
        let q1 = high_limbs(x, k.saturating_sub(1));
        let q2 = mul_limbs(&q1, &self.mu);
        let q3 = high_limbs(&q2, k + 1);
        let r1 = low_limbs(x, k + 1);
        let pq3 = mul_limbs(p, &q3);
        let r2 = low_limbs(&pq3, k + 1);
        let mut r = sub_mod_width(&r1, &r2, k + 1);
        while cmp_limbs(&r, p) != Ordering::Less {
            r = sub_limbs(&r, p);
        }
        r
    }
}

/// An immutable non-negative integer in `[0, p)`.
///
/// Every arithmetic method allocates and returns a new `FieldElement`; none
/// mutate `self`. Two `FieldElement`s must share the same [`Field`] handle
/// (debug-asserted): mixing elements from different fields is a programming
/// error, not a runtime one.
#[derive(Clone)]
pub struct FieldElement {
    /// `0` if the value is zero, `1` otherwise. No negative values exist in
    /// the public API; negation is defined as `p - x`.
    signum: u8,
    /// Little-endian limbs, stripped of leading zeros except for `[0]`.
    magnitude: Vec<u32>,
    field: Arc<FieldInner>,
}

impl FieldElement {
    fn new_raw(mut magnitude: Vec<u32>, field: Arc<FieldInner>) -> Self {
        strip(&mut magnitude);
        let signum = u8::from(!limbs_is_zero(&magnitude));
        FieldElement {
            signum,
            magnitude,
            field,
        }
    }

    fn same_field(&self, other: &Self) {
        debug_assert!(
            Arc::ptr_eq(&self.field, &other.field),
            "FieldElement operands must belong to the same Field"
        );
    }

    fn zero_like(&self) -> Self {
        FieldElement::new_raw(vec![0], Arc::clone(&self.field))
    }

    fn one_like(&self) -> Self {
        FieldElement::new_raw(vec![1], Arc::clone(&self.field))
    }

    fn modulus(&self) -> &[u32] {
        &self.field.p
    }

    /// `true` if this element is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.signum == 0
    }

    fn is_one(&self) -> bool {
        limbs_is_one(&self.magnitude)
    }

    /// `true` if the least significant bit is set.
    #[must_use]
    pub fn is_odd(&self) -> bool {
        is_odd(&self.magnitude)
    }

    /// Number of significant bits in the magnitude.
    #[must_use]
    pub fn bit_length(&self) -> usize {
        bit_length(&self.magnitude)
    }

    /// Lowercase hex rendering, no leading zeros (`"0"` for zero).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format_hex(&self.magnitude)
    }

    /// `self + other`.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        self.same_field(other);
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let mut sum = add_limbs(&self.magnitude, &other.magnitude);
        if cmp_limbs(&sum, self.modulus()) != Ordering::Less {
            sum = sub_limbs(&sum, self.modulus());
        }
        FieldElement::new_raw(sum, Arc::clone(&self.field))
    }

    /// `self - other`.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.same_field(other);
        match cmp_limbs(&self.magnitude, &other.magnitude) {
            Ordering::Equal => self.zero_like(),
            Ordering::Greater => {
                FieldElement::new_raw(sub_limbs(&self.magnitude, &other.magnitude), Arc::clone(&self.field))
            }
            Ordering::Less => {
                let diff = sub_limbs(&other.magnitude, &self.magnitude);
                FieldElement::new_raw(sub_limbs(self.modulus(), &diff), Arc::clone(&self.field))
            }
        }
    }

    /// `-self`, i.e. `p - self` (and `0` when `self == 0`).
    #[must_use]
    pub fn negate(&self) -> Self {
        self.zero_like().sub(self)
    }

    /// `self * other`.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        self.same_field(other);
        if self.is_zero() || other.is_zero() {
            return self.zero_like();
        }
        if self.is_one() {
            return other.clone();
        }
        if other.is_one() {
            return self.clone();
        }
        let product = mul_limbs(&self.magnitude, &other.magnitude);
        let reduced = self.field.reduce(&product);
        FieldElement::new_raw(reduced, Arc::clone(&self.field))
    }

    /// `self * scalar` for a single machine word, without a full schoolbook multiply.
    #[must_use]
    pub fn mul_u32(&self, scalar: u32) -> Self {
        if scalar == 0 || self.is_zero() {
            return self.zero_like();
        }
        let product = mul_small(&self.magnitude, scalar);
        let reduced = self.field.reduce(&product);
        FieldElement::new_raw(reduced, Arc::clone(&self.field))
    }

    /// `self / other` via binary extended-Euclidean division, which simultaneously
    /// computes a modular inverse of `other` without a separate inversion step.
    ///
    /// # Errors
    ///
    /// Returns [`EccError::DivisionByZero`] if `other` is zero.
    pub fn div(&self, other: &Self) -> EccResult<Self> {
        self.same_field(other);
        if other.is_zero() {
            return Err(EccError::DivisionByZero);
        }
        let p = self.modulus().to_vec();
        let mut u = other.magnitude.clone();
        let mut v = p.clone();
        let mut x1 = self.magnitude.clone();
        let mut x2 = vec![0u32];

        loop {
            if limbs_is_one(&u) {
                return Ok(FieldElement::new_raw(x1, Arc::clone(&self.field)));
            }
            if limbs_is_one(&v) {
                return Ok(FieldElement::new_raw(x2, Arc::clone(&self.field)));
            }
            while !is_odd(&u) {
                shr1(&mut u);
                if is_odd(&x1) {
                    x1 = add_limbs(&x1, &p);
                }
                shr1(&mut x1);
            }
            while !is_odd(&v) {
                shr1(&mut v);
                if is_odd(&x2) {
                    x2 = add_limbs(&x2, &p);
                }
                shr1(&mut x2);
            }
            if cmp_limbs(&u, &v) != Ordering::Less {
                u = sub_limbs(&u, &v);
                x1 = mod_sub(&x1, &x2, &p);
            } else {
                v = sub_limbs(&v, &u);
                x2 = mod_sub(&x2, &x1, &p);
            }
        }
    }

    /// `1 / self`.
    ///
    /// # Errors
    ///
    /// Returns [`EccError::DivisionByZero`] if `self` is zero.
    pub fn inverse(&self) -> EccResult<Self> {
        self.one_like().div(self)
    }

    /// Width-`w` non-adjacent form of this element, treated as a scalar.
    ///
    /// Produces a little-endian signed-digit sequence where every non-zero digit is
    /// odd with `|d| < 2^w` and no two consecutive digits are non-zero, zero-padded
    /// to `bit_length() + 1` digits.
    ///
    /// # Errors
    ///
    /// Returns [`EccError::InvalidArgument`] if `width` is outside `[2, 6]`.
    pub fn to_naf(&self, width: u32) -> EccResult<Vec<i8>> {
        if !(2..=6).contains(&width) {
            return Err(EccError::InvalidArgument);
        }
        let original_bits = bit_length(&self.magnitude);
        let mut k = self.magnitude.clone();
        let pow_w = 1i64 << width;
        let pow_w_plus_1 = pow_w << 1;
        let mut out = Vec::with_capacity(original_bits + 1);

        while !limbs_is_zero(&k) {
            if is_odd(&k) {
                let mask = pow_w_plus_1 as u32 - 1;
                let mut d = i64::from(k[0] & mask);
                if d >= pow_w {
                    d -= pow_w_plus_1;
                }
                out.push(d as i8);
                if d >= 0 {
                    k = sub_limbs(&k, &small_vec(d as u64));
                } else {
                    k = add_limbs(&k, &small_vec((-d) as u64));
                }
            } else {
                out.push(0);
            }
            shr1(&mut k);
        }
        while out.len() < original_bits + 1 {
            out.push(0);
        }
        Ok(out)
    }
}

/// `(a - b) mod p`, used by the division algorithm where both operands are already
/// known to lie in `[0, p)`.
fn mod_sub(a: &[u32], b: &[u32], p: &[u32]) -> Vec<u32> {
    match cmp_limbs(a, b) {
        Ordering::Equal => vec![0],
        Ordering::Greater => sub_limbs(a, b),
        Ordering::Less => {
            let diff = sub_limbs(b, a);
            sub_limbs(p, &diff)
        }
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.same_field(other);
        self.signum == other.signum && self.magnitude == other.magnitude
    }
}
impl Eq for FieldElement {}

impl PartialOrd for FieldElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for FieldElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.same_field(other);
        cmp_limbs(&self.magnitude, &other.magnitude)
    }
}

impl core::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement({})", self.to_hex())
    }
}

impl core::fmt::Debug for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Field(p = {})", format_hex(&self.inner.p))
    }
}
