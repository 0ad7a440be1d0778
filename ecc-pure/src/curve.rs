//! Short-Weierstrass curve group arithmetic.
//!
//! A [`Curve`] is `y^2 = x^3 + ax + b` over a [`Field`]. [`Point`] holds
//! Jacobian-projective coordinates `(X, Y, Z)` with affine image
//! `(X/Z^2, Y/Z^3)`, chosen so that addition and doubling need no field
//! inversion; only affine readout (`to_affine_x`/`to_affine_y`) pays that
//! cost. Scalar multiplication uses left-to-right width-w NAF with a
//! precomputed table of odd multiples of the base point.

use crate::error::{EccError, EccResult};
use crate::field::{Field, FieldElement};
use std::sync::Arc;

/// `y^2 = x^3 + ax + b` over a prime field.
#[derive(Clone)]
pub struct Curve {
    inner: Arc<CurveInner>,
}

struct CurveInner {
    field: Field,
    a: FieldElement,
    b: FieldElement,
    /// `2^-1 mod p`, precomputed once and reused by every point addition.
    inverse_of_two: FieldElement,
}

impl Curve {
    /// Construct `y^2 = x^3 + ax + b` over `field`.
    ///
    /// # Errors
    ///
    /// Returns [`EccError::InvalidCurve`] if `4a^3 + 27b^2 == 0 (mod p)`, i.e. the
    /// curve is singular.
    pub fn new(field: Field, a: FieldElement, b: FieldElement) -> EccResult<Self> {
        let four = field.from_u64(4);
        let twenty_seven = field.from_u64(27);
        let a_cubed = a.mul(&a).mul(&a);
        let b_squared = b.mul(&b);
        let discriminant = four.mul(&a_cubed).add(&twenty_seven.mul(&b_squared));
        if discriminant.is_zero() {
            return Err(EccError::InvalidCurve);
        }
        let two = field.from_u64(2);
        let inverse_of_two = two.inverse().expect("2 is invertible in any field of odd characteristic");
        Ok(Curve {
            inner: Arc::new(CurveInner {
                field,
                a,
                b,
                inverse_of_two,
            }),
        })
    }

    /// The field this curve is defined over.
    #[must_use]
    pub fn field(&self) -> &Field {
        &self.inner.field
    }

    /// The `a` coefficient.
    #[must_use]
    pub fn a(&self) -> &FieldElement {
        &self.inner.a
    }

    /// The `b` coefficient.
    #[must_use]
    pub fn b(&self) -> &FieldElement {
        &self.inner.b
    }

    /// The point at infinity (group identity) for this curve.
    #[must_use]
    pub fn infinity(&self) -> Point {
        Point {
            curve: self.clone(),
            coords: None,
        }
    }

    /// Construct an affine point `(x, y)`, with `z = 1`.
    ///
    /// # Errors
    ///
    /// Returns [`EccError::PointNotOnCurve`] if `y^2 != x^3 + ax + b`.
    pub fn point(&self, x: FieldElement, y: FieldElement) -> EccResult<Point> {
        let lhs = y.mul(&y);
        let rhs = x.mul(&x).mul(&x).add(&self.inner.a.mul(&x)).add(&self.inner.b);
        if lhs != rhs {
            return Err(EccError::PointNotOnCurve);
        }
        let one = self.inner.field.one();
        Ok(Point {
            curve: self.clone(),
            coords: Some((x, y, one)),
        })
    }
}

/// A point on a [`Curve`] in Jacobian-projective coordinates, or the identity.
///
/// `coords` is `None` for the point at infinity; otherwise `(X, Y, Z)` with
/// affine image `(X/Z^2, Y/Z^3)`. Equality here is *projective* equality
/// (limbwise comparison of `X`, `Y`, `Z`), not affine equality. Two points
/// equal in affine coordinates can still compare unequal here if held in
/// different Jacobian representations. Normalize via [`Point::to_affine_x`]/
/// [`Point::to_affine_y`] first when affine equality is what you want.
#[derive(Clone)]
pub struct Point {
    curve: Curve,
    coords: Option<(FieldElement, FieldElement, FieldElement)>,
}

impl Point {
    /// The curve this point lies on.
    #[must_use]
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// `true` for the point at infinity.
    #[must_use]
    pub fn is_infinity(&self) -> bool {
        self.coords.is_none()
    }

    fn xyz(&self) -> Option<&(FieldElement, FieldElement, FieldElement)> {
        self.coords.as_ref()
    }

    /// Affine x-coordinate, `X / Z^2`. The only operations that require a field
    /// inversion are this and [`Point::to_affine_y`].
    ///
    /// # Panics
    ///
    /// Panics if called on the point at infinity.
    #[must_use]
    pub fn to_affine_x(&self) -> FieldElement {
        let (x, _, z) = self.xyz().expect("point at infinity has no affine coordinates");
        let z2 = z.mul(z);
        x.div(&z2).expect("Z is never zero for a non-infinity point")
    }

    /// Affine y-coordinate, `Y / Z^3`.
    ///
    /// # Panics
    ///
    /// Panics if called on the point at infinity.
    #[must_use]
    pub fn to_affine_y(&self) -> FieldElement {
        let (_, y, z) = self.xyz().expect("point at infinity has no affine coordinates");
        let z3 = z.mul(z).mul(z);
        y.div(&z3).expect("Z is never zero for a non-infinity point")
    }

    /// `-self`: `(X, p - Y, Z)`.
    #[must_use]
    pub fn negate(&self) -> Self {
        match &self.coords {
            None => self.clone(),
            Some((x, y, z)) => Point {
                curve: self.curve.clone(),
                coords: Some((x.clone(), y.negate(), z.clone())),
            },
        }
    }

    /// `self + other` (Jacobian-projective addition).
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let (x1, y1, z1) = match &self.coords {
            Some(xyz) => xyz,
            None => return other.clone(),
        };
        let (x2, y2, z2) = match &other.coords {
            Some(xyz) => xyz,
            None => return self.clone(),
        };

        if self.projective_eq(other) {
            return self.double();
        }

        let z1_sq = z1.mul(z1);
        let z2_sq = z2.mul(z2);
        let lambda1 = x1.mul(&z2_sq);
        let lambda2 = x2.mul(&z1_sq);
        let lambda3 = lambda1.sub(&lambda2);
        let lambda7 = lambda1.add(&lambda2);

        let z1_cu = z1_sq.mul(z1);
        let z2_cu = z2_sq.mul(z2);
        let lambda4 = y1.mul(&z2_cu);
        let lambda5 = y2.mul(&z1_cu);
        let lambda6 = lambda4.sub(&lambda5);
        let lambda8 = lambda4.add(&lambda5);

        let lambda3_sq = lambda3.mul(&lambda3);
        let z3 = z1.mul(z2).mul(&lambda3);
        if z3.is_zero() {
            return self.curve.infinity();
        }

        let x3 = lambda6.mul(&lambda6).sub(&lambda7.mul(&lambda3_sq));
        let lambda9 = lambda7.mul(&lambda3_sq).sub(&x3).sub(&x3);
        let lambda3_cu = lambda3_sq.mul(&lambda3);
        let y3 = lambda9
            .mul(&lambda6)
            .sub(&lambda8.mul(&lambda3_cu))
            .mul(&self.curve.inner.inverse_of_two);

        Point {
            curve: self.curve.clone(),
            coords: Some((x3, y3, z3)),
        }
    }

    /// `self - other`, i.e. `self + (-other)`.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.negate())
    }

    /// `2 * self`.
    #[must_use]
    pub fn double(&self) -> Self {
        let Some((x, y, z)) = &self.coords else {
            return self.clone();
        };
        if y.is_zero() {
            return self.curve.infinity();
        }
        let field = self.curve.inner.field.clone();
        let three = field.from_u64(3);
        let four = field.from_u64(4);
        let eight = field.from_u64(8);

        let x_sq = x.mul(x);
        let z_sq = z.mul(z);
        let z_4 = z_sq.mul(&z_sq);
        let lambda1 = three.mul(&x_sq).add(&self.curve.inner.a.mul(&z_4));

        let y_sq = y.mul(y);
        let lambda2 = four.mul(x).mul(&y_sq);
        let y_4 = y_sq.mul(&y_sq);
        let lambda3 = eight.mul(&y_4);

        let z3 = field.from_u64(2).mul(y).mul(z);
        let x3 = lambda1.mul(&lambda1).sub(&field.from_u64(2).mul(&lambda2));
        let y3 = lambda1.mul(&lambda2.sub(&x3)).sub(&lambda3);

        Point {
            curve: self.curve.clone(),
            coords: Some((x3, y3, z3)),
        }
    }

    fn projective_eq(&self, other: &Self) -> bool {
        match (&self.coords, &other.coords) {
            (None, None) => true,
            (None, Some(_)) | (Some(_), None) => false,
            (Some((x1, y1, z1)), Some((x2, y2, z2))) => x1 == x2 && y1 == y2 && z1 == z2,
        }
    }

    /// Precompute the odd-multiple table `T[i] = (2i+1) * self` for `i` in
    /// `0..2^(w-1)-1`, used to amortize repeated scalar multiplications of the same
    /// base point (e.g. ECDSA's base-point table).
    ///
    /// # Errors
    ///
    /// Returns [`EccError::InvalidArgument`] if `width` is outside `[2, 6]`.
    pub fn precompute_naf_points(&self, width: u32) -> EccResult<Vec<Point>> {
        if !(2..=6).contains(&width) {
            return Err(EccError::InvalidArgument);
        }
        let count = (1usize << (width - 1)) - 1;
        let twice_self = self.double();
        let mut table = Vec::with_capacity(count);
        if count > 0 {
            table.push(self.clone());
            for i in 1..count {
                table.push(table[i - 1].add(&twice_self));
            }
        }
        Ok(table)
    }

    /// `scalar * self`, left-to-right wNAF with a freshly precomputed odd-multiple
    /// table at a width chosen by [`choose_naf_width`].
    ///
    /// # Errors
    ///
    /// Propagates [`EccError::InvalidArgument`] from [`FieldElement::to_naf`] (this
    /// cannot actually happen for the internally chosen width, but the constructor
    /// used to build the table shares the same fallible signature).
    pub fn multiply(&self, scalar: &FieldElement) -> EccResult<Self> {
        let width = choose_naf_width(scalar.bit_length());
        let table = self.precompute_naf_points(width)?;
        self.multiply_with_table(scalar, width, &table)
    }

    /// `scalar * self` using a caller-supplied odd-multiple table built at `width`
    /// (e.g. via [`Point::precompute_naf_points`]), avoiding recomputation when the
    /// same base point is multiplied by many different scalars.
    ///
    /// # Errors
    ///
    /// Returns [`EccError::InvalidArgument`] if `width` is outside `[2, 6]` or the
    /// table doesn't have the `2^(w-1) - 1` entries that width requires.
    pub fn multiply_with_table(&self, scalar: &FieldElement, width: u32, table: &[Point]) -> EccResult<Self> {
        if !(2..=6).contains(&width) {
            return Err(EccError::InvalidArgument);
        }
        if table.len() != (1usize << (width - 1)) - 1 {
            return Err(EccError::InvalidArgument);
        }
        let naf = scalar.to_naf(width)?;
        let mut result = self.curve.infinity();
        for &digit in naf.iter().rev() {
            result = result.double();
            if digit > 0 {
                result = result.add(&table[(digit as usize - 1) / 2]);
            } else if digit < 0 {
                result = result.sub(&table[(-digit as usize - 1) / 2]);
            }
        }
        Ok(result)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.projective_eq(other)
    }
}
impl Eq for Point {}

impl core::fmt::Debug for Curve {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Curve {{ a: {:?}, b: {:?} }}", self.inner.a, self.inner.b)
    }
}

impl core::fmt::Debug for Point {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.coords {
            None => write!(f, "Point::Infinity"),
            Some((x, y, z)) => write!(f, "Point {{ X: {x:?}, Y: {y:?}, Z: {z:?} }}"),
        }
    }
}

/// Pick a wNAF width for a scalar of the given bit length, using the variable-time
/// heuristic from the design notes: start at `w = 2`, estimate the number of point
/// additions `(2^(w-2) - 1) + bit_size/(w+1)`, keep increasing `w` (up to 6) while the
/// estimate strictly improves, and back off one step when it stops improving.
#[must_use]
pub fn choose_naf_width(bit_size: usize) -> u32 {
    let estimate = |w: u32| -> f64 {
        let table_cost = (1u32 << (w.saturating_sub(2))).saturating_sub(1) as f64;
        table_cost + bit_size as f64 / f64::from(w + 1)
    };
    let mut w = 2u32;
    let mut best = estimate(w);
    while w < 6 {
        let next = estimate(w + 1);
        if next < best {
            best = next;
            w += 1;
        } else {
            break;
        }
    }
    w
}

#[cfg(test)]
mod tests {
    use super::*;

    const P79: &str = "62CE5177412ACA899CF5";

    fn curve_and_base() -> (Curve, Point) {
        let field = Field::from_hex(P79).unwrap();
        // Certicom ECCp-79 test curve parameters.
        let a = field.element_from_hex("6FEE9D4D2D1217D44FC3").unwrap();
        let b = field.element_from_hex("053DDCC4023A12C2A40A").unwrap();
        let curve = Curve::new(field, a, b).unwrap();
        let px = curve.field().element_from_hex("315D4B201C208475057D").unwrap();
        let py = curve.field().element_from_hex("035F3DF5AB370252450A").unwrap();
        let p = curve.point(px, py).unwrap();
        (curve, p)
    }

    #[test]
    fn adding_infinity_is_identity() {
        let (curve, p) = curve_and_base();
        assert_eq!(p.add(&curve.infinity()), p);
    }

    #[test]
    fn point_plus_its_negation_is_infinity() {
        let (curve, p) = curve_and_base();
        assert!(p.add(&p.negate()).is_infinity());
        let _ = curve;
    }

    #[test]
    fn addition_is_commutative() {
        let (curve, p) = curve_and_base();
        let q = p.double();
        let _ = curve;
        assert_eq!(p.add(&q), q.add(&p));
    }

    #[test]
    fn doubling_matches_self_addition() {
        let (_curve, p) = curve_and_base();
        assert_eq!(p.double(), p.add(&p));
    }

    #[test]
    fn scalar_multiply_is_consistent_with_repeated_addition() {
        let (curve, p) = curve_and_base();
        let n = curve.field().from_u64(5);
        let n_plus_1 = curve.field().from_u64(6);
        let np = curve.multiply(&n).unwrap();
        let np_plus_1 = curve.multiply(&n_plus_1).unwrap();
        assert_eq!(np_plus_1, np.add(&p));
    }

    #[test]
    fn doubling_then_negate_and_add_produces_infinity() {
        let (_curve, p) = curve_and_base();
        let doubled = p.double();
        let result = doubled.add(&doubled.negate());
        assert!(result.is_infinity());
    }

    #[test]
    fn width_two_and_width_six_scalar_multiply_agree() {
        let (curve, p) = curve_and_base();
        let table2 = p.precompute_naf_points(2).unwrap();
        let table6 = p.precompute_naf_points(6).unwrap();
        for n in [1u64, 2, 3, 17, 255, 65537] {
            let scalar = curve.field().from_u64(n);
            let via2 = p.multiply_with_table(&scalar, 2, &table2).unwrap();
            let via6 = p.multiply_with_table(&scalar, 6, &table6).unwrap();
            assert_eq!(via2.to_affine_x(), via6.to_affine_x());
            assert_eq!(via2.to_affine_y(), via6.to_affine_y());
        }
    }

    #[test]
    fn singular_curve_is_rejected() {
        let field = Field::from_hex(P79).unwrap();
        let zero = field.zero();
        assert!(matches!(Curve::new(field, zero.clone(), zero), Err(EccError::InvalidCurve)));
    }

    #[test]
    fn point_off_curve_is_rejected() {
        let (curve, _) = curve_and_base();
        let x = curve.field().from_u64(1);
        let y = curve.field().from_u64(2);
        assert_eq!(curve.point(x, y), Err(EccError::PointNotOnCurve));
    }

    #[test]
    fn naf_width_heuristic_stays_in_range() {
        for bits in [1, 8, 79, 131, 239, 359, 4096] {
            let w = choose_naf_width(bits);
            assert!((2..=6).contains(&w));
        }
    }
}
