//! Short-Weierstrass curve parameters and affine point arithmetic

use zeroize::Zeroize;

use super::field::{U256, U256_BYTES};
use crate::error::{Error, Result};

/// Byte width of one field element
pub const FIELD_BYTES: usize = U256_BYTES;

/// Parameters of a short-Weierstrass curve `y² = x³ + ax + b` over `F_p`
///
/// Immutable once constructed; one instance is shared by every operation
/// referencing the curve.
#[derive(Clone, Debug)]
pub struct CurveParams {
    /// Field prime
    pub p: U256,
    /// Curve coefficient a
    pub a: U256,
    /// Curve coefficient b
    pub b: U256,
    /// Order of the base point
    pub n: U256,
    /// Base point x coordinate
    pub gx: U256,
    /// Base point y coordinate
    pub gy: U256,
}

/// An affine curve point, or the point at infinity
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct Point {
    x: U256,
    y: U256,
    infinity: bool,
}

impl Point {
    /// The point at infinity (group identity)
    pub fn identity() -> Self {
        Point {
            x: U256::ZERO,
            y: U256::ZERO,
            infinity: true,
        }
    }

    /// An affine point from its coordinates
    ///
    /// Membership of the curve is not checked here; use
    /// [`CurveParams::validate_point`] before trusting external input.
    pub fn new(x: U256, y: U256) -> Self {
        Point {
            x,
            y,
            infinity: false,
        }
    }

    /// True for the point at infinity
    pub fn is_identity(&self) -> bool {
        self.infinity
    }

    /// x coordinate; zero for the point at infinity
    pub fn x(&self) -> &U256 {
        &self.x
    }

    /// y coordinate; zero for the point at infinity
    pub fn y(&self) -> &U256 {
        &self.y
    }

    /// Fixed-width big-endian `x ‖ y` encoding (64 bytes)
    pub fn to_bytes(&self) -> [u8; 2 * FIELD_BYTES] {
        let mut out = [0u8; 2 * FIELD_BYTES];
        out[..FIELD_BYTES].copy_from_slice(&self.x.to_be_bytes());
        out[FIELD_BYTES..].copy_from_slice(&self.y.to_be_bytes());
        out
    }

    /// Parse a fixed-width big-endian `x ‖ y` encoding
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 2 * FIELD_BYTES {
            return Err(Error::Length {
                context: "curve point",
                expected: 2 * FIELD_BYTES,
                actual: bytes.len(),
            });
        }
        Ok(Point::new(
            U256::from_be_bytes(&bytes[..FIELD_BYTES])?,
            U256::from_be_bytes(&bytes[FIELD_BYTES..])?,
        ))
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        if self.infinity || other.infinity {
            return self.infinity == other.infinity;
        }
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Point {}

impl CurveParams {
    /// The base point G
    pub fn generator(&self) -> Point {
        Point::new(self.gx, self.gy)
    }

    /// Check the curve equation for an affine point
    pub fn is_on_curve(&self, point: &Point) -> bool {
        if point.infinity {
            return false;
        }
        if point.x >= self.p || point.y >= self.p {
            return false;
        }
        let y2 = point.y.mod_mul(&point.y, &self.p);
        let x2 = point.x.mod_mul(&point.x, &self.p);
        let x3 = x2.mod_mul(&point.x, &self.p);
        let rhs = x3
            .mod_add(&self.a.mod_mul(&point.x, &self.p), &self.p)
            .mod_add(&self.b, &self.p);
        y2 == rhs
    }

    /// Validate an externally supplied public point
    ///
    /// Rejects the point at infinity and anything off the curve. This is a
    /// hard configuration error, distinct from arithmetic failures.
    pub fn validate_point(&self, point: &Point) -> Result<()> {
        if point.infinity {
            return Err(Error::Point {
                reason: "point at infinity",
            });
        }
        if !self.is_on_curve(point) {
            return Err(Error::Point {
                reason: "not on curve",
            });
        }
        Ok(())
    }

    /// Point doubling
    pub fn double(&self, point: &Point) -> Result<Point> {
        if point.infinity {
            return Ok(Point::identity());
        }
        if point.y.is_zero() {
            // The tangent is vertical
            return Ok(Point::identity());
        }
        let p = &self.p;

        // lambda = (3x² + a) / 2y
        let x2 = point.x.mod_mul(&point.x, p);
        let num = x2
            .mod_add(&x2, p)
            .mod_add(&x2, p)
            .mod_add(&self.a, p);
        let den = point.y.mod_add(&point.y, p).mod_inv(p)?;
        let lambda = num.mod_mul(&den, p);

        let two_x = point.x.mod_add(&point.x, p);
        let x3 = lambda.mod_mul(&lambda, p).mod_sub(&two_x, p);
        let y3 = lambda
            .mod_mul(&point.x.mod_sub(&x3, p), p)
            .mod_sub(&point.y, p);
        Ok(Point::new(x3, y3))
    }

    /// Point addition with the affine special cases
    pub fn add(&self, lhs: &Point, rhs: &Point) -> Result<Point> {
        if lhs.infinity {
            return Ok(*rhs);
        }
        if rhs.infinity {
            return Ok(*lhs);
        }
        let p = &self.p;

        if lhs.x == rhs.x {
            if lhs.y == rhs.y {
                return self.double(lhs);
            }
            // rhs is the negation of lhs
            return Ok(Point::identity());
        }

        // lambda = (y2 - y1) / (x2 - x1)
        let num = rhs.y.mod_sub(&lhs.y, p);
        let den = rhs.x.mod_sub(&lhs.x, p).mod_inv(p)?;
        let lambda = num.mod_mul(&den, p);

        let x3 = lambda
            .mod_mul(&lambda, p)
            .mod_sub(&lhs.x, p)
            .mod_sub(&rhs.x, p);
        let y3 = lambda
            .mod_mul(&lhs.x.mod_sub(&x3, p), p)
            .mod_sub(&lhs.y, p);
        Ok(Point::new(x3, y3))
    }

    /// Scalar multiplication by MSB-first double-and-add
    ///
    /// The scalar is used as supplied; callers are responsible for any
    /// reduction modulo `n`. Multiplying by zero yields the identity.
    pub fn scalar_mul(&self, k: &U256, point: &Point) -> Result<Point> {
        let mut acc = Point::identity();
        for i in (0..k.bit_length()).rev() {
            acc = self.double(&acc)?;
            if k.bit(i) {
                acc = self.add(&acc, point)?;
            }
        }
        Ok(acc)
    }
}
