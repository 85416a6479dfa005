//! Elliptic-curve layer: fixed-width field arithmetic, curve parameters
//! and affine point arithmetic

mod curve;
mod field;

pub use curve::{CurveParams, Point, FIELD_BYTES};
pub use field::{U256, U256_BYTES};

#[cfg(test)]
mod tests;
