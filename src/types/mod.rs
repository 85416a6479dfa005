//! Common value types shared across the primitives

mod digest;

pub use digest::Digest;
