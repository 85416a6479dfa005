//! Hash function implementations
//!
//! Provides the streaming hash traits shared by all digest algorithms in
//! this crate, together with the SM3 hash function.

use crate::error::Result;

pub mod sm3;

pub use sm3::Sm3;

/// Type-level constants describing a hash algorithm
pub trait HashAlgorithm {
    /// Digest size in bytes
    const OUTPUT_SIZE: usize;

    /// Internal block size in bytes
    const BLOCK_SIZE: usize;

    /// Human-readable algorithm identifier
    const ALGORITHM_ID: &'static str;
}

/// Common interface for streaming hash functions
pub trait HashFunction: Sized {
    /// Marker type carrying the algorithm constants
    type Algorithm: HashAlgorithm;

    /// The digest type produced by `finalize`
    type Output: AsRef<[u8]>;

    /// Create a fresh hash state
    fn new() -> Self;

    /// Absorb input; calls may be split at any byte boundary
    fn update(&mut self, data: &[u8]) -> Result<&mut Self>;

    /// Consume the state and produce the digest
    fn finalize(&mut self) -> Result<Self::Output>;

    /// One-shot digest of a byte buffer
    fn digest(data: &[u8]) -> Result<Self::Output> {
        let mut hasher = Self::new();
        hasher.update(data)?;
        hasher.finalize()
    }

    /// Digest size in bytes
    fn output_size() -> usize {
        Self::Algorithm::OUTPUT_SIZE
    }

    /// Internal block size in bytes
    fn block_size() -> usize {
        Self::Algorithm::BLOCK_SIZE
    }

    /// Algorithm name
    fn name() -> &'static str {
        Self::Algorithm::ALGORITHM_ID
    }
}
