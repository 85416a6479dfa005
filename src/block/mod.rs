//! Block cipher implementations

use crate::error::Result;

pub mod sm4;

pub use sm4::Sm4;

/// Type-level constants describing a block cipher
pub trait CipherAlgorithm {
    /// Key size in bytes
    const KEY_SIZE: usize;

    /// Block size in bytes
    const BLOCK_SIZE: usize;

    /// Human-readable algorithm name
    fn name() -> &'static str;
}

/// Common interface for raw single-block operation
///
/// Implementations transform exactly one block in place and reject any
/// other buffer length before touching the data.
pub trait BlockCipher: CipherAlgorithm {
    /// Encrypt a single block in place
    fn encrypt_block(&self, block: &mut [u8]) -> Result<()>;

    /// Decrypt a single block in place
    fn decrypt_block(&self, block: &mut [u8]) -> Result<()>;
}
