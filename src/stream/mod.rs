//! Stream cipher implementations
//!
//! Stream ciphers here are keystream generators: a (key, IV) pair fixes an
//! irreversible sequence of keystream words, and encryption is XOR against
//! that sequence. Reusing a (key, IV) pair across two independent messages
//! breaks the security of the cipher.

use crate::error::Result;

pub mod zuc;

pub use zuc::Zuc;

/// Common trait for stream cipher implementations
pub trait StreamCipher {
    /// The key size in bytes
    const KEY_SIZE: usize;

    /// The IV size in bytes
    const IV_SIZE: usize;

    /// The keystream word size in bytes
    const WORD_SIZE: usize;

    /// Process data in place (encryption and decryption are the same XOR)
    fn process(&mut self, data: &mut [u8]) -> Result<()>;

    /// Encrypt data in place
    fn encrypt(&mut self, data: &mut [u8]) -> Result<()> {
        self.process(data)
    }

    /// Decrypt data in place
    fn decrypt(&mut self, data: &mut [u8]) -> Result<()> {
        self.process(data)
    }

    /// Fill an output buffer with raw keystream
    fn keystream(&mut self, output: &mut [u8]) -> Result<()>;

    /// Rewind to the start of the keystream for the same (key, IV) pair
    fn reset(&mut self) -> Result<()>;
}
