//! SM3 hash function
//!
//! Implements the SM3 cryptographic hash function as specified in GB/T
//! 32905-2016: a Merkle–Damgård construction over 512-bit blocks with a
//! 256-bit chaining value.

use byteorder::{BigEndian, ByteOrder};
use zeroize::Zeroize;

use crate::error::Result;
use crate::hash::{HashAlgorithm, HashFunction};
use crate::types::Digest;

/// SM3 digest size in bytes
pub const SM3_OUTPUT_SIZE: usize = 32;
/// SM3 block size in bytes
pub const SM3_BLOCK_SIZE: usize = 64;

// Initial chaining value from the standard
const IV: [u32; 8] = [
    0x7380166f, 0x4914b2b9, 0x172442d7, 0xda8a0600, 0xa96f30bc, 0x163138aa, 0xe38dee4d, 0xb0fb0e4e,
];

// Round constants, rotated by the round index during compression
const T0: u32 = 0x79cc4519;
const T1: u32 = 0x7a879d8a;

/// Marker type for the SM3 algorithm
pub enum Sm3Algorithm {}

impl HashAlgorithm for Sm3Algorithm {
    const OUTPUT_SIZE: usize = SM3_OUTPUT_SIZE;
    const BLOCK_SIZE: usize = SM3_BLOCK_SIZE;
    const ALGORITHM_ID: &'static str = "SM3";
}

/// SM3 hash function state
#[derive(Clone, Zeroize)]
pub struct Sm3 {
    state: [u32; 8],
    buffer: [u8; SM3_BLOCK_SIZE],
    buffer_idx: usize,
    total_bytes: u64,
}

impl Drop for Sm3 {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[inline(always)]
fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

#[inline(always)]
fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

#[inline(always)]
fn ff(j: usize, x: u32, y: u32, z: u32) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (x & z) | (y & z)
    }
}

#[inline(always)]
fn gg(j: usize, x: u32, y: u32, z: u32) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (!x & z)
    }
}

impl Sm3 {
    fn init() -> Self {
        Sm3 {
            state: IV,
            buffer: [0u8; SM3_BLOCK_SIZE],
            buffer_idx: 0,
            total_bytes: 0,
        }
    }

    fn compress(state: &mut [u32; 8], block: &[u8; SM3_BLOCK_SIZE]) {
        // Message expansion: 68 words plus the 64 derived W' words
        let mut w = [0u32; 68];
        for (i, word) in w.iter_mut().take(16).enumerate() {
            *word = BigEndian::read_u32(&block[i * 4..]);
        }
        for i in 16..68 {
            w[i] = p1(w[i - 16] ^ w[i - 9] ^ w[i - 3].rotate_left(15))
                ^ w[i - 13].rotate_left(7)
                ^ w[i - 6];
        }

        let mut a = state[0];
        let mut b = state[1];
        let mut c = state[2];
        let mut d = state[3];
        let mut e = state[4];
        let mut f = state[5];
        let mut g = state[6];
        let mut h = state[7];

        for j in 0..64 {
            let t = if j < 16 { T0 } else { T1 };
            let ss1 = a
                .rotate_left(12)
                .wrapping_add(e)
                .wrapping_add(t.rotate_left((j % 32) as u32))
                .rotate_left(7);
            let ss2 = ss1 ^ a.rotate_left(12);
            let wj = w[j];
            let wj_prime = w[j] ^ w[j + 4];
            let tt1 = ff(j, a, b, c)
                .wrapping_add(d)
                .wrapping_add(ss2)
                .wrapping_add(wj_prime);
            let tt2 = gg(j, e, f, g)
                .wrapping_add(h)
                .wrapping_add(ss1)
                .wrapping_add(wj);

            d = c;
            c = b.rotate_left(9);
            b = a;
            a = tt1;
            h = g;
            g = f.rotate_left(19);
            f = e;
            e = p0(tt2);
        }

        state[0] ^= a;
        state[1] ^= b;
        state[2] ^= c;
        state[3] ^= d;
        state[4] ^= e;
        state[5] ^= f;
        state[6] ^= g;
        state[7] ^= h;

        w.zeroize();
    }

    fn update_internal(&mut self, mut input: &[u8]) {
        while !input.is_empty() {
            let fill = core::cmp::min(input.len(), SM3_BLOCK_SIZE - self.buffer_idx);
            self.buffer[self.buffer_idx..self.buffer_idx + fill].copy_from_slice(&input[..fill]);
            self.buffer_idx += fill;
            self.total_bytes += fill as u64;
            input = &input[fill..];
            if self.buffer_idx == SM3_BLOCK_SIZE {
                let mut block = [0u8; SM3_BLOCK_SIZE];
                block.copy_from_slice(&self.buffer);
                Self::compress(&mut self.state, &block);
                self.buffer_idx = 0;
                block.zeroize();
            }
        }
    }

    // Padding and final compression on a copy of the running state, so the
    // streaming state itself is left untouched.
    fn digest_pending(&self) -> Digest<SM3_OUTPUT_SIZE> {
        let mut state = self.state;
        let mut buffer = self.buffer;
        let idx = self.buffer_idx;
        let bit_len = self.total_bytes * 8;

        buffer[idx] = 0x80;
        if idx >= 56 {
            for b in &mut buffer[idx + 1..] {
                *b = 0;
            }
            Self::compress(&mut state, &buffer);
            buffer = [0u8; SM3_BLOCK_SIZE];
        } else {
            for b in &mut buffer[idx + 1..56] {
                *b = 0;
            }
        }
        BigEndian::write_u64(&mut buffer[56..], bit_len);
        Self::compress(&mut state, &buffer);

        let mut out = [0u8; SM3_OUTPUT_SIZE];
        for (i, &word) in state.iter().enumerate() {
            BigEndian::write_u32(&mut out[i * 4..], word);
        }
        state.zeroize();
        buffer.zeroize();
        Digest::new(out)
    }

    /// Digest of everything absorbed so far, without consuming the state
    ///
    /// Further `update` calls continue the same message; interleaved
    /// `value`/`update` calls each observe the correct running digest.
    pub fn value(&self) -> Digest<SM3_OUTPUT_SIZE> {
        self.digest_pending()
    }

    /// Reset the state for a new message
    pub fn reset(&mut self) {
        self.buffer.zeroize();
        *self = Self::init();
    }
}

impl HashFunction for Sm3 {
    type Algorithm = Sm3Algorithm;
    type Output = Digest<SM3_OUTPUT_SIZE>;

    fn new() -> Self {
        Self::init()
    }

    fn update(&mut self, data: &[u8]) -> Result<&mut Self> {
        self.update_internal(data);
        Ok(self)
    }

    fn finalize(&mut self) -> Result<Self::Output> {
        let digest = self.digest_pending();
        self.reset();
        Ok(digest)
    }
}

#[cfg(test)]
mod tests;
