//! ZUC stream cipher
//!
//! Implements the ZUC keystream generator as specified in GM/T 0001-2012:
//! a 16-cell LFSR over GF(2^31 - 1) filtered by a nonlinear function with
//! two 32-bit memory registers. Each work-phase step emits one 32-bit
//! keystream word.

use byteorder::{BigEndian, ByteOrder};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::StreamCipher;
use crate::error::{validate, Result};

/// ZUC key size in bytes
pub const ZUC_KEY_SIZE: usize = 16;
/// ZUC IV size in bytes
pub const ZUC_IV_SIZE: usize = 16;
/// Size of one keystream word in bytes
pub const ZUC_WORD_SIZE: usize = 4;

const LFSR_CELLS: usize = 16;

// 2^31 - 1, the LFSR cell modulus
const P31: u32 = 0x7FFF_FFFF;

// Key-loading constants interleaved between key and IV bytes
const D: [u32; 16] = [
    0x44D7, 0x26BC, 0x626B, 0x135E, 0x5789, 0x35E2, 0x7135, 0x09AF,
    0x4D78, 0x2F13, 0x6BC4, 0x1AF1, 0x5E26, 0x3C4D, 0x789A, 0x47AC,
];

const S0: [u8; 256] = [
    0x3E, 0x72, 0x5B, 0x47, 0xCA, 0xE0, 0x00, 0x33, 0x04, 0xD1, 0x54, 0x98, 0x09, 0xB9, 0x6D, 0xCB,
    0x7B, 0x1B, 0xF9, 0x32, 0xAF, 0x9D, 0x6A, 0xA5, 0xB8, 0x2D, 0xFC, 0x1D, 0x08, 0x53, 0x03, 0x90,
    0x4D, 0x4E, 0x84, 0x99, 0xE4, 0xCE, 0xD9, 0x91, 0xDD, 0xB6, 0x85, 0x48, 0x8B, 0x29, 0x6E, 0xAC,
    0xCD, 0xC1, 0xF8, 0x1E, 0x73, 0x43, 0x69, 0xC6, 0xB5, 0xBD, 0xFD, 0x39, 0x63, 0x20, 0xD4, 0x38,
    0x76, 0x7D, 0xB2, 0xA7, 0xCF, 0xED, 0x57, 0xC5, 0xF3, 0x2C, 0xBB, 0x14, 0x21, 0x06, 0x55, 0x9B,
    0xE3, 0xEF, 0x5E, 0x31, 0x4F, 0x7F, 0x5A, 0xA4, 0x0D, 0x82, 0x51, 0x49, 0x5F, 0xBA, 0x58, 0x1C,
    0x4A, 0x16, 0xD5, 0x17, 0xA8, 0x92, 0x24, 0x1F, 0x8C, 0xFF, 0xD8, 0xAE, 0x2E, 0x01, 0xD3, 0xAD,
    0x3B, 0x4B, 0xDA, 0x46, 0xEB, 0xC9, 0xDE, 0x9A, 0x8F, 0x87, 0xD7, 0x3A, 0x80, 0x6F, 0x2F, 0xC8,
    0xB1, 0xB4, 0x37, 0xF7, 0x0A, 0x22, 0x13, 0x28, 0x7C, 0xCC, 0x3C, 0x89, 0xC7, 0xC3, 0x96, 0x56,
    0x07, 0xBF, 0x7E, 0xF0, 0x0B, 0x2B, 0x97, 0x52, 0x35, 0x41, 0x79, 0x61, 0xA6, 0x4C, 0x10, 0xFE,
    0xBC, 0x26, 0x95, 0x88, 0x8A, 0xB0, 0xA3, 0xFB, 0xC0, 0x18, 0x94, 0xF2, 0xE1, 0xE5, 0xE9, 0x5D,
    0xD0, 0xDC, 0x11, 0x66, 0x64, 0x5C, 0xEC, 0x59, 0x42, 0x75, 0x12, 0xF5, 0x74, 0x9C, 0xAA, 0x23,
    0x0E, 0x86, 0xAB, 0xBE, 0x2A, 0x02, 0xE7, 0x67, 0xE6, 0x44, 0xA2, 0x6C, 0xC2, 0x93, 0x9F, 0xF1,
    0xF6, 0xFA, 0x36, 0xD2, 0x50, 0x68, 0x9E, 0x62, 0x71, 0x15, 0x3D, 0xD6, 0x40, 0xC4, 0xE2, 0x0F,
    0x8E, 0x83, 0x77, 0x6B, 0x25, 0x05, 0x3F, 0x0C, 0x30, 0xEA, 0x70, 0xB7, 0xA1, 0xE8, 0xA9, 0x65,
    0x8D, 0x27, 0x1A, 0xDB, 0x81, 0xB3, 0xA0, 0xF4, 0x45, 0x7A, 0x19, 0xDF, 0xEE, 0x78, 0x34, 0x60,
];

const S1: [u8; 256] = [
    0x55, 0xC2, 0x63, 0x71, 0x3B, 0xC8, 0x47, 0x86, 0x9F, 0x3C, 0xDA, 0x5B, 0x29, 0xAA, 0xFD, 0x77,
    0x8C, 0xC5, 0x94, 0x0C, 0xA6, 0x1A, 0x13, 0x00, 0xE3, 0xA8, 0x16, 0x72, 0x40, 0xF9, 0xF8, 0x42,
    0x44, 0x26, 0x68, 0x96, 0x81, 0xD9, 0x45, 0x3E, 0x10, 0x76, 0xC6, 0xA7, 0x8B, 0x39, 0x43, 0xE1,
    0x3A, 0xB5, 0x56, 0x2A, 0xC0, 0x6D, 0xB3, 0x05, 0x22, 0x66, 0xBF, 0xDC, 0x0B, 0xFA, 0x62, 0x48,
    0xDD, 0x20, 0x11, 0x06, 0x36, 0xC9, 0xC1, 0xCF, 0xF6, 0x27, 0x52, 0xBB, 0x69, 0xF5, 0xD4, 0x87,
    0x7F, 0x84, 0x4C, 0xD2, 0x9C, 0x57, 0xA4, 0xBC, 0x4F, 0x9A, 0xDF, 0xFE, 0xD6, 0x8D, 0x7A, 0xEB,
    0x2B, 0x53, 0xD8, 0x5C, 0xA1, 0x14, 0x17, 0xFB, 0x23, 0xD5, 0x7D, 0x30, 0x67, 0x73, 0x08, 0x09,
    0xEE, 0xB7, 0x70, 0x3F, 0x61, 0xB2, 0x19, 0x8E, 0x4E, 0xE5, 0x4B, 0x93, 0x8F, 0x5D, 0xDB, 0xA9,
    0xAD, 0xF1, 0xAE, 0x2E, 0xCB, 0x0D, 0xFC, 0xF4, 0x2D, 0x46, 0x6E, 0x1D, 0x97, 0xE8, 0xD1, 0xE9,
    0x4D, 0x37, 0xA5, 0x75, 0x5E, 0x83, 0x9E, 0xAB, 0x82, 0x9D, 0xB9, 0x1C, 0xE0, 0xCD, 0x49, 0x89,
    0x01, 0xB6, 0xBD, 0x58, 0x24, 0xA2, 0x5F, 0x38, 0x78, 0x99, 0x15, 0x90, 0x50, 0xB8, 0x95, 0xE4,
    0xD0, 0x91, 0xC7, 0xCE, 0xED, 0x0F, 0xB4, 0x6F, 0xA0, 0xCC, 0xF0, 0x02, 0x4A, 0x79, 0xC3, 0xDE,
    0xA3, 0xEF, 0xEA, 0x51, 0xE6, 0x6B, 0x18, 0xEC, 0x1B, 0x2C, 0x80, 0xF7, 0x74, 0xE7, 0xFF, 0x21,
    0x5A, 0x6A, 0x54, 0x1E, 0x41, 0x31, 0x92, 0x35, 0xC4, 0x33, 0x07, 0x0A, 0xBA, 0x7E, 0x0E, 0x34,
    0x88, 0xB1, 0x98, 0x7C, 0xF3, 0x3D, 0x60, 0x6C, 0x7B, 0xCA, 0xD3, 0x1F, 0x32, 0x65, 0x04, 0x28,
    0x64, 0xBE, 0x85, 0x9B, 0x2F, 0x59, 0x8A, 0xD7, 0xB0, 0x25, 0xAC, 0xAF, 0x12, 0x03, 0xE2, 0xF2,
];

/// Addition modulo 2^31 - 1 with carry folding
#[inline(always)]
fn add31(a: u32, b: u32) -> u32 {
    let sum = a.wrapping_add(b);
    (sum & P31) + (sum >> 31)
}

/// Left rotation of a 31-bit value
#[inline(always)]
fn rot31(x: u32, n: u32) -> u32 {
    ((x << n) | (x >> (31 - n))) & P31
}

/// Linear transform L1 used for the R1 update
#[inline(always)]
fn l1(x: u32) -> u32 {
    x ^ x.rotate_left(2) ^ x.rotate_left(10) ^ x.rotate_left(18) ^ x.rotate_left(24)
}

/// Linear transform L2 used for the R2 update
#[inline(always)]
fn l2(x: u32) -> u32 {
    x ^ x.rotate_left(8) ^ x.rotate_left(14) ^ x.rotate_left(22) ^ x.rotate_left(30)
}

/// Byte-wise S-box layer: S0 on even byte positions, S1 on odd
#[inline(always)]
fn sbox(x: u32) -> u32 {
    let b = x.to_be_bytes();
    u32::from_be_bytes([
        S0[b[0] as usize],
        S1[b[1] as usize],
        S0[b[2] as usize],
        S1[b[3] as usize],
    ])
}

/// ZUC keystream generator state
///
/// Created per (key, IV) pair. Every `generate` call consumes state
/// irreversibly; `reset` rewinds to the start of the same keystream.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Zuc {
    lfsr: [u32; LFSR_CELLS],
    r1: u32,
    r2: u32,
    // Retained for reset
    key: [u8; ZUC_KEY_SIZE],
    iv: [u8; ZUC_IV_SIZE],
}

impl core::fmt::Debug for Zuc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Zuc([REDACTED])")
    }
}

impl Zuc {
    /// Initialize from a 128-bit key and 128-bit IV
    ///
    /// Loads the LFSR, runs the 32 warm-up rounds and discards the first
    /// work-phase output, leaving the state ready to emit keystream.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self> {
        validate::length("ZUC key", key.len(), ZUC_KEY_SIZE)?;
        validate::length("ZUC IV", iv.len(), ZUC_IV_SIZE)?;

        let mut key_arr = [0u8; ZUC_KEY_SIZE];
        key_arr.copy_from_slice(key);
        let mut iv_arr = [0u8; ZUC_IV_SIZE];
        iv_arr.copy_from_slice(iv);

        let mut zuc = Zuc {
            lfsr: [0u32; LFSR_CELLS],
            r1: 0,
            r2: 0,
            key: key_arr,
            iv: iv_arr,
        };
        zuc.init();
        Ok(zuc)
    }

    fn init(&mut self) {
        // Cell layout: key byte (8) | D constant (15) | IV byte (8)
        for i in 0..LFSR_CELLS {
            self.lfsr[i] = ((self.key[i] as u32) << 23) | (D[i] << 8) | (self.iv[i] as u32);
        }
        self.r1 = 0;
        self.r2 = 0;

        for _ in 0..32 {
            let (x0, x1, x2, _) = self.bit_reorganize();
            let w = self.f(x0, x1, x2);
            self.lfsr_step(Some(w >> 1));
        }

        // One more step whose F output is discarded
        let (x0, x1, x2, _) = self.bit_reorganize();
        self.f(x0, x1, x2);
        self.lfsr_step(None);
    }

    /// Extract the four 32-bit reorganization words from the LFSR
    fn bit_reorganize(&self) -> (u32, u32, u32, u32) {
        let s = &self.lfsr;
        let x0 = ((s[15] >> 15) << 16) | (s[14] & 0xFFFF);
        let x1 = ((s[11] & 0xFFFF) << 16) | (s[9] >> 15);
        let x2 = ((s[7] & 0xFFFF) << 16) | (s[5] >> 15);
        let x3 = ((s[2] & 0xFFFF) << 16) | (s[0] >> 15);
        (x0, x1, x2, x3)
    }

    /// Nonlinear function F; updates R1/R2 and returns W
    fn f(&mut self, x0: u32, x1: u32, x2: u32) -> u32 {
        let w = (x0 ^ self.r1).wrapping_add(self.r2);
        let w1 = self.r1.wrapping_add(x1);
        let w2 = self.r2 ^ x2;
        let u = l1((w1 << 16) | (w2 >> 16));
        let v = l2((w2 << 16) | (w1 >> 16));
        self.r1 = sbox(u);
        self.r2 = sbox(v);
        w
    }

    /// Advance the LFSR one step; `extra` carries the halved F output
    /// during initialization
    fn lfsr_step(&mut self, extra: Option<u32>) {
        let s = &self.lfsr;
        let mut f = s[0];
        f = add31(f, rot31(s[0], 8));
        f = add31(f, rot31(s[4], 20));
        f = add31(f, rot31(s[10], 21));
        f = add31(f, rot31(s[13], 17));
        f = add31(f, rot31(s[15], 15));
        if let Some(u) = extra {
            f = add31(f, u);
        }
        // Zero is not an element of the multiplicative field
        if f == 0 {
            f = P31;
        }
        for i in 0..LFSR_CELLS - 1 {
            self.lfsr[i] = self.lfsr[i + 1];
        }
        self.lfsr[LFSR_CELLS - 1] = f;
    }

    /// Produce the next raw 32-bit keystream word
    pub fn next_u32(&mut self) -> u32 {
        let (x0, x1, x2, x3) = self.bit_reorganize();
        let z = self.f(x0, x1, x2) ^ x3;
        self.lfsr_step(None);
        z
    }

    /// Produce the next keystream word as 4 big-endian bytes
    pub fn generate(&mut self) -> [u8; ZUC_WORD_SIZE] {
        let mut out = [0u8; ZUC_WORD_SIZE];
        BigEndian::write_u32(&mut out, self.next_u32());
        out
    }
}

impl StreamCipher for Zuc {
    const KEY_SIZE: usize = ZUC_KEY_SIZE;
    const IV_SIZE: usize = ZUC_IV_SIZE;
    const WORD_SIZE: usize = ZUC_WORD_SIZE;

    fn process(&mut self, data: &mut [u8]) -> Result<()> {
        for chunk in data.chunks_mut(ZUC_WORD_SIZE) {
            let word = self.generate();
            for (b, k) in chunk.iter_mut().zip(word.iter()) {
                *b ^= k;
            }
        }
        Ok(())
    }

    fn keystream(&mut self, output: &mut [u8]) -> Result<()> {
        for chunk in output.chunks_mut(ZUC_WORD_SIZE) {
            let word = self.generate();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.init();
        Ok(())
    }
}
