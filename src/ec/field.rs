//! Fixed-width 256-bit integer arithmetic with explicit moduli
//!
//! Curve coordinates reduce modulo the field prime `p` while signature
//! scalars reduce modulo the group order `n`, so every modular operation
//! here takes its modulus as an argument rather than fixing one per type.

use byteorder::{BigEndian, ByteOrder};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{validate, Error, Result};

/// Byte width of a serialized [`U256`]
pub const U256_BYTES: usize = 32;

/// An unsigned 256-bit integer stored as four little-endian u64 limbs
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct U256([u64; 4]);

impl U256 {
    /// The value 0
    pub const ZERO: U256 = U256([0, 0, 0, 0]);
    /// The value 1
    pub const ONE: U256 = U256([1, 0, 0, 0]);

    /// Construct from little-endian u64 limbs
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        U256(limbs)
    }

    /// Construct from a small integer
    pub const fn from_u64(value: u64) -> Self {
        U256([value, 0, 0, 0])
    }

    /// Parse a fixed-width big-endian byte string
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self> {
        validate::length("U256", bytes.len(), U256_BYTES)?;
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = BigEndian::read_u64(&bytes[(3 - i) * 8..]);
        }
        Ok(U256(limbs))
    }

    /// Serialize as a fixed-width big-endian byte string
    pub fn to_be_bytes(self) -> [u8; U256_BYTES] {
        let mut out = [0u8; U256_BYTES];
        for (i, &limb) in self.0.iter().enumerate() {
            BigEndian::write_u64(&mut out[(3 - i) * 8..(4 - i) * 8], limb);
        }
        out
    }

    /// Parse a big-endian hex string of at most 64 digits
    pub fn from_be_hex(hex_str: &str) -> Result<Self> {
        if hex_str.len() > 2 * U256_BYTES {
            return Err(Error::param("hex_str", "more than 64 hex digits"));
        }
        let mut padded = [b'0'; 2 * U256_BYTES];
        padded[2 * U256_BYTES - hex_str.len()..].copy_from_slice(hex_str.as_bytes());
        let mut bytes = [0u8; U256_BYTES];
        hex::decode_to_slice(padded, &mut bytes)
            .map_err(|_| Error::param("hex_str", "Invalid hexadecimal string"))?;
        Self::from_be_bytes(&bytes)
    }

    /// True if the value is 0
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&l| l == 0)
    }

    /// Value of bit `i` (little-endian bit numbering)
    pub fn bit(&self, i: usize) -> bool {
        debug_assert!(i < 256);
        (self.0[i / 64] >> (i % 64)) & 1 == 1
    }

    /// Index one past the most significant set bit; 0 for the value 0
    pub fn bit_length(&self) -> usize {
        for i in (0..4).rev() {
            if self.0[i] != 0 {
                return i * 64 + (64 - self.0[i].leading_zeros() as usize);
            }
        }
        0
    }

    /// Plain 256-bit addition, returning the result and the carry-out
    pub fn overflowing_add(&self, other: &Self) -> (Self, bool) {
        let mut out = [0u64; 4];
        let mut carry = 0u64;
        for i in 0..4 {
            let (sum, c1) = self.0[i].overflowing_add(other.0[i]);
            let (sum, c2) = sum.overflowing_add(carry);
            out[i] = sum;
            carry = (c1 as u64) + (c2 as u64);
        }
        (U256(out), carry != 0)
    }

    /// Plain 256-bit subtraction, returning the result and the borrow-out
    pub fn overflowing_sub(&self, other: &Self) -> (Self, bool) {
        let mut out = [0u64; 4];
        let mut borrow = 0u64;
        for i in 0..4 {
            let (diff, b1) = self.0[i].overflowing_sub(other.0[i]);
            let (diff, b2) = diff.overflowing_sub(borrow);
            out[i] = diff;
            borrow = (b1 as u64) + (b2 as u64);
        }
        (U256(out), borrow != 0)
    }

    /// Schoolbook 256×256 → 512-bit multiplication
    fn mul_wide(&self, other: &Self) -> [u64; 8] {
        let mut out = [0u64; 8];
        for i in 0..4 {
            let mut carry = 0u128;
            for j in 0..4 {
                let acc = out[i + j] as u128 + self.0[i] as u128 * other.0[j] as u128 + carry;
                out[i + j] = acc as u64;
                carry = acc >> 64;
            }
            out[i + 4] = carry as u64;
        }
        out
    }

    /// Reduce a 512-bit value by binary long division
    fn reduce_wide(wide: [u64; 8], modulus: &Self) -> Self {
        debug_assert!(!modulus.is_zero());
        let mut rem = U256::ZERO;
        for i in (0..512).rev() {
            // rem = rem * 2 + bit(i), tracking the 257th bit
            let carry = rem.bit(255);
            let mut shifted = [0u64; 4];
            for j in (1..4).rev() {
                shifted[j] = (rem.0[j] << 1) | (rem.0[j - 1] >> 63);
            }
            shifted[0] = rem.0[0] << 1;
            if (wide[i / 64] >> (i % 64)) & 1 == 1 {
                shifted[0] |= 1;
            }
            rem = U256(shifted);
            if carry || rem >= *modulus {
                // With the 257th bit set the wrap-around is exactly 2^256
                let (diff, _) = rem.overflowing_sub(modulus);
                rem = diff;
            }
        }
        rem
    }

    /// Canonical representative of self modulo `m`
    pub fn reduce(&self, m: &Self) -> Self {
        let mut wide = [0u64; 8];
        wide[..4].copy_from_slice(&self.0);
        Self::reduce_wide(wide, m)
    }

    /// Modular addition; operands must already be canonical in `[0, m-1]`
    pub fn mod_add(&self, other: &Self, m: &Self) -> Self {
        let (sum, carry) = self.overflowing_add(other);
        if carry || sum >= *m {
            let (diff, _) = sum.overflowing_sub(m);
            diff
        } else {
            sum
        }
    }

    /// Modular subtraction; operands must already be canonical in `[0, m-1]`
    pub fn mod_sub(&self, other: &Self, m: &Self) -> Self {
        let (diff, borrow) = self.overflowing_sub(other);
        if borrow {
            let (wrapped, _) = diff.overflowing_add(m);
            wrapped
        } else {
            diff
        }
    }

    /// Modular multiplication
    pub fn mod_mul(&self, other: &Self, m: &Self) -> Self {
        Self::reduce_wide(self.mul_wide(other), m)
    }

    /// Modular exponentiation, MSB-first square-and-multiply
    pub fn mod_pow(&self, exp: &Self, m: &Self) -> Self {
        let base = self.reduce(m);
        let mut acc = U256::ONE.reduce(m);
        for i in (0..exp.bit_length()).rev() {
            acc = acc.mod_mul(&acc, m);
            if exp.bit(i) {
                acc = acc.mod_mul(&base, m);
            }
        }
        acc
    }

    /// Modular inverse by Fermat's little theorem; `m` must be prime
    ///
    /// Zero has no inverse and is rejected.
    pub fn mod_inv(&self, m: &Self) -> Result<Self> {
        if self.reduce(m).is_zero() {
            return Err(Error::param("U256", "zero has no modular inverse"));
        }
        let (exp, _) = m.overflowing_sub(&U256::from_u64(2));
        Ok(self.mod_pow(&exp, m))
    }

    /// Constant-time equality
    pub fn ct_eq(&self, other: &Self) -> bool {
        let mut eq = subtle::Choice::from(1u8);
        for i in 0..4 {
            eq &= self.0[i].ct_eq(&other.0[i]);
        }
        eq.into()
    }
}

impl PartialEq for U256 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl Eq for U256 {}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        for i in (0..4).rev() {
            match self.0[i].cmp(&other.0[i]) {
                core::cmp::Ordering::Equal => continue,
                ord => return ord,
            }
        }
        core::cmp::Ordering::Equal
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        U256::from_u64(value)
    }
}
