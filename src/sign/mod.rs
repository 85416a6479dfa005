//! Elliptic curve public-key operations.
//!
//! The [`SignatureEngine`] implements signing, verification, public-key
//! encryption and key exchange over any short Weierstrass curve described
//! by a [`CurveParams`], parameterized by the hash function used for
//! identity and message digesting. The [`sm2`] module instantiates it for
//! the standard 256-bit curve with SM3.

use core::marker::PhantomData;

use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::ec::{CurveParams, Point, U256, U256_BYTES};
use crate::error::{validate, Error, Result};
use crate::hash::HashFunction;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

pub mod sm2;

/// Serialized signature size in bytes: `r` and `s` concatenated.
pub const SIGNATURE_BYTES: usize = 2 * U256_BYTES;

/// Maximum number of nonce draws before signing or encryption is abandoned.
///
/// Each retry fires only when a degenerate intermediate is produced, which
/// happens with probability around 2^-254 per draw for a working
/// randomness source. Hitting this ceiling means the source is broken.
const NONCE_RETRY_LIMIT: usize = 64;

/// Maximum rejection-sampling draws when generating a bounded scalar.
const SCALAR_SAMPLE_LIMIT: usize = 128;

/// A signature as a pair of scalars `(r, s)`.
#[derive(Clone, Debug, Zeroize)]
pub struct Signature {
    r: U256,
    s: U256,
}

impl Signature {
    /// Builds a signature from its two components.
    pub fn new(r: U256, s: U256) -> Self {
        Self { r, s }
    }

    /// The `r` component.
    pub fn r(&self) -> &U256 {
        &self.r
    }

    /// The `s` component.
    pub fn s(&self) -> &U256 {
        &self.s
    }

    /// Serializes as `r || s`, each component 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_BYTES] {
        let mut out = [0u8; SIGNATURE_BYTES];
        out[..U256_BYTES].copy_from_slice(&self.r.to_be_bytes());
        out[U256_BYTES..].copy_from_slice(&self.s.to_be_bytes());
        out
    }

    /// Parses a signature from a 64-byte `r || s` encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        validate::length("signature", bytes.len(), SIGNATURE_BYTES)?;
        Ok(Self {
            r: U256::from_be_bytes(&bytes[..U256_BYTES])?,
            s: U256::from_be_bytes(&bytes[U256_BYTES..])?,
        })
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.r.ct_eq(&other.r) & self.s.ct_eq(&other.s)
    }
}

impl Eq for Signature {}

/// Source of per-signature secret scalars.
///
/// Implemented for every `CryptoRng` via rejection sampling; tests supply
/// fixed nonces through [`FixedScalar`].
pub trait ScalarSource {
    /// Returns a scalar uniform in `[1, bound - 1]`.
    fn next_scalar(&mut self, bound: &U256) -> Result<U256>;
}

impl<R: CryptoRng + RngCore> ScalarSource for R {
    fn next_scalar(&mut self, bound: &U256) -> Result<U256> {
        for _ in 0..SCALAR_SAMPLE_LIMIT {
            let mut bytes = [0u8; U256_BYTES];
            self.fill_bytes(&mut bytes);
            let candidate = U256::from_be_bytes(&bytes)?;
            bytes.zeroize();
            if !candidate.is_zero() && candidate < *bound {
                return Ok(candidate);
            }
        }
        Err(Error::Processing {
            operation: "scalar sampling",
            details: "rejection sampling failed to produce a scalar in range",
        })
    }
}

/// Replays a fixed sequence of scalars, for deterministic signing in tests.
///
/// Implements `RngCore` over the big-endian bytes of the supplied scalars,
/// so it plugs in anywhere a random source is expected. Panics when the
/// sequence is exhausted.
pub struct FixedScalar {
    bytes: Vec<u8>,
    pos: usize,
}

impl FixedScalar {
    /// Creates a source that yields the given scalars in order.
    pub fn new(scalars: &[U256]) -> Self {
        let mut bytes = Vec::with_capacity(scalars.len() * U256_BYTES);
        for scalar in scalars {
            bytes.extend_from_slice(&scalar.to_be_bytes());
        }
        Self { bytes, pos: 0 }
    }
}

impl RngCore for FixedScalar {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_be_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_be_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let end = self.pos + dest.len();
        assert!(end <= self.bytes.len(), "fixed scalar sequence exhausted");
        dest.copy_from_slice(&self.bytes[self.pos..end]);
        self.pos = end;
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for FixedScalar {}

/// Which side of a key exchange this party plays.
///
/// The role fixes the order in which the two identity digests feed the
/// key derivation, so both sides arrive at the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExchangeRole {
    /// The party that sends its ephemeral point first.
    Initiator,
    /// The party that answers with its own ephemeral point.
    Responder,
}

/// Signing and verification over an arbitrary curve, generic in the digest.
///
/// The digest must produce 32-byte output so hashes map directly onto
/// curve scalars.
pub struct SignatureEngine<H: HashFunction> {
    curve: CurveParams,
    _digest: PhantomData<H>,
}

impl<H: HashFunction> SignatureEngine<H> {
    /// Creates an engine over the given curve.
    pub fn new(curve: CurveParams) -> Self {
        Self {
            curve,
            _digest: PhantomData,
        }
    }

    /// The curve this engine operates on.
    pub fn curve(&self) -> &CurveParams {
        &self.curve
    }

    /// Computes the identity digest `Z` binding an identity string to a
    /// public key and the curve domain.
    ///
    /// `Z = H(ENTL || id || a || b || Gx || Gy || xP || yP)` where `ENTL`
    /// is the bit length of `id` as two big-endian bytes.
    pub fn compute_z(&self, id: &[u8], public: &Point) -> Result<Vec<u8>> {
        let bits = id.len().checked_mul(8).ok_or_else(|| {
            Error::param("id", "identity length overflows")
        })?;
        if bits > u16::MAX as usize {
            return Err(Error::param("id", "identity exceeds 65535 bits"));
        }
        self.curve.validate_point(public)?;

        let entl = (bits as u16).to_be_bytes();
        let mut hasher = H::new();
        hasher
            .update(&entl)?
            .update(id)?
            .update(&self.curve.a.to_be_bytes())?
            .update(&self.curve.b.to_be_bytes())?
            .update(&self.curve.gx.to_be_bytes())?
            .update(&self.curve.gy.to_be_bytes())?
            .update(&public.x().to_be_bytes())?
            .update(&public.y().to_be_bytes())?;
        let digest = hasher.finalize()?;
        Ok(digest.as_ref().to_vec())
    }

    /// Generates a keypair: a private scalar `d` in `[1, n - 2]` and the
    /// public point `d * G`.
    pub fn generate_keypair<R: CryptoRng + RngCore>(&self, rng: &mut R) -> Result<(U256, Point)> {
        // Sampling below n - 1 keeps 1 + d invertible mod n.
        let (n_minus_one, _) = self.curve.n.overflowing_sub(&U256::ONE);
        let d = rng.next_scalar(&n_minus_one)?;
        let public = self.curve.scalar_mul(&d, &self.curve.generator())?;
        Ok((d, public))
    }

    /// Hashes `z || msg` and reduces the digest into a scalar mod n.
    fn message_scalar(&self, z: &[u8], msg: &[u8]) -> Result<U256> {
        let mut hasher = H::new();
        hasher.update(z)?.update(msg)?;
        let digest = hasher.finalize()?;
        let e = U256::from_be_bytes(digest.as_ref())?;
        Ok(e.reduce(&self.curve.n))
    }

    /// Signs a message under private scalar `d` and identity digest `z`.
    ///
    /// Draws a fresh nonce per attempt and retries on the degenerate cases
    /// `r = 0`, `r + k = n` and `s = 0`.
    pub fn sign<S: ScalarSource>(
        &self,
        msg: &[u8],
        d: &U256,
        z: &[u8],
        scalars: &mut S,
    ) -> Result<Signature> {
        let n = &self.curve.n;
        self.check_private_scalar(d, "signing key")?;

        let e = self.message_scalar(z, msg)?;
        let generator = self.curve.generator();

        for _ in 0..NONCE_RETRY_LIMIT {
            let mut k = scalars.next_scalar(n)?;
            let point = self.curve.scalar_mul(&k, &generator)?;
            let x1 = point.x().reduce(n);

            let r = e.mod_add(&x1, n);
            if r.is_zero() || r.mod_add(&k, n).is_zero() {
                k.zeroize();
                continue;
            }

            // s = (1 + d)^-1 * (k - r * d) mod n
            let inv = d.mod_add(&U256::ONE, n).mod_inv(n)?;
            let rd = r.mod_mul(d, n);
            let s = inv.mod_mul(&k.mod_sub(&rd, n), n);
            k.zeroize();
            if s.is_zero() {
                continue;
            }
            return Ok(Signature::new(r, s));
        }

        Err(Error::Processing {
            operation: "sign",
            details: "nonce retry ceiling reached; randomness source is suspect",
        })
    }

    /// Verifies a signature against a public point and identity digest.
    ///
    /// Returns `Ok(false)` for well-formed but invalid signatures; errors
    /// are reserved for malformed inputs such as an off-curve public key.
    pub fn verify(&self, msg: &[u8], sig: &Signature, public: &Point, z: &[u8]) -> Result<bool> {
        let n = &self.curve.n;
        self.curve.validate_point(public)?;

        let in_range = |v: &U256| !v.is_zero() && *v < *n;
        if !in_range(sig.r()) || !in_range(sig.s()) {
            return Ok(false);
        }

        let t = sig.r().mod_add(sig.s(), n);
        if t.is_zero() {
            return Ok(false);
        }

        let e = self.message_scalar(z, msg)?;
        let sg = self.curve.scalar_mul(sig.s(), &self.curve.generator())?;
        let tp = self.curve.scalar_mul(&t, public)?;
        let sum = self.curve.add(&sg, &tp)?;
        if sum.is_identity() {
            return Ok(false);
        }

        let expected = e.mod_add(&sum.x().reduce(n), n);
        Ok(expected.ct_eq(sig.r()))
    }

    /// Encrypts a message to a public point.
    ///
    /// Output layout is `x1 || y1 || c3 || c2`: the ephemeral point, the
    /// digest `H(x2 || msg || y2)`, then the masked message. Retries with
    /// a fresh nonce whenever the derived mask is all zero.
    pub fn encrypt<S: ScalarSource>(
        &self,
        msg: &[u8],
        public: &Point,
        scalars: &mut S,
    ) -> Result<Vec<u8>> {
        validate::parameter(!msg.is_empty(), "msg", "plaintext must not be empty")?;
        self.curve.validate_point(public)?;
        let n = &self.curve.n;

        for _ in 0..NONCE_RETRY_LIMIT {
            let mut k = scalars.next_scalar(n)?;
            let c1 = self.curve.scalar_mul(&k, &self.curve.generator())?;
            let shared = self.curve.scalar_mul(&k, public)?;
            k.zeroize();
            if shared.is_identity() {
                continue;
            }

            let mut seed = [0u8; 2 * U256_BYTES];
            seed[..U256_BYTES].copy_from_slice(&shared.x().to_be_bytes());
            seed[U256_BYTES..].copy_from_slice(&shared.y().to_be_bytes());
            let mut mask = self.kdf(&seed, msg.len())?;
            seed.zeroize();
            if mask.iter().all(|&b| b == 0) {
                mask.zeroize();
                continue;
            }

            let mut hasher = H::new();
            hasher
                .update(&shared.x().to_be_bytes())?
                .update(msg)?
                .update(&shared.y().to_be_bytes())?;
            let c3 = hasher.finalize()?;

            let mut out = Vec::with_capacity(2 * U256_BYTES + c3.as_ref().len() + msg.len());
            out.extend_from_slice(&c1.to_bytes());
            out.extend_from_slice(c3.as_ref());
            out.extend(msg.iter().zip(mask.iter()).map(|(m, t)| m ^ t));
            mask.zeroize();
            return Ok(out);
        }

        Err(Error::Processing {
            operation: "encrypt",
            details: "nonce retry ceiling reached; randomness source is suspect",
        })
    }

    /// Decrypts a ciphertext produced by [`encrypt`](Self::encrypt).
    ///
    /// Fails when the embedded point is invalid or the digest check does
    /// not pass, without revealing which.
    pub fn decrypt(&self, ciphertext: &[u8], d: &U256) -> Result<Vec<u8>> {
        self.check_private_scalar(d, "decryption key")?;
        let digest_len = H::output_size();
        let overhead = 2 * U256_BYTES + digest_len;
        if ciphertext.len() <= overhead {
            return Err(Error::Length {
                context: "ciphertext",
                expected: overhead + 1,
                actual: ciphertext.len(),
            });
        }

        let c1 = Point::from_bytes(&ciphertext[..2 * U256_BYTES])?;
        self.curve.validate_point(&c1)?;
        let c3 = &ciphertext[2 * U256_BYTES..overhead];
        let c2 = &ciphertext[overhead..];

        let shared = self.curve.scalar_mul(d, &c1)?;
        if shared.is_identity() {
            return Err(Error::Point {
                reason: "shared point at infinity",
            });
        }

        let mut seed = [0u8; 2 * U256_BYTES];
        seed[..U256_BYTES].copy_from_slice(&shared.x().to_be_bytes());
        seed[U256_BYTES..].copy_from_slice(&shared.y().to_be_bytes());
        let mut mask = self.kdf(&seed, c2.len())?;
        seed.zeroize();
        if mask.iter().all(|&b| b == 0) {
            return Err(Error::Processing {
                operation: "decrypt",
                details: "derived mask is all zero",
            });
        }

        let msg: Vec<u8> = c2.iter().zip(mask.iter()).map(|(c, t)| c ^ t).collect();
        mask.zeroize();
        let mut hasher = H::new();
        hasher
            .update(&shared.x().to_be_bytes())?
            .update(&msg)?
            .update(&shared.y().to_be_bytes())?;
        let check = hasher.finalize()?;
        if !bool::from(check.as_ref().ct_eq(c3)) {
            return Err(Error::Processing {
                operation: "decrypt",
                details: "digest check failed",
            });
        }
        Ok(msg)
    }

    /// Opens a key exchange: draws an ephemeral scalar and returns the
    /// point to send to the peer along with the folded secret `t`.
    ///
    /// `t = (d + x̄ * r) mod n`, where `x̄` folds the ephemeral x
    /// coordinate to its low half. `t` feeds
    /// [`end_key_exchange`](Self::end_key_exchange) once the peer's
    /// ephemeral point arrives.
    pub fn begin_key_exchange<S: ScalarSource>(
        &self,
        d: &U256,
        scalars: &mut S,
    ) -> Result<(Point, U256)> {
        self.check_private_scalar(d, "exchange key")?;
        let n = &self.curve.n;

        let mut r = scalars.next_scalar(n)?;
        let ephemeral = self.curve.scalar_mul(&r, &self.curve.generator())?;
        let folded = self.fold_coordinate(ephemeral.x())?;
        let t = d.mod_add(&folded.mod_mul(&r, n), n);
        r.zeroize();
        Ok((ephemeral, t))
    }

    /// Completes a key exchange and derives `key_len` bytes of shared key.
    ///
    /// `own_z` and `peer_z` are the identity digests from
    /// [`compute_z`](Self::compute_z); the role decides their order in the
    /// derivation so both parties agree.
    #[allow(clippy::too_many_arguments)]
    pub fn end_key_exchange(
        &self,
        key_len: usize,
        t: &U256,
        peer_ephemeral: &Point,
        peer_public: &Point,
        own_z: &[u8],
        peer_z: &[u8],
        role: ExchangeRole,
    ) -> Result<Vec<u8>> {
        validate::parameter(key_len > 0, "key_len", "shared key must not be empty")?;
        self.curve.validate_point(peer_ephemeral)?;
        self.curve.validate_point(peer_public)?;

        // U = t * (P_peer + x̄ * R_peer)
        let folded = self.fold_coordinate(peer_ephemeral.x())?;
        let scaled = self.curve.scalar_mul(&folded, peer_ephemeral)?;
        let joined = self.curve.add(peer_public, &scaled)?;
        let secret = self.curve.scalar_mul(t, &joined)?;
        if secret.is_identity() {
            return Err(Error::Point {
                reason: "shared point at infinity",
            });
        }

        let (first_z, second_z) = match role {
            ExchangeRole::Initiator => (own_z, peer_z),
            ExchangeRole::Responder => (peer_z, own_z),
        };
        let mut seed = Vec::with_capacity(2 * U256_BYTES + first_z.len() + second_z.len());
        seed.extend_from_slice(&secret.x().to_be_bytes());
        seed.extend_from_slice(&secret.y().to_be_bytes());
        seed.extend_from_slice(first_z);
        seed.extend_from_slice(second_z);

        let key = self.kdf(&seed, key_len)?;
        seed.zeroize();
        Ok(key)
    }

    /// Counter-mode key derivation: concatenated `H(seed || ct)` blocks
    /// for `ct = 1, 2, ...`, truncated to `len` bytes.
    fn kdf(&self, seed: &[u8], len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(len);
        let mut counter: u32 = 1;
        while out.len() < len {
            let mut hasher = H::new();
            hasher.update(seed)?.update(&counter.to_be_bytes())?;
            let digest = hasher.finalize()?;
            let block = digest.as_ref();
            let take = core::cmp::min(len - out.len(), block.len());
            out.extend_from_slice(&block[..take]);
            counter = counter.checked_add(1).ok_or(Error::Range {
                context: "kdf output length",
            })?;
        }
        Ok(out)
    }

    /// Folds an x coordinate to `2^w + (x mod 2^w)` with
    /// `w = ⌈log2(n)/2⌉ - 1`.
    fn fold_coordinate(&self, x: &U256) -> Result<U256> {
        let w = (self.curve.n.bit_length() + 1) / 2 - 1;
        let mut bytes = x.to_be_bytes();
        for i in (w + 1)..(8 * U256_BYTES) {
            bytes[U256_BYTES - 1 - i / 8] &= !(1u8 << (i % 8));
        }
        bytes[U256_BYTES - 1 - w / 8] |= 1u8 << (w % 8);
        U256::from_be_bytes(&bytes)
    }

    /// A private scalar must lie in `[1, n - 2]`.
    fn check_private_scalar(&self, d: &U256, context: &'static str) -> Result<()> {
        let (n_minus_one, _) = self.curve.n.overflowing_sub(&U256::ONE);
        if d.is_zero() || *d >= n_minus_one {
            return Err(Error::Range { context });
        }
        Ok(())
    }
}
