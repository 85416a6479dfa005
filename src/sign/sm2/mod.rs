//! SM2 public-key cryptography over the standard 256-bit curve, using SM3:
//! digital signatures, encryption and key exchange.

use zeroize::Zeroize;

use crate::ec::{CurveParams, Point, U256, U256_BYTES};
use crate::error::{Error, Result};
use crate::hash::Sm3;
use crate::sign::{ExchangeRole, ScalarSource, Signature, SignatureEngine};

use rand::{CryptoRng, RngCore};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

#[cfg(test)]
mod tests;

/// The default identity string when no identity has been agreed on.
pub const DEFAULT_ID: &[u8] = b"1234567812345678";

/// The recommended 256-bit prime curve parameters.
const CURVE: CurveParams = CurveParams {
    p: U256::from_limbs([
        0xFFFFFFFFFFFFFFFF,
        0xFFFFFFFF00000000,
        0xFFFFFFFFFFFFFFFF,
        0xFFFFFFFEFFFFFFFF,
    ]),
    a: U256::from_limbs([
        0xFFFFFFFFFFFFFFFC,
        0xFFFFFFFF00000000,
        0xFFFFFFFFFFFFFFFF,
        0xFFFFFFFEFFFFFFFF,
    ]),
    b: U256::from_limbs([
        0xDDBCBD414D940E93,
        0xF39789F515AB8F92,
        0x4D5A9E4BCF6509A7,
        0x28E9FA9E9D9F5E34,
    ]),
    n: U256::from_limbs([
        0x53BBF40939D54123,
        0x7203DF6B21C6052B,
        0xFFFFFFFFFFFFFFFF,
        0xFFFFFFFEFFFFFFFF,
    ]),
    gx: U256::from_limbs([
        0x715A4589334C74C7,
        0x8FE30BBFF2660BE1,
        0x5F9904466A39C994,
        0x32C4AE2C1F198119,
    ]),
    gy: U256::from_limbs([
        0x02DF32E52139F0A0,
        0xD0A9877CC62A4740,
        0x59BDCEE36B692153,
        0xBC3736A2F4F6779C,
    ]),
};

/// The signature engine specialized to the standard curve and SM3.
pub type Sm2Engine = SignatureEngine<Sm3>;

/// The standard curve parameters.
pub fn curve() -> &'static CurveParams {
    &CURVE
}

/// Creates an engine over the standard curve.
pub fn new_engine() -> Sm2Engine {
    SignatureEngine::new(CURVE.clone())
}

/// Generates a keypair on the standard curve.
pub fn generate_keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<(U256, Point)> {
    new_engine().generate_keypair(rng)
}

/// Encrypts a message to a public point on the standard curve.
pub fn encrypt<S: ScalarSource>(msg: &[u8], public: &Point, scalars: &mut S) -> Result<Vec<u8>> {
    new_engine().encrypt(msg, public, scalars)
}

/// Decrypts a ciphertext with a 32-byte big-endian private key.
pub fn decrypt(ciphertext: &[u8], private_key: &[u8]) -> Result<Vec<u8>> {
    let mut d = U256::from_be_bytes(private_key)?;
    let msg = new_engine().decrypt(ciphertext, &d);
    d.zeroize();
    msg
}

/// Holds a private key with its precomputed identity digest for signing.
///
/// The private scalar and identity digest are wiped on drop.
pub struct Sm2Signer {
    engine: Sm2Engine,
    d: U256,
    public: Point,
    z: Vec<u8>,
}

impl Sm2Signer {
    /// Builds a signer from a 32-byte big-endian private key and an
    /// identity string.
    pub fn new(private_key: &[u8], id: &[u8]) -> Result<Self> {
        let engine = new_engine();
        let d = U256::from_be_bytes(private_key)?;
        let (n_minus_one, _) = CURVE.n.overflowing_sub(&U256::ONE);
        if d.is_zero() || d >= n_minus_one {
            return Err(Error::Range {
                context: "signing key",
            });
        }
        let public = engine.curve().scalar_mul(&d, &engine.curve().generator())?;
        let z = engine.compute_z(id, &public)?;
        Ok(Self {
            engine,
            d,
            public,
            z,
        })
    }

    /// The public point matching the private key.
    pub fn public_key(&self) -> &Point {
        &self.public
    }

    /// Signs a message, drawing nonces from the given source.
    pub fn sign<S: ScalarSource>(&self, msg: &[u8], scalars: &mut S) -> Result<Signature> {
        self.engine.sign(msg, &self.d, &self.z, scalars)
    }
}

impl Drop for Sm2Signer {
    fn drop(&mut self) {
        self.d.zeroize();
        self.z.zeroize();
    }
}

/// Holds a validated public key with its precomputed identity digest.
pub struct Sm2Verifier {
    engine: Sm2Engine,
    public: Point,
    z: Vec<u8>,
}

impl Sm2Verifier {
    /// Builds a verifier from a public point and an identity string.
    ///
    /// Fails if the point is not on the curve.
    pub fn new(public: Point, id: &[u8]) -> Result<Self> {
        let engine = new_engine();
        let z = engine.compute_z(id, &public)?;
        Ok(Self { engine, public, z })
    }

    /// Builds a verifier from a 64-byte `x || y` public key encoding.
    pub fn from_bytes(public_key: &[u8], id: &[u8]) -> Result<Self> {
        Self::new(Point::from_bytes(public_key)?, id)
    }

    /// Verifies a signature over a message.
    pub fn verify(&self, msg: &[u8], sig: &Signature) -> Result<bool> {
        self.engine.verify(msg, sig, &self.public, &self.z)
    }
}

/// One party in a key exchange on the standard curve.
///
/// Holds the long-term private key and the party's own identity digest;
/// both are wiped on drop.
pub struct Sm2Exchange {
    engine: Sm2Engine,
    d: U256,
    public: Point,
    z: Vec<u8>,
}

impl Sm2Exchange {
    /// Builds an exchange party from a 32-byte big-endian private key and
    /// an identity string.
    pub fn new(private_key: &[u8], id: &[u8]) -> Result<Self> {
        let engine = new_engine();
        let d = U256::from_be_bytes(private_key)?;
        let (n_minus_one, _) = CURVE.n.overflowing_sub(&U256::ONE);
        if d.is_zero() || d >= n_minus_one {
            return Err(Error::Range {
                context: "exchange key",
            });
        }
        let public = engine.curve().scalar_mul(&d, &engine.curve().generator())?;
        let z = engine.compute_z(id, &public)?;
        Ok(Self {
            engine,
            d,
            public,
            z,
        })
    }

    /// The public point matching the private key; the peer needs it to
    /// complete the exchange.
    pub fn public_key(&self) -> &Point {
        &self.public
    }

    /// Draws an ephemeral scalar and returns the point to send to the
    /// peer along with the folded secret `t` for [`end`](Self::end).
    pub fn begin<S: ScalarSource>(&self, scalars: &mut S) -> Result<(Point, U256)> {
        self.engine.begin_key_exchange(&self.d, scalars)
    }

    /// Derives `key_len` bytes of shared key from the peer's ephemeral
    /// point, public key and identity string.
    pub fn end(
        &self,
        key_len: usize,
        t: &U256,
        peer_ephemeral: &Point,
        peer_public: &Point,
        peer_id: &[u8],
        role: ExchangeRole,
    ) -> Result<Vec<u8>> {
        let peer_z = self.engine.compute_z(peer_id, peer_public)?;
        self.engine.end_key_exchange(
            key_len,
            t,
            peer_ephemeral,
            peer_public,
            &self.z,
            &peer_z,
            role,
        )
    }
}

impl Drop for Sm2Exchange {
    fn drop(&mut self) {
        self.d.zeroize();
        self.z.zeroize();
    }
}

/// Serialized public key size in bytes.
pub const PUBLIC_KEY_BYTES: usize = 2 * U256_BYTES;
