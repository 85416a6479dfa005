//! Pure-Rust implementations of the SM-series cryptographic algorithms:
//! the SM3 hash function, the SM4 block cipher, the ZUC stream cipher,
//! and SM2 elliptic curve signatures, public-key encryption and key
//! exchange, together with the generic 256-bit field and curve
//! arithmetic the public-key schemes build on.
//!
//! # Examples
//!
//! Hashing with SM3:
//!
//! ```
//! use gmcrypt::hash::{HashFunction, Sm3};
//!
//! let digest = Sm3::digest(b"abc").unwrap();
//! assert_eq!(
//!     digest.to_hex(),
//!     "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
//! );
//! ```
//!
//! Signing and verifying with SM2:
//!
//! ```
//! use gmcrypt::sign::sm2::{self, DEFAULT_ID};
//! use rand::rngs::OsRng;
//!
//! let engine = sm2::new_engine();
//! let (d, public) = engine.generate_keypair(&mut OsRng).unwrap();
//! let z = engine.compute_z(DEFAULT_ID, &public).unwrap();
//!
//! let sig = engine.sign(b"hello", &d, &z, &mut OsRng).unwrap();
//! assert!(engine.verify(b"hello", &sig, &public, &z).unwrap());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod block;
pub mod ec;
pub mod error;
pub mod hash;
pub mod sign;
pub mod stream;
pub mod types;

pub use block::{BlockCipher, CipherAlgorithm, Sm4};
pub use ec::{CurveParams, Point, U256};
pub use error::{Error, Result};
pub use hash::{HashAlgorithm, HashFunction, Sm3};
pub use sign::{ExchangeRole, ScalarSource, Signature, SignatureEngine};
pub use stream::{StreamCipher, Zuc};
pub use types::Digest;
