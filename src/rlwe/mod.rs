//! RLWE keys, ciphertexts and encryptions of zero.
//!
//! # Overview
//!
//! A zero-ciphertext is the base onto which an encoded plaintext is added to
//! form a fresh encryption. Two generators are provided:
//!
//! - [`encrypt_zero_asymmetric`]: from a public key `(-(a·s + e), a)`, computes
//!   `pk · u + e'` for an ephemeral ternary `u`
//! - [`encrypt_zero_symmetric`]: from the secret key, computes
//!   `(-(c1·s + e), c1)` with `c1` uniform, optionally storing `c1` as a seed
//!
//! # Example
//!
//! ```ignore
//! use rlwe_zero::context::Context;
//! use rlwe_zero::params::EncryptionParams;
//! use rlwe_zero::rlwe::{encrypt_zero_symmetric, Ciphertext};
//! use rlwe_zero::rng::ChaChaFactory;
//!
//! let context = Context::new(EncryptionParams::default_128(4096)?)?;
//! let factory = ChaChaFactory::from_entropy();
//!
//! let mut ct = Ciphertext::new();
//! encrypt_zero_symmetric(&sk, &context, context.key_parms_id(), true, true, &factory, &mut ct)?;
//! assert!(ct.is_seed_compressed());
//!
//! let bytes = ct.save()?;
//! let restored = Ciphertext::load(&context, &bytes)?;
//! ```

mod enc;
mod serialize;
mod types;

pub use enc::{check_seed_capacity, encrypt_zero_asymmetric, encrypt_zero_symmetric};
pub use types::{Ciphertext, PublicKey, SecretKey, SEED_SENTINEL};
