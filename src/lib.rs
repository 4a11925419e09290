//! rlwe-zero: samplers and zero-ciphertext generation for RLWE encryption
//!
//! This crate provides the randomness layer of an RNS-based homomorphic
//! encryption scheme:
//!
//! - Ternary, clipped Gaussian, centered binomial and uniform polynomial
//!   samplers with branch-free sign handling
//! - Asymmetric (public-key) and symmetric (secret-key) encryptions of zero
//! - Seed compression of the uniform ciphertext component and its expansion
//!
//! Plaintext encoding, homomorphic evaluation and key generation are left to
//! the surrounding library.

pub mod context;
pub mod error;
pub mod math;
pub mod params;
pub mod rlwe;
pub mod rng;

pub use context::{Context, ContextData, ParmsId};
pub use error::{Error, Result};
pub use params::{EncryptionParams, NoiseConfig, NoiseDistribution};
pub use rlwe::{
    encrypt_zero_asymmetric, encrypt_zero_symmetric, Ciphertext, PublicKey, SecretKey,
};
pub use rng::{ChaChaFactory, RandomGeneratorFactory, RandomSeed};
