//! Mathematical primitives for RLWE sampling.
//!
//! This module provides the arithmetic the zero-encryption routines build on:
//!
//! - **Coefficient moduli** with branch-free Barrett reduction
//! - **Number-Theoretic Transform (NTT)** per RNS limb, in Montgomery form
//! - **RNS polynomial buffers** and zeroizing scratch allocation
//! - **Samplers** for ternary, clipped Gaussian, centered binomial and
//!   uniform polynomials
//!
//! # Overview
//!
//! Polynomials live in R_q = Z_q[X]/(X^n + 1) with q = q_0 · q_1 · ... given as
//! an RNS base. Each prime q_i must satisfy q_i ≡ 1 (mod 2n) for the NTT.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//! use rlwe_zero::math::sampling::sample_poly_ternary;
//! use rlwe_zero::params::EncryptionParams;
//!
//! let parms = EncryptionParams::new(8, &[41, 37]).unwrap();
//! let mut rng = ChaCha20Rng::seed_from_u64(1);
//! let mut poly = vec![0u64; parms.poly_len()];
//! sample_poly_ternary(&mut rng, &parms, &mut poly);
//! ```

pub mod gaussian;
pub mod modulus;
pub mod ntt;
pub mod poly;
pub mod sampling;

pub use gaussian::ClippedNormal;
pub use modulus::Modulus;
pub use ntt::NttContext;
pub use sampling::{
    sample_poly_cbd, sample_poly_noise, sample_poly_normal, sample_poly_ternary,
    sample_poly_uniform, sample_poly_uniform_from_seed,
};
