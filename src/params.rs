//! Encryption parameters and noise configuration.
//!
//! Presets use NTT-friendly primes from the 128-bit security tables of the
//! homomorphic encryption standard.

use serde::{Deserialize, Serialize};

use crate::error::{params_err, Result};
use crate::math::Modulus;

/// Default noise standard deviation.
pub const DEFAULT_NOISE_STANDARD_DEVIATION: f64 = 3.2;

/// Clipping bound as a multiple of the standard deviation.
pub const NOISE_MAX_DEVIATION_FACTOR: f64 = 6.0;

/// 60-bit NTT-friendly prime, q = 2^60 - 2^14 + 1 (q ≡ 1 mod 16384).
pub const TOY_Q: u64 = 1152921504606830593;

/// Which distribution the zero-encryption routines draw noise from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseDistribution {
    /// Clipped, rounded continuous normal distribution.
    Gaussian,
    /// Centered binomial distribution; only valid for σ = 3.2.
    CenteredBinomial,
}

impl Default for NoiseDistribution {
    /// Centered binomial unless the crate is built with `gaussian-noise`.
    fn default() -> Self {
        if cfg!(feature = "gaussian-noise") {
            Self::Gaussian
        } else {
            Self::CenteredBinomial
        }
    }
}

/// Noise configuration read by every error sampler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Standard deviation σ of the error distribution.
    pub standard_deviation: f64,

    /// Samples with |x| above this bound are redrawn.
    /// Zero disables noise entirely (deterministic testing mode).
    pub max_deviation: f64,

    /// Active error distribution.
    pub distribution: NoiseDistribution,
}

impl NoiseConfig {
    /// Noise with the given σ, clipped at 6σ, using the default distribution.
    pub fn with_standard_deviation(standard_deviation: f64) -> Self {
        Self {
            standard_deviation,
            max_deviation: NOISE_MAX_DEVIATION_FACTOR * standard_deviation,
            distribution: NoiseDistribution::default(),
        }
    }

    /// Noise-free configuration: every error polynomial is zero.
    pub fn zero() -> Self {
        Self {
            max_deviation: 0.0,
            ..Self::default()
        }
    }

    pub fn with_distribution(mut self, distribution: NoiseDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Checks that both deviations are finite and non-negative.
    ///
    /// Whether the centered binomial distribution supports σ is checked by
    /// the sampler itself.
    pub fn validate(&self) -> Result<()> {
        if !self.standard_deviation.is_finite() || self.standard_deviation < 0.0 {
            return Err(params_err!(
                "noise standard deviation {} must be finite and non-negative",
                self.standard_deviation
            ));
        }
        if !self.max_deviation.is_finite() || self.max_deviation < 0.0 {
            return Err(params_err!(
                "noise max deviation {} must be finite and non-negative",
                self.max_deviation
            ));
        }
        Ok(())
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self::with_standard_deviation(DEFAULT_NOISE_STANDARD_DEVIATION)
    }
}

/// Parameters of one RLWE instance.
///
/// Only the degree and modulus list are validated here. NTT-friendliness is
/// required later by `Context::new`, so samplers can be driven with arbitrary
/// small primes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptionParams {
    /// Ring dimension n (power of two); also the coefficient count.
    poly_modulus_degree: usize,

    /// RNS base, one prime per limb, in limb order.
    coeff_modulus: Vec<Modulus>,

    /// Error distribution configuration.
    noise: NoiseConfig,
}

impl EncryptionParams {
    /// Creates and validates parameters with the default noise configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use rlwe_zero::params::EncryptionParams;
    ///
    /// let parms = EncryptionParams::new(8, &[41, 37]).unwrap();
    /// assert_eq!(parms.coeff_modulus_size(), 2);
    /// assert_eq!(parms.poly_len(), 16);
    /// ```
    pub fn new(poly_modulus_degree: usize, coeff_modulus: &[u64]) -> Result<Self> {
        let parms = Self {
            poly_modulus_degree,
            coeff_modulus: Modulus::from_values(coeff_modulus)?,
            noise: NoiseConfig::default(),
        };
        parms.validate()?;
        Ok(parms)
    }

    /// Replaces the noise configuration.
    pub fn with_noise(mut self, noise: NoiseConfig) -> Result<Self> {
        noise.validate()?;
        self.noise = noise;
        Ok(self)
    }

    /// 128-bit secure parameters for n ∈ {1024, 2048, 4096}.
    pub fn default_128(poly_modulus_degree: usize) -> Result<Self> {
        let coeff_modulus: &[u64] = match poly_modulus_degree {
            1024 => &[0x7e00001],
            2048 => &[0x3fffffff000001],
            4096 => &[0xffffee001, 0xffffc4001, 0x1ffffe0001],
            n => return Err(params_err!("no 128-bit preset for degree {}", n)),
        };
        Self::new(poly_modulus_degree, coeff_modulus)
    }

    /// Three-limb parameters for tests and benchmarks, n <= 4096.
    ///
    /// Not a security preset.
    pub fn toy(poly_modulus_degree: usize) -> Result<Self> {
        Self::new(poly_modulus_degree, &[TOY_Q, 0xffffee001, 0xffffc4001])
    }

    pub fn poly_modulus_degree(&self) -> usize {
        self.poly_modulus_degree
    }

    pub fn coeff_modulus(&self) -> &[Modulus] {
        &self.coeff_modulus
    }

    pub fn coeff_modulus_size(&self) -> usize {
        self.coeff_modulus.len()
    }

    /// Words in one RNS polynomial: `poly_modulus_degree * coeff_modulus_size`.
    pub fn poly_len(&self) -> usize {
        self.poly_modulus_degree * self.coeff_modulus.len()
    }

    pub fn noise(&self) -> &NoiseConfig {
        &self.noise
    }

    /// Check if parameters are valid
    pub fn validate(&self) -> Result<()> {
        let n = self.poly_modulus_degree;
        if n < 2 || !n.is_power_of_two() {
            return Err(params_err!(
                "poly_modulus_degree {} must be a power of two >= 2",
                n
            ));
        }

        if self.coeff_modulus.is_empty() {
            return Err(params_err!("coeff_modulus must not be empty"));
        }

        for (i, q) in self.coeff_modulus.iter().enumerate() {
            if !q.is_prime() {
                return Err(params_err!("coeff_modulus[{}] = {} is not prime", i, q.value()));
            }
            if self.coeff_modulus[..i].contains(q) {
                return Err(params_err!("coeff_modulus[{}] = {} is repeated", i, q.value()));
            }
        }

        self.noise.validate()
    }

    /// The same parameters with only the first `coeff_modulus_size` limbs.
    pub(crate) fn truncated(&self, coeff_modulus_size: usize) -> Self {
        Self {
            poly_modulus_degree: self.poly_modulus_degree,
            coeff_modulus: self.coeff_modulus[..coeff_modulus_size].to_vec(),
            noise: self.noise,
        }
    }
}
