//! RNS polynomial samplers.
//!
//! Each sampler fills a pre-sized limb-major buffer of
//! `poly_modulus_degree * coeff_modulus_size` words.
//!
//! Ternary and error samplers draw one signed value per coefficient and write
//! it into every limb, so all limbs represent the same small integer. The
//! sign is folded in with an arithmetic mask, never a branch. The uniform
//! sampler draws every limb independently.

use rand::distributions::{Distribution, Uniform};
use rand::{CryptoRng, RngCore};

use super::gaussian::{are_close, sample_cbd, ClippedNormal, CBD_STANDARD_DEVIATION};
use super::modulus::select_mask;
use super::poly::set_zero_poly;
use crate::error::{Error, Result};
use crate::params::{EncryptionParams, NoiseDistribution};
use crate::rng::{seeded_rng, RandomSeed};

/// Writes the signed draw `value` into coefficient `i` of every limb.
///
/// `value` must be smaller in magnitude than every modulus.
#[inline(always)]
fn write_signed(destination: &mut [u64], parms: &EncryptionParams, i: usize, value: i64) {
    let coeff_count = parms.poly_modulus_degree();
    let flag = select_mask(value < 0);
    for (j, q) in parms.coeff_modulus().iter().enumerate() {
        destination[i + j * coeff_count] = (value as u64).wrapping_add(flag & q.value());
    }
}

/// Samples a ternary polynomial with coefficients uniform in {-1, 0, 1}.
///
/// One draw per coefficient; `-1` is stored as `q_j - 1` in limb `j`.
pub fn sample_poly_ternary<R>(rng: &mut R, parms: &EncryptionParams, destination: &mut [u64])
where
    R: RngCore + CryptoRng + ?Sized,
{
    debug_assert_eq!(destination.len(), parms.poly_len());
    let coeff_count = parms.poly_modulus_degree();
    let dist = Uniform::new_inclusive(0u64, 2);

    for i in 0..coeff_count {
        let rand = dist.sample(rng);
        let flag = select_mask(rand == 0);
        for (j, q) in parms.coeff_modulus().iter().enumerate() {
            destination[i + j * coeff_count] =
                rand.wrapping_add(flag & q.value()).wrapping_sub(1);
        }
    }
}

/// Samples from the clipped, rounded normal distribution.
///
/// A max deviation of zero fills the buffer with zeros without drawing.
pub fn sample_poly_normal<R>(
    rng: &mut R,
    parms: &EncryptionParams,
    destination: &mut [u64],
) -> Result<()>
where
    R: RngCore + CryptoRng + ?Sized,
{
    debug_assert_eq!(destination.len(), parms.poly_len());
    let noise = parms.noise();
    if are_close(noise.max_deviation, 0.0) {
        set_zero_poly(destination);
        return Ok(());
    }

    let dist = ClippedNormal::new(0.0, noise.standard_deviation, noise.max_deviation)?;
    for i in 0..parms.poly_modulus_degree() {
        let value = dist.sample(rng).round() as i64;
        write_signed(destination, parms, i, value);
    }
    Ok(())
}

/// Samples from the centered binomial distribution.
///
/// Only σ = 3.2 is supported; other values fail with `UnsupportedParameter`
/// before anything is drawn. A max deviation of zero still zero-fills first.
pub fn sample_poly_cbd<R>(
    rng: &mut R,
    parms: &EncryptionParams,
    destination: &mut [u64],
) -> Result<()>
where
    R: RngCore + CryptoRng + ?Sized,
{
    debug_assert_eq!(destination.len(), parms.poly_len());
    let noise = parms.noise();
    if are_close(noise.max_deviation, 0.0) {
        set_zero_poly(destination);
        return Ok(());
    }
    check_cbd_supported(noise.standard_deviation)?;

    for i in 0..parms.poly_modulus_degree() {
        let value = sample_cbd(rng);
        write_signed(destination, parms, i, value);
    }
    Ok(())
}

/// Samples an error polynomial from the configured distribution.
pub fn sample_poly_noise<R>(
    rng: &mut R,
    parms: &EncryptionParams,
    destination: &mut [u64],
) -> Result<()>
where
    R: RngCore + CryptoRng + ?Sized,
{
    match parms.noise().distribution {
        NoiseDistribution::Gaussian => sample_poly_normal(rng, parms, destination),
        NoiseDistribution::CenteredBinomial => sample_poly_cbd(rng, parms, destination),
    }
}

/// Fails if the noise configuration would make `sample_poly_noise` fail.
pub(crate) fn check_noise_supported(parms: &EncryptionParams) -> Result<()> {
    let noise = parms.noise();
    noise.validate()?;
    if are_close(noise.max_deviation, 0.0) {
        return Ok(());
    }
    match noise.distribution {
        NoiseDistribution::Gaussian => {
            ClippedNormal::new(0.0, noise.standard_deviation, noise.max_deviation).map(|_| ())
        }
        NoiseDistribution::CenteredBinomial => check_cbd_supported(noise.standard_deviation),
    }
}

fn check_cbd_supported(standard_deviation: f64) -> Result<()> {
    if are_close(standard_deviation, CBD_STANDARD_DEVIATION) {
        Ok(())
    } else {
        Err(Error::UnsupportedParameter { standard_deviation })
    }
}

/// Samples a polynomial uniformly over `[0, q_j)` in every limb.
///
/// Each coefficient is built from two 32-bit draws and rejected while it is at
/// least the largest multiple of q_j below 2^64, so reduction has no bias.
pub fn sample_poly_uniform<R>(rng: &mut R, parms: &EncryptionParams, destination: &mut [u64])
where
    R: RngCore + CryptoRng + ?Sized,
{
    debug_assert_eq!(destination.len(), parms.poly_len());
    let coeff_count = parms.poly_modulus_degree();

    for (limb, q) in destination
        .chunks_exact_mut(coeff_count)
        .zip(parms.coeff_modulus())
    {
        let max_multiple = u64::MAX - q.barrett_reduce_64(u64::MAX) - 1;
        for c in limb.iter_mut() {
            let rand = loop {
                let r = ((rng.next_u32() as u64) << 32) | rng.next_u32() as u64;
                if r < max_multiple {
                    break r;
                }
            };
            *c = q.barrett_reduce_64(rand);
        }
    }
}

/// Samples a uniform polynomial from the ChaCha20 stream keyed by `seed`.
///
/// Used both when a symmetric ciphertext is created and when its compressed
/// second component is expanded, so the two are bit-identical.
pub fn sample_poly_uniform_from_seed(
    seed: &RandomSeed,
    parms: &EncryptionParams,
    destination: &mut [u64],
) {
    let mut rng = seeded_rng(seed);
    sample_poly_uniform(&mut rng, parms, destination);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NoiseConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn parms(n: usize, moduli: &[u64]) -> EncryptionParams {
        EncryptionParams::new(n, moduli).unwrap()
    }

    fn centered(v: u64, q: u64) -> i64 {
        if v > q / 2 {
            -((q - v) as i64)
        } else {
            v as i64
        }
    }

    /// Every limb must hold the same signed value, bounded by `bound`.
    fn assert_consistent(poly: &[u64], parms: &EncryptionParams, bound: i64) {
        let n = parms.poly_modulus_degree();
        let moduli = parms.coeff_modulus();
        for i in 0..n {
            let first = centered(poly[i], moduli[0].value());
            assert!(first.abs() <= bound, "coefficient {} = {}", i, first);
            for (j, q) in moduli.iter().enumerate() {
                let v = poly[i + j * n];
                assert!(v < q.value());
                assert_eq!(centered(v, q.value()), first, "limb {} coeff {}", j, i);
            }
        }
    }

    #[test]
    fn test_ternary_cross_limb_consistency() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let parms = parms(64, &[97, 193, 12289, 1152921504606830593]);
        let mut poly = vec![0u64; parms.poly_len()];

        sample_poly_ternary(&mut rng, &parms, &mut poly);
        assert_consistent(&poly, &parms, 1);
    }

    #[test]
    fn test_ternary_hits_all_values() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let parms = parms(1024, &[41]);
        let mut poly = vec![0u64; parms.poly_len()];
        sample_poly_ternary(&mut rng, &parms, &mut poly);

        for v in [0u64, 1, 40] {
            let count = poly.iter().filter(|&&c| c == v).count();
            assert!(count > 250, "value {} drawn only {} times", v, count);
        }
    }

    #[test]
    fn test_normal_cross_limb_consistency() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let noise = NoiseConfig::default().with_distribution(NoiseDistribution::Gaussian);
        let parms = parms(256, &[97, 193]).with_noise(noise).unwrap();
        let mut poly = vec![0u64; parms.poly_len()];

        sample_poly_normal(&mut rng, &parms, &mut poly).unwrap();
        assert_consistent(&poly, &parms, 19);
        assert!(poly.iter().any(|&c| c != 0));
    }

    #[test]
    fn test_cbd_cross_limb_consistency() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let noise = NoiseConfig::default().with_distribution(NoiseDistribution::CenteredBinomial);
        let parms = parms(256, &[97, 193, 113]).with_noise(noise).unwrap();
        let mut poly = vec![0u64; parms.poly_len()];

        sample_poly_cbd(&mut rng, &parms, &mut poly).unwrap();
        assert_consistent(&poly, &parms, 21);
    }

    #[test]
    fn test_zero_max_deviation_gives_zero_poly() {
        for (n, moduli) in [(2usize, vec![17u64]), (8, vec![41, 37]), (64, vec![97, 193, 12289])] {
            for distribution in [NoiseDistribution::Gaussian, NoiseDistribution::CenteredBinomial] {
                let parms = parms(n, &moduli)
                    .with_noise(NoiseConfig::zero().with_distribution(distribution))
                    .unwrap();
                let mut rng = ChaCha20Rng::seed_from_u64(3);
                let mut poly = vec![5u64; parms.poly_len()];

                sample_poly_noise(&mut rng, &parms, &mut poly).unwrap();
                assert!(poly.iter().all(|&c| c == 0));
            }
        }
    }

    #[test]
    fn test_zero_max_deviation_skips_sd_check() {
        let noise = NoiseConfig {
            standard_deviation: 5.0,
            max_deviation: 0.0,
            distribution: NoiseDistribution::CenteredBinomial,
        };
        let parms = parms(8, &[41, 37]).with_noise(noise).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut poly = vec![1u64; parms.poly_len()];

        assert!(sample_poly_cbd(&mut rng, &parms, &mut poly).is_ok());
        assert!(poly.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_cbd_unsupported_standard_deviation() {
        for sd in [0.5, 3.0, 3.3, 6.4] {
            for (n, moduli) in [(8usize, vec![41u64, 37]), (1024, vec![12289])] {
                let noise = NoiseConfig::with_standard_deviation(sd)
                    .with_distribution(NoiseDistribution::CenteredBinomial);
                let parms = parms(n, &moduli).with_noise(noise).unwrap();
                let mut rng = ChaCha20Rng::seed_from_u64(4);
                let mut poly = vec![0u64; parms.poly_len()];

                let err = sample_poly_cbd(&mut rng, &parms, &mut poly).unwrap_err();
                assert!(matches!(
                    err,
                    Error::UnsupportedParameter { standard_deviation } if standard_deviation == sd
                ));
                assert!(check_noise_supported(&parms).is_err());
            }
        }
    }

    #[test]
    fn test_uniform_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let parms = parms(512, &[2, 41, 12289, 1152921504606830593]);
        let mut poly = vec![0u64; parms.poly_len()];

        sample_poly_uniform(&mut rng, &parms, &mut poly);
        for (limb, q) in poly.chunks_exact(512).zip(parms.coeff_modulus()) {
            assert!(limb.iter().all(|&c| c < q.value()));
        }
    }

    #[test]
    fn test_uniform_chi_square() {
        let q = 41u64;
        let parms = parms(4096, &[q]);
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let mut counts = vec![0u64; q as usize];

        let mut poly = vec![0u64; parms.poly_len()];
        for _ in 0..10 {
            sample_poly_uniform(&mut rng, &parms, &mut poly);
            for &c in &poly {
                counts[c as usize] += 1;
            }
        }

        let total: u64 = counts.iter().sum();
        let expected = total as f64 / q as f64;
        let chi2: f64 = counts
            .iter()
            .map(|&o| {
                let d = o as f64 - expected;
                d * d / expected
            })
            .sum();

        // 40 degrees of freedom; the 0.999 quantile is about 73.4.
        assert!(chi2 < 73.4, "chi-square statistic {} too large", chi2);
    }

    #[test]
    fn test_uniform_limbs_are_independent() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let parms = parms(256, &[12289, 40961]);
        let mut poly = vec![0u64; parms.poly_len()];
        sample_poly_uniform(&mut rng, &parms, &mut poly);

        let agree = (0..256).filter(|&i| poly[i] == poly[i + 256]).count();
        assert!(agree < 5, "limbs agree on {} coefficients", agree);
    }

    #[test]
    fn test_uniform_from_seed_is_deterministic() {
        let parms = parms(8, &[41, 37]);
        let mut seed = [0u8; 32];
        seed[0] = 1;

        let mut a = vec![0u64; parms.poly_len()];
        let mut b = vec![0u64; parms.poly_len()];
        sample_poly_uniform_from_seed(&seed, &parms, &mut a);
        sample_poly_uniform_from_seed(&seed, &parms, &mut b);
        assert_eq!(a, b);

        seed[0] = 2;
        sample_poly_uniform_from_seed(&seed, &parms, &mut b);
        assert_ne!(a, b);
    }
}
