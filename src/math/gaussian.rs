//! Error distributions over Z
//!
//! Provides the clipped normal distribution and the centered binomial draw
//! used for error terms. Both produce signed integers; mapping into RNS form
//! is done by the polynomial samplers in `sampling`.

use rand::distributions::Distribution;
use rand::{Rng, RngCore};
use rand_distr::Normal;

use crate::error::{params_err, Result};

/// The only standard deviation supported by the centered binomial draw.
pub const CBD_STANDARD_DEVIATION: f64 = 3.2;

/// Relative closeness test for configuration values.
///
/// Values are close when they differ by less than machine epsilon scaled by
/// the larger magnitude (at least 1).
pub fn are_close(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() < f64::EPSILON * scale
}

/// Normal distribution with samples beyond `max_deviation` redrawn.
#[derive(Debug, Clone, Copy)]
pub struct ClippedNormal {
    normal: Normal<f64>,
    max_deviation: f64,
}

impl ClippedNormal {
    /// Creates the distribution N(mean, standard_deviation) clipped at
    /// `mean ± max_deviation`.
    pub fn new(mean: f64, standard_deviation: f64, max_deviation: f64) -> Result<Self> {
        if !max_deviation.is_finite() || max_deviation < 0.0 {
            return Err(params_err!("max deviation {} is not valid", max_deviation));
        }
        if !standard_deviation.is_finite() || standard_deviation < 0.0 {
            return Err(params_err!(
                "standard deviation {} is not valid",
                standard_deviation
            ));
        }
        let normal = Normal::new(mean, standard_deviation).map_err(|e| {
            params_err!("standard deviation {} is not valid: {}", standard_deviation, e)
        })?;
        Ok(Self {
            normal,
            max_deviation,
        })
    }

    pub fn mean(&self) -> f64 {
        self.normal.mean()
    }

    pub fn standard_deviation(&self) -> f64 {
        self.normal.std_dev()
    }

    pub fn max_deviation(&self) -> f64 {
        self.max_deviation
    }
}

impl Distribution<f64> for ClippedNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let mean = self.normal.mean();
        loop {
            let x = self.normal.sample(rng);
            if (x - mean).abs() <= self.max_deviation {
                return x;
            }
        }
    }
}

/// Draws one centered binomial value from 6 random bytes.
///
/// The third and sixth bytes keep only their low 5 bits, so the result is
/// `hw(b0)+hw(b1)+hw(b2) - hw(b3)-hw(b4)-hw(b5)` in `[-21, 21]` with variance
/// 10.5 ≈ 3.2².
#[inline]
pub fn sample_cbd<R: RngCore + ?Sized>(rng: &mut R) -> i64 {
    let mut x = [0u8; 6];
    rng.fill_bytes(&mut x);
    x[2] &= 0x1F;
    x[5] &= 0x1F;

    let hw = |b: u8| b.count_ones() as i64;
    hw(x[0]) + hw(x[1]) + hw(x[2]) - hw(x[3]) - hw(x[4]) - hw(x[5])
}
