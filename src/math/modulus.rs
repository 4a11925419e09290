//! Coefficient modulus with precomputed Barrett constants.
//!
//! Every limb of an RNS polynomial is reduced by one `Modulus`. Reduction and
//! the add/sub/negate kernels are branch-free so that they can be applied to
//! secret-derived values.

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::error::{params_err, Error, Result};

/// Largest supported modulus bit length.
pub const MAX_MODULUS_BITS: u32 = 61;

/// Returns an all-ones mask when `cond` holds and zero otherwise.
#[inline(always)]
pub(crate) fn select_mask(cond: bool) -> u64 {
    (cond as u64).wrapping_neg()
}

/// A prime coefficient modulus q with 2 <= q < 2^61.
///
/// # Example
///
/// ```
/// use rlwe_zero::math::Modulus;
///
/// let q = Modulus::new(97).unwrap();
/// assert_eq!(q.barrett_reduce_64(1000), 1000 % 97);
/// assert_eq!(q.negate(5), 92);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Modulus {
    value: u64,
    /// High word of floor(2^128 / q).
    const_ratio: u64,
    bit_count: u32,
}

impl Modulus {
    /// Creates a modulus, rejecting values outside `[2, 2^61)`.
    ///
    /// Primality is checked by `EncryptionParams::validate`, not here.
    pub fn new(value: u64) -> Result<Self> {
        if value < 2 {
            return Err(params_err!("modulus {} is smaller than 2", value));
        }
        let bit_count = 64 - value.leading_zeros();
        if bit_count > MAX_MODULUS_BITS {
            return Err(params_err!(
                "modulus {} has {} bits, at most {} are supported",
                value,
                bit_count,
                MAX_MODULUS_BITS
            ));
        }
        let const_ratio = ((u128::MAX / value as u128) >> 64) as u64;

        Ok(Self {
            value,
            const_ratio,
            bit_count,
        })
    }

    /// Builds a modulus list from raw values.
    pub fn from_values(values: &[u64]) -> Result<Vec<Self>> {
        values.iter().map(|&q| Self::new(q)).collect()
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    #[inline]
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Reduces any 64-bit value into `[0, q)`.
    ///
    /// The quotient estimate is off by at most one, so one masked subtraction
    /// finishes the reduction.
    #[inline]
    pub fn barrett_reduce_64(&self, input: u64) -> u64 {
        let estimate = ((input as u128 * self.const_ratio as u128) >> 64) as u64;
        let r = input.wrapping_sub(estimate.wrapping_mul(self.value));
        r - (self.value & select_mask(r >= self.value))
    }

    /// (a + b) mod q for reduced inputs.
    #[inline]
    pub fn add(&self, a: u64, b: u64) -> u64 {
        let sum = a + b;
        sum - (self.value & select_mask(sum >= self.value))
    }

    /// (a - b) mod q for reduced inputs.
    #[inline]
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        a.wrapping_sub(b)
            .wrapping_add(self.value & select_mask(a < b))
    }

    /// -a mod q for a reduced input; zero stays zero.
    #[inline]
    pub fn negate(&self, a: u64) -> u64 {
        (self.value - a) & select_mask(a != 0)
    }

    /// (a * b) mod q.
    #[inline]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        ((a as u128 * b as u128) % self.value as u128) as u64
    }

    /// Maps a small signed value into `[0, q)` without branching on its sign.
    ///
    /// `|v|` must be smaller than q.
    #[inline]
    pub fn from_small_signed(&self, v: i64) -> u64 {
        (v as u64).wrapping_add(self.value & select_mask(v < 0))
    }

    /// Centered representative in `(-q/2, q/2]`.
    #[inline]
    pub fn to_centered(&self, a: u64) -> i64 {
        if a > self.value / 2 {
            -((self.value - a) as i64)
        } else {
            a as i64
        }
    }

    /// Deterministic Miller-Rabin test, exact for every 64-bit input.
    pub fn is_prime(&self) -> bool {
        is_prime(self.value)
    }
}

impl TryFrom<u64> for Modulus {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Modulus> for u64 {
    fn from(m: Modulus) -> u64 {
        m.value
    }
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1u64;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        exp >>= 1;
        base = mul_mod(base, base, m);
    }
    result
}

pub(crate) fn is_prime(n: u64) -> bool {
    const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    if n < 2 {
        return false;
    }
    for &p in WITNESSES.iter() {
        if n % p == 0 {
            return n == p;
        }
    }

    let mut d = n - 1;
    let mut s = 0;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    'witness: for &a in WITNESSES.iter() {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
