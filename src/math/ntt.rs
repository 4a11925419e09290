//! Number-Theoretic Transform (NTT) for negacyclic polynomial multiplication.
//!
//! Implements Cooley-Tukey radix-2 NTT over R_q = Z_q[X]/(X^n + 1) for every
//! limb of an RNS polynomial. Each limb is transformed independently with its
//! own twiddle table.
//!
//! # Representation
//!
//! Values in the NTT domain are kept in Montgomery form (multiplied by
//! R = 2^64 mod q). `forward_limb` converts in, `inverse_limb` converts out and
//! `dyadic_mul_limb` is a Montgomery product, so sums and products of
//! NTT-domain values stay consistent without explicit conversions.
//!
//! # Requirements
//!
//! Every modulus must satisfy q ≡ 1 (mod 2n) for a primitive 2n-th root of
//! unity to exist.
//!
//! # Example
//!
//! ```
//! use rlwe_zero::math::{Modulus, NttContext};
//!
//! let moduli = Modulus::from_values(&[97, 193]).unwrap();
//! let ctx = NttContext::new(16, &moduli).unwrap();
//!
//! let mut coeffs = vec![1u64; 32];
//! ctx.forward(&mut coeffs);
//! ctx.inverse(&mut coeffs);
//! assert!(coeffs.iter().all(|&c| c == 1));
//! ```

use super::modulus::{select_mask, Modulus};
use crate::error::{params_err, Result};

/// Montgomery constants and twiddle tables of one limb.
#[derive(Clone)]
struct LimbTables {
    modulus: Modulus,
    /// -q^(-1) mod 2^64.
    q_inv_neg: u64,
    /// R^2 mod q, used to enter Montgomery form.
    r_squared: u64,
    /// Powers of ψ (ψ^n = -1), bit-reversed, Montgomery form.
    psi: Vec<u64>,
    /// Powers of ψ^(-1), bit-reversed, Montgomery form.
    psi_inv: Vec<u64>,
    /// n^(-1) in Montgomery form.
    n_inv: u64,
}

impl LimbTables {
    fn new(n: usize, modulus: Modulus) -> Result<Self> {
        let q = modulus.value();
        let order = 2 * n as u64;
        if q % order != 1 {
            return Err(params_err!("modulus {} is not congruent to 1 mod {}", q, order));
        }

        let q_inv_neg = neg_inverse_mod_word(q);
        let r = ((1u128 << 64) % q as u128) as u64;
        let r_squared = modulus.mul(r, r);

        let root = primitive_root(order, &modulus)
            .ok_or_else(|| params_err!("no primitive {}-th root of unity mod {}", order, q))?;
        let root_inv = pow_mod(root, q - 2, &modulus);
        let n_inv = pow_mod(n as u64, q - 2, &modulus);

        let mut tables = Self {
            modulus,
            q_inv_neg,
            r_squared,
            psi: Vec::new(),
            psi_inv: Vec::new(),
            n_inv: 0,
        };
        tables.psi = tables.bit_reversed_powers(n, tables.enter(root));
        tables.psi_inv = tables.bit_reversed_powers(n, tables.enter(root_inv));
        tables.n_inv = tables.enter(n_inv);
        Ok(tables)
    }

    #[inline]
    fn q(&self) -> u64 {
        self.modulus.value()
    }

    /// Montgomery reduction of a 128-bit product: ab · R^(-1) mod q.
    #[inline]
    fn reduce(&self, ab: u128) -> u64 {
        let q = self.q();
        let m = (ab as u64).wrapping_mul(self.q_inv_neg) as u128;
        let t = ((ab + m * q as u128) >> 64) as u64;
        t - (q & select_mask(t >= q))
    }

    #[inline]
    fn mont_mul(&self, a: u64, b: u64) -> u64 {
        self.reduce(a as u128 * b as u128)
    }

    #[inline]
    fn enter(&self, a: u64) -> u64 {
        self.mont_mul(a, self.r_squared)
    }

    #[inline]
    fn leave(&self, a: u64) -> u64 {
        self.mont_mul(a, 1)
    }

    /// Entry `m + i` of the table holds the twiddle used by butterfly group
    /// `i` at stage `m`: ψ^bitrev(m + i).
    fn bit_reversed_powers(&self, n: usize, root: u64) -> Vec<u64> {
        let one = self.enter(1);
        let mut table = vec![0u64; n];
        table[1] = one;

        for m in 1..n {
            table[m] = if m.is_power_of_two() {
                let mut pow = one;
                for _ in 0..n / (2 * m) {
                    pow = self.mont_mul(pow, root);
                }
                pow
            } else {
                // Split off the lowest set bit.
                let low = m & m.wrapping_neg();
                self.mont_mul(table[m ^ low], table[low])
            };
        }
        table
    }

    fn forward(&self, coeffs: &mut [u64]) {
        let n = coeffs.len();
        let mut half = n;
        let mut groups = 1;

        while groups < n {
            half >>= 1;
            for (i, block) in coeffs.chunks_exact_mut(2 * half).enumerate() {
                let w = self.psi[groups + i];
                let (lo, hi) = block.split_at_mut(half);
                for (x, y) in lo.iter_mut().zip(hi.iter_mut()) {
                    let u = *x;
                    let v = self.mont_mul(*y, w);
                    *x = self.modulus.add(u, v);
                    *y = self.modulus.sub(u, v);
                }
            }
            groups <<= 1;
        }
    }

    fn inverse(&self, coeffs: &mut [u64]) {
        let n = coeffs.len();
        let mut half = 1;
        let mut groups = n;

        while groups > 1 {
            groups >>= 1;
            for (i, block) in coeffs.chunks_exact_mut(2 * half).enumerate() {
                let w = self.psi_inv[groups + i];
                let (lo, hi) = block.split_at_mut(half);
                for (x, y) in lo.iter_mut().zip(hi.iter_mut()) {
                    let u = *x;
                    let v = *y;
                    *x = self.modulus.add(u, v);
                    *y = self.mont_mul(self.modulus.sub(u, v), w);
                }
            }
            half <<= 1;
        }

        for c in coeffs.iter_mut() {
            *c = self.mont_mul(*c, self.n_inv);
        }
    }
}

/// -q^(-1) mod 2^64 for odd q, by Newton iteration.
fn neg_inverse_mod_word(q: u64) -> u64 {
    // q·q ≡ 1 (mod 8) for odd q: three correct bits to start.
    let mut inv = q;
    for _ in 0..5 {
        inv = inv.wrapping_mul(2u64.wrapping_sub(q.wrapping_mul(inv)));
    }
    inv.wrapping_neg()
}

fn pow_mod(base: u64, mut exp: u64, modulus: &Modulus) -> u64 {
    let mut result = 1u64;
    let mut base = modulus.barrett_reduce_64(base);
    while exp > 0 {
        if exp & 1 == 1 {
            result = modulus.mul(result, base);
        }
        base = modulus.mul(base, base);
        exp >>= 1;
    }
    result
}

/// Some primitive `order`-th root of unity, for a power-of-two `order`
/// dividing q - 1.
fn primitive_root(order: u64, modulus: &Modulus) -> Option<u64> {
    let q = modulus.value();
    let cofactor = (q - 1) / order;
    (2..q)
        .map(|g| pow_mod(g, cofactor, modulus))
        .find(|&candidate| pow_mod(candidate, order / 2, modulus) == q - 1)
}

/// Precomputed NTT tables for one ring dimension and modulus list.
///
/// Create once per parameter level and share it; all methods take `&self`.
#[derive(Clone)]
pub struct NttContext {
    /// Ring dimension (power of two).
    n: usize,
    limbs: Vec<LimbTables>,
}

impl NttContext {
    /// Creates an NTT context for the given dimension and moduli.
    ///
    /// # Arguments
    ///
    /// * `n` - Ring dimension (power of two, at least 2)
    /// * `moduli` - RNS base; each must satisfy q ≡ 1 (mod 2n)
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` if the dimension is unsupported or some
    /// modulus is not NTT-friendly for it.
    pub fn new(n: usize, moduli: &[Modulus]) -> Result<Self> {
        if n < 2 || !n.is_power_of_two() {
            return Err(params_err!("NTT dimension {} must be a power of two >= 2", n));
        }
        if moduli.is_empty() {
            return Err(params_err!("NTT needs at least one modulus"));
        }

        let limbs = moduli
            .iter()
            .map(|&modulus| LimbTables::new(n, modulus))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { n, limbs })
    }

    /// Returns the ring dimension.
    pub fn dimension(&self) -> usize {
        self.n
    }

    /// Number of RNS limbs this context transforms.
    pub fn limb_count(&self) -> usize {
        self.limbs.len()
    }

    /// Forward NTT of one limb in place.
    ///
    /// Input coefficients are reduced mod q; the output is in Montgomery form.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs.len() != n` or `idx` is out of range.
    pub fn forward_limb(&self, coeffs: &mut [u64], idx: usize) {
        assert_eq!(coeffs.len(), self.n, "limb length must match dimension");
        let tables = &self.limbs[idx];
        for c in coeffs.iter_mut() {
            *c = tables.enter(*c);
        }
        tables.forward(coeffs);
    }

    /// Inverse NTT of one limb in place, leaving plain coefficients.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs.len() != n` or `idx` is out of range.
    pub fn inverse_limb(&self, coeffs: &mut [u64], idx: usize) {
        assert_eq!(coeffs.len(), self.n, "limb length must match dimension");
        let tables = &self.limbs[idx];
        tables.inverse(coeffs);
        for c in coeffs.iter_mut() {
            *c = tables.leave(*c);
        }
    }

    /// Pointwise product of two NTT-domain limbs, written to `result`.
    pub fn dyadic_mul_limb(&self, a: &[u64], b: &[u64], result: &mut [u64], idx: usize) {
        assert!(
            a.len() == self.n && b.len() == self.n && result.len() == self.n,
            "limb length must match dimension"
        );
        let tables = &self.limbs[idx];
        for ((r, &x), &y) in result.iter_mut().zip(a).zip(b) {
            *r = tables.mont_mul(x, y);
        }
    }

    /// Forward NTT of every limb of an RNS polynomial.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs.len() != n * limb_count`.
    pub fn forward(&self, coeffs: &mut [u64]) {
        assert_eq!(coeffs.len(), self.n * self.limb_count(), "polynomial length mismatch");
        for (idx, limb) in coeffs.chunks_exact_mut(self.n).enumerate() {
            self.forward_limb(limb, idx);
        }
    }

    /// Inverse NTT of every limb of an RNS polynomial.
    pub fn inverse(&self, coeffs: &mut [u64]) {
        assert_eq!(coeffs.len(), self.n * self.limb_count(), "polynomial length mismatch");
        for (idx, limb) in coeffs.chunks_exact_mut(self.n).enumerate() {
            self.inverse_limb(limb, idx);
        }
    }
}

impl std::fmt::Debug for NttContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let moduli: Vec<u64> = self.limbs.iter().map(LimbTables::q).collect();
        f.debug_struct("NttContext")
            .field("n", &self.n)
            .field("moduli", &moduli)
            .finish()
    }
}
