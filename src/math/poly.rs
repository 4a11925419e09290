//! RNS polynomial buffers over R_q = Z_q[X]/(X^n + 1).
//!
//! A polynomial is a flat `[u64]` of `coeff_count * coeff_modulus_size` words
//! laid out limb-major: limb `i` occupies `[i * coeff_count, (i + 1) * coeff_count)`
//! and every value in it is reduced mod `coeff_modulus[i]`.
//!
//! The helpers here work on slices so that ciphertext components, key data and
//! scratch buffers can all be handled the same way.

use zeroize::Zeroizing;

use super::modulus::Modulus;

/// A polynomial buffer that is overwritten with zeros when dropped.
///
/// Used for every scratch value that may depend on secret material.
pub type ScratchPoly = Zeroizing<Vec<u64>>;

/// Allocates a zeroed scratch polynomial for `coeff_count` coefficients and
/// `coeff_modulus_size` limbs.
///
/// The buffer is zeroed again on drop, including early returns and unwinding.
pub fn allocate_poly(coeff_count: usize, coeff_modulus_size: usize) -> ScratchPoly {
    Zeroizing::new(vec![0u64; coeff_count * coeff_modulus_size])
}

/// Sets every coefficient of every limb to zero.
pub fn set_zero_poly(poly: &mut [u64]) {
    poly.iter_mut().for_each(|c| *c = 0);
}

/// Returns limb `idx` of `poly`.
#[inline]
pub fn limb(poly: &[u64], coeff_count: usize, idx: usize) -> &[u64] {
    &poly[idx * coeff_count..(idx + 1) * coeff_count]
}

/// Returns limb `idx` of `poly` mutably.
#[inline]
pub fn limb_mut(poly: &mut [u64], coeff_count: usize, idx: usize) -> &mut [u64] {
    &mut poly[idx * coeff_count..(idx + 1) * coeff_count]
}

/// `acc[k] = acc[k] + operand[k] mod q` over one limb.
pub fn add_poly_assign(acc: &mut [u64], operand: &[u64], modulus: &Modulus) {
    debug_assert_eq!(acc.len(), operand.len());
    for (a, &b) in acc.iter_mut().zip(operand) {
        *a = modulus.add(*a, b);
    }
}

/// Negates one limb in place.
pub fn negate_poly_assign(poly: &mut [u64], modulus: &Modulus) {
    for c in poly.iter_mut() {
        *c = modulus.negate(*c);
    }
}

/// Returns true if every limb value is reduced by its modulus.
pub fn is_reduced(poly: &[u64], coeff_count: usize, coeff_modulus: &[Modulus]) -> bool {
    poly.len() == coeff_count * coeff_modulus.len()
        && poly
            .chunks_exact(coeff_count)
            .zip(coeff_modulus)
            .all(|(limb, q)| limb.iter().all(|&c| c < q.value()))
}
