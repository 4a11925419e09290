//! Shared helpers for integration tests: key construction and decryption.
//!
//! Keys are built from the public samplers the same way a key generator would:
//! a ternary secret in NTT form, and a public key that is a symmetric
//! encryption of zero at the key level.

#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rlwe_zero::math::poly::{add_poly_assign, limb};
use rlwe_zero::math::sampling::sample_poly_ternary;
use rlwe_zero::rng::ChaChaFactory;
use rlwe_zero::{
    encrypt_zero_symmetric, Ciphertext, Context, EncryptionParams, PublicKey, SecretKey,
};
use tracing_subscriber::EnvFilter;

/// Largest centered binomial magnitude.
pub const CBD_BOUND: i64 = 21;

/// Routes library logs to the test harness, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn context(parms: EncryptionParams) -> Context {
    Context::new(parms).unwrap().with_key_validation(true)
}

pub fn generate_secret_key(context: &Context, seed: u64) -> SecretKey {
    let key_data = context.key_context_data();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut s = vec![0u64; key_data.parms().poly_len()];
    sample_poly_ternary(&mut rng, key_data.parms(), &mut s);
    key_data.ntt().forward(&mut s);
    SecretKey::from_ntt_data(s)
}

pub fn generate_public_key(context: &Context, sk: &SecretKey, seed: u8) -> PublicKey {
    let factory = ChaChaFactory::with_seed([seed; 32]);
    let mut ct = Ciphertext::new();
    encrypt_zero_symmetric(sk, context, context.key_parms_id(), true, false, &factory, &mut ct)
        .unwrap();
    PublicKey::from_ciphertext(ct)
}

/// Computes c0 + c1·s and returns its centered coefficients.
///
/// Asserts that every limb agrees on each coefficient, which holds whenever
/// the noise is far below every modulus.
pub fn decrypt_centered(ct: &Ciphertext, sk: &SecretKey, context: &Context) -> Vec<i64> {
    assert_eq!(ct.size(), 2, "helper only decrypts two-component ciphertexts");
    assert!(!ct.is_seed_compressed(), "expand the seed before decrypting");

    let data = context.get_context_data(ct.parms_id()).unwrap();
    let parms = data.parms();
    let ntt = data.ntt();
    let n = parms.poly_modulus_degree();

    let mut limbs = Vec::with_capacity(parms.coeff_modulus_size());
    for (i, q) in parms.coeff_modulus().iter().enumerate() {
        let mut c0 = limb(ct.poly(0), n, i).to_vec();
        let mut c1 = limb(ct.poly(1), n, i).to_vec();
        if !ct.is_ntt_form() {
            ntt.forward_limb(&mut c0, i);
            ntt.forward_limb(&mut c1, i);
        }

        let mut m = vec![0u64; n];
        ntt.dyadic_mul_limb(&c1, limb(sk.data(), n, i), &mut m, i);
        add_poly_assign(&mut m, &c0, q);
        ntt.inverse_limb(&mut m, i);

        limbs.push(m.into_iter().map(|v| q.to_centered(v)).collect::<Vec<i64>>());
    }

    for (i, other) in limbs.iter().enumerate().skip(1) {
        assert_eq!(&limbs[0], other, "limb {} disagrees with limb 0", i);
    }
    limbs.swap_remove(0)
}

pub fn max_abs(coeffs: &[i64]) -> i64 {
    coeffs.iter().map(|c| c.abs()).max().unwrap_or(0)
}
