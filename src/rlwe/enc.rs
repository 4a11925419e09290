//! Encryptions of zero.
//!
//! Asymmetric: `c_j = pk_j · u + e_j` for a ternary `u`.
//! Symmetric: `(c0, c1) = (-(c1 · s + e), c1)` for a uniform `c1` drawn from a
//! seeded stream, so that `c1` can be stored as its seed.
//!
//! Both generators leave the destination cleared on any error.

use tracing::{debug, trace_span};

use super::types::{Ciphertext, PublicKey, SecretKey, SEED_SENTINEL};
use crate::context::{Context, ContextData, ParmsId};
use crate::error::{Error, Result};
use crate::math::poly::{add_poly_assign, allocate_poly, limb, limb_mut, negate_poly_assign};
use crate::math::sampling::{
    check_noise_supported, sample_poly_noise, sample_poly_ternary, sample_poly_uniform_from_seed,
};
use crate::rng::{generate_seed, seed_to_words, RandomGeneratorFactory, SEED_U64_COUNT};

/// Checks that a polynomial of `available` words can hold the seed marker
/// followed by the seed.
pub fn check_seed_capacity(available: usize) -> Result<()> {
    let required = SEED_U64_COUNT + 1;
    if available < required {
        Err(Error::CapacityTooSmall {
            required,
            available,
        })
    } else {
        Ok(())
    }
}

/// Encrypts zero with a public key.
///
/// # Arguments
///
/// * `public_key` - Key-level public key in NTT form
/// * `context` - Context the key was made for
/// * `parms_id` - Chain level of the output
/// * `is_ntt_form` - Whether the output is left in NTT form
/// * `factory` - Source of the generator for `u` and the noise
/// * `destination` - Resized to `public_key.size()` components
///
/// # Errors
///
/// * `UnknownParmsId` if `parms_id` is not in the chain
/// * `InvalidKey` if the key does not fit the context
/// * `UnsupportedParameter` / `InvalidParameters` for an unusable noise config
pub fn encrypt_zero_asymmetric<F>(
    public_key: &PublicKey,
    context: &Context,
    parms_id: ParmsId,
    is_ntt_form: bool,
    factory: &F,
    destination: &mut Ciphertext,
) -> Result<()>
where
    F: RandomGeneratorFactory + ?Sized,
{
    let context_data = context.get_context_data(parms_id)?;
    if !public_key.has_shape_of(context)
        || (context.validates_keys() && !public_key.is_valid_for(context))
    {
        return Err(Error::InvalidKey(
            "public key is not valid for encryption parameters",
        ));
    }
    check_noise_supported(context_data.parms())?;

    let _span = trace_span!(
        "encrypt_zero_asymmetric",
        level = parms_id.0,
        size = public_key.size(),
        is_ntt_form
    )
    .entered();

    let result = asymmetric_inner(public_key, context, context_data, is_ntt_form, factory, destination);
    if result.is_err() {
        destination.clear();
    }
    result
}

fn asymmetric_inner<F>(
    public_key: &PublicKey,
    context: &Context,
    context_data: &ContextData,
    is_ntt_form: bool,
    factory: &F,
    destination: &mut Ciphertext,
) -> Result<()>
where
    F: RandomGeneratorFactory + ?Sized,
{
    let parms = context_data.parms();
    let ntt = context_data.ntt();
    let coeff_count = parms.poly_modulus_degree();
    let coeff_modulus_size = parms.coeff_modulus_size();
    let encrypted_size = public_key.size();
    let pk = public_key.data();

    destination.resize(context, context_data.parms_id(), encrypted_size)?;
    destination.set_ntt_form(is_ntt_form);
    destination.set_scale(1.0);

    let mut rng = factory.create();

    // u is transformed one limb at a time and reused for every component.
    let mut u = allocate_poly(coeff_count, coeff_modulus_size);
    sample_poly_ternary(&mut rng, parms, &mut u);

    for i in 0..coeff_modulus_size {
        let u_limb = limb_mut(&mut u, coeff_count, i);
        ntt.forward_limb(u_limb, i);

        for j in 0..encrypted_size {
            let pk_limb = limb(pk.poly(j), coeff_count, i);
            let dest_limb = limb_mut(destination.poly_mut(j), coeff_count, i);
            ntt.dyadic_mul_limb(u_limb, pk_limb, dest_limb, i);
            if !is_ntt_form {
                ntt.inverse_limb(dest_limb, i);
            }
        }
    }

    // Noise goes in only after every u-product exists; the buffer of u is
    // reused for each e_j.
    let e = &mut u;
    for j in 0..encrypted_size {
        sample_poly_noise(&mut rng, parms, e)?;
        let dest = destination.poly_mut(j);
        for (i, q) in parms.coeff_modulus().iter().enumerate() {
            let e_limb = limb_mut(e, coeff_count, i);
            if is_ntt_form {
                ntt.forward_limb(e_limb, i);
            }
            add_poly_assign(limb_mut(dest, coeff_count, i), e_limb, q);
        }
    }

    Ok(())
}

/// Encrypts zero with a secret key.
///
/// With `save_seed`, the second component is replaced by [`SEED_SENTINEL`]
/// followed by its seed; see [`Ciphertext::expand_seed`]. Compression is
/// silently dropped when one polynomial is too small to hold the seed.
///
/// # Errors
///
/// * `UnknownParmsId` if `parms_id` is not in the chain
/// * `InvalidKey` if the key does not fit the context
/// * `UnsupportedParameter` / `InvalidParameters` for an unusable noise config
pub fn encrypt_zero_symmetric<F>(
    secret_key: &SecretKey,
    context: &Context,
    parms_id: ParmsId,
    is_ntt_form: bool,
    save_seed: bool,
    factory: &F,
    destination: &mut Ciphertext,
) -> Result<()>
where
    F: RandomGeneratorFactory + ?Sized,
{
    let context_data = context.get_context_data(parms_id)?;
    if !secret_key.has_shape_of(context)
        || (context.validates_keys() && !secret_key.is_valid_for(context))
    {
        return Err(Error::InvalidKey(
            "secret key is not valid for encryption parameters",
        ));
    }
    check_noise_supported(context_data.parms())?;

    let save_seed = save_seed
        && match check_seed_capacity(context_data.parms().poly_len()) {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "seed compression disabled");
                false
            }
        };

    let _span = trace_span!(
        "encrypt_zero_symmetric",
        level = parms_id.0,
        is_ntt_form,
        save_seed
    )
    .entered();

    let result = symmetric_inner(
        secret_key,
        context,
        context_data,
        is_ntt_form,
        save_seed,
        factory,
        destination,
    );
    if result.is_err() {
        destination.clear();
    }
    result
}

fn symmetric_inner<F>(
    secret_key: &SecretKey,
    context: &Context,
    context_data: &ContextData,
    is_ntt_form: bool,
    save_seed: bool,
    factory: &F,
    destination: &mut Ciphertext,
) -> Result<()>
where
    F: RandomGeneratorFactory + ?Sized,
{
    let parms = context_data.parms();
    let ntt = context_data.ntt();
    let coeff_count = parms.poly_modulus_degree();
    let coeff_modulus_size = parms.coeff_modulus_size();

    destination.resize(context, context_data.parms_id(), 2)?;
    destination.set_ntt_form(is_ntt_form);
    destination.set_scale(1.0);

    // The bootstrap stream yields the public seed and the noise; c1 comes
    // only from the stream keyed by that seed.
    let mut bootstrap = factory.create();
    let seed = generate_seed(&mut bootstrap);

    let (c0, c1) = destination.first_two_polys_mut();
    sample_poly_uniform_from_seed(&seed, parms, c1);

    // In coefficient form the seeded sample is c1 itself, so a compressed c1
    // expands without any transform.
    if !is_ntt_form && save_seed {
        for i in 0..coeff_modulus_size {
            ntt.forward_limb(limb_mut(c1, coeff_count, i), i);
        }
    }

    let mut noise = allocate_poly(coeff_count, coeff_modulus_size);
    sample_poly_noise(&mut bootstrap, parms, &mut noise)?;

    for (i, q) in parms.coeff_modulus().iter().enumerate() {
        let c0_limb = limb_mut(c0, coeff_count, i);
        ntt.dyadic_mul_limb(
            limb(secret_key.data(), coeff_count, i),
            limb(c1, coeff_count, i),
            c0_limb,
            i,
        );

        let e_limb = limb_mut(&mut noise, coeff_count, i);
        if is_ntt_form {
            ntt.forward_limb(e_limb, i);
        } else {
            ntt.inverse_limb(c0_limb, i);
        }

        add_poly_assign(c0_limb, e_limb, q);
        negate_poly_assign(c0_limb, q);
    }

    if !is_ntt_form && !save_seed {
        for i in 0..coeff_modulus_size {
            ntt.inverse_limb(limb_mut(c1, coeff_count, i), i);
        }
    }

    if save_seed {
        c1[0] = SEED_SENTINEL;
        c1[1..=SEED_U64_COUNT].copy_from_slice(&seed_to_words(&seed));
        c1[SEED_U64_COUNT + 1..].iter_mut().for_each(|w| *w = 0);
    }

    Ok(())
}
