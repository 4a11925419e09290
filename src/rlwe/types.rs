//! RLWE key and ciphertext containers.
//!
//! All polynomials are RNS buffers over R_q = Z_q[X]/(X^n + 1) laid out
//! limb-major. Keys always live at the key level of a `Context`; ciphertexts
//! record the chain level they were produced at.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::context::{Context, ParmsId};
use crate::error::{Error, Result};
use crate::math::poly::is_reduced;
use crate::math::sampling::sample_poly_uniform_from_seed;
use crate::rng::{seed_from_words, RandomSeed, SEED_U64_COUNT};

/// First word of a seed-compressed second component.
///
/// No supported modulus reaches 2^64 - 1, so it never appears as a residue.
pub const SEED_SENTINEL: u64 = u64::MAX;

/// RLWE secret key: one key-level polynomial in NTT form.
///
/// The coefficients are zeroized on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    data: Vec<u64>,
}

impl SecretKey {
    /// Wraps a key-level polynomial that is already in NTT form.
    pub fn from_ntt_data(data: Vec<u64>) -> Self {
        Self { data }
    }

    /// The key polynomial, limb-major, NTT form.
    pub fn data(&self) -> &[u64] {
        &self.data
    }

    /// Returns true if the key has the key-level shape and every value is
    /// reduced.
    pub fn is_valid_for(&self, context: &Context) -> bool {
        let parms = context.key_context_data().parms();
        is_reduced(&self.data, parms.poly_modulus_degree(), parms.coeff_modulus())
    }

    pub(crate) fn has_shape_of(&self, context: &Context) -> bool {
        self.data.len() == context.key_context_data().parms().poly_len()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("len", &self.data.len())
            .finish_non_exhaustive()
    }
}

/// RLWE public key: an NTT-form key-level ciphertext `(-(a·s + e), a, ...)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicKey {
    ct: Ciphertext,
}

impl PublicKey {
    pub fn from_ciphertext(ct: Ciphertext) -> Self {
        Self { ct }
    }

    pub fn data(&self) -> &Ciphertext {
        &self.ct
    }

    /// Number of polynomials; at least 2 for a valid key.
    pub fn size(&self) -> usize {
        self.ct.size()
    }

    /// Returns true if the key is a reduced NTT-form ciphertext at the key
    /// level with at least two components.
    pub fn is_valid_for(&self, context: &Context) -> bool {
        let parms = context.key_context_data().parms();
        self.has_shape_of(context)
            && self.ct.is_ntt_form()
            && self.ct.data.chunks_exact(parms.poly_len()).all(|poly| {
                is_reduced(poly, parms.poly_modulus_degree(), parms.coeff_modulus())
            })
    }

    pub(crate) fn has_shape_of(&self, context: &Context) -> bool {
        let parms = context.key_context_data().parms();
        self.ct.size() >= 2
            && self.ct.parms_id() == context.key_parms_id()
            && self.ct.coeff_count() == parms.poly_modulus_degree()
            && self.ct.coeff_modulus_size() == parms.coeff_modulus_size()
            && self.ct.data.len() == self.ct.size() * parms.poly_len()
    }
}

/// RLWE ciphertext: `size` RNS polynomials at one chain level.
///
/// # Seed compression
///
/// A two-component ciphertext whose second component starts with
/// [`SEED_SENTINEL`] is seed-compressed: the next `SEED_U64_COUNT` words hold
/// the seed of the uniform component, the rest is zero. Call
/// [`Ciphertext::expand_seed`] before reading it as coefficients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub(crate) data: Vec<u64>,
    size: usize,
    coeff_count: usize,
    coeff_modulus_size: usize,
    parms_id: ParmsId,
    is_ntt_form: bool,
    scale: f64,
}

impl Default for Ciphertext {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            size: 0,
            coeff_count: 0,
            coeff_modulus_size: 0,
            parms_id: ParmsId::KEY_LEVEL,
            is_ntt_form: false,
            scale: 1.0,
        }
    }
}

impl Ciphertext {
    /// An empty ciphertext, ready to be resized by an encryption.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ciphertext from raw parts, checking the shape against `context`.
    pub fn from_parts(
        context: &Context,
        parms_id: ParmsId,
        size: usize,
        data: Vec<u64>,
        is_ntt_form: bool,
    ) -> Result<Self> {
        let parms = context.get_context_data(parms_id)?.parms();
        if data.len() != size * parms.poly_len() {
            return Err(Error::InvalidCiphertext("data length does not match shape"));
        }
        Ok(Self {
            data,
            size,
            coeff_count: parms.poly_modulus_degree(),
            coeff_modulus_size: parms.coeff_modulus_size(),
            parms_id,
            is_ntt_form,
            scale: 1.0,
        })
    }

    /// Reshapes to `size` zeroed polynomials at `parms_id`.
    pub fn resize(&mut self, context: &Context, parms_id: ParmsId, size: usize) -> Result<()> {
        let parms = context.get_context_data(parms_id)?.parms();
        self.data.clear();
        self.data.resize(size * parms.poly_len(), 0);
        self.size = size;
        self.coeff_count = parms.poly_modulus_degree();
        self.coeff_modulus_size = parms.coeff_modulus_size();
        self.parms_id = parms_id;
        Ok(())
    }

    /// Releases the data and resets to the empty state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn coeff_count(&self) -> usize {
        self.coeff_count
    }

    pub fn coeff_modulus_size(&self) -> usize {
        self.coeff_modulus_size
    }

    /// Words per polynomial.
    pub fn poly_len(&self) -> usize {
        self.coeff_count * self.coeff_modulus_size
    }

    pub fn parms_id(&self) -> ParmsId {
        self.parms_id
    }

    pub fn is_ntt_form(&self) -> bool {
        self.is_ntt_form
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub(crate) fn set_ntt_form(&mut self, is_ntt_form: bool) {
        self.is_ntt_form = is_ntt_form;
    }

    pub(crate) fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// The whole buffer, polynomial-major.
    pub fn data(&self) -> &[u64] {
        &self.data
    }

    /// Polynomial `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    pub fn poly(&self, index: usize) -> &[u64] {
        let len = self.poly_len();
        &self.data[index * len..(index + 1) * len]
    }

    pub fn poly_mut(&mut self, index: usize) -> &mut [u64] {
        let len = self.poly_len();
        &mut self.data[index * len..(index + 1) * len]
    }

    /// The first two polynomials, both mutable.
    pub(crate) fn first_two_polys_mut(&mut self) -> (&mut [u64], &mut [u64]) {
        let len = self.poly_len();
        let (c0, rest) = self.data.split_at_mut(len);
        (c0, &mut rest[..len])
    }

    /// Returns true if the second component holds a seed instead of
    /// coefficients.
    pub fn is_seed_compressed(&self) -> bool {
        let len = self.poly_len();
        self.size == 2
            && len >= 1 + SEED_U64_COUNT
            && self.data.len() == 2 * len
            && self.data[len] == SEED_SENTINEL
    }

    /// The stored seed of a seed-compressed ciphertext.
    pub fn seed(&self) -> Option<RandomSeed> {
        if self.is_seed_compressed() {
            let c1 = self.poly(1);
            Some(seed_from_words(&c1[1..1 + SEED_U64_COUNT]))
        } else {
            None
        }
    }

    /// Regenerates the uniform second component from its stored seed.
    ///
    /// Does nothing if the ciphertext is not seed-compressed. The regenerated
    /// component is the seeded sample itself, with no transform applied.
    pub fn expand_seed(&mut self, context: &Context) -> Result<()> {
        let seed = match self.seed() {
            Some(seed) => seed,
            None => return Ok(()),
        };

        let parms = context.get_context_data(self.parms_id)?.parms();
        if parms.poly_modulus_degree() != self.coeff_count
            || parms.coeff_modulus_size() != self.coeff_modulus_size
        {
            return Err(Error::InvalidCiphertext("shape does not match parms id"));
        }

        sample_poly_uniform_from_seed(&seed, parms, self.poly_mut(1));
        Ok(())
    }

    /// Returns true if the shape matches `context` and every value is reduced.
    ///
    /// A seed-compressed ciphertext is never reduced; expand it first.
    pub fn is_valid_for(&self, context: &Context) -> bool {
        let parms = match context.get_context_data(self.parms_id) {
            Ok(data) => data.parms(),
            Err(_) => return false,
        };
        self.coeff_count == parms.poly_modulus_degree()
            && self.coeff_modulus_size == parms.coeff_modulus_size()
            && self.data.len() == self.size * parms.poly_len()
            && self.data.chunks_exact(parms.poly_len()).all(|poly| {
                is_reduced(poly, parms.poly_modulus_degree(), parms.coeff_modulus())
            })
    }
}
