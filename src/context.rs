//! Validated encryption context and its modulus-switching chain.
//!
//! A `Context` is built once from `EncryptionParams` and shared read-only by
//! every encryption. Level 0 (the key level) uses the full modulus list; each
//! following level drops the last prime, down to a single prime. Keys live at
//! the key level and ciphertexts may be produced at any level.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::math::NttContext;
use crate::params::EncryptionParams;

/// Identifies one level of a context's modulus chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParmsId(pub usize);

impl ParmsId {
    /// The level holding every modulus.
    pub const KEY_LEVEL: ParmsId = ParmsId(0);
}

/// Precomputed data for one chain level.
#[derive(Debug)]
pub struct ContextData {
    parms: EncryptionParams,
    parms_id: ParmsId,
    ntt: NttContext,
}

impl ContextData {
    pub fn parms(&self) -> &EncryptionParams {
        &self.parms
    }

    pub fn parms_id(&self) -> ParmsId {
        self.parms_id
    }

    pub fn ntt(&self) -> &NttContext {
        &self.ntt
    }
}

/// Immutable, cheaply cloneable encryption context.
///
/// # Example
///
/// ```
/// use rlwe_zero::context::{Context, ParmsId};
/// use rlwe_zero::params::EncryptionParams;
///
/// let context = Context::new(EncryptionParams::toy(1024).unwrap()).unwrap();
/// assert_eq!(context.chain_len(), 3);
/// let last = context.get_context_data(ParmsId(2)).unwrap();
/// assert_eq!(last.parms().coeff_modulus_size(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    chain: Arc<Vec<ContextData>>,
    validate_keys: bool,
}

impl Context {
    /// Validates `parms` and precomputes NTT tables for every chain level.
    ///
    /// Every modulus must satisfy q ≡ 1 (mod 2n).
    pub fn new(parms: EncryptionParams) -> Result<Self> {
        parms.validate()?;

        let key_ntt = NttContext::new(parms.poly_modulus_degree(), parms.coeff_modulus())?;
        let mut chain = Vec::with_capacity(parms.coeff_modulus_size());
        for level in 0..parms.coeff_modulus_size() {
            let level_parms = parms.truncated(parms.coeff_modulus_size() - level);
            let ntt = if level == 0 {
                key_ntt.clone()
            } else {
                NttContext::new(level_parms.poly_modulus_degree(), level_parms.coeff_modulus())?
            };
            chain.push(ContextData {
                parms: level_parms,
                parms_id: ParmsId(level),
                ntt,
            });
        }

        debug!(
            degree = parms.poly_modulus_degree(),
            moduli = parms.coeff_modulus_size(),
            levels = chain.len(),
            "built encryption context"
        );

        Ok(Self {
            chain: Arc::new(chain),
            validate_keys: cfg!(debug_assertions),
        })
    }

    /// Forces key validation on or off.
    ///
    /// Validation defaults to on in debug builds only.
    pub fn with_key_validation(mut self, enabled: bool) -> Self {
        self.validate_keys = enabled;
        self
    }

    pub fn validates_keys(&self) -> bool {
        self.validate_keys
    }

    pub fn key_parms_id(&self) -> ParmsId {
        ParmsId::KEY_LEVEL
    }

    /// The lowest level, holding only the first modulus.
    pub fn last_parms_id(&self) -> ParmsId {
        ParmsId(self.chain.len() - 1)
    }

    pub fn key_context_data(&self) -> &ContextData {
        &self.chain[0]
    }

    /// Returns the data for `parms_id`, or `UnknownParmsId`.
    pub fn get_context_data(&self, parms_id: ParmsId) -> Result<&ContextData> {
        self.chain
            .get(parms_id.0)
            .ok_or(Error::UnknownParmsId(parms_id))
    }

    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }
}
