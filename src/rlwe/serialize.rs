//! Compact ciphertext serialization.
//!
//! `save` writes a bincode record. A seed-compressed ciphertext stores only
//! `c0` plus the sentinel and seed words of `c1`, roughly halving its size;
//! `load` pads the record back out and regenerates `c1` from the seed.

use serde::{Deserialize, Serialize};

use super::types::{Ciphertext, SEED_SENTINEL};
use crate::context::{Context, ParmsId};
use crate::error::{Error, Result};
use crate::rng::SEED_U64_COUNT;

#[derive(Serialize, Deserialize)]
struct CiphertextRecord {
    parms_id: ParmsId,
    size: usize,
    is_ntt_form: bool,
    scale: f64,
    data: Vec<u64>,
}

impl Ciphertext {
    /// Serializes the ciphertext, dropping the redundant tail of a
    /// seed-compressed second component.
    pub fn save(&self) -> Result<Vec<u8>> {
        let stored = if self.is_seed_compressed() {
            &self.data()[..self.poly_len() + 1 + SEED_U64_COUNT]
        } else {
            self.data()
        };

        let record = CiphertextRecord {
            parms_id: self.parms_id(),
            size: self.size(),
            is_ntt_form: self.is_ntt_form(),
            scale: self.scale(),
            data: stored.to_vec(),
        };
        Ok(bincode::serialize(&record)?)
    }

    /// Deserializes a ciphertext written by [`Ciphertext::save`].
    ///
    /// Seed-compressed records are expanded, so the result never carries the
    /// sentinel. Every value is checked to be reduced.
    pub fn load(context: &Context, bytes: &[u8]) -> Result<Ciphertext> {
        let record: CiphertextRecord = bincode::deserialize(bytes)?;
        let parms = context.get_context_data(record.parms_id)?.parms();
        let poly_len = parms.poly_len();
        let full_len = record
            .size
            .checked_mul(poly_len)
            .ok_or(Error::InvalidCiphertext("size overflows"))?;

        let mut data = record.data;
        let compressed = record.size == 2
            && data.len() == poly_len + 1 + SEED_U64_COUNT
            && data[poly_len] == SEED_SENTINEL;
        if compressed {
            data.resize(full_len, 0);
        } else if data.len() != full_len {
            return Err(Error::InvalidCiphertext("data length does not match shape"));
        }

        let mut ct =
            Ciphertext::from_parts(context, record.parms_id, record.size, data, record.is_ntt_form)?;
        ct.set_scale(record.scale);
        if compressed {
            ct.expand_seed(context)?;
        }

        if !ct.is_valid_for(context) {
            return Err(Error::InvalidCiphertext("coefficient out of range"));
        }
        Ok(ct)
    }
}
