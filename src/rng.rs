//! Randomness sources for sampling.
//!
//! Samplers consume any `RngCore + CryptoRng`. Zero-encryption takes a
//! `RandomGeneratorFactory` instead, so that one call can open several
//! independent streams and so that a fixed factory seed reproduces a
//! ciphertext exactly.

use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Bytes in a random seed (one ChaCha20 key).
pub const SEED_BYTE_COUNT: usize = 32;

/// 64-bit words needed to store a seed inside a polynomial buffer.
pub const SEED_U64_COUNT: usize = SEED_BYTE_COUNT / 8;

/// Seed for a ChaCha20 stream.
///
/// A seed used for the public half of a ciphertext is not secret.
pub type RandomSeed = [u8; SEED_BYTE_COUNT];

/// Creates fresh cryptographic generators.
pub trait RandomGeneratorFactory {
    type Rng: RngCore + CryptoRng;

    /// Returns a new generator. Deterministic factories return identical
    /// streams on every call.
    fn create(&self) -> Self::Rng;
}

/// ChaCha20 generator factory, seeded from the OS or from a fixed seed.
///
/// # Example
///
/// ```
/// use rand::RngCore;
/// use rlwe_zero::rng::{ChaChaFactory, RandomGeneratorFactory};
///
/// let factory = ChaChaFactory::with_seed([7u8; 32]);
/// assert_eq!(factory.create().next_u64(), factory.create().next_u64());
/// ```
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct ChaChaFactory {
    seed: Option<RandomSeed>,
}

impl ChaChaFactory {
    /// Every generator is seeded from system entropy.
    pub fn from_entropy() -> Self {
        Self { seed: None }
    }

    /// Every generator starts from `seed`.
    pub fn with_seed(seed: RandomSeed) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn is_deterministic(&self) -> bool {
        self.seed.is_some()
    }
}

impl RandomGeneratorFactory for ChaChaFactory {
    type Rng = ChaCha20Rng;

    fn create(&self) -> ChaCha20Rng {
        match self.seed {
            Some(seed) => ChaCha20Rng::from_seed(seed),
            None => ChaCha20Rng::from_entropy(),
        }
    }
}

impl std::fmt::Debug for ChaChaFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChaChaFactory")
            .field("deterministic", &self.is_deterministic())
            .finish()
    }
}

/// Generator used for the seeded half of a symmetric ciphertext.
pub fn seeded_rng(seed: &RandomSeed) -> ChaCha20Rng {
    ChaCha20Rng::from_seed(*seed)
}

/// Draws a fresh seed from `rng`.
pub fn generate_seed<R: RngCore + ?Sized>(rng: &mut R) -> RandomSeed {
    let mut seed = [0u8; SEED_BYTE_COUNT];
    rng.fill_bytes(&mut seed);
    seed
}

/// Packs seed bytes into words, 8 bytes per word in little-endian order.
pub fn seed_to_words(seed: &RandomSeed) -> [u64; SEED_U64_COUNT] {
    let mut words = [0u64; SEED_U64_COUNT];
    for (word, chunk) in words.iter_mut().zip(seed.chunks_exact(8)) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        *word = u64::from_le_bytes(bytes);
    }
    words
}

/// Inverse of [`seed_to_words`].
///
/// # Panics
///
/// Panics if `words` holds fewer than `SEED_U64_COUNT` words.
pub fn seed_from_words(words: &[u64]) -> RandomSeed {
    let mut seed = [0u8; SEED_BYTE_COUNT];
    for (chunk, word) in seed.chunks_exact_mut(8).zip(&words[..SEED_U64_COUNT]) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_factory_is_deterministic() {
        let factory = ChaChaFactory::with_seed([3u8; SEED_BYTE_COUNT]);
        assert!(factory.is_deterministic());

        let mut a = factory.create();
        let mut b = factory.create();
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_entropy_factory_differs() {
        let factory = ChaChaFactory::from_entropy();
        assert!(!factory.is_deterministic());
        assert_ne!(factory.create().next_u64(), factory.create().next_u64());
    }

    #[test]
    fn test_seed_word_packing() {
        let mut seed = [0u8; SEED_BYTE_COUNT];
        for (i, b) in seed.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        let words = seed_to_words(&seed);
        assert_eq!(words[0], 0x0807060504030201);
        assert_eq!(words[3], 0x201f1e1d1c1b1a19);
        assert_eq!(seed_from_words(&words), seed);
    }

    #[test]
    fn test_debug_hides_seed() {
        let factory = ChaChaFactory::with_seed([0xAB; SEED_BYTE_COUNT]);
        let debug = format!("{:?}", factory);
        assert!(debug.contains("deterministic: true"));
        assert!(!debug.contains("171"));
    }

    #[test]
    fn test_generate_seed_uses_stream() {
        let mut rng = seeded_rng(&[9u8; SEED_BYTE_COUNT]);
        let s1 = generate_seed(&mut rng);
        let s2 = generate_seed(&mut rng);
        assert_ne!(s1, s2);
    }
}
