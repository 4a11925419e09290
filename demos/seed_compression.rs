//! Seed compression size report
//!
//! Encrypts zero with the secret key, with and without seed compression, and
//! compares the serialized sizes for each preset.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rlwe_zero::math::sampling::sample_poly_ternary;
use rlwe_zero::{encrypt_zero_symmetric, ChaChaFactory, Ciphertext, Context, EncryptionParams, SecretKey};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> eyre::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    println!("Seed Compression");
    println!("================\n");

    let factory = ChaChaFactory::from_entropy();

    for n in [1024usize, 2048, 4096] {
        let context = Context::new(EncryptionParams::default_128(n)?)?;
        let key_data = context.key_context_data();

        let mut rng = ChaCha20Rng::from_entropy();
        let mut s = vec![0u64; key_data.parms().poly_len()];
        sample_poly_ternary(&mut rng, key_data.parms(), &mut s);
        key_data.ntt().forward(&mut s);
        let sk = SecretKey::from_ntt_data(s);

        let mut full = Ciphertext::new();
        encrypt_zero_symmetric(&sk, &context, context.key_parms_id(), true, false, &factory, &mut full)?;
        let mut compressed = Ciphertext::new();
        encrypt_zero_symmetric(&sk, &context, context.key_parms_id(), true, true, &factory, &mut compressed)?;

        let full_bytes = full.save()?;
        let compressed_bytes = compressed.save()?;
        let restored = Ciphertext::load(&context, &compressed_bytes)?;
        eyre::ensure!(!restored.is_seed_compressed(), "load did not expand the seed");

        info!(
            n,
            limbs = key_data.parms().coeff_modulus_size(),
            "encrypted and reloaded"
        );
        println!("n = {}", n);
        println!("  Full:       {:>8} bytes", full_bytes.len());
        println!("  Compressed: {:>8} bytes", compressed_bytes.len());
        println!(
            "  Reduction:  {:>7.1}%\n",
            100.0 * (1.0 - compressed_bytes.len() as f64 / full_bytes.len() as f64)
        );
    }

    Ok(())
}
