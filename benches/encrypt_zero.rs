use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rlwe_zero::math::sampling::sample_poly_ternary;
use rlwe_zero::{
    encrypt_zero_asymmetric, encrypt_zero_symmetric, ChaChaFactory, Ciphertext, Context,
    EncryptionParams, PublicKey, SecretKey,
};

fn keys(context: &Context) -> (SecretKey, PublicKey) {
    let key_data = context.key_context_data();
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let mut s = vec![0u64; key_data.parms().poly_len()];
    sample_poly_ternary(&mut rng, key_data.parms(), &mut s);
    key_data.ntt().forward(&mut s);
    let sk = SecretKey::from_ntt_data(s);

    let mut pk = Ciphertext::new();
    encrypt_zero_symmetric(
        &sk,
        context,
        context.key_parms_id(),
        true,
        false,
        &ChaChaFactory::with_seed([2; 32]),
        &mut pk,
    )
    .unwrap();
    (sk, PublicKey::from_ciphertext(pk))
}

fn encrypt_zero_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_zero");

    for n in [1024usize, 2048, 4096] {
        let context = Context::new(EncryptionParams::default_128(n).unwrap()).unwrap();
        let (sk, pk) = keys(&context);
        let factory = ChaChaFactory::with_seed([3; 32]);
        let mut ct = Ciphertext::new();

        group.bench_with_input(BenchmarkId::new("asymmetric", n), &n, |b, _| {
            b.iter(|| {
                encrypt_zero_asymmetric(&pk, &context, context.key_parms_id(), true, &factory, &mut ct)
                    .unwrap()
            });
        });

        for save_seed in [false, true] {
            let label = if save_seed { "symmetric_seeded" } else { "symmetric" };
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, _| {
                b.iter(|| {
                    encrypt_zero_symmetric(
                        &sk,
                        &context,
                        context.key_parms_id(),
                        true,
                        save_seed,
                        &factory,
                        &mut ct,
                    )
                    .unwrap()
                });
            });
        }
    }

    group.finish();
}

fn expand_seed_benchmark(c: &mut Criterion) {
    let context = Context::new(EncryptionParams::default_128(4096).unwrap()).unwrap();
    let (sk, _pk) = keys(&context);
    let mut compressed = Ciphertext::new();
    encrypt_zero_symmetric(
        &sk,
        &context,
        context.key_parms_id(),
        true,
        true,
        &ChaChaFactory::from_entropy(),
        &mut compressed,
    )
    .unwrap();

    c.bench_function("expand_seed_4096", |b| {
        b.iter(|| {
            let mut ct = compressed.clone();
            ct.expand_seed(&context).unwrap();
            ct
        });
    });
}

criterion_group!(benches, encrypt_zero_benchmark, expand_seed_benchmark);
criterion_main!(benches);
