use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::{RngCore, SeedableRng};
use rand::rngs::StdRng;

use aes_inv::{InverseCipher, KeySchedule};

fn bench_key_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_schedule");
    for key_len in [16usize, 24, 32] {
        let key = vec![0x5au8; key_len];
        group.bench_function(format!("expand_{}", key_len * 8), |b| {
            b.iter(|| KeySchedule::expand(&key).unwrap());
        });
    }
    group.finish();
}

fn bench_decrypt(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let mut key = [0u8; 32];
    rng.fill_bytes(&mut key);
    let cipher = InverseCipher::new(&key).unwrap();

    let mut group = c.benchmark_group("decrypt");
    group.bench_function("block_aes256", |b| {
        let mut block = [0u8; 16];
        rng.fill_bytes(&mut block);
        b.iter(|| {
            let mut data = block;
            cipher.decrypt_block_in_place(&mut data);
            data
        });
    });

    let mut buffer = vec![0u8; 64 * 1024];
    rng.fill_bytes(&mut buffer);
    group.throughput(Throughput::Bytes(buffer.len() as u64));
    group.bench_function("buffer_64k_aes256", |b| {
        b.iter(|| {
            let mut data = buffer.clone();
            cipher.decrypt_buffer(&mut data)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_key_schedule, bench_decrypt);
criterion_main!(benches);
