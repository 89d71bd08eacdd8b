use astrobwt_core::astrobwt::expand_key;
use astrobwt_core::sais::{suffix_array_u16, suffix_array_u32, BUCKET_SCRATCH_LEN};
use astrobwt_core::{pow_narrow, pow_wide, sha3_256, AstroBwt, STAGE1_LENGTH};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_pow(c: &mut Criterion) {
    let input = [0x42u8; 76];
    c.bench_function("pow_narrow", |b| b.iter(|| pow_narrow(black_box(&input))));
    c.bench_function("pow_wide", |b| b.iter(|| pow_wide(black_box(&input))));

    let mut hasher = AstroBwt::new();
    c.bench_function("astrobwt_narrow_reused", |b| b.iter(|| hasher.narrow(black_box(&input))));
}

fn bench_suffix_array(c: &mut Criterion) {
    let mut stage1 = [0u8; STAGE1_LENGTH];
    expand_key(&sha3_256(b"bench"), &mut stage1);

    c.bench_function("suffix_array_u16", |b| {
        let mut sa = [0i16; STAGE1_LENGTH];
        let mut buckets = [0i16; BUCKET_SCRATCH_LEN];
        b.iter(|| suffix_array_u16(black_box(&stage1), &mut sa, &mut buckets))
    });
    c.bench_function("suffix_array_u32", |b| {
        let mut sa = [0i32; STAGE1_LENGTH];
        let mut buckets = [0i32; BUCKET_SCRATCH_LEN];
        b.iter(|| suffix_array_u32(black_box(&stage1), &mut sa, &mut buckets))
    });
}

criterion_group!(benches, bench_pow, bench_suffix_array);
criterion_main!(benches);
