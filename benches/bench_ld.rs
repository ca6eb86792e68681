use criterion::{black_box, criterion_group, criterion_main, Criterion};
use variants::{coordinate::{ContigIdx, Position}, ld, VariantDataset, VariantRecord};

const N_VARIANTS: u32  = 2_000;
const N_SAMPLES: usize = 50;

fn random_dataset() -> VariantDataset {
    let mut rng = fastrand::Rng::with_seed(42);
    let samples = (0..N_SAMPLES).map(|i| format!("S{i}")).collect();
    let mut data = VariantDataset::new(vec!["1".into()], samples, 2).unwrap();
    for pos in 1..=N_VARIANTS {
        let genotypes = (0..N_SAMPLES * 2).map(|_| if rng.u8(0..100) < 5 { -1 } else { rng.i16(0..=1) }).collect();
        data.push(VariantRecord{contig: ContigIdx(0), position: Position(pos), id: ".".into(), alleles: vec!["A".into(), "T".into()], genotypes}).unwrap();
    }
    data.compute_dosage();
    data.window_by_variant(500, 250).unwrap();
    data
}

fn bench_ld(c: &mut Criterion) {
    let mut group = c.benchmark_group("ld");
    let data = random_dataset();
    group.bench_function("linked_pairs", |b| b.iter(|| {
        ld::linked_pairs(black_box(&data), 0.1, || ()).unwrap()
    }));

    let edges = ld::linked_pairs(&data, 0.1, || ()).unwrap();
    group.bench_function("maximal_independent_set", |b| b.iter(|| {
        ld::maximal_independent_set(data.n_variants(), black_box(&edges))
    }));
}

criterion_group!(benches, bench_ld);
criterion_main!(benches);
