use anchorcore::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;

fn make_inputs(k: usize, v: usize) -> (Array2<f64>, AnchorSet, Vocabulary) {
    let coocc = Array2::from_shape_fn((v, v), |(i, j)| {
        let base = 0.05 + 0.01 * ((i * 7 + j * 3) % 11) as f64;
        if i % k == j % k {
            base + 1.0
        } else {
            base
        }
    });
    let words: Vec<String> = (0..v).map(|i| format!("word{}", i)).collect();
    let anchors = AnchorSet::from(
        (0..k)
            .map(|a| vec![words[a].clone()])
            .collect::<Vec<Vec<String>>>(),
    );
    let vocab = Vocabulary::new(words).unwrap();
    (coocc, anchors, vocab)
}

fn bench_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("recovery");
    group.sample_size(10);
    for &(k, v) in &[(5, 200), (10, 500), (20, 1000)] {
        let (coocc, anchors, vocab) = make_inputs(k, v);
        for parallel in [false, true] {
            let name = if parallel { "parallel" } else { "sequential" };
            group.bench_function(BenchmarkId::new(name, format!("{}x{}", k, v)), |b| {
                b.iter(|| {
                    TopicRecovery::new(&coocc, &anchors, &vocab)
                        .parallel(parallel)
                        .run()
                        .unwrap()
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_recovery);
criterion_main!(benches);
