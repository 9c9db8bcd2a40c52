use criterion::{criterion_group, criterion_main, Criterion};
use robdd_reach::reachability::ReachabilityAnalyzer;

/// A `k`-bit shift register: `delta_0 = !s_{k-1}`, `delta_i = s_{i-1}`.
fn shift_register(k: usize) -> ReachabilityAnalyzer {
    let mut an = ReachabilityAnalyzer::new(k, 0).unwrap();
    let s = an.get_states().to_vec();
    let mut delta = Vec::with_capacity(k);
    delta.push(an.manager_mut().neg(s[k - 1]));
    for i in 1..k {
        delta.push(s[i - 1]);
    }
    an.set_transition_functions(delta).unwrap();
    an
}

fn ite_benchmark(c: &mut Criterion) {
    c.bench_function("ite on two fresh variables", |b| {
        b.iter(|| {
            let mut man = robdd_reach::core::DDManager::default();
            let a = man.create_var(None);
            let b = man.create_var(None);
            let t = man.create_var(None);
            man.ite(a, b, t)
        });
    });
}

fn and2_chain_benchmark(c: &mut Criterion) {
    c.bench_function("and2 chain over 16 variables", |b| {
        b.iter(|| {
            let mut man = robdd_reach::core::DDManager::default();
            let vars: Vec<_> = (0..16).map(|_| man.create_var(None)).collect();
            let mut acc = man.one();
            for v in vars {
                acc = man.and2(acc, v);
            }
            acc
        });
    });
}

fn reachable_states_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("shift register reachable states");
    for k in [4usize, 8, 12] {
        group.bench_function(format!("{k} bits"), |b| {
            b.iter(|| {
                let mut an = shift_register(k);
                an.compute_reachable_states()
            });
        });
    }
    group.finish();
}

criterion_group!(
    core_benches,
    ite_benchmark,
    and2_chain_benchmark,
    reachable_states_benchmark
);
criterion_main!(core_benches);
