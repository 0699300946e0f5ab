use criterion::{black_box, criterion_group, criterion_main, Criterion};

const PR_BOX: &str = include_str!("../../../demos/pr_box.qgrady");
const GHZ: &str = include_str!("../../../demos/ghz_three_party.qgrady");

fn load(source: &str, filename: &str) -> qgrady_ir::DistributionTable {
    let program = qgrady_dsl::parse(source, filename).unwrap();
    qgrady_ir::lowering::lower(&program)
}

fn bench_generate_pr_box(c: &mut Criterion) {
    let table = load(PR_BOX, "pr_box.qgrady");
    c.bench_function("generate_pr_box", |b| {
        b.iter(|| qgrady_codegen::generate_prism(black_box(&table)).unwrap())
    });
}

fn bench_generate_ghz(c: &mut Criterion) {
    let table = load(GHZ, "ghz_three_party.qgrady");
    c.bench_function("generate_ghz_three_party", |b| {
        b.iter(|| qgrady_codegen::generate_prism(black_box(&table)).unwrap())
    });
}

fn bench_generate_uniform_four_party(c: &mut Criterion) {
    let names = |prefix: &str| (0..4).map(|i| format!("{prefix}{i}")).collect::<Vec<_>>();
    let table = qgrady_ir::DistributionTable::new(
        names("x"),
        names("a"),
        2,
        2,
        vec![vec![1.0 / 16.0; 16]; 16],
    );
    c.bench_function("generate_uniform_four_party", |b| {
        b.iter(|| qgrady_codegen::generate(black_box(&table)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_generate_pr_box,
    bench_generate_ghz,
    bench_generate_uniform_four_party
);
criterion_main!(benches);
