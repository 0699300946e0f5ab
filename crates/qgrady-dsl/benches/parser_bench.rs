use criterion::{black_box, criterion_group, criterion_main, Criterion};

const PR_BOX: &str = include_str!("../../../demos/pr_box.qgrady");
const GHZ: &str = include_str!("../../../demos/ghz_three_party.qgrady");

fn bench_parse_pr_box(c: &mut Criterion) {
    c.bench_function("parse_pr_box", |b| {
        b.iter(|| qgrady_dsl::parse(black_box(PR_BOX), "pr_box.qgrady").unwrap())
    });
}

fn bench_parse_ghz(c: &mut Criterion) {
    c.bench_function("parse_ghz_three_party", |b| {
        b.iter(|| qgrady_dsl::parse(black_box(GHZ), "ghz_three_party.qgrady").unwrap())
    });
}

criterion_group!(benches, bench_parse_pr_box, bench_parse_ghz);
criterion_main!(benches);
