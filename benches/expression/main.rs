mod expression_nom;
mod expression_tokenchain;

use criterion::{black_box, criterion_group, Criterion};
use expression_nom::nom_parser;
use expression_tokenchain::tokenchain_parser;
use log::trace;

const EXPRESSION: &str = " 12.5 * (3 + 4 * (2 - 1)) / 2 - 7 +
  (1.25 + 2.75) * 8 - (((6))) ";

pub fn bench_nom(c: &mut Criterion) {
    c.bench_function("expression_nom", |b| {
        b.iter(|| nom_parser(black_box(EXPRESSION)))
    });
}

pub fn bench_tokenchain(c: &mut Criterion) {
    c.bench_function("expression_tokenchain", |b| {
        b.iter(|| tokenchain_parser(black_box(EXPRESSION)))
    });
}

criterion_group!(benches, bench_nom, bench_tokenchain);

fn main() {
    env_logger::init();
    trace!(target:"tc", "Logging enabled");
    assert_eq!(nom_parser(EXPRESSION), tokenchain_parser(EXPRESSION));
    benches();
    Criterion::default().configure_from_args().final_summary();
}
