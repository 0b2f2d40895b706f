use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ngp::matcher::Matcher;
use std::time::Duration;

fn generate_lines(count: usize, needle_frequency: usize) -> Vec<Vec<u8>> {
    let mut lines = Vec::with_capacity(count);
    for i in 0..count {
        let line = if i % needle_frequency == 0 {
            format!("line {i}: request handled, payload contains a needle value")
        } else {
            format!("line {i}: request handled without anything notable")
        };
        lines.push(line.into_bytes());
    }
    lines
}

fn bench_matcher_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher_engines");
    group.measurement_time(Duration::from_secs(5));

    let lines = generate_lines(50_000, 37);

    let engines: Vec<(&str, Matcher)> = vec![
        ("horspool", Matcher::new("needle", false, false).unwrap()),
        ("case_insensitive", Matcher::new("NEEDLE", false, true).unwrap()),
        ("regex", Matcher::new(r"need\w+", true, false).unwrap()),
        ("single_byte", Matcher::new("n", false, false).unwrap()),
    ];

    for (label, matcher) in &engines {
        group.bench_with_input(BenchmarkId::new("scan_lines", label), matcher, |b, matcher| {
            b.iter(|| {
                let hits = lines.iter().filter(|line| matcher.is_match(line)).count();
                black_box(hits);
            });
        });
    }

    group.finish();
}

fn bench_high_bit_rabin_karp(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher_rabin_karp");
    group.measurement_time(Duration::from_secs(5));

    let mut lines = generate_lines(50_000, 41);
    // A high-bit byte in the pattern forces Rabin-Karp selection (see matcher engine selection).
    let pattern = "need\u{e9}le".as_bytes().to_vec();
    for line in lines.iter_mut().step_by(41) {
        line.extend_from_slice(&pattern);
    }
    let matcher = Matcher::new(std::str::from_utf8(&pattern).unwrap(), false, false).unwrap();

    group.bench_function("scan_lines", |b| {
        b.iter(|| {
            let hits = lines.iter().filter(|line| matcher.is_match(line)).count();
            black_box(hits);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_matcher_engines, bench_high_bit_rabin_karp);
criterion_main!(benches);
