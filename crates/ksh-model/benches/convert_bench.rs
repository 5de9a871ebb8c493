use std::path::Path;

use criterion::{Criterion, criterion_group, criterion_main};
use ksh_model::{ksh_to_kson, parse_ksh, stringify_ksh};

fn read_test_ksh(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-ksh")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

/// The sample chart repeated into a long body.
fn long_chart() -> String {
    let sample = read_test_ksh("sample.ksh");
    let (header, rest) = sample.split_once("\n--\n").unwrap();
    let body: String = rest
        .lines()
        .filter(|line| !line.starts_with("#define_"))
        .map(|line| format!("{line}\n"))
        .collect();
    format!("{header}\n--\n{}", body.repeat(200))
}

fn bench_parse(c: &mut Criterion) {
    for file in ["minimal.ksh", "sample.ksh"] {
        let text = read_test_ksh(file);
        c.bench_function(&format!("parse_{file}"), |b| {
            b.iter(|| parse_ksh(&text));
        });
    }
}

fn bench_convert(c: &mut Criterion) {
    let text = long_chart();
    let ksh = parse_ksh(&text);
    c.bench_function("convert_long_chart", |b| {
        b.iter(|| ksh_to_kson(&ksh).unwrap());
    });
    c.bench_function("stringify_long_chart", |b| {
        b.iter(|| stringify_ksh(&ksh));
    });
}

criterion_group!(benches, bench_parse, bench_convert);
criterion_main!(benches);
