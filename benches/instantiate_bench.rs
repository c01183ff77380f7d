use criterion::{black_box, criterion_group, criterion_main, Criterion};

use crfs_template::reader::parse_data;
use crfs_template::{Converter, Template};

const TEMPLATE: &str = "\
U00:%x[-2,0]
U01:%x[-1,0]
U02:%x[0,0]
U03:%x[1,0]
U04:%x[2,0]
U05:%x[-1,0]/%x[0,0]
U06:%x[0,0]/%x[1,0]
U10:%x[-2,1]
U11:%x[-1,1]
U12:%x[0,1]
U13:%x[1,1]
U14:%x[2,1]
U15:%x[-2,1]/%x[-1,1]
U16:%x[-1,1]/%x[0,1]
U17:%x[0,1]/%x[1,1]
U18:%x[1,1]/%x[2,1]
U20:%x[-2,1]/%x[-1,1]/%x[0,1]
B
";

fn criterion_benchmark(c: &mut Criterion) {
    let mut data = String::new();
    for i in 0..200 {
        data.push_str(&format!("word{} TAG{} B-NP\n", i, i % 7));
        if i % 20 == 19 {
            data.push('\n');
        }
    }
    let sequences = parse_data(data.as_bytes()).unwrap();
    let template: Template = TEMPLATE.parse().unwrap();

    let mut group = c.benchmark_group("expand");
    group.bench_function("instantiate", |b| {
        let rule = &template.rules()[16];
        let sequence = &sequences[0];
        b.iter(|| {
            for position in 0..sequence.len() {
                let _res = rule.instantiate(black_box(position), sequence).unwrap();
            }
        })
    });
    group.bench_function("write", |b| {
        let converter = Converter::new();
        b.iter(|| {
            let mut buf = Vec::new();
            let _stats = converter
                .write(black_box(&sequences), &template, &mut buf)
                .unwrap();
        })
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
