//! Tokenizer and structuring performance benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use stylus::atf::{render_line, structure_document, tokenize};
use stylus::input::FlatLineRecord;

const LINES: &[&str] = &[
    "1(diš) udu niga {d}en-lil₂",
    "[x x] _LUGAL_ nibru{ki}-ke₄ mu-na-du₃#",
    "ki {d}utu-ta ba-zi? e₂-gal-la ku₄-ra",
    "5(aš) 1/2(iku) a-ša₃ {giš}kiri₆ lu₂ šu-i₃",
    "iti ezem-{d}nin-a-zu mu us₂-sa si-mu-ru-um{ki} ba-hul",
];

/// Generate a tablet with `lines` content records spread over two surfaces.
fn generate_tablet(lines: usize) -> Vec<FlatLineRecord> {
    (0..lines)
        .map(|i| {
            let surface = if i < lines / 2 { "obverse" } else { "reverse" };
            let record = if i % 12 == 11 {
                FlatLineRecord::ruling(i as u64)
            } else {
                FlatLineRecord::content(i as u64, (i + 1).to_string(), LINES[i % LINES.len()])
            };
            record.with_surface(surface)
        })
        .collect()
}

/// Benchmark tokenizing single lines.
fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for (i, line) in LINES.iter().enumerate() {
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_with_input(BenchmarkId::new("line", i), line, |b, line| {
            b.iter(|| black_box(tokenize(line)))
        });
    }

    group.finish();
}

/// Benchmark tokenize followed by render.
fn bench_render(c: &mut Criterion) {
    let text = LINES.join(" ");
    c.bench_function("tokenize_render", |b| {
        b.iter(|| black_box(render_line(&tokenize(&text))))
    });
}

/// Benchmark structuring tablets of various sizes.
fn bench_structure_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("structure_document");

    for lines in [20, 200, 2_000].iter() {
        let records = generate_tablet(*lines);

        group.throughput(Throughput::Elements(*lines as u64));
        group.bench_with_input(BenchmarkId::new("lines", lines), &records, |b, records| {
            b.iter(|| black_box(structure_document(records)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_render, bench_structure_document);
criterion_main!(benches);
