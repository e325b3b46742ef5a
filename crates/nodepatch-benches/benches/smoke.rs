use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nodepatch_benches::available_corpora;
use nodepatch_core::{PatchFormat, PatchOptions, PointerStyle, RenderConfig};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let options = PatchOptions::default();
    for corpus in available_corpora() {
        let dataset = corpus.load().expect("failed to load dataset");
        group.throughput(Throughput::Bytes(corpus.fixture_bytes() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(corpus.name()),
            &dataset,
            |b, dataset| {
                b.iter(|| {
                    let patch = dataset.build(&options);
                    black_box(patch);
                });
            },
        );
    }
    group.finish();
}

fn bench_build_escaped(c: &mut Criterion) {
    let mut group = c.benchmark_group("build-escaped");
    let options = PatchOptions::default().with_pointer_style(PointerStyle::Escaped);
    for corpus in available_corpora() {
        let dataset = corpus.load().expect("failed to load dataset");
        group.throughput(Throughput::Bytes(corpus.fixture_bytes() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(corpus.name()),
            &dataset,
            |b, dataset| {
                b.iter(|| black_box(dataset.build(&options)));
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let options = PatchOptions::default();
    let config = RenderConfig::default();

    {
        let mut text = c.benchmark_group("render-text");
        for corpus in available_corpora() {
            let dataset = corpus.load().expect("failed to load dataset");
            let patch = dataset.build(&options);
            text.throughput(Throughput::Elements(patch.len() as u64));
            text.bench_function(corpus.name(), {
                let dataset = dataset.clone();
                move |b| {
                    b.iter(|| {
                        let rendered = dataset.render_text(&patch, &config);
                        black_box(rendered);
                    });
                }
            });
        }
        text.finish();
    }

    {
        let mut json_patch = c.benchmark_group("render-json-patch");
        for corpus in available_corpora() {
            let dataset = corpus.load().expect("failed to load dataset");
            let patch = dataset.build(&options);
            json_patch.throughput(Throughput::Elements(patch.len() as u64));
            json_patch.bench_function(corpus.name(), move |b| {
                b.iter(|| {
                    let rendered = patch.render_patch(PatchFormat::Strict).expect("json patch");
                    black_box(rendered);
                });
            });
        }
        json_patch.finish();
    }
}

criterion_group!(benches, bench_build, bench_build_escaped, bench_render);
criterion_main!(benches);
