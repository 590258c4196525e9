extern crate criterion;
extern crate socraticwalls;

use criterion::{criterion_group, criterion_main, Criterion};
use socraticwalls::{score_view, ColorMode, RenderConfig, Renderer, View};

fn render_benchmark(c: &mut Criterion) {
    let renderer = Renderer::new(RenderConfig::default().max_iterations(500));
    let view = View::default();

    let mut group = c.benchmark_group("render");
    group.sample_size(10);
    for mode in ColorMode::ALL.iter() {
        group.bench_function(mode.name(), |b| {
            b.iter(|| renderer.render(320, 200, &view, *mode, None))
        });
    }
    group.finish();
}

fn score_benchmark(c: &mut Criterion) {
    let view = View {
        cx: -0.745,
        cy: 0.11,
        scale: 0.05,
    };
    c.bench_function("score_view 96x54", |b| b.iter(|| score_view(&view, 96, 54, 200)));
}

criterion_group!(benches, render_benchmark, score_benchmark);
criterion_main!(benches);
