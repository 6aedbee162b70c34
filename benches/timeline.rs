//! Benchmarks for timeline grouping, chart drawing and the simulator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tcc::feed::TimelineEvent;
use tcc::sim::{default_roster, simulate, BLOCK_COUNT, DEFAULT_HORIZON};
use tcc::timeline::chart::{Chart, GanttChart};
use tcc::timeline::group_by_train;

fn create_events(trains: usize, blocks: u32) -> Vec<TimelineEvent> {
    let mut events = Vec::with_capacity(trains * blocks as usize);
    for t in 0..trains {
        for b in 0..blocks {
            let start = (t * 2 + b as usize * 3) as f64;
            events.push(TimelineEvent {
                train: format!("T{}", t),
                start,
                end: start + 2.5,
                block: b + 1,
            });
        }
    }
    events
}

fn bench_group_by_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_by_train");

    for trains in [3, 30, 300] {
        let events = create_events(trains, 3);
        group.bench_with_input(BenchmarkId::new("trains", trains), &events, |b, events| {
            b.iter(|| black_box(group_by_train(events)));
        });
    }

    group.finish();
}

fn bench_gantt_draw(c: &mut Criterion) {
    let chart = GanttChart::new(group_by_train(&create_events(30, 3)));
    c.bench_function("gantt_draw_30_trains", |b| {
        b.iter(|| black_box(chart.draw(100)));
    });
}

fn bench_simulate(c: &mut Criterion) {
    let roster = default_roster();
    let mut rng = StdRng::seed_from_u64(42);
    c.bench_function("simulate_default_roster", |b| {
        b.iter(|| black_box(simulate(&mut rng, &roster, BLOCK_COUNT, DEFAULT_HORIZON)));
    });
}

criterion_group!(benches, bench_group_by_train, bench_gantt_draw, bench_simulate);
criterion_main!(benches);
