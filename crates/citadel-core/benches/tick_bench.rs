use criterion::{black_box, criterion_group, criterion_main, Criterion};
use citadel_core::entity::{EntityId, Footprint};
use citadel_core::{Command, Simulation, SpatialGrid};

fn bench_advance_tick(c: &mut Criterion) {
    // Built-in stage 1 with default tuning; enemies keep moving and firing
    let mut sim = Simulation::with_builtin_levels(42).unwrap();

    c.bench_function("advance_tick", |b| {
        b.iter(|| {
            if sim.is_game_over() || sim.is_level_cleared() {
                sim.reset_level().unwrap();
            }
            sim.submit_player(Command::Fire);
            sim.advance_tick();
            black_box(sim.take_cues());
        })
    });
}

fn bench_render_specs(c: &mut Criterion) {
    let mut sim = Simulation::with_builtin_levels(7).unwrap();
    for _ in 0..120 {
        sim.advance_tick();
    }

    c.bench_function("render_specs", |b| {
        b.iter(|| black_box(sim.render_specs().count()))
    });
}

fn bench_grid_scan(c: &mut Criterion) {
    let mut grid = SpatialGrid::new(32, 32);
    let mut next = 0;
    for row in (0..32).step_by(2) {
        for col in (0..32).step_by(3) {
            grid.place(EntityId::new(next), Footprint::UNIT, row, col).unwrap();
            next += 1;
        }
    }

    c.bench_function("grid_scan", |b| {
        b.iter(|| black_box(grid.scan(black_box(4..12), black_box(4..12))))
    });
}

criterion_group!(benches, bench_advance_tick, bench_render_specs, bench_grid_scan);
criterion_main!(benches);
