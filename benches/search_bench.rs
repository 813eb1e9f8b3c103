use criterion::{criterion_group, criterion_main, Criterion};
use grid_astar::{pos, search, Grid, NoopObserver, Recorder, Role};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

fn random_grid(n: usize, density: f64, rng: &mut StdRng) -> Grid {
    let mut grid = Grid::new(n).unwrap();
    for row in 0..n as i32 {
        for col in 0..n as i32 {
            if rng.gen_bool(density) {
                grid.set_role(pos(row, col), Role::Obstacle).unwrap();
            }
        }
    }
    grid.erase(pos(0, 0)).unwrap();
    grid.erase(pos(n as i32 - 1, n as i32 - 1)).unwrap();
    grid
}

fn corner_to_corner(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    for (n, density) in [(40, 0.0), (40, 0.25), (100, 0.25)] {
        let grid = random_grid(n, density, &mut rng);
        let end = pos(n as i32 - 1, n as i32 - 1);
        c.bench_function(format!("{n}x{n}, density {density}").as_str(), |b| {
            b.iter(|| {
                let mut grid = grid.clone();
                black_box(search(&mut grid, pos(0, 0), end, &mut NoopObserver).unwrap())
            })
        });
        c.bench_function(format!("{n}x{n}, density {density}, recorded").as_str(), |b| {
            b.iter(|| {
                let mut grid = grid.clone();
                let mut recorder = Recorder::new();
                black_box(search(&mut grid, pos(0, 0), end, &mut recorder).unwrap());
                black_box(recorder.events.len())
            })
        });
    }
}

criterion_group!(benches, corner_to_corner);
criterion_main!(benches);
