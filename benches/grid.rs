use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use mazes::cells::{CompassPrimary, GridCoordinate};
use mazes::grids::rect_grid;
use mazes::units::{ColumnsCount, RowsCount};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn bench_grid_11(c: &mut Criterion) {
    c.bench_function("grid_11", |b| b.iter(|| rect_grid(RowsCount(11), ColumnsCount(11))));
}

fn bench_grid_128(c: &mut Criterion) {
    c.bench_function("grid_128", |b| b.iter(|| rect_grid(RowsCount(128), ColumnsCount(128))));
}

fn bench_grid_500(c: &mut Criterion) {
    c.bench_function("grid_500", |b| b.iter(|| rect_grid(RowsCount(500), ColumnsCount(500))));
}

fn bench_cell_at(c: &mut Criterion) {
    let g = rect_grid(RowsCount(11), ColumnsCount(11));
    c.bench_function("cell_at", move |b| b.iter(|| g.cell_at(GridCoordinate::new(8, 5))));
}

fn bench_neighbours_corner_of_grid(c: &mut Criterion) {
    let g = rect_grid(RowsCount(11), ColumnsCount(11));
    let corner = g.cell_at(GridCoordinate::new(0, 0)).unwrap();
    c.bench_function("neighbours_corner_of_grid", move |b| b.iter(|| g.neighbours(corner)));
}

fn bench_neighbours_middle_of_grid(c: &mut Criterion) {
    let g = rect_grid(RowsCount(11), ColumnsCount(11));
    let middle = g.cell_at(GridCoordinate::new(5, 5)).unwrap();
    c.bench_function("neighbours_middle_of_grid", move |b| b.iter(|| g.neighbours(middle)));
}

fn bench_link_and_unlink(c: &mut Criterion) {
    c.bench_function("link_and_unlink", |b| {
        b.iter_batched(|| rect_grid(RowsCount(11), ColumnsCount(11)),
                       |mut g| {
                           let a = g.cell_at(GridCoordinate::new(5, 5)).unwrap();
                           let east = g.neighbour(a, CompassPrimary::East).unwrap();
                           g.link(a, east).unwrap();
                           g.unlink(a, east)
                       },
                       BatchSize::SmallInput)
    });
}

fn bench_random_cell(c: &mut Criterion) {
    let g = rect_grid(RowsCount(128), ColumnsCount(128));
    let mut rng = XorShiftRng::seed_from_u64(1);
    c.bench_function("random_cell", move |b| b.iter(|| g.random_cell(&mut rng).unwrap()));
}

fn bench_iter_row(c: &mut Criterion) {
    let g = rect_grid(RowsCount(128), ColumnsCount(128));
    c.bench_function("iter_row", move |b| b.iter(|| g.iter_row().map(|row| row.len()).sum::<usize>()));
}

criterion_group!(benches,
                 bench_grid_11,
                 bench_grid_128,
                 bench_grid_500,
                 bench_cell_at,
                 bench_neighbours_corner_of_grid,
                 bench_neighbours_middle_of_grid,
                 bench_link_and_unlink,
                 bench_random_cell,
                 bench_iter_row);
criterion_main!(benches);
