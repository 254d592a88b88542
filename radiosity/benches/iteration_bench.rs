// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use radiosity::formfactor::analytic;
use radiosity::iteration::solve;
use radiosity::math::Rgb;
use radiosity::scene::{build_cube_scene, top_centre_emitter};

fn bench_analytic_transfer_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytic_transfer_matrix");
    for subdivision in [2u32, 4, 8] {
        let (scene, _) = build_cube_scene(Rgb::new(0.9, 0.9, 0.9), Rgb::new(2.0, 2.0, 2.0), subdivision, top_centre_emitter);
        group.bench_with_input(BenchmarkId::from_parameter(subdivision), &scene, |b, scene| {
            b.iter(|| black_box(analytic::calc_all_lights(&scene.patches, &scene.vertices)));
        });
    }
    group.finish();
}

fn bench_jacobi_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("jacobi_solve");
    for subdivision in [2u32, 4, 8] {
        let (scene, _) = build_cube_scene(Rgb::new(0.9, 0.9, 0.9), Rgb::new(2.0, 2.0, 2.0), subdivision, top_centre_emitter);
        let transfer = analytic::calc_all_lights(&scene.patches, &scene.vertices);
        group.bench_with_input(BenchmarkId::from_parameter(subdivision), &scene, |b, scene| {
            b.iter(|| {
                let mut patches = scene.patches.clone();
                black_box(solve(&mut patches, &scene.vertices, &transfer, 0.001, 1000).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analytic_transfer_matrix, bench_jacobi_solve);
criterion_main!(benches);
