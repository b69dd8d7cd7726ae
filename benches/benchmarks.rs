use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use mica::{Mesh, TokenTable, VH};

/// A flat n by n quad grid. Big enough workloads without shipping mesh
/// assets.
fn grid(n: usize) -> Mesh {
    let side = n + 1;
    let mut mesh = Mesh::with_capacity(side * side, 2 * n * side, n * n);
    let verts: Vec<VH> = (0..side)
        .flat_map(|j| (0..side).map(move |i| (i, j)))
        .map(|(i, j)| mesh.new_vertex(glam::vec3(i as f32, j as f32, 0.0)))
        .collect();
    for j in 0..n {
        for i in 0..n {
            let a = verts[j * side + i];
            let b = verts[j * side + i + 1];
            let c = verts[(j + 1) * side + i + 1];
            let d = verts[(j + 1) * side + i];
            mesh.new_face(&[a, b, c, d]);
        }
    }
    mesh
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    group.bench_function("grid_16", |b| {
        b.iter(|| black_box(grid(black_box(16))));
    });

    group.bench_function("grid_64", |b| {
        b.iter(|| black_box(grid(black_box(64))));
    });

    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("tables");

    let mut mesh = grid(32);
    group.bench_function("to_tables_grid_32", |b| {
        b.iter(|| black_box(mesh.to_tables()));
    });

    let tokens = TokenTable::new_shared();
    let tables = mesh.to_tables();
    group.bench_function("from_tables_grid_32", |b| {
        b.iter(|| black_box(Mesh::from_tables(tokens.clone(), &tables).unwrap()));
    });

    group.finish();
}

fn bench_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit");

    group.bench_function("triangulate_grid_32", |b| {
        b.iter_batched(
            || grid(32),
            |mut mesh| {
                mesh.triangulate();
                mesh
            },
            BatchSize::SmallInput,
        );
    });

    // Merging an interior vertex into its neighbour, with the duplicate edge
    // and degenerate face cleanup that entails.
    group.bench_function("fire_interior_vertex", |b| {
        b.iter_batched(
            || grid(16),
            |mut mesh| {
                mesh.fire((8 * 17 + 8u32).into(), (8 * 17 + 9u32).into());
                mesh
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("reverse_faces_grid_32", |b| {
        b.iter_batched(
            || grid(32),
            |mut mesh| {
                let faces: Vec<_> = mesh.faces().collect();
                for f in faces {
                    mesh.reverse_face(f);
                }
                mesh
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_properties(c: &mut Criterion) {
    let mut group = c.benchmark_group("properties");

    let mut mesh = grid(16);
    mesh.set_token_table(TokenTable::new_shared());
    mesh.add_vertex_prop("weight", 0.0f32);
    mesh.commit_props(true);

    group.bench_function("fill_vertex_prop", |b| {
        let weight = mesh.vertex_prop::<f32>("weight");
        b.iter(|| {
            let verts: Vec<_> = mesh.vertices().collect();
            for (i, v) in verts.into_iter().enumerate() {
                weight.set(&mut mesh, v, i as f32);
            }
        });
    });

    // Schema churn: declare, commit, remove, commit. The column storage is
    // migrated twice per iteration.
    group.bench_function("commit_churn", |b| {
        b.iter(|| {
            mesh.add_vertex_prop("scratch", 0i32);
            mesh.commit_props(true);
            mesh.remove_vertex_prop("scratch");
            mesh.commit_props(true);
        });
    });

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    let mesh = grid(32);

    group.bench_function("vertex_rings_grid_32", |b| {
        b.iter(|| {
            let mut count = 0usize;
            for v in mesh.vertices() {
                count += mesh.vv_iter(v).count();
            }
            black_box(count);
        });
    });

    group.bench_function("face_planes_grid_32", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for f in mesh.faces() {
                if let Some((n, d)) = mesh.face_plane(f) {
                    sum += n.z + d;
                }
            }
            black_box(sum);
        });
    });

    group.bench_function("check_grid_32", |b| {
        b.iter(|| mesh.check().unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_tables,
    bench_edit,
    bench_properties,
    bench_queries
);
criterion_main!(benches);
