use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strata_core::Point;
use strata_input::{HandlerMap, HitOptions, HitRegionIndex};
use strata_scene::{NodeKind, NodeProps, SceneGraph};

fn grid_scene(side: usize) -> SceneGraph {
    let mut scene = SceneGraph::new();
    let root = scene.create_node(NodeKind::Root, NodeProps::new());
    scene.set_root(Some(root));
    for row in 0..side {
        for col in 0..side {
            let rect = scene.create_node(
                NodeKind::Rect,
                NodeProps::new()
                    .with_position(col as f32 * 24.0, row as f32 * 24.0)
                    .with_size(20.0, 20.0)
                    .with_corner_radius(4.0)
                    .draggable(),
            );
            scene.append_child(root, rect);
        }
    }
    scene
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_index_rebuild");
    for side in [8usize, 32] {
        let scene = grid_scene(side);
        let handlers = HandlerMap::new();
        group.bench_function(format!("{}x{}", side, side), |b| {
            let mut index = HitRegionIndex::new();
            b.iter(|| {
                index.rebuild(black_box(&scene), &handlers, HitOptions::default());
            });
        });
    }
    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let scene = grid_scene(32);
    let handlers = HandlerMap::new();
    let mut index = HitRegionIndex::new();
    index.rebuild(&scene, &handlers, HitOptions::default());

    let mut group = c.benchmark_group("hit_test");
    group.bench_function("bottom_left_hit", |b| {
        b.iter(|| index.hit_test(black_box(Point::new(10.0, 10.0))));
    });
    group.bench_function("miss", |b| {
        b.iter(|| index.hit_test(black_box(Point::new(-50.0, -50.0))));
    });
    group.finish();
}

criterion_group!(benches, bench_rebuild, bench_hit_test);
criterion_main!(benches);
