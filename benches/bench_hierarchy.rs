use archetype_xform::{
    Angle, EntityId, EntityRegistry, GridInfo, HierarchyIndex, MoveEventScheduler,
};
use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec2;
use std::hint::black_box;

fn deep_chain(
    registry: &mut EntityRegistry,
    index: &mut HierarchyIndex,
    depth: usize,
) -> (EntityId, EntityId) {
    let root = registry.spawn();
    index.add_map(root).unwrap();
    let mut parent = root;
    for i in 0..depth {
        let child = registry.spawn();
        index
            .insert_with_parent(child, parent, Vec2::new(1.0, i as f32 * 0.1))
            .unwrap();
        parent = child;
    }
    (root, parent)
}

fn bench_hierarchy_creation(c: &mut Criterion) {
    c.bench_function("hierarchy_1_root_100_children", |b| {
        b.iter(|| {
            let mut registry = EntityRegistry::new();
            let mut index = HierarchyIndex::new();
            let root = registry.spawn();
            index.add_map(root).unwrap();
            for _ in 0..100 {
                let child = registry.spawn();
                black_box(index.insert_with_parent(child, root, Vec2::ONE).unwrap());
            }
        })
    });
}

fn bench_deep_world_position(c: &mut Criterion) {
    c.bench_function("world_position_deep_20_levels_dirty", |b| {
        let mut registry = EntityRegistry::new();
        let mut index = HierarchyIndex::new();
        let (root, leaf) = deep_chain(&mut registry, &mut index, 20);
        let mut step = 0.0f32;

        b.iter(|| {
            step += 0.001;
            index.set_local_rotation(root, Angle::new(step)).unwrap();
            black_box(index.get_world_position(leaf).unwrap());
        })
    });

    c.bench_function("world_position_deep_20_levels_clean", |b| {
        let mut registry = EntityRegistry::new();
        let mut index = HierarchyIndex::new();
        let (_, leaf) = deep_chain(&mut registry, &mut index, 20);
        index.get_world_position(leaf).unwrap();

        b.iter(|| black_box(index.get_world_position(leaf).unwrap()))
    });
}

fn bench_mover_coordinates(c: &mut Criterion) {
    c.bench_function("mover_coordinates_nested_on_grid", |b| {
        let mut registry = EntityRegistry::new();
        let mut index = HierarchyIndex::new();
        let (_, grid) = deep_chain(&mut registry, &mut index, 1);
        index.add_grid(grid, GridInfo::new(1)).unwrap();
        let mut parent = grid;
        for _ in 0..4 {
            let child = registry.spawn();
            index.insert_with_parent(child, parent, Vec2::splat(0.5)).unwrap();
            parent = child;
        }
        let mut x = 0.0f32;

        b.iter(|| {
            x += 0.01;
            index.set_local_position(grid, Vec2::new(x, 0.0)).unwrap();
            black_box(index.get_mover_coordinates(parent).unwrap());
        })
    });
}

fn bench_flush(c: &mut Criterion) {
    c.bench_function("flush_1000_moves", |b| {
        let mut registry = EntityRegistry::new();
        let mut index = HierarchyIndex::new();
        let mut scheduler = MoveEventScheduler::new();
        let root = registry.spawn();
        index.add_map(root).unwrap();
        let entities: Vec<EntityId> = (0..1000)
            .map(|_| {
                let e = registry.spawn();
                index.insert_with_parent(e, root, Vec2::ZERO).unwrap();
                e
            })
            .collect();
        let mut x = 0.0f32;

        b.iter(|| {
            x += 1.0;
            for &e in &entities {
                index.set_local_position(e, Vec2::new(x, 0.0)).unwrap();
            }
            black_box(scheduler.flush(&mut index, &registry));
        })
    });
}

criterion_group!(
    benches,
    bench_hierarchy_creation,
    bench_deep_world_position,
    bench_mover_coordinates,
    bench_flush
);
criterion_main!(benches);
