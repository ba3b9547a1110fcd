#![allow(dead_code, unused_imports)]

use archetype_xform::prelude::*;
use std::{fs::File, time::Instant};

#[cfg(feature = "profiling")]
use tracing_subscriber::{self, prelude::*};

/// Map -> grid -> `depth`-deep chains, `width` of them.
fn build_world(
    registry: &mut EntityRegistry,
    system: &mut TransformSystem,
    width: usize,
    depth: usize,
) -> Result<Vec<EntityId>> {
    let index = system.index_mut();
    let map = registry.spawn();
    index.add_map(map)?;
    let grid = registry.spawn();
    index.insert_with_parent(grid, map, Vec2::new(64.0, 64.0))?;
    index.add_default_grid(grid)?;

    let mut leaves = Vec::with_capacity(width);
    for i in 0..width {
        let mut parent = grid;
        for _ in 0..depth {
            let child = registry.spawn();
            index.insert_with_parent(child, parent, Vec2::new(i as f32 % 32.0 + 0.5, 0.25))?;
            parent = child;
        }
        leaves.push(parent);
    }
    Ok(leaves)
}

#[cfg(feature = "profiling")]
#[tracing::instrument(skip(system, leaves))]
fn profile_ticks(
    system: &mut TransformSystem,
    registry: &EntityRegistry,
    leaves: &[EntityId],
    ticks: usize,
) -> Result<()> {
    let grid = leaves
        .first()
        .and_then(|&leaf| system.index().ancestors(leaf).find(|&e| system.index().is_grid(e)));
    for tick in 0..ticks {
        if tick % 10 == 0 {
            tracing::info!("Tick {}/{}", tick, ticks);
        }
        if let Some(grid) = grid {
            system
                .index_mut()
                .set_local_rotation(grid, Angle::new(tick as f32 * 0.01))?;
        }
        let _span = tracing::info_span!("resolve_leaves", count = leaves.len()).entered();
        for &leaf in leaves {
            system.index().get_mover_coordinates(leaf)?;
        }
        system.update(registry);
    }
    Ok(())
}

#[cfg(feature = "profiling")]
fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Set up tracing subscriber to write to a file
    let file = File::create("trace.json")?;
    let (non_blocking, _guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .init();

    let mut registry = EntityRegistry::new();
    let mut system = TransformSystem::new();

    println!("Building hierarchy...");
    let leaves = {
        let _span = tracing::info_span!("build").entered();
        build_world(&mut registry, &mut system, 1_000, 8)?
    };
    system.update(&registry);

    println!("Profiling 100 ticks of grid rotation...");
    let start = Instant::now();
    profile_ticks(&mut system, &registry, &leaves, 100)?;
    println!("100 ticks complete in: {:?}", start.elapsed());
    Ok(())
}

#[cfg(not(feature = "profiling"))]
fn main() {
    println!("profile_hierarchy binary requires --features profiling");
}
