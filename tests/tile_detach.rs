use archetype_xform::prelude::*;
use archetype_xform::Box2;
use glam::IVec2;

const EPS: f32 = 1e-4;

/// Returns everything it was told about, regardless of bounds.
struct OverlapLookup(Vec<EntityId>);

impl SpatialLookup for OverlapLookup {
    fn query_entities_in_bounds(
        &self,
        _index: &HierarchyIndex,
        _reference: EntityId,
        _bounds: Box2,
        _flags: LookupFlags,
    ) -> Vec<EntityId> {
        self.0.clone()
    }
}

struct Station {
    registry: EntityRegistry,
    system: TransformSystem,
    map: EntityId,
    grid: EntityId,
}

fn station() -> Station {
    let mut registry = EntityRegistry::new();
    let mut system = TransformSystem::new();
    let map = registry.spawn();
    system.index_mut().add_map(map).unwrap();
    let grid = registry.spawn();
    let index = system.index_mut();
    index.insert_with_parent(grid, map, Vec2::new(30.0, -12.0)).unwrap();
    index.add_grid(grid, GridInfo::new(1)).unwrap();
    index.set_local_rotation(grid, Angle::from_degrees(60.0)).unwrap();
    Station {
        registry,
        system,
        map,
        grid,
    }
}

fn tile_removed(grid: EntityId, indices: IVec2) -> TileChangedEvent {
    TileChangedEvent {
        grid,
        indices,
        old_tile: Tile::new(7),
        new_tile: Tile::EMPTY,
    }
}

#[test]
fn test_direct_child_released_nested_untouched() {
    let mut s = station();
    let tile = IVec2::new(4, -2);
    let centre = GridInfo::new(1).tile_center(tile);

    // A stands on the tile; B sits on C, which also overlaps the tile.
    let a = s.registry.spawn();
    let c = s.registry.spawn();
    let b = s.registry.spawn();
    let index = s.system.index_mut();
    index.insert_with_parent(a, s.grid, centre).unwrap();
    index.insert_with_parent(c, s.grid, centre + Vec2::new(3.0, 0.0)).unwrap();
    index.insert_with_parent(b, c, Vec2::new(-3.0, 0.1)).unwrap();

    let a_before = index.get_world_position(a).unwrap();
    let a_rot_before = index.get_world_rotation(a).unwrap();
    let b_before = index.get_world_position(b).unwrap();

    let released = s
        .system
        .handle_tile_changed(
            &tile_removed(s.grid, tile),
            &OverlapLookup(vec![a, b, c]),
            &s.registry,
        )
        .unwrap();
    assert_eq!(released, 1);

    let index = s.system.index();
    assert_eq!(index.parent(a).unwrap(), Some(s.map));
    assert!((index.get_world_position(a).unwrap() - a_before).length() < EPS);
    assert!(index
        .get_world_rotation(a)
        .unwrap()
        .equal_approx(a_rot_before, EPS));

    assert_eq!(index.parent(b).unwrap(), Some(c));
    assert_eq!(index.parent(c).unwrap(), Some(s.grid));
    assert!((index.get_world_position(b).unwrap() - b_before).length() < EPS);
}

#[test]
fn test_anchored_entity_released_and_unanchored() {
    let mut s = station();
    let wall = s.registry.spawn();
    let index = s.system.index_mut();
    index.insert_with_parent(wall, s.grid, Vec2::new(1.2, 1.7)).unwrap();
    assert!(index.anchor(wall).unwrap());

    let released = s
        .system
        .handle_tile_changed(
            &tile_removed(s.grid, IVec2::new(1, 1)),
            &BruteForceLookup,
            &s.registry,
        )
        .unwrap();
    assert_eq!(released, 1);
    let node = s.system.index().node(wall).unwrap();
    assert!(!node.anchored());
    assert_eq!(node.parent(), Some(s.map));
}

#[test]
fn test_queued_for_deletion_goes_to_nullspace() {
    let mut s = station();
    let debris = s.registry.spawn();
    s.system
        .index_mut()
        .insert_with_parent(debris, s.grid, Vec2::new(0.5, 0.5))
        .unwrap();
    s.registry.queue_deletion(debris).unwrap();

    s.system
        .handle_tile_changed(&tile_removed(s.grid, IVec2::ZERO), &BruteForceLookup, &s.registry)
        .unwrap();
    assert_eq!(
        s.system.index().node(debris).unwrap().coordinates(),
        CoordinateFrame::NULLSPACE
    );
}

#[test]
fn test_tile_placed_or_unknown_grid_is_noop() {
    let mut s = station();
    let item = s.registry.spawn();
    s.system
        .index_mut()
        .insert_with_parent(item, s.grid, Vec2::new(0.5, 0.5))
        .unwrap();

    let placed = TileChangedEvent {
        grid: s.grid,
        indices: IVec2::ZERO,
        old_tile: Tile::EMPTY,
        new_tile: Tile::new(2),
    };
    let lookup = OverlapLookup(vec![item]);
    assert_eq!(s.system.handle_tile_changed(&placed, &lookup, &s.registry).unwrap(), 0);

    let not_a_grid = s.registry.spawn();
    assert_eq!(
        s.system
            .handle_tile_changed(&tile_removed(not_a_grid, IVec2::ZERO), &lookup, &s.registry)
            .unwrap(),
        0
    );
    assert_eq!(s.system.index().parent(item).unwrap(), Some(s.grid));
}
