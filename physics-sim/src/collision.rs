//! Collision resolution, sneak edge-guard, and step-up (spec §4.1
//! `CollisionEngine`).

use physics_primitives::{Axis, AABB};

use crate::catalogue::Catalogue;
use crate::constants::STEP_HEIGHT;
use crate::entity::Entity;
use crate::features::FeatureSet;
use crate::world::{BlockPos, World};

/// Collects every block collision box overlapping the lattice spanned by
/// `query`, translated to world coordinates.
///
/// The Y range starts one block below `query`'s floor so tall collision
/// shapes (fences, walls) whose base sits below `query.min_y` are still
/// considered (spec §4.1).
#[must_use]
pub fn get_surrounding_bbs(world: &dyn World, query: &AABB) -> Vec<AABB> {
    let min_x = query.min_x.floor() as i32;
    let max_x = query.max_x.floor() as i32;
    let min_y = query.min_y.floor() as i32 - 1;
    let max_y = query.max_y.floor() as i32;
    let min_z = query.min_z.floor() as i32;
    let max_z = query.max_z.floor() as i32;

    let mut out = Vec::new();
    for y in min_y..=max_y {
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                let Some(block) = world.get_block(BlockPos::new(x, y, z)) else {
                    continue;
                };
                for shape in &block.shapes {
                    out.push(AABB::new(
                        f64::from(x) + shape[0],
                        f64::from(y) + shape[1],
                        f64::from(z) + shape[2],
                        f64::from(x) + shape[3],
                        f64::from(y) + shape[4],
                        f64::from(z) + shape[5],
                    ));
                }
            }
        }
    }
    out
}

pub(crate) fn any_intersect(world: &dyn World, bb: &AABB) -> bool {
    get_surrounding_bbs(world, bb).iter().any(|b| b.intersects(bb))
}

const SNEAK_STEP: f64 = 0.05;

fn shrink_toward_zero(d: f64) -> f64 {
    if d.abs() < SNEAK_STEP {
        0.0
    } else if d > 0.0 {
        d - SNEAK_STEP
    } else {
        d + SNEAK_STEP
    }
}

/// Shrinks a single-axis delta toward zero while the candidate position has
/// no ground support one block below, to keep a sneaking entity from
/// stepping off a ledge.
fn sneak_shrink_x(world: &dyn World, bb: &AABB, mut dx: f64) -> f64 {
    while dx != 0.0 && !any_intersect(world, &bb.offset_by(dx, -1.0, 0.0)) {
        dx = shrink_toward_zero(dx);
    }
    dx
}

fn sneak_shrink_z(world: &dyn World, bb: &AABB, mut dz: f64) -> f64 {
    while dz != 0.0 && !any_intersect(world, &bb.offset_by(0.0, -1.0, dz)) {
        dz = shrink_toward_zero(dz);
    }
    dz
}

/// Axis resolution order for [`resolve_axes`]'s per-axis sweep: Y first so
/// horizontal motion happens at the post-landing height (spec §4.1 step 5).
const fn axis_step_order() -> [Axis; 3] {
    [Axis::Y, Axis::X, Axis::Z]
}

fn compute_offset(axis: Axis, block: &AABB, bb: &AABB, delta: f64) -> f64 {
    match axis {
        Axis::X => block.compute_offset_x(bb, delta),
        Axis::Y => block.compute_offset_y(bb, delta),
        Axis::Z => block.compute_offset_z(bb, delta),
    }
}

fn offset_axis(bb: &mut AABB, axis: Axis, delta: f64) {
    match axis {
        Axis::X => bb.offset(delta, 0.0, 0.0),
        Axis::Y => bb.offset(0.0, delta, 0.0),
        Axis::Z => bb.offset(0.0, 0.0, delta),
    }
}

/// Resolves a three-axis candidate movement against a fixed set of obstacle
/// boxes, updating `bb` in place and returning the clamped `(dx, dy, dz)`.
fn resolve_axes(bb: &mut AABB, blocks: &[AABB], dx: f64, dy: f64, dz: f64) -> (f64, f64, f64) {
    let mut deltas = (dx, dy, dz);
    for axis in axis_step_order() {
        let delta = match axis {
            Axis::X => &mut deltas.0,
            Axis::Y => &mut deltas.1,
            Axis::Z => &mut deltas.2,
        };
        for block in blocks {
            *delta = compute_offset(axis, block, bb, *delta);
        }
        offset_axis(bb, axis, *delta);
    }
    deltas
}

struct StepAttempt {
    bb: AABB,
    dx: f64,
    dy: f64,
    dz: f64,
}

fn try_step(world: &dyn World, pre_move_bb: &AABB, dx: f64, dz: f64) -> StepAttempt {
    let query = pre_move_bb.extend(dx, STEP_HEIGHT, dz);
    let blocks_a = get_surrounding_bbs(world, &query);
    let mut bb_a = *pre_move_bb;
    let (dx_a, dy_a, dz_a) = resolve_axes(&mut bb_a, &blocks_a, dx, STEP_HEIGHT, dz);

    let query_b = pre_move_bb.extend(0.0, STEP_HEIGHT, 0.0);
    let blocks_b = get_surrounding_bbs(world, &query_b);
    let mut bb_b = *pre_move_bb;
    let (dx_b, dy_b, dz_b) = resolve_axes(&mut bb_b, &blocks_b, dx, STEP_HEIGHT, dz);

    let (mut bb, dx_s, mut dy_s, dz_s, blocks) = if dx_a * dx_a + dz_a * dz_a >= dx_b * dx_b + dz_b * dz_b {
        (bb_a, dx_a, dy_a, dz_a, blocks_a)
    } else {
        (bb_b, dx_b, dy_b, dz_b, blocks_b)
    };

    // Re-clamp Y downward: settle back down onto whatever the step landed on,
    // sweeping the full step height rather than just the unused headroom so a
    // step that never hit an overhead obstacle still clips onto the surface
    // below it instead of floating at `pre_move_bb.y + STEP_HEIGHT`.
    let mut extra_down = -STEP_HEIGHT;
    for block in &blocks {
        extra_down = block.compute_offset_y(&bb, extra_down);
    }
    bb.offset(0.0, extra_down, 0.0);
    dy_s += extra_down;

    StepAttempt { bb, dx: dx_s, dy: dy_s, dz: dz_s }
}

/// Result of one [`move_entity`] call's block-effects pass, forwarded to the
/// caller since some effects (cobweb) take effect "next tick" per spec.
#[derive(Debug, Default)]
pub struct BlockEffects {
    pub entered_web: bool,
}

/// Moves `entity` through `world` by the candidate delta `(dx, dy, dz)`,
/// resolving collisions, the sneak edge-guard, and step-up, then writes the
/// resolved position/velocity/flags back onto `entity` (spec §4.1).
pub fn move_entity(
    entity: &mut Entity,
    world: &dyn World,
    catalogue: &Catalogue,
    features: &FeatureSet,
    dx: f64,
    dy: f64,
    dz: f64,
) -> BlockEffects {
    let (mut dx, mut dy, mut dz) = (dx, dy, dz);

    if entity.is_in_web {
        dx *= 0.25;
        dy *= 0.05;
        dz *= 0.25;
        entity.vel = physics_primitives::Vec3::zero();
        entity.is_in_web = false;
    }

    let (old_vel_x, old_vel_y, old_vel_z) = (dx, dy, dz);

    let pre_move_bb = entity.bounding_box();

    if entity.control.sneak && entity.on_ground {
        dx = sneak_shrink_x(world, &pre_move_bb, dx);
        dz = sneak_shrink_z(world, &pre_move_bb, dz);
        while dx != 0.0 && dz != 0.0 && !any_intersect(world, &pre_move_bb.offset_by(dx, -1.0, dz)) {
            dx = shrink_toward_zero(dx);
            dz = shrink_toward_zero(dz);
        }
    }

    let query_bb = pre_move_bb.extend(dx, dy, dz);
    let blocks = get_surrounding_bbs(world, &query_bb);

    let mut player_bb = pre_move_bb;
    let (mut dx, mut dy, mut dz) = resolve_axes(&mut player_bb, &blocks, dx, dy, dz);

    let flat_dist_sq = dx * dx + dz * dz;
    let horizontally_clamped = dx != old_vel_x || dz != old_vel_z;

    // Step-up (spec §4.1 step 6). `emitted_dy` tracks the sign-flipped value
    // used only for the collided/on-ground/velocity-zeroing computations
    // below when a step succeeds; the real ascended height still goes into
    // `player_bb`/`dy`.
    let mut emitted_dy = dy;
    if STEP_HEIGHT > 0.0 && (entity.on_ground || (dy != old_vel_y && old_vel_y < 0.0)) && horizontally_clamped {
        let attempt = try_step(world, &pre_move_bb, old_vel_x, old_vel_z);
        let step_dist_sq = attempt.dx * attempt.dx + attempt.dz * attempt.dz;
        if step_dist_sq > flat_dist_sq {
            player_bb = attempt.bb;
            dx = attempt.dx;
            dz = attempt.dz;
            dy = attempt.dy;
            emitted_dy = -attempt.dy;
        }
    }

    entity.pos = physics_primitives::Vec3::new(
        (player_bb.min_x + player_bb.max_x) / 2.0,
        player_bb.min_y,
        (player_bb.min_z + player_bb.max_z) / 2.0,
    );

    entity.is_collided_horizontally = dx != old_vel_x || dz != old_vel_z;
    entity.is_collided_vertically = emitted_dy != old_vel_y;
    entity.on_ground = entity.is_collided_vertically && old_vel_y < 0.0;

    if dx != old_vel_x {
        entity.vel.x = 0.0;
    }
    if dz != old_vel_z {
        entity.vel.z = 0.0;
    }
    if emitted_dy != old_vel_y {
        let below_pos = BlockPos::new(
            entity.pos.x.floor() as i32,
            (entity.pos.y - 0.2).floor() as i32,
            entity.pos.z.floor() as i32,
        );
        let is_slime = world
            .get_block(below_pos)
            .is_some_and(|b| b.block_type == catalogue.slime);
        if is_slime && !entity.control.sneak {
            entity.vel.y = -entity.vel.y;
        } else {
            entity.vel.y = 0.0;
        }
    }

    apply_post_move_block_effects(entity, world, catalogue, features, &player_bb)
}

fn apply_post_move_block_effects(
    entity: &mut Entity,
    world: &dyn World,
    catalogue: &Catalogue,
    features: &FeatureSet,
    final_bb: &AABB,
) -> BlockEffects {
    let mut effects = BlockEffects::default();
    let contracted = final_bb.contract(0.001, 0.001, 0.001);

    let min_x = contracted.min_x.floor() as i32;
    let max_x = contracted.max_x.floor() as i32;
    let min_y = contracted.min_y.floor() as i32;
    let max_y = contracted.max_y.floor() as i32;
    let min_z = contracted.min_z.floor() as i32;
    let max_z = contracted.max_z.floor() as i32;

    for y in min_y..=max_y {
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                let Some(block) = world.get_block(BlockPos::new(x, y, z)) else {
                    continue;
                };

                if features.is_enabled("velocityBlocksOnCollision") {
                    if block.block_type == catalogue.soul_sand {
                        entity.vel.x *= crate::constants::SOULSAND_SPEED;
                        entity.vel.z *= crate::constants::SOULSAND_SPEED;
                    } else if block.block_type == catalogue.honey_block {
                        entity.vel.x *= crate::constants::HONEYBLOCK_SPEED;
                        entity.vel.z *= crate::constants::HONEYBLOCK_SPEED;
                    }
                }

                if block.block_type == catalogue.cobweb {
                    effects.entered_web = true;
                }

                if block.block_type == catalogue.bubble_column {
                    let down = block.metadata == 0;
                    let above_is_air = world.get_block(BlockPos::new(x, y + 1, z)).is_none();
                    let drag = if above_is_air {
                        crate::constants::BUBBLE_SURFACE
                    } else {
                        crate::constants::BUBBLE_SUBMERGED
                    };
                    if down {
                        entity.vel.y = (entity.vel.y - drag.down).max(drag.max_down);
                    } else {
                        entity.vel.y = (entity.vel.y + drag.up).min(drag.max_up);
                    }
                }
            }
        }
    }

    if features.is_enabled("velocityBlocksOnTop") {
        let below = BlockPos::new(
            entity.pos.x.floor() as i32,
            (entity.pos.y - 0.5).floor() as i32,
            entity.pos.z.floor() as i32,
        );
        if let Some(block) = world.get_block(below) {
            if block.block_type == catalogue.soul_sand {
                entity.vel.x *= crate::constants::SOULSAND_SPEED;
                entity.vel.z *= crate::constants::SOULSAND_SPEED;
            } else if block.block_type == catalogue.honey_block {
                entity.vel.x *= crate::constants::HONEYBLOCK_SPEED;
                entity.vel.z *= crate::constants::HONEYBLOCK_SPEED;
            }
        }
    }

    if effects.entered_web {
        entity.is_in_web = true;
    }

    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{standard_catalogue, GridWorld, SLIME, STONE};
    use crate::world::{Block, BlockProperties};
    use physics_primitives::Vec3;

    fn falling_entity(pos: Vec3, vy: f64) -> Entity {
        let mut entity = Entity::new(pos);
        entity.vel = Vec3::new(0.0, vy, 0.0);
        entity
    }

    #[test]
    fn free_fall_over_empty_world_keeps_falling() {
        let world = GridWorld::new();
        let catalogue = standard_catalogue(&[]);
        let features = crate::test_support::features(&["independentLiquidGravity"]);
        let mut entity = falling_entity(Vec3::new(0.5, 10.0, 0.5), -0.0784);

        let effects = move_entity(&mut entity, &world, &catalogue, &features, 0.0, -0.0784, 0.0);

        assert!(!effects.entered_web);
        assert!(!entity.on_ground);
        assert!((entity.pos.y - (10.0 - 0.0784)).abs() < 1e-9);
    }

    #[test]
    fn lands_on_solid_ground() {
        let mut world = GridWorld::new();
        world.set_full_block(0, 63, 0, STONE);
        let catalogue = standard_catalogue(&[]);
        let features = crate::test_support::features(&["independentLiquidGravity"]);
        let mut entity = falling_entity(Vec3::new(0.5, 64.1, 0.5), -0.5);

        move_entity(&mut entity, &world, &catalogue, &features, 0.0, -0.5, 0.0);

        assert!(entity.on_ground);
        assert_eq!(entity.vel.y, 0.0);
        assert!((entity.pos.y - 64.0).abs() < 1e-9);
    }

    #[test]
    fn steps_up_onto_half_block_slab() {
        let mut world = GridWorld::new();
        world.set_full_block(0, 63, 0, STONE);
        world.set_slab(1, 64, 0, STONE);
        let catalogue = standard_catalogue(&[]);
        let features = crate::test_support::features(&["independentLiquidGravity"]);
        let mut entity = Entity::new(Vec3::new(0.5, 64.0, 0.5));
        entity.on_ground = true;

        move_entity(&mut entity, &world, &catalogue, &features, 0.3, 0.0, 0.0);

        assert!(
            (entity.pos.y - 64.5).abs() < 1e-9,
            "expected step-up to settle exactly onto the slab top at y=64.5, got {}",
            entity.pos.y
        );
    }

    #[test]
    fn bubble_column_drags_entity_upward_matches_scenario_s7() {
        let mut world = GridWorld::new();
        let catalogue = standard_catalogue(&[]);
        world.set_block(Block {
            position: BlockPos::new(0, 64, 0),
            block_type: catalogue.bubble_column,
            metadata: 1,
            shapes: Vec::new(),
            properties: BlockProperties::default(),
        });
        let features = crate::test_support::features(&["independentLiquidGravity"]);
        let mut entity = Entity::new(Vec3::new(0.5, 64.0, 0.5));
        entity.vel.y = 0.0;

        move_entity(&mut entity, &world, &catalogue, &features, 0.0, 0.0, 0.0);

        assert!(entity.vel.y > 0.0, "expected bubble column to push upward, got vel.y={}", entity.vel.y);
        assert!(
            entity.vel.y <= crate::constants::BUBBLE_SURFACE.max_up,
            "expected drag to clamp at the surface set's max_up, got vel.y={}",
            entity.vel.y
        );
    }

    #[test]
    fn sneak_shrink_stops_at_the_edge_of_support() {
        let mut world = GridWorld::new();
        world.set_full_block(0, 63, 0, STONE);
        let bb = AABB::entity_box(0.5, 64.0, 0.5, 0.3, 1.8);

        let shrunk = sneak_shrink_x(&world, &bb, 0.9);

        assert!((shrunk - 0.75).abs() < 1e-9, "expected shrink to stop at 0.75, got {shrunk}");
    }

    #[test]
    fn sneaking_on_ledge_does_not_walk_off() {
        let mut world = GridWorld::new();
        world.set_full_block(0, 63, 0, STONE);
        let catalogue = standard_catalogue(&[]);
        let features = crate::test_support::features(&["independentLiquidGravity"]);
        let mut entity = Entity::new(Vec3::new(0.5, 64.0, 0.5));
        entity.on_ground = true;
        entity.control.sneak = true;

        move_entity(&mut entity, &world, &catalogue, &features, 0.9, 0.0, 0.0);

        assert!((entity.pos.x - 1.25).abs() < 1e-9, "expected sneak-shrunk dx of 0.75, got pos.x={}", entity.pos.x);
        assert!(entity.on_ground);
    }

    #[test]
    fn slime_block_reflects_downward_velocity() {
        let mut world = GridWorld::new();
        world.set_full_block(0, 63, 0, SLIME);
        let catalogue = standard_catalogue(&[]);
        let features = crate::test_support::features(&["independentLiquidGravity"]);
        let mut entity = falling_entity(Vec3::new(0.5, 64.2, 0.5), -0.5);

        move_entity(&mut entity, &world, &catalogue, &features, 0.0, -0.5, 0.0);

        assert!(entity.vel.y > 0.0, "expected slime bounce, got vel.y={}", entity.vel.y);
    }
}
