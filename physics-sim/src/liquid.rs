//! Water/lava detection and flow currents (spec §4.3 `LiquidEngine`).

use physics_primitives::{AABB, Vec3};

use crate::catalogue::Catalogue;
use crate::world::{Block, BlockPos, World};

/// The rendered fluid depth of `block`, or `-1` if it carries no fluid at
/// all. `0` means source/top-of-column (including water-like plants and
/// waterlogged blocks); for a genuine water block, the metadata's low bits
/// give the depth, with the high bit marking a falling source (folded back
/// to `0` here, matched by [`is_falling_source`] separately).
fn rendered_depth(catalogue: &Catalogue, block: Option<&Block>) -> i32 {
    let Some(block) = block else { return -1 };
    let is_water_like = catalogue.is_water_like(block.block_type) || block.properties.waterlogged;
    if is_water_like {
        return 0;
    }
    if !catalogue.is_water(block.block_type) {
        return -1;
    }
    if block.metadata < 8 { block.metadata } else { 0 }
}

fn is_falling_source(block: &Block) -> bool {
    block.metadata >= 8
}

/// `(depth + 1) / 9`, the fraction of a block's height the fluid visually
/// occupies.
#[must_use]
pub fn liquid_height_pcent(depth: i32) -> f64 {
    f64::from(depth + 1) / 9.0
}

const CARDINALS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// The 2D flow vector a water block imparts, sampling its four cardinal
/// neighbours (and, for falling sources, biasing the current downward along
/// cliffs).
#[must_use]
pub fn get_flow(world: &dyn World, catalogue: &Catalogue, pos: BlockPos) -> Vec3 {
    let block = world.get_block(pos);
    let depth = rendered_depth(catalogue, block.as_ref());

    let mut acc = Vec3::zero();
    for (dx, dz) in CARDINALS {
        let neighbour_pos = BlockPos::new(pos.x + dx, pos.y, pos.z + dz);
        let neighbour = world.get_block(neighbour_pos);
        let neighbour_depth = rendered_depth(catalogue, neighbour.as_ref());

        if neighbour_depth < 0 {
            let obstructed = neighbour.as_ref().is_some_and(Block::has_collision);
            if obstructed {
                let below_pos = BlockPos::new(neighbour_pos.x, neighbour_pos.y - 1, neighbour_pos.z);
                let below = world.get_block(below_pos);
                let below_depth = rendered_depth(catalogue, below.as_ref());
                if below_depth >= 0 {
                    let weight = f64::from(below_depth - (depth - 8));
                    acc.x += f64::from(dx) * weight;
                    acc.z += f64::from(dz) * weight;
                }
            }
        } else {
            let weight = f64::from(neighbour_depth - depth);
            acc.x += f64::from(dx) * weight;
            acc.z += f64::from(dz) * weight;
        }
    }

    if block.as_ref().is_some_and(is_falling_source) {
        let biased = CARDINALS.iter().any(|&(dx, dz)| {
            let p = BlockPos::new(pos.x + dx, pos.y, pos.z + dz);
            let at_level = world.get_block(p).is_some_and(|b| b.has_collision());
            let above = BlockPos::new(pos.x + dx, pos.y + 1, pos.z + dz);
            let above_level = world.get_block(above).is_some_and(|b| b.has_collision());
            at_level || above_level
        });
        if biased {
            acc = acc.normalize();
            acc.y -= 6.0;
        }
    }

    acc
}

fn is_fluid_bearing(catalogue: &Catalogue, block: &Block) -> bool {
    catalogue.is_water(block.block_type) || catalogue.is_water_like(block.block_type) || block.properties.waterlogged
}

/// Enumerates every water-bearing block whose rendered surface lies at or
/// below `bb`'s top, sums their flows, and nudges `vel` toward the
/// normalized current. Returns whether any such block was found, i.e.
/// whether the entity counts as "in water" for buoyancy purposes.
pub fn is_in_water_apply_current(world: &dyn World, catalogue: &Catalogue, bb: &AABB, vel: &mut Vec3) -> bool {
    let min_x = bb.min_x.floor() as i32;
    let max_x = bb.max_x.floor() as i32;
    let min_y = bb.min_y.floor() as i32;
    let max_y = bb.max_y.floor() as i32;
    let min_z = bb.min_z.floor() as i32;
    let max_z = bb.max_z.floor() as i32;

    let mut found = false;
    let mut acc = Vec3::zero();

    for y in min_y..=max_y {
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                let pos = BlockPos::new(x, y, z);
                let Some(block) = world.get_block(pos) else {
                    continue;
                };
                if !is_fluid_bearing(catalogue, &block) {
                    continue;
                }
                let depth = rendered_depth(catalogue, Some(&block));
                let surface_y = f64::from(y) + 1.0 - liquid_height_pcent(depth);
                if surface_y > bb.max_y.ceil() {
                    continue;
                }
                found = true;
                acc += get_flow(world, catalogue, pos);
            }
        }
    }

    if acc.length_squared() > 0.0 {
        let normalized = acc.normalize();
        vel.x += normalized.x * 0.014;
        vel.y += normalized.y * 0.014;
        vel.z += normalized.z * 0.014;
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{standard_catalogue, GridWorld, WATER};
    use crate::world::BlockProperties;

    fn water_block(pos: BlockPos, metadata: i32) -> Block {
        Block {
            position: pos,
            block_type: WATER,
            metadata,
            shapes: Vec::new(),
            properties: BlockProperties::default(),
        }
    }

    #[test]
    fn rendered_depth_absent_is_negative_one() {
        let catalogue = standard_catalogue(&[]);
        assert_eq!(rendered_depth(&catalogue, None), -1);
    }

    #[test]
    fn rendered_depth_source_water_is_zero() {
        let catalogue = standard_catalogue(&[]);
        let block = water_block(BlockPos::new(0, 0, 0), 0);
        assert_eq!(rendered_depth(&catalogue, Some(&block)), 0);
    }

    #[test]
    fn rendered_depth_falling_source_folds_to_zero() {
        let catalogue = standard_catalogue(&[]);
        let block = water_block(BlockPos::new(0, 0, 0), 8);
        assert_eq!(rendered_depth(&catalogue, Some(&block)), 0);
        assert!(is_falling_source(&block));
    }

    #[test]
    fn liquid_height_pcent_matches_formula() {
        assert!((liquid_height_pcent(0) - (1.0 / 9.0)).abs() < 1e-12);
        assert!((liquid_height_pcent(7) - (8.0 / 9.0)).abs() < 1e-12);
    }

    #[test]
    fn flat_surface_has_no_flow() {
        let catalogue = standard_catalogue(&[]);
        let mut world = GridWorld::new();
        for (dx, dz) in CARDINALS {
            world.set_block(water_block(BlockPos::new(dx, 0, dz), 0));
        }
        world.set_block(water_block(BlockPos::new(0, 0, 0), 0));
        let flow = get_flow(&world, &catalogue, BlockPos::new(0, 0, 0));
        assert_eq!(flow.x, 0.0);
        assert_eq!(flow.z, 0.0);
    }

    #[test]
    fn is_in_water_detects_submerged_column() {
        let catalogue = standard_catalogue(&[]);
        let mut world = GridWorld::new();
        world.set_block(water_block(BlockPos::new(0, 0, 0), 0));
        let bb = AABB::entity_box(0.5, 0.0, 0.5, 0.3, 1.8);
        let mut vel = Vec3::zero();
        let found = is_in_water_apply_current(&world, &catalogue, &bb, &mut vel);
        assert!(found);
    }

    #[test]
    fn is_in_water_false_when_no_fluid_nearby() {
        let catalogue = standard_catalogue(&[]);
        let world = GridWorld::new();
        let bb = AABB::entity_box(0.5, 0.0, 0.5, 0.3, 1.8);
        let mut vel = Vec3::zero();
        assert!(!is_in_water_apply_current(&world, &catalogue, &bb, &mut vel));
    }
}
