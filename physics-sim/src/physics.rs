//! Public facade wiring the catalogue and feature set to one tick of
//! simulation (spec §6 `Physics(catalogue, world) -> {simulatePlayer,
//! adjustPositionHeight, ...}`).

use physics_primitives::{AABB, Vec3};

use crate::catalogue::Catalogue;
use crate::features::FeatureSet;
use crate::movement;
use crate::player_state::PlayerState;
use crate::world::World;

/// Holds the immutable per-version tables a tick needs; constructed once and
/// shared across every [`PlayerState`] it simulates (spec §5).
#[derive(Debug, Clone)]
pub struct Physics {
    catalogue: Catalogue,
    features: FeatureSet,
}

impl Physics {
    #[must_use]
    pub fn new(catalogue: Catalogue, features: FeatureSet) -> Self {
        Self { catalogue, features }
    }

    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    #[must_use]
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Runs one full tick against `world`, mutating `state.entity` in place.
    pub fn simulate_player(&self, state: &mut PlayerState, world: &dyn World) {
        movement::simulate_player(&mut state.entity, world, &self.catalogue, &self.features);
    }

    /// Settles `pos` onto the ground below it, the way a teleport or respawn
    /// snaps a submitted position onto the nearest supporting surface below:
    /// resolves a downward sweep of up to one block against the surrounding
    /// colliders and returns the adjusted Y.
    #[must_use]
    pub fn adjust_position_height(&self, world: &dyn World, pos: Vec3) -> f64 {
        let player_bb = AABB::entity_box(pos.x, pos.y, pos.z, crate::constants::PLAYER_HALF_WIDTH, crate::constants::PLAYER_HEIGHT);
        let query_bb = player_bb.extend(0.0, -1.0, 0.0);
        let blocks = crate::collision::get_surrounding_bbs(world, &query_bb);

        let mut dy = -1.0;
        for block in &blocks {
            dy = block.compute_offset_y(&player_bb, dy);
        }
        pos.y + dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{features, standard_catalogue, GridWorld, STONE};

    #[test]
    fn adjust_position_height_settles_onto_solid_ground() {
        let mut world = GridWorld::new();
        world.set_full_block(0, 63, 0, STONE);
        let catalogue = standard_catalogue(&[]);
        let feature_set = features(&[]);
        let physics = Physics::new(catalogue, feature_set);

        let adjusted = physics.adjust_position_height(&world, Vec3::new(0.5, 64.9, 0.5));

        assert!((adjusted - 64.0).abs() < 1e-9, "expected settle to y=64.0, got {adjusted}");
    }

    #[test]
    fn adjust_position_height_over_empty_world_falls_by_one_block() {
        let world = GridWorld::new();
        let catalogue = standard_catalogue(&[]);
        let feature_set = features(&[]);
        let physics = Physics::new(catalogue, feature_set);

        let adjusted = physics.adjust_position_height(&world, Vec3::new(0.5, 64.0, 0.5));

        assert!((adjusted - 63.0).abs() < 1e-9, "expected unobstructed drop of 1.0, got {adjusted}");
    }
}
