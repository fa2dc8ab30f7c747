//! Deterministic, tick-quantised rigid-body physics for a humanoid entity
//! moving through an AABB voxel world.
//!
//! This crate owns collision resolution, movement-regime integration
//! (ground/air/water/lava/elytra/ladder/web), and the version-gated feature
//! table a host game resolves once at startup. World storage, NBT parsing,
//! and network protocol all live outside this crate, behind the
//! [`world::World`] and [`catalogue::BlockIdSource`] trait boundaries.

pub mod attribute;
pub mod catalogue;
pub mod collision;
pub mod constants;
pub mod entity;
pub mod error;
pub mod features;
pub mod liquid;
pub mod movement;
pub mod physics;
pub mod player_state;
pub mod version;
pub mod world;

#[cfg(test)]
mod test_support;

pub use entity::{Control, Entity};
pub use error::{FeatureParseError, PhysicsInitError};
pub use features::FeatureSet;
pub use physics::Physics;
pub use version::GameVersion;
pub use world::{Block, BlockPos, World};

/// Round-trips a value through `f32`, matching the reference client's use of
/// single-precision constants (spec §3: `AIRDRAG`, jump base velocity).
#[must_use]
pub fn f32_round(x: f64) -> f64 {
    x as f32 as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_round_matches_single_precision_constant() {
        assert_eq!(f32_round(1.0 - 0.02), 0.98_f32 as f64);
    }
}
