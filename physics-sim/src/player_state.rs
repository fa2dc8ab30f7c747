//! Snapshot/apply bridge between a host's entity bookkeeping and one tick of
//! simulation (spec §4.4 `PlayerState`).
//!
//! NBT parsing, network I/O, and inventory storage all stay on the host
//! side of the [`Bot`]/[`EnchantmentSource`] trait boundary (spec §1).

use physics_primitives::Vec3;

use crate::entity::{Control, Entity};

/// Read access to whatever the host uses to represent a simulated entity.
/// [`PlayerState::capture`] snapshots these fields once at tick start;
/// [`PlayerState::apply`] writes the post-tick values back through
/// [`ApplyTarget`].
pub trait Bot {
    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;
    fn yaw(&self) -> f64;
    fn pitch(&self) -> f64;
    fn on_ground(&self) -> bool;
    fn is_in_water(&self) -> bool;
    fn is_in_lava(&self) -> bool;
    fn is_in_web(&self) -> bool;
    fn is_collided_horizontally(&self) -> bool;
    fn is_collided_vertically(&self) -> bool;
    fn elytra_flying(&self) -> bool;
    fn jump_ticks(&self) -> u32;
    fn jump_queued(&self) -> bool;
    fn firework_rocket_duration(&self) -> u32;

    /// Amplifier+1 for a status effect looked up by canonical name
    /// (`"JumpBoost"`, `"Speed"`, `"Slowness"`, `"DolphinsGrace"`,
    /// `"SlowFalling"`, `"Levitation"`), or `0` if the effect is absent.
    fn effect_level(&self, canonical_name: &str) -> u32;

    /// The boots slot (inventory index 8), if occupied.
    fn boots(&self) -> Option<&dyn EnchantmentSource>;
    /// Whether the chest slot (inventory index 6) holds an elytra.
    fn has_elytra_equipped(&self) -> bool;

    /// The movement-speed attribute's current base value (modifiers other
    /// than sprint are the host's concern; the sprint toggle is applied
    /// fresh every tick by [`crate::movement::move_entity_with_heading`]).
    fn movement_speed_base(&self) -> f64;
}

/// Where [`PlayerState::apply`] writes the resolved tick back to.
pub trait ApplyTarget {
    fn set_position(&mut self, pos: Vec3);
    fn set_velocity(&mut self, vel: Vec3);
    fn set_on_ground(&mut self, value: bool);
    fn set_is_in_water(&mut self, value: bool);
    fn set_is_in_lava(&mut self, value: bool);
    fn set_is_in_web(&mut self, value: bool);
    fn set_is_collided_horizontally(&mut self, value: bool);
    fn set_is_collided_vertically(&mut self, value: bool);
    fn set_elytra_flying(&mut self, value: bool);
    fn set_jump_ticks(&mut self, value: u32);
    fn set_jump_queued(&mut self, value: bool);
    fn set_firework_rocket_duration(&mut self, value: u32);
}

/// External collaborator for one equipment slot's enchantment NBT (spec §1:
/// NBT parsing is out of scope here).
pub trait EnchantmentSource {
    /// The enchantment level matching either `namespaced_name` (matched as a
    /// substring, per the reference client's loose `Enchantments`/legacy
    /// `ench` handling) or `legacy_id`, or `0` if neither is present.
    fn enchantment_level(&self, namespaced_name: &str, legacy_id: i32) -> u32;
}

const DEPTH_STRIDER_NAME: &str = "depth_strider";
const DEPTH_STRIDER_LEGACY_ID: i32 = 8;

/// A tick's worth of entity state, captured from a [`Bot`] and handed to
/// [`crate::movement::simulate_player`].
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub entity: Entity,
}

impl PlayerState {
    /// Snapshots `bot`'s mutable fields, copies its input-only fields, and
    /// derives effect levels and equipment-derived flags.
    #[must_use]
    pub fn capture(bot: &dyn Bot, control: Control) -> Self {
        let mut entity = Entity::new(bot.position());
        entity.vel = bot.velocity();
        entity.yaw = bot.yaw();
        entity.pitch = bot.pitch();
        entity.on_ground = bot.on_ground();
        entity.is_in_water = bot.is_in_water();
        entity.is_in_lava = bot.is_in_lava();
        entity.is_in_web = bot.is_in_web();
        entity.is_collided_horizontally = bot.is_collided_horizontally();
        entity.is_collided_vertically = bot.is_collided_vertically();
        entity.elytra_flying = bot.elytra_flying();
        entity.jump_ticks = bot.jump_ticks();
        entity.jump_queued = bot.jump_queued();
        entity.firework_rocket_duration = bot.firework_rocket_duration();
        entity.control = control;

        entity.jump_boost = bot.effect_level("JumpBoost");
        entity.speed = bot.effect_level("Speed");
        entity.slowness = bot.effect_level("Slowness");
        entity.dolphins_grace = bot.effect_level("DolphinsGrace");
        entity.slow_falling = bot.effect_level("SlowFalling");
        entity.levitation = bot.effect_level("Levitation");

        entity.depth_strider = bot
            .boots()
            .map_or(0, |boots| boots.enchantment_level(DEPTH_STRIDER_NAME, DEPTH_STRIDER_LEGACY_ID));
        entity.elytra_equipped = bot.has_elytra_equipped();

        crate::attribute::set_base_value(entity.movement_speed_mut(), bot.movement_speed_base());

        Self { entity }
    }

    /// Writes the post-tick snapshot back through `target`.
    pub fn apply(&self, target: &mut dyn ApplyTarget) {
        target.set_position(self.entity.pos);
        target.set_velocity(self.entity.vel);
        target.set_on_ground(self.entity.on_ground);
        target.set_is_in_water(self.entity.is_in_water);
        target.set_is_in_lava(self.entity.is_in_lava);
        target.set_is_in_web(self.entity.is_in_web);
        target.set_is_collided_horizontally(self.entity.is_collided_horizontally);
        target.set_is_collided_vertically(self.entity.is_collided_vertically);
        target.set_elytra_flying(self.entity.elytra_flying);
        target.set_jump_ticks(self.entity.jump_ticks);
        target.set_jump_queued(self.entity.jump_queued);
        target.set_firework_rocket_duration(self.entity.firework_rocket_duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubBot {
        pos: Vec3,
        elytra: bool,
    }

    impl Bot for StubBot {
        fn position(&self) -> Vec3 {
            self.pos
        }
        fn velocity(&self) -> Vec3 {
            Vec3::zero()
        }
        fn yaw(&self) -> f64 {
            0.0
        }
        fn pitch(&self) -> f64 {
            0.0
        }
        fn on_ground(&self) -> bool {
            true
        }
        fn is_in_water(&self) -> bool {
            false
        }
        fn is_in_lava(&self) -> bool {
            false
        }
        fn is_in_web(&self) -> bool {
            false
        }
        fn is_collided_horizontally(&self) -> bool {
            false
        }
        fn is_collided_vertically(&self) -> bool {
            false
        }
        fn elytra_flying(&self) -> bool {
            false
        }
        fn jump_ticks(&self) -> u32 {
            0
        }
        fn jump_queued(&self) -> bool {
            false
        }
        fn firework_rocket_duration(&self) -> u32 {
            0
        }
        fn effect_level(&self, _canonical_name: &str) -> u32 {
            0
        }
        fn boots(&self) -> Option<&dyn EnchantmentSource> {
            None
        }
        fn has_elytra_equipped(&self) -> bool {
            self.elytra
        }
        fn movement_speed_base(&self) -> f64 {
            0.1
        }
    }

    struct RecordingTarget {
        pos: Vec3,
        on_ground: bool,
    }

    impl ApplyTarget for RecordingTarget {
        fn set_position(&mut self, pos: Vec3) {
            self.pos = pos;
        }
        fn set_velocity(&mut self, _vel: Vec3) {}
        fn set_on_ground(&mut self, value: bool) {
            self.on_ground = value;
        }
        fn set_is_in_water(&mut self, _value: bool) {}
        fn set_is_in_lava(&mut self, _value: bool) {}
        fn set_is_in_web(&mut self, _value: bool) {}
        fn set_is_collided_horizontally(&mut self, _value: bool) {}
        fn set_is_collided_vertically(&mut self, _value: bool) {}
        fn set_elytra_flying(&mut self, _value: bool) {}
        fn set_jump_ticks(&mut self, _value: u32) {}
        fn set_jump_queued(&mut self, _value: bool) {}
        fn set_firework_rocket_duration(&mut self, _value: u32) {}
    }

    #[test]
    fn capture_snapshots_position_and_equipment() {
        let bot = StubBot { pos: Vec3::new(1.0, 2.0, 3.0), elytra: true };
        let state = PlayerState::capture(&bot, Control::default());
        assert_eq!(state.entity.pos, Vec3::new(1.0, 2.0, 3.0));
        assert!(state.entity.elytra_equipped);
        assert_eq!(state.entity.depth_strider, 0);
    }

    #[test]
    fn apply_writes_snapshot_back() {
        let bot = StubBot { pos: Vec3::new(5.0, 6.0, 7.0), elytra: false };
        let mut state = PlayerState::capture(&bot, Control::default());
        state.entity.pos = Vec3::new(9.0, 9.0, 9.0);
        state.entity.on_ground = true;

        let mut target = RecordingTarget { pos: Vec3::zero(), on_ground: false };
        state.apply(&mut target);

        assert_eq!(target.pos, Vec3::new(9.0, 9.0, 9.0));
        assert!(target.on_ground);
    }
}
