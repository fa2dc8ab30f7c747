//! Per-tick mutable entity state (spec §3 `Entity`, `Control`).

use physics_primitives::Vec3;
use rustc_hash::FxHashMap;

use crate::attribute::{create_attribute_value, AttributeValue};
use crate::constants::{PLAYER_HALF_WIDTH, PLAYER_HEIGHT, PLAYER_SPEED};

/// Canonical key under which the movement-speed attribute is stored in
/// [`Entity::attributes`], matching the host's
/// `attributesByName.movementSpeed.resource` (spec §6).
pub const MOVEMENT_SPEED_KEY: &str = "generic.movement_speed";

/// Boolean control inputs for the current tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Control {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
    pub sneak: bool,
}

impl Control {
    /// `(right - left) * 0.98`.
    #[must_use]
    pub fn strafe(&self) -> f64 {
        (f64::from(self.right) - f64::from(self.left)) * crate::constants::CONTROL_SCALE
    }

    /// `(forward - back) * 0.98`.
    #[must_use]
    pub fn forward_axis(&self) -> f64 {
        (f64::from(self.forward) - f64::from(self.back)) * crate::constants::CONTROL_SCALE
    }
}

/// Per-tick mutable entity state carried between ticks by the host.
#[derive(Debug, Clone)]
pub struct Entity {
    pub pos: Vec3,
    pub vel: Vec3,
    pub yaw: f64,
    pub pitch: f64,

    pub on_ground: bool,
    pub is_in_water: bool,
    pub is_in_lava: bool,
    pub is_in_web: bool,
    pub is_collided_horizontally: bool,
    pub is_collided_vertically: bool,
    pub elytra_flying: bool,

    pub jump_ticks: u32,
    pub firework_rocket_duration: u32,
    pub jump_queued: bool,

    /// 0 = absent, else amplifier + 1.
    pub jump_boost: u32,
    pub speed: u32,
    pub slowness: u32,
    pub dolphins_grace: u32,
    pub slow_falling: u32,
    pub levitation: u32,

    pub depth_strider: u32,
    pub elytra_equipped: bool,

    pub attributes: FxHashMap<String, AttributeValue>,
    pub control: Control,

    pub half_width: f64,
    pub height: f64,
}

impl Entity {
    #[must_use]
    pub fn new(pos: Vec3) -> Self {
        let mut attributes = FxHashMap::default();
        attributes.insert(MOVEMENT_SPEED_KEY.to_string(), create_attribute_value(PLAYER_SPEED));

        Self {
            pos,
            vel: Vec3::zero(),
            yaw: 0.0,
            pitch: 0.0,
            on_ground: false,
            is_in_water: false,
            is_in_lava: false,
            is_in_web: false,
            is_collided_horizontally: false,
            is_collided_vertically: false,
            elytra_flying: false,
            jump_ticks: 0,
            firework_rocket_duration: 0,
            jump_queued: false,
            jump_boost: 0,
            speed: 0,
            slowness: 0,
            dolphins_grace: 0,
            slow_falling: 0,
            levitation: 0,
            depth_strider: 0,
            elytra_equipped: false,
            attributes,
            control: Control::default(),
            half_width: PLAYER_HALF_WIDTH,
            height: PLAYER_HEIGHT,
        }
    }

    /// The entity's current world-space bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> physics_primitives::AABB {
        physics_primitives::AABB::entity_box(self.pos.x, self.pos.y, self.pos.z, self.half_width, self.height)
    }

    #[must_use]
    pub fn movement_speed_mut(&mut self) -> &mut AttributeValue {
        self.attributes
            .entry(MOVEMENT_SPEED_KEY.to_string())
            .or_insert_with(|| create_attribute_value(PLAYER_SPEED))
    }
}
