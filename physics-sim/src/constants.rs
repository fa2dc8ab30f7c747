//! Physics constants from spec §3. All binary64 unless noted; `AIRDRAG` and
//! the jump base velocity are explicitly round-tripped through binary32 at
//! point of use (see [`crate::f32_round`]) to match the reference client.

/// Per-tick downward acceleration applied to airborne/falling entities.
pub const GRAVITY: f64 = 0.08;
/// `float32(1.0 - 0.02)` widened back to `f64`. Computed via `f32_round`
/// rather than hardcoded so the provenance of the value stays visible.
pub fn airdrag() -> f64 {
    crate::f32_round(1.0 - 0.02)
}

pub const YAW_SPEED: f64 = 3.0;
pub const PITCH_SPEED: f64 = 3.0;
pub const PLAYER_SPEED: f64 = 0.1;
pub const SNEAK_SPEED: f64 = 0.3;
pub const STEP_HEIGHT: f64 = 0.6;
pub const NEGLIGIBLE_VELOCITY: f64 = 0.003;
pub const SOULSAND_SPEED: f64 = 0.4;
pub const HONEYBLOCK_SPEED: f64 = 0.4;
pub const HONEYBLOCK_JUMP_SPEED: f64 = 0.4;
pub const LADDER_MAX_SPEED: f64 = 0.15;
pub const LADDER_CLIMB_SPEED: f64 = 0.2;
pub const PLAYER_HALF_WIDTH: f64 = 0.3;
pub const PLAYER_HEIGHT: f64 = 1.8;
pub const WATER_INERTIA: f64 = 0.8;
pub const LAVA_INERTIA: f64 = 0.5;
pub const LIQUID_ACCELERATION: f64 = 0.02;
pub const AIRBORNE_INERTIA: f64 = 0.91;
pub const AIRBORNE_ACCELERATION: f64 = 0.02;
pub const DEFAULT_SLIPPERINESS: f64 = 0.6;
pub const OUT_OF_LIQUID_IMPULSE: f64 = 0.3;
pub const AUTOJUMP_COOLDOWN: u32 = 10;
pub const SLOW_FALLING_GRAVITY_MULTIPLIER: f64 = 0.125;

/// Horizontal input multiplier (`control.forward`/`control.strafe` are
/// scaled by this before use).
pub const CONTROL_SCALE: f64 = 0.98;

/// The sprint speed attribute modifier's stable UUID (spec §4.2).
pub const SPRINT_MODIFIER_UUID: &str = "662a6b8d-da3e-4c1c-8813-96ea6097278d";
pub const SPRINT_MODIFIER_AMOUNT: f64 = 0.3;

/// Drag coefficients for bubble columns, keyed by whether the entity's head
/// pokes out of the water surface.
#[derive(Debug, Clone, Copy)]
pub struct BubbleDrag {
    pub down: f64,
    pub max_down: f64,
    pub up: f64,
    pub max_up: f64,
}

pub const BUBBLE_SURFACE: BubbleDrag = BubbleDrag {
    down: 0.03,
    max_down: -0.9,
    up: 0.1,
    max_up: 1.8,
};

pub const BUBBLE_SUBMERGED: BubbleDrag = BubbleDrag {
    down: 0.03,
    max_down: -0.3,
    up: 0.06,
    max_up: 0.7,
};
