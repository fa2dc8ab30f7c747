//! Per-regime velocity integration, heading, jumping, and the firework
//! rocket thrust (spec §4.2 `MovementEngine`).

use physics_primitives::Vec3;

use crate::catalogue::Catalogue;
use crate::collision::{self, BlockEffects};
use crate::constants::{
    self, AIRBORNE_ACCELERATION, AIRBORNE_INERTIA, AUTOJUMP_COOLDOWN, GRAVITY, LADDER_CLIMB_SPEED,
    LADDER_MAX_SPEED, LAVA_INERTIA, LIQUID_ACCELERATION, SPRINT_MODIFIER_AMOUNT, SPRINT_MODIFIER_UUID,
    WATER_INERTIA,
};
use crate::entity::Entity;
use crate::features::FeatureSet;
use crate::liquid;
use crate::world::{BlockPos, World};

fn look_vector(yaw: f64, pitch: f64) -> Vec3 {
    Vec3::new(-yaw.sin() * pitch.cos(), -pitch.sin(), yaw.cos() * pitch.cos())
}

fn gravity_multiplier(vel_y: f64, slow_falling: u32) -> f64 {
    if vel_y <= 0.0 && slow_falling > 0 {
        constants::SLOW_FALLING_GRAVITY_MULTIPLIER
    } else {
        1.0
    }
}

fn block_below(pos: Vec3, offset: f64) -> BlockPos {
    BlockPos::new(pos.x.floor() as i32, (pos.y - offset).floor() as i32, pos.z.floor() as i32)
}

/// Turns `strafe`/`forward` input (already scaled by the caller) into a
/// yaw-rotated velocity delta, scaled so the combined input never exceeds
/// `multiplier`.
pub fn apply_heading(entity: &mut Entity, strafe: f64, forward: f64, multiplier: f64) {
    let speed = (strafe * strafe + forward * forward).sqrt();
    if speed < 0.01 {
        return;
    }
    let scale = multiplier / speed.max(1.0);
    let strafe = strafe * scale;
    let forward = forward * scale;

    let yaw = std::f64::consts::PI - entity.yaw;
    entity.vel.x -= strafe * yaw.cos() + forward * yaw.sin();
    entity.vel.z += forward * yaw.cos() - strafe * yaw.sin();
}

/// True if the block at `pos` is a ladder, a vine, or (with
/// `climableTrapdoor` enabled) an open trapdoor sitting directly above a
/// ladder with matching `facing`.
#[must_use]
pub fn is_on_ladder(world: &dyn World, catalogue: &Catalogue, features: &FeatureSet, pos: Vec3) -> bool {
    let here = BlockPos::new(pos.x.floor() as i32, pos.y.floor() as i32, pos.z.floor() as i32);
    let Some(block) = world.get_block(here) else {
        return false;
    };
    if block.block_type == catalogue.ladder || block.block_type == catalogue.vine {
        return true;
    }
    if !features.is_enabled("climableTrapdoor") || !catalogue.is_trapdoor(block.block_type) {
        return false;
    }
    if !block.properties.open {
        return false;
    }
    let below = BlockPos::new(here.x, here.y - 1, here.z);
    let Some(below_block) = world.get_block(below) else {
        return false;
    };
    below_block.block_type == catalogue.ladder && below_block.properties.facing == block.properties.facing
}

fn refresh_sprint_modifier(entity: &mut Entity) {
    use crate::attribute::{add_attribute_modifier, delete_attribute_modifier, Operation};
    use uuid::Uuid;

    let sprint = entity.control.sprint;
    let uuid = Uuid::parse_str(SPRINT_MODIFIER_UUID).expect("constant UUID is well-formed");
    let attr = entity.movement_speed_mut();
    delete_attribute_modifier(attr, uuid);
    if sprint {
        add_attribute_modifier(attr, uuid, SPRINT_MODIFIER_AMOUNT, Operation::MultiplyTotal);
    }
}

fn would_collide_at(entity: &Entity, world: &dyn World, delta: Vec3) -> bool {
    let bb = entity.bounding_box().offset_by(delta.x, delta.y, delta.z);
    collision::any_intersect(world, &bb)
}

fn move_liquid(
    entity: &mut Entity,
    world: &dyn World,
    catalogue: &Catalogue,
    features: &FeatureSet,
    strafe: f64,
    forward: f64,
) -> BlockEffects {
    let in_water = entity.is_in_water;
    let mut horizontal_inertia = if in_water { WATER_INERTIA } else { LAVA_INERTIA };
    let mut acceleration = LIQUID_ACCELERATION;

    if in_water {
        let mut depth_strider = f64::from(entity.depth_strider.min(3));
        if !entity.on_ground {
            depth_strider /= 2.0;
        }
        horizontal_inertia += (0.546 - horizontal_inertia) * depth_strider / 3.0;
        acceleration += (0.7 - acceleration) * depth_strider / 3.0;
    }
    if entity.dolphins_grace > 0 {
        horizontal_inertia = 0.96;
    }

    apply_heading(entity, strafe, forward, acceleration);

    let last_y = entity.pos.y;
    let (vx, vy, vz) = (entity.vel.x, entity.vel.y, entity.vel.z);
    let effects = collision::move_entity(entity, world, catalogue, features, vx, vy, vz);

    let gravity = if in_water { catalogue.water_gravity } else { catalogue.lava_gravity };
    let grav_mult = gravity_multiplier(entity.vel.y, entity.slow_falling);
    entity.vel.y *= horizontal_inertia - gravity * grav_mult;
    entity.vel.x *= horizontal_inertia;
    entity.vel.z *= horizontal_inertia;

    if entity.is_collided_horizontally {
        let probe = Vec3::new(entity.vel.x, 0.6 + entity.vel.y - (entity.pos.y - last_y), entity.vel.z);
        if !would_collide_at(entity, world, probe) {
            entity.vel.y = constants::OUT_OF_LIQUID_IMPULSE;
        }
    }

    effects
}

fn move_elytra(entity: &mut Entity, world: &dyn World, catalogue: &Catalogue, features: &FeatureSet) -> BlockEffects {
    let look = look_vector(entity.yaw, entity.pitch);
    let pitch = entity.pitch;
    let c = pitch.cos();
    let c2 = c * c;
    let horizontal_speed = (entity.vel.x * entity.vel.x + entity.vel.z * entity.vel.z).sqrt();

    let grav_mult = gravity_multiplier(entity.vel.y, entity.slow_falling);
    entity.vel.y += GRAVITY * grav_mult * (-1.0 + 0.75 * c2);

    if entity.vel.y < 0.0 && c > 0.0 {
        let m = entity.vel.y * -0.1 * c2;
        entity.vel.x += look.x * m / c;
        entity.vel.y += m;
        entity.vel.z += look.z * m / c;
    }
    if pitch < 0.0 && c > 0.0 {
        let m = horizontal_speed * -pitch.sin() * 0.04;
        entity.vel.x -= look.x * m / c;
        entity.vel.y += m * 3.2;
        entity.vel.z -= look.z * m / c;
    }
    if c > 0.0 {
        entity.vel.x += (look.x / c * horizontal_speed - entity.vel.x) * 0.1;
        entity.vel.z += (look.z / c * horizontal_speed - entity.vel.z) * 0.1;
    }
    entity.vel.x *= 0.99;
    entity.vel.y *= 0.98;
    entity.vel.z *= 0.99;

    let (vx, vy, vz) = (entity.vel.x, entity.vel.y, entity.vel.z);
    let effects = collision::move_entity(entity, world, catalogue, features, vx, vy, vz);

    if entity.on_ground {
        entity.elytra_flying = false;
    }

    effects
}

fn move_normal(
    entity: &mut Entity,
    world: &dyn World,
    catalogue: &Catalogue,
    features: &FeatureSet,
    strafe: f64,
    forward: f64,
) -> BlockEffects {
    let (inertia, mut acceleration);

    refresh_sprint_modifier(entity);
    let attr_speed = crate::attribute::get_attribute_value(&entity.attributes[crate::entity::MOVEMENT_SPEED_KEY]);

    if entity.on_ground {
        let below = block_below(entity.pos, 1.0);
        let slipperiness = world
            .get_block(below)
            .map_or(constants::DEFAULT_SLIPPERINESS, |b| catalogue.slipperiness(b.block_type));
        inertia = slipperiness * 0.91;
        acceleration = (attr_speed * 0.162_771_4 / (inertia * inertia * inertia)).max(0.0);
    } else {
        inertia = AIRBORNE_INERTIA;
        acceleration = AIRBORNE_ACCELERATION;
        if entity.control.sprint {
            acceleration += AIRBORNE_ACCELERATION * 0.3;
        }
    }

    apply_heading(entity, strafe, forward, acceleration);

    let on_ladder_before = is_on_ladder(world, catalogue, features, entity.pos);
    if on_ladder_before {
        entity.vel.x = entity.vel.x.clamp(-LADDER_MAX_SPEED, LADDER_MAX_SPEED);
        entity.vel.z = entity.vel.z.clamp(-LADDER_MAX_SPEED, LADDER_MAX_SPEED);
        let floor = if entity.control.sneak { 0.0 } else { -LADDER_MAX_SPEED };
        entity.vel.y = entity.vel.y.max(floor);
    }

    let (vx, vy, vz) = (entity.vel.x, entity.vel.y, entity.vel.z);
    let effects = collision::move_entity(entity, world, catalogue, features, vx, vy, vz);

    let on_ladder_after = is_on_ladder(world, catalogue, features, entity.pos);
    if on_ladder_after
        && (entity.is_collided_horizontally || (features.is_enabled("climbUsingJump") && entity.control.jump))
    {
        entity.vel.y = LADDER_CLIMB_SPEED;
    }

    if entity.levitation > 0 {
        entity.vel.y += (0.05 * f64::from(entity.levitation) - entity.vel.y) * 0.2;
    } else {
        let grav_mult = gravity_multiplier(entity.vel.y, entity.slow_falling);
        entity.vel.y -= GRAVITY * grav_mult;
    }
    entity.vel.y *= constants::airdrag();
    entity.vel.x *= inertia;
    entity.vel.z *= inertia;

    effects
}

/// Dispatches to the liquid, elytra, or normal regime based on the
/// entity's current flags, then resolves the move through the collision
/// engine.
pub fn move_entity_with_heading(
    entity: &mut Entity,
    world: &dyn World,
    catalogue: &Catalogue,
    features: &FeatureSet,
    strafe: f64,
    forward: f64,
) -> BlockEffects {
    if entity.is_in_water || entity.is_in_lava {
        move_liquid(entity, world, catalogue, features, strafe, forward)
    } else if entity.elytra_flying {
        move_elytra(entity, world, catalogue, features)
    } else {
        move_normal(entity, world, catalogue, features, strafe, forward)
    }
}

/// Runs one full tick: liquid/ladder detection, the dead-zone, jumping,
/// heading derivation, elytra gating, firework thrust, and the regime move
/// (spec §4.2 `simulatePlayer`).
pub fn simulate_player(entity: &mut Entity, world: &dyn World, catalogue: &Catalogue, features: &FeatureSet) {
    let water_query = entity.bounding_box().contract(0.001, 0.401, 0.001);
    entity.is_in_water = liquid::is_in_water_apply_current(world, catalogue, &water_query, &mut entity.vel);

    let lava_query = entity.bounding_box().contract(0.1, 0.4, 0.1);
    entity.is_in_lava = any_lava_in_bb(world, catalogue, &lava_query);

    for v in [&mut entity.vel.x, &mut entity.vel.y, &mut entity.vel.z] {
        if v.abs() < constants::NEGLIGIBLE_VELOCITY {
            *v = 0.0;
        }
    }

    if entity.control.jump || entity.jump_queued {
        entity.jump_ticks = entity.jump_ticks.saturating_sub(1);
        if entity.is_in_water || entity.is_in_lava {
            entity.vel.y += 0.04;
        } else if entity.on_ground && entity.jump_ticks == 0 {
            let mut vy = crate::f32_round(0.42);
            let below = block_below(entity.pos, 0.5);
            if world.get_block(below).is_some_and(|b| b.block_type == catalogue.honey_block) {
                vy *= constants::HONEYBLOCK_JUMP_SPEED;
            }
            vy += 0.1 * f64::from(entity.jump_boost);
            entity.vel.y = vy;
            if entity.control.sprint {
                let yaw = std::f64::consts::PI - entity.yaw;
                entity.vel.x += -yaw.sin() * 0.2;
                entity.vel.z += yaw.cos() * 0.2;
            }
            entity.jump_ticks = AUTOJUMP_COOLDOWN;
        }
    } else {
        entity.jump_ticks = 0;
    }
    entity.jump_queued = false;

    let mut strafe = entity.control.strafe();
    let mut forward = entity.control.forward_axis();
    if entity.control.sneak {
        strafe *= constants::SNEAK_SPEED;
        forward *= constants::SNEAK_SPEED;
    }

    entity.elytra_flying = entity.elytra_flying && entity.elytra_equipped && !entity.on_ground && entity.levitation == 0;

    if entity.firework_rocket_duration > 0 && entity.elytra_flying {
        let look = look_vector(entity.yaw, entity.pitch);
        entity.vel.x += look.x * 0.1 + (look.x * 1.5 - entity.vel.x) * 0.5;
        entity.vel.y += look.y * 0.1 + (look.y * 1.5 - entity.vel.y) * 0.5;
        entity.vel.z += look.z * 0.1 + (look.z * 1.5 - entity.vel.z) * 0.5;
        entity.firework_rocket_duration -= 1;
    } else if !entity.elytra_flying {
        entity.firework_rocket_duration = 0;
    }

    move_entity_with_heading(entity, world, catalogue, features, strafe, forward);
}

fn any_lava_in_bb(world: &dyn World, catalogue: &Catalogue, bb: &physics_primitives::AABB) -> bool {
    let min_x = bb.min_x.floor() as i32;
    let max_x = bb.max_x.floor() as i32;
    let min_y = bb.min_y.floor() as i32;
    let max_y = bb.max_y.floor() as i32;
    let min_z = bb.min_z.floor() as i32;
    let max_z = bb.max_z.floor() as i32;

    for y in min_y..=max_y {
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                if world
                    .get_block(BlockPos::new(x, y, z))
                    .is_some_and(|b| catalogue.is_lava(b.block_type))
                {
                    return true;
                }
            }
        }
    }
    false
}
