//! Pure value types shared by the physics simulator: a 3D vector, an
//! axis-aligned bounding box, and the `Axis` enum used to index both.
//!
//! Nothing in this crate touches a world, a block, or a tick — it is the
//! `steel-utils::math` equivalent for this workspace: monomorphized to
//! `f64` because the simulator never needs a generic vector, only the one
//! the reference client computes in.

mod aabb;
mod axis;
mod vec3;

pub use aabb::AABB;
pub use axis::Axis;
pub use vec3::Vec3;
