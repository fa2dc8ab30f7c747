//! Construction-time failure modes. No per-tick operation returns an error:
//! §7 of the spec treats a tick as having no exceptional path, so
//! `CollisionEngine`/`LiquidEngine`/`MovementEngine`/`PlayerState` are all
//! infallible once a `Physics` instance exists.

use thiserror::Error;

/// Failure building a [`crate::catalogue::Catalogue`] or [`crate::Physics`].
#[derive(Debug, Error)]
pub enum PhysicsInitError {
    /// Neither `independentLiquidGravity` nor `proportionalLiquidGravity` is
    /// enabled for this world version — the caller has an unrecognized
    /// version and must abort rather than guess at liquid gravity.
    #[error("no liquid gravity settings resolved for this feature set")]
    NoLiquidGravitySetting,

    /// A mandatory catalogue entry (slime, ice, packed_ice, soul_sand,
    /// ladder, vine, water, lava, cobweb/web) was not supplied by the
    /// block-id source.
    #[error("missing mandatory catalogue block: {block}")]
    MissingBlock { block: &'static str },
}

/// Failure parsing a `features.json`-style condition string (spec §6).
#[derive(Debug, Error)]
pub enum FeatureParseError {
    #[error("empty version condition")]
    Empty,

    #[error("unrecognized predicate in condition {0:?}")]
    UnknownPredicate(String),

    #[error("malformed version string in condition {0:?}")]
    MalformedVersion(String),
}
