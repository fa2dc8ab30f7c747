//! Per-version static block tables (spec §3/§4 `Catalogue`).
//!
//! Built once at construction from a [`BlockIdSource`] (the external
//! "game data catalogue", spec §6: `blocksByName[name] -> {id}`) and a
//! resolved [`FeatureSet`], then frozen and shared across every tick.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::PhysicsInitError;
use crate::features::FeatureSet;

/// Opaque block-type id, as handed back by the host's block-id source.
pub type BlockId = i32;

/// Sentinel id for an optional block that the host's catalogue does not
/// define for this version (spec §7: optional blocks degrade silently).
pub const ABSENT: BlockId = -1;

/// External collaborator boundary: resolves canonical block names to ids.
/// Mirrors spec §6's `blocksByName[name] -> {id}`.
pub trait BlockIdSource {
    /// Looks up a block id by its canonical (snake_case) name. Returns
    /// `None` if this version has no block of that name.
    fn block_id(&self, name: &str) -> Option<BlockId>;
}

/// Frozen per-version block/slipperiness tables.
#[derive(Debug, Clone)]
pub struct Catalogue {
    slipperiness: FxHashMap<BlockId, f64>,
    default_slipperiness: f64,

    pub slime: BlockId,
    pub soul_sand: BlockId,
    pub honey_block: BlockId,
    pub cobweb: BlockId,
    pub ladder: BlockId,
    pub vine: BlockId,
    pub bubble_column: BlockId,

    pub water: BlockId,
    pub flowing_water: BlockId,
    pub lava: BlockId,
    pub flowing_lava: BlockId,

    trapdoors: FxHashSet<BlockId>,
    water_like: FxHashSet<BlockId>,

    pub water_gravity: f64,
    pub lava_gravity: f64,
}

impl Catalogue {
    /// Builds a frozen catalogue for one `(source, features)` pair.
    ///
    /// # Errors
    /// Returns [`PhysicsInitError::MissingBlock`] if a mandatory block is
    /// absent from `source`, or [`PhysicsInitError::NoLiquidGravitySetting`]
    /// if neither liquid-gravity feature flag resolved (spec §7).
    pub fn new(source: &dyn BlockIdSource, features: &FeatureSet) -> Result<Self, PhysicsInitError> {
        let mandatory = |name: &'static str| -> Result<BlockId, PhysicsInitError> {
            source
                .block_id(name)
                .ok_or(PhysicsInitError::MissingBlock { block: name })
        };

        let slime = mandatory("slime_block")?;
        let ice = mandatory("ice")?;
        let packed_ice = mandatory("packed_ice")?;
        let soul_sand = mandatory("soul_sand")?;
        let ladder = mandatory("ladder")?;
        let vine = mandatory("vine")?;
        let water = mandatory("water")?;
        let lava = mandatory("lava")?;
        let cobweb = source
            .block_id("cobweb")
            .or_else(|| source.block_id("web"))
            .ok_or(PhysicsInitError::MissingBlock { block: "cobweb/web" })?;

        let optional = |name: &str| source.block_id(name).unwrap_or_else(|| {
            tracing::warn!(block = name, "optional catalogue block absent, using sentinel");
            ABSENT
        });

        let flowing_water = optional("flowing_water");
        let flowing_lava = optional("flowing_lava");
        let honey_block = optional("honey_block");
        let bubble_column = optional("bubble_column");
        let frosted_ice = optional("frosted_ice");
        let blue_ice = optional("blue_ice");

        let mut slipperiness = FxHashMap::default();
        slipperiness.insert(slime, 0.8);
        slipperiness.insert(ice, 0.98);
        slipperiness.insert(packed_ice, 0.98);
        if frosted_ice != ABSENT {
            slipperiness.insert(frosted_ice, 0.98);
        }
        if blue_ice != ABSENT {
            slipperiness.insert(blue_ice, 0.989);
        }

        let mut trapdoors = FxHashSet::default();
        for name in ["oak_trapdoor", "iron_trapdoor", "spruce_trapdoor", "birch_trapdoor",
            "jungle_trapdoor", "acacia_trapdoor", "dark_oak_trapdoor", "crimson_trapdoor",
            "warped_trapdoor", "mangrove_trapdoor", "cherry_trapdoor", "bamboo_trapdoor"]
        {
            if let Some(id) = source.block_id(name) {
                trapdoors.insert(id);
            }
        }

        let mut water_like = FxHashSet::default();
        for name in ["seagrass", "tall_seagrass", "kelp", "kelp_plant"] {
            if let Some(id) = source.block_id(name) {
                water_like.insert(id);
            }
        }
        if bubble_column != ABSENT {
            water_like.insert(bubble_column);
        }

        let (water_gravity, lava_gravity) = if features.is_enabled("independentLiquidGravity") {
            tracing::debug!("liquid gravity: independentLiquidGravity");
            (0.02, 0.02)
        } else if features.is_enabled("proportionalLiquidGravity") {
            tracing::debug!("liquid gravity: proportionalLiquidGravity");
            (crate::constants::GRAVITY / 16.0, crate::constants::GRAVITY / 4.0)
        } else {
            return Err(PhysicsInitError::NoLiquidGravitySetting);
        };

        Ok(Self {
            slipperiness,
            default_slipperiness: crate::constants::DEFAULT_SLIPPERINESS,
            slime,
            soul_sand,
            honey_block,
            cobweb,
            ladder,
            vine,
            bubble_column,
            water,
            flowing_water,
            lava,
            flowing_lava,
            trapdoors,
            water_like,
            water_gravity,
            lava_gravity,
        })
    }

    #[must_use]
    pub fn slipperiness(&self, block: BlockId) -> f64 {
        self.slipperiness.get(&block).copied().unwrap_or(self.default_slipperiness)
    }

    #[must_use]
    pub fn is_trapdoor(&self, block: BlockId) -> bool {
        self.trapdoors.contains(&block)
    }

    #[must_use]
    pub fn is_water_like(&self, block: BlockId) -> bool {
        self.water_like.contains(&block)
    }

    #[must_use]
    pub fn is_water(&self, block: BlockId) -> bool {
        block == self.water || block == self.flowing_water
    }

    #[must_use]
    pub fn is_lava(&self, block: BlockId) -> bool {
        block == self.lava || block == self.flowing_lava
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeSource(HashMap<&'static str, BlockId>);

    impl BlockIdSource for FakeSource {
        fn block_id(&self, name: &str) -> Option<BlockId> {
            self.0.get(name).copied()
        }
    }

    fn minimal_source() -> FakeSource {
        let mut m = HashMap::new();
        for (i, name) in [
            "slime_block", "ice", "packed_ice", "soul_sand", "ladder", "vine", "water", "lava",
            "cobweb",
        ]
        .iter()
        .enumerate()
        {
            m.insert(*name, i as BlockId);
        }
        FakeSource(m)
    }

    fn features_with(names: &[&str]) -> FeatureSet {
        use crate::features::FeatureDefinition;
        let defs: Vec<FeatureDefinition> = serde_json::from_str(&format!(
            "[{}]",
            names
                .iter()
                .map(|n| format!(r#"{{"name":"{n}","versions":["1.14"]}}"#))
                .collect::<Vec<_>>()
                .join(",")
        ))
        .unwrap();
        FeatureSet::new(&defs, crate::version::GameVersion::parse("1.14")).unwrap()
    }

    #[test]
    fn missing_mandatory_block_fails_construction() {
        let source = FakeSource(HashMap::new());
        let features = features_with(&["independentLiquidGravity"]);
        let err = Catalogue::new(&source, &features).unwrap_err();
        assert!(matches!(err, PhysicsInitError::MissingBlock { .. }));
    }

    #[test]
    fn no_liquid_gravity_feature_fails_construction() {
        let source = minimal_source();
        let features = features_with(&[]);
        let err = Catalogue::new(&source, &features).unwrap_err();
        assert!(matches!(err, PhysicsInitError::NoLiquidGravitySetting));
    }

    #[test]
    fn optional_blocks_degrade_to_sentinel() {
        let source = minimal_source();
        let features = features_with(&["independentLiquidGravity"]);
        let catalogue = Catalogue::new(&source, &features).unwrap();
        assert_eq!(catalogue.honey_block, ABSENT);
    }

    #[test]
    fn slipperiness_defaults_for_unmapped_block() {
        let source = minimal_source();
        let features = features_with(&["independentLiquidGravity"]);
        let catalogue = Catalogue::new(&source, &features).unwrap();
        assert_eq!(catalogue.slipperiness(999), crate::constants::DEFAULT_SLIPPERINESS);
        assert_eq!(catalogue.slipperiness(0), 0.8); // slime_block
    }
}
