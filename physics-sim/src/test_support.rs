//! Shared test fixtures: a fake block-id source and an in-memory grid world.
//! Used by every module's `#[cfg(test)] mod tests`.
#![cfg(test)]

use std::collections::HashMap;

use crate::catalogue::{BlockId, BlockIdSource, Catalogue};
use crate::features::{FeatureDefinition, FeatureSet};
use crate::version::GameVersion;
use crate::world::{Block, BlockPos, BlockProperties, World};

pub const SLIME: BlockId = 0;
pub const ICE: BlockId = 1;
pub const PACKED_ICE: BlockId = 2;
pub const SOUL_SAND: BlockId = 3;
pub const LADDER: BlockId = 4;
pub const VINE: BlockId = 5;
pub const WATER: BlockId = 6;
pub const LAVA: BlockId = 7;
pub const COBWEB: BlockId = 8;
pub const HONEY_BLOCK: BlockId = 9;
pub const STONE: BlockId = 10;
pub const BUBBLE_COLUMN: BlockId = 11;

pub struct FakeSource(HashMap<&'static str, BlockId>);

impl BlockIdSource for FakeSource {
    fn block_id(&self, name: &str) -> Option<BlockId> {
        self.0.get(name).copied()
    }
}

pub fn standard_source() -> FakeSource {
    let mut m = HashMap::new();
    m.insert("slime_block", SLIME);
    m.insert("ice", ICE);
    m.insert("packed_ice", PACKED_ICE);
    m.insert("soul_sand", SOUL_SAND);
    m.insert("stone", STONE);
    m.insert("ladder", LADDER);
    m.insert("vine", VINE);
    m.insert("water", WATER);
    m.insert("lava", LAVA);
    m.insert("cobweb", COBWEB);
    m.insert("honey_block", HONEY_BLOCK);
    m.insert("bubble_column", BUBBLE_COLUMN);
    FakeSource(m)
}

pub fn features(names: &[&str]) -> FeatureSet {
    let defs: Vec<FeatureDefinition> = serde_json::from_str(&format!(
        "[{}]",
        names
            .iter()
            .map(|n| format!(r#"{{"name":"{n}","versions":["1.14"]}}"#))
            .collect::<Vec<_>>()
            .join(",")
    ))
    .unwrap();
    FeatureSet::new(&defs, GameVersion::parse("1.14")).unwrap()
}

pub fn standard_catalogue(extra_features: &[&str]) -> Catalogue {
    let source = standard_source();
    let mut names = vec!["independentLiquidGravity"];
    names.extend_from_slice(extra_features);
    let features = features(&names);
    Catalogue::new(&source, &features).unwrap()
}

/// A trivially small in-memory world keyed by integer block position.
#[derive(Default)]
pub struct GridWorld {
    blocks: HashMap<(i32, i32, i32), Block>,
}

impl GridWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_full_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockId) -> &mut Self {
        self.blocks.insert(
            (x, y, z),
            Block {
                position: BlockPos::new(x, y, z),
                block_type,
                metadata: 0,
                shapes: vec![[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]],
                properties: BlockProperties::default(),
            },
        );
        self
    }

    pub fn set_slab(&mut self, x: i32, y: i32, z: i32, block_type: BlockId) -> &mut Self {
        self.blocks.insert(
            (x, y, z),
            Block {
                position: BlockPos::new(x, y, z),
                block_type,
                metadata: 0,
                shapes: vec![[0.0, 0.0, 0.0, 1.0, 0.5, 1.0]],
                properties: BlockProperties::default(),
            },
        );
        self
    }

    pub fn set_no_collision(&mut self, x: i32, y: i32, z: i32, block_type: BlockId) -> &mut Self {
        self.blocks.insert(
            (x, y, z),
            Block {
                position: BlockPos::new(x, y, z),
                block_type,
                metadata: 0,
                shapes: Vec::new(),
                properties: BlockProperties::default(),
            },
        );
        self
    }

    pub fn set_block(&mut self, block: Block) -> &mut Self {
        let pos = (block.position.x, block.position.y, block.position.z);
        self.blocks.insert(pos, block);
        self
    }
}

impl World for GridWorld {
    fn get_block(&self, pos: BlockPos) -> Option<Block> {
        self.blocks.get(&(pos.x, pos.y, pos.z)).cloned()
    }
}
