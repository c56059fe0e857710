//! Voxel store interface the generator paints through, plus a deterministic
//! in-memory implementation for tests and tooling.

use std::collections::BTreeMap;

use crate::types::{Block, BlockPos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Biome {
    DeepOcean,
    Ocean,
    Shore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeightmapKind {
    /// Highest non-water block column height.
    OceanFloor,
    /// Highest block including fluids.
    WorldSurface,
}

/// Notify neighbors of the write. The generator always passes this; the flag
/// set is opaque to this crate and interpreted by the real storage engine.
pub const BLOCK_UPDATE_FLAGS: u32 = 0b10;

/// Narrow read/write/query interface onto the voxel world. All positions are
/// absolute world-space coordinates.
pub trait VoxelStore {
    fn get_block(&self, pos: BlockPos) -> Block;
    fn set_block(&mut self, pos: BlockPos, block: Block, flags: u32);
    fn get_biome(&self, pos: BlockPos) -> Biome;
    fn surface_height(&self, x: i32, z: i32, heightmap: HeightmapKind) -> i32;
}

/// Flat test ocean: seafloor at `floor_level` and below, water up to
/// `sea_level`, air above. Writes land in a `BTreeMap` so iteration order,
/// and therefore every downstream comparison, is deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryWorld {
    sea_level: i32,
    floor_level: i32,
    blocks: BTreeMap<BlockPos, Block>,
    mutations: u64,
}

impl MemoryWorld {
    pub fn deep_ocean(sea_level: i32, floor_level: i32) -> Self {
        assert!(floor_level < sea_level, "seafloor must lie below sea level");
        Self { sea_level, floor_level, blocks: BTreeMap::new(), mutations: 0 }
    }

    fn terrain_block(&self, pos: BlockPos) -> Block {
        if pos.y <= self.floor_level {
            Block::Seafloor
        } else if pos.y <= self.sea_level {
            Block::Water
        } else {
            Block::Air
        }
    }

    /// Every position whose block differs from the untouched terrain.
    pub fn written_blocks(&self) -> &BTreeMap<BlockPos, Block> {
        &self.blocks
    }

    /// Count of `set_block` calls that actually changed a stored value.
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }
}

impl VoxelStore for MemoryWorld {
    fn get_block(&self, pos: BlockPos) -> Block {
        self.blocks.get(&pos).copied().unwrap_or_else(|| self.terrain_block(pos))
    }

    fn set_block(&mut self, pos: BlockPos, block: Block, _flags: u32) {
        if self.get_block(pos) != block {
            self.mutations += 1;
        }
        self.blocks.insert(pos, block);
    }

    fn get_biome(&self, _pos: BlockPos) -> Biome {
        if self.sea_level - self.floor_level >= 20 { Biome::DeepOcean } else { Biome::Ocean }
    }

    fn surface_height(&self, _x: i32, _z: i32, heightmap: HeightmapKind) -> i32 {
        match heightmap {
            HeightmapKind::OceanFloor => self.floor_level,
            HeightmapKind::WorldSurface => self.sea_level,
        }
    }
}
