//! # Block Type Module
//!
//! This module defines the closed set of materials a voxel can be made of,
//! together with the material predicates the physics, picking and rendering
//! systems rely on.

use serde::{Deserialize, Serialize};

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are stable material ids; `BEDROCK` sits apart from the
/// dense range so new materials can be appended without renumbering it.
#[repr(u8)]
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockType {
    /// Empty space. Never stored in the block store.
    AIR = 0,
    /// The walkable surface layer.
    GRASS = 1,
    /// Plain soil.
    DIRT = 2,
    /// Default underground and mountain material.
    STONE = 3,
    /// Tree trunks.
    WOOD = 4,
    /// Tree canopies. Drawn, but does not hide the faces behind it.
    LEAVES = 5,
    /// Desert floor.
    SAND = 6,
    /// Shallow water. Neither solid nor pickable.
    WATER = 7,
    /// High-altitude caps.
    SNOW = 8,
    /// Desert decoration. Visually solid but can be walked through.
    CACTUS = 9,
    /// Ore found in the deep stone band.
    COAL_ORE = 10,
    /// Rarer ore found in the low part of the deep stone band.
    IRON_ORE = 11,
    /// The indestructible floor at `z = 0`.
    BEDROCK = 99,
}

impl BlockType {
    /// Every block type, in id order.
    pub const ALL: [BlockType; 13] = [
        BlockType::AIR,
        BlockType::GRASS,
        BlockType::DIRT,
        BlockType::STONE,
        BlockType::WOOD,
        BlockType::LEAVES,
        BlockType::SAND,
        BlockType::WATER,
        BlockType::SNOW,
        BlockType::CACTUS,
        BlockType::COAL_ORE,
        BlockType::IRON_ORE,
        BlockType::BEDROCK,
    ];

    /// Whether the block stops a moving body.
    ///
    /// Cactus is deliberately excluded: it renders as a full cube but the
    /// player walks through it.
    pub fn is_solid(&self) -> bool {
        !matches!(self, BlockType::AIR | BlockType::WATER | BlockType::CACTUS)
    }

    /// Whether a picking ray stops at this block.
    pub fn is_pickable(&self) -> bool {
        !matches!(self, BlockType::AIR | BlockType::WATER)
    }

    /// Whether this block fully hides the face of a neighbour pressed against it.
    pub fn occludes_neighbours(&self) -> bool {
        !matches!(
            self,
            BlockType::AIR | BlockType::LEAVES | BlockType::WATER | BlockType::CACTUS
        )
    }
}
