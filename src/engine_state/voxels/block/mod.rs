//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, the block record
//! handed out by the block store and the per-material face colours.

use block_type::BlockType;
use cgmath::Point3;

use crate::engine_state::rendering::color::Rgba;

pub mod block_side;
pub mod block_type;

/// The colours used for the three kinds of face a block can show.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FacePalette {
    /// Colour of the face pointing up
    pub top: Rgba,
    /// Colour of the four vertical faces
    pub side: Rgba,
    /// Colour of the face pointing down
    pub bottom: Rgba,
}

impl FacePalette {
    const fn new(top: u32, side: u32, bottom: u32) -> Self {
        Self {
            top: Rgba::from_hex(top),
            side: Rgba::from_hex(side),
            bottom: Rgba::from_hex(bottom),
        }
    }
}

static AIR_PALETTE: FacePalette = FacePalette::new(0x000000, 0x000000, 0x000000);
static GRASS_PALETTE: FacePalette = FacePalette::new(0x4ade80, 0x166534, 0x14532d);
static DIRT_PALETTE: FacePalette = FacePalette::new(0xa87138, 0x78350f, 0x451a03);
static STONE_PALETTE: FacePalette = FacePalette::new(0x94a3b8, 0x475569, 0x1e293b);
static WOOD_PALETTE: FacePalette = FacePalette::new(0x5d4037, 0x3e2723, 0x271c19);
static LEAVES_PALETTE: FacePalette = FacePalette::new(0x65a30d, 0x365314, 0x1a2e05);
static SAND_PALETTE: FacePalette = FacePalette::new(0xfde047, 0xca8a04, 0x854d0e);
static WATER_PALETTE: FacePalette = FacePalette::new(0x60a5fa, 0x1d4ed8, 0x1e3a8a);
static SNOW_PALETTE: FacePalette = FacePalette::new(0xf8fafc, 0xcbd5e1, 0x94a3b8);
static CACTUS_PALETTE: FacePalette = FacePalette::new(0x10b981, 0x047857, 0x064e3b);
static COAL_ORE_PALETTE: FacePalette = FacePalette::new(0x525252, 0x262626, 0x171717);
static IRON_ORE_PALETTE: FacePalette = FacePalette::new(0xd6d3d1, 0xa8a29e, 0x78716c);
static BEDROCK_PALETTE: FacePalette = FacePalette::new(0x0f172a, 0x020617, 0x000000);

impl BlockType {
    /// The face colours used when drawing a block of this type.
    pub fn palette(&self) -> &'static FacePalette {
        match self {
            BlockType::AIR => &AIR_PALETTE,
            BlockType::GRASS => &GRASS_PALETTE,
            BlockType::DIRT => &DIRT_PALETTE,
            BlockType::STONE => &STONE_PALETTE,
            BlockType::WOOD => &WOOD_PALETTE,
            BlockType::LEAVES => &LEAVES_PALETTE,
            BlockType::SAND => &SAND_PALETTE,
            BlockType::WATER => &WATER_PALETTE,
            BlockType::SNOW => &SNOW_PALETTE,
            BlockType::CACTUS => &CACTUS_PALETTE,
            BlockType::COAL_ORE => &COAL_ORE_PALETTE,
            BlockType::IRON_ORE => &IRON_ORE_PALETTE,
            BlockType::BEDROCK => &BEDROCK_PALETTE,
        }
    }
}

/// Represents a single voxel block in the world.
///
/// This is a lightweight value: the store keeps only the material per cell and
/// rebuilds the record on lookup, so holding a `Block` never borrows the world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// Integer coordinates of the block's minimum corner (`z` is up).
    pub position: Point3<i32>,
    /// The material of this block.
    pub block_type: BlockType,
}

impl Block {
    /// Creates a new block of the specified type at the given cell.
    ///
    /// # Arguments
    /// * `position` - The integer cell the block occupies
    /// * `block_type` - The type of block to create
    ///
    /// # Returns
    /// A new `Block` instance.
    pub fn new(position: Point3<i32>, block_type: BlockType) -> Self {
        Block {
            position,
            block_type,
        }
    }
}
