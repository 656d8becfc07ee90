//! # Block Store Module
//!
//! This module provides the `BlockStore`, the sparse container holding every
//! non-air block of the world.
//!
//! ## Architecture
//!
//! Only occupied cells are kept. Each cell coordinate is packed into a single
//! `u64` key (21 bits per axis, offset binary), so a lookup is one integer hash
//! and one lookup. Absence of a key means air.
//!
//! ## Performance Considerations
//!
//! - Lookup, insertion and removal are O(1) on average
//! - The renderer and collision resolver query the store many thousands of
//!   times per frame, so nothing here allocates on the read path

use std::collections::HashMap;

use cgmath::Point3;

use super::block::{block_type::BlockType, Block};

/// Number of bits used for each packed axis.
const AXIS_BITS: u32 = 21;
/// Offset added to a coordinate so the packed value is never negative.
const AXIS_OFFSET: i64 = 1 << (AXIS_BITS - 1);
/// Mask selecting one packed axis.
const AXIS_MASK: u64 = (1 << AXIS_BITS) - 1;

/// Smallest coordinate that can be stored on any axis.
pub const MIN_COORDINATE: i32 = -(AXIS_OFFSET as i32);
/// Largest coordinate that can be stored on any axis.
pub const MAX_COORDINATE: i32 = (AXIS_OFFSET - 1) as i32;

/// Packs a cell coordinate into a single map key.
///
/// # Returns
/// `None` when any axis lies outside `MIN_COORDINATE..=MAX_COORDINATE`.
fn pack_key(x: i32, y: i32, z: i32) -> Option<u64> {
    let range = MIN_COORDINATE..=MAX_COORDINATE;
    if !(range.contains(&x) && range.contains(&y) && range.contains(&z)) {
        return None;
    }
    let axis = |c: i32| ((c as i64 + AXIS_OFFSET) as u64) & AXIS_MASK;
    Some(axis(x) | (axis(y) << AXIS_BITS) | (axis(z) << (2 * AXIS_BITS)))
}

/// Inverse of [`pack_key`].
fn unpack_key(key: u64) -> Point3<i32> {
    let axis = |shift: u32| (((key >> shift) & AXIS_MASK) as i64 - AXIS_OFFSET) as i32;
    Point3::new(axis(0), axis(AXIS_BITS), axis(2 * AXIS_BITS))
}

/// Sparse mapping from integer cell coordinates to block materials.
///
/// # Examples
///
/// ```
/// use voxel_frontier::engine_state::voxels::{block::block_type::BlockType, block_store::BlockStore};
///
/// let mut store = BlockStore::new();
/// store.set(1, 2, 3, BlockType::STONE);
/// assert_eq!(store.get(1, 2, 3).map(|b| b.block_type), Some(BlockType::STONE));
/// assert!(store.get(0, 0, 0).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct BlockStore {
    blocks: HashMap<u64, BlockType>,
}

impl BlockStore {
    /// Creates a new, empty store (a world made entirely of air).
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
        }
    }

    /// Creates an empty store with room for `capacity` blocks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            blocks: HashMap::with_capacity(capacity),
        }
    }

    /// Looks up the block occupying a cell.
    ///
    /// # Returns
    /// The block record, or `None` if the cell holds air or cannot be addressed.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        let key = pack_key(x, y, z)?;
        self.blocks
            .get(&key)
            .map(|&block_type| Block::new(Point3::new(x, y, z), block_type))
    }

    /// Convenience wrapper around [`BlockStore::get`] taking a point.
    pub fn get_at(&self, position: Point3<i32>) -> Option<Block> {
        self.get(position.x, position.y, position.z)
    }

    /// Whether a block occupies the cell.
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        pack_key(x, y, z).is_some_and(|key| self.blocks.contains_key(&key))
    }

    /// Writes a block into a cell, replacing whatever was there.
    ///
    /// Writing `AIR` removes the entry so air is never stored. Writes outside
    /// the addressable range are dropped.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) {
        let Some(key) = pack_key(x, y, z) else {
            log::warn!("Ignoring block write outside the addressable range at ({x}, {y}, {z})");
            return;
        };

        if block_type == BlockType::AIR {
            self.blocks.remove(&key);
        } else {
            self.blocks.insert(key, block_type);
        }
    }

    /// Convenience wrapper around [`BlockStore::set`] taking a point.
    pub fn set_at(&mut self, position: Point3<i32>, block_type: BlockType) {
        self.set(position.x, position.y, position.z, block_type);
    }

    /// Removes the block occupying a cell.
    ///
    /// # Returns
    /// The removed block, or `None` if the cell already held air.
    pub fn delete(&mut self, x: i32, y: i32, z: i32) -> Option<Block> {
        let key = pack_key(x, y, z)?;
        self.blocks
            .remove(&key)
            .map(|block_type| Block::new(Point3::new(x, y, z), block_type))
    }

    /// Number of stored (non-air) blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the store holds no blocks at all.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over every stored block in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = Block> + '_ {
        self.blocks
            .iter()
            .map(|(&key, &block_type)| Block::new(unpack_key(key), block_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cells_are_air() {
        let store = BlockStore::new();
        assert!(store.get(0, 0, 0).is_none());
        assert!(!store.contains(4, -4, 2));
    }

    #[test]
    fn set_get_delete() {
        let mut store = BlockStore::new();
        store.set(-3, 7, 0, BlockType::BEDROCK);
        assert_eq!(
            store.get(-3, 7, 0),
            Some(Block::new(Point3::new(-3, 7, 0), BlockType::BEDROCK))
        );

        store.set(-3, 7, 0, BlockType::SAND);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(-3, 7, 0).map(|b| b.block_type), Some(BlockType::SAND));

        assert_eq!(store.delete(-3, 7, 0).map(|b| b.block_type), Some(BlockType::SAND));
        assert!(store.delete(-3, 7, 0).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn writing_air_removes_the_entry() {
        let mut store = BlockStore::new();
        store.set(1, 1, 1, BlockType::DIRT);
        store.set(1, 1, 1, BlockType::AIR);
        assert!(store.is_empty());
    }

    #[test]
    fn neighbouring_cells_do_not_alias() {
        let mut store = BlockStore::new();
        store.set(0, 0, 1, BlockType::STONE);
        store.set(0, 1, 0, BlockType::GRASS);
        store.set(1, 0, 0, BlockType::WOOD);
        store.set(-1, 0, 0, BlockType::SNOW);
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(0, 0, 1).map(|b| b.block_type), Some(BlockType::STONE));
        assert_eq!(store.get(0, 1, 0).map(|b| b.block_type), Some(BlockType::GRASS));
        assert_eq!(store.get(1, 0, 0).map(|b| b.block_type), Some(BlockType::WOOD));
        assert_eq!(store.get(-1, 0, 0).map(|b| b.block_type), Some(BlockType::SNOW));
    }

    #[test]
    fn keys_survive_packing_at_the_range_edges() {
        for &(x, y, z) in &[
            (MIN_COORDINATE, 0, MAX_COORDINATE),
            (MAX_COORDINATE, MIN_COORDINATE, -1),
            (-37, 37, -5),
        ] {
            let key = pack_key(x, y, z).unwrap();
            assert_eq!(unpack_key(key), Point3::new(x, y, z));
        }
        assert!(pack_key(MAX_COORDINATE + 1, 0, 0).is_none());
    }

    #[test]
    fn out_of_range_writes_are_dropped() {
        let mut store = BlockStore::new();
        store.set(MIN_COORDINATE - 1, 0, 0, BlockType::STONE);
        assert!(store.is_empty());
        assert!(store.get(MIN_COORDINATE - 1, 0, 0).is_none());
    }

    #[test]
    fn iteration_reports_positions() {
        let mut store = BlockStore::new();
        store.set(2, -2, 5, BlockType::LEAVES);
        let blocks: Vec<Block> = store.iter().collect();
        assert_eq!(blocks, vec![Block::new(Point3::new(2, -2, 5), BlockType::LEAVES)]);
    }
}
