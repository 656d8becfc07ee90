//! # Inventory
//!
//! The hotbar the player carries: a fixed list of slots and the index of the
//! one in hand. What an interaction does is decided by the selected item's
//! [`ItemKind`].

use crate::engine_state::voxels::block::block_type::BlockType;

/// Number of hotbar slots.
pub const SLOT_COUNT: usize = 6;

/// What an inventory item is and therefore what using it does.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ItemKind {
    /// Bare hand; mines
    Hand,
    /// Mines
    Pickaxe,
    /// Mines
    Axe,
    /// Edible; using it has no effect on the world
    Food,
    /// A placeable block of the given material
    Block(BlockType),
}

impl ItemKind {
    /// Whether using this item removes the targeted block.
    pub fn mines(&self) -> bool {
        matches!(self, ItemKind::Hand | ItemKind::Pickaxe | ItemKind::Axe)
    }
}

/// One hotbar slot.
#[derive(Clone, Debug, PartialEq)]
pub struct InventorySlot {
    /// Display name
    pub name: String,
    /// What the item is
    pub kind: ItemKind,
    /// How many are left
    pub count: u32,
}

impl InventorySlot {
    /// Creates a slot holding `count` of an item.
    pub fn new(name: &str, kind: ItemKind, count: u32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            count,
        }
    }

    /// Whether nothing is left in the slot.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// The player's hotbar.
#[derive(Clone, Debug, PartialEq)]
pub struct Inventory {
    slots: Vec<InventorySlot>,
    selected: usize,
}

impl Default for Inventory {
    /// The starting loadout: hand, pickaxe, three stacks of blocks and berries.
    fn default() -> Self {
        Self {
            slots: vec![
                InventorySlot::new("Hand", ItemKind::Hand, 1),
                InventorySlot::new("Pickaxe", ItemKind::Pickaxe, 1),
                InventorySlot::new("Wood Log", ItemKind::Block(BlockType::WOOD), 64),
                InventorySlot::new("Stone", ItemKind::Block(BlockType::STONE), 64),
                InventorySlot::new("Grass", ItemKind::Block(BlockType::GRASS), 64),
                InventorySlot::new("Berries", ItemKind::Food, 10),
            ],
            selected: 0,
        }
    }
}

impl Inventory {
    /// All slots in hotbar order.
    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    /// Index of the slot in hand.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The slot in hand.
    pub fn selected(&self) -> &InventorySlot {
        &self.slots[self.selected]
    }

    /// Puts the slot at `index` in hand.
    ///
    /// # Returns
    /// `false` and no change when `index` is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.slots.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Removes one item from the selected slot.
    ///
    /// # Returns
    /// `false` when the slot was already empty.
    pub fn decrement_selected(&mut self) -> bool {
        let slot = &mut self.slots[self.selected];
        if slot.count == 0 {
            return false;
        }
        slot.count -= 1;
        true
    }
}
