//! # Voxel World
//!
//! This module contains the voxel world itself: what a block is, where blocks
//! are kept, and how a fresh world is generated.
//!
//! ## Architecture
//!
//! * **Block**: block types, faces, per-type face colours and the block record
//! * **Block Store**: sparse, hash-keyed storage of every non-air block
//! * **Generation**: height map, biome classifier and decorations that fill a
//!   store in one pass
//!
//! ## Data Flow
//!
//! 1. The session asks the generator for a store at start-up, respawn and on
//!    "new world"
//! 2. Physics, picking and rendering read the store every frame
//! 3. Mining deletes from the store, placement inserts into it
//!
//! Everything here runs on the frame loop's thread; nothing is shared.

pub mod block;
pub mod block_store;
pub mod generation;
