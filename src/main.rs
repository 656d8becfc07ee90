//! # Voxel Frontier Entry Point
//!
//! Calls into the library's `run()` function to open the window and start a
//! game session.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release
//! ```

fn main() {
    voxel_frontier::run();
}
