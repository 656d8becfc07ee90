//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - Perspective projection of world points to screen pixels
//!
//! ## Core Components
//! - `Camera`: The eye position and yaw/pitch orientation
//! - `Projection`: Viewport size and vertical field of view
//! - `Projector`: A projection bound to one camera pose for a frame
//! - `ScreenPoint`: A projected point with its depth scale and visibility

pub mod camera;
pub mod projection;
