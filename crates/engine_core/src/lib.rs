//! Core engine types and utilities for Starlight.
//!
//! This crate provides the foundational types used across the scene:
//! - Transform and spatial math
//! - Frame clock with explicit delta accumulation
//! - Cancellable timers driven by that clock

pub mod time;
pub mod timers;
pub mod transform;

pub use time::*;
pub use timers::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
