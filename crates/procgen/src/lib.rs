//! Procedural generation for the star field.

pub mod starfield;

pub use starfield::*;
