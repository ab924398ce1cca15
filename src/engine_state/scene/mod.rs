//! # Scene Module
//!
//! The fixed, non-terrain objects of the demo. Currently just the spinning
//! textured cube at the origin.

pub mod cube;

pub use cube::Cube;
