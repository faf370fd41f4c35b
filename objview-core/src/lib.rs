//! The core of objview. This crate holds everything that does not need a
//! window or a graphics context: configuration, OBJ loading, index and vertex
//! assembly, camera transforms and the render loop itself.

pub mod config;
pub mod geometry;
pub mod model;
pub mod render;
pub mod transform;
