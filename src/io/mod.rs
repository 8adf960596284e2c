//! File I/O for radiosity scenes.
//!
//! This module reads quad meshes and writes solved patch colors so that a
//! renderer can pick them up.

pub mod colors;
pub mod obj;

pub use colors::{from_colors_string, read_colors, to_colors_string, write_colors};
pub use obj::{GeometryError, QuadFace, QuadMesh, parse_obj, read_obj, write_obj};
