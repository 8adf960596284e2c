pub mod geom;
pub mod io;
pub mod radiosity;
pub mod render;
pub mod vecutils;

// Prelude
pub use geom::point::Point;
pub use geom::quad::Quad;
pub use geom::vector::Vector;
pub use radiosity::{RadiosityConfig, RadiosityResult, SceneState, SolverKind, solve_scene};
