//! Radiosity solvers for quad scenes.
//!
//! A [`SceneState`] holds one root patch per input face. Two solvers work on
//! it:
//! - [`FlatSolver`]: full form-factor matrix between root patches, fixed
//!   number of relaxation passes.
//! - [`HierarchicalSolver`]: adaptive subdivision and linking, followed by
//!   gather/push/pull passes over the patch trees.
//!
//! [`solve_scene`] picks one from the configuration and runs it.

pub mod config;
pub mod error;
pub mod flat;
pub mod form_factor;
pub mod hierarchical;
pub mod patch;
pub mod result;
pub mod scene;
pub mod solver;

pub use config::{
    Emitter, RadiosityConfig, ReflectanceTable, SolverKind, WARM_LIGHT, read_config, write_config,
};
pub use error::{SceneWarning, SolverError};
pub use flat::FlatSolver;
pub use form_factor::{FormFactorMatrix, estimate_form_factor};
pub use hierarchical::{HierarchicalSolver, Refiner};
pub use patch::{Link, Patch, PatchId};
pub use result::{RadiosityResult, RefineStats};
pub use scene::SceneState;
pub use solver::{RadiositySolver, solve_scene, solver_for};
