use thiserror::Error;

use crate::Vector;

use super::patch::PatchId;

/// Errors raised while setting up or running a solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Refinement visited more patch pairs than allowed.
    #[error("refinement exceeded its budget of {budget} patch pairs")]
    RefinementBudgetExceeded { budget: usize },

    #[error("emitter face {face} is out of range (scene has {face_count} faces)")]
    EmitterOutOfRange { face: usize, face_count: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Non-fatal findings recorded while building a scene.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneWarning {
    #[error("patch {patch} has normal {normal:.3} which matches no axis, reflectance left at fallback")]
    UnsupportedOrientation { patch: PatchId, normal: Vector },
}
