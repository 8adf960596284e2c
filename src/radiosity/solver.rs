use super::config::{RadiosityConfig, SolverKind};
use super::error::SolverError;
use super::flat::FlatSolver;
use super::hierarchical::HierarchicalSolver;
use super::result::RadiosityResult;
use super::scene::SceneState;

/// A radiosity method that can be run on a scene.
///
/// A solver mutates the energy state of the scene patches (and, for the
/// hierarchical method, the patch tree) and returns the displayable color of
/// every root patch.
pub trait RadiositySolver {
    /// Human-readable identifier for logging.
    fn name(&self) -> &'static str;

    fn kind(&self) -> SolverKind;

    fn solve(&mut self, scene: &mut SceneState) -> Result<RadiosityResult, SolverError>;
}

/// Creates the solver selected by the configuration.
pub fn solver_for(config: &RadiosityConfig) -> Box<dyn RadiositySolver> {
    match config.solver {
        SolverKind::Flat => Box::new(FlatSolver::from_config(config)),
        SolverKind::Hierarchical => Box::new(HierarchicalSolver::from_config(config)),
    }
}

/// Validates the configuration and runs the selected solver once.
pub fn solve_scene(
    scene: &mut SceneState,
    config: &RadiosityConfig,
) -> Result<RadiosityResult, SolverError> {
    config.validate()?;
    let mut solver = solver_for(config);
    solver.solve(scene)
}
