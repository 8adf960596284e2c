//! Flat radiosity over the full form-factor matrix.
//!
//! Every pass recomputes all root patches from the colors of the previous
//! pass:
//! - `B'_i = sum_j(F_ij * (E_j + rho_j * B_j))`
//!
//! Rows of `F` are normalized, so a pass is a weighted average of what the
//! other patches show. The pass count is fixed, there is no convergence test.

use log::{debug, info};

use crate::vecutils::{BLACK, Rgb, rgb_abs_diff, rgb_add, rgb_scale};

use super::config::{RadiosityConfig, SolverKind};
use super::error::SolverError;
use super::form_factor::FormFactorMatrix;
use super::result::RadiosityResult;
use super::scene::SceneState;
use super::solver::RadiositySolver;

pub struct FlatSolver {
    iterations: usize,
}

impl FlatSolver {
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    pub fn from_config(config: &RadiosityConfig) -> Self {
        Self::new(config.flat_iterations)
    }

    /// Runs one relaxation pass and returns the total absolute change.
    pub fn iterate(scene: &mut SceneState, ff: &FormFactorMatrix) -> f64 {
        let roots = scene.roots().to_vec();
        let shown: Vec<Rgb> = roots
            .iter()
            .map(|&id| scene.patch(id).radiosity_color())
            .collect();

        let mut change = 0.0;
        for (i, &id) in roots.iter().enumerate() {
            let new = ff
                .row(i)
                .iter()
                .zip(&shown)
                .fold(BLACK, |acc, (&f, &c)| rgb_add(acc, rgb_scale(c, f)));
            let patch = scene.patch_mut(id);
            change += rgb_abs_diff(new, patch.radiosity);
            patch.radiosity = new;
        }
        change
    }
}

impl RadiositySolver for FlatSolver {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn kind(&self) -> SolverKind {
        SolverKind::Flat
    }

    fn solve(&mut self, scene: &mut SceneState) -> Result<RadiosityResult, SolverError> {
        let ff = FormFactorMatrix::from_scene(scene);
        debug!("Estimated {0}x{0} form factors", ff.len());

        let mut pass_changes = Vec::with_capacity(self.iterations);
        for pass in 0..self.iterations {
            let change = Self::iterate(scene, &ff);
            debug!("Flat pass {} out of {}: change {change:.6}", pass + 1, self.iterations);
            pass_changes.push(change);
        }
        info!(
            "Flat radiosity finished: {} patches, {} passes",
            scene.root_count(),
            self.iterations
        );

        Ok(RadiosityResult {
            solver: SolverKind::Flat,
            colors: scene.root_colors(SolverKind::Flat),
            pass_changes,
            refine: None,
            patch_count: scene.len(),
        })
    }
}
