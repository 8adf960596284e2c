//! Hierarchical radiosity.
//!
//! Refinement walks every ordered pair of root patches and either links the
//! pair or splits the patch with the larger incoming form factor, until both
//! estimates fall under `link_epsilon` or the patch to split is at or below
//! `area_threshold`. Energy then flows over the links in three passes:
//! - gather: `g_p = sum(w * rho_p * (E_q + rho_q * B_q))` over the links of `p`
//! - push: every child adds its parent's `g` (ancestors included)
//! - pull: leaves take `B = g`, parents the mean of their 4 children
//!
//! The pass triple runs a fixed number of times without a convergence test.

use log::{debug, info};

use crate::vecutils::{BLACK, Rgb, rgb_abs_diff, rgb_add, rgb_mul, rgb_scale};

use super::config::{RadiosityConfig, SolverKind};
use super::error::SolverError;
use super::form_factor::estimate_form_factor;
use super::patch::PatchId;
use super::result::{RadiosityResult, RefineStats};
use super::scene::SceneState;
use super::solver::RadiositySolver;

/// Builds the patch hierarchy and the gathering links.
#[derive(Debug, Clone)]
pub struct Refiner {
    link_epsilon: f64,
    area_threshold: f64,
    budget: usize,
    stats: RefineStats,
}

impl Refiner {
    pub fn new(link_epsilon: f64, area_threshold: f64, budget: usize) -> Self {
        Self {
            link_epsilon,
            area_threshold,
            budget,
            stats: RefineStats::default(),
        }
    }

    pub fn from_config(config: &RadiosityConfig) -> Self {
        Self::new(
            config.link_epsilon,
            config.area_threshold,
            config.refine_budget,
        )
    }

    pub fn stats(&self) -> &RefineStats {
        &self.stats
    }

    /// Refines every ordered pair of distinct root patches.
    pub fn refine_roots(&mut self, scene: &mut SceneState) -> Result<(), SolverError> {
        let roots = scene.roots().to_vec();
        for (i, &p) in roots.iter().enumerate() {
            for &q in roots.iter() {
                if p != q {
                    self.refine(scene, p, q)?;
                }
            }
            debug!("{} out of {} refine-progression", i + 1, roots.len());
        }
        Ok(())
    }

    /// Refines a single pair, `p` being the receiving side.
    ///
    /// Pairs are processed from an explicit stack, children in order.
    /// Every pair taken off the stack counts against the budget, which is
    /// shared by all calls on the same refiner.
    pub fn refine(
        &mut self,
        scene: &mut SceneState,
        p: PatchId,
        q: PatchId,
    ) -> Result<(), SolverError> {
        let mut stack = vec![(p, q)];

        while let Some((p, q)) = stack.pop() {
            if self.stats.pairs_visited >= self.budget {
                return Err(SolverError::RefinementBudgetExceeded {
                    budget: self.budget,
                });
            }
            self.stats.pairs_visited += 1;

            let ff_pq = estimate_form_factor(scene.patch(p), scene.patch(q));
            let ff_qp = estimate_form_factor(scene.patch(q), scene.patch(p));

            if ff_pq < self.link_epsilon && ff_qp < self.link_epsilon {
                self.link(scene, p, q, ff_qp);
                continue;
            }

            // Split the side that receives more, recurse against the other
            let (split, other) = if ff_pq >= ff_qp { (q, p) } else { (p, q) };
            if !scene.patch(split).can_subdivide(self.area_threshold) {
                self.link(scene, p, q, ff_qp);
                continue;
            }

            if scene.patch(split).is_leaf() {
                self.stats.subdivisions += 1;
            }
            let children = scene.subdivide(split);
            stack.extend(children.iter().rev().map(|&c| (other, c)));
        }
        Ok(())
    }

    fn link(&mut self, scene: &mut SceneState, p: PatchId, q: PatchId, form_factor: f64) {
        scene.link(p, q, form_factor);
        self.stats.links += 1;
    }
}

/// Computes `gathered_brightness` of every patch under `root` from its links.
///
/// Each patch is gathered exactly once. Partners are read through their
/// brightness from the previous pull.
pub fn gather(scene: &mut SceneState, root: PatchId) {
    for id in scene.preorder(root) {
        let patch = scene.patch(id);
        let gathered = patch.links().iter().fold(BLACK, |acc, link| {
            let shown = scene.patch(link.partner).brightness_color();
            rgb_add(
                acc,
                rgb_scale(rgb_mul(patch.reflectance, shown), link.form_factor),
            )
        });
        scene.patch_mut(id).gathered_brightness = gathered;
    }
}

/// Adds every parent's gathered brightness into its children, top-down.
pub fn push(scene: &mut SceneState, root: PatchId) {
    for id in scene.preorder(root) {
        let patch = scene.patch(id);
        let Some(&children) = patch.children() else {
            continue;
        };
        let gathered = patch.gathered_brightness;
        for child in children {
            let c = scene.patch_mut(child);
            c.gathered_brightness = rgb_add(c.gathered_brightness, gathered);
        }
    }
}

/// Sets the brightness of every patch under `root`, bottom-up, and returns
/// the brightness of the root.
pub fn pull(scene: &mut SceneState, root: PatchId) -> Rgb {
    for id in scene.preorder(root).into_iter().rev() {
        let brightness = match scene.patch(id).children() {
            Some(children) => {
                let sum = children
                    .iter()
                    .fold(BLACK, |acc, &c| rgb_add(acc, scene.patch(c).brightness));
                rgb_scale(sum, 0.25)
            }
            None => scene.patch(id).gathered_brightness,
        };
        scene.patch_mut(id).brightness = brightness;
    }
    scene.patch(root).brightness
}

pub struct HierarchicalSolver {
    refiner: Refiner,
    iterations: usize,
}

impl HierarchicalSolver {
    pub fn new(refiner: Refiner, iterations: usize) -> Self {
        Self {
            refiner,
            iterations,
        }
    }

    pub fn from_config(config: &RadiosityConfig) -> Self {
        Self::new(
            Refiner::from_config(config),
            config.hierarchical_iterations,
        )
    }

    /// Runs gather, push and pull over all roots once and returns the total
    /// absolute change of the root brightness.
    pub fn iterate(scene: &mut SceneState) -> f64 {
        let roots = scene.roots().to_vec();
        let n = roots.len();
        let before: Vec<Rgb> = roots.iter().map(|&r| scene.patch(r).brightness).collect();

        for (i, &root) in roots.iter().enumerate() {
            gather(scene, root);
            debug!("{} out of {} gathering-progression", i + 1, n);
        }
        for (i, &root) in roots.iter().enumerate() {
            push(scene, root);
            debug!("{} out of {} push-progression", i + 1, n);
        }
        let mut change = 0.0;
        for (i, &root) in roots.iter().enumerate() {
            let after = pull(scene, root);
            change += rgb_abs_diff(after, before[i]);
            debug!("{} out of {} pull-progression", i + 1, n);
        }
        change
    }
}

impl RadiositySolver for HierarchicalSolver {
    fn name(&self) -> &'static str {
        "hierarchical"
    }

    fn kind(&self) -> SolverKind {
        SolverKind::Hierarchical
    }

    fn solve(&mut self, scene: &mut SceneState) -> Result<RadiosityResult, SolverError> {
        self.refiner.refine_roots(scene)?;
        let stats = self.refiner.stats().clone();
        info!(
            "Refined {} root patches into {} patches: {} pairs, {} subdivisions, {} links",
            scene.root_count(),
            scene.len(),
            stats.pairs_visited,
            stats.subdivisions,
            stats.links
        );

        let mut pass_changes = Vec::with_capacity(self.iterations);
        for it in 0..self.iterations {
            let change = Self::iterate(scene);
            debug!(
                "Hierarchical iteration {} out of {}: change {change:.6}",
                it + 1,
                self.iterations
            );
            pass_changes.push(change);
        }

        Ok(RadiosityResult {
            solver: SolverKind::Hierarchical,
            colors: scene.root_colors(SolverKind::Hierarchical),
            pass_changes,
            refine: Some(stats),
            patch_count: scene.len(),
        })
    }
}
