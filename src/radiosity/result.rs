use serde::{Deserialize, Serialize};

use crate::vecutils::{BLACK, Rgb, rgb_add, rgb_scale};

use super::config::SolverKind;

/// Counters collected while refining the patch hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineStats {
    /// Patch pairs taken off the work stack.
    pub pairs_visited: usize,
    /// Patches split into children.
    pub subdivisions: usize,
    /// Links created.
    pub links: usize,
}

/// Result of a radiosity solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiosityResult {
    pub solver: SolverKind,
    /// Displayable color per root patch, in face order. Not clamped.
    pub colors: Vec<Rgb>,
    /// Total absolute change of the solved field per pass (flat) or per
    /// macro-iteration (hierarchical).
    pub pass_changes: Vec<f64>,
    /// Refinement counters, hierarchical solves only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refine: Option<RefineStats>,
    /// Patches in the scene after the solve, subpatches included.
    pub patch_count: usize,
}

impl RadiosityResult {
    /// Sum of all patch colors.
    pub fn total_color(&self) -> Rgb {
        self.colors.iter().fold(BLACK, |acc, &c| rgb_add(acc, c))
    }

    /// Returns the average color across all patches.
    pub fn average_color(&self) -> Rgb {
        if self.colors.is_empty() {
            return BLACK;
        }
        rgb_scale(self.total_color(), 1.0 / self.colors.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_and_average() {
        let result = RadiosityResult {
            solver: SolverKind::Flat,
            colors: vec![[1.0, 2.0, 3.0], [3.0, 2.0, 1.0]],
            pass_changes: vec![],
            refine: None,
            patch_count: 2,
        };
        assert_eq!(result.total_color(), [4.0, 4.0, 4.0]);
        assert_eq!(result.average_color(), [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_average_of_empty() {
        let result = RadiosityResult {
            solver: SolverKind::Hierarchical,
            colors: vec![],
            pass_changes: vec![],
            refine: Some(RefineStats::default()),
            patch_count: 0,
        };
        assert_eq!(result.average_color(), BLACK);
    }
}
