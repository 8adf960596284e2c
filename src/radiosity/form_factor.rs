//! Point-to-point form-factor estimates between patches.
//!
//! Each patch is collapsed onto its centroid:
//! - `cos_i = max(0, d·n_i)`, `cos_j = max(0, -d·n_j)` with `d` the unit
//!   direction from `i` to `j`
//! - `F_ij = cos_i * cos_j * A_j / (pi * r^2)`
//!
//! No visibility test is made, every pair is assumed to see each other.

use std::f64::consts::PI;

use super::patch::Patch;
use super::scene::SceneState;

/// Estimates the fraction of energy leaving `p` that arrives at `q`.
///
/// Back-facing pairs and coincident centroids give 0.
pub fn estimate_form_factor(p: &Patch, q: &Patch) -> f64 {
    let d = q.centroid() - p.centroid();
    let r = d.length();
    let Some(dir) = d.normalize() else {
        return 0.0;
    };

    let cos_i = dir.dot(p.normal()).max(0.0);
    let cos_j = (-dir).dot(q.normal()).max(0.0);

    cos_i * cos_j * q.area() / (PI * r * r)
}

/// Row-normalized form factors between the root patches of a scene.
pub struct FormFactorMatrix {
    /// Row-major F_ij matrix [i*n + j].
    values: Vec<f64>,
    n: usize,
}

impl FormFactorMatrix {
    /// Estimates all pairs of root patches, then divides every row by its sum.
    ///
    /// Rows whose sum is zero (a patch that sees nothing) stay zero.
    pub fn from_scene(scene: &SceneState) -> Self {
        let roots = scene.roots();
        let n = roots.len();
        let mut values = vec![0.0_f64; n * n];

        for (i, &pi) in roots.iter().enumerate() {
            for (j, &pj) in roots.iter().enumerate() {
                if i != j {
                    values[i * n + j] = estimate_form_factor(scene.patch(pi), scene.patch(pj));
                }
            }
        }

        let mut matrix = Self { values, n };
        matrix.normalize_rows();
        matrix
    }

    fn normalize_rows(&mut self) {
        let n = self.n;
        for i in 0..n {
            let row = &mut self.values[i * n..(i + 1) * n];
            let row_sum: f64 = row.iter().sum();
            if row_sum > 1e-15 {
                let scale = 1.0 / row_sum;
                row.iter_mut().for_each(|f| *f *= scale);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    pub fn row_sum(&self, i: usize) -> f64 {
        self.row(i).iter().sum()
    }
}
