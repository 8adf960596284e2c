//! Render geometry for solved scenes.
//!
//! Every root patch becomes 4 vertices sharing the patch normal and color,
//! drawn as two triangles. The colors are not clamped, callers that need a
//! displayable range can use [`exposure_scale`].

use crate::radiosity::{SceneState, SolverKind};
use crate::vecutils::Rgb;
use crate::{Point, Vector};

/// Triangle indices of one quad patch.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderVertex {
    pub position: Point,
    pub normal: Vector,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPatch {
    pub vertices: [RenderVertex; 4],
}

impl RenderPatch {
    pub fn indices(&self) -> [u32; 6] {
        QUAD_INDICES
    }

    pub fn color(&self) -> Rgb {
        self.vertices[0].color
    }
}

/// Receives render patches, one per root patch, in face order.
pub trait ColorSink {
    fn consume(&mut self, face: usize, patch: &RenderPatch);
}

/// Collects render patches into a vector.
#[derive(Debug, Default)]
pub struct VecSink {
    pub patches: Vec<RenderPatch>,
}

impl ColorSink for VecSink {
    fn consume(&mut self, _face: usize, patch: &RenderPatch) {
        self.patches.push(*patch);
    }
}

impl VecSink {
    /// Flattened vertex positions, 4 per patch.
    pub fn positions(&self) -> Vec<Point> {
        self.patches
            .iter()
            .flat_map(|p| p.vertices.iter().map(|v| v.position))
            .collect()
    }

    /// Triangle indices into [`VecSink::positions`].
    pub fn indices(&self) -> Vec<u32> {
        (0..self.patches.len() as u32)
            .flat_map(|i| QUAD_INDICES.iter().map(move |&k| 4 * i + k))
            .collect()
    }
}

/// Sends every root patch of the scene to `sink`, colored by the field that
/// `solver` produced.
pub fn emit_patches(scene: &SceneState, solver: SolverKind, sink: &mut dyn ColorSink) {
    let colors = scene.root_colors(solver);
    for (face, (&id, color)) in scene.roots().iter().zip(colors).enumerate() {
        let patch = scene.patch(id);
        let normal = patch.normal();
        let vertices = patch.vertices().map(|position| RenderVertex {
            position,
            normal,
            color,
        });
        sink.consume(face, &RenderPatch { vertices });
    }
}

/// Factor mapping the brightest channel of `colors` to 1.
///
/// Returns 1 when everything is black.
pub fn exposure_scale(colors: &[Rgb]) -> f64 {
    let max = colors
        .iter()
        .flat_map(|c| c.iter().copied())
        .fold(0.0_f64, f64::max);
    if max < 1e-10 { 1.0 } else { 1.0 / max }
}
