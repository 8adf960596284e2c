//! Patch arena shared by both solvers.
//!
//! Root patches map one to one onto the faces of the input mesh. Subpatches
//! are appended by [`SceneState::subdivide`] and never removed, so every
//! [`PatchId`] stays valid for the lifetime of the scene.

use log::warn;

use crate::io::QuadMesh;
use crate::vecutils::Rgb;
use crate::{Point, Quad, Vector};

use super::config::{RadiosityConfig, ReflectanceTable, SolverKind};
use super::error::{SceneWarning, SolverError};
use super::patch::{Link, Patch, PatchId};

pub struct SceneState {
    patches: Vec<Patch>,
    roots: Vec<PatchId>,
    reflectance: ReflectanceTable,
    warnings: Vec<SceneWarning>,
}

impl SceneState {
    pub fn new(reflectance: ReflectanceTable) -> Self {
        Self {
            patches: Vec::new(),
            roots: Vec::new(),
            reflectance,
            warnings: Vec::new(),
        }
    }

    /// Creates one root patch per mesh face, lighting the configured emitters.
    pub fn from_mesh(mesh: &QuadMesh, config: &RadiosityConfig) -> Result<Self, SolverError> {
        let quads: Vec<Quad> = (0..mesh.face_count()).map(|f| mesh.face_quad(f)).collect();
        Self::from_quads(quads, config)
    }

    /// Creates one root patch per quad, lighting the configured emitters.
    pub fn from_quads(quads: Vec<Quad>, config: &RadiosityConfig) -> Result<Self, SolverError> {
        if let Some(e) = config.emitters.iter().find(|e| e.face >= quads.len()) {
            return Err(SolverError::EmitterOutOfRange {
                face: e.face,
                face_count: quads.len(),
            });
        }

        let mut scene = Self::new(config.reflectance.clone());
        for (face, quad) in quads.into_iter().enumerate() {
            scene.add_root(quad, config.irradiance_of(face));
        }
        Ok(scene)
    }

    /// Builds the inside of an axis-aligned box `[0, sx] x [0, sy] x [0, sz]`.
    ///
    /// Every wall faces inwards and is split into `divisions x divisions`
    /// faces. Walls are ordered x=0, x=sx, y=0, y=sy, z=0, z=sz, and the faces
    /// of one wall are numbered row by row.
    pub fn from_box(
        sx: f64,
        sy: f64,
        sz: f64,
        divisions: usize,
        config: &RadiosityConfig,
    ) -> Result<Self, SolverError> {
        if divisions == 0 {
            return Err(SolverError::InvalidConfig(
                "box needs at least one division per wall".to_string(),
            ));
        }
        let o = Point::new(0., 0., 0.);
        let ex = Vector::new(sx, 0., 0.);
        let ey = Vector::new(0., sy, 0.);
        let ez = Vector::new(0., 0., sz);
        // (origin, u, v) with u x v pointing into the box
        let walls = [
            (o, ey, ez),
            (o + ex, ez, ey),
            (o, ez, ex),
            (o + ey, ex, ez),
            (o, ex, ey),
            (o + ez, ey, ex),
        ];

        let d = divisions as f64;
        let mut quads = Vec::with_capacity(6 * divisions * divisions);
        for (origin, u, v) in walls {
            let at = |a: usize, b: usize| origin + u * (a as f64 / d) + v * (b as f64 / d);
            for j in 0..divisions {
                for i in 0..divisions {
                    quads.push(Quad::new([at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)]));
                }
            }
        }
        Self::from_quads(quads, config)
    }

    /// Adds a root patch. Its reflectance comes from the orientation table.
    pub fn add_root(&mut self, quad: Quad, irradiance: Rgb) -> PatchId {
        let id = PatchId(self.patches.len());
        let mut patch = Patch::new(quad, irradiance, self.reflectance.fallback);
        match self.reflectance.lookup(patch.normal()) {
            Some(rgb) => patch.reflectance = rgb,
            None => {
                let warning = SceneWarning::UnsupportedOrientation {
                    patch: id,
                    normal: patch.normal(),
                };
                warn!("{warning}");
                self.warnings.push(warning);
            }
        }
        self.patches.push(patch);
        self.roots.push(id);
        id
    }

    pub fn roots(&self) -> &[PatchId] {
        &self.roots
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of patches, subpatches included.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn patch(&self, id: PatchId) -> &Patch {
        &self.patches[id.0]
    }

    pub fn patch_mut(&mut self, id: PatchId) -> &mut Patch {
        &mut self.patches[id.0]
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn warnings(&self) -> &[SceneWarning] {
        &self.warnings
    }

    /// Splits a patch into 4 children and returns their handles.
    ///
    /// Children inherit reflectance and irradiance and all record the
    /// parent. A patch that already has children is returned unchanged.
    pub fn subdivide(&mut self, id: PatchId) -> [PatchId; 4] {
        if let Some(children) = self.patch(id).children() {
            return *children;
        }

        let parent = self.patch(id);
        let quads = parent.quad().subdivide();
        let (irradiance, reflectance) = (parent.irradiance, parent.reflectance);

        let first = self.patches.len();
        let children = [
            PatchId(first),
            PatchId(first + 1),
            PatchId(first + 2),
            PatchId(first + 3),
        ];
        for quad in quads {
            let mut child = Patch::new(quad, irradiance, reflectance);
            child.set_parent(id);
            self.patches.push(child);
        }
        self.patch_mut(id).set_children(children);
        children
    }

    /// Records that `receiver` gathers from `partner` with the given weight.
    pub fn link(&mut self, receiver: PatchId, partner: PatchId, form_factor: f64) {
        self.patch_mut(receiver).push_link(Link {
            partner,
            form_factor,
        });
    }

    /// All patches of the tree under `root` in depth-first pre-order
    /// (parents before children, children in order).
    pub fn preorder(&self, root: PatchId) -> Vec<PatchId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(children) = self.patch(id).children() {
                stack.extend(children.iter().rev());
            }
        }
        out
    }

    /// Number of subdivision levels above this patch.
    pub fn depth(&self, id: PatchId) -> usize {
        let mut depth = 0;
        let mut current = self.patch(id).parent();
        while let Some(p) = current {
            depth += 1;
            current = self.patch(p).parent();
        }
        depth
    }

    /// Color of every root patch for the field written by `solver`.
    pub fn root_colors(&self, solver: SolverKind) -> Vec<Rgb> {
        self.roots
            .iter()
            .map(|&id| {
                let p = self.patch(id);
                match solver {
                    SolverKind::Flat => p.radiosity_color(),
                    SolverKind::Hierarchical => p.brightness_color(),
                }
            })
            .collect()
    }
}
