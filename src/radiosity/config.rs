use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::Vector;
use crate::vecutils::Rgb;

use super::error::SolverError;

/// Warm light used by the reference room scene.
pub const WARM_LIGHT: Rgb = [200.0, 170.0, 150.0];

/// Tolerance used when matching a normal against an axis direction.
const AXIS_TOL: f64 = 1e-9;

/// Which radiosity method to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Full form-factor matrix with fixed-count relaxation.
    #[default]
    Flat,
    /// Adaptive refinement followed by gather/push/pull.
    Hierarchical,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::Flat => write!(f, "flat"),
            SolverKind::Hierarchical => write!(f, "hierarchical"),
        }
    }
}

impl FromStr for SolverKind {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(SolverKind::Flat),
            "hierarchical" | "hier" => Ok(SolverKind::Hierarchical),
            other => Err(SolverError::InvalidConfig(format!(
                "unknown solver '{other}', expected 'flat' or 'hierarchical'"
            ))),
        }
    }
}

/// Emission injected at one face of the input mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    /// 0-based face index.
    pub face: usize,
    pub irradiance: Rgb,
}

impl Emitter {
    pub fn new(face: usize, irradiance: Rgb) -> Self {
        Self { face, irradiance }
    }
}

/// Diffuse reflectance per axis-aligned wall orientation.
///
/// A patch whose normal matches none of the six directions gets `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectanceTable {
    pub pos_x: Rgb,
    pub neg_x: Rgb,
    pub pos_y: Rgb,
    pub neg_y: Rgb,
    pub pos_z: Rgb,
    pub neg_z: Rgb,
    pub fallback: Rgb,
}

impl ReflectanceTable {
    pub fn new() -> Self {
        Self {
            pos_x: [1.0; 3],
            neg_x: [1.0; 3],
            pos_y: [0.3; 3],
            neg_y: [0.3; 3],
            pos_z: [1.0; 3],
            neg_z: [1.0; 3],
            fallback: [0.0; 3],
        }
    }

    /// Same reflectance for every orientation.
    pub fn uniform(reflectance: Rgb) -> Self {
        Self {
            pos_x: reflectance,
            neg_x: reflectance,
            pos_y: reflectance,
            neg_y: reflectance,
            pos_z: reflectance,
            neg_z: reflectance,
            fallback: reflectance,
        }
    }

    /// Looks up the reflectance of an axis-aligned normal.
    ///
    /// Checks +x, -x, +y, -y, +z, -z in that order. Returns None if the
    /// normal is not axis-aligned.
    pub fn lookup(&self, normal: Vector) -> Option<Rgb> {
        let candidates = [
            (normal.dx, 1.0, self.pos_x),
            (normal.dx, -1.0, self.neg_x),
            (normal.dy, 1.0, self.pos_y),
            (normal.dy, -1.0, self.neg_y),
            (normal.dz, 1.0, self.pos_z),
            (normal.dz, -1.0, self.neg_z),
        ];
        candidates
            .into_iter()
            .find(|(component, axis, _)| (component - axis).abs() < AXIS_TOL)
            .map(|(_, _, rgb)| rgb)
    }
}

impl Default for ReflectanceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for a radiosity solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiosityConfig {
    /// Solver selected for this run.
    pub solver: SolverKind,
    /// Patches with area at or below this value are never subdivided (scene units²).
    pub area_threshold: f64,
    /// Pairs whose form factors are both below this value get linked directly.
    pub link_epsilon: f64,
    /// Number of flat relaxation passes.
    pub flat_iterations: usize,
    /// Number of gather/push/pull macro-iterations.
    pub hierarchical_iterations: usize,
    /// Maximum number of patch pairs refinement may visit.
    pub refine_budget: usize,
    /// Emitting faces. Every other face starts dark.
    pub emitters: Vec<Emitter>,
    pub reflectance: ReflectanceTable,
}

impl RadiosityConfig {
    pub fn new() -> Self {
        Self {
            solver: SolverKind::Flat,
            area_threshold: 0.3,
            link_epsilon: 0.1,
            flat_iterations: 20,
            hierarchical_iterations: 2,
            refine_budget: 50_000_000,
            emitters: vec![Emitter::new(1001, WARM_LIGHT)],
            reflectance: ReflectanceTable::new(),
        }
    }

    /// Irradiance of a face according to the emitter list (last entry wins).
    pub fn irradiance_of(&self, face: usize) -> Rgb {
        self.emitters
            .iter()
            .rev()
            .find(|e| e.face == face)
            .map(|e| e.irradiance)
            .unwrap_or([0.0; 3])
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.area_threshold > 0.0) {
            return Err(SolverError::InvalidConfig(format!(
                "area_threshold must be positive, got {}",
                self.area_threshold
            )));
        }
        if !(self.link_epsilon >= 0.0) {
            return Err(SolverError::InvalidConfig(format!(
                "link_epsilon must be non-negative, got {}",
                self.link_epsilon
            )));
        }
        if self.flat_iterations == 0 || self.hierarchical_iterations == 0 {
            return Err(SolverError::InvalidConfig(
                "iteration counts must be at least 1".to_string(),
            ));
        }
        if self.refine_budget == 0 {
            return Err(SolverError::InvalidConfig(
                "refine_budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RadiosityConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a configuration from a JSON file. Missing fields take default values.
pub fn read_config(path: &Path) -> Result<RadiosityConfig> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let config: RadiosityConfig = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize config from: {}", path.display()))?;
    config.validate()?;

    Ok(config)
}

pub fn write_config(path: &Path, config: &RadiosityConfig) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, config)
        .with_context(|| format!("Failed to serialize config to: {}", path.display()))?;

    Ok(())
}
