//! JSON output of solved patch colors.
//!
//! The file holds a serialized [`RadiosityResult`]: one color per root patch
//! in face order, plus the solver statistics.

use crate::radiosity::RadiosityResult;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Writes a solve result to a JSON file.
///
/// # Example
/// ```no_run
/// use radiosity3d::io::write_colors;
/// use radiosity3d::radiosity::{Emitter, RadiosityConfig, SceneState, WARM_LIGHT, solve_scene};
/// use std::path::Path;
///
/// let mut config = RadiosityConfig::new();
/// config.emitters = vec![Emitter::new(4, WARM_LIGHT)];
/// let mut scene = SceneState::from_box(1.0, 1.0, 1.0, 1, &config).unwrap();
/// let result = solve_scene(&mut scene, &config).unwrap();
/// write_colors(Path::new("colors.json"), &result).unwrap();
/// ```
pub fn write_colors(path: &Path, result: &RadiosityResult) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, result)
        .with_context(|| format!("Failed to serialize colors to: {}", path.display()))?;

    Ok(())
}

/// Reads a solve result from a JSON file.
pub fn read_colors(path: &Path) -> Result<RadiosityResult> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let result: RadiosityResult = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize colors from: {}", path.display()))?;

    Ok(result)
}

pub fn to_colors_string(result: &RadiosityResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize colors to string")
}

pub fn from_colors_string(json: &str) -> Result<RadiosityResult> {
    serde_json::from_str(json).context("Failed to deserialize colors from string")
}
