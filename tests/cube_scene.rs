use anyhow::Result;
use radiosity3d::io::{QuadFace, QuadMesh, read_colors, read_obj, write_colors, write_obj};
use radiosity3d::radiosity::{
    Emitter, FormFactorMatrix, HierarchicalSolver, RadiositySolver, Refiner, SolverError,
};
use radiosity3d::render::{VecSink, emit_patches};
use radiosity3d::vecutils::{Rgb, rgb_sum};
use radiosity3d::{RadiosityConfig, SceneState, SolverKind, solve_scene};
use tempfile::tempdir;

const LIGHT_FACE: usize = 4;
const LIGHT: Rgb = [200.0, 170.0, 150.0];

fn cube_config(solver: SolverKind) -> RadiosityConfig {
    let mut config = RadiosityConfig::new();
    config.solver = solver;
    config.emitters = vec![Emitter::new(LIGHT_FACE, LIGHT)];
    config
}

fn unit_cube(config: &RadiosityConfig) -> SceneState {
    SceneState::from_box(1.0, 1.0, 1.0, 1, config).unwrap()
}

/// Mesh with one separate set of 4 positions per root patch.
fn scene_to_mesh(scene: &SceneState) -> QuadMesh {
    let mut mesh = QuadMesh::default();
    for &id in scene.roots() {
        let patch = scene.patch(id);
        let first = mesh.positions.len();
        mesh.positions.extend(patch.vertices().iter().copied());
        mesh.normals.push(patch.normal());
        mesh.faces.push(QuadFace {
            vertices: [first, first + 1, first + 2, first + 3],
            normal: Some(mesh.normals.len() - 1),
        });
    }
    mesh
}

fn non_emitter_sum(colors: &[Rgb]) -> f64 {
    colors
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != LIGHT_FACE)
        .map(|(_, c)| rgb_sum(*c))
        .sum()
}

#[test]
fn flat_cube_propagates_light() -> Result<()> {
    let config = cube_config(SolverKind::Flat);
    let mut scene = unit_cube(&config);
    let result = solve_scene(&mut scene, &config)?;

    assert_eq!(result.pass_changes.len(), 20);
    for (i, color) in result.colors.iter().enumerate() {
        if i == LIGHT_FACE {
            for (c, e) in color.iter().zip(LIGHT) {
                assert!(*c >= e, "emitter lost its irradiance: {color:?}");
            }
        } else {
            assert!(color.iter().all(|&c| c > 0.0), "face {i}: {color:?}");
        }
    }
    // Walls facing y use the darker reflectance
    assert!(result.colors[2][0] < result.colors[0][0]);
    Ok(())
}

#[test]
fn flat_pass_change_settles() -> Result<()> {
    let config = cube_config(SolverKind::Flat);
    let mut scene = unit_cube(&config);
    let result = solve_scene(&mut scene, &config)?;

    let changes = &result.pass_changes;
    for k in 10..changes.len() {
        assert!(changes[k] <= changes[k - 1], "pass {k}: {changes:?}");
    }
    assert!(changes[19] < changes[0]);
    Ok(())
}

#[test]
fn form_factor_rows_are_normalized() {
    let config = cube_config(SolverKind::Flat);
    let scene = SceneState::from_box(2.0, 1.0, 3.0, 2, &config).unwrap();
    let ff = FormFactorMatrix::from_scene(&scene);
    assert_eq!(ff.len(), 24);
    for i in 0..ff.len() {
        assert!((ff.row_sum(i) - 1.0).abs() < 1e-9, "row {i}");
        assert_eq!(ff.get(i, i), 0.0);
    }
}

#[test]
fn hierarchical_agrees_with_flat() -> Result<()> {
    let flat_config = cube_config(SolverKind::Flat);
    let mut flat_scene = unit_cube(&flat_config);
    let flat = solve_scene(&mut flat_scene, &flat_config)?;

    let hier_config = cube_config(SolverKind::Hierarchical);
    let mut hier_scene = unit_cube(&hier_config);
    let hier = solve_scene(&mut hier_scene, &hier_config)?;

    let ratio = non_emitter_sum(&hier.colors) / non_emitter_sum(&flat.colors);
    assert!((0.25..=4.0).contains(&ratio), "ratio {ratio}");

    // Both rank the walls the same way
    assert!(hier.colors[0][0] > hier.colors[2][0]);
    assert!(flat.colors[0][0] > flat.colors[2][0]);
    Ok(())
}

#[test]
fn hierarchical_box_is_lit_everywhere() -> Result<()> {
    let config = cube_config(SolverKind::Hierarchical);
    let mut scene = SceneState::from_box(2.0, 2.0, 2.0, 1, &config)?;
    let result = solve_scene(&mut scene, &config)?;

    let stats = result.refine.clone().unwrap_or_default();
    assert_eq!(stats.subdivisions, 30);
    assert_eq!(stats.links, 1200);
    assert_eq!(result.patch_count, 126);
    for color in &result.colors {
        assert!(color.iter().all(|&c| c > 0.0), "{color:?}");
    }
    Ok(())
}

#[test]
fn refinement_budget_is_enforced() {
    let mut config = cube_config(SolverKind::Hierarchical);
    config.refine_budget = 50;
    let mut scene = unit_cube(&config);
    let err = solve_scene(&mut scene, &config).unwrap_err();
    assert_eq!(err, SolverError::RefinementBudgetExceeded { budget: 50 });

    // A fresh refiner with enough budget finishes on the same scene type
    let mut scene = unit_cube(&config);
    let mut solver = HierarchicalSolver::new(Refiner::new(0.1, 0.3, 1000), 2);
    assert!(solver.solve(&mut scene).is_ok());
}

#[test]
fn obj_round_trip_solves_like_the_box() -> Result<()> {
    let dir = tempdir()?;
    let obj_path = dir.path().join("cube.obj");
    let colors_path = dir.path().join("colors.json");

    let config = cube_config(SolverKind::Flat);
    let mut reference = unit_cube(&config);
    write_obj(&obj_path, &scene_to_mesh(&reference))?;

    let mesh = read_obj(&obj_path)?;
    assert_eq!(mesh.face_count(), 6);
    let mut scene = SceneState::from_mesh(&mesh, &config)?;
    assert!(scene.warnings().is_empty());

    let expected = solve_scene(&mut reference, &config)?;
    let result = solve_scene(&mut scene, &config)?;
    for (a, b) in result.colors.iter().zip(&expected.colors) {
        for k in 0..3 {
            assert!((a[k] - b[k]).abs() < 1e-9);
        }
    }

    write_colors(&colors_path, &result)?;
    let loaded = read_colors(&colors_path)?;
    assert_eq!(loaded.colors.len(), 6);
    assert_eq!(loaded.solver, SolverKind::Flat);
    Ok(())
}

#[test]
fn emitter_out_of_range_is_rejected() {
    let mut config = cube_config(SolverKind::Flat);
    config.emitters.push(Emitter::new(6, LIGHT));
    let err = SceneState::from_box(1.0, 1.0, 1.0, 1, &config).err();
    assert_eq!(
        err,
        Some(SolverError::EmitterOutOfRange {
            face: 6,
            face_count: 6
        })
    );
}

#[test]
fn render_geometry_matches_colors() -> Result<()> {
    let config = cube_config(SolverKind::Hierarchical);
    let mut scene = unit_cube(&config);
    let result = solve_scene(&mut scene, &config)?;

    let mut sink = VecSink::default();
    emit_patches(&scene, SolverKind::Hierarchical, &mut sink);
    assert_eq!(sink.patches.len(), 6);
    for (patch, color) in sink.patches.iter().zip(&result.colors) {
        assert_eq!(patch.color(), *color);
    }
    Ok(())
}
