use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use radiosity3d::io::{read_obj, write_colors};
use radiosity3d::radiosity::{Emitter, WARM_LIGHT, read_config};
use radiosity3d::{RadiosityConfig, SceneState, SolverKind, solve_scene};

const USAGE: &str = "Usage:
  radiosity3d <model.obj> [options]

Options:
  --config <file.json>              Solver configuration (missing fields use defaults)
  --solver <flat|hierarchical>      Override the solver of the configuration
  --emitter <face>                  Light the given 0-based face with warm light
  --output <colors.json>            Write per-face colors instead of printing a summary
  --help                            Show this message";

#[derive(Debug, Default, PartialEq)]
struct Options {
    model: PathBuf,
    config: Option<PathBuf>,
    solver: Option<SolverKind>,
    emitters: Vec<usize>,
    output: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Options>> {
    let mut opts = Options::default();
    let mut model = None;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| anyhow!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--config" => opts.config = Some(PathBuf::from(value("--config")?)),
            "--output" => opts.output = Some(PathBuf::from(value("--output")?)),
            "--solver" => opts.solver = Some(value("--solver")?.parse()?),
            "--emitter" => {
                let face = value("--emitter")?;
                let face = face
                    .parse::<usize>()
                    .with_context(|| format!("invalid emitter face '{face}'"))?;
                opts.emitters.push(face);
            }
            other if other.starts_with("--") => return Err(anyhow!("unknown option '{other}'")),
            other => {
                if model.replace(PathBuf::from(other)).is_some() {
                    return Err(anyhow!("only one model path can be given"));
                }
            }
        }
    }

    opts.model = model.ok_or_else(|| anyhow!("missing model path\n\n{USAGE}"))?;
    Ok(Some(opts))
}

fn load_config(opts: &Options) -> Result<RadiosityConfig> {
    let mut config = match &opts.config {
        Some(path) => read_config(path)?,
        None => RadiosityConfig::new(),
    };
    if let Some(solver) = opts.solver {
        config.solver = solver;
    }
    if !opts.emitters.is_empty() {
        config.emitters = opts
            .emitters
            .iter()
            .map(|&face| Emitter::new(face, WARM_LIGHT))
            .collect();
    }
    Ok(config)
}

fn run(opts: &Options) -> Result<()> {
    let config = load_config(opts)?;

    let mesh = read_obj(&opts.model)?;
    info!(
        "Loaded {} faces from {}",
        mesh.face_count(),
        opts.model.display()
    );
    let loose = mesh.vertex_normals().iter().filter(|n| n.is_none()).count();
    if loose > 0 {
        warn!("{loose} positions are not used by any face");
    }

    let mut scene = SceneState::from_mesh(&mesh, &config)?;
    let result = solve_scene(&mut scene, &config)?;

    match &opts.output {
        Some(path) => {
            write_colors(path, &result)?;
            info!("Colors written to {}", path.display());
        }
        None => print_summary(&opts.model, &scene, &result),
    }
    Ok(())
}

fn print_summary(model: &Path, scene: &SceneState, result: &radiosity3d::RadiosityResult) {
    println!("{}: {} solver", model.display(), result.solver);
    println!("  faces:    {}", scene.root_count());
    println!("  patches:  {}", result.patch_count);
    println!("  warnings: {}", scene.warnings().len());
    if let Some(stats) = &result.refine {
        println!(
            "  refine:   {} pairs, {} subdivisions, {} links",
            stats.pairs_visited, stats.subdivisions, stats.links
        );
    }
    if let Some(last) = result.pass_changes.last() {
        println!("  last pass change: {last:.6}");
    }
    let avg = result.average_color();
    println!("  average color: ({:.3}, {:.3}, {:.3})", avg[0], avg[1], avg[2]);
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(opts) = parse_args(env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };
    run(&opts)
}
