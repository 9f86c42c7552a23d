/// Painter Terminal - painter's-algorithm renderer in the terminal
///
/// Controls:
///   - A/D or Left/Right: azimuth
///   - W/S or Up/Down: elevation
///   - E/R: roll
///   - +/-: camera distance
///   - J/L, I/K: light azimuth / elevation
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use painter_core::{ingest, Config, DecodedMesh, Mesh, Scene};
use painter_terminal::{TerminalApp, TerminalCanvas};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "painter", version, about = "Render a triangle mesh with the painter's algorithm")]
struct Args {
    /// OBJ or STL file; the two-pyramid sample scene when omitted
    mesh: Option<PathBuf>,

    /// TOML file with camera, light, render and control settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a single frame to stdout instead of starting the interactive view
    #[arg(long)]
    once: bool,

    /// Canvas size for --once, as COLUMNSxROWS
    #[arg(long, default_value = "80x40", value_parser = parse_size)]
    size: (usize, usize),
}

fn parse_size(s: &str) -> Result<(usize, usize), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected COLUMNSxROWS, got '{}'", s))?;
    let w = w.trim().parse().map_err(|e| format!("bad width: {}", e))?;
    let h = h.trim().parse().map_err(|e| format!("bad height: {}", e))?;
    Ok((w, h))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let meshes = match &args.mesh {
        Some(path) => ingest::load_path(path)
            .with_context(|| format!("failed to load mesh {}", path.display()))?,
        None => vec![DecodedMesh::from(&Mesh::double_pyramid("pyramids"))],
    };

    let (width, height) = args.size;
    let canvas = TerminalCanvas::new(width, height);
    let mut scene = Scene::new(config.frustum(), config.light_direction(), canvas)
        .context("invalid light direction")?
        .with_options(config.render_options());
    scene.populate(&meshes).context("failed to build scene")?;
    info!("{} triangle(s) ready", scene.triangles().len());

    if args.once {
        let stats = scene.render();
        print!("{}", scene.surface().to_text());
        println!(
            "{} drawn, {} culled, {} skipped",
            stats.submitted, stats.culled, stats.skipped
        );
        return Ok(());
    }

    let mut app = TerminalApp::new(scene, config.controls.clone());
    app.run()?;

    Ok(())
}
