// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Command-line driver: builds the reference scene, solves it to convergence,
//! and writes the result as a PNG. With no arguments this reproduces the
//! reference scenario exactly.

mod error;
mod png_sink;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use radiosity::formfactor::raster::{Camera, CpuRasterizer};
use radiosity::formfactor::{analytic, raster};
use radiosity::gouraud::{self, GouraudQuad};
use radiosity::math::{Rgb, Vec3};
use radiosity::normalize;
use radiosity::options::{Oracle, RunConfig};
use radiosity::scene;

use error::DriverError;

/// The resolution of the final display-resolution PNG. Independent of
/// `resolution`, which only controls the raster oracle's hemicube faces.
const DISPLAY_RESOLUTION: u32 = 512;

/// Builds the reference radiosity scene (a unit cube with a top-centre
/// emitter), solves it to convergence, and writes `png/scene.png`.
#[derive(Parser, Debug)]
#[command(name = "radiosity", version, about = "Classical diffuse radiosity renderer")]
struct Args {
    /// Grid subdivisions per base cube face.
    #[arg(long)]
    subdivision: Option<u32>,

    /// Hemicube face resolution in pixels, used only by the raster oracle.
    #[arg(long)]
    resolution: Option<u32>,

    /// Relative scene-luminance change at which the solver declares
    /// convergence.
    #[arg(long)]
    convergence_target: Option<f64>,

    /// Hard cap on Jacobi iterations before giving up with `NotConverged`.
    #[arg(long)]
    iteration_cap: Option<u32>,

    /// Target brightness for the final normalisation pass.
    #[arg(long)]
    target_brightness: Option<f64>,

    /// Which form-factor oracle builds the transfer matrix.
    #[arg(long, value_enum)]
    oracle: Option<OracleArg>,

    /// Where to write the rendered PNG.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OracleArg {
    Analytic,
    Raster,
}

impl From<OracleArg> for Oracle {
    fn from(value: OracleArg) -> Self {
        match value {
            OracleArg::Analytic => Oracle::Analytic,
            OracleArg::Raster => Oracle::Raster,
        }
    }
}

fn configure_logging(verbosity: u8) {
    let level = match verbosity {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let _ = simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
}

fn build_config(args: &Args) -> RunConfig {
    let defaults = RunConfig::default();
    RunConfig {
        subdivision: args.subdivision.unwrap_or(defaults.subdivision),
        convergence_target: args.convergence_target.unwrap_or(defaults.convergence_target),
        resolution: args.resolution.unwrap_or(defaults.resolution),
        target_brightness: args.target_brightness.unwrap_or(defaults.target_brightness),
        oracle: args.oracle.map(Oracle::from).unwrap_or(defaults.oracle),
        iteration_cap: args.iteration_cap.unwrap_or(defaults.iteration_cap),
        output_path: args.output.clone().unwrap_or(defaults.output_path),
    }
}

/// Rescales a linear colour component to an 8-bit sRGB-ish byte, clamping
/// both ends rather than wrapping: negative components (upstream rounding
/// error) clamp to `0`, components at or above `1.0` saturate to `255`.
fn to_byte(component: f64) -> u8 {
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn rgb_to_bytes(colour: Rgb) -> [u8; 3] {
    let c = colour.clamped_non_negative();
    [to_byte(c.red()), to_byte(c.green()), to_byte(c.blue())]
}

/// Flat-fills each reconstructed quad with the average of its four corner
/// colours: [`CpuRasterizer`] implements the Renderer contract's flat
/// shading only, so the smooth appearance comes entirely from how fine the
/// Gouraud reconstruction's quads already are, not from interpolation here.
fn rasterise_display(quads: &[GouraudQuad], resolution: u32) -> Result<Vec<u8>, DriverError> {
    let mut renderer = CpuRasterizer::new();
    renderer.setup_transfer_render(resolution)?;
    renderer.clear();

    let look_dir = -normalize::EYE_POS;
    let camera = Camera::new(normalize::EYE_POS, look_dir, Vec3::new(0.0, 1.0, 0.0))?;
    renderer.set_model_view(camera);

    for quad in quads {
        let avg = (quad.colours[0] + quad.colours[1] + quad.colours[2] + quad.colours[3]) * 0.25;
        renderer.draw_flat_quad_rgb(quad.vertices, rgb_to_bytes(avg));
    }

    Ok(renderer.read_pixels().to_vec())
}

fn run(config: &RunConfig) -> Result<(), DriverError> {
    log::info!(
        "building reference scene (subdivision {}x{} per face)",
        config.subdivision,
        config.subdivision
    );
    let material_colour = Rgb::new(0.9, 0.9, 0.9);
    let emitter_colour = Rgb::new(2.0, 2.0, 2.0);
    let (mut built_scene, infos) = scene::build_cube_scene(
        material_colour,
        emitter_colour,
        config.subdivision,
        scene::top_centre_emitter,
    );
    log::info!("scene has {} patches across {} faces", built_scene.patches.len(), infos.len());

    log::info!("building transfer matrix with the {:?} oracle", config.oracle);
    let transfer = match config.oracle {
        Oracle::Analytic => analytic::calc_all_lights(&built_scene.patches, &built_scene.vertices),
        Oracle::Raster => {
            raster::calc_all_lights(config.resolution, &built_scene.patches, &built_scene.vertices)?
        }
    };

    log::info!("solving to convergence (target {:e})", config.convergence_target);
    let report = radiosity::iteration::solve(
        &mut built_scene.patches,
        &built_scene.vertices,
        &transfer,
        config.convergence_target,
        config.iteration_cap,
    )?;
    log::info!(
        "converged after {} iterations (relative change {:e})",
        report.iterations,
        report.last_relative_change
    );

    normalize::normalize(&mut built_scene.patches, &built_scene.vertices, config.target_brightness);

    let mut quads = Vec::new();
    for info in &infos {
        quads.extend(gouraud::reconstruct(info, &built_scene.patches, &built_scene.vertices));
    }
    log::debug!("reconstructed {} display quads", quads.len());

    let pixels = rasterise_display(&quads, DISPLAY_RESOLUTION)?;
    png_sink::write_rgba(&config.output_path, DISPLAY_RESOLUTION, DISPLAY_RESOLUTION, &pixels)?;
    log::info!("wrote {}", config.output_path.display());

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    configure_logging(args.verbose);
    let config = build_config(&args);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
