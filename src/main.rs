//! Headless box stacks: runs the simulation without a window and logs how
//! the stacks evolve.

use std::path::PathBuf;
use std::time::Instant;

use box_stacks::input::{on_mouse_press, MouseButton};
use box_stacks::{tick, InputState, Scene, SceneConfig, SceneError};
use clap::Parser;
use log::info;

const DEFAULT_STEPS: u64 = 240;
const PRINT_INTERVAL: u64 = 40;

/// Run the box stacks demo without a window.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Number of fixed ticks to run.
    #[arg(short = 'n', long, default_value_t = DEFAULT_STEPS)]
    steps: u64,

    /// Scene configuration (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shoot a coin every N ticks (0 disables).
    #[arg(long, default_value_t = 0)]
    shoot_every: u64,

    /// Where shot coins start, as "x,y".
    #[arg(long, value_parser = parse_point, default_value = "100,200")]
    shoot_from: [f32; 2],
}

fn parse_point(arg: &str) -> Result<[f32; 2], String> {
    let (x, y) = arg
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {arg:?}"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok([x, y])
}

fn main() -> Result<(), SceneError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SceneConfig::from_file(path)?,
        None => SceneConfig::default(),
    };

    info!("Running headless box stacks for {} steps...", cli.steps);

    let start_time = Instant::now();
    let mut scene = Scene::new(config)?;
    let mut input = InputState::default();
    let mut removed = 0;

    for step in 0..cli.steps {
        if cli.shoot_every > 0 && step % cli.shoot_every == 0 {
            on_mouse_press(&mut scene, &mut input, cli.shoot_from, MouseButton::Secondary)?;
        }

        let timing = tick(&mut scene, &mut input)?;
        removed += timing.removed;

        if step % PRINT_INTERVAL == 0 || step + 1 == cli.steps {
            info!(
                "step {:>4}: t={:.3}s entities={} removed={} tick={:.3}ms",
                step + 1,
                scene.world().time(),
                scene.entities().len(),
                removed,
                timing.processing.as_secs_f64() * 1000.0,
            );
        }
    }

    let duration = start_time.elapsed();
    let steps_per_second = cli.steps as f64 / duration.as_secs_f64();

    info!("Simulation complete.");
    info!("Total time: {:.2} seconds", duration.as_secs_f64());
    info!("Steps per second: {:.2}", steps_per_second);
    Ok(())
}
