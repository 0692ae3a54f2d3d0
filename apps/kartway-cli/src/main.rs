use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use kartway_common::{DemoConfig, TrackLayout};
use kartway_input::{DirectionFlags, InputState};
use kartway_kernel::Session;
use kartway_render::{DebugTextRenderer, FollowCamera, Renderer};
use kartway_track::TrackGenerator;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kartway-cli", about = "Headless kart demo: tracks and scripted drives")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Build the configured track and print its stats
    Track {
        /// Build the legacy straight-segment circuit instead of a ribbon
        #[arg(long)]
        legacy: bool,
        /// Override the ribbon sample count
        #[arg(short, long)]
        samples: Option<usize>,
        /// Override the road width
        #[arg(short, long)]
        width: Option<f32>,
        /// Write the track geometry as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Drive a headless session and print the final frame
    Drive {
        /// Number of ticks for the built-in pattern
        #[arg(short, long, default_value = "240")]
        ticks: u64,
        /// Drive the built-in pattern with the analog stick
        #[arg(long)]
        analog: bool,
        /// JSON input script: `[{ "ticks": n, "input": ... }]`
        #[arg(short, long)]
        script: Option<PathBuf>,
    },
}

/// One run of identical inputs in a drive script.
#[derive(Debug, Clone, Deserialize)]
struct ScriptStep {
    ticks: u64,
    input: InputState,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("kartway-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", kartway_render::crate_info());
            let t = &config.track;
            println!(
                "track: layout={:?} waypoints={} width={} samples={}",
                t.layout,
                t.waypoints.len(),
                t.width,
                t.sample_count
            );
            let k = &config.kart;
            println!(
                "kart: move={} rotate={} damping={}/{} dead_zone={}",
                k.move_speed,
                k.rotation_speed,
                k.analog_speed_damping,
                k.analog_rotation_damping,
                k.dead_zone
            );
        }
        Commands::Track {
            legacy,
            samples,
            width,
            out,
        } => {
            if legacy {
                config.track.layout = TrackLayout::Segments;
            }
            if let Some(samples) = samples {
                config.track.sample_count = samples;
            }
            if let Some(width) = width {
                config.track.width = width;
            }
            config.validate().context("invalid track settings")?;

            let track = TrackGenerator::new(config.track.clone())
                .build()
                .context("failed to build track")?;
            println!("{}", track.stats());

            if let Some(path) = out {
                let json = serde_json::to_string_pretty(&track)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
        }
        Commands::Drive {
            ticks,
            analog,
            script,
        } => {
            let inputs = match script {
                Some(path) => load_script(&path)?,
                None => (0..ticks).map(|i| demo_input(i, analog)).collect(),
            };

            tracing::info!(ticks = inputs.len(), "driving headless session");
            let mut session = Session::new(config.clone())?;
            let mut camera = FollowCamera::from_settings(&config.camera);
            camera.snap_to(session.pose());
            for input in &inputs {
                session.step(input);
                camera.follow(session.pose());
            }

            let frame = DebugTextRenderer::new().render(&session, &camera.render_view());
            print!("{frame}");

            let replayed = Session::replay(config, session.inputs())?;
            println!(
                "State hash: {:#x} (replay {})",
                session.state_hash(),
                if replayed.state_hash() == session.state_hash() {
                    "OK"
                } else {
                    "MISMATCH"
                }
            );
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DemoConfig> {
    match path {
        Some(path) => {
            let config = DemoConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            Ok(config)
        }
        None => Ok(DemoConfig::default()),
    }
}

fn load_script(path: &Path) -> anyhow::Result<Vec<InputState>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse script {}", path.display()))?;
    Ok(expand_script(&steps))
}

fn expand_script(steps: &[ScriptStep]) -> Vec<InputState> {
    steps
        .iter()
        .flat_map(|step| std::iter::repeat_n(step.input, step.ticks as usize))
        .collect()
}

/// Built-in drive pattern: straight, left sweep, straight, right sweep, coast.
fn demo_input(tick: u64, analog: bool) -> InputState {
    let phase = tick % 120;
    if analog {
        // Stick angles measured clockwise from screen-right; up is 3π/2.
        let up = 3.0 * std::f32::consts::FRAC_PI_2;
        return match phase {
            0..40 => InputState::analog(up, 1.0),
            40..60 => InputState::analog(up - 0.6, 1.0),
            60..90 => InputState::analog(up, 0.7),
            90..110 => InputState::analog(up + 0.6, 1.0),
            _ => InputState::analog(up, 0.0),
        };
    }
    let flags = |left: bool, right: bool| DirectionFlags {
        forward: true,
        left,
        right,
        ..DirectionFlags::NONE
    };
    match phase {
        0..40 => InputState::Digital(flags(false, false)),
        40..60 => InputState::Digital(flags(true, false)),
        60..90 => InputState::Digital(flags(false, false)),
        90..110 => InputState::Digital(flags(false, true)),
        _ => InputState::default(),
    }
}
