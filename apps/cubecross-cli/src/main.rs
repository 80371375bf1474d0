use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use cubecross_geometry::{CUBE_COLORS, CUBE_INDICES, CUBE_POSITIONS, validate_mesh};
use cubecross_input::{Key, KeyMap, Modifiers};
use cubecross_render::{FrameLoop, RecordingRenderer, Renderer};
use cubecross_transform::ops::{max_abs_diff, translation_part};
use cubecross_transform::{SceneConfig, TransformMode, TransformState};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubecross-cli", about = "Headless tool for the cube cross")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Scene config file (YAML, or JSON with a .json extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, mesh stats and crate info
    Info,
    /// Print the effective scene config as YAML
    Config,
    /// Run frames through the recording renderer and report drift
    Simulate {
        /// Number of frames to render
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Comma-separated key presses applied before every frame,
        /// e.g. `ArrowUp,alt+ArrowRight`
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<KeyPress>,
        /// Override the transform mode (compounding | recomputed)
        #[arg(short, long)]
        mode: Option<TransformMode>,
        /// Print the full call log of the last frame
        #[arg(long)]
        trace_calls: bool,
    },
}

/// A key with its modifier state, parsed from `[alt+]Key`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct KeyPress {
    key: Key,
    mods: Modifiers,
}

impl FromStr for KeyPress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (mods, name) = match s.split_once('+') {
            Some((prefix, name)) if prefix.eq_ignore_ascii_case("alt") => (Modifiers::ALT, name),
            Some((prefix, _)) => return Err(format!("unknown modifier: {prefix}")),
            None => (Modifiers::NONE, s),
        };
        Ok(Self {
            key: name.parse()?,
            mods,
        })
    }
}

/// Outcome of a simulation run.
#[derive(Debug)]
struct SimulationReport {
    frames: u64,
    draws: usize,
    /// Largest element-wise distance between the final projection and the
    /// same input applied to a freshly built state.
    drift: f32,
    translation: glam::Vec3,
    last_frame_log: String,
}

fn simulate(config: &SceneConfig, frames: u64, keys: &[KeyPress]) -> SimulationReport {
    let keymap = KeyMap::default();
    let aspect = config.window.width as f32 / config.window.height as f32;
    let mut state = TransformState::new(config, aspect);
    let mut frame_loop = FrameLoop::from_config(config);
    let mut renderer = RecordingRenderer::new();
    let mut draws = 0;

    // Same presses applied once to a fresh state, with no frames in between.
    let mut reference = TransformState::new(config, aspect);

    for frame in 0..frames {
        for press in keys {
            if let Some(action) = keymap.resolve(press.key, press.mods) {
                state.apply(action);
                reference.apply(action);
            }
        }
        if frame + 1 == frames {
            renderer.clear_log();
        }
        let plan = frame_loop.frame(frame as f64 * 1000.0 / 60.0, &mut state);
        draws += renderer.render(&plan);
    }
    reference.begin_frame();

    SimulationReport {
        frames,
        draws,
        drift: max_abs_diff(&state.projection(), &reference.projection()),
        translation: translation_part(&state.projection()),
        last_frame_log: renderer.summary(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            let stats = validate_mesh(&CUBE_POSITIONS, &CUBE_COLORS, &CUBE_INDICES)?;
            println!("cubecross-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", cubecross_render::crate_info());
            println!(
                "mesh: {} vertices, {} indices, {} triangles",
                stats.vertex_count, stats.index_count, stats.triangle_count
            );
            println!(
                "layout: {} cubes, net offset {:?}",
                config.layout.len(),
                config.layout_net_offset()
            );
            println!("mode: {}", config.mode);
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Simulate {
            frames,
            keys,
            mode,
            trace_calls,
        } => {
            if frames == 0 {
                bail!("--frames must be at least 1");
            }
            let mut config = config;
            if let Some(mode) = mode {
                config.mode = mode;
            }
            tracing::info!(frames, keys = keys.len(), mode = %config.mode, "simulating");

            let report = simulate(&config, frames, &keys);
            println!(
                "frames={} draws={} ({} per frame)",
                report.frames,
                report.draws,
                report.draws as u64 / report.frames
            );
            println!(
                "projection translation=({:.4}, {:.4}, {:.4})",
                report.translation.x, report.translation.y, report.translation.z
            );
            println!("drift={:.3e}", report.drift);
            if trace_calls {
                print!("{}", report.last_frame_log);
            }
        }
    }

    Ok(())
}
