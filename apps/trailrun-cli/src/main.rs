use clap::{Parser, Subcommand, ValueEnum};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use trailrun_common::ViewerConfig;
use trailrun_input::{InputEvent, Key};
use trailrun_kernel::{FrameOrchestrator, FrameOutput, ViewerState};
use trailrun_render::{DebugTextRenderer, FrameDraw, Renderer};

#[derive(Parser)]
#[command(name = "trailrun-cli", about = "Headless tools for the terrain viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the viewer constants
    Info,
    /// Generate a ground-plane mesh and print its statistics
    Mesh {
        /// Plane edge length in world units
        #[arg(short, long, default_value_t = trailrun_common::config::PLANE_SIZE)]
        size: f32,
        /// Cells per side
        #[arg(short, long, default_value_t = trailrun_common::config::PLANE_DIVISIONS)]
        divisions: u32,
    },
    /// Run the frame loop with synthetic timestamps and held keys
    Simulate {
        /// Number of frames to step
        #[arg(short, long, default_value_t = 120)]
        frames: u64,
        /// Simulated frame rate
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
        fps: u32,
        /// Keys held for the whole run
        #[arg(long, value_enum, value_delimiter = ',')]
        hold: Vec<HeldKey>,
        /// Print every Nth frame in text mode
        #[arg(long, default_value_t = 60)]
        every: u64,
        /// Emit a JSON camera trace instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeldKey {
    Forward,
    Back,
    Left,
    Right,
    TurnLeft,
    TurnRight,
    LookUp,
    LookDown,
}

impl From<HeldKey> for Key {
    fn from(key: HeldKey) -> Self {
        match key {
            HeldKey::Forward => Key::Forward,
            HeldKey::Back => Key::Back,
            HeldKey::Left => Key::StrafeLeft,
            HeldKey::Right => Key::StrafeRight,
            HeldKey::TurnLeft => Key::TurnLeft,
            HeldKey::TurnRight => Key::TurnRight,
            HeldKey::LookUp => Key::LookUp,
            HeldKey::LookDown => Key::LookDown,
        }
    }
}

/// Step `frames` frames at a fixed rate with `hold` pressed from the start.
fn simulate(config: ViewerConfig, frames: u64, fps: u32, hold: &[HeldKey]) -> Vec<FrameOutput> {
    let mut orchestrator = FrameOrchestrator::new(config);
    let mut state = ViewerState::new();
    for key in hold {
        state.input.push(InputEvent::KeyDown((*key).into()));
    }

    let step = Duration::from_secs_f64(1.0 / f64::from(fps));
    let start = Instant::now();
    (0..frames)
        .map(|i| {
            let now = start + step.mul_f64(i as f64);
            orchestrator.frame(&mut state, now)
        })
        .collect()
}

fn frame_json(frame: &FrameOutput) -> serde_json::Value {
    serde_json::json!({
        "frame": frame.index,
        "dt": frame.dt,
        "camera": frame.camera.snapshot(),
        "moved": frame.moved,
        "idle_counter": frame.idle_counter,
        "export": frame.export.is_some(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            let cfg = ViewerConfig::default();
            println!("trailrun-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("terrain: {}", trailrun_terrain::crate_info());
            println!("render: {}", trailrun_render::crate_info());
            println!(
                "plane: size={} divisions={} spacing={}",
                cfg.plane_size,
                cfg.plane_divisions,
                cfg.vertex_spacing()
            );
            println!(
                "camera: fov={:.1}deg near={} far={} eye={} look_at={}",
                cfg.fov_y.to_degrees(),
                cfg.z_near,
                cfg.z_far,
                cfg.eye_height,
                cfg.look_at_distance
            );
            println!(
                "motion: linear={} yaw={} pitch={} idle_threshold={}",
                cfg.linear_speed, cfg.yaw_speed, cfg.pitch_speed, cfg.idle_frame_threshold
            );
        }
        Commands::Mesh { size, divisions } => {
            let mesh = trailrun_terrain::generate(size, divisions)?;
            let strip_triangles = mesh.index_count().saturating_sub(2);
            println!("Mesh: size={} divisions={}", mesh.size(), mesh.divisions());
            println!(
                "Vertices: {}  Indices: {}",
                mesh.vertex_count(),
                mesh.index_count()
            );
            println!(
                "Triangles: {} visible, {} degenerate",
                mesh.triangle_count(),
                strip_triangles - mesh.triangle_count()
            );
            println!(
                "Spacing: {}  Bounds: [{}, {}]",
                mesh.vertex_spacing(),
                -mesh.half_extent(),
                mesh.half_extent()
            );
        }
        Commands::Simulate {
            frames,
            fps,
            hold,
            every,
            json,
        } => {
            let cfg = ViewerConfig::default();
            let outputs = simulate(cfg, frames, fps, &hold);

            for frame in outputs.iter().filter(|f| f.export.is_some()) {
                tracing::info!(frame = frame.index, "idle snapshot requested");
            }

            if json {
                let trace: Vec<_> = outputs.iter().map(frame_json).collect();
                println!("{}", serde_json::to_string_pretty(&trace)?);
            } else {
                let mesh = trailrun_terrain::generate(cfg.plane_size, cfg.plane_divisions)?;
                let renderer = DebugTextRenderer::new(mesh.vertex_count(), mesh.index_count());
                let last = outputs.len().saturating_sub(1) as u64;
                for frame in &outputs {
                    if frame.index % every.max(1) == 0 || frame.index == last {
                        let draw = FrameDraw::from_frame(frame, mesh.vertex_spacing());
                        print!("{}", renderer.render(&draw));
                    }
                }
            }
        }
    }

    Ok(())
}
