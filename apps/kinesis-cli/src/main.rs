use clap::{Parser, Subcommand};
use glam::Vec3;
use tracing_subscriber::EnvFilter;

use kinesis_scene::{OrbitCamera, SceneRenderer, TextFrameRenderer};
use kinesis_sync::rig::{spawn_rig, RigHandles, RigMeshes};
use kinesis_sync::PhysicsStage;

#[derive(Parser)]
#[command(name = "kinesis-cli", about = "Headless driver for the kinesis demo rig")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Run the falling-bodies rig without a window
    Simulate {
        /// Number of frames to step
        #[arg(short, long, default_value = "120")]
        frames: u32,
        /// Frame delta in seconds
        #[arg(short, long, default_value = "0.016666668")]
        dt: f32,
        /// Vertical gravity, in m/s^2
        #[arg(long, default_value = "-9.81", allow_hyphen_values = true)]
        gravity: f32,
        /// Largest timestep one frame may consume, in seconds
        #[arg(long, default_value = "0.1")]
        max_step: f32,
        /// Print a summary every N frames
        #[arg(long, default_value = "30")]
        interval: u32,
    },
    /// Extract one debug wireframe and print its buffer statistics
    Wireframe,
}

fn rigged_stage(gravity: f32) -> anyhow::Result<PhysicsStage> {
    let mut stage = PhysicsStage::with_gravity(Vec3::new(0.0, gravity, 0.0));
    let meshes = RigMeshes::generate();
    spawn_rig(&mut stage, &meshes, &RigHandles::sequential())?;
    Ok(stage)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("kinesis-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("physics: {}", kinesis_physics::crate_info());
            println!("scene: {}", kinesis_scene::crate_info());
            println!("sync: {}", kinesis_sync::crate_info());
        }
        Commands::Simulate {
            frames,
            dt,
            gravity,
            max_step,
            interval,
        } => {
            println!("Simulating {frames} frames at dt={dt}s, gravity={gravity}");

            let mut stage = rigged_stage(gravity)?;
            stage.step_config.max_step = max_step;
            for frame in 1..=frames {
                let report = stage.frame(dt)?;
                if frame % interval.max(1) == 0 || frame == frames {
                    println!(
                        "frame {frame}: stepped {:.4}s, synced {} proxies, {} overlay segments",
                        report.step.dt, report.synced, report.overlay_segments
                    );
                    for binding in stage.registry().bindings() {
                        if let Some(proxy) = stage.scene().get(binding.proxy) {
                            let p = proxy.transform.position;
                            println!(
                                "  body {}: ({:.2}, {:.2}, {:.2})",
                                binding.id.0, p.x, p.y, p.z
                            );
                        }
                    }
                }
            }

            println!("\nFinal frame:");
            let mut renderer = TextFrameRenderer::new();
            let camera = OrbitCamera::default();
            print!("{}", renderer.render(stage.scene(), &camera, stage.overlay()));
        }
        Commands::Wireframe => {
            let mut stage = rigged_stage(-9.81)?;
            let report = stage.frame(0.0)?;

            let overlay = stage.overlay();
            println!("colliders: {}", stage.world().collider_count());
            println!("segments: {}", report.overlay_segments);
            println!("vertices: {}", overlay.vertex_count());
            println!(
                "buffer floats: {} positions, {} colors",
                overlay.positions().len(),
                overlay.colors().len()
            );
        }
    }

    Ok(())
}
