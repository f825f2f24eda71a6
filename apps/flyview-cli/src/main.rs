use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use flyview_camera::Camera;
use flyview_input::{InputState, MoveKey};
use flyview_render::{
    DebugTextRenderer, FrameTransforms, FrameView, MeshData, MeshKind, MeshRegistry, Projection,
    Renderer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flyview-cli", about = "Headless tool for the flyview camera pipeline")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the default camera and projection
    Info,
    /// Step the camera with held keys and a constant mouse delta, then print the frame
    Simulate {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Held movement keys as WASD letters, e.g. "wd"
        #[arg(long, default_value = "")]
        hold: String,
        /// Horizontal mouse motion per frame in pixels
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        look_x: f32,
        /// Vertical mouse motion per frame in pixels
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        look_y: f32,
        /// Camera movement per frame while a key is held
        #[arg(long, default_value = "0.1")]
        speed: f32,
        /// Mesh to project (quad or triangle)
        #[arg(long, default_value = "quad")]
        mesh: MeshKind,
        /// Print every frame instead of only the last
        #[arg(long)]
        every: bool,
    },
}

/// Inputs for a headless run.
struct Simulation {
    frames: u64,
    hold: Vec<MoveKey>,
    look_x: f32,
    look_y: f32,
    speed: f32,
    mesh: MeshKind,
    every: bool,
}

fn parse_hold(hold: &str) -> Result<Vec<MoveKey>> {
    hold.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| MoveKey::from_wasd(c).ok_or_else(|| anyhow!("unknown movement key {c:?}")))
        .collect()
}

/// Run the frame pipeline without a window and return the rendered frames.
fn simulate(sim: &Simulation) -> Result<(Camera, Vec<String>)> {
    let mut registry = MeshRegistry::new();
    let handle = registry.insert(MeshData::for_kind(sim.mesh))?;
    let mesh = registry
        .get(handle)
        .ok_or_else(|| anyhow!("{handle} missing from registry"))?;

    let renderer = DebugTextRenderer::new();
    let mut camera = Camera::default();
    let mut input = InputState::default();
    let mut transforms = FrameTransforms::default();
    for key in &sim.hold {
        input.set_key(*key, true);
    }

    let mut frames = Vec::new();
    if sim.frames == 0 {
        frames.push(renderer.render(&FrameView {
            frame: 0,
            camera: &camera,
            transform: transforms.combined(camera.view_matrix()),
            mesh,
        }));
    }

    for frame in 1..=sim.frames {
        input.mouse_motion(sim.look_x, sim.look_y);
        input.drive(&mut camera, sim.speed);
        let transform = transforms.next_frame(&camera);
        if sim.every || frame == sim.frames {
            frames.push(renderer.render(&FrameView {
                frame,
                camera: &camera,
                transform,
                mesh,
            }));
        }
    }

    if let Err(e) = camera.validate() {
        tracing::warn!("camera ended in a degenerate state: {e}");
    }
    Ok((camera, frames))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Info => {
            println!("flyview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("camera: {}", flyview_camera::crate_info());
            println!("input: {}", flyview_input::crate_info());
            println!("render: {}", flyview_render::crate_info());
            println!("render-wgpu: {}", flyview_render_wgpu::crate_info());

            let camera = Camera::default();
            println!(
                "default camera: position={} facing={} up={}",
                camera.position(),
                camera.facing(),
                camera.up()
            );
            let p = Projection::default();
            println!(
                "default projection: fov={}deg aspect={:.3} near={} far={}",
                p.fov_y_degrees, p.aspect, p.near, p.far
            );
            println!("look sensitivity: {} deg/px", flyview_camera::LOOK_SENSITIVITY);
        }
        Commands::Simulate {
            frames,
            hold,
            look_x,
            look_y,
            speed,
            mesh,
            every,
        } => {
            let sim = Simulation {
                frames,
                hold: parse_hold(&hold)?,
                look_x,
                look_y,
                speed,
                mesh,
                every,
            };
            let (camera, output) = simulate(&sim)?;
            for text in output {
                print!("{text}");
            }
            tracing::debug!(position = %camera.position(), facing = %camera.facing(), "simulation done");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn sim(frames: u64, hold: &str, look_x: f32) -> Simulation {
        Simulation {
            frames,
            hold: parse_hold(hold).unwrap(),
            look_x,
            look_y: 0.0,
            speed: 0.1,
            mesh: MeshKind::Quad,
            every: false,
        }
    }

    #[test]
    fn hold_parsing() {
        assert_eq!(
            parse_hold("w, D").unwrap(),
            vec![MoveKey::Forward, MoveKey::Right]
        );
        assert!(parse_hold("").unwrap().is_empty());
        assert!(parse_hold("wx").is_err());
    }

    #[test]
    fn zero_frames_prints_initial_state() {
        let (camera, frames) = simulate(&sim(0, "", 0.0)).unwrap();
        assert_eq!(camera, Camera::default());
        assert_eq!(frames.len(), 1);
        assert!(frames[0].contains("=== Frame 0 (quad) ==="));
    }

    #[test]
    fn held_keys_move_along_world_axes() {
        let (camera, frames) = simulate(&sim(10, "wa", 0.0)).unwrap();
        assert!(camera.position().abs_diff_eq(Vec3::new(-1.0, 0.0, 4.0), 1e-5));
        assert_eq!(frames.len(), 1);
        assert!(frames[0].contains("=== Frame 10 (quad) ==="));
    }

    #[test]
    fn constant_look_turns_right() {
        // 10 frames * 90 px * 0.1 deg/px = 90 degrees
        let (camera, _) = simulate(&sim(10, "", 90.0)).unwrap();
        assert!(camera.facing().abs_diff_eq(Vec3::X, 1e-4));
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn every_prints_each_frame() {
        let mut s = sim(5, "d", 0.0);
        s.every = true;
        s.mesh = MeshKind::Triangle;
        let (_, frames) = simulate(&s).unwrap();
        assert_eq!(frames.len(), 5);
        assert!(frames[4].contains("(triangle)"));
    }
}
