mod app;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use flyview_render::MeshKind;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::FlyviewApp;
use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "flyview-desktop",
    about = "Spinning mesh with a fly camera. WASD moves, Escape toggles mouse capture."
)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Target frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Camera movement per frame while a key is held
    #[arg(long)]
    speed: Option<f32>,

    /// Built-in mesh to draw (quad or triangle)
    #[arg(long)]
    mesh: Option<MeshKind>,

    /// WGSL shader replacing the built-in one
    #[arg(long)]
    shader: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::resolve(&cli)?;
    tracing::info!(?config, "flyview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = FlyviewApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
