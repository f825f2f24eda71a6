use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use flyview_render::MeshKind;
use serde::{Deserialize, Serialize};

use crate::Cli;

/// Startup configuration, read from an optional JSON file and overridden by flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
    /// World units moved per frame while a movement key is held.
    pub move_speed: f32,
    /// Radians the mesh turns each frame.
    pub spin_step: f32,
    pub mesh: MeshKind,
    /// WGSL file replacing the built-in shader.
    pub shader: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "flyview".into(),
            width: 640,
            height: 480,
            target_fps: 60,
            move_speed: 0.1,
            spin_step: 0.01,
            mesh: MeshKind::Quad,
            shader: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let config: Self = serde_json::from_reader(file)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// File values (if `--config` was given) with explicit flags layered on top.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(width) = cli.width {
            config.width = width;
        }
        if let Some(height) = cli.height {
            config.height = height;
        }
        if let Some(fps) = cli.fps {
            config.target_fps = fps;
        }
        if let Some(speed) = cli.speed {
            config.move_speed = speed;
        }
        if let Some(mesh) = cli.mesh {
            config.mesh = mesh;
        }
        if let Some(shader) = &cli.shader {
            config.shader = Some(shader.clone());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("window size must be non-zero, got {}x{}", self.width, self.height);
        }
        if self.target_fps == 0 {
            bail!("target_fps must be at least 1");
        }
        if !self.move_speed.is_finite() {
            bail!("move_speed must be finite, got {}", self.move_speed);
        }
        if !self.spin_step.is_finite() {
            bail!("spin_step must be finite, got {}", self.spin_step);
        }
        Ok(())
    }
}
