use std::path::PathBuf;

use flyview_render::MeshHandle;

/// Errors from GPU setup and drawing.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no GPU adapter compatible with the window surface")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported texture formats")]
    UnsupportedSurface,
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("failed to read shader {path}: {source}")]
    ShaderFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("shader {label} failed to compile: {message}")]
    Shader { label: String, message: String },
    #[error("pipeline {label} failed to link: {message}")]
    Pipeline { label: String, message: String },
    #[error("{0} has not been uploaded")]
    UnknownMesh(MeshHandle),
}
