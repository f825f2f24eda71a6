//! wgpu render backend for the flyview demo.
//!
//! Owns the GPU context, uploads meshes from a [`flyview_render::MeshRegistry`],
//! and draws one mesh per frame with a single combined-transform uniform.
//!
//! # Invariants
//! - Setup failures are returned as [`RenderError`]; nothing here exits the process.
//! - The renderer never mutates camera or mesh state.

mod context;
mod error;
mod gpu;
mod shaders;

pub use context::GpuContext;
pub use error::RenderError;
pub use gpu::MeshRenderer;
pub use shaders::{MESH_SHADER, load_shader};

pub fn crate_info() -> &'static str {
    "flyview-render-wgpu v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render-wgpu"));
    }
}
