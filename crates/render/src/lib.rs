//! Rendering adapter: everything the frame loop needs that is not tied to a GPU API.
//!
//! # Invariants
//! - Renderers read camera and mesh state; they never mutate it.
//! - The combined transform is always `projection * view * model`.
//! - Mesh records are addressed by handle, never by position in a global.
//!
//! The [`DebugTextRenderer`] shares the [`Renderer`] interface so the frame
//! pipeline can be exercised without a window.

mod mesh;
mod pacer;
mod renderer;
mod transform;

pub use mesh::{MeshData, MeshError, MeshHandle, MeshKind, MeshRegistry, Vertex};
pub use pacer::{FramePacer, FrameStats, FrameStatus};
pub use renderer::{DebugTextRenderer, FrameView, Renderer};
pub use transform::{FrameTransforms, Projection, Spin};

pub fn crate_info() -> &'static str {
    "flyview-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
