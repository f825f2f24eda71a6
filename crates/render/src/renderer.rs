use flyview_camera::Camera;
use glam::{Mat4, Vec3};

use crate::mesh::MeshData;

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub frame: u64,
    pub camera: &'a Camera,
    /// `projection * view * model` for this frame.
    pub transform: Mat4,
    pub mesh: &'a MeshData,
}

/// Renderer-agnostic interface.
///
/// A renderer reads a [`FrameView`] and produces output. It never mutates the
/// camera or the mesh.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render(&self, view: &FrameView<'_>) -> Self::Output;
}

/// Renders a frame as text: camera state, combined matrix, and the
/// normalized device coordinates of every mesh vertex.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, view: &FrameView<'_>) -> String {
        let mut out = String::new();
        let cam = view.camera;
        out.push_str(&format!(
            "=== Frame {} ({}) ===\n",
            view.frame, view.mesh.name
        ));
        out.push_str(&format!(
            "Camera: position={} facing={} up={}\n",
            fmt_vec(cam.position()),
            fmt_vec(cam.facing()),
            fmt_vec(cam.up())
        ));
        out.push_str("Transform:\n");
        for row in 0..4 {
            let r = view.transform.row(row);
            out.push_str(&format!(
                "  [{:8.4} {:8.4} {:8.4} {:8.4}]\n",
                r.x, r.y, r.z, r.w
            ));
        }

        for (i, vertex) in view.mesh.vertices.iter().enumerate() {
            let clip = view.transform * Vec3::from(vertex.position).extend(1.0);
            if clip.w <= 0.0 {
                out.push_str(&format!("  v{i}: behind camera\n"));
                continue;
            }
            let ndc = clip.truncate() / clip.w;
            out.push_str(&format!("  v{i}: ndc={}\n", fmt_vec(ndc)));
        }

        out
    }
}

fn fmt_vec(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::FrameTransforms;

    #[test]
    fn debug_renderer_default_frame() {
        let camera = Camera::default();
        let mesh = MeshData::quad();
        let transforms = FrameTransforms::default();
        let view = FrameView {
            frame: 0,
            camera: &camera,
            transform: transforms.combined(camera.view_matrix()),
            mesh: &mesh,
        };
        let output = DebugTextRenderer::new().render(&view);

        assert!(output.contains("=== Frame 0 (quad) ==="));
        assert!(output.contains("position=(0.000, 0.000, 5.000)"));
        assert!(output.contains("facing=(0.000, 0.000, -1.000)"));
        assert_eq!(output.matches("ndc=").count(), 4);
    }

    #[test]
    fn every_entry_is_its_own_line() {
        let camera = Camera::default();
        let mesh = MeshData::triangle();
        let view = FrameView {
            frame: 7,
            camera: &camera,
            transform: Mat4::IDENTITY,
            mesh: &mesh,
        };
        let output = DebugTextRenderer::new().render(&view);
        let lines: Vec<&str> = output.lines().collect();

        // header, camera, "Transform:", 4 matrix rows, 3 vertices
        assert_eq!(lines.len(), 10);
        assert!(output.ends_with('\n'));
        assert_eq!(lines[0], "=== Frame 7 (triangle) ===");
        assert_eq!(lines[3], "  [  1.0000   0.0000   0.0000   0.0000]");
        assert!(lines[7].starts_with("  v0: ndc="));
    }

    #[test]
    fn vertices_behind_camera_are_flagged() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z, Vec3::Y);
        let mesh = MeshData::triangle();
        let transforms = FrameTransforms::default();
        let view = FrameView {
            frame: 3,
            camera: &camera,
            transform: transforms.combined(camera.view_matrix()),
            mesh: &mesh,
        };
        let output = DebugTextRenderer::new().render(&view);

        assert_eq!(output.matches("behind camera").count(), 3);
    }
}
