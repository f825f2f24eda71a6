use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Interleaved vertex: position followed by RGB color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// Indexed triangle list kept on the CPU until a backend uploads it.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Unit quad in the XY plane centred on the origin, one color per corner.
    pub fn quad() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            Vertex::new([-0.5, -0.5, 0.0], [1.0, 0.0, 0.0]), // bottom left, red
            Vertex::new([ 0.5, -0.5, 0.0], [0.0, 1.0, 0.0]), // bottom right, green
            Vertex::new([-0.5,  0.5, 0.0], [0.0, 0.0, 1.0]), // top left, blue
            Vertex::new([ 0.5,  0.5, 0.0], [0.5, 0.5, 0.5]), // top right, gray
        ];
        Self {
            name: "quad".into(),
            vertices,
            indices: vec![0, 1, 2, 2, 1, 3],
        }
    }

    /// Single RGB triangle, counter-clockwise when seen from +Z.
    pub fn triangle() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            Vertex::new([-0.5, -0.5, 0.0], [1.0, 0.0, 0.0]),
            Vertex::new([ 0.5, -0.5, 0.0], [0.0, 1.0, 0.0]),
            Vertex::new([ 0.0,  0.5, 0.0], [0.0, 0.0, 1.0]),
        ];
        Self {
            name: "triangle".into(),
            vertices,
            indices: vec![0, 1, 2],
        }
    }

    pub fn for_kind(kind: MeshKind) -> Self {
        match kind {
            MeshKind::Quad => Self::quad(),
            MeshKind::Triangle => Self::triangle(),
        }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Which built-in mesh to draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshKind {
    #[default]
    Quad,
    Triangle,
}

impl FromStr for MeshKind {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quad" => Ok(MeshKind::Quad),
            "triangle" => Ok(MeshKind::Triangle),
            other => Err(MeshError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for MeshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshKind::Quad => f.write_str("quad"),
            MeshKind::Triangle => f.write_str("triangle"),
        }
    }
}

/// Opaque handle to a mesh record in a [`MeshRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(u32);

impl MeshHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MeshHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// Errors from mesh validation and lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("mesh {0:?} has no vertices or no indices")]
    EmptyMesh(String),
    #[error("mesh {name:?}: index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        name: String,
        index: u32,
        vertex_count: usize,
    },
    #[error("mesh {name:?}: index count {count} is not a multiple of 3")]
    PartialTriangle { name: String, count: usize },
    #[error("unknown mesh kind {0:?} (expected quad or triangle)")]
    UnknownKind(String),
}

/// Arena of validated meshes. Records are never removed, so handles stay valid.
#[derive(Debug, Default)]
pub struct MeshRegistry {
    meshes: Vec<MeshData>,
}

impl MeshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a mesh.
    pub fn insert(&mut self, mesh: MeshData) -> Result<MeshHandle, MeshError> {
        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            return Err(MeshError::EmptyMesh(mesh.name));
        }
        if mesh.indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle {
                count: mesh.indices.len(),
                name: mesh.name,
            });
        }
        if let Some(&index) = mesh
            .indices
            .iter()
            .find(|&&i| i as usize >= mesh.vertices.len())
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: mesh.vertices.len(),
                name: mesh.name,
            });
        }

        let handle = MeshHandle(self.meshes.len() as u32);
        tracing::debug!(
            %handle,
            name = %mesh.name,
            vertices = mesh.vertices.len(),
            indices = mesh.indices.len(),
            "registered mesh"
        );
        self.meshes.push(mesh);
        Ok(handle)
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(handle.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshHandle, &MeshData)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(i, mesh)| (MeshHandle(i as u32), mesh))
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
