use bytemuck::NoUninit;
use glam::{Mat3, Mat4, Vec3};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Append `other` with positions and normals moved by `matrix`.
    pub fn append_transformed(&mut self, other: &Mesh, matrix: Mat4) {
        let base = self.vertices.len() as u32;
        // inverse-transpose keeps normals perpendicular under non-uniform scale
        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();
        for v in &other.vertices {
            let pos = matrix.transform_point3(Vec3::from(v.pos));
            let normal = (normal_matrix * Vec3::from(v.normal)).normalize_or_zero();
            self.vertices.push(Vertex {
                pos: pos.to_array(),
                normal: normal.to_array(),
                color: v.color,
            });
        }
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertices = bytemuck::cast_slice(&self.vertices);
        let indices = bytemuck::cast_slice(&self.indices);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: indices,
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// Axis-aligned box between `min` and `max`, one flat-shaded quad per face.
pub fn create_box_mesh(min: Vec3, max: Vec3, color: [f32; 4]) -> Mesh {
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        // +X
        (Vec3::X, [
            Vec3::new(max.x, min.y, min.z), Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, max.y, max.z), Vec3::new(max.x, min.y, max.z),
        ]),
        // -X
        (Vec3::NEG_X, [
            Vec3::new(min.x, max.y, min.z), Vec3::new(min.x, min.y, min.z),
            Vec3::new(min.x, min.y, max.z), Vec3::new(min.x, max.y, max.z),
        ]),
        // +Y
        (Vec3::Y, [
            Vec3::new(max.x, max.y, min.z), Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, max.y, max.z), Vec3::new(max.x, max.y, max.z),
        ]),
        // -Y
        (Vec3::NEG_Y, [
            Vec3::new(min.x, min.y, min.z), Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, min.y, max.z), Vec3::new(min.x, min.y, max.z),
        ]),
        // +Z
        (Vec3::Z, [
            Vec3::new(min.x, min.y, max.z), Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z), Vec3::new(min.x, max.y, max.z),
        ]),
        // -Z
        (Vec3::NEG_Z, [
            Vec3::new(min.x, max.y, min.z), Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, min.y, min.z), Vec3::new(min.x, min.y, min.z),
        ]),
    ];

    let mut mesh = Mesh::empty();
    for (normal, corners) in faces {
        let base = mesh.vertices.len() as u32;
        for corner in corners {
            mesh.vertices.push(Vertex {
                pos: corner.to_array(),
                normal: normal.to_array(),
                color,
            });
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}
