//! Renderer-neutral description of one frame.

use glam::{Mat4, UVec2, Vec2, Vec3};

use crate::model::{MeshId, MeshLibrary};
use crate::utils::Mesh;

/// Light models the arm shader implements, tagged with their uniform code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Sky/ground blend driven by the light direction.
    Hemisphere,
}

impl LightKind {
    pub fn shader_code(self) -> u32 {
        match self {
            LightKind::Hemisphere => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    /// Direction the light travels in.
    pub direction: Vec3,
    pub energy: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct DrawItem {
    pub mesh: MeshId,
    pub world: Mat4,
}

/// One run of overlay text.
///
/// Overlay space spans `[-aspect, aspect]` horizontally and `[-1, 1]`
/// vertically with y up; `anchor` is the bottom-left corner of the line.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    pub text: String,
    pub anchor: Vec2,
    pub height: f32,
    pub color: [u8; 4],
}

impl OverlayText {
    /// Bottom-left corner in pixels (y down) and glyph height in pixels.
    pub fn to_pixels(&self, aspect: f32, size: UVec2) -> (Vec2, f32) {
        let w = size.x as f32;
        let h = size.y as f32;
        let x = (self.anchor.x + aspect) / (2.0 * aspect) * w;
        let y = (1.0 - self.anchor.y) * 0.5 * h;
        (Vec2::new(x, y), self.height * 0.5 * h)
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub size: UVec2,
    pub clear_color: [f32; 4],
    pub clear_depth: f32,
    pub light: Light,
    pub view_proj: Mat4,
    pub items: Vec<DrawItem>,
    pub overlay_aspect: f32,
    pub overlay: Vec<OverlayText>,
}

impl Frame {
    /// Flatten every draw item into one world-space mesh.
    pub fn batch(&self, meshes: &MeshLibrary) -> Mesh {
        let mut batch = Mesh::empty();
        for item in &self.items {
            match meshes.get(item.mesh) {
                Some(mesh) => batch.append_transformed(mesh, item.world),
                None => tracing::warn!(mesh = item.mesh.0, "draw item references unknown mesh"),
            }
        }
        batch
    }
}
