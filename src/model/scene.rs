use glam::{Mat4, Quat, Vec3};

use super::camera::Camera;

/// Index of a transform inside its [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformId(pub usize);

/// Index of a mesh inside a [`MeshLibrary`](super::arm::MeshLibrary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

/// Named node of the transform hierarchy.
#[derive(Debug, Clone)]
pub struct Transform {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub parent: Option<TransformId>,
}

impl Transform {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            parent: None,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn child_of(mut self, parent: TransformId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// translate * rotate * scale
    pub fn make_local_to_parent(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Mesh drawn at a transform's world placement.
#[derive(Debug, Clone, Copy)]
pub struct Drawable {
    pub transform: TransformId,
    pub mesh: MeshId,
}

/// A tree of named transforms plus the cameras and drawables hanging off it.
///
/// Nodes are addressed by [`TransformId`]; parents must be added before
/// their children. Nodes are only ever appended, so a handle stays valid
/// for the life of the scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    transforms: Vec<Transform>,
    cameras: Vec<Camera>,
    drawables: Vec<Drawable>,
}

impl Scene {
    pub fn add_transform(&mut self, transform: Transform) -> TransformId {
        if let Some(parent) = transform.parent {
            debug_assert!(parent.0 < self.transforms.len(), "parent must exist before child");
        }
        self.transforms.push(transform);
        TransformId(self.transforms.len() - 1)
    }

    pub fn add_camera(&mut self, camera: Camera) {
        self.cameras.push(camera);
    }

    pub fn add_drawable(&mut self, transform: TransformId, mesh: MeshId) {
        self.drawables.push(Drawable { transform, mesh });
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    /// Cameras can be retuned in place but not added or removed.
    pub fn cameras_mut(&mut self) -> &mut [Camera] {
        &mut self.cameras
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    /// First transform carrying `name`.
    pub fn find(&self, name: &str) -> Option<TransformId> {
        self.transforms
            .iter()
            .position(|t| t.name == name)
            .map(TransformId)
    }

    pub fn transform(&self, id: TransformId) -> &Transform {
        &self.transforms[id.0]
    }

    pub fn transform_mut(&mut self, id: TransformId) -> &mut Transform {
        &mut self.transforms[id.0]
    }

    pub fn make_local_to_parent(&self, id: TransformId) -> Mat4 {
        self.transform(id).make_local_to_parent()
    }

    /// Accumulates local-to-parent matrices up the parent chain.
    pub fn make_local_to_world(&self, id: TransformId) -> Mat4 {
        let mut matrix = self.make_local_to_parent(id);
        let mut parent = self.transform(id).parent;
        while let Some(p) = parent {
            matrix = self.make_local_to_parent(p) * matrix;
            parent = self.transform(p).parent;
        }
        matrix
    }

    /// World-space position of the transform's local origin.
    pub fn world_position(&self, id: TransformId) -> Vec3 {
        self.make_local_to_world(id).transform_point3(Vec3::ZERO)
    }
}
