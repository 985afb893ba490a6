use glam::Mat4;

use super::scene::{Scene, TransformId};

/// Perspective camera attached to a scene transform.
#[derive(Debug, Clone)]
pub struct Camera {
    pub transform: TransformId,
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub aspect: f32,
    pub near: f32,
}

impl Camera {
    pub fn new(transform: TransformId) -> Self {
        Self {
            transform,
            fovy: 60f32.to_radians(),
            aspect: 1.0,
            near: 0.01,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Right-handed perspective with the far plane at infinity.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_infinite_rh(self.fovy, self.aspect, self.near)
    }

    /// World-to-clip for the camera's current place in `scene`.
    pub fn view_proj(&self, scene: &Scene) -> Mat4 {
        let view = scene.make_local_to_world(self.transform).inverse();
        self.projection() * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::scene::Transform;
    use glam::{Vec3, Vec4};

    #[test]
    fn test_aspect_from_pixels() {
        let mut scene = Scene::default();
        let id = scene.add_transform(Transform::new("Camera"));
        let mut cam = Camera::new(id);
        cam.set_aspect(1280, 720);
        assert!((cam.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_in_front_lands_in_clip_center() {
        let mut scene = Scene::default();
        // Camera looks down its local -Z, so a point at -Z projects to the middle
        let id = scene.add_transform(Transform::new("Camera").at(Vec3::new(0.0, 0.0, 5.0)));
        let cam = Camera::new(id);
        let clip = cam.view_proj(&scene) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z <= 1.0);
    }
}
