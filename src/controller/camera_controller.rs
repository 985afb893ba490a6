use glam::{Quat, Vec2, Vec3};

use super::input::{ButtonId, InputState};
use crate::model::Transform;

/// Handles camera movement and orientation
#[derive(Debug, Clone)]
pub struct CameraController {
    pub move_speed: f32,
    pub world_up: Vec3,
}

impl CameraController {
    pub fn new(move_speed: f32, world_up: Vec3) -> Self {
        Self { move_speed, world_up }
    }

    /// Apply mouse look delta to the camera transform.
    ///
    /// One window height of travel turns the view by one field of view. Yaw
    /// is about the world up axis, pitch about the camera's own right axis.
    pub fn apply_look(&self, camera: &mut Transform, fovy: f32, dx: f32, dy: f32, window_height: u32) {
        let height = window_height.max(1) as f32;
        let yaw = -dx / height * fovy;
        // screen y grows downwards
        let pitch = -dy / height * fovy;
        camera.rotation = (Quat::from_axis_angle(self.world_up, yaw)
            * camera.rotation
            * Quat::from_axis_angle(Vec3::X, pitch))
        .normalize();
    }

    /// Combine held movement buttons into a planar direction.
    ///
    /// Opposite buttons held together cancel out.
    pub fn planar_move(input: &InputState) -> Vec2 {
        let mut dir = Vec2::ZERO;
        let left = input.is_pressed(ButtonId::Left);
        let right = input.is_pressed(ButtonId::Right);
        let back = input.is_pressed(ButtonId::Back);
        let forward = input.is_pressed(ButtonId::Forward);
        if left && !right {
            dir.x = -1.0;
        }
        if !left && right {
            dir.x = 1.0;
        }
        if back && !forward {
            dir.y = -1.0;
        }
        if !back && forward {
            dir.y = 1.0;
        }
        dir
    }

    /// Move along the camera's right and view axes.
    pub fn update_movement(&self, camera: &mut Transform, dir: Vec2, dt: f32) {
        if dir == Vec2::ZERO {
            return;
        }
        // diagonal moves are no faster than straight ones
        let step = dir.normalize() * self.move_speed * dt;

        let frame = camera.make_local_to_parent();
        let right = frame.x_axis.truncate();
        let forward = -frame.z_axis.truncate();

        camera.position += step.x * right + step.y * forward;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::{InputEvent, Key, KeyBindings};

    fn held(keys: &[Key]) -> InputState {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        for key in keys {
            input.process_event(&InputEvent::KeyDown(*key), &bindings);
        }
        input
    }

    #[test]
    fn test_opposite_keys_cancel() {
        assert_eq!(CameraController::planar_move(&held(&[Key::A, Key::D])), Vec2::ZERO);
        assert_eq!(CameraController::planar_move(&held(&[Key::W, Key::S])), Vec2::ZERO);
        assert_eq!(CameraController::planar_move(&held(&[Key::A, Key::W])), Vec2::new(-1.0, 1.0));
        assert_eq!(CameraController::planar_move(&held(&[Key::D, Key::S])), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_forward_moves_along_view() {
        let ctl = CameraController::new(30.0, Vec3::Z);
        let mut cam = Transform::new("Camera");
        ctl.update_movement(&mut cam, Vec2::new(0.0, 1.0), 0.1);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-5));
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let ctl = CameraController::new(30.0, Vec3::Z);
        let mut cam = Transform::new("Camera");
        ctl.update_movement(&mut cam, Vec2::new(1.0, 1.0), 0.1);
        assert!((cam.position.length() - 3.0).abs() < 1e-4);
        assert!(cam.position.x > 0.0 && cam.position.z < 0.0);
    }

    #[test]
    fn test_movement_uses_camera_orientation() {
        let ctl = CameraController::new(10.0, Vec3::Z);
        let mut cam = Transform::new("Camera");
        cam.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        // local right (+X) now points to world -Z
        ctl.update_movement(&mut cam, Vec2::new(1.0, 0.0), 1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, -10.0), 1e-4));
    }

    #[test]
    fn test_look_full_height_turns_one_fov() {
        let ctl = CameraController::new(30.0, Vec3::Z);
        let mut cam = Transform::new("Camera");
        let fovy = 1.0;
        ctl.apply_look(&mut cam, fovy, -600.0, 0.0, 600);
        assert!(cam.rotation.abs_diff_eq(Quat::from_rotation_z(1.0), 1e-5));
        assert!((cam.rotation.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mouse_down_pitches_down() {
        let ctl = CameraController::new(30.0, Vec3::Z);
        let mut cam = Transform::new("Camera");
        ctl.apply_look(&mut cam, 1.0, 0.0, 60.0, 600);
        let forward = cam.rotation * Vec3::NEG_Z;
        assert!(forward.y < 0.0);
    }

    fn tilted_camera() -> Transform {
        let mut cam = Transform::new("Camera");
        cam.rotation = Quat::from_rotation_z(0.7) * Quat::from_rotation_x(0.5);
        cam
    }

    #[test]
    fn test_yaw_turns_about_world_up_when_tilted() {
        let ctl = CameraController::new(30.0, Vec3::Z);
        let mut cam = tilted_camera();
        let start = cam.rotation;
        ctl.apply_look(&mut cam, 1.0, -120.0, 0.0, 600);

        let yaw = 0.2;
        assert!(cam.rotation.abs_diff_eq(Quat::from_rotation_z(yaw) * start, 1e-5));
        // turning about the camera's own up axis would tip the horizon
        assert!(!cam.rotation.abs_diff_eq(start * Quat::from_rotation_z(yaw), 1e-3));
    }

    #[test]
    fn test_pitch_turns_about_local_right_when_tilted() {
        let ctl = CameraController::new(30.0, Vec3::Z);
        let mut cam = tilted_camera();
        let start = cam.rotation;
        ctl.apply_look(&mut cam, 1.0, 0.0, -120.0, 600);

        let pitch = 0.2;
        assert!(cam.rotation.abs_diff_eq(start * Quat::from_rotation_x(pitch), 1e-5));
        assert!(!cam.rotation.abs_diff_eq(Quat::from_rotation_x(pitch) * start, 1e-3));
    }
}
