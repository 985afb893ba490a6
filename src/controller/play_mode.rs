use glam::{UVec2, Vec2, Vec3};
use rand::rngs::StdRng;

use super::camera_controller::CameraController;
use super::goal;
use super::input::{ButtonId, InputEvent, InputResponse, InputState};
use super::joints::{ArmJoints, Joint};
use crate::config::PlayConfig;
use crate::error::ModeError;
use crate::model::{Camera, Scene, TransformId};
use crate::view::frame::{DrawItem, Frame, Light, LightKind, OverlayText};

const OVERLAY_LINES: [&str; 2] = [
    "Mouse motion rotates camera; WASD moves; escape ungrabs mouse",
    "Left/right turns the hip; up/down bends the joint; space switches joint",
];
const OVERLAY_HEIGHT: f32 = 0.09;

/// The arm-reaching game mode.
///
/// Owns its copy of the scene and the handles into it. Driven once per
/// frame by the shell: any number of [`handle_event`](Self::handle_event)
/// calls, then one [`update`](Self::update), then one [`draw`](Self::draw).
pub struct PlayMode {
    config: PlayConfig,
    scene: Scene,

    hip: TransformId,
    upper_leg: TransformId,
    lower_leg: TransformId,
    gripper: TransformId,
    gripper_head: TransformId,
    cube: TransformId,

    joints: ArmJoints,
    input: InputState,
    camera_controller: CameraController,
    rng: StdRng,
    goals_reached: u32,
}

impl PlayMode {
    pub fn new(scene: Scene, config: PlayConfig) -> Result<Self, ModeError> {
        let names = &config.node_names;
        let find = |role: &'static str, name: &str| {
            scene.find(name).ok_or_else(|| ModeError::MissingNode {
                role,
                name: name.to_string(),
            })
        };

        let hip = find("Hip", &names.hip)?;
        let upper_leg = find("Upper leg", &names.upper_leg)?;
        let lower_leg = find("Lower leg", &names.lower_leg)?;
        let gripper = find("Gripper", &names.gripper)?;
        let gripper_head = find("Gripper head", &names.gripper_head)?;
        let cube = find("Goal cube", &names.cube)?;

        if scene.cameras().len() != 1 {
            return Err(ModeError::CameraCount(scene.cameras().len()));
        }

        let joints = ArmJoints::new(
            scene.transform(hip).rotation,
            scene.transform(upper_leg).rotation,
            scene.transform(lower_leg).rotation,
            scene.transform(gripper).rotation,
        );
        let camera_controller = CameraController::new(config.player_speed, config.world_up);
        let rng = goal::placement_rng(config.rng_seed);

        tracing::info!(
            transforms = scene.transforms().len(),
            head = ?scene.world_position(gripper_head),
            cube = ?scene.world_position(cube),
            "entered play mode"
        );

        Ok(Self {
            config,
            scene,
            hip,
            upper_leg,
            lower_leg,
            gripper,
            gripper_head,
            cube,
            joints,
            input: InputState::new(),
            camera_controller,
            rng,
            goals_reached: 0,
        })
    }

    /// Returns whether the event was consumed.
    pub fn handle_event(&mut self, event: &InputEvent, window_size: UVec2) -> bool {
        let response = self.input.process_event(event, &self.config.bindings);
        if let InputResponse::Look { dx, dy } = response {
            let camera = &self.scene.cameras()[0];
            let (fovy, transform) = (camera.fovy, camera.transform);
            self.camera_controller.apply_look(
                self.scene.transform_mut(transform),
                fovy,
                dx,
                dy,
                window_size.y,
            );
        }
        tracing::trace!(?event, handled = response.handled(), "input event");
        response.handled()
    }

    pub fn update(&mut self, elapsed: f32) {
        let step = self.config.joint_speed * elapsed;

        if self.input.is_pressed(ButtonId::LookLeft) {
            self.joints.hip.offset += step;
        } else if self.input.is_pressed(ButtonId::LookRight) {
            self.joints.hip.offset -= step;
        }

        if self.input.is_pressed(ButtonId::LookUp) {
            self.joints.active_pose_mut().offset += step;
        }
        if self.input.is_pressed(ButtonId::LookDown) {
            self.joints.active_pose_mut().offset -= step;
        }
        if self.input.take_released(ButtonId::Action) {
            let joint = self.joints.advance_active();
            tracing::debug!(joint = joint.label(), "active joint changed");
        }

        self.scene.transform_mut(self.hip).rotation = self.joints.hip.rotation();
        self.scene.transform_mut(self.upper_leg).rotation = self.joints.upper_leg.rotation();
        self.scene.transform_mut(self.lower_leg).rotation = self.joints.lower_leg.rotation();
        self.scene.transform_mut(self.gripper).rotation = self.joints.gripper.rotation();

        let head = self.scene.world_position(self.gripper_head);
        let cube = self.scene.world_position(self.cube);
        if goal::reached(head, cube, self.config.goal_half_extent) {
            self.goals_reached += 1;
            let placed = goal::random_cube_position(&mut self.rng, self.config.cube_height);
            self.scene.transform_mut(self.cube).position = placed;
            tracing::info!(goals = self.goals_reached, ?head, ?cube, next = ?placed, "reached goal");
        }

        let dir = CameraController::planar_move(&self.input);
        let camera = self.scene.cameras()[0].transform;
        self.camera_controller
            .update_movement(self.scene.transform_mut(camera), dir, elapsed);

        self.input.end_frame();
    }

    /// Describe the frame for the renderer; keeps the camera aspect in sync.
    pub fn draw(&mut self, drawable_size: UVec2) -> Frame {
        let size = drawable_size.max(UVec2::ONE);
        self.scene.cameras_mut()[0].set_aspect(size.x, size.y);
        let camera = &self.scene.cameras()[0];

        let items = self
            .scene
            .drawables()
            .iter()
            .map(|d| DrawItem {
                mesh: d.mesh,
                world: self.scene.make_local_to_world(d.transform),
            })
            .collect();

        let aspect = camera.aspect;
        Frame {
            size,
            clear_color: [0.5, 0.5, 0.5, 1.0],
            clear_depth: 1.0,
            light: Light {
                kind: LightKind::Hemisphere,
                direction: Vec3::new(0.0, 0.0, -1.0),
                energy: Vec3::new(1.0, 1.0, 0.95),
            },
            view_proj: camera.view_proj(&self.scene),
            items,
            overlay_aspect: aspect,
            overlay: overlay_text(aspect, size.y),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Move the goal cube; the only positional change allowed from outside.
    pub fn place_cube(&mut self, position: Vec3) {
        self.scene.transform_mut(self.cube).position = position;
    }

    pub fn camera(&self) -> &Camera {
        &self.scene.cameras()[0]
    }

    pub fn joints(&self) -> &ArmJoints {
        &self.joints
    }

    pub fn active_joint(&self) -> Joint {
        self.joints.active
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Whether mouse motion currently steers the camera.
    pub fn pointer_captured(&self) -> bool {
        self.input.pointer_captured
    }

    pub fn goals_reached(&self) -> u32 {
        self.goals_reached
    }

    pub fn gripper_head_position(&self) -> Vec3 {
        self.scene.world_position(self.gripper_head)
    }

    pub fn cube_position(&self) -> Vec3 {
        self.scene.world_position(self.cube)
    }

    pub fn cube_transform(&self) -> TransformId {
        self.cube
    }
}

/// Shadow pass then foreground pass, lines stacked upward from the bottom-left.
fn overlay_text(aspect: f32, height_px: u32) -> Vec<OverlayText> {
    let h = OVERLAY_HEIGHT;
    let ofs = 2.0 / height_px.max(1) as f32;
    let origin = Vec2::new(-aspect + 0.1 * h, -1.0 + 0.1 * h);
    let line_anchor = |i: usize| origin + Vec2::new(0.0, (OVERLAY_LINES.len() - 1 - i) as f32 * 1.2 * h);

    let shadow = OVERLAY_LINES.iter().enumerate().map(|(i, line)| OverlayText {
        text: line.to_string(),
        anchor: line_anchor(i),
        height: h,
        color: [0x00, 0x00, 0x00, 0xff],
    });
    let foreground = OVERLAY_LINES.iter().enumerate().map(|(i, line)| OverlayText {
        text: line.to_string(),
        anchor: line_anchor(i) + Vec2::splat(ofs),
        height: h,
        color: [0xff, 0xff, 0xff, 0xff],
    });
    shadow.chain(foreground).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::Key;
    use crate::model::{Camera, Transform};
    use glam::Quat;

    const WINDOW: UVec2 = UVec2::new(800, 600);

    fn scene() -> Scene {
        let mut scene = skeleton();
        let cam = scene.add_transform(Transform::new("Camera").at(Vec3::new(0.0, -10.0, 3.0)));
        scene.add_camera(Camera::new(cam));
        scene
    }

    fn skeleton() -> Scene {
        let mut scene = Scene::default();
        let hip = scene.add_transform(Transform::new("Hip"));
        let upper = scene.add_transform(Transform::new("UpperLeg").at(Vec3::Z).child_of(hip));
        let lower = scene.add_transform(Transform::new("LowerLeg").at(Vec3::Z * 2.0).child_of(upper));
        let gripper = scene.add_transform(Transform::new("Gripper").at(Vec3::Z * 2.0).child_of(lower));
        scene.add_transform(Transform::new("GripperHead").at(Vec3::Z * 0.5).child_of(gripper));
        scene.add_transform(Transform::new("Cube").at(Vec3::new(4.0, 4.0, 0.5)));
        scene
    }

    fn mode() -> PlayMode {
        PlayMode::new(scene(), PlayConfig::seeded(1)).unwrap()
    }

    fn press(mode: &mut PlayMode, key: Key) {
        assert!(mode.handle_event(&InputEvent::KeyDown(key), WINDOW));
    }

    fn release(mode: &mut PlayMode, key: Key) {
        assert!(mode.handle_event(&InputEvent::KeyUp(key), WINDOW));
    }

    #[test]
    fn test_missing_node_is_fatal() {
        let mut s = scene();
        let head = s.find("GripperHead").unwrap();
        s.transform_mut(head).name = "Elsewhere".to_string();
        match PlayMode::new(s, PlayConfig::seeded(1)) {
            Err(ModeError::MissingNode { role, name }) => {
                assert_eq!(role, "Gripper head");
                assert_eq!(name, "GripperHead");
            }
            other => panic!("unexpected: {:?}", other.err()),
        }
    }

    #[test]
    fn test_camera_count_must_be_one() {
        assert_eq!(
            PlayMode::new(skeleton(), PlayConfig::seeded(1)).err(),
            Some(ModeError::CameraCount(0))
        );
    }

    #[test]
    fn test_left_wins_over_right_on_hip() {
        let mut m = mode();
        press(&mut m, Key::ArrowLeft);
        press(&mut m, Key::ArrowRight);
        m.update(0.5);
        assert!((m.joints().hip.offset - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_up_and_down_cancel_on_active_joint() {
        let mut m = mode();
        press(&mut m, Key::ArrowUp);
        press(&mut m, Key::ArrowDown);
        m.update(0.5);
        assert_eq!(m.joints().upper_leg.offset, 0.0);

        release(&mut m, Key::ArrowDown);
        m.update(0.5);
        assert!((m.joints().upper_leg.offset - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_is_base_times_offset() {
        let mut s = scene();
        let upper = s.find("UpperLeg").unwrap();
        let base = Quat::from_rotation_y(0.4);
        s.transform_mut(upper).rotation = base;
        let mut m = PlayMode::new(s, PlayConfig::seeded(1)).unwrap();

        press(&mut m, Key::ArrowUp);
        m.update(45.0); // 2 deg/s * 45 s
        let expected = base * Quat::from_axis_angle(Vec3::NEG_X, 90f32.to_radians());
        assert!(m.scene().transform(upper).rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_action_release_advances_once() {
        let mut m = mode();
        press(&mut m, Key::Space);
        m.update(0.016);
        assert_eq!(m.active_joint(), Joint::UpperLeg);

        release(&mut m, Key::Space);
        assert!(m.input().buttons.get(ButtonId::Action).released);
        m.update(0.016);
        assert_eq!(m.active_joint(), Joint::LowerLeg);
        assert!(!m.input().buttons.get(ButtonId::Action).released);

        m.update(0.016);
        assert_eq!(m.active_joint(), Joint::LowerLeg);
    }

    #[test]
    fn test_downs_reset_every_update() {
        let mut m = mode();
        press(&mut m, Key::W);
        press(&mut m, Key::W);
        assert_eq!(m.input().buttons.get(ButtonId::Forward).downs, 2);
        m.update(0.016);
        assert_eq!(m.input().buttons.get(ButtonId::Forward).downs, 0);
        assert!(m.input().is_pressed(ButtonId::Forward));
    }

    #[test]
    fn test_reaching_the_cube_relocates_it() {
        let mut m = mode();
        let head = m.gripper_head_position();
        m.place_cube(head + Vec3::new(0.1, -0.1, 0.05));

        m.update(0.0);
        assert_eq!(m.goals_reached(), 1);
        let placed = m.cube_position();
        assert_eq!(placed.z, 0.5);
        for c in [placed.x, placed.y] {
            assert!((-6.0..-2.0).contains(&c) || (1.0..5.0).contains(&c));
        }
    }

    #[test]
    fn test_no_hit_leaves_cube_alone() {
        let mut m = mode();
        let before = m.cube_position();
        m.update(0.1);
        assert_eq!(m.cube_position(), before);
        assert_eq!(m.goals_reached(), 0);
    }

    #[test]
    fn test_look_only_while_captured() {
        let mut m = mode();
        let cam = m.camera().transform;
        let before = m.scene().transform(cam).rotation;
        let motion = InputEvent::MouseMotion { dx: 40.0, dy: 10.0 };

        assert!(!m.handle_event(&motion, WINDOW));
        assert_eq!(m.scene().transform(cam).rotation, before);

        assert!(m.handle_event(&InputEvent::MouseButtonDown(crate::controller::input::MouseButton::Left), WINDOW));
        assert!(m.pointer_captured());
        assert!(m.handle_event(&motion, WINDOW));
        assert_ne!(m.scene().transform(cam).rotation, before);

        press(&mut m, Key::Escape);
        assert!(!m.pointer_captured());
    }

    #[test]
    fn test_draw_syncs_aspect_and_overlay() {
        let mut m = mode();
        let frame = m.draw(UVec2::new(1000, 500));
        assert_eq!(m.camera().aspect, 2.0);
        assert_eq!(frame.items.len(), 0);
        assert_eq!(frame.overlay.len(), 4);
        assert_eq!(frame.overlay[0].color, [0, 0, 0, 0xff]);
        assert_eq!(frame.overlay[2].color, [0xff; 4]);
        assert_eq!(frame.overlay[0].text, frame.overlay[2].text);
        let shift = frame.overlay[2].anchor - frame.overlay[0].anchor;
        assert!(shift.abs_diff_eq(Vec2::splat(2.0 / 500.0), 1e-6));
        assert!((frame.overlay[1].anchor.x - (-2.0 + 0.009)).abs() < 1e-6);
    }

    #[test]
    fn test_placing_the_cube_keeps_bindings() {
        let mut m = mode();
        let nodes = m.scene().transforms().len();
        m.place_cube(Vec3::new(-3.0, 2.0, 0.5));
        m.update(1.0);

        assert_eq!(m.scene().transforms().len(), nodes);
        assert_eq!(m.scene().transform(m.cube_transform()).name, "Cube");
        assert_eq!(m.cube_position(), Vec3::new(-3.0, 2.0, 0.5));
    }
}
