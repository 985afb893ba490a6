//! The arm level: a mesh library and a scene authored in code.
//!
//! Loaded once by the shell and handed out by value, the play mode keeps
//! its own copy of the scene and the renderer borrows the meshes.

use glam::{Mat4, Quat, Vec3};

use super::camera::Camera;
use super::scene::{MeshId, Scene, Transform};
use crate::utils::{create_box_mesh, Mesh};

/// Named meshes referenced by [`MeshId`].
#[derive(Debug, Clone, Default)]
pub struct MeshLibrary {
    names: Vec<String>,
    meshes: Vec<Mesh>,
}

impl MeshLibrary {
    pub fn insert(&mut self, name: impl Into<String>, mesh: Mesh) -> MeshId {
        self.names.push(name.into());
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn lookup(&self, name: &str) -> Option<MeshId> {
        self.names.iter().position(|n| n == name).map(MeshId)
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

const STEEL: [f32; 4] = [0.62, 0.64, 0.68, 1.0];
const ORANGE: [f32; 4] = [0.95, 0.55, 0.12, 1.0];
const GOAL: [f32; 4] = [0.15, 0.75, 0.25, 1.0];
const FLOOR: [f32; 4] = [0.35, 0.35, 0.38, 1.0];

const PEDESTAL_HEIGHT: f32 = 0.5;
const UPPER_LEG_LENGTH: f32 = 4.0;
const LOWER_LEG_LENGTH: f32 = 4.0;
const GRIPPER_LENGTH: f32 = 1.0;

fn limb(length: f32, half_width: f32, color: [f32; 4]) -> Mesh {
    create_box_mesh(
        Vec3::new(-half_width, -half_width, 0.0),
        Vec3::new(half_width, half_width, length),
        color,
    )
}

/// Everything the arm level needs, built once per process.
#[derive(Debug, Clone)]
pub struct ArmAssets {
    pub meshes: MeshLibrary,
    pub scene: Scene,
}

impl ArmAssets {
    pub fn load() -> Self {
        let meshes = Self::build_meshes();
        let scene = Self::build_scene(&meshes);
        tracing::info!(
            meshes = meshes.len(),
            transforms = scene.transforms().len(),
            drawables = scene.drawables().len(),
            "arm assets loaded"
        );
        Self { meshes, scene }
    }

    fn build_meshes() -> MeshLibrary {
        let mut meshes = MeshLibrary::default();
        meshes.insert(
            "Floor",
            create_box_mesh(Vec3::new(-12.0, -12.0, -0.1), Vec3::new(12.0, 12.0, 0.0), FLOOR),
        );
        meshes.insert(
            "Hip",
            create_box_mesh(Vec3::new(-0.6, -0.6, 0.0), Vec3::new(0.6, 0.6, PEDESTAL_HEIGHT), STEEL),
        );
        meshes.insert("UpperLeg", limb(UPPER_LEG_LENGTH, 0.2, ORANGE));
        meshes.insert("LowerLeg", limb(LOWER_LEG_LENGTH, 0.16, ORANGE));
        meshes.insert("Gripper", limb(GRIPPER_LENGTH, 0.12, STEEL));
        meshes.insert(
            "GripperHead",
            create_box_mesh(Vec3::splat(-0.08), Vec3::splat(0.08), STEEL),
        );
        meshes.insert("Cube", create_box_mesh(Vec3::splat(-0.2), Vec3::splat(0.2), GOAL));
        meshes
    }

    fn build_scene(meshes: &MeshLibrary) -> Scene {
        let mut scene = Scene::default();

        let floor = scene.add_transform(Transform::new("Floor"));
        let hip = scene.add_transform(Transform::new("Hip"));
        let upper_leg = scene.add_transform(
            Transform::new("UpperLeg")
                .at(Vec3::new(0.0, 0.0, PEDESTAL_HEIGHT))
                .rotated(Quat::from_rotation_x(0.3))
                .child_of(hip),
        );
        let lower_leg = scene.add_transform(
            Transform::new("LowerLeg")
                .at(Vec3::new(0.0, 0.0, UPPER_LEG_LENGTH))
                .rotated(Quat::from_rotation_x(0.9))
                .child_of(upper_leg),
        );
        let gripper = scene.add_transform(
            Transform::new("Gripper")
                .at(Vec3::new(0.0, 0.0, LOWER_LEG_LENGTH))
                .rotated(Quat::from_rotation_x(0.6))
                .child_of(lower_leg),
        );
        let gripper_head = scene.add_transform(
            Transform::new("GripperHead")
                .at(Vec3::new(0.0, 0.0, GRIPPER_LENGTH))
                .child_of(gripper),
        );
        let cube = scene.add_transform(Transform::new("Cube").at(Vec3::new(2.0, -4.0, 0.5)));

        for id in [floor, hip, upper_leg, lower_leg, gripper, gripper_head, cube] {
            let name = scene.transform(id).name.clone();
            match meshes.lookup(&name) {
                Some(mesh) => scene.add_drawable(id, mesh),
                None => tracing::warn!(%name, "no mesh for transform"),
            }
        }

        let eye = Vec3::new(0.0, 16.0, 11.0);
        let target = Vec3::new(0.0, 0.0, 2.0);
        // the camera looks down its local -Z, so its rotation is the inverse view
        let rotation = Quat::from_mat4(&Mat4::look_at_rh(eye, target, Vec3::Z).inverse());
        let camera = scene.add_transform(Transform::new("Camera").at(eye).rotated(rotation));
        scene.add_camera(Camera::new(camera));

        scene
    }
}
