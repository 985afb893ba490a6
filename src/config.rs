use glam::Vec3;

use crate::controller::input::KeyBindings;

/// Names of the transforms the play mode binds to.
#[derive(Debug, Clone)]
pub struct NodeNames {
    pub hip: String,
    pub upper_leg: String,
    pub lower_leg: String,
    pub gripper: String,
    pub gripper_head: String,
    pub cube: String,
}

impl Default for NodeNames {
    fn default() -> Self {
        Self {
            hip: "Hip".to_string(),
            upper_leg: "UpperLeg".to_string(),
            lower_leg: "LowerLeg".to_string(),
            gripper: "Gripper".to_string(),
            gripper_head: "GripperHead".to_string(),
            cube: "Cube".to_string(),
        }
    }
}

/// Tunables for a play session. Read once when the mode is entered.
#[derive(Debug, Clone)]
pub struct PlayConfig {
    /// Joint manipulation speed in degrees per second.
    pub joint_speed: f32,
    /// Camera translation speed in world units per second.
    pub player_speed: f32,
    /// Half the edge length of the box around the cube that counts as a hit.
    pub goal_half_extent: f32,
    /// Height the cube is placed at after every hit.
    pub cube_height: f32,
    /// Axis mouse-look yaws around.
    pub world_up: Vec3,
    /// Seed for cube placement. `None` draws one from the system.
    pub rng_seed: Option<u64>,
    pub node_names: NodeNames,
    pub bindings: KeyBindings,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            joint_speed: 2.0,
            player_speed: 30.0,
            goal_half_extent: 0.15,
            cube_height: 0.5,
            world_up: Vec3::Z,
            rng_seed: None,
            node_names: NodeNames::default(),
            bindings: KeyBindings::default(),
        }
    }
}

impl PlayConfig {
    /// Same defaults with a fixed placement seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
            ..Self::default()
        }
    }
}
