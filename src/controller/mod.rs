// CONTROLLER: Input, arm kinematics, goal logic
pub mod input;
pub mod joints;
pub mod goal;
pub mod camera_controller;
pub mod play_mode;

pub use input::{Button, ButtonId, InputEvent, InputState, Key, KeyBindings, MouseButton};
pub use joints::{ArmJoints, Joint, JointPose};
pub use camera_controller::CameraController;
pub use play_mode::PlayMode;
