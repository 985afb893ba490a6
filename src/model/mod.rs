// MODEL: Scene graph and the arm level
pub mod camera;
pub mod scene;
pub mod arm;

pub use camera::Camera;
pub use scene::{Drawable, MeshId, Scene, Transform, TransformId};
pub use arm::{ArmAssets, MeshLibrary};
