// VIEW: Frame description and wgpu rendering
pub mod frame;
pub mod render;
pub mod gpu_init;

pub use frame::{DrawItem, Frame, Light, LightKind, OverlayText};
pub use render::{OverlayOutput, RenderState};
pub use gpu_init::{GpuContext, GpuInitError};
