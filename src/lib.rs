pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
pub mod ui;
pub mod frame_loop;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

// Browser entry point
#[cfg(target_arch = "wasm32")]
mod web;

pub use config::PlayConfig;
pub use controller::PlayMode;
pub use error::ModeError;
pub use model::ArmAssets;
