use glam::UVec2;
use wgpu::{Device, Queue, Surface, SurfaceError};

use crate::controller::{InputEvent, PlayMode};
use crate::model::MeshLibrary;
use crate::ui;
use crate::view::RenderState;

/// Longest step fed to the mode; stalls beyond this are dropped.
pub const MAX_ELAPSED: f32 = 0.1;

/// Turns timestamps into clamped per-frame elapsed seconds.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// `now` in seconds; the first call yields zero.
    pub fn tick(&mut self, now: f64) -> f32 {
        let elapsed = match self.last {
            Some(last) => (now - last) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        elapsed.clamp(0.0, MAX_ELAPSED)
    }
}

/// Per-frame driver shared by the native and browser shells.
///
/// Events go straight to the mode as they arrive; once per frame the mode
/// is updated, drawn, and the resulting frame rendered.
pub struct FrameLoopContext {
    pub mode: PlayMode,
    pub meshes: MeshLibrary,
    pub render_state: RenderState,
    pub egui_ctx: egui::Context,
    pub clock: FrameClock,
}

impl FrameLoopContext {
    pub fn new(mode: PlayMode, meshes: MeshLibrary, render_state: RenderState) -> Self {
        Self {
            mode,
            meshes,
            render_state,
            egui_ctx: egui::Context::default(),
            clock: FrameClock::new(),
        }
    }

    pub fn window_size(&self) -> UVec2 {
        UVec2::new(self.render_state.width, self.render_state.height)
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        let size = self.window_size();
        self.mode.handle_event(event, size)
    }

    /// Update once, draw once, render.
    pub fn frame(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface: &Surface,
        now: f64,
        raw_input: egui::RawInput,
        pixels_per_point: f32,
    ) -> Result<(), SurfaceError> {
        let elapsed = self.clock.tick(now);
        self.mode.update(elapsed);

        let frame = self.mode.draw(self.window_size());
        let overlay = ui::build_overlay(&self.egui_ctx, raw_input, &frame, pixels_per_point);
        self.render_state
            .draw_frame(device, queue, surface, &frame, &self.meshes, Some(overlay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(12.5), 0.0);
        assert!((clock.tick(12.52) - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_stalls_and_clock_skew_are_clamped() {
        let mut clock = FrameClock::new();
        clock.tick(1.0);
        assert_eq!(clock.tick(5.0), MAX_ELAPSED);
        assert_eq!(clock.tick(4.0), 0.0);
    }
}
