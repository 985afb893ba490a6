use anyhow::Context;
use winit::{
    event::*,
    event_loop::EventLoop,
    window::{CursorGrabMode, Window},
};
use std::sync::Arc;
use std::time::Instant;

use armreach::{
    config::PlayConfig,
    controller::{input::native as native_input, PlayMode},
    frame_loop::FrameLoopContext,
    logging,
    model::ArmAssets,
    view::{GpuContext, RenderState},
};

/// Fixed placement seed for reproducible sessions.
const SEED_VAR: &str = "ARMREACH_SEED";

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    frame_loop: FrameLoopContext,
    egui_state: egui_winit::State,
    started: Instant,
    cursor_grabbed: bool,
}

impl App {
    async fn new(window: Arc<Window>, config: PlayConfig) -> anyhow::Result<Self> {
        let gpu = GpuContext::new_native(window.clone())
            .await
            .context("GPU initialisation failed")?;

        let assets = ArmAssets::load();
        let mode = PlayMode::new(assets.scene.clone(), config).context("cannot enter play mode")?;
        let render_state = RenderState::new(gpu.device.as_ref(), gpu.format, gpu.config.width, gpu.config.height);
        let frame_loop = FrameLoopContext::new(mode, assets.meshes, render_state);

        let egui_state = egui_winit::State::new(
            frame_loop.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        Ok(Self {
            window,
            gpu,
            frame_loop,
            egui_state,
            started: Instant::now(),
            cursor_grabbed: false,
        })
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        let Some(input) = native_input::window_event_to_input(event) else {
            return false;
        };
        let handled = self.frame_loop.handle_event(&input);
        self.sync_cursor();
        handled
    }

    fn mouse_motion(&mut self, delta: (f64, f64)) {
        self.frame_loop.handle_event(&native_input::mouse_motion_to_input(delta));
    }

    /// Mirror the mode's look state onto the OS cursor.
    fn sync_cursor(&mut self) {
        let captured = self.frame_loop.mode.pointer_captured();
        if captured == self.cursor_grabbed {
            return;
        }
        if captured {
            let grab = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grab {
                tracing::warn!(error = %e, "cursor grab unavailable");
            }
            self.window.set_cursor_visible(false);
        } else {
            let _ = self.window.set_cursor_grab(CursorGrabMode::None);
            self.window.set_cursor_visible(true);
        }
        self.cursor_grabbed = captured;
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gpu.resize(new_size.width, new_size.height);
            self.frame_loop
                .render_state
                .resize(self.gpu.device.as_ref(), new_size.width, new_size.height);
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = self.started.elapsed().as_secs_f64();
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let ppp = self.window.scale_factor() as f32;
        self.frame_loop.frame(
            self.gpu.device.as_ref(),
            self.gpu.queue.as_ref(),
            &self.gpu.surface,
            now,
            raw_input,
            ppp,
        )
    }
}

fn seed_from_env() -> Option<u64> {
    let raw = std::env::var(SEED_VAR).ok()?;
    match raw.trim().parse() {
        Ok(seed) => Some(seed),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "ignoring {SEED_VAR}");
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let config = match seed_from_env() {
        Some(seed) => PlayConfig::seeded(seed),
        None => PlayConfig::default(),
    };

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window_attributes = Window::default_attributes()
        .with_title("Arm Reach")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = event_loop
        .create_window(window_attributes)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut app = pollster::block_on(App::new(window, config))?;

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => match app.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                app.resize(app.window.inner_size())
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                tracing::error!("surface out of memory");
                                elwt.exit()
                            }
                            Err(e) => tracing::warn!(error = ?e, "frame skipped"),
                        },
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent { event: DeviceEvent::MouseMotion { delta }, .. } => {
                app.mouse_motion(delta);
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
