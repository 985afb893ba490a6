use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{closure::Closure, convert::FromWasmAbi, prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{Document, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use crate::controller::input::{wasm as web_input, InputEvent, Key};
use crate::frame_loop::FrameLoopContext;
use crate::view::{GpuContext, RenderState};
use crate::{logging, ArmAssets, PlayConfig, PlayMode};

const CANVAS_SIZE: (u32, u32) = (960, 600);

#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    logging::init();
    let (window, document, canvas) = create_canvas(CANVAS_SIZE.0, CANVAS_SIZE.1)?;
    run(window, document, canvas).await
}

async fn run(window: Window, document: Document, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let mut gpu = GpuContext::new(&canvas, CANVAS_SIZE.0, CANVAS_SIZE.1)
        .await
        .map_err(|e| js_error(format!("GPU init failed: {e}")))?;

    let assets = ArmAssets::load();
    let mode = PlayMode::new(assets.scene.clone(), PlayConfig::default()).map_err(|e| {
        tracing::error!(error = %e, "cannot enter play mode");
        js_error(e.to_string())
    })?;

    let render_state = RenderState::new(gpu.device.as_ref(), gpu.format, gpu.config.width, gpu.config.height);
    let ctx = Rc::new(RefCell::new(FrameLoopContext::new(mode, assets.meshes, render_state)));

    attach_input(&document, &canvas, ctx.clone())?;

    let performance = window.performance().ok_or_else(|| js_error("no performance on window"))?;
    let dpr_source = window.clone();
    AnimationLoop::new(window, move || {
        let now = performance.now() / 1000.0;
        let dpr = dpr_source.device_pixel_ratio() as f32;
        let mut ctx = ctx.borrow_mut();
        let result = ctx.frame(
            gpu.device.as_ref(),
            gpu.queue.as_ref(),
            &gpu.surface,
            now,
            egui::RawInput::default(),
            dpr,
        );
        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = ctx.window_size();
                gpu.resize(size.x, size.y);
            }
            Err(e) => tracing::warn!(error = ?e, "frame skipped"),
        }
    })
    .start();

    Ok(())
}

/// Register a listener that lives as long as the page.
fn listen<E, F>(target: &EventTarget, name: &str, handler: F) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Route DOM events into the mode and mirror its look mode onto pointer lock.
fn attach_input(
    document: &Document,
    canvas: &HtmlCanvasElement,
    ctx: Rc<RefCell<FrameLoopContext>>,
) -> Result<(), JsValue> {
    let dispatch = {
        let document = document.clone();
        let canvas = canvas.clone();
        Rc::new(move |event: InputEvent| -> bool {
            let mut ctx = ctx.borrow_mut();
            let handled = ctx.handle_event(&event);
            sync_pointer_lock(&document, &canvas, ctx.mode.pointer_captured());
            handled
        })
    };

    for (name, is_down) in [("keydown", true), ("keyup", false)] {
        let dispatch = dispatch.clone();
        listen(document, name, move |e: KeyboardEvent| {
            if dispatch(web_input::keyboard_event_to_input(&e, is_down)) {
                e.prevent_default();
            }
        })?;
    }

    {
        let dispatch = dispatch.clone();
        listen(canvas, "mousedown", move |e: MouseEvent| {
            if dispatch(web_input::mouse_click_to_input(&e, true)) {
                e.prevent_default();
            }
        })?;
    }

    {
        let dispatch = dispatch.clone();
        listen(document, "mousemove", move |e: MouseEvent| {
            dispatch(web_input::mouse_move_to_input(&e));
        })?;
    }

    // the browser eats Escape while locked and drops the lock on its own
    let lock_owner = document.clone();
    listen(document, "pointerlockchange", move |_: web_sys::Event| {
        if lock_owner.pointer_lock_element().is_none() {
            dispatch(InputEvent::KeyDown(Key::Escape));
        }
    })
}

fn sync_pointer_lock(document: &Document, canvas: &HtmlCanvasElement, captured: bool) {
    let locked = document.pointer_lock_element().is_some();
    if captured && !locked {
        canvas.request_pointer_lock();
    } else if !captured && locked {
        document.exit_pointer_lock();
    }
}

fn create_canvas(width: u32, height: u32) -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
    let document = window.document().ok_or_else(|| js_error("no document"))?;
    let body = document.body().ok_or_else(|| js_error("no body"))?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| js_error("element is not a canvas"))?;
    canvas.set_width(width);
    canvas.set_height(height);
    body.append_child(&canvas)?;
    Ok((window, document, canvas))
}

fn js_error(msg: impl Into<String>) -> JsValue {
    JsValue::from_str(&msg.into())
}

/// requestAnimationFrame loop that reschedules itself forever.
struct AnimationLoop {
    tick: Box<dyn FnMut()>,
    window: Window,
}

impl AnimationLoop {
    fn new(window: Window, tick: impl FnMut() + 'static) -> Self {
        Self { tick: Box::new(tick), window }
    }

    fn start(self) {
        let Self { mut tick, window } = self;
        let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let reschedule = slot.clone();
        let frame_window = window.clone();

        *slot.borrow_mut() = Some(Closure::new(move || {
            tick();
            if let Some(cb) = reschedule.borrow().as_ref() {
                if let Err(e) = frame_window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    tracing::error!(error = ?e, "requestAnimationFrame failed");
                }
            }
        }));

        if let Some(cb) = slot.borrow().as_ref() {
            if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                tracing::error!(error = ?e, "requestAnimationFrame failed to start");
            }
        }
        // the closure holds the only path back to itself
        std::mem::forget(slot);
    }
}
