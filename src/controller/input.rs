/// Platform-agnostic input handling system

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    // Keyboard events
    KeyDown(Key),
    KeyUp(Key),

    // Mouse events
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    /// Relative motion in pixels, y grows downwards.
    MouseMotion { dx: f32, dy: f32 },
    MouseWheel { delta_y: f32 },
}

/// Keys the play mode knows about; everything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_web_key(key: &str) -> Self {
        match key {
            "w" | "W" => Key::W,
            "a" | "A" => Key::A,
            "s" | "S" => Key::S,
            "d" | "D" => Key::D,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn from_web_button(button: i16) -> Self {
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::Left,
        }
    }
}

/// Logical buttons, independent of which key drives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Forward,
    Back,
    Left,
    Right,
    LookUp,
    LookDown,
    LookLeft,
    LookRight,
    Action,
}

impl ButtonId {
    pub const ALL: [ButtonId; 9] = [
        ButtonId::Forward,
        ButtonId::Back,
        ButtonId::Left,
        ButtonId::Right,
        ButtonId::LookUp,
        ButtonId::LookDown,
        ButtonId::LookLeft,
        ButtonId::LookRight,
        ButtonId::Action,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Per-button state. `downs` and `released` only live for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Button {
    /// Key-down events since the last update.
    pub downs: u8,
    pub pressed: bool,
    /// Set on key-up, cleared by whoever consumes it.
    pub released: bool,
}

impl Button {
    pub fn press(&mut self) {
        self.downs = self.downs.saturating_add(1);
        self.pressed = true;
    }

    pub fn release(&mut self, track_edge: bool) {
        self.pressed = false;
        if track_edge {
            self.released = true;
        }
    }

    /// Read and clear the release edge.
    pub fn take_released(&mut self) -> bool {
        std::mem::take(&mut self.released)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Buttons {
    buttons: [Button; 9],
}

impl Buttons {
    pub fn get(&self, id: ButtonId) -> &Button {
        &self.buttons[id.index()]
    }

    pub fn get_mut(&mut self, id: ButtonId) -> &mut Button {
        &mut self.buttons[id.index()]
    }

    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.get(id).pressed
    }

    pub fn reset_downs(&mut self) {
        for button in &mut self.buttons {
            button.downs = 0;
        }
    }
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: Key,
    pub back: Key,
    pub left: Key,
    pub right: Key,
    pub look_up: Key,
    pub look_down: Key,
    pub look_left: Key,
    pub look_right: Key,
    pub action: Key,
    pub escape: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: Key::W,
            back: Key::S,
            left: Key::A,
            right: Key::D,
            look_up: Key::ArrowUp,
            look_down: Key::ArrowDown,
            look_left: Key::ArrowLeft,
            look_right: Key::ArrowRight,
            action: Key::Space,
            escape: Key::Escape,
        }
    }
}

impl KeyBindings {
    pub fn button_for(&self, key: Key) -> Option<ButtonId> {
        if key == Key::Other {
            return None;
        }
        ButtonId::ALL.into_iter().find(|id| self.key_for(*id) == key)
    }

    pub fn key_for(&self, id: ButtonId) -> Key {
        match id {
            ButtonId::Forward => self.forward,
            ButtonId::Back => self.back,
            ButtonId::Left => self.left,
            ButtonId::Right => self.right,
            ButtonId::LookUp => self.look_up,
            ButtonId::LookDown => self.look_down,
            ButtonId::LookLeft => self.look_left,
            ButtonId::LookRight => self.look_right,
            ButtonId::Action => self.action,
        }
    }
}

/// What the caller still has to do after [`InputState::process_event`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputResponse {
    Ignored,
    Handled,
    /// Mouse moved while the pointer is captured; rotate the view.
    Look { dx: f32, dy: f32 },
}

impl InputResponse {
    pub fn handled(self) -> bool {
        !matches!(self, InputResponse::Ignored)
    }
}

/// Button accumulators plus pointer-capture ("look mode") state.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub buttons: Buttons,
    pub pointer_captured: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent, bindings: &KeyBindings) -> InputResponse {
        match event {
            InputEvent::KeyDown(key) if *key == bindings.escape => {
                self.pointer_captured = false;
                InputResponse::Handled
            }
            InputEvent::KeyDown(key) => match bindings.button_for(*key) {
                Some(id) => {
                    self.buttons.get_mut(id).press();
                    InputResponse::Handled
                }
                None => InputResponse::Ignored,
            },
            InputEvent::KeyUp(key) => match bindings.button_for(*key) {
                Some(id) => {
                    self.buttons.get_mut(id).release(id == ButtonId::Action);
                    InputResponse::Handled
                }
                None => InputResponse::Ignored,
            },
            InputEvent::MouseButtonDown(_) if !self.pointer_captured => {
                self.pointer_captured = true;
                InputResponse::Handled
            }
            InputEvent::MouseMotion { dx, dy } if self.pointer_captured => {
                InputResponse::Look { dx: *dx, dy: *dy }
            }
            _ => InputResponse::Ignored,
        }
    }

    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.buttons.is_pressed(id)
    }

    pub fn take_released(&mut self, id: ButtonId) -> bool {
        self.buttons.get_mut(id).take_released()
    }

    /// Drop the per-frame press counters.
    pub fn end_frame(&mut self) {
        self.buttons.reset_downs();
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod native {
    use super::*;
    use winit::event::{ElementState, MouseButton as WinitButton, WindowEvent};
    use winit::keyboard::{KeyCode, PhysicalKey};

    pub fn key_from_code(code: KeyCode) -> Key {
        match code {
            KeyCode::KeyW => Key::W,
            KeyCode::KeyA => Key::A,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyD => Key::D,
            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,
            KeyCode::Space => Key::Space,
            KeyCode::Escape => Key::Escape,
            _ => Key::Other,
        }
    }

    /// Keyboard and mouse-button window events; motion comes from device events.
    pub fn window_event_to_input(event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let key = match event.physical_key {
                    PhysicalKey::Code(code) => key_from_code(code),
                    PhysicalKey::Unidentified(_) => Key::Other,
                };
                Some(match event.state {
                    ElementState::Pressed => InputEvent::KeyDown(key),
                    ElementState::Released => InputEvent::KeyUp(key),
                })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    WinitButton::Right => MouseButton::Right,
                    WinitButton::Middle => MouseButton::Middle,
                    _ => MouseButton::Left,
                };
                Some(match state {
                    ElementState::Pressed => InputEvent::MouseButtonDown(button),
                    ElementState::Released => InputEvent::MouseButtonUp(button),
                })
            }
            _ => None,
        }
    }

    pub fn mouse_motion_to_input(delta: (f64, f64)) -> InputEvent {
        InputEvent::MouseMotion { dx: delta.0 as f32, dy: delta.1 as f32 }
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    pub fn keyboard_event_to_input(e: &KeyboardEvent, is_down: bool) -> InputEvent {
        let key = Key::from_web_key(&e.key());
        if is_down {
            InputEvent::KeyDown(key)
        } else {
            InputEvent::KeyUp(key)
        }
    }

    pub fn mouse_move_to_input(e: &MouseEvent) -> InputEvent {
        InputEvent::MouseMotion {
            dx: e.movement_x() as f32,
            dy: e.movement_y() as f32,
        }
    }

    pub fn mouse_click_to_input(e: &MouseEvent, is_down: bool) -> InputEvent {
        let button = MouseButton::from_web_button(e.button());
        if is_down {
            InputEvent::MouseButtonDown(button)
        } else {
            InputEvent::MouseButtonUp(button)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_counts_and_holds() {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        assert_eq!(input.process_event(&InputEvent::KeyDown(Key::W), &bindings), InputResponse::Handled);
        input.process_event(&InputEvent::KeyDown(Key::W), &bindings);

        let forward = input.buttons.get(ButtonId::Forward);
        assert_eq!(forward.downs, 2);
        assert!(forward.pressed);

        input.end_frame();
        assert_eq!(input.buttons.get(ButtonId::Forward).downs, 0);
        assert!(input.is_pressed(ButtonId::Forward));
    }

    #[test]
    fn test_only_action_tracks_release_edge() {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        for key in [Key::ArrowUp, Key::Space] {
            input.process_event(&InputEvent::KeyDown(key), &bindings);
            input.process_event(&InputEvent::KeyUp(key), &bindings);
        }
        assert!(!input.is_pressed(ButtonId::Action));
        assert!(!input.buttons.get(ButtonId::LookUp).released);
        assert!(input.take_released(ButtonId::Action));
        assert!(!input.take_released(ButtonId::Action));
    }

    #[test]
    fn test_escape_releases_pointer() {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        input.pointer_captured = true;
        assert!(input.process_event(&InputEvent::KeyDown(Key::Escape), &bindings).handled());
        assert!(!input.pointer_captured);
        // handled even when nothing was captured
        assert!(input.process_event(&InputEvent::KeyDown(Key::Escape), &bindings).handled());
    }

    #[test]
    fn test_click_captures_then_motion_looks() {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        let motion = InputEvent::MouseMotion { dx: 3.0, dy: -1.0 };

        assert_eq!(input.process_event(&motion, &bindings), InputResponse::Ignored);
        assert!(input
            .process_event(&InputEvent::MouseButtonDown(MouseButton::Left), &bindings)
            .handled());
        assert!(input.pointer_captured);
        // a second click is not consumed once captured
        assert_eq!(
            input.process_event(&InputEvent::MouseButtonDown(MouseButton::Left), &bindings),
            InputResponse::Ignored
        );
        assert_eq!(
            input.process_event(&motion, &bindings),
            InputResponse::Look { dx: 3.0, dy: -1.0 }
        );
    }

    #[test]
    fn test_unbound_events_change_nothing() {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        for event in [
            InputEvent::KeyDown(Key::Other),
            InputEvent::KeyUp(Key::Other),
            InputEvent::MouseButtonUp(MouseButton::Left),
            InputEvent::MouseWheel { delta_y: 1.0 },
        ] {
            assert_eq!(input.process_event(&event, &bindings), InputResponse::Ignored);
        }
        for id in ButtonId::ALL {
            assert_eq!(*input.buttons.get(id), Button::default());
        }
        assert!(!input.pointer_captured);
    }

    #[test]
    fn test_web_key_names() {
        assert_eq!(Key::from_web_key("A"), Key::A);
        assert_eq!(Key::from_web_key("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_web_key(" "), Key::Space);
        assert_eq!(Key::from_web_key("Shift"), Key::Other);
    }

    #[test]
    fn test_bindings_round_trip_every_button() {
        let bindings = KeyBindings::default();
        for id in ButtonId::ALL {
            assert_eq!(bindings.button_for(bindings.key_for(id)), Some(id));
        }
        assert_eq!(bindings.button_for(Key::Escape), None);
    }
}
