use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, Ime, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::Window;

use crate::coords::{Vec2, Viewport};
use crate::input::{
    FrameParams, InputEvent, InputReconciler, Key, Modifiers, MouseButton, PointerPoll,
    PointerTracker,
};

/// Logical pixels per wheel line when the platform reports pixel deltas.
pub const PIXELS_PER_WHEEL_LINE: f32 = 20.0;

/// winit side of the input path.
///
/// winit is callback-only, so the "poll" half of reconciliation is a
/// [`PointerTracker`] fed from the same events.
#[derive(Debug, Default)]
pub struct WinitPlatform {
    tracker: PointerTracker,
    scratch: Vec<InputEvent>,
}

impl WinitPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates `event`, updates the pointer tracker and forwards to the reconciler sinks.
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &WindowEvent,
        reconciler: &InputReconciler,
    ) {
        self.scratch.clear();
        translate_window_event(window, event, &mut self.scratch);

        for ev in &self.scratch {
            self.tracker.observe(ev);
            reconciler.apply(ev);
        }
    }

    /// Display size (logical) and framebuffer scale for this window.
    pub fn frame_params(window: &Window, delta_time: f32) -> FrameParams {
        let scale = window.scale_factor();
        let logical: winit::dpi::LogicalSize<f64> = window.inner_size().to_logical(scale);
        FrameParams {
            display_size: Viewport::new(logical.width as f32, logical.height as f32),
            framebuffer_scale: Vec2::new(scale as f32, scale as f32),
            delta_time,
        }
    }
}

impl PointerPoll for WinitPlatform {
    fn pointer_position(&self) -> Option<Vec2> {
        self.tracker.pointer_position()
    }

    fn button_down(&self, button: MouseButton) -> bool {
        self.tracker.button_down(button)
    }

    fn has_mouse_focus(&self) -> bool {
        self.tracker.has_mouse_focus()
    }
}

/// Translates a winit `WindowEvent` into zero or more engine `InputEvent`s.
///
/// A key press can carry committed text, so one native event may yield a key
/// event followed by character events.
pub fn translate_window_event(window: &Window, event: &WindowEvent, out: &mut Vec<InputEvent>) {
    match event {
        WindowEvent::ModifiersChanged(m) => {
            out.push(InputEvent::ModifiersChanged(map_modifiers(m.state())));
        }

        WindowEvent::Focused(f) => out.push(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => out.push(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            out.push(InputEvent::PointerMoved(to_logical(window, *position)));
        }

        WindowEvent::MouseInput { state, button, .. } => {
            out.push(InputEvent::Button {
                button: map_mouse_button(*button),
                pressed: *state == ElementState::Pressed,
                wheel_delta: 0.0,
            });
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let lines = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(p) => to_logical(window, *p).y / PIXELS_PER_WHEEL_LINE,
            };
            out.push(InputEvent::Wheel(lines));
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let pressed = event.state == ElementState::Pressed;
            out.push(InputEvent::Key { key: map_key(event.physical_key), pressed });

            if pressed {
                if let Some(text) = event.text.as_ref() {
                    out.extend(text.chars().filter(|c| !c.is_control()).map(|c| InputEvent::Char(c as u32)));
                }
            }
        }

        WindowEvent::Ime(Ime::Commit(text)) => {
            out.extend(text.chars().map(|c| InputEvent::Char(c as u32)));
        }

        _ => {}
    }
}

fn to_logical(window: &Window, pos: PhysicalPosition<f64>) -> Vec2 {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    Vec2::new(logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        return Key::Unknown(0);
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,

        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        other => Key::Unknown(other as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_and_digit_codes_map_to_neutral_keys() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyC)), Key::C);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Digit3)), Key::Digit3);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftRight)), Key::Shift);
    }

    #[test]
    fn unmapped_code_becomes_unknown() {
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::NumLock)), Key::Unknown(_)));
    }

    #[test]
    fn modifiers_drop_super() {
        let m = map_modifiers(ModifiersState::SHIFT | ModifiersState::SUPER);
        assert_eq!(m, Modifiers { shift: true, ctrl: false, alt: false });
    }
}
