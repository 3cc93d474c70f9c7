use std::fmt;

use crate::coords::Vec2;

/// Platform-neutral keyboard key.
///
/// Platforms map their scancodes/keycodes into these variants. Anything without
/// a variant becomes `Key::Unknown(platform_code)`, which has no slot in the
/// key table and is dropped by the reconciler.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Common control keys
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers as keys
    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform key not represented here.
    Unknown(u32),
}

/// Number of slots in the key-held table. Every `Key::code()` is below this.
pub const KEY_TABLE_SIZE: usize = 512;

macro_rules! key_codes {
    ($($key:ident = $code:literal),* $(,)?) => {
        impl Key {
            /// Stable platform-neutral index into the key table.
            ///
            /// Letters, digits and the basic control keys reuse their ASCII
            /// values; navigation, modifier and function keys live above 255.
            pub const fn code(self) -> Option<usize> {
                match self {
                    $(Key::$key => Some($code),)*
                    Key::Unknown(_) => None,
                }
            }

            /// Inverse of [`Key::code`].
            pub const fn from_code(code: usize) -> Option<Key> {
                match code {
                    $($code => Some(Key::$key),)*
                    _ => None,
                }
            }
        }
    };
}

key_codes! {
    Backspace = 8, Tab = 9, Enter = 13, Escape = 27, Space = 32, Delete = 127,

    Digit0 = 48, Digit1 = 49, Digit2 = 50, Digit3 = 51, Digit4 = 52,
    Digit5 = 53, Digit6 = 54, Digit7 = 55, Digit8 = 56, Digit9 = 57,

    A = 65, B = 66, C = 67, D = 68, E = 69, F = 70, G = 71, H = 72, I = 73,
    J = 74, K = 75, L = 76, M = 77, N = 78, O = 79, P = 80, Q = 81, R = 82,
    S = 83, T = 84, U = 85, V = 86, W = 87, X = 88, Y = 89, Z = 90,

    Insert = 256, Home = 257, End = 258, PageUp = 259, PageDown = 260,
    ArrowUp = 261, ArrowDown = 262, ArrowLeft = 263, ArrowRight = 264,

    Shift = 272, Control = 273, Alt = 274, Meta = 275,

    F1 = 290, F2 = 291, F3 = 292, F4 = 293, F5 = 294, F6 = 295,
    F7 = 296, F8 = 297, F9 = 298, F10 = 299, F11 = 300, F12 = 301,
}

/// Mouse button identifier.
///
/// Wheel "buttons" exist because some platforms (Marmalade's s3ePointer)
/// deliver wheel ticks as button events carrying a delta.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    WheelUp,
    WheelDown,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    /// The three buttons tracked by the frame snapshot, in slot order.
    pub const TRACKED: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

    /// Slot in the snapshot's `mouse_down` array, if the button is tracked.
    #[inline]
    pub const fn slot(self) -> Option<usize> {
        match self {
            MouseButton::Left => Some(0),
            MouseButton::Right => Some(1),
            MouseButton::Middle => Some(2),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_wheel(self) -> bool {
        matches!(self, MouseButton::WheelUp | MouseButton::WheelDown)
    }
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// Platform-agnostic input message.
///
/// Platform glue translates native events into these and hands them to
/// [`InputReconciler::apply`](super::InputReconciler::apply) and the pointer tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Button {
        button: MouseButton,
        pressed: bool,
        /// Only meaningful for wheel buttons.
        wheel_delta: f32,
    },

    Wheel(f32),

    Key {
        key: Key,
        pressed: bool,
    },

    ModifiersChanged(Modifiers),

    /// Raw codepoint as delivered by the platform; validated by the reconciler.
    Char(u32),

    PointerMoved(Vec2),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_fits_the_table_and_round_trips() {
        for code in 0..KEY_TABLE_SIZE {
            if let Some(key) = Key::from_code(code) {
                assert_eq!(key.code(), Some(code), "{key}");
            }
        }
    }

    #[test]
    fn letters_use_ascii_codes() {
        assert_eq!(Key::A.code(), Some(b'A' as usize));
        assert_eq!(Key::Z.code(), Some(b'Z' as usize));
        assert_eq!(Key::Digit7.code(), Some(b'7' as usize));
    }

    #[test]
    fn unknown_keys_have_no_slot() {
        assert_eq!(Key::Unknown(0x1234).code(), None);
    }

    #[test]
    fn only_three_buttons_have_slots() {
        assert_eq!(MouseButton::Middle.slot(), Some(2));
        assert_eq!(MouseButton::WheelUp.slot(), None);
        assert_eq!(MouseButton::Other(9).slot(), None);
    }
}
