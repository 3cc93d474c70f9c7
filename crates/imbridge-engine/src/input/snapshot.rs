use crate::coords::{Vec2, Viewport};

use super::keys::KeyTable;
use super::types::{Key, Modifiers, MouseButton};

/// Reconciled input handed to the GUI once per frame.
///
/// Built by [`InputReconciler::begin_frame`](super::InputReconciler::begin_frame);
/// never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Pointer position in display pixels. `None` when there is no pointer
    /// (no mouse, pointer outside the window, window without mouse focus).
    pub pointer: Option<Vec2>,

    /// Left, right, middle: held this frame.
    ///
    /// True if a press event arrived since the previous frame or the device
    /// poll reports the button down, so sub-frame clicks are never lost.
    pub mouse_down: [bool; 3],

    /// Signed wheel delta accumulated since the previous frame.
    pub wheel: f32,

    pub keys: KeyTable,

    pub modifiers: Modifiers,

    /// Characters typed since the previous frame, in arrival order.
    pub chars: Vec<char>,

    pub display_size: Viewport,

    pub framebuffer_scale: Vec2,

    /// Seconds since the previous frame.
    pub delta_time: f32,
}

impl FrameInput {
    /// Pointer position with the `(-1, -1)` "no pointer" sentinel.
    #[inline]
    pub fn pointer_or_sentinel(&self) -> Vec2 {
        self.pointer.unwrap_or(Vec2::NO_POINTER)
    }

    #[inline]
    pub fn button_down(&self, button: MouseButton) -> bool {
        button.slot().is_some_and(|i| self.mouse_down[i])
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys.is_down(key)
    }
}
