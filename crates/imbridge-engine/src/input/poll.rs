use crate::coords::Vec2;

use super::types::{InputEvent, MouseButton};

/// Continuous device state sampled once per frame.
///
/// Platforms with a synchronous query (SDL `GetMouseState`, Marmalade
/// `s3ePointerGetState`) implement this directly; event-only platforms use
/// [`PointerTracker`].
pub trait PointerPoll {
    /// Current pointer position, `None` when there is no usable pointer.
    fn pointer_position(&self) -> Option<Vec2>;

    fn button_down(&self, button: MouseButton) -> bool;

    /// Whether the window currently has mouse focus.
    fn has_mouse_focus(&self) -> bool {
        true
    }
}

/// Pointer state reconstructed from platform events.
#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    position: Option<Vec2>,
    buttons: [bool; 3],
    inside: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a translated platform event into the tracked state.
    pub fn observe(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::PointerMoved(p) => {
                self.position = Some(*p);
                self.inside = true;
            }
            InputEvent::PointerLeft => {
                self.inside = false;
            }
            InputEvent::Button { button, pressed, .. } => {
                if let Some(i) = button.slot() {
                    self.buttons[i] = *pressed;
                }
            }
            InputEvent::Focused(false) => {
                // Releases may never arrive once focus is gone.
                self.buttons = [false; 3];
            }
            _ => {}
        }
    }
}

impl PointerPoll for PointerTracker {
    fn pointer_position(&self) -> Option<Vec2> {
        self.position.filter(|_| self.inside)
    }

    fn button_down(&self, button: MouseButton) -> bool {
        button.slot().is_some_and(|i| self.buttons[i])
    }

    fn has_mouse_focus(&self) -> bool {
        self.inside
    }
}

/// Fixed poll result, for platforms that push everything through events and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticPoll {
    pub position: Option<Vec2>,
    pub buttons: [bool; 3],
}

impl PointerPoll for StaticPoll {
    fn pointer_position(&self) -> Option<Vec2> {
        self.position
    }

    fn button_down(&self, button: MouseButton) -> bool {
        button.slot().is_some_and(|i| self.buttons[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_follows_pointer_and_buttons() {
        let mut t = PointerTracker::new();
        t.observe(&InputEvent::PointerMoved(Vec2::new(3.0, 4.0)));
        t.observe(&InputEvent::Button { button: MouseButton::Right, pressed: true, wheel_delta: 0.0 });

        assert_eq!(t.pointer_position(), Some(Vec2::new(3.0, 4.0)));
        assert!(t.button_down(MouseButton::Right));
        assert!(!t.button_down(MouseButton::Left));
    }

    #[test]
    fn pointer_hidden_after_leaving_window() {
        let mut t = PointerTracker::new();
        t.observe(&InputEvent::PointerMoved(Vec2::new(3.0, 4.0)));
        t.observe(&InputEvent::PointerLeft);
        assert_eq!(t.pointer_position(), None);
        assert!(!t.has_mouse_focus());
    }

    #[test]
    fn focus_loss_releases_buttons() {
        let mut t = PointerTracker::new();
        t.observe(&InputEvent::Button { button: MouseButton::Left, pressed: true, wheel_delta: 0.0 });
        t.observe(&InputEvent::Focused(false));
        assert!(!t.button_down(MouseButton::Left));
    }
}
