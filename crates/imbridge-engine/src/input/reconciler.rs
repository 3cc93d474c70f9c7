use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::coords::{Vec2, Viewport};

use super::keys::KeyTable;
use super::policy::{InputPolicy, WheelMode};
use super::poll::PointerPoll;
use super::snapshot::FrameInput;
use super::types::{InputEvent, Key, Modifiers, MouseButton};

/// Highest codepoint accepted as text input (Basic Multilingual Plane).
pub const MAX_INPUT_CODEPOINT: u32 = 0xFFFF;

/// Per-frame values supplied by the caller of [`InputReconciler::begin_frame`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameParams {
    pub display_size: Viewport,
    pub framebuffer_scale: Vec2,
    pub delta_time: f32,
}

impl FrameParams {
    pub fn new(display_size: Viewport, delta_time: f32) -> Self {
        Self {
            display_size,
            framebuffer_scale: Vec2::ONE,
            delta_time,
        }
    }
}

/// State written by the event sinks between frames.
#[derive(Debug, Default)]
struct Latches {
    /// Press seen since the last frame (left, right, middle).
    pressed: [bool; 3],
    wheel: f32,
    keys: KeyTable,
    modifiers: Modifiers,
    chars: Vec<char>,
    wants_text_input: bool,
}

/// Merges discrete platform events with a per-frame device poll.
///
/// Sinks (`on_*`) take `&self` and may be called from a platform callback
/// context on another thread; all latch state sits behind one mutex, which
/// [`begin_frame`](Self::begin_frame) also takes. Share the reconciler with an
/// `Arc` when sinks live elsewhere.
#[derive(Debug, Default)]
pub struct InputReconciler {
    policy: InputPolicy,
    latches: Mutex<Latches>,
}

impl InputReconciler {
    pub fn new(policy: InputPolicy) -> Self {
        Self {
            policy,
            latches: Mutex::new(Latches::default()),
        }
    }

    #[inline]
    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    fn latches(&self) -> MutexGuard<'_, Latches> {
        // Latches are plain data; a panic while holding the lock cannot leave
        // them half-updated in a way that matters for the next frame.
        self.latches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── event sinks ───────────────────────────────────────────────────────

    /// Button press/release. Wheel buttons add `wheel_delta` (or a unit step
    /// in their direction when the delta is zero) on press.
    pub fn on_button(&self, button: MouseButton, pressed: bool, wheel_delta: f32) {
        if button.is_wheel() {
            if pressed {
                let delta = if wheel_delta != 0.0 {
                    wheel_delta
                } else if button == MouseButton::WheelUp {
                    1.0
                } else {
                    -1.0
                };
                self.on_wheel(delta);
            }
            return;
        }

        // Releases are left to the poll; only presses need latching.
        if !pressed {
            return;
        }
        match button.slot() {
            Some(i) => self.latches().pressed[i] = true,
            None => log::trace!("ignoring untracked mouse button {button:?}"),
        }
    }

    pub fn on_wheel(&self, delta: f32) {
        if !delta.is_finite() || delta == 0.0 {
            return;
        }
        let step = match self.policy.wheel {
            WheelMode::Accumulate => delta,
            WheelMode::Step => delta.signum(),
        };
        self.latches().wheel += step;
    }

    pub fn on_key(&self, key: Key, pressed: bool) {
        let mut l = self.latches();
        if !l.keys.set(key, pressed) {
            log::trace!("dropping unmapped key {key}");
            return;
        }
        match key {
            Key::Shift => l.modifiers.shift = pressed,
            Key::Control => l.modifiers.ctrl = pressed,
            Key::Alt => l.modifiers.alt = pressed,
            _ => {}
        }
    }

    /// Authoritative modifier state reported by the platform.
    pub fn on_modifiers(&self, modifiers: Modifiers) {
        self.latches().modifiers = modifiers;
    }

    /// Queues a typed character.
    ///
    /// Dropped unless `0 < codepoint <= MAX_INPUT_CODEPOINT`, the value is a
    /// Unicode scalar, and the UI currently wants text input.
    pub fn on_char(&self, codepoint: u32) {
        let mut l = self.latches();
        if !l.wants_text_input {
            log::trace!("dropping char U+{codepoint:04X}: UI does not want text");
            return;
        }
        match char::from_u32(codepoint) {
            Some(c) if codepoint > 0 && codepoint <= MAX_INPUT_CODEPOINT => l.chars.push(c),
            _ => log::trace!("dropping out-of-range codepoint U+{codepoint:04X}"),
        }
    }

    /// Focus loss clears held keys, modifiers and pending presses.
    pub fn on_focus(&self, focused: bool) {
        if focused {
            return;
        }
        let mut l = self.latches();
        l.keys.clear();
        l.modifiers = Modifiers::NONE;
        l.pressed = [false; 3];
    }

    /// Dispatches a translated platform event to the matching sink.
    ///
    /// Pointer motion is not latched here; it reaches the frame through the poll.
    pub fn apply(&self, ev: &InputEvent) {
        match *ev {
            InputEvent::Button { button, pressed, wheel_delta } => {
                self.on_button(button, pressed, wheel_delta)
            }
            InputEvent::Wheel(delta) => self.on_wheel(delta),
            InputEvent::Key { key, pressed } => self.on_key(key, pressed),
            InputEvent::ModifiersChanged(m) => self.on_modifiers(m),
            InputEvent::Char(c) => self.on_char(c),
            InputEvent::Focused(f) => self.on_focus(f),
            InputEvent::PointerMoved(_) | InputEvent::PointerLeft => {}
        }
    }

    // ── UI feedback ───────────────────────────────────────────────────────

    /// Set by the GUI after each frame; gates [`on_char`](Self::on_char).
    pub fn set_wants_text_input(&self, wants: bool) {
        self.latches().wants_text_input = wants;
    }

    pub fn wants_text_input(&self) -> bool {
        self.latches().wants_text_input
    }

    // ── frame boundary ────────────────────────────────────────────────────

    /// Builds the frame snapshot and clears the per-frame latches.
    pub fn begin_frame<P>(&self, poll: &P, params: FrameParams) -> FrameInput
    where
        P: PointerPoll + ?Sized,
    {
        let pointer = if self.policy.pointer_requires_focus && !poll.has_mouse_focus() {
            None
        } else {
            poll.pointer_position()
        };

        let mut l = self.latches();

        let mut mouse_down = [false; 3];
        for (i, button) in MouseButton::TRACKED.into_iter().enumerate() {
            mouse_down[i] = l.pressed[i] || poll.button_down(button);
        }
        l.pressed = [false; 3];

        FrameInput {
            pointer,
            mouse_down,
            wheel: std::mem::take(&mut l.wheel),
            keys: l.keys.clone(),
            modifiers: l.modifiers,
            chars: std::mem::take(&mut l.chars),
            display_size: params.display_size,
            framebuffer_scale: params.framebuffer_scale,
            delta_time: params.delta_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::input::poll::StaticPoll;

    fn params() -> FrameParams {
        FrameParams::new(Viewport::new(1024.0, 576.0), 1.0 / 60.0)
    }

    fn up() -> StaticPoll {
        StaticPoll { position: Some(Vec2::new(5.0, 5.0)), buttons: [false; 3] }
    }

    // ── buttons ───────────────────────────────────────────────────────────

    #[test]
    fn sub_frame_click_is_reported_as_held() {
        let r = InputReconciler::default();
        r.on_button(MouseButton::Left, true, 0.0);
        r.on_button(MouseButton::Left, false, 0.0);

        let f = r.begin_frame(&up(), params());
        assert_eq!(f.mouse_down, [true, false, false]);

        let f = r.begin_frame(&up(), params());
        assert_eq!(f.mouse_down, [false, false, false]);
    }

    #[test]
    fn poll_alone_reports_held_button() {
        let r = InputReconciler::default();
        let poll = StaticPoll { position: None, buttons: [false, false, true] };
        let f = r.begin_frame(&poll, params());
        assert_eq!(f.mouse_down, [false, false, true]);
    }

    #[test]
    fn held_is_event_or_poll_for_every_combination() {
        for event in [false, true] {
            for polled in [false, true] {
                let r = InputReconciler::default();
                if event {
                    r.on_button(MouseButton::Right, true, 0.0);
                }
                let poll = StaticPoll { position: None, buttons: [false, polled, false] };
                let f = r.begin_frame(&poll, params());
                assert_eq!(f.mouse_down[1], event || polled, "event={event} poll={polled}");
            }
        }
    }

    // ── wheel ─────────────────────────────────────────────────────────────

    #[test]
    fn wheel_accumulates_signed_sum_and_resets() {
        let r = InputReconciler::new(InputPolicy::marmalade());
        r.on_wheel(1.5);
        r.on_wheel(-0.5);
        r.on_wheel(2.0);
        assert_eq!(r.begin_frame(&up(), params()).wheel, 3.0);
        assert_eq!(r.begin_frame(&up(), params()).wheel, 0.0);
    }

    #[test]
    fn step_mode_counts_events_by_sign() {
        let r = InputReconciler::new(InputPolicy::sdl());
        r.on_wheel(3.0);
        r.on_wheel(-0.2);
        r.on_wheel(5.0);
        r.on_wheel(0.0);
        assert_eq!(r.begin_frame(&up(), params()).wheel, 1.0);
    }

    #[test]
    fn wheel_buttons_feed_the_wheel_on_press_only() {
        let r = InputReconciler::new(InputPolicy::marmalade());
        r.on_button(MouseButton::WheelUp, true, 2.0);
        r.on_button(MouseButton::WheelUp, false, 2.0);
        r.on_button(MouseButton::WheelDown, true, 0.0);
        let f = r.begin_frame(&up(), params());
        assert_eq!(f.wheel, 1.0);
        assert_eq!(f.mouse_down, [false; 3]);
    }

    #[test]
    fn non_finite_wheel_is_ignored() {
        let r = InputReconciler::default();
        r.on_wheel(f32::NAN);
        r.on_wheel(f32::INFINITY);
        assert_eq!(r.begin_frame(&up(), params()).wheel, 0.0);
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn keys_persist_across_frames_until_released() {
        let r = InputReconciler::default();
        r.on_key(Key::Tab, true);
        assert!(r.begin_frame(&up(), params()).key_down(Key::Tab));
        assert!(r.begin_frame(&up(), params()).key_down(Key::Tab));
        r.on_key(Key::Tab, false);
        assert!(!r.begin_frame(&up(), params()).key_down(Key::Tab));
    }

    #[test]
    fn modifier_keys_update_modifier_flags() {
        let r = InputReconciler::default();
        r.on_key(Key::Control, true);
        r.on_key(Key::Shift, true);
        let f = r.begin_frame(&up(), params());
        assert_eq!(f.modifiers, Modifiers { shift: true, ctrl: true, alt: false });
    }

    #[test]
    fn unmapped_key_is_dropped() {
        let r = InputReconciler::default();
        r.on_key(Key::Unknown(4242), true);
        assert_eq!(r.begin_frame(&up(), params()).keys.iter_down().count(), 0);
    }

    #[test]
    fn focus_loss_clears_keys_modifiers_and_presses() {
        let r = InputReconciler::default();
        r.on_key(Key::Alt, true);
        r.on_key(Key::A, true);
        r.on_button(MouseButton::Left, true, 0.0);
        r.on_focus(false);

        let f = r.begin_frame(&up(), params());
        assert!(!f.key_down(Key::A));
        assert!(!f.modifiers.any());
        assert_eq!(f.mouse_down, [false; 3]);
    }

    // ── text ──────────────────────────────────────────────────────────────

    #[test]
    fn chars_dropped_when_ui_does_not_want_text() {
        let r = InputReconciler::default();
        r.on_char('a' as u32);
        assert!(r.begin_frame(&up(), params()).chars.is_empty());
    }

    #[test]
    fn only_valid_bmp_scalars_are_queued() {
        let r = InputReconciler::default();
        r.set_wants_text_input(true);
        for c in [0, 'h' as u32, 0xD800, 'é' as u32, 0x1F600, 'i' as u32] {
            r.on_char(c);
        }
        let f = r.begin_frame(&up(), params());
        assert_eq!(f.chars, vec!['h', 'é', 'i']);
        assert!(r.begin_frame(&up(), params()).chars.is_empty());
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn pointer_hidden_without_focus_when_policy_requires_it() {
        struct Unfocused;
        impl PointerPoll for Unfocused {
            fn pointer_position(&self) -> Option<Vec2> { Some(Vec2::new(1.0, 2.0)) }
            fn button_down(&self, _: MouseButton) -> bool { false }
            fn has_mouse_focus(&self) -> bool { false }
        }

        let sdl = InputReconciler::new(InputPolicy::sdl());
        let f = sdl.begin_frame(&Unfocused, params());
        assert_eq!(f.pointer, None);
        assert_eq!(f.pointer_or_sentinel(), Vec2::NO_POINTER);

        let marmalade = InputReconciler::new(InputPolicy::marmalade());
        assert_eq!(marmalade.begin_frame(&Unfocused, params()).pointer, Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn frame_params_are_copied_into_snapshot() {
        let r = InputReconciler::default();
        let f = r.begin_frame(&up(), params());
        assert_eq!(f.display_size, Viewport::new(1024.0, 576.0));
        assert_eq!(f.framebuffer_scale, Vec2::ONE);
        assert!((f.delta_time - 1.0 / 60.0).abs() < f32::EPSILON);
    }

    // ── threading ─────────────────────────────────────────────────────────

    #[test]
    fn sinks_from_another_thread_land_in_next_frame() {
        let r = Arc::new(InputReconciler::new(InputPolicy::marmalade()));
        let sink = Arc::clone(&r);
        std::thread::spawn(move || {
            for _ in 0..100 {
                sink.on_wheel(0.5);
            }
            sink.on_button(MouseButton::Middle, true, 0.0);
        })
        .join()
        .unwrap();

        let f = r.begin_frame(&up(), params());
        assert_eq!(f.wheel, 50.0);
        assert!(f.mouse_down[2]);
    }
}
