//! Minimal immediate-mode overlay.
//!
//! Widgets are re-declared every frame; the only state that survives between
//! frames lives in [`OverlayMemory`] (window positions, the active widget and
//! the previous mouse state used for click edges).
//!
//! Windows are drawn in declaration order. Where they overlap, the pointer
//! belongs to the one drawn last, judged from the previous frame's rects.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use imbridge_engine::coords::{ClipRect, ColorRgba, Rect, Vec2};
use imbridge_engine::draw::{DrawBatch, DrawData};
use imbridge_engine::font::FontAtlas;
use imbridge_engine::input::FrameInput;

use crate::painter::Painter;

/// Stable identity of a window or widget across frames.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WidgetId(u64);

impl WidgetId {
    pub fn new(scope: WidgetId, label: &str) -> Self {
        let mut h = DefaultHasher::new();
        scope.0.hash(&mut h);
        label.hash(&mut h);
        WidgetId(h.finish())
    }

    pub const ROOT: WidgetId = WidgetId(0);
}

/// Colours and metrics.
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub window_bg: ColorRgba,
    pub title_bg: ColorRgba,
    pub title_bg_active: ColorRgba,
    pub close_button: ColorRgba,
    pub close_button_hover: ColorRgba,
    pub text: ColorRgba,
    pub text_dim: ColorRgba,
    pub frame_bg: ColorRgba,
    pub frame_hover: ColorRgba,
    pub frame_active: ColorRgba,
    pub grab: ColorRgba,
    pub check_mark: ColorRgba,
    pub button: ColorRgba,
    pub button_hover: ColorRgba,
    pub button_active: ColorRgba,
    pub separator: ColorRgba,

    pub window_width: f32,
    pub padding: f32,
    pub item_spacing: f32,
    pub frame_padding: f32,
    pub grab_width: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            window_bg: ColorRgba::new(0.0, 0.0, 0.0, 0.7),
            title_bg: ColorRgba::new(0.27, 0.27, 0.54, 0.83),
            title_bg_active: ColorRgba::new(0.32, 0.32, 0.63, 0.87),
            close_button: ColorRgba::new(0.5, 0.5, 0.9, 0.5),
            close_button_hover: ColorRgba::new(0.7, 0.7, 0.9, 0.6),
            text: ColorRgba::new(0.9, 0.9, 0.9, 1.0),
            text_dim: ColorRgba::new(0.6, 0.6, 0.6, 1.0),
            frame_bg: ColorRgba::new(0.8, 0.8, 0.8, 0.3),
            frame_hover: ColorRgba::new(0.9, 0.8, 0.8, 0.4),
            frame_active: ColorRgba::new(0.9, 0.65, 0.65, 0.45),
            grab: ColorRgba::new(1.0, 1.0, 1.0, 0.3),
            check_mark: ColorRgba::new(0.9, 0.9, 0.9, 0.5),
            button: ColorRgba::new(0.67, 0.4, 0.4, 0.6),
            button_hover: ColorRgba::new(0.67, 0.4, 0.4, 1.0),
            button_active: ColorRgba::new(0.8, 0.5, 0.5, 1.0),
            separator: ColorRgba::new(0.5, 0.5, 0.5, 1.0),

            window_width: 300.0,
            padding: 8.0,
            item_spacing: 4.0,
            frame_padding: 3.0,
            grab_width: 10.0,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct WindowState {
    pos: Vec2,
}

/// State that persists between frames.
#[derive(Debug, Default)]
pub struct OverlayMemory {
    pub(crate) active: Option<WidgetId>,
    pub(crate) drag_offset: Vec2,
    pub(crate) prev_mouse_down: bool,
    windows: HashMap<WidgetId, WindowState>,
    /// Last frame's window rects, bottom to top.
    layers: Vec<(WidgetId, Rect)>,
}

impl OverlayMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widget currently held by the mouse.
    #[inline]
    pub fn active(&self) -> Option<WidgetId> {
        self.active
    }

    /// Top-left of a window that has been shown at least once.
    pub fn window_pos(&self, title: &str) -> Option<Vec2> {
        self.windows
            .get(&WidgetId::new(WidgetId::ROOT, title))
            .map(|w| w.pos)
    }
}

/// Outcome of hit-testing one widget this frame.
#[derive(Debug, Copy, Clone, Default)]
pub(crate) struct Interaction {
    pub hovered: bool,
    pub held: bool,
    /// Released over the widget after being pressed on it.
    pub clicked: bool,
}

pub(crate) struct WindowFrame<'a> {
    pub id: WidgetId,
    pub painter: Painter<'a>,
    pub cursor: Vec2,
    pub content_width: f32,
}

/// Builder for one frame of overlay windows.
pub struct Overlay<'a> {
    pub(crate) input: &'a FrameInput,
    pub(crate) atlas: &'a FontAtlas,
    pub(crate) style: &'a OverlayStyle,
    pub(crate) memory: &'a mut OverlayMemory,

    pointer: Option<Vec2>,
    mouse_down: bool,
    pressed: bool,
    click_taken: bool,
    hovered_window: bool,
    /// Topmost window under the pointer, if any.
    top_window: Option<WidgetId>,
    layers: Vec<(WidgetId, Rect)>,

    batches: Vec<DrawBatch>,
    pub(crate) frame: Option<WindowFrame<'a>>,
}

impl<'a> Overlay<'a> {
    pub fn new(
        input: &'a FrameInput,
        atlas: &'a FontAtlas,
        memory: &'a mut OverlayMemory,
        style: &'a OverlayStyle,
    ) -> Self {
        let mouse_down = input.mouse_down[0];
        let pressed = mouse_down && !memory.prev_mouse_down;
        let top_window = input.pointer.and_then(|p| {
            memory
                .layers
                .iter()
                .rev()
                .find(|(_, rect)| rect.contains(p))
                .map(|&(id, _)| id)
        });
        Self {
            input,
            atlas,
            style,
            memory,
            pointer: input.pointer,
            mouse_down,
            pressed,
            click_taken: false,
            hovered_window: false,
            top_window,
            layers: Vec::new(),
            batches: Vec::new(),
            frame: None,
        }
    }

    /// The frame's input snapshot.
    #[inline]
    pub fn input(&self) -> &FrameInput {
        self.input
    }

    #[inline]
    pub fn style(&self) -> &OverlayStyle {
        self.style
    }

    /// Whether the pointer is over an overlay window or dragging a widget.
    #[inline]
    pub fn wants_mouse(&self) -> bool {
        self.hovered_window || self.memory.active.is_some()
    }

    fn title_height(&self) -> f32 {
        self.atlas.line_height() + self.style.frame_padding * 2.0
    }

    /// Declares a window. `open` is cleared by the close box; nothing is drawn
    /// while it is false. `default_pos` applies the first time `title` is seen.
    pub fn window<F>(&mut self, title: &str, open: &mut bool, default_pos: Vec2, f: F)
    where
        F: FnOnce(&mut Self),
    {
        if !*open {
            return;
        }
        if self.frame.is_some() {
            log::warn!("nested window {title:?} ignored");
            return;
        }

        let id = WidgetId::new(WidgetId::ROOT, title);
        let style = self.style;
        let width = style.window_width;
        let title_h = self.title_height();

        let mut pos = self
            .memory
            .windows
            .entry(id)
            .or_insert(WindowState { pos: default_pos })
            .pos;

        let close_rect = |pos: Vec2| Rect::new(pos.x + width - title_h, pos.y, title_h, title_h);
        let title_rect = |pos: Vec2| Rect::new(pos.x, pos.y, width, title_h);

        let close_hovered = self.hit(id, close_rect(pos));
        if close_hovered && self.take_press() {
            *open = false;
            log::debug!("window {title:?} closed");
            return;
        }

        if self.memory.active == Some(id) && self.mouse_down {
            if let Some(p) = self.pointer {
                pos = p - self.memory.drag_offset;
            }
        } else if self.hit(id, title_rect(pos)) && self.take_press() {
            self.memory.active = Some(id);
            self.memory.drag_offset = self.pointer.map_or(Vec2::zero(), |p| p - pos);
        }
        if let Some(state) = self.memory.windows.get_mut(&id) {
            state.pos = pos;
        }

        let display = self.input.display_size;
        let mut painter = Painter::new(self.atlas, ClipRect::full(display.width, display.height));
        painter.push_clip(Rect::new(pos.x, pos.y, width, display.height));

        let bg = painter.fill_rect(title_rect(pos), style.window_bg);
        let title_color = if self.memory.active == Some(id) {
            style.title_bg_active
        } else {
            style.title_bg
        };
        painter.fill_rect(title_rect(pos), title_color);

        let close = close_rect(pos).inset(style.frame_padding + 1.0);
        let close_color = if close_hovered {
            style.close_button_hover
        } else {
            style.close_button
        };
        painter.fill_rect(close, close_color);

        painter.push_clip(Rect::new(pos.x, pos.y, width - title_h, title_h));
        painter.text(
            Vec2::new(pos.x + style.padding, pos.y + style.frame_padding),
            title,
            style.text,
        );
        painter.pop_clip();

        painter.push_clip(Rect::new(pos.x, pos.y + title_h, width, display.height));
        self.frame = Some(WindowFrame {
            id,
            painter,
            cursor: Vec2::new(pos.x + style.padding, pos.y + title_h + style.padding),
            content_width: width - style.padding * 2.0,
        });

        f(self);

        let Some(mut frame) = self.frame.take() else {
            return;
        };
        let content_top = pos.y + title_h + style.padding;
        let content_bottom = if frame.cursor.y > content_top {
            frame.cursor.y - style.item_spacing
        } else {
            content_top
        };
        let height = content_bottom + style.padding - pos.y;
        let outer = Rect::new(pos.x, pos.y, width, height);
        if let Some(bg) = bg {
            frame.painter.set_quad_rect(bg, outer);
        }
        frame.painter.pop_clip();
        frame.painter.pop_clip();

        if self.hit(id, outer) {
            self.hovered_window = true;
            // clicks on the window body must not reach windows declared later
            self.take_press();
        }
        self.layers.push((id, outer));

        self.batches.push(frame.painter.finish());
    }

    /// Ends the frame: updates [`OverlayMemory`] and returns one batch per window.
    pub fn finish(mut self) -> DrawData {
        if !self.mouse_down {
            self.memory.active = None;
        }
        self.memory.prev_mouse_down = self.mouse_down;
        self.memory.layers = self.layers;

        let mut data = DrawData::new(self.input.display_size, self.input.framebuffer_scale);
        data.batches = self.batches.into_iter().filter(|b| !b.is_empty()).collect();
        data
    }

    // ── layout ────────────────────────────────────────────────────────────

    /// Reserves the next row of the current window.
    pub(crate) fn next_row(&mut self, height: f32) -> Option<(WidgetId, Rect)> {
        let spacing = self.style.item_spacing;
        let Some(frame) = self.frame.as_mut() else {
            log::debug!("widget declared outside a window; ignored");
            return None;
        };
        let rect = Rect::new(frame.cursor.x, frame.cursor.y, frame.content_width, height);
        frame.cursor.y += height + spacing;
        Some((frame.id, rect))
    }

    pub(crate) fn row_height(&self) -> f32 {
        self.atlas.line_height() + self.style.frame_padding * 2.0
    }

    pub(crate) fn painter(&mut self) -> Option<&mut Painter<'a>> {
        self.frame.as_mut().map(|f| &mut f.painter)
    }

    // ── interaction ───────────────────────────────────────────────────────

    /// Pointer inside `rect`, and not covered by another window.
    fn hit(&self, window: WidgetId, rect: Rect) -> bool {
        if self.top_window.is_some_and(|top| top != window) {
            return false;
        }
        self.pointer.is_some_and(|p| rect.contains(p))
    }

    /// Consumes this frame's press edge, if still available.
    fn take_press(&mut self) -> bool {
        if self.pressed && !self.click_taken {
            self.click_taken = true;
            true
        } else {
            false
        }
    }

    pub(crate) fn interact(&mut self, id: WidgetId, rect: Rect) -> Interaction {
        let window = self.frame.as_ref().map_or(WidgetId::ROOT, |f| f.id);
        let over = self.hit(window, rect);
        let is_active = self.memory.active == Some(id);
        let hovered = over && (self.memory.active.is_none() || is_active);

        if hovered && !is_active && self.take_press() {
            self.memory.active = Some(id);
        }

        let is_active = self.memory.active == Some(id);
        Interaction {
            hovered,
            held: is_active && self.mouse_down,
            clicked: is_active && !self.mouse_down && over,
        }
    }

    /// Pointer x while `id` is held.
    pub(crate) fn drag_x(&self, interaction: Interaction) -> Option<f32> {
        if interaction.held {
            self.pointer.map(|p| p.x)
        } else {
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use imbridge_engine::coords::Viewport;

    pub(crate) fn input_at(pointer: Option<(f32, f32)>, down: bool) -> FrameInput {
        FrameInput {
            pointer: pointer.map(|(x, y)| Vec2::new(x, y)),
            mouse_down: [down, false, false],
            display_size: Viewport::new(800.0, 600.0),
            framebuffer_scale: Vec2::ONE,
            delta_time: 1.0 / 60.0,
            ..Default::default()
        }
    }

    /// Runs one frame with a single window at the origin.
    pub(crate) fn frame<F>(memory: &mut OverlayMemory, input: &FrameInput, f: F) -> DrawData
    where
        F: FnOnce(&mut Overlay<'_>),
    {
        let atlas = FontAtlas::solid_only();
        let style = OverlayStyle::default();
        let mut ui = Overlay::new(input, &atlas, memory, &style);
        let mut open = true;
        ui.window("test", &mut open, Vec2::zero(), f);
        ui.finish()
    }

    // ── windows ───────────────────────────────────────────────────────────

    #[test]
    fn one_window_yields_one_valid_batch() {
        let mut mem = OverlayMemory::new();
        let data = frame(&mut mem, &input_at(None, false), |ui| {
            ui.label("hello");
        });

        assert_eq!(data.batches.len(), 1);
        assert!(data.batches[0].validate().is_ok());
        assert_eq!(data.display_size, Viewport::new(800.0, 600.0));
    }

    #[test]
    fn closed_window_draws_nothing() {
        let atlas = FontAtlas::solid_only();
        let style = OverlayStyle::default();
        let mut mem = OverlayMemory::new();
        let input = input_at(None, false);
        let mut ui = Overlay::new(&input, &atlas, &mut mem, &style);
        let mut open = false;
        let mut ran = false;
        ui.window("hidden", &mut open, Vec2::zero(), |_| ran = true);
        assert!(!ran);
        assert!(ui.finish().is_empty());
    }

    /// Two windows at the origin; "front" is declared last and drawn on top.
    fn stacked_frame(memory: &mut OverlayMemory, input: &FrameInput) -> (bool, bool) {
        let atlas = FontAtlas::solid_only();
        let style = OverlayStyle::default();
        let mut ui = Overlay::new(input, &atlas, memory, &style);
        let (mut back_open, mut front_open) = (true, true);
        let mut back_clicked = false;
        let mut front_clicked = false;
        ui.window("back", &mut back_open, Vec2::zero(), |ui| {
            back_clicked = ui.button("under");
        });
        ui.window("front", &mut front_open, Vec2::zero(), |ui| {
            front_clicked = ui.button("over");
        });
        ui.finish();
        (back_clicked, front_clicked)
    }

    #[test]
    fn overlapping_windows_give_the_click_to_the_top_one() {
        let mut mem = OverlayMemory::new();
        let on_button = Some((12.0, 40.0));
        stacked_frame(&mut mem, &input_at(on_button, false));
        stacked_frame(&mut mem, &input_at(on_button, true));
        let (back, front) = stacked_frame(&mut mem, &input_at(on_button, false));
        assert!(!back);
        assert!(front);
    }

    #[test]
    fn title_drag_goes_to_the_top_window() {
        let mut mem = OverlayMemory::new();
        let on_title = Some((50.0, 10.0));
        stacked_frame(&mut mem, &input_at(on_title, false));
        stacked_frame(&mut mem, &input_at(on_title, true));
        assert_eq!(mem.active(), Some(WidgetId::new(WidgetId::ROOT, "front")));
    }

    #[test]
    fn background_is_sized_to_content() {
        let mut mem = OverlayMemory::new();
        let short = frame(&mut mem, &input_at(None, false), |ui| ui.label("a"));
        let tall = frame(&mut mem, &input_at(None, false), |ui| {
            for _ in 0..5 {
                ui.label("a");
            }
        });
        let bottom = |d: &DrawData| d.batches[0].vertices[2].pos[1];
        assert!(bottom(&tall) > bottom(&short));
    }

    #[test]
    fn content_is_clipped_to_window_width() {
        let mut mem = OverlayMemory::new();
        let data = frame(&mut mem, &input_at(None, false), |ui| ui.label("x"));
        let style = OverlayStyle::default();
        for cmd in &data.batches[0].commands {
            assert!(cmd.clip_rect.left >= 0.0);
            assert!(cmd.clip_rect.right <= style.window_width);
            assert!(cmd.clip_rect.bottom <= 600.0);
        }
    }

    #[test]
    fn close_box_clears_open_flag() {
        let atlas = FontAtlas::solid_only();
        let style = OverlayStyle::default();
        let mut mem = OverlayMemory::new();
        let input = input_at(Some((style.window_width - 5.0, 5.0)), true);
        let mut ui = Overlay::new(&input, &atlas, &mut mem, &style);
        let mut open = true;
        ui.window("closable", &mut open, Vec2::zero(), |_| {});
        assert!(!open);
        assert!(ui.finish().is_empty());
    }

    #[test]
    fn dragging_title_moves_window() {
        let mut mem = OverlayMemory::new();
        frame(&mut mem, &input_at(Some((50.0, 5.0)), true), |_| {});
        frame(&mut mem, &input_at(Some((150.0, 65.0)), true), |_| {});
        assert_eq!(mem.window_pos("test"), Some(Vec2::new(100.0, 60.0)));

        frame(&mut mem, &input_at(Some((150.0, 65.0)), false), |_| {});
        assert_eq!(mem.active(), None);
    }

    #[test]
    fn pointer_over_window_wants_mouse() {
        let atlas = FontAtlas::solid_only();
        let style = OverlayStyle::default();
        let mut mem = OverlayMemory::new();

        let inside = input_at(Some((10.0, 10.0)), false);
        let mut ui = Overlay::new(&inside, &atlas, &mut mem, &style);
        ui.window("w", &mut true, Vec2::zero(), |ui| ui.label("x"));
        assert!(ui.wants_mouse());
        ui.finish();

        let outside = input_at(Some((700.0, 500.0)), false);
        let mut ui = Overlay::new(&outside, &atlas, &mut mem, &style);
        ui.window("w", &mut true, Vec2::zero(), |ui| ui.label("x"));
        assert!(!ui.wants_mouse());
    }

    #[test]
    fn widgets_outside_windows_are_ignored() {
        let atlas = FontAtlas::solid_only();
        let style = OverlayStyle::default();
        let mut mem = OverlayMemory::new();
        let input = input_at(None, false);
        let mut ui = Overlay::new(&input, &atlas, &mut mem, &style);
        ui.label("orphan");
        assert!(ui.finish().is_empty());
    }

    #[test]
    fn press_edge_needs_previous_release() {
        let mut mem = OverlayMemory::new();
        // Held from before the overlay existed: no press edge, no drag.
        mem.prev_mouse_down = true;
        frame(&mut mem, &input_at(Some((50.0, 5.0)), true), |_| {});
        assert_eq!(mem.active(), None);
    }
}
