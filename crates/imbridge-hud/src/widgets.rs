use imbridge_engine::coords::{ColorRgba, Rect, Vec2};
use imbridge_engine::draw::TextureId;
use imbridge_engine::font::FontAtlas;

use crate::overlay::{Overlay, WidgetId};
use crate::painter::Painter;

/// Fraction of the row taken by a slider frame; the label sits to its right.
const FRAME_FRACTION: f32 = 0.65;

const CHANNELS: [&str; 4] = ["R", "G", "B", "A"];

impl<'a> Overlay<'a> {
    pub fn label(&mut self, text: &str) {
        let color = self.style.text;
        self.text_colored(text, color);
    }

    pub fn text_colored(&mut self, text: &str, color: ColorRgba) {
        let h = self.atlas.line_height();
        let Some((_, row)) = self.next_row(h) else {
            return;
        };
        if let Some(p) = self.painter() {
            p.text(row.origin, text, color);
        }
    }

    /// Thin horizontal rule.
    pub fn separator(&mut self) {
        let color = self.style.separator;
        let Some((_, row)) = self.next_row(1.0) else {
            return;
        };
        if let Some(p) = self.painter() {
            p.fill_rect(row, color);
        }
    }

    /// Returns `true` on the frame the button is released over itself.
    pub fn button(&mut self, label: &str) -> bool {
        let (style, atlas) = (self.style, self.atlas);
        let h = self.row_height();
        let Some((scope, row)) = self.next_row(h) else {
            return false;
        };

        let w = atlas.measure(label).x + style.frame_padding * 2.0;
        let rect = Rect::new(row.origin.x, row.origin.y, w.min(row.size.x), row.size.y);
        let it = self.interact(WidgetId::new(scope, label), rect);

        let fill = if it.held {
            style.button_active
        } else if it.hovered {
            style.button_hover
        } else {
            style.button
        };
        if let Some(p) = self.painter() {
            p.fill_rect(rect, fill);
            centered_text(p, atlas, rect, label, style.text);
        }
        it.clicked
    }

    /// Toggles `value` on click. Returns `true` when it changed.
    pub fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let (style, atlas) = (self.style, self.atlas);
        let h = self.row_height();
        let Some((scope, row)) = self.next_row(h) else {
            return false;
        };

        let check = Rect::new(row.origin.x, row.origin.y, h, h);
        let label_x = check.max().x + style.item_spacing;
        let hit = Rect::new(
            row.origin.x,
            row.origin.y,
            (label_x - row.origin.x + atlas.measure(label).x).min(row.size.x),
            h,
        );
        let it = self.interact(WidgetId::new(scope, label), hit);
        if it.clicked {
            *value = !*value;
        }

        let fill = frame_color(self, it.held, it.hovered);
        if let Some(p) = self.painter() {
            p.fill_rect(check, fill);
            if *value {
                p.fill_rect(check.inset(style.frame_padding + 1.0), style.check_mark);
            }
            p.text(Vec2::new(label_x, row.origin.y + style.frame_padding), label, style.text);
        }
        it.clicked
    }

    /// Horizontal slider over `[min, max]`. Returns `true` when `value` changed.
    pub fn slider(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        let (style, atlas) = (self.style, self.atlas);
        let h = self.row_height();
        let Some((scope, row)) = self.next_row(h) else {
            return false;
        };

        let rect = Rect::new(row.origin.x, row.origin.y, row.size.x * FRAME_FRACTION, h);
        let it = self.interact(WidgetId::new(scope, label), rect);

        let mut changed = false;
        if let Some(x) = self.drag_x(it) {
            let v = slider_value(x, rect, style.grab_width, min, max);
            if v != *value {
                *value = v;
                changed = true;
            }
        }

        let fill = frame_color(self, it.held, it.hovered);
        let grab = grab_rect(rect, style.grab_width, normalized(*value, min, max));
        if let Some(p) = self.painter() {
            p.fill_rect(rect, fill);
            p.fill_rect(grab, style.grab);
            centered_text(p, atlas, rect, &format!("{value:.3}"), style.text);
            p.text(
                Vec2::new(rect.max().x + style.item_spacing, row.origin.y + style.frame_padding),
                label,
                style.text,
            );
        }
        changed
    }

    /// RGBA editor: a swatch plus one drag field per channel, values in `[0, 1]`.
    pub fn color_edit(&mut self, label: &str, color: &mut [f32; 4]) -> bool {
        let (style, atlas) = (self.style, self.atlas);
        let h = self.row_height();
        let Some((scope, row)) = self.next_row(h) else {
            return false;
        };
        let id = WidgetId::new(scope, label);

        let frame_w = row.size.x * FRAME_FRACTION;
        let swatch = Rect::new(row.origin.x, row.origin.y, h, h);
        let avail = frame_w - h - style.item_spacing;
        let cw = ((avail - style.item_spacing * 3.0) / 4.0).max(1.0);

        let mut changed = false;
        let mut fields = [(Rect::default(), ColorRgba::default()); 4];
        for (i, name) in CHANNELS.iter().enumerate() {
            let x = swatch.max().x + style.item_spacing + i as f32 * (cw + style.item_spacing);
            let rect = Rect::new(x, row.origin.y, cw, h);
            let it = self.interact(WidgetId::new(id, name), rect);
            if let Some(px) = self.drag_x(it) {
                let v = slider_value(px, rect, style.grab_width, 0.0, 1.0);
                if v != color[i] {
                    color[i] = v;
                    changed = true;
                }
            }
            fields[i] = (rect, frame_color(self, it.held, it.hovered));
        }

        if let Some(p) = self.painter() {
            p.fill_rect(swatch, ColorRgba::from_array(*color).with_alpha(1.0));
            for (i, (rect, fill)) in fields.into_iter().enumerate() {
                p.fill_rect(rect, fill);
                let text = format!("{}:{}", CHANNELS[i], (color[i].clamp(0.0, 1.0) * 255.0).round() as u8);
                centered_text(p, atlas, rect, &text, style.text);
            }
            p.text(
                Vec2::new(
                    row.origin.x + frame_w + style.item_spacing,
                    row.origin.y + style.frame_padding,
                ),
                label,
                style.text,
            );
        }
        changed
    }

    /// Full texture drawn at `size`; the batch switches texture for it.
    pub fn image(&mut self, texture: TextureId, size: Vec2) {
        let Some((_, row)) = self.next_row(size.y) else {
            return;
        };
        let rect = Rect::new(row.origin.x, row.origin.y, size.x.min(row.size.x), size.y);
        if let Some(p) = self.painter() {
            p.image(rect, texture, [0.0, 0.0], [1.0, 1.0], ColorRgba::white());
        }
    }
}

fn frame_color(ui: &Overlay<'_>, held: bool, hovered: bool) -> ColorRgba {
    let style = ui.style();
    if held {
        style.frame_active
    } else if hovered {
        style.frame_hover
    } else {
        style.frame_bg
    }
}

fn centered_text(p: &mut Painter<'_>, atlas: &FontAtlas, rect: Rect, text: &str, color: ColorRgba) {
    let size = atlas.measure(text);
    let origin = Vec2::new(
        rect.origin.x + (rect.size.x - size.x) * 0.5,
        rect.origin.y + (rect.size.y - size.y) * 0.5,
    );
    p.push_clip(rect);
    p.text(origin, text, color);
    p.pop_clip();
}

fn normalized(value: f32, min: f32, max: f32) -> f32 {
    if max - min <= f32::EPSILON {
        0.0
    } else {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    }
}

fn slider_value(x: f32, rect: Rect, grab: f32, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    let track = (rect.size.x - grab).max(1.0);
    let t = ((x - rect.origin.x - grab * 0.5) / track).clamp(0.0, 1.0);
    min + t * (max - min)
}

fn grab_rect(frame: Rect, grab: f32, t: f32) -> Rect {
    let w = grab.min(frame.size.x);
    let x = frame.origin.x + t * (frame.size.x - w);
    Rect::new(x, frame.origin.y + 2.0, w, (frame.size.y - 4.0).max(0.0))
}
