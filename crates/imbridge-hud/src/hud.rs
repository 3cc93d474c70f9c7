use imbridge_engine::coords::Vec2;
use imbridge_engine::input::FrameInput;

use crate::overlay::Overlay;

const EXAMPLE_POS: Vec2 = Vec2::new(20.0, 20.0);
const TEST_POS: Vec2 = Vec2::new(340.0, 20.0);

/// Weight of the newest frame in the smoothed frame time.
const DT_SMOOTHING: f32 = 0.1;

/// Debug overlay: a settings window for a spinning-cube scene and a window
/// of per-frame input diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugHud {
    pub show_test_window: bool,
    pub show_example_window: bool,
    /// Degrees per second.
    pub rotation_speed: f32,
    pub cube_color1: [f32; 4],
    pub cube_color2: [f32; 4],

    smoothed_dt: Option<f32>,
}

impl Default for DebugHud {
    fn default() -> Self {
        Self {
            show_test_window: true,
            show_example_window: true,
            rotation_speed: 15.0,
            cube_color1: [0.4, 0.4, 1.0, 1.0],
            cube_color2: [1.0, 0.4, 0.4, 1.0],
            smoothed_dt: None,
        }
    }
}

impl DebugHud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Smoothed frames per second, once a frame has been seen.
    pub fn fps(&self) -> Option<f32> {
        self.smoothed_dt.filter(|dt| *dt > 0.0).map(|dt| 1.0 / dt)
    }

    /// Declares the HUD windows for this frame.
    pub fn do_interface(&mut self, ui: &mut Overlay<'_>) {
        let dt = ui.input().delta_time;
        self.smoothed_dt = Some(match self.smoothed_dt {
            Some(s) => s + (dt - s) * DT_SMOOTHING,
            None => dt,
        });

        ui.window("Example", &mut self.show_example_window, EXAMPLE_POS, |ui| {
            ui.label("Cube settings");
            ui.slider("rotation speed", &mut self.rotation_speed, 0.0, 360.0);
            ui.color_edit("cube color 1", &mut self.cube_color1);
            ui.color_edit("cube color 2", &mut self.cube_color2);
            ui.separator();
            ui.checkbox("show test window", &mut self.show_test_window);
        });

        let smoothed = self.smoothed_dt.unwrap_or(dt);
        ui.window("Test", &mut self.show_test_window, TEST_POS, |ui| {
            let lines = diagnostics(ui.input(), smoothed);
            for line in &lines {
                ui.label(line);
            }
            ui.separator();
            ui.checkbox("show example window", &mut self.show_example_window);
        });
    }
}

/// One text line per diagnostic shown in the test window.
pub fn diagnostics(input: &FrameInput, smoothed_dt: f32) -> Vec<String> {
    let fps = if smoothed_dt > 0.0 { 1.0 / smoothed_dt } else { 0.0 };

    let pointer = match input.pointer {
        Some(p) => format!("pointer: ({:.0}, {:.0})", p.x, p.y),
        None => "pointer: none".to_string(),
    };

    let flag = |on: bool, name: &'static str| if on { name } else { "-" };
    let buttons = format!(
        "buttons: {} {} {}",
        flag(input.mouse_down[0], "L"),
        flag(input.mouse_down[1], "R"),
        flag(input.mouse_down[2], "M"),
    );
    let m = input.modifiers;
    let modifiers = format!(
        "modifiers: {} {} {}",
        flag(m.shift, "shift"),
        flag(m.ctrl, "ctrl"),
        flag(m.alt, "alt"),
    );

    let keys: Vec<String> = input.keys.iter_down().map(|k| format!("{k:?}")).collect();
    let chars: String = input.chars.iter().collect();

    vec![
        format!("{:.3} ms/frame ({fps:.1} FPS)", smoothed_dt * 1000.0),
        format!("dt: {:.4} s", input.delta_time),
        format!(
            "display: {:.0}x{:.0} @ {:.2}x",
            input.display_size.width, input.display_size.height, input.framebuffer_scale.x
        ),
        pointer,
        format!("wheel: {:+.2}", input.wheel),
        buttons,
        modifiers,
        format!("keys: {}", keys.join(" ")),
        format!("chars: {chars:?}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::tests::input_at;
    use crate::overlay::{OverlayMemory, OverlayStyle};
    use imbridge_engine::draw::DrawData;
    use imbridge_engine::font::FontAtlas;
    use imbridge_engine::input::Key;

    fn run(hud: &mut DebugHud, mem: &mut OverlayMemory, input: &FrameInput) -> DrawData {
        let atlas = FontAtlas::solid_only();
        let style = OverlayStyle::default();
        let mut ui = Overlay::new(input, &atlas, mem, &style);
        hud.do_interface(&mut ui);
        ui.finish()
    }

    #[test]
    fn defaults_match_initial_settings() {
        let hud = DebugHud::default();
        assert!(hud.show_test_window);
        assert!(hud.show_example_window);
        assert_eq!(hud.rotation_speed, 15.0);
        assert_eq!(hud.cube_color1, [0.4, 0.4, 1.0, 1.0]);
        assert_eq!(hud.cube_color2, [1.0, 0.4, 0.4, 1.0]);
        assert_eq!(hud.fps(), None);
    }

    #[test]
    fn both_windows_emit_a_batch_each() {
        let mut hud = DebugHud::new();
        let mut mem = OverlayMemory::new();
        let data = run(&mut hud, &mut mem, &input_at(None, false));
        assert_eq!(data.batches.len(), 2);
        assert!(data.batches.iter().all(|b| b.validate().is_ok()));
    }

    #[test]
    fn hidden_windows_emit_nothing() {
        let mut hud = DebugHud {
            show_test_window: false,
            show_example_window: false,
            ..DebugHud::default()
        };
        let mut mem = OverlayMemory::new();
        assert!(run(&mut hud, &mut mem, &input_at(None, false)).is_empty());
    }

    #[test]
    fn close_box_hides_example_window() {
        let mut hud = DebugHud::new();
        let mut mem = OverlayMemory::new();
        // close box sits at the right end of the title bar
        let x = EXAMPLE_POS.x + OverlayStyle::default().window_width - 5.0;
        let data = run(&mut hud, &mut mem, &input_at(Some((x, EXAMPLE_POS.y + 5.0)), true));
        assert!(!hud.show_example_window);
        assert_eq!(data.batches.len(), 1);
    }

    #[test]
    fn rotation_slider_drags_to_max() {
        let mut hud = DebugHud::new();
        let mut mem = OverlayMemory::new();
        // label row, then the slider row starting at y = 69.2
        for x in [40.0, 1000.0] {
            run(&mut hud, &mut mem, &input_at(Some((x, 75.0)), true));
        }
        assert_eq!(hud.rotation_speed, 360.0);
    }

    #[test]
    fn fps_is_smoothed() {
        let mut hud = DebugHud::new();
        let mut mem = OverlayMemory::new();
        let mut input = input_at(None, false);
        input.delta_time = 0.01;
        run(&mut hud, &mut mem, &input);
        assert!((hud.fps().unwrap() - 100.0).abs() < 1e-3);

        input.delta_time = 0.02;
        run(&mut hud, &mut mem, &input);
        let fps = hud.fps().unwrap();
        assert!(fps < 100.0 && fps > 50.0);
    }

    // ── diagnostics ───────────────────────────────────────────────────────

    #[test]
    fn diagnostics_report_input_state() {
        let mut input = input_at(Some((12.0, 34.0)), true);
        input.wheel = -1.5;
        input.modifiers.ctrl = true;
        input.keys.set(Key::A, true);
        input.chars = vec!['h', 'i'];

        let lines = diagnostics(&input, 1.0 / 60.0);
        assert!(lines.contains(&"pointer: (12, 34)".to_string()));
        assert!(lines.contains(&"wheel: -1.50".to_string()));
        assert!(lines.contains(&"buttons: L - -".to_string()));
        assert!(lines.contains(&"modifiers: - ctrl -".to_string()));
        assert!(lines.contains(&"keys: A".to_string()));
        assert!(lines.contains(&"chars: \"hi\"".to_string()));
        assert!(lines[0].contains("60.0 FPS"));
    }

    #[test]
    fn diagnostics_without_pointer() {
        let lines = diagnostics(&input_at(None, false), 0.0);
        assert!(lines.contains(&"pointer: none".to_string()));
        assert!(lines[0].contains("0.0 FPS"));
    }
}
