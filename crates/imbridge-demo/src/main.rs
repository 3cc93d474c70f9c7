use std::sync::Arc;

use anyhow::{Context as _, Result};
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use imbridge_engine::Context;
use imbridge_engine::coords::{ColorRgba, Vec2};
use imbridge_engine::core::{App, AppControl, FrameCtx};
use imbridge_engine::device::GpuInit;
use imbridge_engine::font::{FontAtlas, FontAtlasConfig};
use imbridge_engine::input::InputPolicy;
use imbridge_engine::logging::{LoggingConfig, init_logging};
use imbridge_engine::render::WgpuBackend;
use imbridge_engine::window::{Runtime, RuntimeConfig};
use imbridge_hud::{DebugHud, Overlay, OverlayMemory, OverlayStyle};

const FONT_ENV: &str = "IMBRIDGE_FONT";

const SYSTEM_FONTS: [&str; 5] = [
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let atlas = load_atlas()?;
    let config = RuntimeConfig {
        title: "imbridge demo".to_string(),
        initial_size: LogicalSize::new(1024.0, 576.0),
        input_policy: InputPolicy::default(),
    };

    Runtime::run(config, GpuInit::default(), Demo::new(atlas))
}

/// Font from `$IMBRIDGE_FONT`, else the first system font found, else the
/// glyph-less atlas.
fn load_atlas() -> Result<FontAtlas> {
    let config = FontAtlasConfig::default();

    if let Ok(path) = std::env::var(FONT_ENV) {
        let bytes = std::fs::read(&path).with_context(|| format!("failed to read font {path}"))?;
        return FontAtlas::from_font_bytes(&bytes, &config)
            .with_context(|| format!("failed to build font atlas from {path}"));
    }

    for path in SYSTEM_FONTS {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        match FontAtlas::from_font_bytes(&bytes, &config) {
            Ok(atlas) => {
                log::info!("font atlas built from {path}");
                return Ok(atlas);
            }
            Err(e) => log::warn!("skipping {path}: {e}"),
        }
    }

    log::warn!("no font found; set {FONT_ENV} to a .ttf file. Text renders as boxes");
    Ok(FontAtlas::solid_only())
}

struct Demo {
    atlas: FontAtlas,
    context: Option<Context<WgpuBackend>>,

    memory: OverlayMemory,
    style: OverlayStyle,
    hud: DebugHud,

    clear_color: [f32; 4],
    value: f32,
    show_another_window: bool,
    text_input: bool,
}

impl Demo {
    fn new(atlas: FontAtlas) -> Self {
        Self {
            atlas,
            context: None,
            memory: OverlayMemory::new(),
            style: OverlayStyle::default(),
            hud: DebugHud::new(),
            clear_color: [114.0 / 255.0, 144.0 / 255.0, 154.0 / 255.0, 1.0],
            value: 0.0,
            show_another_window: false,
            text_input: false,
        }
    }
}

impl App for Demo {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if !event.state.is_pressed() || event.repeat {
            return AppControl::Continue;
        }

        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
            PhysicalKey::Code(KeyCode::F1) => {
                self.hud.show_example_window = !self.hud.show_example_window;
            }
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let context = self.context.get_or_insert_with(|| {
            let backend = WgpuBackend::new(&ctx.render_ctx());
            let mut context = Context::with_input(Arc::clone(ctx.input), backend);
            context.set_font_atlas(self.atlas.image().clone());
            context
        });

        let (display, scale) = ctx.window.display();
        let input = context.new_frame(ctx.pointer, display, scale);

        let mut ui = Overlay::new(&input, &self.atlas, &mut self.memory, &self.style);
        let hud = &mut self.hud;
        let fps = hud.fps().unwrap_or(0.0);
        let (clear_color, value, show_another) =
            (&mut self.clear_color, &mut self.value, &mut self.show_another_window);
        let text_input = &mut self.text_input;
        let mut text_input_changed = false;

        ui.window("Debug", &mut true, Vec2::new(20.0, 320.0), |ui| {
            ui.label("Hello, world!");
            ui.slider("float", value, 0.0, 1.0);
            ui.color_edit("clear color", clear_color);
            if ui.button("Test Window") {
                hud.show_test_window = !hud.show_test_window;
            }
            if ui.button("Another Window") {
                *show_another = !*show_another;
            }
            text_input_changed = ui.checkbox("capture text", text_input);
            ui.label(&format!("{:.3} ms/frame ({fps:.1} FPS)", 1000.0 / fps.max(1.0)));
        });
        ui.window("Another Window", show_another, Vec2::new(660.0, 320.0), |ui| {
            ui.label("Hello");
        });
        hud.do_interface(&mut ui);

        let data = ui.finish();
        if text_input_changed {
            // typed characters show up in the test window's diagnostics
            context.set_wants_text_input(self.text_input);
            ctx.window.set_text_input(self.text_input);
        }
        if let Err(e) = context.render(&data) {
            log::error!("gui frame dropped: {e}");
        }

        let clear = ColorRgba::from_array(self.clear_color);
        ctx.render(clear, |rctx, target| context.backend_mut().encode(rctx, target))
    }

    fn on_close(&mut self, _window_id: WindowId) {
        if let Some(mut context) = self.context.take() {
            context.shutdown();
        }
    }
}
