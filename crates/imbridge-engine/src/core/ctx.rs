use std::sync::Arc;

use winit::window::{Window, WindowId};

use crate::coords::{ColorRgba, Vec2, Viewport};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::platform::winit::WinitPlatform;
use crate::input::InputReconciler;
use crate::render::{RenderCtx, RenderTarget};
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Display size in logical pixels and the framebuffer scale.
    pub fn display(&self) -> (Viewport, Vec2) {
        let params = WinitPlatform::frame_params(self.window, 0.0);
        (params.display_size, params.framebuffer_scale)
    }

    /// Enables IME/text composition while the GUI edits text.
    pub fn set_text_input(&self, enabled: bool) {
        self.window.set_ime_allowed(enabled);
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    /// Reconciler fed by this window's events.
    pub input: &'a Arc<InputReconciler>,
    /// Pointer poll for `begin_frame`.
    pub pointer: &'a WinitPlatform,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Device handles for creating GPU resources outside a frame.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        let (display, _) = self.window.display();
        RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            display,
        )
    }

    /// Clears the surface with `clear`, calls `draw` with a ready [`RenderCtx`]
    /// and [`RenderTarget`], then presents the frame.
    ///
    /// Surface loss reconfigures and skips the frame; a fatal surface error
    /// returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: ColorRgba, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let (display, _) = self.window.display();

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface error: {err}");
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("fatal surface error; exiting");
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        // Clear pass, dropped before the encoder is moved into submit().
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("imbridge clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            display,
        );

        let size = frame.size();
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, size);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
