use crate::font::AtlasImage;

use super::device::{RenderDevice, StateGuard};
use super::{BridgeError, DrawData, TextureId};

/// Lifecycle of the font atlas texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AtlasState {
    Uninitialized,
    Ready(TextureId),
}

/// Counters for one `render_frame` call.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub batches: usize,
    pub commands: usize,
    pub callbacks: usize,
    pub draw_calls: usize,
    pub indices: usize,
}

/// Replays GUI draw data on a [`RenderDevice`] and owns the font atlas
/// texture.
///
/// The atlas image is kept after upload so the texture can be recreated after
/// [`invalidate_device_objects`](Self::invalidate_device_objects). Dropping
/// the bridge does not destroy the texture; call
/// [`release_font_atlas`](Self::release_font_atlas) while the device is alive.
pub struct DrawBridge<D: RenderDevice> {
    device: D,
    atlas: AtlasState,
    atlas_image: Option<AtlasImage>,
}

impl<D: RenderDevice> DrawBridge<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            atlas: AtlasState::Uninitialized,
            atlas_image: None,
        }
    }

    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[inline]
    pub fn atlas_state(&self) -> AtlasState {
        self.atlas
    }

    /// Texture id of the live font atlas, if any.
    #[inline]
    pub fn font_texture(&self) -> Option<TextureId> {
        match self.atlas {
            AtlasState::Ready(id) => Some(id),
            AtlasState::Uninitialized => None,
        }
    }

    /// True when an image is stored, whether or not its texture exists.
    #[inline]
    pub fn has_atlas_image(&self) -> bool {
        self.atlas_image.is_some()
    }

    /// Stores `image` for creation on the next `render_frame`.
    ///
    /// A live atlas texture is destroyed so the new image replaces it.
    pub fn set_font_atlas(&mut self, image: AtlasImage) {
        self.destroy_font_texture();
        self.atlas_image = Some(image);
    }

    /// Creates the atlas texture now. Uploading while `Ready` replaces the
    /// previous texture, so only one is ever alive.
    pub fn upload_font_atlas(&mut self, image: AtlasImage) -> Result<TextureId, BridgeError> {
        self.set_font_atlas(image);
        self.create_font_texture()
    }

    /// Destroys the atlas texture and forgets the image. Idempotent.
    pub fn release_font_atlas(&mut self) {
        self.destroy_font_texture();
        if self.atlas_image.take().is_some() {
            log::debug!("font atlas image released");
        }
    }

    /// Destroys device objects but keeps the atlas image, e.g. on context loss.
    /// The next `render_frame` recreates the texture.
    pub fn invalidate_device_objects(&mut self) {
        self.destroy_font_texture();
    }

    /// Replays `data` on the device.
    ///
    /// Device state is saved before and restored after the replay, including
    /// when a callback panics.
    ///
    /// # Panics
    ///
    /// Panics if a non-empty batch fails [`DrawBatch::validate`](super::DrawBatch::validate).
    pub fn render_frame(&mut self, data: &DrawData) -> Result<FrameStats, BridgeError> {
        if self.atlas == AtlasState::Uninitialized && self.atlas_image.is_some() {
            self.create_font_texture()?;
        }

        let mut stats = FrameStats::default();
        if data.is_empty() {
            return Ok(stats);
        }
        if !data.framebuffer_size().is_valid() {
            // minimized window: nothing visible, and the projection would divide by zero
            log::trace!("skipping frame for display {:?}", data.display_size);
            return Ok(stats);
        }

        let fb_height = data.framebuffer_size().height;
        let font_texture = self.font_texture();

        let mut device = StateGuard::new(&mut self.device);
        device.setup_render_state(data.display_size, data.framebuffer_scale);

        for batch in data.batches.iter().filter(|b| !b.is_empty()) {
            if let Err(err) = batch.validate() {
                panic!("malformed draw batch: {err}");
            }

            device.bind_vertex_data(&batch.vertices, &batch.indices);
            stats.batches += 1;

            for (run, cmd) in batch.index_runs() {
                stats.commands += 1;

                if let Some(callback) = &cmd.callback {
                    callback(batch, cmd);
                    stats.callbacks += 1;
                    continue;
                }
                if run.is_empty() {
                    continue;
                }

                let scissor = cmd
                    .clip_rect
                    .scaled(data.framebuffer_scale)
                    .to_scissor(fb_height, D::SCISSOR_ORIGIN);
                device.set_scissor(scissor);

                let texture = match (cmd.texture.is_none(), font_texture) {
                    (true, Some(font)) => font,
                    _ => cmd.texture,
                };
                device.bind_texture(texture);

                device.draw_indexed(run.start as u32, run.len() as u32);
                stats.draw_calls += 1;
                stats.indices += run.len();
            }

            device.end_batch();
        }

        Ok(stats)
    }

    fn create_font_texture(&mut self) -> Result<TextureId, BridgeError> {
        let Some(image) = self.atlas_image.as_ref() else {
            return Err(BridgeError::MissingAtlas);
        };

        let id = self
            .device
            .create_texture(image)
            .map_err(BridgeError::AtlasUpload)?;

        log::debug!(
            "font atlas texture {:?} created ({}x{} {:?})",
            id,
            image.width,
            image.height,
            image.format
        );
        self.atlas = AtlasState::Ready(id);
        Ok(id)
    }

    fn destroy_font_texture(&mut self) {
        if let AtlasState::Ready(id) = self.atlas {
            self.device.destroy_texture(id);
            self.atlas = AtlasState::Uninitialized;
            log::debug!("font atlas texture {id:?} destroyed");
        }
    }
}
