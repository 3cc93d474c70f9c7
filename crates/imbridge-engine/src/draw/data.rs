use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use crate::coords::{ClipRect, Vec2, Viewport};

use super::BatchError;

/// Vertex as emitted by the GUI: position, atlas UV and packed RGBA8 colour
/// (red in the low byte).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DrawVert {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub col: u32,
}

impl DrawVert {
    #[inline]
    pub const fn new(pos: [f32; 2], uv: [f32; 2], col: u32) -> Self {
        Self { pos, uv, col }
    }
}

pub type DrawIdx = u16;

/// Device texture handle. `TextureId::NONE` resolves to the font atlas.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TextureId(pub u64);

impl TextureId {
    pub const NONE: TextureId = TextureId(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// Hook invoked in place of the default draw for a command.
pub type UserCallback = Arc<dyn Fn(&DrawBatch, &DrawCmd) + Send + Sync>;

/// One run of indices sharing a clip rectangle and texture.
#[derive(Clone)]
pub struct DrawCmd {
    pub elem_count: u32,
    pub clip_rect: ClipRect,
    pub texture: TextureId,
    pub callback: Option<UserCallback>,
}

impl DrawCmd {
    pub fn new(elem_count: u32, clip_rect: ClipRect, texture: TextureId) -> Self {
        Self {
            elem_count,
            clip_rect,
            texture,
            callback: None,
        }
    }

    /// Command that consumes no indices and runs `f` during replay.
    pub fn with_callback<F>(clip_rect: ClipRect, f: F) -> Self
    where
        F: Fn(&DrawBatch, &DrawCmd) + Send + Sync + 'static,
    {
        Self {
            elem_count: 0,
            clip_rect,
            texture: TextureId::NONE,
            callback: Some(Arc::new(f)),
        }
    }
}

impl fmt::Debug for DrawCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawCmd")
            .field("elem_count", &self.elem_count)
            .field("clip_rect", &self.clip_rect)
            .field("texture", &self.texture)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Vertex/index streams plus the commands that partition the indices.
///
/// Commands consume `indices` in order: command `i` covers the
/// `elem_count` indices following those of command `i - 1`.
#[derive(Debug, Clone, Default)]
pub struct DrawBatch {
    pub vertices: Vec<DrawVert>,
    pub indices: Vec<DrawIdx>,
    pub commands: Vec<DrawCmd>,
}

impl DrawBatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Checks that commands partition the indices exactly and every index
    /// names an existing vertex.
    pub fn validate(&self) -> Result<(), BatchError> {
        let len = self.indices.len();
        let mut offset = 0usize;
        for (command, cmd) in self.commands.iter().enumerate() {
            let end = offset + cmd.elem_count as usize;
            if end > len {
                return Err(BatchError::RunOverflow { command, end, len });
            }
            offset = end;
        }
        if offset != len {
            return Err(BatchError::UncoveredIndices { covered: offset, len });
        }

        let vertex_count = self.vertices.len();
        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= vertex_count)
        {
            return Err(BatchError::VertexOutOfRange {
                position,
                index,
                vertex_count,
            });
        }
        Ok(())
    }

    /// Index range covered by each command, in order.
    ///
    /// Ranges are derived from `elem_count` alone; call [`validate`](Self::validate)
    /// first if the batch is untrusted.
    pub fn index_runs(&self) -> impl Iterator<Item = (Range<usize>, &DrawCmd)> + '_ {
        self.commands.iter().scan(0usize, |offset, cmd| {
            let start = *offset;
            *offset += cmd.elem_count as usize;
            Some((start..*offset, cmd))
        })
    }
}

/// Everything the GUI produced for one frame.
#[derive(Debug, Clone)]
pub struct DrawData {
    pub batches: Vec<DrawBatch>,
    /// Display size in logical pixels; the projection covers exactly this.
    pub display_size: Viewport,
    /// Framebuffer pixels per display pixel.
    pub framebuffer_scale: Vec2,
}

impl DrawData {
    pub fn new(display_size: Viewport, framebuffer_scale: Vec2) -> Self {
        Self {
            batches: Vec::new(),
            display_size,
            framebuffer_scale,
        }
    }

    /// True when no batch has any vertex; rendering such data is a no-op.
    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(DrawBatch::is_empty)
    }

    pub fn total_vertices(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }

    pub fn total_indices(&self) -> usize {
        self.batches.iter().map(|b| b.indices.len()).sum()
    }

    /// Framebuffer size in device pixels.
    #[inline]
    pub fn framebuffer_size(&self) -> Viewport {
        self.display_size.scaled(self.framebuffer_scale)
    }
}
