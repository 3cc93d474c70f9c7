use super::DrawIdx;

/// Structural violation inside a [`DrawBatch`](super::DrawBatch).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("command {command} ends at index {end}, past the {len} indices of the batch")]
    RunOverflow { command: usize, end: usize, len: usize },

    #[error("commands cover {covered} of {len} indices")]
    UncoveredIndices { covered: usize, len: usize },

    #[error("index {index} at position {position} refers past {vertex_count} vertices")]
    VertexOutOfRange {
        position: usize,
        index: DrawIdx,
        vertex_count: usize,
    },
}

/// Failure reported by a [`RenderDevice`](super::RenderDevice).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("image has zero size ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("image data is {actual} bytes, expected {expected}")]
    PixelSizeMismatch { expected: usize, actual: usize },

    #[error("texture {width}x{height} exceeds the device limit of {max}")]
    TextureTooLarge { width: u32, height: u32, max: u32 },

    #[error("texture creation failed: {0}")]
    Backend(String),
}

/// Error returned by [`DrawBridge`](super::DrawBridge) operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("font atlas upload failed")]
    AtlasUpload(#[source] DeviceError),

    #[error("no font atlas image has been set")]
    MissingAtlas,
}
