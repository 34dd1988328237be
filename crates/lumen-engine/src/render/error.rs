use thiserror::Error;

/// Fatal rendering failures. The runtime logs these and exits.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A per-frame buffer would exceed the device's `max_buffer_size`.
    #[error("{label}: {requested} bytes exceeds device max_buffer_size ({max})")]
    BufferTooLarge {
        label: &'static str,
        requested: u64,
        max: u64,
    },

    /// The glyph atlas does not fit the device's 2D texture limit.
    #[error("glyph atlas {size}x{size} exceeds max_texture_dimension_2d ({max})")]
    AtlasTooLarge { size: u32, max: u32 },

    /// `draw` was called before `prepare` produced GPU buffers.
    #[error("draw called before prepare")]
    NotPrepared,
}
