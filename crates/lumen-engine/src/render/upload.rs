use crate::batch::FrameBuffers;

use super::{RenderCtx, RenderError};

/// Minimum element capacity of any per-frame GPU buffer.
const MIN_CAPACITY: usize = 64;

/// Grow-only GPU buffer holding `T`-sized elements.
///
/// Capacity grows to the next power of two (minimum 64 elements) and never
/// shrinks, so steady-state frames only write.
pub(crate) struct GrowableBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    elem_size: usize,
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
    len: u32,
}

impl GrowableBuffer {
    pub(crate) fn new(label: &'static str, usage: wgpu::BufferUsages, elem_size: usize) -> Self {
        Self {
            label,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            elem_size,
            buffer: None,
            capacity: 0,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    /// Elements written by the last [`write`](Self::write).
    #[inline]
    pub(crate) fn len(&self) -> u32 {
        self.len
    }

    /// Makes room for `required` elements, reallocating if needed.
    fn ensure_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) -> Result<(), RenderError> {
        if required <= self.capacity && self.buffer.is_some() {
            return Ok(());
        }

        let new_cap = grown_capacity(required);
        let size = byte_size(new_cap, self.elem_size);
        let max = ctx.device.limits().max_buffer_size;
        if size > max {
            return Err(RenderError::BufferTooLarge { label: self.label, requested: size, max });
        }

        log::debug!("{}: growing to {new_cap} elements ({size} bytes)", self.label);
        self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(self.label),
            size,
            usage: self.usage,
            mapped_at_creation: false,
        }));
        self.capacity = new_cap;
        Ok(())
    }

    /// Uploads `data` to the start of the buffer.
    pub(crate) fn write(&mut self, ctx: &RenderCtx<'_>, data: &[u8]) -> Result<(), RenderError> {
        debug_assert_eq!(data.len() % self.elem_size, 0);
        let count = data.len() / self.elem_size;
        self.len = count as u32;
        if count == 0 {
            return Ok(());
        }

        self.ensure_capacity(ctx, count)?;
        if let Some(buffer) = self.buffer.as_ref() {
            ctx.queue.write_buffer(buffer, 0, data);
        }
        Ok(())
    }
}

#[inline]
fn grown_capacity(required: usize) -> usize {
    required.next_power_of_two().max(MIN_CAPACITY)
}

#[inline]
fn byte_size(capacity: usize, elem_size: usize) -> u64 {
    // wgpu requires COPY_DST buffer sizes to be a multiple of 4.
    ((capacity * elem_size) as u64).next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT)
}

/// Copies one frame's primitive buffers to the GPU.
///
/// All three writes go through `Queue::write_buffer` in a single call, which
/// wgpu stages and flushes together on the next submit.
pub(crate) struct UploadStage {
    pub(crate) quads: GrowableBuffer,
    pub(crate) text_vertices: GrowableBuffer,
    pub(crate) text_indices: GrowableBuffer,
}

impl UploadStage {
    pub(crate) fn new() -> Self {
        use crate::batch::{QuadInstance, TextVertex};

        Self {
            quads: GrowableBuffer::new(
                "lumen quad instances",
                wgpu::BufferUsages::VERTEX,
                std::mem::size_of::<QuadInstance>(),
            ),
            text_vertices: GrowableBuffer::new(
                "lumen text vertices",
                wgpu::BufferUsages::VERTEX,
                std::mem::size_of::<TextVertex>(),
            ),
            text_indices: GrowableBuffer::new(
                "lumen text indices",
                wgpu::BufferUsages::INDEX,
                std::mem::size_of::<u32>(),
            ),
        }
    }

    pub(crate) fn upload(&mut self, ctx: &RenderCtx<'_>, frame: &FrameBuffers) -> Result<(), RenderError> {
        self.quads.write(ctx, bytemuck::cast_slice(frame.quads()))?;
        self.text_vertices.write(ctx, bytemuck::cast_slice(frame.text_vertices()))?;
        self.text_indices.write(ctx, bytemuck::cast_slice(frame.text_indices()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_rounds_up_to_power_of_two_with_floor() {
        assert_eq!(grown_capacity(1), 64);
        assert_eq!(grown_capacity(64), 64);
        assert_eq!(grown_capacity(65), 128);
        assert_eq!(grown_capacity(1000), 1024);
    }

    #[test]
    fn byte_size_is_copy_aligned() {
        assert_eq!(byte_size(64, 80), 5120);
        assert_eq!(byte_size(3, 2) % wgpu::COPY_BUFFER_ALIGNMENT, 0);
    }
}
