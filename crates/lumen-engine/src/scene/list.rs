use crate::coords::Rect;

use super::{RenderCommand, ScissorCmd};

/// Recorded command stream for one frame.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `clear()` keeps the allocation, so a warmed list does not allocate per frame
///
/// # Clipping
///
/// [`push_clip`](Self::push_clip) / [`pop_clip`](Self::pop_clip) emit
/// `ScissorStart` / `ScissorEnd` markers. The list itself does not intersect
/// nested clips; the batch tracker does that when it consumes the stream.
///
/// ```ignore
/// list.push_clip(scroll_view_rect);
/// // ... push children ...
/// list.pop_clip();
/// ```
#[derive(Debug, Default)]
pub struct CommandList {
    commands: Vec<RenderCommand>,
    open_clips: u32,
}

impl CommandList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded commands. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.commands.clear();
        self.open_clips = 0;
    }

    /// Commands in recording order.
    #[inline]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of `push_clip` calls not yet matched by `pop_clip`.
    #[inline]
    pub fn open_clips(&self) -> u32 {
        self.open_clips
    }

    /// Appends a raw command.
    #[inline]
    pub fn push(&mut self, cmd: RenderCommand) {
        self.commands.push(cmd);
    }

    /// Begins a scissor region (logical pixels).
    #[inline]
    pub fn push_clip(&mut self, bounds: Rect) {
        self.open_clips += 1;
        self.push(RenderCommand::ScissorStart(ScissorCmd::new(bounds)));
    }

    /// Ends the most recent scissor region.
    ///
    /// An unmatched call still records `ScissorEnd`; consumers degrade it to a
    /// full-surface clip.
    #[inline]
    pub fn pop_clip(&mut self) {
        if self.open_clips == 0 {
            log::debug!("pop_clip without matching push_clip");
        }
        self.open_clips = self.open_clips.saturating_sub(1);
        self.push(RenderCommand::ScissorEnd);
    }
}
