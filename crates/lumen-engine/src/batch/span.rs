use core::ops::Range;

/// Half-open `[start, start + len)` range into a per-frame buffer.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Span {
    pub start: u32,
    pub len: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    /// Zero-length span positioned at `start`.
    #[inline]
    pub const fn empty_at(start: u32) -> Self {
        Self { start, len: 0 }
    }

    #[inline]
    pub const fn end(self) -> u32 {
        self.start + self.len
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Empty span starting where this one ends.
    #[inline]
    pub const fn after(self) -> Self {
        Self::empty_at(self.end())
    }

    #[inline]
    pub fn grow(&mut self, n: u32) {
        self.len += n;
    }

    #[inline]
    pub fn range(self) -> Range<u32> {
        self.start..self.end()
    }

    #[inline]
    pub fn usize_range(self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_continues_at_end() {
        let s = Span::new(3, 4);
        assert_eq!(s.end(), 7);
        assert_eq!(s.after(), Span::empty_at(7));
    }

    #[test]
    fn grow_extends_len_only() {
        let mut s = Span::empty_at(5);
        s.grow(2);
        assert_eq!(s, Span::new(5, 2));
        assert_eq!(s.range(), 5..7);
    }
}
