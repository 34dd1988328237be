/// Stable identifier of a UI element across frames.
///
/// Layout engines hand the same id to the same logical element every frame;
/// the text cache keys its shaped-text handles on it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElementId(pub u64);

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

impl ElementId {
    #[inline]
    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    /// Derives an id from a string label (FNV-1a), stable across runs.
    pub const fn from_label(label: &str) -> Self {
        let bytes = label.as_bytes();
        let mut hash = FNV_OFFSET;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Derives the id of the `index`-th child of this element.
    #[inline]
    pub const fn child(self, index: u64) -> Self {
        Self((self.0 ^ index.wrapping_add(1)).wrapping_mul(FNV_PRIME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_is_deterministic() {
        assert_eq!(ElementId::from_label("title"), ElementId::from_label("title"));
        assert_ne!(ElementId::from_label("title"), ElementId::from_label("subtitle"));
    }

    #[test]
    fn from_label_empty_is_offset_basis() {
        assert_eq!(ElementId::from_label(""), ElementId(FNV_OFFSET));
    }

    #[test]
    fn children_are_distinct() {
        let parent = ElementId::from_label("list");
        assert_ne!(parent.child(0), parent.child(1));
        assert_ne!(parent.child(0), parent);
    }
}
