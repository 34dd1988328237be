use std::collections::HashMap;

use crate::scene::ElementId;

use super::{FontId, TextError, TextHandle, TextShaper};

struct TextCacheEntry {
    handle: TextHandle,
    text: String,
    font: FontId,
    size: f32,
    last_seen: u64,
}

/// Shaped-text handles keyed by stable element id.
///
/// Lifecycle per id:
/// - first sight: one `TextShaper::create`
/// - same string on later frames: no shaper call at all
/// - changed string: one `TextShaper::set_text` on the existing handle
/// - changed font or size: the handle is released and recreated
/// - not seen for more than the idle budget: evicted by [`sweep`](Self::sweep)
///
/// An id names one element per frame. A second request for the same id in
/// the same frame is refused with [`TextError::DuplicateId`], so the handle
/// shaped for the first occurrence is never overwritten mid-frame.
#[derive(Default)]
pub struct TextCache {
    entries: HashMap<ElementId, TextCacheEntry>,
}

impl TextCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: ElementId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Handle currently cached for `id`.
    #[inline]
    pub fn handle(&self, id: ElementId) -> Option<TextHandle> {
        self.entries.get(&id).map(|e| e.handle)
    }

    /// Returns the handle for `id`, creating it on first sight, and marks the
    /// entry as seen in `frame`.
    ///
    /// The stored string is not compared here; follow up with
    /// [`update_if_changed`](Self::update_if_changed). Fails with
    /// [`TextError::DuplicateId`] when `id` was already requested in `frame`.
    pub fn get_or_create<S: TextShaper + ?Sized>(
        &mut self,
        shaper: &mut S,
        id: ElementId,
        font: FontId,
        size: f32,
        text: &str,
        frame: u64,
    ) -> Result<TextHandle, TextError> {
        if let Some(entry) = self.entries.get_mut(&id) {
            if entry.last_seen == frame {
                return Err(TextError::DuplicateId(id));
            }
            if entry.font == font && entry.size == size {
                entry.last_seen = frame;
                return Ok(entry.handle);
            }
            log::debug!("text {id:?}: font/size changed, recreating handle");
            shaper.release(entry.handle);
            self.entries.remove(&id);
        }

        let handle = shaper.create(font, size, text)?;
        self.entries.insert(id, TextCacheEntry {
            handle,
            text: text.to_owned(),
            font,
            size,
            last_seen: frame,
        });
        Ok(handle)
    }

    /// Reshapes the entry for `id` if `text` differs from the last shaped
    /// string. Returns whether the shaper was called.
    pub fn update_if_changed<S: TextShaper + ?Sized>(
        &mut self,
        shaper: &mut S,
        id: ElementId,
        text: &str,
    ) -> Result<bool, TextError> {
        let Some(entry) = self.entries.get_mut(&id) else {
            return Ok(false);
        };
        if entry.text == text {
            return Ok(false);
        }

        shaper.set_text(entry.handle, text)?;
        entry.text.clear();
        entry.text.push_str(text);
        Ok(true)
    }

    /// Evicts entries not seen during the last `max_idle_frames` frames and
    /// releases their handles. Returns the number of evicted entries.
    pub fn sweep<S: TextShaper + ?Sized>(
        &mut self,
        shaper: &mut S,
        frame: u64,
        max_idle_frames: u64,
    ) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| {
            let keep = frame.saturating_sub(e.last_seen) <= max_idle_frames;
            if !keep {
                shaper.release(e.handle);
            }
            keep
        });
        before - self.entries.len()
    }

    /// Releases every handle.
    pub fn clear<S: TextShaper + ?Sized>(&mut self, shaper: &mut S) {
        for (_, e) in self.entries.drain() {
            shaper.release(e.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::testing::RecordingShaper;

    const FONT: FontId = FontId(0);

    fn id(v: u64) -> ElementId {
        ElementId(v)
    }

    #[test]
    fn first_sight_creates_exactly_once() {
        let mut shaper = RecordingShaper::default();
        let mut cache = TextCache::new();

        let h = cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "hello", 0).unwrap();
        assert_eq!(shaper.creates, 1);
        assert_eq!(cache.handle(id(1)), Some(h));
    }

    #[test]
    fn unchanged_string_does_not_reshape() {
        let mut shaper = RecordingShaper::default();
        let mut cache = TextCache::new();

        for frame in 0..3 {
            cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "static", frame).unwrap();
            assert!(!cache.update_if_changed(&mut shaper, id(1), "static").unwrap());
        }
        assert_eq!(shaper.creates, 1);
        assert_eq!(shaper.set_texts, 0);
    }

    #[test]
    fn repeated_id_within_one_frame_is_refused() {
        let mut shaper = RecordingShaper::default();
        let mut cache = TextCache::new();

        let h = cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "ab", 0).unwrap();
        let err = cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "wxyz", 0).unwrap_err();
        assert_eq!(err, TextError::DuplicateId(id(1)));
        assert_eq!(shaper.geometry(h).unwrap().vertex_count(), 8);

        // Next frame the id is usable again.
        assert_eq!(cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "ab", 1).unwrap(), h);
        assert_eq!(shaper.creates, 1);
    }

    #[test]
    fn changed_string_reshapes_in_place() {
        let mut shaper = RecordingShaper::default();
        let mut cache = TextCache::new();

        let h0 = cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "a", 0).unwrap();
        let h1 = cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "ab", 1).unwrap();
        assert!(cache.update_if_changed(&mut shaper, id(1), "ab").unwrap());

        assert_eq!(h0, h1);
        assert_eq!(shaper.creates, 1);
        assert_eq!(shaper.set_texts, 1);
        assert_eq!(shaper.geometry(h1).unwrap().vertex_count(), 8);
    }

    #[test]
    fn size_change_recreates_handle() {
        let mut shaper = RecordingShaper::default();
        let mut cache = TextCache::new();

        cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "a", 0).unwrap();
        cache.get_or_create(&mut shaper, id(1), FONT, 24.0, "a", 1).unwrap();

        assert_eq!(shaper.creates, 2);
        assert_eq!(shaper.releases, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_create_leaves_no_entry() {
        let mut shaper = RecordingShaper::failing_on("boom");
        let mut cache = TextCache::new();

        assert!(cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "boom", 0).is_err());
        assert!(!cache.contains(id(1)));
    }

    #[test]
    fn failed_update_keeps_old_string_for_retry() {
        let mut shaper = RecordingShaper::failing_on("boom");
        let mut cache = TextCache::new();

        cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "ok", 0).unwrap();
        assert!(cache.update_if_changed(&mut shaper, id(1), "boom").is_err());
        assert!(cache.update_if_changed(&mut shaper, id(1), "boom").is_err());
        assert_eq!(shaper.set_texts, 2);
    }

    #[test]
    fn sweep_evicts_idle_entries_and_releases_handles() {
        let mut shaper = RecordingShaper::default();
        let mut cache = TextCache::new();

        cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "kept", 0).unwrap();
        cache.get_or_create(&mut shaper, id(2), FONT, 12.0, "gone", 0).unwrap();
        cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "kept", 3).unwrap();

        assert_eq!(cache.sweep(&mut shaper, 3, 2), 1);
        assert!(cache.contains(id(1)));
        assert!(!cache.contains(id(2)));
        assert_eq!(shaper.releases, 1);
    }

    #[test]
    fn sweep_with_zero_budget_keeps_current_frame_only() {
        let mut shaper = RecordingShaper::default();
        let mut cache = TextCache::new();

        cache.get_or_create(&mut shaper, id(1), FONT, 12.0, "a", 4).unwrap();
        cache.get_or_create(&mut shaper, id(2), FONT, 12.0, "b", 5).unwrap();
        assert_eq!(cache.sweep(&mut shaper, 5, 0), 1);
        assert!(cache.contains(id(2)));
    }

    #[test]
    fn clear_releases_everything() {
        let mut shaper = RecordingShaper::default();
        let mut cache = TextCache::new();
        for i in 0..4 {
            cache.get_or_create(&mut shaper, id(i), FONT, 12.0, "x", 0).unwrap();
        }
        cache.clear(&mut shaper);
        assert!(cache.is_empty());
        assert_eq!(shaper.releases, 4);
    }
}
