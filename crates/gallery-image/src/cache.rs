use cosmic::widget::image::Handle;
use gallery_types::ItemId;
use lru::LruCache;
use std::{collections::HashSet, num::NonZeroUsize};

/// Most loads allowed in flight at once.
pub const MAX_PENDING: usize = 8;

#[derive(Clone)]
pub struct CachedImage {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for CachedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Decoded tile images keyed by item, plus the loads in flight.
///
/// In-flight loads are tracked apart from the cached images: evicting or
/// removing an image does not forget a load that is still running, so the
/// [`MAX_PENDING`] budget holds across deletes and reseeds.
pub struct ThumbnailCache {
    thumbnails: LruCache<ItemId, CachedImage>,
    in_flight: HashSet<ItemId>,
    failed: HashSet<ItemId>,
    cursor: usize,
}

impl ThumbnailCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            thumbnails: LruCache::new(capacity_of(capacity)),
            in_flight: HashSet::new(),
            failed: HashSet::new(),
            cursor: 0,
        }
    }

    pub fn resize(&mut self, capacity: usize) {
        self.thumbnails.resize(capacity_of(capacity));
    }

    /// Looks up without touching recency, so drawing does not need `&mut`.
    pub fn get(&self, id: ItemId) -> Option<&CachedImage> {
        self.thumbnails.peek(&id)
    }

    pub fn insert(&mut self, id: ItemId, image: CachedImage) {
        self.failed.remove(&id);
        self.thumbnails.put(id, image);
    }

    /// Mark a load as failed so it is not retried for this gallery.
    pub fn mark_failed(&mut self, id: ItemId) {
        self.failed.insert(id);
    }

    /// A load for `id` came back, successfully or not.
    pub fn finish_load(&mut self, id: ItemId) {
        self.in_flight.remove(&id);
    }

    pub fn remove(&mut self, id: ItemId) {
        self.thumbnails.pop(&id);
        self.failed.remove(&id);
    }

    /// True when `id` has neither an image, a load in flight, nor a recorded failure.
    pub fn needs_load(&self, id: ItemId) -> bool {
        !self.thumbnails.contains(&id) && !self.in_flight.contains(&id) && !self.failed.contains(&id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Slots left before reaching [`MAX_PENDING`].
    pub fn free_slots(&self) -> usize {
        MAX_PENDING.saturating_sub(self.in_flight.len())
    }

    /// Pick the next ids of `ids` to load and mark them in flight.
    ///
    /// The scan resumes after the last pick and wraps around once, so an
    /// image evicted after the scan passed it is picked up again.
    pub fn schedule(&mut self, ids: &[ItemId]) -> Vec<ItemId> {
        let mut picked = Vec::new();
        if ids.is_empty() {
            return picked;
        }

        let start = self.cursor % ids.len();
        for offset in 0..ids.len() {
            if self.free_slots() == 0 {
                break;
            }

            let index = (start + offset) % ids.len();
            let id = ids[index];
            if self.needs_load(id) {
                self.in_flight.insert(id);
                picked.push(id);
                self.cursor = index + 1;
            }
        }

        picked
    }

    /// Restart the next [`schedule`](Self::schedule) scan from the first item.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.thumbnails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thumbnails.is_empty()
    }

    /// Drop every image and failure. Loads still in flight keep their slots.
    pub fn clear(&mut self) {
        self.thumbnails.clear();
        self.failed.clear();
        self.cursor = 0;
    }
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self::new(200)
    }
}

fn capacity_of(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN)
}
