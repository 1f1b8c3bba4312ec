use serde::{Deserialize, Serialize};
use shared::grid_config::Span;
use std::{fmt, path::PathBuf};

/// Stable identity of a gallery item, independent of its title or image source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out ids at ingestion time. One allocator per seeded gallery.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSource {
    Path(PathBuf),
    Url(String),
}

impl ImageSource {
    pub fn as_src(&self) -> String {
        match self {
            ImageSource::Path(path) => path.to_string_lossy().into_owned(),
            ImageSource::Url(url) => url.clone(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ImageSource::Url(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub id: ItemId,
    pub title: String,
    pub source: ImageSource,
    pub span: Span,
}

impl GalleryItem {
    pub fn new(id: ItemId, title: impl Into<String>, source: ImageSource, span: Span) -> Self {
        Self {
            id,
            title: title.into(),
            source,
            span,
        }
    }
}

/// Transient pointer state for one gallery view.
///
/// `hovered` is the tile under the pointer (or the current drop target while
/// dragging), `dragged` is the tile being carried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interaction {
    hovered: Option<ItemId>,
    dragged: Option<ItemId>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<ItemId> {
        self.hovered
    }

    pub fn dragged(&self) -> Option<ItemId> {
        self.dragged
    }

    /// The carried tile is never its own hover target.
    pub fn start_drag(&mut self, id: ItemId) -> bool {
        let mut changed = self.dragged != Some(id);
        self.dragged = Some(id);

        if self.hovered == Some(id) {
            self.hovered = None;
            changed = true;
        }
        changed
    }

    /// Hover `id` unless it is the tile being dragged.
    pub fn hover(&mut self, id: ItemId) -> bool {
        if self.dragged == Some(id) || self.hovered == Some(id) {
            return false;
        }

        self.hovered = Some(id);
        true
    }

    /// Clear the hover only if it still points at `id`; a newer target wins.
    pub fn unhover(&mut self, id: ItemId) -> bool {
        if self.hovered != Some(id) {
            return false;
        }

        self.hovered = None;
        true
    }

    pub fn reset(&mut self) -> bool {
        let changed = self.hovered.is_some() || self.dragged.is_some();
        *self = Self::default();
        changed
    }
}
