use cosmic::widget::image::Handle;
use gallery_config::GalleryConfig;
use gallery_types::{GalleryItem, ItemId};
use gallery_widgets::GridEvent;
use std::{path::PathBuf, sync::Arc};

pub use crate::key_binds::MenuAction;

#[derive(Debug, Clone)]
pub enum Message {
    Grid(GridEvent),
    Thumbnail(ThumbnailMessage),
    KeyBind(MenuAction),
    ToggleSelectAll,
    DeleteSelected,
    /// Ends a drag, or clears the selection when nothing is dragged.
    Escape,
    OpenFolderDialog,
    OpenPath(PathBuf),
    Seeded {
        generation: u64,
        items: Vec<GalleryItem>,
    },
    SeedFailed(Arc<String>),
    ConfigChanged(GalleryConfig),
    Cancelled,
}

#[derive(Debug, Clone)]
pub enum ThumbnailMessage {
    Ready {
        generation: u64,
        id: ItemId,
        handle: Handle,
        width: u32,
        height: u32,
    },
    Failed {
        generation: u64,
        id: ItemId,
        error: String,
    },
}
