pub mod sort;
pub mod types;

pub use shared::grid_config::Span;
pub use sort::{SortMode, SortOrder};
pub use types::{GalleryItem, IdAllocator, ImageSource, Interaction, ItemId};
