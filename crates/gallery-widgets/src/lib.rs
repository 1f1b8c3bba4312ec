pub mod gallery_grid;
pub mod quilt_core;

pub use gallery_grid::{GalleryGrid, GalleryTile, GridEvent, TileStyle, gallery_grid};
