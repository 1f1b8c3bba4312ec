pub mod cache;
pub mod loader;

pub use cache::{CachedImage, ThumbnailCache};
pub use loader::{LoadError, LoadedImage, load_thumbnail};
