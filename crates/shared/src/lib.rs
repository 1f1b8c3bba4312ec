pub mod crop;
pub mod grid_config;
pub mod srcset;

pub use grid_config::{GridConfigError, Placement, QuiltConfig, QuiltLayout, Span};
pub use srcset::{ImageRequest, image_request};
