//! Sized image requests for gallery tiles.
//!
//! A tile of `rows x cols` at base size `size` wants an image of
//! `size * cols` by `size * rows` pixels. Remote sources get the size as
//! crop query parameters; local files are cropped by the loader.

use crate::grid_config::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub width: u32,
    pub height: u32,
    /// Source at 1x density.
    pub src: String,
    /// Source at 2x density.
    pub src_2x: String,
}

impl ImageRequest {
    pub fn pick(&self, hidpi: bool) -> &str {
        if hidpi { &self.src_2x } else { &self.src }
    }

    /// Pixel size to decode into for the chosen density.
    pub fn pixel_size(&self, hidpi: bool) -> (u32, u32) {
        if hidpi {
            (self.width * 2, self.height * 2)
        } else {
            (self.width, self.height)
        }
    }
}

pub fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

pub fn image_request(src: &str, size: u32, span: Span) -> ImageRequest {
    let width = size * span.cols.max(1) as u32;
    let height = size * span.rows.max(1) as u32;

    if !is_remote(src) {
        return ImageRequest {
            width,
            height,
            src: src.to_string(),
            src_2x: src.to_string(),
        };
    }

    let separator = if src.contains('?') { '&' } else { '?' };
    let base = format!("{src}{separator}w={width}&h={height}&fit=crop&auto=format");

    ImageRequest {
        width,
        height,
        src_2x: format!("{base}&dpr=2"),
        src: base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_sources_are_untouched() {
        let request = image_request("/photos/fern.jpg", 121, Span::new(2, 2));
        assert_eq!(request.src, "/photos/fern.jpg");
        assert_eq!(request.src_2x, "/photos/fern.jpg");
        assert_eq!((request.width, request.height), (242, 242));
    }

    #[test]
    fn test_existing_query_is_extended() {
        let request = image_request("https://example.com/a.jpg?v=3", 100, Span::UNIT);
        assert_eq!(
            request.src,
            "https://example.com/a.jpg?v=3&w=100&h=100&fit=crop&auto=format"
        );
    }
}
