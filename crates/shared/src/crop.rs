use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, Resizer};
use image::{DynamicImage, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropError {
    #[error("Failed to resize image: {0}")]
    Resize(String),

    #[error("Invalid image dimensions")]
    InvalidDimensions,
}

pub type CropResult<T> = Result<T, CropError>;

/// Centered source window that fills a target aspect ratio without letterboxing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropFill {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub target_width: u32,
    pub target_height: u32,
}

impl CropFill {
    pub fn calculate(
        original_width: u32,
        original_height: u32,
        target_width: u32,
        target_height: u32,
    ) -> Self {
        let target_width = target_width.max(1);
        let target_height = target_height.max(1);

        if original_width == 0 || original_height == 0 {
            return Self {
                left: 0,
                top: 0,
                width: original_width,
                height: original_height,
                target_width,
                target_height,
            };
        }

        let source_ratio = original_width as f64 / original_height as f64;
        let target_ratio = target_width as f64 / target_height as f64;

        let (width, height) = if source_ratio > target_ratio {
            // Too wide: trim the sides
            let w = (original_height as f64 * target_ratio).round() as u32;
            (w.clamp(1, original_width), original_height)
        } else {
            // Too tall: trim top and bottom
            let h = (original_width as f64 / target_ratio).round() as u32;
            (original_width, h.clamp(1, original_height))
        };

        Self {
            left: (original_width - width) / 2,
            top: (original_height - height) / 2,
            width,
            height,
            target_width,
            target_height,
        }
    }

    pub fn is_identity(&self, original_width: u32, original_height: u32) -> bool {
        self.left == 0
            && self.top == 0
            && self.width == original_width
            && self.height == original_height
            && self.width == self.target_width
            && self.height == self.target_height
    }
}

/// Crop `image` to the target aspect (centered) and scale it to the target size.
pub fn crop_to_fill(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
) -> CropResult<(RgbaImage, CropFill)> {
    let (original_width, original_height) = (image.width(), image.height());
    if original_width == 0 || original_height == 0 {
        return Err(CropError::InvalidDimensions);
    }

    let fill = CropFill::calculate(original_width, original_height, target_width, target_height);
    let rgba = image.to_rgba8();

    if fill.is_identity(original_width, original_height) {
        return Ok((rgba, fill));
    }

    let window = image::imageops::crop_imm(&rgba, fill.left, fill.top, fill.width, fill.height)
        .to_image();

    let src_image = Image::from_vec_u8(fill.width, fill.height, window.into_raw(), PixelType::U8x4)
        .map_err(|e| CropError::Resize(e.to_string()))?;

    let mut dst_image = Image::new(fill.target_width, fill.target_height, PixelType::U8x4);

    let mut resizer = Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, None)
        .map_err(|e| CropError::Resize(e.to_string()))?;

    let output = RgbaImage::from_raw(fill.target_width, fill.target_height, dst_image.into_vec())
        .ok_or(CropError::InvalidDimensions)?;

    Ok((output, fill))
}
