use cosmic::widget::image::Handle;
use gallery_types::ImageSource;
use once_cell::sync::Lazy;
use shared::{
    crop::{CropError, crop_to_fill},
    srcset::ImageRequest,
};
use std::{
    fmt::{self, Debug, Formatter},
    path::Path,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Failed to fetch image: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Failed to crop image: {0}")]
    Crop(#[from] CropError),
    #[error("Task cancelled")]
    Cancelled,
}

#[derive(Clone)]
pub struct LoadedImage {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

impl Debug for LoadedImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

static CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Load a tile image sized for `request`, cropped to fill the tile.
pub async fn load_thumbnail(
    source: ImageSource,
    request: ImageRequest,
    hidpi: bool,
) -> Result<LoadedImage, LoadError> {
    let (width, height) = request.pixel_size(hidpi);

    let encoded = match source {
        ImageSource::Path(path) => Encoded::File(path),
        ImageSource::Url(_) => {
            let url = request.pick(hidpi);
            tracing::debug!("Fetching {url}");
            let bytes = CLIENT
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            Encoded::Bytes(bytes.to_vec())
        }
    };

    let (tx, rx) = tokio::sync::oneshot::channel();

    rayon::spawn(move || {
        let result = decode_and_crop(&encoded, width, height);
        let _ = tx.send(result);
    });

    rx.await.map_err(|_| LoadError::Cancelled)?
}

enum Encoded {
    File(std::path::PathBuf),
    Bytes(Vec<u8>),
}

fn decode_and_crop(encoded: &Encoded, width: u32, height: u32) -> Result<LoadedImage, LoadError> {
    let img = match encoded {
        Encoded::File(path) => open(path)?,
        Encoded::Bytes(bytes) => image::load_from_memory(bytes)?,
    };

    let (rgba, _) = crop_to_fill(&img, width, height)?;
    let (width, height) = rgba.dimensions();
    let handle = Handle::from_rgba(width, height, rgba.into_raw());

    Ok(LoadedImage {
        handle,
        width,
        height,
    })
}

fn open(path: &Path) -> Result<image::DynamicImage, LoadError> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.decode()?)
}
