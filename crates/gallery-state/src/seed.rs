//! Building the initial item list from a directory or a manifest file.

use gallery_types::{GalleryItem, IdAllocator, ImageSource, SortMode, SortOrder, Span};
use serde::Deserialize;
use shared::srcset::is_remote;
use std::{
    cmp::Ordering,
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};
use thiserror::Error;
use tokio::task::spawn_blocking;
use tracing::debug;

pub const EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "tiff", "tif", "ico", "avif",
];

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid manifest: {0}")]
    Manifest(#[from] toml::de::Error),

    #[error("Item \"{0}\" must span at least one row and one column")]
    ZeroSpan(String),

    #[error("Scan task failed: {0}")]
    Join(String),
}

pub type SeedResult<T> = Result<T, SeedError>;

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub include_hidden: bool,
    pub sort_mode: SortMode,
    pub sort_order: SortOrder,
}

/// Where a gallery gets its items from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Directory(PathBuf),
    Manifest(PathBuf),
}

impl Source {
    /// `.toml` files are manifests, a file's parent directory is scanned,
    /// directories are scanned as-is.
    pub fn from_path(path: &Path) -> Option<Self> {
        if path.is_file() {
            let is_manifest = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

            if is_manifest {
                Some(Source::Manifest(path.to_path_buf()))
            } else {
                path.parent().map(|par| Source::Directory(par.to_path_buf()))
            }
        } else if path.is_dir() {
            Some(Source::Directory(path.to_path_buf()))
        } else {
            None
        }
    }
}

pub async fn load(source: Source, options: ScanOptions) -> SeedResult<Vec<GalleryItem>> {
    match source {
        Source::Directory(dir) => {
            let paths = scan_dir(&dir, options).await?;
            Ok(items_from_paths(paths))
        }
        Source::Manifest(path) => {
            spawn_blocking(move || load_manifest(&path))
                .await
                .map_err(|e| SeedError::Join(e.to_string()))?
        }
    }
}

pub async fn scan_dir(dir: &Path, options: ScanOptions) -> SeedResult<Vec<PathBuf>> {
    let dir = dir.to_path_buf();

    spawn_blocking(move || scan_dir_sync(&dir, options))
        .await
        .map_err(|e| SeedError::Join(e.to_string()))?
}

fn scan_dir_sync(dir: &Path, options: ScanOptions) -> SeedResult<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if (options.include_hidden || !is_hidden(&path)) && is_supported_image(&path) {
            images.push(path);
        }
    }

    sort_paths(&mut images, options);

    debug!(
        "Found {} image(s) in {} sorted by {}",
        images.len(),
        dir.display(),
        options.sort_mode
    );
    Ok(images)
}

/// Order scanned files. Metadata is read once per file for date and size keys;
/// unreadable metadata sorts first.
pub fn sort_paths(paths: &mut [PathBuf], options: ScanOptions) {
    match options.sort_mode {
        SortMode::Name => paths.sort_by(|a, b| human_sort(file_name(a), file_name(b))),
        SortMode::Date => paths.sort_by_cached_key(|path| {
            fs::metadata(path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH)
        }),
        SortMode::Size => {
            paths.sort_by_cached_key(|path| fs::metadata(path).map(|meta| meta.len()).unwrap_or(0))
        }
    }

    if options.sort_order == SortOrder::Descending {
        paths.reverse();
    }
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|name| name.to_str()).unwrap_or("")
}

fn is_hidden(path: &Path) -> bool {
    file_name(path).starts_with('.')
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// One unit tile per path, titled by file stem.
pub fn items_from_paths(paths: Vec<PathBuf>) -> Vec<GalleryItem> {
    let mut ids = IdAllocator::new();

    paths
        .into_iter()
        .map(|path| {
            let title = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            GalleryItem::new(ids.allocate(), title, ImageSource::Path(path), Span::UNIT)
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default, rename = "item")]
    items: Vec<ManifestItem>,
}

#[derive(Debug, Deserialize)]
struct ManifestItem {
    title: String,
    src: String,
    #[serde(default = "one")]
    rows: u16,
    #[serde(default = "one")]
    cols: u16,
}

fn one() -> u16 {
    1
}

pub fn load_manifest(path: &Path) -> SeedResult<Vec<GalleryItem>> {
    let content = fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    parse_manifest(&content, base)
}

/// Parse manifest text. Relative paths resolve against `base`.
pub fn parse_manifest(content: &str, base: &Path) -> SeedResult<Vec<GalleryItem>> {
    let manifest: Manifest = toml::from_str(content)?;
    let mut ids = IdAllocator::new();

    manifest
        .items
        .into_iter()
        .map(|entry| {
            if entry.rows == 0 || entry.cols == 0 {
                return Err(SeedError::ZeroSpan(entry.title));
            }

            let source = if is_remote(&entry.src) {
                ImageSource::Url(entry.src)
            } else {
                let path = PathBuf::from(&entry.src);
                if path.is_absolute() {
                    ImageSource::Path(path)
                } else {
                    ImageSource::Path(base.join(path))
                }
            };

            Ok(GalleryItem::new(
                ids.allocate(),
                entry.title,
                source,
                Span::new(entry.rows, entry.cols),
            ))
        })
        .collect()
}

/// Natural ordering: digit runs compare numerically, letters case-insensitively.
pub fn human_sort(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();

    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ac), Some(bc)) => {
                if ac.is_ascii_digit() && bc.is_ascii_digit() {
                    let a_num = take_number(&mut a_chars);
                    let b_num = take_number(&mut b_chars);

                    match a_num.cmp(&b_num) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                } else {
                    a_chars.next();
                    b_chars.next();

                    let ac = ac.to_lowercase().next().unwrap_or(ac);
                    let bc = bc.to_lowercase().next().unwrap_or(bc);

                    match ac.cmp(&bc) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u64 {
    let mut value: u64 = 0;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(digit as u64);
        chars.next();
    }
    value
}
