use cosmic::cosmic_config::{self, Config, ConfigGet, ConfigSet, CosmicConfigEntry};
use gallery_types::{SortMode, SortOrder};
use serde::{Deserialize, Serialize};
use shared::grid_config::QuiltConfig;

pub const CONFIG_VERSION: u64 = 1;
const APP_ID: &str = "org.codeberg.gallery.Gallery";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryConfig {
    pub columns: u16,
    pub row_height: u16,
    pub spacing: u16,
    pub corner_radius: f32,
    /// Scale applied to hovered or selected tiles.
    pub emphasis_scale: f32,
    /// Rotation in degrees applied to hovered or selected tiles.
    pub emphasis_rotation: f32,
    pub hover_overlay_alpha: f32,
    /// Request 2x images from remote sources.
    pub hidpi_images: bool,
    pub show_hidden_files: bool,
    pub sort_mode: SortMode,
    pub sort_order: SortOrder,
    pub thumbnail_cache_size: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            columns: 5,
            row_height: 121,
            spacing: 4,
            corner_radius: 10.0,
            emphasis_scale: 1.1,
            emphasis_rotation: 3.0,
            hover_overlay_alpha: 0.5,
            hidpi_images: true,
            show_hidden_files: false,
            sort_mode: SortMode::default(),
            sort_order: SortOrder::default(),
            thumbnail_cache_size: 200,
        }
    }
}

impl GalleryConfig {
    /// Grid geometry, falling back to the defaults when the stored values are unusable.
    pub fn grid(&self) -> QuiltConfig {
        let grid = QuiltConfig::new(self.columns, self.row_height).with_spacing(self.spacing);

        match grid.validate() {
            Ok(()) => grid,
            Err(err) => {
                tracing::warn!("Invalid grid configuration, using defaults: {err}");
                let defaults = Self::default();
                QuiltConfig::new(defaults.columns, defaults.row_height)
                    .with_spacing(defaults.spacing)
            }
        }
    }
}

impl CosmicConfigEntry for GalleryConfig {
    const VERSION: u64 = CONFIG_VERSION;

    fn write_entry(&self, config: &cosmic_config::Config) -> Result<(), cosmic_config::Error> {
        config.set("columns", self.columns)?;
        config.set("row_height", self.row_height)?;
        config.set("spacing", self.spacing)?;
        config.set("corner_radius", self.corner_radius)?;
        config.set("emphasis_scale", self.emphasis_scale)?;
        config.set("emphasis_rotation", self.emphasis_rotation)?;
        config.set("hover_overlay_alpha", self.hover_overlay_alpha)?;
        config.set("hidpi_images", self.hidpi_images)?;
        config.set("show_hidden_files", self.show_hidden_files)?;
        config.set("sort_mode", self.sort_mode)?;
        config.set("sort_order", self.sort_order)?;
        config.set("thumbnail_cache_size", self.thumbnail_cache_size)?;
        Ok(())
    }

    fn get_entry(
        config: &cosmic_config::Config,
    ) -> Result<Self, (Vec<cosmic_config::Error>, Self)> {
        let mut errors = Vec::new();
        let mut cfg = GalleryConfig::default();

        macro_rules! get_field {
            ($name:literal, $field:ident, $type:ty) => {
                match config.get::<$type>($name) {
                    Ok(val) => cfg.$field = val,
                    Err(e) => errors.push(e),
                }
            };
        }

        get_field!("columns", columns, u16);
        get_field!("row_height", row_height, u16);
        get_field!("spacing", spacing, u16);
        get_field!("corner_radius", corner_radius, f32);
        get_field!("emphasis_scale", emphasis_scale, f32);
        get_field!("emphasis_rotation", emphasis_rotation, f32);
        get_field!("hover_overlay_alpha", hover_overlay_alpha, f32);
        get_field!("hidpi_images", hidpi_images, bool);
        get_field!("show_hidden_files", show_hidden_files, bool);
        get_field!("sort_mode", sort_mode, SortMode);
        get_field!("sort_order", sort_order, SortOrder);
        get_field!("thumbnail_cache_size", thumbnail_cache_size, usize);

        if errors.is_empty() {
            Ok(cfg)
        } else {
            Err((errors, cfg))
        }
    }

    fn update_keys<T: AsRef<str>>(
        &mut self,
        config: &cosmic_config::Config,
        changed_keys: &[T],
    ) -> (Vec<cosmic_config::Error>, Vec<&'static str>) {
        let mut errors = Vec::new();
        let mut updated = Vec::new();

        macro_rules! update_field {
            ($name:literal, $field:ident, $type:ty) => {
                match config.get::<$type>($name) {
                    Ok(val) => {
                        self.$field = val;
                        updated.push($name);
                    }
                    Err(e) => errors.push(e),
                }
            };
        }

        for key in changed_keys {
            match key.as_ref() {
                "columns" => update_field!("columns", columns, u16),
                "row_height" => update_field!("row_height", row_height, u16),
                "spacing" => update_field!("spacing", spacing, u16),
                "corner_radius" => update_field!("corner_radius", corner_radius, f32),
                "emphasis_scale" => update_field!("emphasis_scale", emphasis_scale, f32),
                "emphasis_rotation" => update_field!("emphasis_rotation", emphasis_rotation, f32),
                "hover_overlay_alpha" => {
                    update_field!("hover_overlay_alpha", hover_overlay_alpha, f32)
                }
                "hidpi_images" => update_field!("hidpi_images", hidpi_images, bool),
                "show_hidden_files" => update_field!("show_hidden_files", show_hidden_files, bool),
                "sort_mode" => update_field!("sort_mode", sort_mode, SortMode),
                "sort_order" => update_field!("sort_order", sort_order, SortOrder),
                "thumbnail_cache_size" => {
                    update_field!("thumbnail_cache_size", thumbnail_cache_size, usize)
                }
                _ => {}
            }
        }

        (errors, updated)
    }
}

pub fn config() -> Result<Config, cosmic_config::Error> {
    Config::new(APP_ID, CONFIG_VERSION)
}
