//! Main app state

use crate::{
    fl,
    key_binds,
    message::{Message, ThumbnailMessage},
};
use cosmic::{
    Action, Application, ApplicationExt, Core, Element, Task,
    cosmic_config::{Config, CosmicConfigEntry},
    iced::{
        Alignment, Length,
        keyboard::{Key, Modifiers},
    },
    task::future,
    theme,
    widget::{
        button, checkbox, column, container, horizontal_space,
        menu::key_bind::{KeyBind, Modifier},
        row, scrollable, text,
    },
};
use gallery_config::GalleryConfig;
use gallery_image::{self as image, CachedImage, ThumbnailCache};
use gallery_state::{
    Change, GalleryError, GalleryState, SelectAllState,
    seed::{self, ScanOptions, Source},
};
use gallery_widgets::{GalleryTile, GridEvent, TileStyle, gallery_grid};
use rfd::AsyncFileDialog;
use shared::{grid_config::QuiltConfig, srcset::image_request};
use std::{path::PathBuf, sync::Arc};

pub struct Gallery {
    core: Core,
    config: GalleryConfig,
    config_handler: Option<Config>,
    grid: QuiltConfig,
    gallery: GalleryState,
    cache: ThumbnailCache,
    /// Bumped on every reseed so late thumbnails of an old gallery are dropped.
    generation: u64,
    latest_seed: u64,
}

impl Gallery {
    pub const APP_ID: &'static str = "org.codeberg.gallery.Gallery";

    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            include_hidden: self.config.show_hidden_files,
            sort_mode: self.config.sort_mode,
            sort_order: self.config.sort_order,
        }
    }

    fn seed(&mut self, path: PathBuf) -> Task<Action<Message>> {
        let Some(source) = Source::from_path(&path) else {
            tracing::warn!("Nothing to open at {}", path.display());
            return Task::none();
        };

        self.latest_seed += 1;
        let generation = self.latest_seed;
        let options = self.scan_options();

        future(async move {
            match seed::load(source, options).await {
                Ok(items) => Message::Seeded { generation, items },
                Err(e) => Message::SeedFailed(Arc::new(e.to_string())),
            }
        })
    }

    // Load thumbnails in batches to avoid GPU memory exhaustion
    fn load_thumbnails(&mut self) -> Task<Action<Message>> {
        if self.cache.free_slots() == 0 {
            return Task::none();
        }

        let size = u32::from(self.grid.row_height);
        let hidpi = self.config.hidpi_images;
        let generation = self.generation;
        let ids: Vec<_> = self.gallery.items().iter().map(|item| item.id).collect();
        let mut tasks = Vec::new();

        for id in self.cache.schedule(&ids) {
            let Some(item) = self.gallery.get(id) else {
                continue;
            };

            let source = item.source.clone();
            let request = image_request(&source.as_src(), size, item.span);

            tasks.push(future(async move {
                let message = match image::load_thumbnail(source, request, hidpi).await {
                    Ok(img) => ThumbnailMessage::Ready {
                        generation,
                        id,
                        handle: img.handle,
                        width: img.width,
                        height: img.height,
                    },
                    Err(e) => ThumbnailMessage::Failed {
                        generation,
                        id,
                        error: e.to_string(),
                    },
                };
                Message::Thumbnail(message)
            }));
        }

        Task::batch(tasks)
    }

    /// Every tile of the current gallery fits, so scrolling never evicts.
    fn cache_capacity(&self) -> usize {
        self.config.thumbnail_cache_size.max(self.gallery.len())
    }

    fn apply(&mut self, change: Result<Change, GalleryError>) {
        match change {
            Ok(Change::Removed(removed)) => {
                for item in &removed {
                    self.cache.remove(item.id);
                }
                // Survivors shifted; rescan from the top for anything unloaded
                self.cache.rewind();
            }
            Ok(Change::Reordered { from, to }) => {
                tracing::debug!("Reordered tile {from} with {to}");
            }
            Ok(_) => {}
            Err(e) => tracing::debug!("Ignoring gallery event: {e}"),
        }
    }

    fn on_grid_event(&mut self, event: GridEvent) -> Result<Change, GalleryError> {
        match event {
            GridEvent::PointerEntered(id) => self.gallery.pointer_enter(id),
            GridEvent::PointerLeft(id) => Ok(self.gallery.pointer_leave(id)),
            GridEvent::CheckboxToggled(id) => self.gallery.toggle_select(id),
            GridEvent::DragStarted(id) => self.gallery.begin_drag(id),
            GridEvent::DragOver(id) => self.gallery.drag_over(id),
            GridEvent::DragLeft(id) => Ok(self.gallery.drag_leave(id)),
            GridEvent::Dropped(id) => self.gallery.drop_on(id),
            GridEvent::DragCancelled => Ok(self.gallery.end_drag()),
        }
    }

    fn tile_style(&self) -> TileStyle {
        TileStyle {
            corner_radius: self.config.corner_radius,
            emphasis_scale: self.config.emphasis_scale,
            emphasis_rotation: self.config.emphasis_rotation,
            hover_overlay_alpha: self.config.hover_overlay_alpha,
        }
    }

    fn tiles(&self) -> Vec<GalleryTile> {
        self.gallery
            .items()
            .iter()
            .map(|item| {
                let tile = GalleryTile::new(item.id, item.span)
                    .selected(self.gallery.is_selected(item.id))
                    .hovered(self.gallery.is_hovered(item.id))
                    .dragged(self.gallery.is_dragged(item.id));

                match self.cache.get(item.id) {
                    Some(CachedImage {
                        handle,
                        width,
                        height,
                    }) => tile.image(handle.clone(), *width, *height),
                    None => tile,
                }
            })
            .collect()
    }

    fn header(&self) -> Element<'_, Message> {
        let spacing = theme::active().cosmic().spacing;
        let count = self.gallery.selected_count();

        if count == 0 {
            return row()
                .push(text::title3(fl!("gallery-title")))
                .padding(spacing.space_xs)
                .width(Length::Fill)
                .into();
        }

        let all_selected = self.gallery.select_all_state() == SelectAllState::All;

        row()
            .push(checkbox(fl!("select-all"), all_selected).on_toggle(|_| Message::ToggleSelectAll))
            .push(text::title4(fl!("files-selected", count = count)))
            .push(horizontal_space())
            .push(
                button::destructive(fl!("delete-selected", count = count))
                    .on_press(Message::DeleteSelected),
            )
            .spacing(spacing.space_s)
            .padding(spacing.space_xs)
            .align_y(Alignment::Center)
            .width(Length::Fill)
            .into()
    }
}

impl Application for Gallery {
    type Executor = cosmic::executor::Default;
    type Flags = Option<PathBuf>;
    type Message = Message;

    const APP_ID: &'static str = Self::APP_ID;

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, Task<Action<Self::Message>>) {
        let mut tasks = vec![];

        let (config, config_handler) = match gallery_config::config() {
            Ok(handler) => {
                let config = match GalleryConfig::get_entry(&handler) {
                    Ok(c) => c,
                    Err((_, c)) => c,
                };
                (config, Some(handler))
            }
            Err(e) => {
                tracing::warn!("Config unavailable, using defaults: {e}");
                (GalleryConfig::default(), None)
            }
        };

        let mut app = Self {
            core,
            grid: config.grid(),
            cache: ThumbnailCache::new(config.thumbnail_cache_size),
            config,
            config_handler,
            gallery: GalleryState::default(),
            generation: 0,
            latest_seed: 0,
        };

        if let Some(id) = app.core.main_window_id() {
            tasks.push(app.set_window_title(fl!("app-title"), id));
        }

        if let Some(path) = flags.or_else(dirs::picture_dir) {
            tasks.push(app.seed(path));
        }

        (app, Task::batch(tasks))
    }

    fn view(&self) -> Element<'_, Self::Message> {
        let spacing = theme::active().cosmic().spacing;

        let body: Element<'_, Message> = if self.gallery.is_empty() {
            container(text::body(fl!("gallery-empty")))
                .center(Length::Fill)
                .into()
        } else {
            scrollable(
                gallery_grid(self.tiles(), self.grid)
                    .style(self.tile_style())
                    .padding(spacing.space_xs)
                    .dragging(self.gallery.dragged().is_some())
                    .on_event(Message::Grid),
            )
            .height(Length::Fill)
            .into()
        };

        column()
            .push(self.header())
            .push(body)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn update(&mut self, message: Message) -> Task<Action<Self::Message>> {
        let mut tasks = Vec::new();

        match message {
            Message::Grid(event) => {
                let change = self.on_grid_event(event);
                self.apply(change);
            }
            Message::Thumbnail(thumb_msg) => match thumb_msg {
                ThumbnailMessage::Ready {
                    generation,
                    id,
                    handle,
                    width,
                    height,
                } => {
                    self.cache.finish_load(id);
                    if generation == self.generation && self.gallery.contains(id) {
                        self.cache.insert(
                            id,
                            CachedImage {
                                handle,
                                width,
                                height,
                            },
                        );
                    }
                    tasks.push(self.load_thumbnails());
                }
                ThumbnailMessage::Failed {
                    generation,
                    id,
                    error,
                } => {
                    self.cache.finish_load(id);
                    if generation == self.generation {
                        tracing::warn!("Thumbnail for {id} failed to load: {error}");
                        self.cache.mark_failed(id);
                    }
                    tasks.push(self.load_thumbnails());
                }
            },
            Message::KeyBind(action) => {
                return self.update(action.message());
            }
            Message::ToggleSelectAll => {
                let change = self.gallery.toggle_select_all();
                self.apply(Ok(change));
            }
            Message::DeleteSelected => {
                let change = self.gallery.delete_selected();
                self.apply(Ok(change));
                tasks.push(self.load_thumbnails());
            }
            Message::Escape => {
                let change = if self.gallery.dragged().is_some() {
                    self.gallery.end_drag()
                } else {
                    self.gallery.clear_selection()
                };
                self.apply(Ok(change));
            }
            Message::OpenFolderDialog => {
                return future(async {
                    let dialog = AsyncFileDialog::new().set_title(fl!("open-folder"));

                    match dialog.pick_folder().await {
                        Some(handle) => Message::OpenPath(handle.path().to_path_buf()),
                        None => Message::Cancelled,
                    }
                });
            }
            Message::OpenPath(path) => tasks.push(self.seed(path)),
            Message::Seeded { generation, items } => {
                // A newer open superseded this one
                if generation != self.latest_seed {
                    return Task::none();
                }

                tracing::info!("Loaded gallery with {} item(s)", items.len());
                self.generation = generation;
                self.gallery = GalleryState::new(items);
                self.cache.clear();
                self.cache.resize(self.cache_capacity());
                tasks.push(self.load_thumbnails());
            }
            Message::SeedFailed(why) => tracing::error!("Failed to open gallery: {why}"),
            Message::ConfigChanged(config) => {
                self.grid = config.grid();
                self.config = config;
                self.cache.resize(self.cache_capacity());
            }
            Message::Cancelled => {}
        }

        Task::batch(tasks)
    }

    fn subscription(&self) -> cosmic::iced::Subscription<Self::Message> {
        cosmic::iced::Subscription::batch([
            cosmic::iced::keyboard::on_key_press(key_press_handler),
            self.core
                .watch_config::<GalleryConfig>(Self::APP_ID)
                .map(|update| Message::ConfigChanged(update.config)),
        ])
    }

    fn on_app_exit(&mut self) -> Option<Self::Message> {
        if let Some(ref handler) = self.config_handler
            && let Err(e) = self.config.write_entry(handler)
        {
            tracing::warn!("Failed to save config: {e}");
        }

        None
    }
}

fn key_press_handler(key: Key, modifiers: Modifiers) -> Option<Message> {
    let mut mods = Vec::new();

    if modifiers.control() {
        mods.push(Modifier::Ctrl);
    }

    if modifiers.shift() {
        mods.push(Modifier::Shift);
    }

    if modifiers.alt() {
        mods.push(Modifier::Alt);
    }

    if modifiers.logo() {
        mods.push(Modifier::Super);
    }

    let key_bind = KeyBind {
        modifiers: mods,
        key: key.clone(),
    };

    let bindings = key_binds::init_key_binds();
    bindings
        .get(&key_bind)
        .map(|action| Message::KeyBind(*action))
}
