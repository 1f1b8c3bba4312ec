//! GalleryGrid - a quilted grid of photo tiles
//!
//! Features:
//! - Tiles spanning several rows and columns
//! - Hover overlay, selection checkbox and emphasis (scale, tilt, rounding)
//! - Press-and-move drag with drop targets
//!
//! The widget keeps no gallery state of its own. It reports pointer activity
//! as [`GridEvent`]s and draws whatever flags the caller passes in.

use std::cell::Cell;

use cosmic::{
    Element, Renderer,
    iced::{
        Color, Length, Padding, Point, Radians, Rectangle, Size,
        advanced::{
            Clipboard, Layout, Shell, Widget,
            image::Renderer as ImageRenderer,
            layout::{Limits, Node},
            renderer::{self as iced_renderer, Quad, Renderer as QuadRenderer},
            widget::{Tree, tree},
        },
        event::{Event, Status},
        mouse::{self, Button, Cursor},
    },
    widget::image::Handle,
};
use gallery_types::{ItemId, Span};
use shared::grid_config::{QuiltConfig, QuiltLayout};

use crate::quilt_core::{self as core, PointerInput, PointerState};

const PLACEHOLDER_COLOR: Color = Color::from_rgba(0.5, 0.5, 0.5, 0.3);
const CHECKBOX_BORDER: Color = Color::WHITE;
const DRAGGED_OPACITY: f32 = 0.5;

/// One tile to draw, with the flags the gallery state reported for it.
#[derive(Debug, Clone)]
pub struct GalleryTile {
    pub id: ItemId,
    pub span: Span,
    pub image: Option<(Handle, u32, u32)>,
    pub selected: bool,
    pub hovered: bool,
    pub dragged: bool,
}

impl GalleryTile {
    pub fn new(id: ItemId, span: Span) -> Self {
        Self {
            id,
            span,
            image: None,
            selected: false,
            hovered: false,
            dragged: false,
        }
    }

    pub fn image(mut self, handle: Handle, width: u32, height: u32) -> Self {
        self.image = Some((handle, width, height));
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn hovered(mut self, hovered: bool) -> Self {
        self.hovered = hovered;
        self
    }

    pub fn dragged(mut self, dragged: bool) -> Self {
        self.dragged = dragged;
        self
    }

    pub fn is_emphasized(&self) -> bool {
        self.hovered || self.selected
    }

    fn shows_checkbox(&self) -> bool {
        self.hovered || self.selected
    }
}

/// Pointer activity on the grid, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    PointerEntered(ItemId),
    PointerLeft(ItemId),
    CheckboxToggled(ItemId),
    DragStarted(ItemId),
    DragOver(ItemId),
    DragLeft(ItemId),
    Dropped(ItemId),
    DragCancelled,
}

/// Visual treatment of tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileStyle {
    pub corner_radius: f32,
    pub emphasis_scale: f32,
    /// Degrees.
    pub emphasis_rotation: f32,
    pub hover_overlay_alpha: f32,
}

impl Default for TileStyle {
    fn default() -> Self {
        Self {
            corner_radius: 10.0,
            emphasis_scale: 1.1,
            emphasis_rotation: 3.0,
            hover_overlay_alpha: 0.5,
        }
    }
}

pub struct GalleryGrid<'a, M> {
    tiles: Vec<GalleryTile>,
    layout: QuiltLayout,
    config: QuiltConfig,
    style: TileStyle,
    padding: Padding,
    width: Length,
    dragging: bool,
    on_event: Option<Box<dyn Fn(GridEvent) -> M + 'a>>,
    content_width: Cell<f32>,
}

impl<'a, M: Clone + 'static> GalleryGrid<'a, M> {
    pub fn new(tiles: Vec<GalleryTile>, config: QuiltConfig) -> Self {
        let layout = QuiltLayout::place(tiles.iter().map(|tile| tile.span), config.columns);

        Self {
            tiles,
            layout,
            config,
            style: TileStyle::default(),
            padding: Padding::ZERO,
            width: Length::Fill,
            dragging: false,
            on_event: None,
            content_width: Cell::new(0.0),
        }
    }

    pub fn style(mut self, style: TileStyle) -> Self {
        self.style = style;
        self
    }

    pub fn padding(mut self, padding: impl Into<Padding>) -> Self {
        self.padding = padding.into();
        self
    }

    pub fn width(mut self, width: impl Into<Length>) -> Self {
        self.width = width.into();
        self
    }

    /// Whether the gallery currently holds a drag. When it drops one on its
    /// own (Escape), the grid abandons the gesture too.
    pub fn dragging(mut self, dragging: bool) -> Self {
        self.dragging = dragging;
        self
    }

    /// Callback for hover, checkbox and drag activity
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(GridEvent) -> M + 'a,
    {
        self.on_event = Some(Box::new(f));
        self
    }

    fn origin(&self, bounds: Rectangle) -> Point {
        Point::new(bounds.x + self.padding.left, bounds.y + self.padding.top)
    }

    fn tile_bounds(&self, index: usize, bounds: Rectangle) -> Rectangle {
        core::tile_bounds(
            &self.config,
            &self.layout.placements[index],
            self.origin(bounds),
            self.content_width.get(),
        )
    }

    fn tile_at(&self, position: Point, bounds: Rectangle) -> Option<usize> {
        if !bounds.contains(position) {
            return None;
        }

        core::tile_at_position(
            &self.config,
            &self.layout,
            self.origin(bounds),
            self.content_width.get(),
            position,
        )
    }

    fn publish(&self, shell: &mut Shell<'_, M>, event: GridEvent) {
        if let Some(ref on_event) = self.on_event {
            shell.publish(on_event(event));
        }
    }

    fn draw_tile(
        &self,
        renderer: &mut Renderer,
        tile: &GalleryTile,
        bounds: Rectangle,
        accent: Color,
    ) {
        let emphasized = tile.is_emphasized();
        let radius = if emphasized {
            self.style.corner_radius
        } else {
            0.0
        };

        renderer.with_layer(bounds, |renderer| {
            if let Some((ref handle, width, height)) = tile.image {
                let mut image_bounds = core::cover_bounds(bounds, width as f32, height as f32);
                let mut rotation = 0.0;

                if emphasized {
                    image_bounds = core::scale_about_center(image_bounds, self.style.emphasis_scale);
                    rotation = self.style.emphasis_rotation.to_radians();
                }

                let opacity = if tile.dragged { DRAGGED_OPACITY } else { 1.0 };

                renderer.draw_image(
                    handle.clone().into(),
                    cosmic::iced::widget::image::FilterMethod::Linear,
                    image_bounds,
                    Radians(rotation),
                    opacity,
                    [radius; 4], // corner radii
                );
            } else {
                renderer.fill_quad(
                    Quad {
                        bounds,
                        border: cosmic::iced::Border {
                            radius: radius.into(),
                            width: 0.0,
                            color: Color::TRANSPARENT,
                        },
                        shadow: Default::default(),
                    },
                    PLACEHOLDER_COLOR,
                );
            }

            if tile.hovered {
                renderer.fill_quad(
                    Quad {
                        bounds,
                        border: cosmic::iced::Border {
                            radius: radius.into(),
                            width: 0.0,
                            color: Color::TRANSPARENT,
                        },
                        shadow: Default::default(),
                    },
                    Color::from_rgba(0.0, 0.0, 0.0, self.style.hover_overlay_alpha),
                );
            }

            if tile.shows_checkbox() {
                self.draw_checkbox(renderer, bounds, tile.selected, accent);
            }
        });
    }

    fn draw_checkbox(&self, renderer: &mut Renderer, tile: Rectangle, checked: bool, accent: Color) {
        let check = core::checkbox_bounds(tile);

        renderer.fill_quad(
            Quad {
                bounds: check,
                border: cosmic::iced::Border {
                    radius: 2.0.into(),
                    width: 2.0,
                    color: CHECKBOX_BORDER,
                },
                shadow: Default::default(),
            },
            if checked { accent } else { Color::TRANSPARENT },
        );

        if checked {
            let inset = check.width / 3.0;
            let mark = Rectangle::new(
                Point::new(check.x + inset, check.y + inset),
                Size::new(check.width - inset * 2.0, check.height - inset * 2.0),
            );

            renderer.fill_quad(
                Quad {
                    bounds: mark,
                    border: cosmic::iced::Border {
                        radius: 1.0.into(),
                        width: 0.0,
                        color: Color::TRANSPARENT,
                    },
                    shadow: Default::default(),
                },
                Color::WHITE,
            );
        }
    }
}

/// Constructor function
pub fn gallery_grid<'a, M: Clone + 'static>(
    tiles: Vec<GalleryTile>,
    config: QuiltConfig,
) -> GalleryGrid<'a, M> {
    GalleryGrid::new(tiles, config)
}

impl<'a, M: Clone + 'static> Widget<M, cosmic::Theme, Renderer> for GalleryGrid<'a, M> {
    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<PointerState>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(PointerState::default())
    }

    fn size(&self) -> Size<Length> {
        Size::new(self.width, Length::Shrink)
    }

    fn layout(&self, _tree: &mut Tree, _renderer: &Renderer, limits: &Limits) -> Node {
        let limits = limits.width(self.width);
        let max_width = limits.max().width;
        let content_width = (max_width - self.padding.horizontal()).max(0.0);

        self.content_width.set(content_width);

        let height = self.config.total_height(self.layout.rows) + self.padding.vertical();
        let content_size = Size::new(max_width, height);

        Node::new(limits.resolve(self.width, Length::Shrink, content_size))
    }

    fn draw(
        &self,
        _tree: &Tree,
        renderer: &mut Renderer,
        theme: &cosmic::Theme,
        _style: &iced_renderer::Style,
        layout: Layout<'_>,
        _cursor: Cursor,
        viewport: &Rectangle,
    ) {
        let bounds = layout.bounds();
        let accent: Color = theme.cosmic().accent_color().into();

        for (index, tile) in self.tiles.iter().enumerate() {
            let tile_bounds = self.tile_bounds(index, bounds);

            // Skip tiles scrolled out of view
            if tile_bounds.intersection(viewport).is_none() {
                continue;
            }

            self.draw_tile(renderer, tile, tile_bounds, accent);
        }
    }

    fn on_event(
        &mut self,
        tree: &mut Tree,
        event: Event,
        layout: Layout<'_>,
        cursor: Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, M>,
        _viewport: &Rectangle,
    ) -> Status {
        let state = tree.state.downcast_mut::<PointerState>();
        state.sync_drag(self.dragging);

        let bounds = layout.bounds();
        let position = cursor.position();
        let under = position.and_then(|pos| self.tile_at(pos, bounds));
        let tile = under.map(|index| self.tiles[index].id);

        let input = match event {
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                PointerInput::Moved { position, tile }
            }
            Event::Mouse(mouse::Event::CursorLeft) => PointerInput::Left,
            Event::Mouse(mouse::Event::ButtonPressed(Button::Left)) => {
                let Some(position) = position else {
                    return Status::Ignored;
                };

                let on_checkbox = under.is_some_and(|index| {
                    self.tiles[index].shows_checkbox()
                        && core::checkbox_hit_area(self.tile_bounds(index, bounds)).contains(position)
                });

                PointerInput::Pressed {
                    position,
                    tile,
                    on_checkbox,
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(Button::Left)) => {
                PointerInput::Released { tile }
            }
            _ => return Status::Ignored,
        };

        let outcome = state.handle(input);
        for event in outcome.events {
            self.publish(shell, event);
        }

        if outcome.captured {
            Status::Captured
        } else {
            Status::Ignored
        }
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: Layout<'_>,
        cursor: Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> mouse::Interaction {
        let state = tree.state.downcast_ref::<PointerState>();
        if state.shows_grab(self.dragging) {
            return mouse::Interaction::Grabbing;
        }

        let bounds = layout.bounds();
        if let Some(position) = cursor.position()
            && self.tile_at(position, bounds).is_some()
        {
            return mouse::Interaction::Pointer;
        }

        mouse::Interaction::default()
    }
}

impl<'a, M: Clone + 'static> From<GalleryGrid<'a, M>> for Element<'a, M> {
    fn from(grid: GalleryGrid<'a, M>) -> Self {
        Element::new(grid)
    }
}
