//! Pixel geometry and pointer handling for the quilted gallery grid

use cosmic::iced::{Point, Rectangle, Size};
use gallery_types::ItemId;
use shared::grid_config::{Placement, QuiltConfig, QuiltLayout};

use crate::gallery_grid::GridEvent;

/// Pointer travel before a press turns into a drag.
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Side of the drawn checkbox square.
pub const CHECKBOX_SIZE: f32 = 18.0;
/// Inset of the checkbox from the tile's top-left corner.
pub const CHECKBOX_INSET: f32 = 12.0;
/// Side of the clickable area around the checkbox.
pub const CHECKBOX_HIT_SIZE: f32 = 42.0;

/// Screen rectangle of a tile. `origin` is the grid's top-left content corner.
pub fn tile_bounds(
    config: &QuiltConfig,
    placement: &Placement,
    origin: Point,
    content_width: f32,
) -> Rectangle {
    let (x, y, width, height) = config.placement_rect(placement, content_width);
    Rectangle::new(
        Point::new(origin.x + x, origin.y + y),
        Size::new(width, height),
    )
}

/// Index of the tile under `position`, if any. Spacing between tiles hits nothing.
pub fn tile_at_position(
    config: &QuiltConfig,
    layout: &QuiltLayout,
    origin: Point,
    content_width: f32,
    position: Point,
) -> Option<usize> {
    layout
        .placements
        .iter()
        .position(|placement| tile_bounds(config, placement, origin, content_width).contains(position))
}

/// Bounds that cover `cell` completely while keeping the image's aspect ratio.
/// The overflow is expected to be clipped by the caller.
pub fn cover_bounds(cell: Rectangle, image_width: f32, image_height: f32) -> Rectangle {
    if image_width <= 0.0 || image_height <= 0.0 || cell.height <= 0.0 {
        return cell;
    }

    let cell_aspect = cell.width / cell.height;
    let image_aspect = image_width / image_height;

    let (width, height) = if image_aspect > cell_aspect {
        // Wider than the cell: match height, overflow sideways
        (cell.height * image_aspect, cell.height)
    } else {
        (cell.width, cell.width / image_aspect)
    };

    Rectangle::new(
        Point::new(
            cell.x + (cell.width - width) / 2.0,
            cell.y + (cell.height - height) / 2.0,
        ),
        Size::new(width, height),
    )
}

/// Grow or shrink `rect` about its center.
pub fn scale_about_center(rect: Rectangle, scale: f32) -> Rectangle {
    let width = rect.width * scale;
    let height = rect.height * scale;

    Rectangle::new(
        Point::new(
            rect.x - (width - rect.width) / 2.0,
            rect.y - (height - rect.height) / 2.0,
        ),
        Size::new(width, height),
    )
}

pub fn checkbox_bounds(tile: Rectangle) -> Rectangle {
    Rectangle::new(
        Point::new(tile.x + CHECKBOX_INSET, tile.y + CHECKBOX_INSET),
        Size::new(CHECKBOX_SIZE, CHECKBOX_SIZE),
    )
}

pub fn checkbox_hit_area(tile: Rectangle) -> Rectangle {
    Rectangle::new(
        Point::new(tile.x, tile.y),
        Size::new(
            CHECKBOX_HIT_SIZE.min(tile.width),
            CHECKBOX_HIT_SIZE.min(tile.height),
        ),
    )
}

/// Mouse input already resolved against the tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Moved {
        position: Point,
        tile: Option<ItemId>,
    },
    Left,
    Pressed {
        position: Point,
        tile: Option<ItemId>,
        on_checkbox: bool,
    },
    Released {
        tile: Option<ItemId>,
    },
}

#[derive(Debug, Default, PartialEq)]
pub struct PointerOutcome {
    pub events: Vec<GridEvent>,
    pub captured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    id: ItemId,
    origin: Point,
}

/// Press, drag and hover tracking for one grid.
#[derive(Debug, Default, Clone)]
pub struct PointerState {
    press: Option<Press>,
    dragging: bool,
    /// The gallery has reported this drag back at least once.
    drag_seen: bool,
    last_tile: Option<ItemId>,
}

impl PointerState {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Grab cursor while dragging, unless the gallery already ended the drag.
    pub fn shows_grab(&self, gallery_dragging: bool) -> bool {
        self.dragging && !(self.drag_seen && !gallery_dragging)
    }

    /// Follow the gallery's drag flag. A drag the gallery acknowledged and
    /// then ended (Escape) is abandoned here too. Returns true when it was.
    pub fn sync_drag(&mut self, gallery_dragging: bool) -> bool {
        if !self.dragging {
            self.drag_seen = false;
            return false;
        }

        if gallery_dragging {
            self.drag_seen = true;
            return false;
        }

        if !self.drag_seen {
            return false;
        }

        // The gallery cleared its hover as well; re-enter on the next move
        *self = Self::default();
        true
    }

    pub fn handle(&mut self, input: PointerInput) -> PointerOutcome {
        let mut out = PointerOutcome::default();

        match input {
            PointerInput::Moved { position, tile } => {
                if let Some(press) = self.press
                    && !self.dragging
                    && press.origin.distance(position) > DRAG_THRESHOLD
                {
                    self.dragging = true;
                    out.events.push(GridEvent::DragStarted(press.id));
                }

                if tile != self.last_tile {
                    if let Some(previous) = self.last_tile {
                        out.events.push(self.leave(previous));
                    }
                    if let Some(next) = tile {
                        out.events.push(self.enter(next));
                    }
                    self.last_tile = tile;
                }

                out.captured = self.dragging;
            }

            PointerInput::Left => {
                if let Some(previous) = self.last_tile.take() {
                    out.events.push(self.leave(previous));
                }
            }

            PointerInput::Pressed {
                position,
                tile,
                on_checkbox,
            } => {
                let Some(id) = tile else {
                    return out;
                };

                if on_checkbox {
                    out.events.push(GridEvent::CheckboxToggled(id));
                } else {
                    self.press = Some(Press {
                        id,
                        origin: position,
                    });
                }
                out.captured = true;
            }

            PointerInput::Released { tile } => {
                if self.press.take().is_some() && self.dragging {
                    self.dragging = false;
                    self.drag_seen = false;

                    out.events.push(match tile {
                        Some(target) => GridEvent::Dropped(target),
                        None => GridEvent::DragCancelled,
                    });

                    // The drop cleared the hover; re-enter on the next move
                    self.last_tile = None;
                    out.captured = true;
                }
            }
        }

        out
    }

    fn enter(&self, id: ItemId) -> GridEvent {
        if self.dragging {
            GridEvent::DragOver(id)
        } else {
            GridEvent::PointerEntered(id)
        }
    }

    fn leave(&self, id: ItemId) -> GridEvent {
        if self.dragging {
            GridEvent::DragLeft(id)
        } else {
            GridEvent::PointerLeft(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_types::IdAllocator;
    use shared::grid_config::Span;

    #[test]
    fn test_tile_at_position_skips_spacing() {
        let config = QuiltConfig::new(2, 100).with_spacing(10);
        let layout = QuiltLayout::place(vec![Span::UNIT; 4], 2);
        let origin = Point::new(5.0, 5.0);

        // Column width: (210 - 10) / 2 = 100
        let hit = |x, y| tile_at_position(&config, &layout, origin, 210.0, Point::new(x, y));

        assert_eq!(hit(10.0, 10.0), Some(0));
        assert_eq!(hit(120.0, 10.0), Some(1));
        assert_eq!(hit(110.0, 10.0), None);
        assert_eq!(hit(10.0, 120.0), Some(2));
        assert_eq!(hit(10.0, 500.0), None);
    }

    #[test]
    fn test_cover_bounds_overflows_wide_images() {
        let cell = Rectangle::new(Point::new(0.0, 0.0), Size::new(100.0, 100.0));
        let bounds = cover_bounds(cell, 200.0, 100.0);

        assert_eq!(bounds.width, 200.0);
        assert_eq!(bounds.height, 100.0);
        assert_eq!(bounds.x, -50.0);
    }

    #[test]
    fn test_scale_about_center() {
        let rect = Rectangle::new(Point::new(10.0, 10.0), Size::new(100.0, 50.0));
        let scaled = scale_about_center(rect, 1.1);

        assert!((scaled.width - 110.0).abs() < 1e-4);
        assert!((scaled.x - 5.0).abs() < 1e-4);
        assert!((scaled.center().y - rect.center().y).abs() < 1e-4);
    }

    #[test]
    fn test_checkbox_inside_hit_area() {
        let tile = Rectangle::new(Point::new(0.0, 0.0), Size::new(121.0, 121.0));
        let hit = checkbox_hit_area(tile);
        let check = checkbox_bounds(tile);

        assert!(hit.contains(check.center()));
        assert!(!hit.contains(Point::new(60.0, 60.0)));
    }


    fn two_tiles() -> (ItemId, ItemId) {
        let mut ids = IdAllocator::new();
        (ids.allocate(), ids.allocate())
    }

    fn moved(state: &mut PointerState, x: f32, tile: Option<ItemId>) -> Vec<GridEvent> {
        state
            .handle(PointerInput::Moved {
                position: Point::new(x, 10.0),
                tile,
            })
            .events
    }

    fn press(state: &mut PointerState, x: f32, tile: Option<ItemId>) -> PointerOutcome {
        state.handle(PointerInput::Pressed {
            position: Point::new(x, 10.0),
            tile,
            on_checkbox: false,
        })
    }

    fn release(state: &mut PointerState, tile: Option<ItemId>) -> Vec<GridEvent> {
        state.handle(PointerInput::Released { tile }).events
    }

    #[test]
    fn test_hover_enters_and_leaves() {
        let (a, b) = two_tiles();
        let mut state = PointerState::default();

        assert_eq!(moved(&mut state, 10.0, Some(a)), vec![GridEvent::PointerEntered(a)]);
        assert!(moved(&mut state, 11.0, Some(a)).is_empty());
        assert_eq!(
            moved(&mut state, 150.0, Some(b)),
            vec![GridEvent::PointerLeft(a), GridEvent::PointerEntered(b)]
        );
        assert_eq!(
            state.handle(PointerInput::Left).events,
            vec![GridEvent::PointerLeft(b)]
        );
    }

    #[test]
    fn test_drag_starts_past_threshold() {
        let (a, _) = two_tiles();
        let mut state = PointerState::default();
        moved(&mut state, 10.0, Some(a));

        assert!(press(&mut state, 10.0, Some(a)).captured);
        assert!(moved(&mut state, 10.0 + DRAG_THRESHOLD, Some(a)).is_empty());
        assert!(!state.is_dragging());

        assert_eq!(
            moved(&mut state, 15.0, Some(a)),
            vec![GridEvent::DragStarted(a)]
        );
        assert!(state.is_dragging());
    }

    #[test]
    fn test_drag_uses_drag_events_and_drops_on_tile() {
        let (a, b) = two_tiles();
        let mut state = PointerState::default();
        moved(&mut state, 10.0, Some(a));
        press(&mut state, 10.0, Some(a));

        assert_eq!(
            moved(&mut state, 150.0, Some(b)),
            vec![
                GridEvent::DragStarted(a),
                GridEvent::DragLeft(a),
                GridEvent::DragOver(b),
            ]
        );
        assert_eq!(release(&mut state, Some(b)), vec![GridEvent::Dropped(b)]);
        assert!(!state.is_dragging());

        // Hover was reset by the drop, so the same tile is entered again
        assert_eq!(moved(&mut state, 151.0, Some(b)), vec![GridEvent::PointerEntered(b)]);
    }

    #[test]
    fn test_release_off_tiles_cancels() {
        let (a, _) = two_tiles();
        let mut state = PointerState::default();
        press(&mut state, 10.0, Some(a));
        moved(&mut state, 500.0, None);

        assert_eq!(release(&mut state, None), vec![GridEvent::DragCancelled]);
    }

    #[test]
    fn test_click_without_move_is_not_a_drop() {
        let (a, _) = two_tiles();
        let mut state = PointerState::default();
        press(&mut state, 10.0, Some(a));

        assert!(release(&mut state, Some(a)).is_empty());
    }

    #[test]
    fn test_checkbox_press_toggles_without_dragging() {
        let (a, _) = two_tiles();
        let mut state = PointerState::default();

        let out = state.handle(PointerInput::Pressed {
            position: Point::new(10.0, 10.0),
            tile: Some(a),
            on_checkbox: true,
        });
        assert_eq!(out.events, vec![GridEvent::CheckboxToggled(a)]);
        assert!(out.captured);

        assert!(!moved(&mut state, 80.0, Some(a)).contains(&GridEvent::DragStarted(a)));
        assert!(!state.is_dragging());
    }

    #[test]
    fn test_press_on_gap_is_ignored() {
        let mut state = PointerState::default();
        let out = press(&mut state, 10.0, None);

        assert!(out.events.is_empty());
        assert!(!out.captured);
    }

    #[test]
    fn test_drag_ended_by_gallery_is_abandoned() {
        let (a, b) = two_tiles();
        let mut state = PointerState::default();
        press(&mut state, 10.0, Some(a));
        moved(&mut state, 150.0, Some(b));

        // Not yet reported back: keep dragging
        assert!(!state.sync_drag(false));
        assert!(state.is_dragging());

        assert!(!state.sync_drag(true));
        assert!(state.shows_grab(true));
        assert!(!state.shows_grab(false));

        assert!(state.sync_drag(false));
        assert!(!state.is_dragging());
        assert_eq!(moved(&mut state, 151.0, Some(b)), vec![GridEvent::PointerEntered(b)]);
        assert!(release(&mut state, Some(b)).is_empty());
    }
}
