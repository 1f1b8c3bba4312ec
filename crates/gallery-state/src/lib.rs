//! Selection and reorder state for one gallery view.
//!
//! `GalleryState` owns the ordered items, the set of selected ids and the
//! transient hover/drag pointers. The view layer feeds it pointer events and
//! reads the render predicates back on every redraw. Every mutation reports
//! what changed through [`Change`].

pub mod seed;

use gallery_types::{GalleryItem, Interaction, ItemId};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryError {
    #[error("No gallery item with id {0}")]
    InvalidId(ItemId),
}

pub type GalleryResult<T> = Result<T, GalleryError>;

/// What a mutation changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    None,
    Selection,
    Interaction,
    Reordered { from: usize, to: usize },
    Removed(Vec<GalleryItem>),
}

impl Change {
    pub fn is_none(&self) -> bool {
        matches!(self, Change::None)
    }
}

/// Tri-state of the header "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    None,
    Partial,
    All,
}

#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    items: Vec<GalleryItem>,
    selected: HashSet<ItemId>,
    interaction: Interaction,
}

impl GalleryState {
    /// Seed the gallery. Items repeating an earlier id are dropped.
    pub fn new(items: Vec<GalleryItem>) -> Self {
        let mut seen = HashSet::with_capacity(items.len());
        let items: Vec<GalleryItem> = items
            .into_iter()
            .filter(|item| {
                let fresh = seen.insert(item.id);
                if !fresh {
                    tracing::warn!("Dropping duplicate gallery item {}", item.id);
                }
                fresh
            })
            .collect();

        Self {
            items,
            selected: HashSet::new(),
            interaction: Interaction::new(),
        }
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: ItemId) -> Option<&GalleryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn ensure(&self, id: ItemId) -> GalleryResult<usize> {
        self.position(id).ok_or(GalleryError::InvalidId(id))
    }

    // Selection

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected ids in display order.
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .map(|item| item.id)
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    pub fn select_all_state(&self) -> SelectAllState {
        match self.selected.len() {
            0 if !self.items.is_empty() => SelectAllState::None,
            n if n == self.items.len() => SelectAllState::All,
            _ => SelectAllState::Partial,
        }
    }

    pub fn toggle_select(&mut self, id: ItemId) -> GalleryResult<Change> {
        self.ensure(id)?;

        let selected = if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        };

        debug!("Item {id} selected: {selected}");
        Ok(Change::Selection)
    }

    pub fn select_all(&mut self) -> Change {
        if self.selected.len() == self.items.len() {
            return Change::None;
        }

        self.selected = self.items.iter().map(|item| item.id).collect();
        Change::Selection
    }

    pub fn clear_selection(&mut self) -> Change {
        if self.selected.is_empty() {
            return Change::None;
        }

        self.selected.clear();
        Change::Selection
    }

    /// Clear when everything is selected, otherwise select everything.
    pub fn toggle_select_all(&mut self) -> Change {
        if self.selected.len() == self.items.len() {
            self.clear_selection()
        } else {
            self.select_all()
        }
    }

    /// Remove every selected item, keeping the survivors in order.
    pub fn delete_selected(&mut self) -> Change {
        if self.selected.is_empty() {
            return Change::None;
        }

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| self.selected.contains(&item.id));

        self.items = kept;
        self.selected.clear();
        self.interaction.reset();

        debug!(
            "Deleted {} item(s), {} remaining",
            removed.len(),
            self.items.len()
        );
        Change::Removed(removed)
    }

    // Drag and hover

    pub fn begin_drag(&mut self, id: ItemId) -> GalleryResult<Change> {
        self.ensure(id)?;

        if self.interaction.start_drag(id) {
            debug!("Drag started on {id}");
            Ok(Change::Interaction)
        } else {
            Ok(Change::None)
        }
    }

    pub fn drag_over(&mut self, id: ItemId) -> GalleryResult<Change> {
        self.ensure(id)?;
        Ok(hover_change(self.interaction.hover(id)))
    }

    pub fn drag_leave(&mut self, id: ItemId) -> Change {
        hover_change(self.interaction.unhover(id))
    }

    /// Drop the dragged item on `id`, swapping the two. Always ends the drag.
    pub fn drop_on(&mut self, id: ItemId) -> GalleryResult<Change> {
        let dragged = self.interaction.dragged();
        let ended = self.interaction.reset();

        let Some(target) = self.position(id) else {
            return Err(GalleryError::InvalidId(id));
        };

        let source = match dragged {
            Some(dragged) if dragged != id => self.position(dragged),
            _ => None,
        };

        match source {
            Some(source) => {
                self.items.swap(source, target);
                debug!("Swapped positions {source} and {target}");
                Ok(Change::Reordered {
                    from: source,
                    to: target,
                })
            }
            None => Ok(hover_change(ended)),
        }
    }

    pub fn end_drag(&mut self) -> Change {
        hover_change(self.interaction.reset())
    }

    pub fn pointer_enter(&mut self, id: ItemId) -> GalleryResult<Change> {
        self.drag_over(id)
    }

    pub fn pointer_leave(&mut self, id: ItemId) -> Change {
        self.drag_leave(id)
    }

    pub fn hovered(&self) -> Option<ItemId> {
        self.interaction.hovered()
    }

    pub fn dragged(&self) -> Option<ItemId> {
        self.interaction.dragged()
    }

    // Render queries

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_hovered(&self, id: ItemId) -> bool {
        self.interaction.hovered() == Some(id)
    }

    pub fn is_dragged(&self, id: ItemId) -> bool {
        self.interaction.dragged() == Some(id)
    }

    pub fn is_emphasized(&self, id: ItemId) -> bool {
        self.is_hovered(id) || self.is_selected(id)
    }
}

fn hover_change(changed: bool) -> Change {
    if changed {
        Change::Interaction
    } else {
        Change::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_types::{IdAllocator, ImageSource, Span};

    fn gallery(n: usize) -> (GalleryState, Vec<ItemId>, IdAllocator) {
        let mut ids = IdAllocator::new();
        let items: Vec<_> = (0..n)
            .map(|i| {
                GalleryItem::new(
                    ids.allocate(),
                    format!("Photo {i}"),
                    ImageSource::Path(format!("/photos/{i}.jpg").into()),
                    Span::UNIT,
                )
            })
            .collect();
        let order = items.iter().map(|item| item.id).collect();
        (GalleryState::new(items), order, ids)
    }

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let (state, _, _) = gallery(2);
        let mut items = state.items().to_vec();
        items.push(items[0].clone());

        let state = GalleryState::new(items);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_select_all_state() {
        let (mut state, ids, _) = gallery(3);
        assert_eq!(state.select_all_state(), SelectAllState::None);

        state.toggle_select(ids[1]).unwrap();
        assert_eq!(state.select_all_state(), SelectAllState::Partial);

        state.select_all();
        assert_eq!(state.select_all_state(), SelectAllState::All);
    }

    #[test]
    fn test_empty_gallery_counts_as_all_selected() {
        let mut state = GalleryState::default();
        assert_eq!(state.select_all_state(), SelectAllState::All);
        assert!(state.toggle_select_all().is_none());
    }

    #[test]
    fn test_unknown_id_leaves_state_alone() {
        let (mut state, _, mut ids) = gallery(2);
        let stranger = ids.allocate();

        assert_eq!(
            state.toggle_select(stranger),
            Err(GalleryError::InvalidId(stranger))
        );
        assert_eq!(
            state.begin_drag(stranger),
            Err(GalleryError::InvalidId(stranger))
        );
        assert_eq!(state.selected_count(), 0);
        assert_eq!(state.dragged(), None);
    }

    #[test]
    fn test_drop_on_unknown_target_still_ends_drag() {
        let (mut state, ids, mut alloc) = gallery(2);
        let stranger = alloc.allocate();

        state.begin_drag(ids[0]).unwrap();
        assert!(state.drop_on(stranger).is_err());
        assert_eq!(state.dragged(), None);
        assert_eq!(state.items()[0].id, ids[0]);
    }

    #[test]
    fn test_drop_without_drag_is_noop() {
        let (mut state, ids, _) = gallery(3);
        assert_eq!(state.drop_on(ids[2]), Ok(Change::None));
        assert_eq!(state.items()[2].id, ids[2]);
    }

    #[test]
    fn test_drag_source_loses_hover() {
        let (mut state, ids, _) = gallery(3);
        state.pointer_enter(ids[0]).unwrap();
        assert!(state.is_emphasized(ids[0]));

        state.begin_drag(ids[0]).unwrap();
        assert!(!state.is_hovered(ids[0]));
        assert!(!state.is_emphasized(ids[0]));
        assert!(state.is_dragged(ids[0]));
    }

    #[test]
    fn test_delete_clears_interaction() {
        let (mut state, ids, _) = gallery(3);
        state.toggle_select(ids[0]).unwrap();
        state.begin_drag(ids[1]).unwrap();
        state.pointer_enter(ids[2]).unwrap();

        state.delete_selected();
        assert_eq!(state.dragged(), None);
        assert_eq!(state.hovered(), None);
    }
}
