#[cfg(test)]
mod tests {
    use gallery_state::{Change, GalleryState, SelectAllState};
    use gallery_types::{GalleryItem, IdAllocator, ImageSource, ItemId, Span};

    fn gallery(n: usize) -> (GalleryState, Vec<ItemId>) {
        let mut ids = IdAllocator::new();
        let items: Vec<_> = (0..n)
            .map(|i| {
                GalleryItem::new(
                    ids.allocate(),
                    format!("Photo {i}"),
                    ImageSource::Url(format!("https://images.example.com/{i}")),
                    Span::UNIT,
                )
            })
            .collect();
        let order = items.iter().map(|item| item.id).collect();
        (GalleryState::new(items), order)
    }

    fn order(state: &GalleryState) -> Vec<ItemId> {
        state.items().iter().map(|item| item.id).collect()
    }

    #[test]
    fn test_toggle_select_is_its_own_inverse() {
        let (mut state, ids) = gallery(4);
        state.toggle_select(ids[0]).unwrap();
        let before = state.selected_ids();

        assert_eq!(state.toggle_select(ids[2]), Ok(Change::Selection));
        assert!(state.is_selected(ids[2]));
        assert_eq!(state.toggle_select(ids[2]), Ok(Change::Selection));
        assert!(!state.is_selected(ids[2]));
        assert_eq!(state.selected_ids(), before);

        state.toggle_select(ids[0]).unwrap();
        assert!(!state.is_selected(ids[0]));
        state.toggle_select(ids[0]).unwrap();
        assert_eq!(state.selected_ids(), before);
    }

    #[test]
    fn test_toggle_select_all_promotes_partial_selection() {
        let (mut state, ids) = gallery(11);
        for id in &ids[..3] {
            state.toggle_select(*id).unwrap();
        }
        assert_eq!(state.selected_count(), 3);

        assert_eq!(state.toggle_select_all(), Change::Selection);
        assert_eq!(state.selected_count(), 11);
        assert_eq!(state.select_all_state(), SelectAllState::All);

        // Second call with no change in between clears
        assert_eq!(state.toggle_select_all(), Change::Selection);
        assert_eq!(state.selected_count(), 0);
    }

    #[test]
    fn test_select_all_and_clear() {
        let (mut state, ids) = gallery(5);

        assert_eq!(state.select_all(), Change::Selection);
        assert!(ids.iter().all(|id| state.is_selected(*id)));
        assert!(state.select_all().is_none());

        assert_eq!(state.clear_selection(), Change::Selection);
        assert!(ids.iter().all(|id| !state.is_selected(*id)));
        assert!(state.clear_selection().is_none());
    }

    #[test]
    fn test_delete_selected_keeps_relative_order() {
        let (mut state, ids) = gallery(11);
        state.toggle_select(ids[3]).unwrap();
        state.toggle_select(ids[8]).unwrap();

        let change = state.delete_selected();

        let Change::Removed(removed) = change else {
            panic!("expected removed items, got {change:?}");
        };
        let removed: Vec<_> = removed.iter().map(|item| item.id).collect();
        assert_eq!(removed, vec![ids[3], ids[8]]);

        let expected: Vec<_> = ids
            .iter()
            .copied()
            .filter(|id| *id != ids[3] && *id != ids[8])
            .collect();
        assert_eq!(state.len(), 9);
        assert_eq!(order(&state), expected);
        assert_eq!(state.selected_count(), 0);
        assert!(!state.contains(ids[3]));
    }

    #[test]
    fn test_delete_survivors_are_exactly_unselected() {
        let (mut state, ids) = gallery(8);
        let selected: Vec<_> = ids.iter().copied().step_by(3).collect();
        for id in &selected {
            state.toggle_select(*id).unwrap();
        }

        state.delete_selected();

        for id in &ids {
            assert_eq!(state.contains(*id), !selected.contains(id));
        }
        assert!(state.selected_ids().is_empty());
    }

    #[test]
    fn test_delete_with_empty_selection_is_noop() {
        let (mut state, ids) = gallery(3);
        assert!(state.delete_selected().is_none());
        assert_eq!(order(&state), ids);
    }

    #[test]
    fn test_delete_everything() {
        let (mut state, _) = gallery(3);
        state.select_all();
        state.delete_selected();

        assert!(state.is_empty());
        assert_eq!(state.select_all_state(), SelectAllState::All);
    }

    #[test]
    fn test_emphasis_follows_hover_or_selection() {
        let (mut state, ids) = gallery(3);

        state.pointer_enter(ids[0]).unwrap();
        state.toggle_select(ids[1]).unwrap();

        assert!(state.is_emphasized(ids[0]));
        assert!(state.is_emphasized(ids[1]));
        assert!(!state.is_emphasized(ids[2]));

        state.pointer_leave(ids[0]);
        assert!(!state.is_emphasized(ids[0]));
        assert!(state.is_emphasized(ids[1]));
    }

    #[test]
    fn test_selected_ids_follow_display_order() {
        let (mut state, ids) = gallery(4);
        state.toggle_select(ids[3]).unwrap();
        state.toggle_select(ids[0]).unwrap();

        state.begin_drag(ids[0]).unwrap();
        state.drop_on(ids[3]).unwrap();

        assert_eq!(state.selected_ids(), vec![ids[3], ids[0]]);
    }
}
