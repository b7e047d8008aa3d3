//! Bulk-selection set and the single-item lightbox cursor.
//!
//! Both hold ids only. Items are always resolved against the collection passed in by the
//! caller, so neither can outlive a refetch with a stale view of the library.

use std::collections::BTreeSet;

use crate::media::{MediaCollection, MediaId, MediaItem};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<MediaId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: MediaId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Clears when every item of `collection` is already selected, otherwise selects them all.
    pub fn select_all(&mut self, collection: &MediaCollection) {
        if self.all_selected(collection) {
            self.ids.clear();
        } else {
            self.ids = collection.ids().collect();
        }
    }

    /// True when the collection is non-empty and every one of its items is selected.
    pub fn all_selected(&self, collection: &MediaCollection) -> bool {
        !collection.is_empty() && collection.ids().all(|id| self.ids.contains(&id))
    }

    pub fn contains(&self, id: MediaId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> Vec<MediaId> {
        self.ids.iter().copied().collect()
    }
}

/// Which item, if any, is open in the full-screen viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lightbox {
    open: Option<MediaId>,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, id: MediaId) {
        self.open = Some(id);
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn open_id(&self) -> Option<MediaId> {
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// The open item as it exists in `collection`. `None` if it is no longer there.
    pub fn current<'a>(&self, collection: &'a MediaCollection) -> Option<&'a MediaItem> {
        collection.find(self.open?)
    }

    fn position(&self, collection: &MediaCollection) -> Option<usize> {
        collection.position(self.open?)
    }

    pub fn has_next(&self, collection: &MediaCollection) -> bool {
        self.position(collection)
            .is_some_and(|index| index + 1 < collection.len())
    }

    pub fn has_previous(&self, collection: &MediaCollection) -> bool {
        self.position(collection).is_some_and(|index| index > 0)
    }

    /// Moves to the following item. No-op at the last position or when nothing is open.
    pub fn next(&mut self, collection: &MediaCollection) {
        if let Some(index) = self.position(collection)
            && let Some(item) = collection.get(index + 1)
        {
            self.open = Some(item.id);
        }
    }

    /// Moves to the preceding item. No-op at the first position or when nothing is open.
    pub fn previous(&mut self, collection: &MediaCollection) {
        if let Some(index) = self.position(collection)
            && index > 0
            && let Some(item) = collection.get(index - 1)
        {
            self.open = Some(item.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::fixtures;

    #[test]
    fn toggle_flips_membership() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle(MediaId(1)));
        assert!(selection.contains(MediaId(1)));
        assert!(!selection.toggle(MediaId(1)));
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_twice_restores_original_state() {
        let collection = fixtures::collection([1, 2, 3]);

        for initial in [vec![], vec![2], vec![1, 2, 3]] {
            let mut selection = SelectionSet::new();
            for id in &initial {
                selection.toggle(MediaId(*id));
            }
            let original = selection.clone();

            selection.select_all(&collection);
            selection.select_all(&collection);

            if original.all_selected(&collection) || original.is_empty() {
                assert_eq!(selection, original, "initial {initial:?}");
            } else {
                // A partial selection is promoted to "all", then cleared.
                assert!(selection.is_empty(), "initial {initial:?}");
            }
        }
    }

    #[test]
    fn select_all_uses_current_collection() {
        let mut selection = SelectionSet::new();
        selection.select_all(&fixtures::collection([1, 2]));
        assert_eq!(selection.ids(), vec![MediaId(1), MediaId(2)]);

        // A newer collection with an extra item is not fully selected, so everything in it
        // gets selected (and ids that vanished are dropped).
        let newer = fixtures::collection([3, 2]);
        selection.select_all(&newer);
        assert_eq!(selection.ids(), vec![MediaId(2), MediaId(3)]);
    }

    #[test]
    fn select_all_on_empty_collection_selects_nothing() {
        let mut selection = SelectionSet::new();
        selection.select_all(&MediaCollection::default());
        assert!(selection.is_empty());
    }

    #[test]
    fn next_and_previous_are_bounded() {
        let collection = fixtures::collection([10, 20, 30]);
        let mut lightbox = Lightbox::new();

        lightbox.open(MediaId(30));
        assert!(!lightbox.has_next(&collection));
        lightbox.next(&collection);
        assert_eq!(lightbox.open_id(), Some(MediaId(30)));

        lightbox.open(MediaId(10));
        assert!(!lightbox.has_previous(&collection));
        lightbox.previous(&collection);
        assert_eq!(lightbox.open_id(), Some(MediaId(10)));

        lightbox.next(&collection);
        assert_eq!(lightbox.open_id(), Some(MediaId(20)));
        lightbox.previous(&collection);
        assert_eq!(lightbox.open_id(), Some(MediaId(10)));
    }

    #[test]
    fn navigation_without_open_item_is_noop() {
        let collection = fixtures::collection([1, 2]);
        let mut lightbox = Lightbox::new();
        lightbox.next(&collection);
        lightbox.previous(&collection);
        assert!(!lightbox.is_open());
    }

    #[test]
    fn current_resolves_against_given_collection() {
        let mut lightbox = Lightbox::new();
        lightbox.open(MediaId(2));
        assert!(lightbox.current(&fixtures::collection([1, 2])).is_some());
        assert!(lightbox.current(&fixtures::collection([1, 3])).is_none());
        lightbox.close();
        assert!(lightbox.current(&fixtures::collection([1, 2])).is_none());
    }
}
