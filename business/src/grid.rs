//! Row model for the virtualized media grid.
//!
//! The grid groups an ordered slice of items into rows of `columns` items and works out which
//! rows intersect the scroll viewport. Only those rows are handed to the renderer, so the cost
//! of a frame is bounded by the viewport size rather than the library size.

use std::ops::Range;

use crate::media::MediaItem;

#[derive(Debug, Clone, Copy)]
pub struct VirtualGrid<'a> {
    items: &'a [MediaItem],
    columns: usize,
}

impl<'a> VirtualGrid<'a> {
    /// `columns` below 1 is treated as 1.
    pub fn new(items: &'a [MediaItem], columns: usize) -> Self {
        Self {
            items,
            columns: columns.max(1),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `ceil(len / columns)`.
    pub fn row_count(&self) -> usize {
        self.items.len().div_ceil(self.columns)
    }

    /// Items of row `index`. The last row may be short; rows past the end are empty.
    pub fn row(&self, index: usize) -> &'a [MediaItem] {
        let Some(start) = index.checked_mul(self.columns) else {
            return &[];
        };
        if start >= self.items.len() {
            return &[];
        }
        let end = (start + self.columns).min(self.items.len());
        &self.items[start..end]
    }

    /// Index range of rows that intersect `[scroll_offset, scroll_offset + viewport_height)`.
    pub fn visible_rows(
        &self,
        scroll_offset: f32,
        viewport_height: f32,
        row_height: f32,
    ) -> Range<usize> {
        let row_count = self.row_count();
        if row_count == 0 || row_height <= 0.0 || viewport_height <= 0.0 {
            return 0..0;
        }

        let top = scroll_offset.max(0.0);
        let first = ((top / row_height).floor() as usize).min(row_count);
        let last = (((top + viewport_height) / row_height).ceil() as usize).min(row_count);
        first..last.max(first)
    }

    /// Rows for `range`, paired with their row index.
    pub fn rows(&self, range: Range<usize>) -> impl Iterator<Item = (usize, &'a [MediaItem])> {
        let grid = *self;
        range
            .map(move |index| (index, grid.row(index)))
            .filter(|(_, row)| !row.is_empty())
    }

    /// Total scrollable height for a fixed row height.
    pub fn content_height(&self, row_height: f32) -> f32 {
        self.row_count() as f32 * row_height.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaId, fixtures};

    fn ids(row: &[MediaItem]) -> Vec<i64> {
        row.iter().map(|item| item.id.0).collect()
    }

    #[test]
    fn three_items_two_columns() {
        let collection = fixtures::collection([1, 2, 3]);
        let grid = VirtualGrid::new(collection.items(), 2);

        assert_eq!(grid.row_count(), 2);
        assert_eq!(ids(grid.row(0)), vec![1, 2]);
        assert_eq!(ids(grid.row(1)), vec![3]);
        assert!(grid.row(2).is_empty());
    }

    #[test]
    fn row_lengths_match_for_all_sizes() {
        for n in 0..40 {
            let collection = fixtures::collection(0..n);
            for c in 1..=10 {
                let grid = VirtualGrid::new(collection.items(), c);
                let n = n as usize;
                assert_eq!(grid.row_count(), n.div_ceil(c), "n={n} c={c}");
                for i in 0..grid.row_count() {
                    assert_eq!(grid.row(i).len(), c.min(n - i * c), "n={n} c={c} i={i}");
                }
                assert!(grid.row(grid.row_count()).is_empty());
            }
        }
    }

    #[test]
    fn rows_keep_collection_order() {
        let collection = fixtures::collection([9, 8, 7, 6, 5]);
        let grid = VirtualGrid::new(collection.items(), 3);
        let flattened: Vec<MediaId> = grid
            .rows(0..grid.row_count())
            .flat_map(|(_, row)| row.iter().map(|item| item.id))
            .collect();
        assert_eq!(flattened, collection.ids().collect::<Vec<_>>());
    }

    #[test]
    fn empty_collection_has_no_rows() {
        let grid = VirtualGrid::new(&[], 4);
        assert_eq!(grid.row_count(), 0);
        assert!(grid.row(0).is_empty());
        assert_eq!(grid.visible_rows(0.0, 500.0, 100.0), 0..0);
    }

    #[test]
    fn zero_columns_is_treated_as_one() {
        let collection = fixtures::collection([1, 2]);
        let grid = VirtualGrid::new(collection.items(), 0);
        assert_eq!(grid.columns(), 1);
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn huge_row_index_is_empty() {
        let collection = fixtures::collection([1, 2]);
        let grid = VirtualGrid::new(collection.items(), 3);
        assert!(grid.row(usize::MAX).is_empty());
    }

    #[test]
    fn visible_rows_are_bounded_by_viewport() {
        let collection = fixtures::collection(0..10_000);
        let grid = VirtualGrid::new(collection.items(), 5);

        assert_eq!(grid.visible_rows(0.0, 500.0, 100.0), 0..5);
        assert_eq!(grid.visible_rows(150.0, 500.0, 100.0), 1..7);
        // Scrolled to the very end.
        let end = grid.content_height(100.0);
        assert_eq!(grid.visible_rows(end - 500.0, 500.0, 100.0), 1995..2000);
        // Past the end never yields rows that do not exist.
        assert_eq!(grid.visible_rows(end + 1000.0, 500.0, 100.0), 2000..2000);
    }

    #[test]
    fn degenerate_viewport_renders_nothing() {
        let collection = fixtures::collection(0..10);
        let grid = VirtualGrid::new(collection.items(), 2);
        assert_eq!(grid.visible_rows(0.0, 0.0, 100.0), 0..0);
        assert_eq!(grid.visible_rows(0.0, 300.0, 0.0), 0..0);
    }
}
