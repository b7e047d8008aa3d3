//! Responsive column layout for the media grid.
//!
//! Column count and row height are derived from the container width using two fixed
//! breakpoint profiles. Every card is assumed to hold a 4:3 thumbnail regardless of the real
//! aspect ratio of the media, so the virtualized list can use a single fixed row height.
//!
//! The engine recomputes synchronously on every observation (container resize or viewport
//! resize) and notifies subscribers only when the result actually changed.

/// Containers narrower than this use the compact profile.
pub const COMPACT_BREAKPOINT: f32 = 640.0;
/// Smallest width a column may shrink to before a column is dropped.
pub const MIN_COLUMN_WIDTH: f32 = 200.0;
pub const MAX_COLUMNS: usize = 10;
/// Vertical space reserved above the grid for header, toolbar and progress.
pub const LIST_HEIGHT_OFFSET: f32 = 150.0;
/// Thumbnails are laid out as 4:3 boxes.
pub const THUMBNAIL_ASPECT: f32 = 3.0 / 4.0;
/// Extra space added to every row so card borders and the checkbox never clip.
pub const ROW_BUFFER: f32 = 40.0;

/// Pixel constants of one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub container_padding: f32,
    pub gap: f32,
    /// Caption block under the thumbnail (min-height plus vertical padding).
    pub info_height: f32,
    pub margin_bottom: f32,
}

pub const COMPACT: Breakpoint = Breakpoint {
    container_padding: 8.0,
    gap: 12.0,
    info_height: 36.0 + 10.0 * 2.0,
    margin_bottom: 20.0,
};

pub const REGULAR: Breakpoint = Breakpoint {
    container_padding: 16.0,
    gap: 20.0,
    info_height: 40.0 + 12.0 * 2.0,
    margin_bottom: 32.0,
};

impl Breakpoint {
    pub fn for_width(container_width: f32) -> Self {
        if container_width < COMPACT_BREAKPOINT {
            COMPACT
        } else {
            REGULAR
        }
    }
}

/// Number of columns that fit in `container_width`, always within `1..=MAX_COLUMNS`.
pub fn compute_columns(container_width: f32) -> usize {
    let bp = Breakpoint::for_width(container_width);
    let fit = ((container_width - bp.container_padding) / (MIN_COLUMN_WIDTH + bp.gap)).floor();
    if fit.is_nan() || fit < 1.0 {
        1
    } else {
        (fit as usize).min(MAX_COLUMNS)
    }
}

/// Width of a single column once padding and gaps are taken out.
pub fn compute_column_width(container_width: f32, columns: usize) -> f32 {
    let bp = Breakpoint::for_width(container_width);
    let columns = columns.max(1) as f32;
    ((container_width - bp.container_padding - bp.gap * (columns - 1.0)) / columns).max(0.0)
}

/// Pixel height of one grid row holding `columns` cards.
pub fn compute_row_height(container_width: f32, columns: usize) -> f32 {
    let bp = Breakpoint::for_width(container_width);
    let image_height = compute_column_width(container_width, columns) * THUMBNAIL_ASPECT;
    image_height + bp.info_height + bp.margin_bottom + ROW_BUFFER
}

pub fn compute_list_height(viewport_height: f32) -> f32 {
    (viewport_height - LIST_HEIGHT_OFFSET).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    pub columns: usize,
    pub row_height: f32,
    pub list_height: f32,
    /// Width of one card, kept so the renderer does not redo the breakpoint math.
    pub column_width: f32,
    pub breakpoint: Breakpoint,
}

impl LayoutState {
    pub fn compute(container_width: f32, viewport_height: f32) -> Self {
        let columns = compute_columns(container_width);
        Self {
            columns,
            row_height: compute_row_height(container_width, columns),
            list_height: compute_list_height(viewport_height),
            column_width: compute_column_width(container_width, columns),
            breakpoint: Breakpoint::for_width(container_width),
        }
    }

    /// Height of one card: thumbnail plus caption, without the spacing below it.
    pub fn card_height(&self) -> f32 {
        self.column_width * THUMBNAIL_ASPECT + self.breakpoint.info_height
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::compute(0.0, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type LayoutCallback = Box<dyn FnMut(&LayoutState) + Send>;

/// Holds the current [`LayoutState`] and the callbacks interested in changes to it.
#[derive(Default)]
pub struct LayoutEngine {
    state: Option<LayoutState>,
    subscribers: Vec<(SubscriptionId, LayoutCallback)>,
    next_id: u64,
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current layout, or the zero-width layout before the first observation.
    pub fn state(&self) -> LayoutState {
        self.state.unwrap_or_default()
    }

    /// Registers a callback invoked synchronously, in subscription order, each time an
    /// observation produces a different layout.
    pub fn on_layout_change(
        &mut self,
        callback: impl FnMut(&LayoutState) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        before != self.subscribers.len()
    }

    /// Feeds a new container width / viewport height measurement.
    ///
    /// Returns the recomputed layout. No debouncing: every call recomputes.
    pub fn observe(&mut self, container_width: f32, viewport_height: f32) -> LayoutState {
        let next = LayoutState::compute(container_width, viewport_height);
        if self.state != Some(next) {
            log::debug!(
                "LayoutEngine: width {container_width} -> {} columns, row height {:.1}",
                next.columns,
                next.row_height
            );
            self.state = Some(next);
            for (_, callback) in &mut self.subscribers {
                callback(&next);
            }
        }
        next
    }
}
