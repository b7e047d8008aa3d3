//! Shared color constants for the UI.

use egui::Color32;

/// Forest green for success notices and the greeting.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Red for errors and the destructive delete action.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Amber for the skipped-duplicates panel.
pub const COLOR_AMBER: Color32 = Color32::from_rgb(255, 193, 7);

/// Blue outline of selected cards.
pub const COLOR_ACCENT: Color32 = Color32::from_rgb(13, 110, 253);
