//! Virtualized thumbnail grid.
//!
//! Only the rows intersecting the scroll viewport are laid out each frame; the rest of the
//! scroll height is reserved but empty. Thumbnails are loaded lazily through egui's image
//! loaders, so an off-screen card never issues a request.

use egui::{Align2, Checkbox, Color32, FontId, Image, Rect, RichText, Sense, Ui, UiBuilder, vec2};
use shoebox_business::{BusinessConfig, MediaItem, layout};

use crate::state::State;
use crate::utils::colors::COLOR_ACCENT;

/// What the user did to one card this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardAction {
    pub toggled: bool,
    pub opened: bool,
}

/// Renders the grid and applies clicks to the gallery state.
pub fn media_grid(state: &mut State, ui: &mut Ui) {
    let viewport_height = ui.ctx().screen_rect().height();
    let layout = state
        .gallery
        .observe_layout(ui.available_width(), viewport_height);

    if state.gallery.collection().is_empty() {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("No photos or videos yet").weak());
        });
        return;
    }

    let mut toggled = Vec::new();
    let mut opened = None;

    {
        let grid = state.gallery.grid();
        let selection = state.gallery.selection();
        let config = &state.config;

        egui::ScrollArea::vertical()
            .id_salt("media_grid")
            .auto_shrink([false, false])
            .max_height(layout.list_height.max(layout.row_height))
            .show_viewport(ui, |ui, viewport| {
                ui.set_height(grid.content_height(layout.row_height));
                let visible =
                    grid.visible_rows(viewport.min.y, viewport.height(), layout.row_height);
                let origin = ui.max_rect().min;

                for (row_index, row) in grid.rows(visible) {
                    let top = origin.y + row_index as f32 * layout.row_height;
                    for (column, item) in row.iter().enumerate() {
                        let left = origin.x
                            + layout.breakpoint.container_padding / 2.0
                            + column as f32 * (layout.column_width + layout.breakpoint.gap);
                        let rect = Rect::from_min_size(
                            egui::pos2(left, top),
                            vec2(layout.column_width, layout.card_height()),
                        );
                        let action =
                            media_card(ui, rect, item, selection.contains(item.id), config);
                        if action.toggled {
                            toggled.push(item.id);
                        }
                        if action.opened {
                            opened = Some(item.id);
                        }
                    }
                }
            });
    }

    for id in toggled {
        state.gallery.toggle(id);
    }
    if let Some(id) = opened {
        state.gallery.open(id);
    }
}

/// One card: thumbnail, caption and a selection checkbox on top.
///
/// The checkbox is added after the thumbnail so it wins the hit test; ticking it never opens
/// the lightbox.
pub fn media_card(
    ui: &mut Ui,
    rect: Rect,
    item: &MediaItem,
    selected: bool,
    config: &BusinessConfig,
) -> CardAction {
    let mut action = CardAction::default();
    let thumb_size = vec2(rect.width(), rect.width() * layout::THUMBNAIL_ASPECT);
    let thumb_rect = Rect::from_min_size(rect.min, thumb_size);

    let stroke_color = if selected {
        COLOR_ACCENT
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke.color
    };
    ui.painter()
        .rect_stroke(rect, 6.0, (1.5, stroke_color), egui::StrokeKind::Outside);

    let thumbnail = ui.put(
        thumb_rect,
        Image::new(config.asset_url(&item.thumbnail_path))
            .fit_to_exact_size(thumb_size)
            .corner_radius(6.0)
            .show_loading_spinner(true)
            .sense(Sense::click()),
    );
    let thumbnail = thumbnail.on_hover_text(item.display_name());
    if thumbnail.clicked() {
        action.opened = true;
    }

    if item.is_video() {
        ui.painter().text(
            thumb_rect.center(),
            Align2::CENTER_CENTER,
            "▶",
            FontId::proportional(36.0),
            Color32::from_white_alpha(220),
        );
    }

    let caption_rect = Rect::from_min_max(
        egui::pos2(rect.min.x + 8.0, thumb_rect.max.y + 4.0),
        egui::pos2(rect.max.x - 8.0, rect.max.y),
    );
    ui.scope_builder(UiBuilder::new().max_rect(caption_rect), |ui| {
        ui.add(egui::Label::new(RichText::new(item.display_name()).strong()).truncate());
        ui.label(RichText::new(item.uploaded_at_display()).small().weak());
    });

    let mut checked = selected;
    let checkbox_rect = Rect::from_min_size(rect.min + vec2(8.0, 8.0), vec2(20.0, 20.0));
    let checkbox = ui
        .put(checkbox_rect, Checkbox::without_text(&mut checked))
        .on_hover_text("Select");
    if checkbox.changed() {
        action.toggled = true;
    }

    action
}
