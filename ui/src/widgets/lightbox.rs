//! Full-size viewer for one item of the gallery.
//!
//! Opened from a thumbnail click. Previous/next walk the collection in its current order and
//! are disabled at either end. Escape or a click on the backdrop closes it.

use egui::{Button, Id, Image, Key, Modal, RichText, Ui, vec2};
use shoebox_business::{BusinessConfig, MediaItem};

use crate::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LightboxAction {
    Previous,
    Next,
    Close,
}

/// Shows the lightbox if an item is open. Does nothing otherwise.
pub fn lightbox(state: &mut State, ctx: &egui::Context) {
    let Some(item) = state.gallery.open_item().cloned() else {
        return;
    };
    let has_previous = state.gallery.has_previous();
    let has_next = state.gallery.has_next();
    let screen = ctx.screen_rect().size();
    let max_size = vec2(screen.x * 0.85, screen.y * 0.75);

    let mut action = None;
    let modal = Modal::new(Id::new("lightbox")).show(ctx, |ui| {
        ui.set_max_width(max_size.x);
        media_view(ui, &item, &state.config, max_size);

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(has_previous, Button::new("◀ Previous"))
                .clicked()
            {
                action = Some(LightboxAction::Previous);
            }
            if ui.add_enabled(has_next, Button::new("Next ▶")).clicked() {
                action = Some(LightboxAction::Next);
            }
            if ui.button("Close").clicked() {
                action = Some(LightboxAction::Close);
            }
        });
    });

    ctx.input(|i| {
        if has_previous && i.key_pressed(Key::ArrowLeft) {
            action = Some(LightboxAction::Previous);
        } else if has_next && i.key_pressed(Key::ArrowRight) {
            action = Some(LightboxAction::Next);
        }
    });
    if action.is_none() && modal.should_close() {
        action = Some(LightboxAction::Close);
    }

    match action {
        Some(LightboxAction::Previous) => state.gallery.previous(),
        Some(LightboxAction::Next) => state.gallery.next(),
        Some(LightboxAction::Close) => state.gallery.close_lightbox(),
        None => {}
    }
}

fn media_view(ui: &mut Ui, item: &MediaItem, config: &BusinessConfig, max_size: egui::Vec2) {
    ui.label(RichText::new(item.display_name()).strong());
    ui.label(RichText::new(item.uploaded_at_display()).small().weak());
    ui.add_space(6.0);

    if item.is_video() {
        // No in-app player: show the poster frame and link out to the file.
        ui.add(
            Image::new(config.asset_url(&item.thumbnail_path))
                .max_size(max_size)
                .show_loading_spinner(true),
        );
        ui.horizontal(|ui| {
            ui.hyperlink_to("▶ Play video", config.asset_url(&item.file_path));
            if let Some(mime) = item.video_mime() {
                ui.label(RichText::new(mime).small().weak());
            }
        });
    } else {
        ui.add(
            Image::new(config.asset_url(&item.file_path))
                .max_size(max_size)
                .maintain_aspect_ratio(true)
                .show_loading_spinner(true),
        );
    }
}
