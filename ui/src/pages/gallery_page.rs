//! Library page for signed-in users.
//!
//! Header with the greeting and logout, a toolbar for upload and selection, the running
//! upload batch, then the virtualized grid. The lightbox and dialogs are layered on top by
//! the app.

use egui::{Button, Response, RichText, Ui};

use crate::state::State;
use crate::tasks;
use crate::utils::colors::{COLOR_GREEN, COLOR_RED};
use crate::utils::file_picker::FilePickerHandler;
use crate::widgets;

/// Renders the gallery page.
pub fn gallery_page(state: &mut State, ui: &mut Ui, picker: &dyn FilePickerHandler) -> Response {
    ui.vertical(|ui| {
        header(state, ui);
        ui.separator();
        toolbar(state, ui, picker);
        ui.add_space(8.0);

        widgets::upload_progress(state, ui);
        widgets::skipped_panel(state, ui);
        ui.add_space(8.0);

        if state.fetching && state.gallery.collection().is_empty() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading your library...");
            });
        }
        widgets::media_grid(state, ui);
    })
    .response
}

fn header(state: &mut State, ui: &mut Ui) {
    let username = state.auth.username().unwrap_or_default().to_string();
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format!("Hello, {username}!"))
                .size(18.0)
                .color(COLOR_GREEN),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Logout").clicked() {
                tasks::logout(state, ui.ctx());
            }
        });
    });
}

fn toolbar(state: &mut State, ui: &mut Ui, picker: &dyn FilePickerHandler) {
    // A cached session is shown right away but may be stale; nothing is changed on the
    // server until it is confirmed.
    let confirmed = state.auth.is_authenticated();
    let uploading = state.uploads.is_in_flight();
    let has_items = !state.gallery.collection().is_empty();
    let selected = state.gallery.selection().len();

    ui.horizontal(|ui| {
        let upload_label = if uploading { "Uploading..." } else { "Upload" };
        if ui
            .add_enabled(confirmed && !uploading, Button::new(upload_label))
            .on_hover_text("Choose photos or videos to add")
            .on_disabled_hover_text(if confirmed {
                "An upload is already running"
            } else {
                "Checking your session..."
            })
            .clicked()
        {
            let paths = picker.pick_media_files();
            // A cancelled dialog is not an error.
            if !paths.is_empty() {
                tasks::upload_files(state, ui.ctx(), paths);
            }
        }

        if has_items {
            let all_selected = state.gallery.all_selected();
            let label = if all_selected {
                "Deselect all"
            } else {
                "Select all"
            };
            if ui.add_enabled(confirmed, Button::new(label)).clicked() {
                state.gallery.select_all();
            }
        }

        if selected > 0 {
            let delete = Button::new(
                RichText::new(format!("Delete {selected} file(s)")).color(COLOR_RED),
            );
            if ui.add_enabled(confirmed && !state.deleting, delete).clicked() {
                state.confirm_delete = true;
            }
        }
    });
}
