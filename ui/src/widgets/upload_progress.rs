//! Per-file progress of the running upload batch and the skipped-duplicates panel.

use egui::{Frame, ProgressBar, RichText, Ui};

use crate::state::State;
use crate::utils::colors::COLOR_AMBER;

/// One bar per queued file, labelled with its name, percent and remaining time.
pub fn upload_progress(state: &State, ui: &mut Ui) {
    let tasks = state.uploads.tasks();
    if tasks.is_empty() {
        return;
    }

    ui.group(|ui| {
        ui.label(RichText::new("Uploading").strong());
        for task in tasks {
            ui.add(
                ProgressBar::new(f32::from(task.progress_percent) / 100.0)
                    .text(task.label()),
            );
        }
    });
}

/// Files the server refused as already present in the last batch.
pub fn skipped_panel(state: &mut State, ui: &mut Ui) {
    if state.uploads.skipped().is_empty() {
        return;
    }

    let mut dismiss = false;
    Frame::group(ui.style())
        .stroke((1.0, COLOR_AMBER))
        .show(ui, |ui| {
            ui.label(
                RichText::new(format!(
                    "Skipped {} duplicate file(s):",
                    state.uploads.skipped().len()
                ))
                .color(COLOR_AMBER),
            );
            for name in state.uploads.skipped() {
                ui.label(format!("• {name}"));
            }
            if ui.button("Dismiss").clicked() {
                dismiss = true;
            }
        });

    if dismiss {
        state.uploads.clear_skipped();
    }
}
