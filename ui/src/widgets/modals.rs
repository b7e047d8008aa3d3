//! Blocking dialogs: delete confirmation and notices.

use egui::{Button, Id, Modal, RichText};

use crate::state::{NoticeKind, State};
use crate::tasks;
use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

/// Asks before deleting the current selection. Cancelling leaves the selection untouched.
pub fn confirm_delete(state: &mut State, ctx: &egui::Context) {
    if !state.confirm_delete {
        return;
    }
    let prompt = match state.gallery.delete_prompt() {
        Ok(prompt) => prompt,
        Err(_) => {
            state.confirm_delete = false;
            return;
        }
    };

    let mut confirmed = false;
    let mut cancelled = false;
    let modal = Modal::new(Id::new("confirm_delete")).show(ctx, |ui| {
        ui.set_width(280.0);
        ui.heading("Confirm");
        ui.add_space(8.0);
        ui.label(prompt);
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui
                .add(Button::new(RichText::new("Delete").color(COLOR_RED)))
                .clicked()
            {
                confirmed = true;
            }
            if ui.button("Cancel").clicked() {
                cancelled = true;
            }
        });
    });

    if confirmed {
        state.confirm_delete = false;
        tasks::delete_selected(state, ctx);
    } else if cancelled || modal.should_close() {
        state.confirm_delete = false;
    }
}

/// Shows the oldest pending notice until the user acknowledges it; the next one follows.
pub fn notice(state: &mut State, ctx: &egui::Context) {
    let Some(notice) = state.notice().cloned() else {
        return;
    };

    let mut dismissed = false;
    let modal = Modal::new(Id::new("notice")).show(ctx, |ui| {
        ui.set_max_width(360.0);
        let (title, color) = match notice.kind {
            NoticeKind::Info => ("Done", COLOR_GREEN),
            NoticeKind::Error => ("Something went wrong", COLOR_RED),
        };
        ui.label(RichText::new(title).strong().color(color));
        ui.add_space(6.0);
        ui.label(&notice.message);
        ui.add_space(10.0);
        if ui.button("OK").clicked() {
            dismissed = true;
        }
    });

    if dismissed || modal.should_close() {
        state.dismiss_notice();
    }
}
