use std::time::Duration;

use shoebox_business::SESSION_CACHE_KEY;

use crate::utils::file_picker::{self, FilePickerHandler, SystemFilePickerHandler};
use crate::{pages, state::State, tasks, widgets};

/// Repaint interval while an upload batch reports progress.
const UPLOAD_REPAINT: Duration = Duration::from_millis(100);

pub struct ShoeboxApp {
    state: State,
    picker: Box<dyn FilePickerHandler>,
}

impl ShoeboxApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self::with_picker(state, Box::new(SystemFilePickerHandler))
    }

    /// Same as [`Self::new`] with a custom file picker, used by tests.
    pub fn with_picker(state: State, picker: Box<dyn FilePickerHandler>) -> Self {
        Self { state, picker }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

impl eframe::App for ShoeboxApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.state.session_checked {
            tasks::check_session(&mut self.state, ctx);
        }
        tasks::process_events(&mut self.state, ctx);

        if self.state.uploads.is_in_flight() {
            ctx.request_repaint_after(UPLOAD_REPAINT);
        }

        let signed_in = self.state.auth.shows_gallery();
        // Drops are ignored until a cached session has been confirmed.
        if self.state.auth.is_authenticated() {
            let dropped = file_picker::dropped_files(ctx);
            if !dropped.is_empty() {
                tasks::upload_files(&mut self.state, ctx, dropped);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if signed_in {
                pages::gallery_page(&mut self.state, ui, self.picker.as_ref());
            } else {
                pages::auth_page(&mut self.state, ui);
            }
        });

        if signed_in {
            widgets::lightbox(&mut self.state, ctx);
            widgets::confirm_delete(&mut self.state, ctx);
        }
        widgets::notice(&mut self.state, ctx);
    }

    /// Persists the optimistic session cache. `None` clears it.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, SESSION_CACHE_KEY, &self.state.session_cache());
    }
}
