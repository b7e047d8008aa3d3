//! Landing page for signed-out users.

use egui::{Align, Layout, Response, Ui};

use crate::{state::State, widgets};

/// Renders the app title above the login or registration form.
pub fn auth_page(state: &mut State, ui: &mut Ui) -> Response {
    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.add_space(40.0);
        ui.heading("Shoebox");
        ui.label("Your photos and videos, in one place.");
        ui.add_space(24.0);
        widgets::auth_form(state, ui);
    })
    .response
}

#[cfg(test)]
mod auth_page_test {
    use egui_kittest::Harness;
    use kittest::Queryable;

    use crate::state::State;

    #[tokio::test]
    async fn test_auth_page_shows_title_and_form() {
        let harness = Harness::new_ui_state(
            |ui, state: &mut State| {
                super::auth_page(state, ui);
            },
            State::test("http://127.0.0.1:9".to_string()),
        );

        assert!(harness.query_by_label("Shoebox").is_some());
        assert!(harness.query_by_label("Login").is_some());
    }
}
