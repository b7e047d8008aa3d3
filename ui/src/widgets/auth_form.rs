//! Login and registration forms.
//!
//! Both forms edit the inputs held in [`AuthForm`](crate::state::AuthForm) directly and hand
//! submission to [`tasks`]. Validation errors and server rejections are shown above the
//! fields in red.

use egui::{Align, Button, Layout, Response, RichText, TextEdit, Ui};
use shoebox_business::AuthStatus;

use crate::state::{AuthMode, State};
use crate::tasks;
use crate::utils::colors::COLOR_RED;

const FIELD_WIDTH: f32 = 240.0;

/// Shows whichever form is active, or a spinner while a login is being checked.
pub fn auth_form(state: &mut State, ui: &mut Ui) -> Response {
    if matches!(state.auth, AuthStatus::Authenticating) {
        return ui
            .with_layout(Layout::top_down(Align::Center), |ui| {
                ui.spinner();
                ui.label("Signing in...");
            })
            .response;
    }

    match state.auth_form.mode {
        AuthMode::Login => login_form(state, ui),
        AuthMode::Register => register_form(state, ui),
    }
}

fn error_message(state: &State) -> Option<String> {
    if let Some(err) = &state.auth_form.error {
        return Some(err.clone());
    }
    match &state.auth {
        AuthStatus::Failed(message) if state.auth_form.mode == AuthMode::Login => {
            Some(message.clone())
        }
        _ => None,
    }
}

fn labeled_field(ui: &mut Ui, label: &str, value: &mut String, password: bool) -> Response {
    ui.label(label);
    ui.add(
        TextEdit::singleline(value)
            .password(password)
            .desired_width(FIELD_WIDTH),
    )
}

fn submitted(ui: &Ui, field: &Response) -> bool {
    field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

fn login_form(state: &mut State, ui: &mut Ui) -> Response {
    let error = error_message(state);
    let in_flight = state.auth_form.in_flight;
    let mut should_login = false;
    let mut switch = false;

    let response = ui
        .with_layout(Layout::top_down(Align::Center), |ui| {
            ui.label(RichText::new("Sign in").size(20.0));
            ui.add_space(12.0);

            if let Some(err) = &error {
                ui.colored_label(COLOR_RED, err);
                ui.add_space(8.0);
            }

            let input = &mut state.auth_form.login;
            labeled_field(ui, "Username or email", &mut input.credential, false);
            ui.add_space(6.0);
            let password = labeled_field(ui, "Password", &mut input.password, true);
            if submitted(ui, &password) {
                should_login = true;
            }

            ui.add_space(12.0);
            if ui.add_enabled(!in_flight, Button::new("Login")).clicked() {
                should_login = true;
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label("No account yet?");
                if ui.link("Register").clicked() {
                    switch = true;
                }
            });
        })
        .response;

    if switch {
        state.auth_form.switch_to(AuthMode::Register);
        if matches!(state.auth, AuthStatus::Failed(_)) {
            state.auth = AuthStatus::NotAuthenticated;
        }
    } else if should_login && !in_flight {
        tasks::login(state, ui.ctx());
    }

    response
}

fn register_form(state: &mut State, ui: &mut Ui) -> Response {
    let error = error_message(state);
    let in_flight = state.auth_form.in_flight;
    let mut should_register = false;
    let mut switch = false;

    let response = ui
        .with_layout(Layout::top_down(Align::Center), |ui| {
            ui.label(RichText::new("Create an account").size(20.0));
            ui.add_space(12.0);

            if let Some(err) = &error {
                ui.colored_label(COLOR_RED, err);
                ui.add_space(8.0);
            }

            let input = &mut state.auth_form.register;
            labeled_field(ui, "Username", &mut input.username, false);
            ui.add_space(6.0);
            labeled_field(ui, "Email", &mut input.email, false);
            ui.add_space(6.0);
            let password = labeled_field(ui, "Password", &mut input.password, true);
            if submitted(ui, &password) {
                should_register = true;
            }

            ui.add_space(12.0);
            if ui.add_enabled(!in_flight, Button::new("Register")).clicked() {
                should_register = true;
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label("Already registered?");
                if ui.link("Back to login").clicked() {
                    switch = true;
                }
            });
        })
        .response;

    if switch {
        state.auth_form.switch_to(AuthMode::Login);
    } else if should_register && !in_flight {
        tasks::register(state, ui.ctx());
    }

    response
}
