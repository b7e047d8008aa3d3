//! Background collaborator calls and how their results land back in [`State`].
//!
//! Every call runs on the tokio runtime held by the state. When it finishes it sends one
//! [`AppEvent`] and requests a repaint; [`process_events`] applies those events at the start
//! of the next frame, so state is only ever mutated on the UI thread.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use shoebox_business::{
    ApiError, AuthStatus, MediaCollection, MediaId, SessionUser, UploadFile, ValidationError,
    delete_and_refresh, refresh, restore_session, upload_and_refresh,
};

use crate::state::{AuthMode, Notice, State};

pub enum AppEvent {
    SessionChecked(AuthStatus),
    LoggedIn(Result<(SessionUser, String), ApiError>),
    Registered(Result<String, ApiError>),
    LoggedOut(Result<String, ApiError>),
    Fetched(Result<MediaCollection, ApiError>),
    /// Some picked files could not be read from disk and were left out of the batch.
    /// `aborted` is set when none were readable, so no batch was started at all.
    Unreadable { paths: Vec<String>, aborted: bool },
    UploadRejected(ValidationError),
    UploadRefetched(Result<MediaCollection, ApiError>),
    Deleted(Result<(String, Result<MediaCollection, ApiError>), ApiError>),
}

fn spawn<F>(state: &State, ctx: &egui::Context, task: F)
where
    F: Future<Output = AppEvent> + Send + 'static,
{
    let tx = state.event_sender();
    let ctx = ctx.clone();
    state.runtime.spawn(async move {
        let event = task.await;
        if tx.send(event).is_err() {
            log::debug!("Tasks: state dropped before the result arrived");
        }
        ctx.request_repaint();
    });
}

/// Re-validates the cached session. Issued once per launch.
pub fn check_session(state: &mut State, ctx: &egui::Context) {
    state.session_checked = true;
    let api = Arc::clone(&state.api);
    let cache = state.session_cache();
    spawn(state, ctx, async move {
        AppEvent::SessionChecked(restore_session(api.as_ref(), cache.as_ref()).await)
    });
}

pub fn login(state: &mut State, ctx: &egui::Context) {
    if let Err(err) = state.auth_form.login.validate() {
        state.auth_form.error = Some(err.to_string());
        return;
    }
    state.auth_form.error = None;
    state.auth_form.in_flight = true;
    state.auth = AuthStatus::Authenticating;
    let api = Arc::clone(&state.api);
    let input = state.auth_form.login.clone();
    spawn(state, ctx, async move {
        AppEvent::LoggedIn(api.login(&input).await)
    });
}

pub fn register(state: &mut State, ctx: &egui::Context) {
    if let Err(err) = state.auth_form.register.validate() {
        state.auth_form.error = Some(err.to_string());
        return;
    }
    state.auth_form.error = None;
    state.auth_form.in_flight = true;
    let api = Arc::clone(&state.api);
    let input = state.auth_form.register.clone();
    spawn(state, ctx, async move {
        AppEvent::Registered(api.register(&input).await)
    });
}

pub fn logout(state: &State, ctx: &egui::Context) {
    let api = Arc::clone(&state.api);
    spawn(state, ctx, async move { AppEvent::LoggedOut(api.logout().await) });
}

pub fn fetch_media(state: &mut State, ctx: &egui::Context) {
    state.fetching = true;
    let api = Arc::clone(&state.api);
    spawn(state, ctx, async move {
        AppEvent::Fetched(refresh(api.as_ref()).await)
    });
}

/// Reads `paths` and uploads them one by one, refetching once at the end.
pub fn upload_files(state: &mut State, ctx: &egui::Context, paths: Vec<PathBuf>) {
    if paths.is_empty() {
        state.push_notice(Notice::error(ValidationError::NoFilesSelected.to_string()));
        return;
    }
    if state.uploads.is_in_flight() {
        return;
    }
    state.uploads.begin();

    let api = Arc::clone(&state.api);
    let events = state.event_sender();
    let progress = state.upload_sender();
    spawn(state, ctx, async move {
        let mut files = Vec::with_capacity(paths.len());
        let mut unreadable = Vec::new();
        for path in paths {
            match UploadFile::from_path(&path).await {
                Ok(file) => files.push(file),
                Err(err) => {
                    warn!("Tasks: could not read {}: {err}", path.display());
                    unreadable.push(path.display().to_string());
                }
            }
        }
        if files.is_empty() && !unreadable.is_empty() {
            return AppEvent::Unreadable {
                paths: unreadable,
                aborted: true,
            };
        }
        if !unreadable.is_empty()
            && events
                .send(AppEvent::Unreadable {
                    paths: unreadable,
                    aborted: false,
                })
                .is_err()
        {
            log::debug!("Tasks: state dropped before the unreadable list arrived");
        }

        match upload_and_refresh(api, files, &progress).await {
            Ok((summary, fetched)) => {
                info!("Tasks: upload batch finished ({} file(s))", summary.total());
                AppEvent::UploadRefetched(fetched)
            }
            Err(err) => AppEvent::UploadRejected(err),
        }
    });
}

/// Deletes the current selection. The caller has already confirmed.
pub fn delete_selected(state: &mut State, ctx: &egui::Context) {
    let ids: Vec<MediaId> = state.gallery.selection().ids();
    if ids.is_empty() {
        state.push_notice(Notice::error(ValidationError::NoItemsSelected.to_string()));
        return;
    }
    state.deleting = true;
    let api = Arc::clone(&state.api);
    spawn(state, ctx, async move {
        AppEvent::Deleted(delete_and_refresh(api.as_ref(), &ids).await)
    });
}

fn apply_fetch(state: &mut State, fetched: Result<MediaCollection, ApiError>) {
    state.fetching = false;
    if let Some(err) = state.gallery.apply_fetch(fetched) {
        state.push_notice(Notice::error(format!(
            "Could not load media: {}",
            err.user_message()
        )));
    }
}

/// Applies everything that arrived since the last frame.
pub fn process_events(state: &mut State, ctx: &egui::Context) {
    for event in state.pending_upload_events() {
        if let Some(summary) = state.uploads.apply(event)
            && let Some(message) = summary.message()
        {
            state.push_notice(Notice::info(message));
        }
    }

    for event in state.pending_events() {
        match event {
            AppEvent::SessionChecked(status) => {
                if status.is_authenticated() {
                    state.auth = status;
                    fetch_media(state, ctx);
                } else if matches!(
                    state.auth,
                    AuthStatus::Optimistic(_) | AuthStatus::NotAuthenticated
                ) {
                    // A login started or finished meanwhile wins over the stale check.
                    state.sign_out_locally();
                }
            }
            AppEvent::LoggedIn(result) => {
                state.auth_form.in_flight = false;
                match result {
                    Ok((user, _)) => {
                        state.auth = AuthStatus::Authenticated(user);
                        state.auth_form.login.clear();
                        state.auth_form.error = None;
                        fetch_media(state, ctx);
                    }
                    Err(err) => {
                        state.auth = AuthStatus::Failed(err.user_message());
                    }
                }
            }
            AppEvent::Registered(result) => {
                state.auth_form.in_flight = false;
                match result {
                    Ok(message) => {
                        state.auth_form.register.clear();
                        state.auth_form.login.clear();
                        state.auth_form.switch_to(AuthMode::Login);
                        state.push_notice(Notice::info(message));
                    }
                    Err(err) => state.auth_form.error = Some(err.user_message()),
                }
            }
            AppEvent::LoggedOut(result) => match result {
                Ok(message) => {
                    state.sign_out_locally();
                    state.push_notice(Notice::info(message));
                }
                Err(err) => {
                    state.push_notice(Notice::error(format!(
                        "Could not log out: {}",
                        err.user_message()
                    )));
                }
            },
            AppEvent::Fetched(fetched) | AppEvent::UploadRefetched(fetched) => {
                apply_fetch(state, fetched);
            }
            AppEvent::Unreadable { paths, aborted } => {
                if aborted {
                    state.uploads.abort();
                }
                state.push_notice(Notice::error(format!(
                    "Could not read:\n{}",
                    paths.join("\n")
                )));
            }
            AppEvent::UploadRejected(err) => {
                state.uploads.abort();
                state.push_notice(Notice::error(err.to_string()));
            }
            AppEvent::Deleted(result) => {
                state.deleting = false;
                match result {
                    Ok((message, fetched)) => {
                        apply_fetch(state, fetched);
                        state.push_notice(Notice::info(message));
                    }
                    Err(err) => {
                        state.push_notice(Notice::error(format!("Error: {}", err.user_message())));
                    }
                }
            }
        }
    }
}
