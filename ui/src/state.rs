use std::collections::VecDeque;
use std::sync::Arc;

use shoebox_business::{
    ApiError, AuthStatus, BusinessConfig, CachedSession, GalleryState, HttpMediaApi, LoginInput,
    MediaApi, RegisterInput, UploadEvent, UploadTracker,
};
use tokio::runtime::Handle;

use crate::tasks::AppEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Inputs of the login and register forms.
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub login: LoginInput,
    pub register: RegisterInput,
    pub error: Option<String>,
    pub in_flight: bool,
}

impl AuthForm {
    pub fn switch_to(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.error = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A message shown in a blocking modal until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// The main application state.
///
/// Owned by the frame loop. Background tasks only ever talk back through the two channels.
pub struct State {
    pub config: BusinessConfig,
    pub api: Arc<dyn MediaApi>,
    pub runtime: Handle,
    pub auth: AuthStatus,
    pub auth_form: AuthForm,
    pub gallery: GalleryState,
    pub uploads: UploadTracker,
    /// The delete confirmation is open.
    pub confirm_delete: bool,
    pub deleting: bool,
    pub fetching: bool,
    /// The session check has been issued for this launch.
    pub session_checked: bool,
    event_tx: flume::Sender<AppEvent>,
    event_rx: flume::Receiver<AppEvent>,
    upload_tx: flume::Sender<UploadEvent>,
    upload_rx: flume::Receiver<UploadEvent>,
    /// Notices waiting to be acknowledged, oldest first.
    notices: VecDeque<Notice>,
}

impl State {
    pub fn new(
        config: BusinessConfig,
        runtime: Handle,
        cache: Option<CachedSession>,
    ) -> Result<Self, ApiError> {
        let api = Arc::new(HttpMediaApi::new(config.clone())?);
        Ok(Self::with_api(config, api, runtime, cache))
    }

    pub fn with_api(
        config: BusinessConfig,
        api: Arc<dyn MediaApi>,
        runtime: Handle,
        cache: Option<CachedSession>,
    ) -> Self {
        let (event_tx, event_rx) = flume::unbounded();
        let (upload_tx, upload_rx) = flume::unbounded();
        Self {
            config,
            api,
            runtime,
            auth: AuthStatus::from_cache(cache),
            auth_form: AuthForm::default(),
            gallery: GalleryState::new(),
            uploads: UploadTracker::default(),
            confirm_delete: false,
            deleting: false,
            fetching: false,
            session_checked: false,
            event_tx,
            event_rx,
            upload_tx,
            upload_rx,
            notices: VecDeque::new(),
        }
    }

    /// State pointed at `base_url`, for tests running inside a tokio runtime.
    pub fn test(base_url: String) -> Self {
        Self::new(BusinessConfig::new(base_url), Handle::current(), None)
            .expect("test client should build")
    }

    pub fn event_sender(&self) -> flume::Sender<AppEvent> {
        self.event_tx.clone()
    }

    pub fn upload_sender(&self) -> flume::Sender<UploadEvent> {
        self.upload_tx.clone()
    }

    pub(crate) fn pending_events(&self) -> Vec<AppEvent> {
        self.event_rx.drain().collect()
    }

    pub(crate) fn pending_upload_events(&self) -> Vec<UploadEvent> {
        self.upload_rx.drain().collect()
    }

    /// Queues a notice behind the ones already waiting.
    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    /// Notice currently on screen.
    pub fn notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn pending_notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Value to persist as the optimistic session cache.
    pub fn session_cache(&self) -> Option<CachedSession> {
        self.auth.cache()
    }

    /// Forgets everything tied to the signed-in user.
    pub fn sign_out_locally(&mut self) {
        self.auth = AuthStatus::NotAuthenticated;
        self.gallery.clear();
        self.uploads.clear_skipped();
        self.confirm_delete = false;
    }
}
