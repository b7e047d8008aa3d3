//! Non-visual core of the Shoebox media library: responsive layout math, the virtualized
//! grid model, sequential uploads, selection and lightbox state, and the typed boundary to
//! the storage/auth collaborator.

mod api;
mod config;
mod error;
mod gallery;
mod grid;
pub mod http;
pub mod layout;
mod media;
mod selection;
mod session;
mod upload;

pub use api::{HttpMediaApi, MediaApi, StatusReply, decode_media_list};
pub use config::{BusinessConfig, DEFAULT_DUPLICATE_SIGNAL};
pub use error::{ApiError, ConfigError, HttpError, ValidationError};
pub use gallery::{
    GalleryState, delete_and_refresh, refresh, restore_session, upload_and_refresh,
};
pub use grid::VirtualGrid;
pub use layout::{LayoutEngine, LayoutState, SubscriptionId};
pub use media::{MediaCollection, MediaId, MediaItem, MediaType};
pub use selection::{Lightbox, SelectionSet};
pub use session::{
    AuthStatus, CachedSession, LoginInput, RegisterInput, SESSION_CACHE_KEY, SessionUser, UserId,
};
pub use upload::{
    BatchSummary, ETA_CALCULATING, Eta, Progress, UploadCoordinator, UploadEvent, UploadFailure,
    UploadFile, UploadOutcome, UploadTask, UploadTracker, estimate_progress,
};
