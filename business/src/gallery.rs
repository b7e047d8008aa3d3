//! Top-level gallery controller state and the collaborator workflows that feed it.
//!
//! [`GalleryState`] exclusively owns the collection, selection, lightbox and layout. The
//! async workflows below never touch it: they return fresh values which the owner applies
//! with [`GalleryState::apply_fetch`], so no task ever holds a reference across a refetch.

use std::sync::Arc;

use flume::Sender;
use log::{info, warn};

use crate::api::MediaApi;
use crate::error::{ApiError, ValidationError};
use crate::grid::VirtualGrid;
use crate::layout::{LayoutEngine, LayoutState};
use crate::media::{MediaCollection, MediaId, MediaItem};
use crate::selection::{Lightbox, SelectionSet};
use crate::session::{AuthStatus, CachedSession};
use crate::upload::{BatchSummary, UploadCoordinator, UploadEvent, UploadFile};

#[derive(Debug, Default)]
pub struct GalleryState {
    collection: MediaCollection,
    selection: SelectionSet,
    lightbox: Lightbox,
    layout: LayoutEngine,
}

impl GalleryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self) -> &MediaCollection {
        &self.collection
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn layout(&self) -> LayoutState {
        self.layout.state()
    }

    pub fn layout_engine_mut(&mut self) -> &mut LayoutEngine {
        &mut self.layout
    }

    /// Swaps in a freshly fetched collection. Selection and lightbox always reset.
    pub fn replace_collection(&mut self, collection: MediaCollection) {
        self.collection = collection;
        self.selection.clear();
        self.lightbox.close();
    }

    /// Applies a refetch result. On failure the gallery is emptied and the error returned
    /// for display.
    pub fn apply_fetch(&mut self, fetched: Result<MediaCollection, ApiError>) -> Option<ApiError> {
        match fetched {
            Ok(collection) => {
                self.replace_collection(collection);
                None
            }
            Err(err) => {
                self.replace_collection(MediaCollection::default());
                Some(err)
            }
        }
    }

    /// Drops everything tied to the signed-in user.
    pub fn clear(&mut self) {
        self.replace_collection(MediaCollection::default());
    }

    pub fn observe_layout(&mut self, container_width: f32, viewport_height: f32) -> LayoutState {
        self.layout.observe(container_width, viewport_height)
    }

    pub fn grid(&self) -> VirtualGrid<'_> {
        VirtualGrid::new(self.collection.items(), self.layout.state().columns)
    }

    pub fn toggle(&mut self, id: MediaId) -> bool {
        self.selection.toggle(id)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.collection);
    }

    pub fn all_selected(&self) -> bool {
        self.selection.all_selected(&self.collection)
    }

    pub fn open(&mut self, id: MediaId) {
        self.lightbox.open(id);
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox.close();
    }

    pub fn next(&mut self) {
        self.lightbox.next(&self.collection);
    }

    pub fn previous(&mut self) {
        self.lightbox.previous(&self.collection);
    }

    pub fn open_item(&self) -> Option<&MediaItem> {
        self.lightbox.current(&self.collection)
    }

    pub fn has_next(&self) -> bool {
        self.lightbox.has_next(&self.collection)
    }

    pub fn has_previous(&self) -> bool {
        self.lightbox.has_previous(&self.collection)
    }

    /// Text of the confirmation shown before a bulk delete.
    pub fn delete_prompt(&self) -> Result<String, ValidationError> {
        if self.selection.is_empty() {
            return Err(ValidationError::NoItemsSelected);
        }
        Ok(format!("Delete {} file(s)?", self.selection.len()))
    }
}

/// Fetches the collection. The caller applies it with [`GalleryState::apply_fetch`].
pub async fn refresh(api: &dyn MediaApi) -> Result<MediaCollection, ApiError> {
    api.list_media().await.inspect_err(|err| {
        warn!("Gallery: fetching media failed: {err}");
    })
}

/// Uploads every file in order, then refetches exactly once.
pub async fn upload_and_refresh(
    api: Arc<dyn MediaApi>,
    files: Vec<UploadFile>,
    events: &Sender<UploadEvent>,
) -> Result<(BatchSummary, Result<MediaCollection, ApiError>), ValidationError> {
    let summary = UploadCoordinator::new(Arc::clone(&api))
        .upload_batch(files, events)
        .await?;
    let fetched = refresh(api.as_ref()).await;
    Ok((summary, fetched))
}

/// Deletes `ids` and, only when the server accepts, refetches.
pub async fn delete_and_refresh(
    api: &dyn MediaApi,
    ids: &[MediaId],
) -> Result<(String, Result<MediaCollection, ApiError>), ApiError> {
    let message = api.delete_many(ids).await?;
    info!("Gallery: deleted {} item(s)", ids.len());
    let fetched = refresh(api).await;
    Ok((message, fetched))
}

/// Re-validates an optimistic session against the server.
///
/// Any failure, including an unreachable server, signs the user out locally.
pub async fn restore_session(api: &dyn MediaApi, cache: Option<&CachedSession>) -> AuthStatus {
    match api.check_session().await {
        Ok(Some(user)) => AuthStatus::Authenticated(user),
        Ok(None) => {
            if cache.is_some() {
                info!("Gallery: cached session is no longer valid");
            }
            AuthStatus::NotAuthenticated
        }
        Err(err) => {
            warn!("Gallery: session check failed: {err}");
            AuthStatus::NotAuthenticated
        }
    }
}
