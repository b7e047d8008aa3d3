//! Media records as returned by the listing endpoint.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Server timestamp layout (`DATETIME` column).
const SERVER_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Layout used on cards.
const DISPLAY_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Stable identifier of a stored media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MediaId(pub i64);

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for MediaId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_i64(deserializer).map(Self)
    }
}

/// Accepts an integer either as a JSON number or as a numeric string.
///
/// PDO hands numeric columns back as strings unless told otherwise.
pub(crate) fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid id '{s}'"))),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: MediaId,
    #[serde(default)]
    pub file_name: String,
    pub file_path: String,
    pub thumbnail_path: String,
    /// The photo-only backend omits this column.
    #[serde(default)]
    pub media_type: MediaType,
    pub uploaded_at: String,
    #[serde(default)]
    pub capture_date: Option<String>,
}

impl MediaItem {
    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }

    pub fn display_name(&self) -> &str {
        if self.file_name.trim().is_empty() {
            "Untitled"
        } else {
            &self.file_name
        }
    }

    pub fn uploaded_at_parsed(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.uploaded_at, SERVER_DATETIME_FORMAT).ok()
    }

    /// Upload time as `DD/MM/YYYY HH:mm`, or the raw server string when it does not parse.
    pub fn uploaded_at_display(&self) -> String {
        self.uploaded_at_parsed()
            .map(|t| t.format(DISPLAY_DATETIME_FORMAT).to_string())
            .unwrap_or_else(|| self.uploaded_at.clone())
    }

    /// MIME hint for videos, derived from the file extension.
    pub fn video_mime(&self) -> Option<String> {
        if !self.is_video() {
            return None;
        }
        let ext = self.file_name.rsplit_once('.')?.1.to_lowercase();
        Some(format!("video/{ext}"))
    }
}

/// Ordered snapshot of the library, newest first as the server returns it.
///
/// Cheap to clone; a refetch replaces the whole value rather than mutating it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaCollection {
    items: Arc<[MediaItem]>,
}

impl MediaCollection {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    pub fn position(&self, id: MediaId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn find(&self, id: MediaId) -> Option<&MediaItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = MediaId> + '_ {
        self.items.iter().map(|item| item.id)
    }
}

impl From<Vec<MediaItem>> for MediaCollection {
    fn from(items: Vec<MediaItem>) -> Self {
        Self::new(items)
    }
}
