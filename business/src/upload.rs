//! Sequential multi-file upload with per-file progress, ETA and outcome classification.
//!
//! ## Flow
//!
//! 1. An empty batch is rejected with [`ValidationError::NoFilesSelected`].
//! 2. [`UploadEvent::Started`] carries one [`UploadTask`] per file, all at 0%.
//! 3. Files are sent one at a time, in the order given. Progress ticks arrive as
//!    [`UploadEvent::Progress`]; the percentage never goes backwards for a file.
//! 4. Each file resolves to exactly one [`UploadOutcome`]. A failure never stops the batch and
//!    nothing is retried.
//! 5. [`UploadEvent::Finished`] carries the [`BatchSummary`].
//!
//! There is no cancellation: once started, a batch runs to completion.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use flume::Sender;
use log::{debug, info, warn};

use crate::api::MediaApi;
use crate::error::{ApiError, ValidationError};

/// Placeholder shown while no meaningful estimate exists yet.
pub const ETA_CALCULATING: &str = "Calculating...";

/// One user-selected file, read fully into memory.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, bytes })
    }

    pub fn mime(&self) -> mime_guess::Mime {
        mime_guess::from_path(&self.file_name).first_or_octet_stream()
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Advisory time-remaining estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Eta {
    #[default]
    Calculating,
    Remaining(Duration),
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calculating => f.write_str(ETA_CALCULATING),
            Self::Remaining(remaining) => {
                let secs = remaining.as_secs_f64().round() as u64;
                if secs >= 60 {
                    write!(f, "{}m {}s", secs / 60, secs % 60)
                } else {
                    write!(f, "{secs}s")
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub percent: u8,
    pub eta: Eta,
}

/// Derives percentage and ETA from a transfer tick.
///
/// Returns `None` when the total size is unknown (zero). With no elapsed time or nothing
/// transferred yet the speed is zero, so the ETA stays [`Eta::Calculating`].
pub fn estimate_progress(loaded: u64, total: u64, elapsed: Duration) -> Option<Progress> {
    if total == 0 {
        return None;
    }
    let loaded = loaded.min(total);
    let percent = ((loaded as f64 * 100.0) / total as f64).round() as u8;

    let elapsed_secs = elapsed.as_secs_f64();
    let speed = if elapsed_secs > 0.0 {
        loaded as f64 / elapsed_secs
    } else {
        0.0
    };

    let eta = if speed > 0.0 {
        let remaining = (total - loaded) as f64 / speed;
        Duration::try_from_secs_f64(remaining)
            .map(Eta::Remaining)
            .unwrap_or(Eta::Calculating)
    } else {
        Eta::Calculating
    };

    Some(Progress { percent, eta })
}

/// Transient per-file progress row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub file_name: String,
    pub progress_percent: u8,
    pub eta: Eta,
}

impl UploadTask {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            progress_percent: 0,
            eta: Eta::Calculating,
        }
    }

    /// Applies a tick, ignoring any that would move the percentage backwards.
    pub fn advance(&mut self, progress: Progress) {
        if progress.percent >= self.progress_percent {
            self.progress_percent = progress.percent.min(100);
            self.eta = progress.eta;
        }
    }

    /// `"<name>: <pct>% (time remaining: <eta>)"`
    pub fn label(&self) -> String {
        format!(
            "{}: {}% (time remaining: {})",
            self.file_name, self.progress_percent, self.eta
        )
    }
}

/// Result of uploading one file, validated at the collaborator boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success(String),
    /// Already stored; counted separately and not treated as a failure.
    Duplicate(String),
    Error(String),
}

impl UploadOutcome {
    /// Classifies a `{success, message}` reply. A rejection whose message equals the
    /// collaborator's duplicate signal is a duplicate, anything else is an error.
    pub fn classify(success: bool, message: &str, duplicate_signal: &str) -> Self {
        if success {
            Self::Success(message.to_string())
        } else if message.trim() == duplicate_signal.trim() {
            Self::Duplicate(message.to_string())
        } else {
            Self::Error(message.to_string())
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub file_name: String,
    pub message: String,
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.message)
    }
}

/// Aggregated outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub success_count: usize,
    /// Names of files the server already had.
    pub duplicates: Vec<String>,
    pub errors: Vec<UploadFailure>,
}

impl BatchSummary {
    pub fn record(&mut self, file_name: &str, outcome: &UploadOutcome) {
        match outcome {
            UploadOutcome::Success(_) => self.success_count += 1,
            UploadOutcome::Duplicate(_) => self.duplicates.push(file_name.to_string()),
            UploadOutcome::Error(message) => self.errors.push(UploadFailure {
                file_name: file_name.to_string(),
                message: message.clone(),
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.success_count + self.duplicates.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Human-readable summary, or `None` when nothing was attempted.
    pub fn message(&self) -> Option<String> {
        let mut sections = Vec::new();
        if self.success_count > 0 {
            sections.push(format!("Uploaded {} file(s)", self.success_count));
        }
        if !self.duplicates.is_empty() {
            sections.push(format!(
                "Skipped {} duplicate file(s):\n{}",
                self.duplicates.len(),
                self.duplicates.join("\n")
            ));
        }
        if !self.errors.is_empty() {
            let lines: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
            sections.push(format!("Errors:\n{}", lines.join("\n")));
        }
        (!sections.is_empty()).then(|| sections.join("\n\n"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Started(Vec<UploadTask>),
    Progress { index: usize, progress: Progress },
    Resolved { index: usize, outcome: UploadOutcome },
    Finished(BatchSummary),
}

/// Uploads files one after another through a [`MediaApi`].
pub struct UploadCoordinator {
    api: Arc<dyn MediaApi>,
}

impl UploadCoordinator {
    pub fn new(api: Arc<dyn MediaApi>) -> Self {
        Self { api }
    }

    pub async fn upload_batch(
        &self,
        files: Vec<UploadFile>,
        events: &Sender<UploadEvent>,
    ) -> Result<BatchSummary, ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::NoFilesSelected);
        }

        info!("UploadCoordinator: starting batch of {} file(s)", files.len());
        // Receivers may be gone (window closed); the batch still runs to completion.
        let tasks = files
            .iter()
            .map(|f| UploadTask::new(f.file_name.clone()))
            .collect();
        if events.send(UploadEvent::Started(tasks)).is_err() {
            debug!("UploadCoordinator: no receiver for the batch start");
        }

        let mut summary = BatchSummary::default();
        for (index, file) in files.into_iter().enumerate() {
            let file_name = file.file_name.clone();
            let outcome = self.upload_one(index, file, events).await;
            match &outcome {
                UploadOutcome::Success(_) => info!("UploadCoordinator: '{file_name}' uploaded"),
                UploadOutcome::Duplicate(_) => {
                    info!("UploadCoordinator: '{file_name}' skipped as duplicate");
                }
                UploadOutcome::Error(message) => {
                    warn!("UploadCoordinator: '{file_name}' failed: {message}");
                }
            }
            summary.record(&file_name, &outcome);
            if events.send(UploadEvent::Resolved { index, outcome }).is_err() {
                debug!("UploadCoordinator: no receiver for the outcome of '{file_name}'");
            }
        }

        info!(
            "UploadCoordinator: batch done, {} uploaded, {} duplicate(s), {} error(s)",
            summary.success_count,
            summary.duplicates.len(),
            summary.errors.len()
        );
        if events.send(UploadEvent::Finished(summary.clone())).is_err() {
            debug!("UploadCoordinator: no receiver for the batch summary");
        }
        Ok(summary)
    }

    async fn upload_one(
        &self,
        index: usize,
        file: UploadFile,
        events: &Sender<UploadEvent>,
    ) -> UploadOutcome {
        let started = Instant::now();
        let tx = events.clone();
        let mut last_percent = None;
        let on_progress = Box::new(move |loaded: u64, total: u64| {
            if let Some(progress) = estimate_progress(loaded, total, started.elapsed())
                && last_percent.is_none_or(|last| progress.percent >= last)
            {
                last_percent = Some(progress.percent);
                if tx.send(UploadEvent::Progress { index, progress }).is_err() {
                    debug!("UploadCoordinator: no receiver for progress of file {index}");
                }
            }
        });

        match self.api.upload_one(file, on_progress).await {
            Ok(outcome) => outcome,
            Err(ApiError::Network(err)) => {
                log::error!("UploadCoordinator: transfer failed: {err}");
                UploadOutcome::Error("could not upload file".to_string())
            }
            Err(err) => UploadOutcome::Error(err.user_message()),
        }
    }
}

/// Progress rows plus the duplicates of the last batch, as the UI shows them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadTracker {
    tasks: Vec<UploadTask>,
    skipped: Vec<String>,
    in_flight: bool,
}

impl UploadTracker {
    /// Folds one event in. Returns the summary once the batch finishes.
    pub fn apply(&mut self, event: UploadEvent) -> Option<BatchSummary> {
        match event {
            UploadEvent::Started(tasks) => {
                self.tasks = tasks;
                self.skipped.clear();
                self.in_flight = true;
                None
            }
            UploadEvent::Progress { index, progress } => {
                if let Some(task) = self.tasks.get_mut(index) {
                    task.advance(progress);
                }
                None
            }
            UploadEvent::Resolved { .. } => None,
            UploadEvent::Finished(summary) => {
                self.tasks.clear();
                self.skipped = summary.duplicates.clone();
                self.in_flight = false;
                Some(summary)
            }
        }
    }

    pub fn tasks(&self) -> &[UploadTask] {
        &self.tasks
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn clear_skipped(&mut self) {
        self.skipped.clear();
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Marks a batch as started before the first event arrives, so the button can be
    /// disabled in the same frame it was clicked.
    pub fn begin(&mut self) {
        self.in_flight = true;
    }

    /// Drops transient state when a batch ended without a `Finished` event.
    pub fn abort(&mut self) {
        self.tasks.clear();
        self.in_flight = false;
    }
}
