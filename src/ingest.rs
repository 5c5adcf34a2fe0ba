//! Event registration and photo ingestion.
//!
//! Two linear workflows over a [`GalleryStore`]:
//!
//! - [`create_event`] registers a new event in `events.json`, creates its
//!   photo directory and an empty photo list, and optionally ingests a first
//!   batch of photos.
//! - [`add_photos`] normalizes every supported image directly inside a
//!   source directory into `photos/<event_id>/` and appends the stored names
//!   to the event's photo list.
//!
//! ## Failure model
//!
//! Preconditions (duplicate id, missing directories, nothing to ingest) fail
//! before anything is written. Once a batch starts, a photo that cannot be
//! decoded, encoded or written is recorded in [`IngestReport::failures`] and
//! the batch moves on. Each JPEG is written before its name is recorded, and
//! the photo list is saved once at the end, so the list never names a file
//! that does not exist.
//!
//! ## Ordering
//!
//! Source files are processed in byte-wise file name order (case-sensitive:
//! `photo1.JPG` before `photo1.png`). When two sources map to the same output
//! name the later one is renamed with a counter, see [`crate::naming`].

use crate::config::GalleryConfig;
use crate::imaging::{
    BackendError, ImageBackend, NormalizeParams, RustBackend, is_supported_photo,
    supported_input_extensions,
};
use crate::naming::{candidate_name, derive_event_id, uniquify};
use crate::store::{GalleryStore, StoreError, event_exists, write_atomically};
use crate::types::Event;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

/// Prefix accepted by the ingest commands when none is given.
pub const DEFAULT_PREFIX: &str = "IMG";

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Event '{0}' already exists")]
    DuplicateEvent(String),
    #[error("Invalid event id '{0}': must be a single non-empty path component")]
    InvalidEventId(String),
    #[error("Event directory does not exist: {}", .0.display())]
    MissingEventDirectory(PathBuf),
    #[error("Photo directory does not exist: {}", .0.display())]
    MissingSourceDirectory(PathBuf),
    #[error(
        "No processable image files ({}) found in {}",
        supported_input_extensions().join(", "),
        .0.display()
    )]
    NoProcessableFiles(PathBuf),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to list photos: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One photo that could not be ingested. The rest of the batch is unaffected.
#[derive(Error, Debug)]
#[error("Image processing failed for {}: {cause}", path.display())]
pub struct ImageProcessingError {
    pub path: PathBuf,
    #[source]
    pub cause: BackendError,
}

/// Where a batch of photos comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoSource {
    pub dir: PathBuf,
    /// Accepted for compatibility with existing gallery scripts. Stored
    /// names keep the source file stem; the prefix does not rename them.
    pub prefix: String,
}

impl PhotoSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Request to register a new event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEvent {
    pub name: String,
    pub date: String,
    /// Falls back to the configured description template.
    pub description: Option<String>,
    /// Falls back to an id derived from `date`.
    pub event_id: Option<String>,
    /// Photos to ingest right after the event is registered.
    pub photos: Option<PhotoSource>,
}

/// A photo that was normalized and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedPhoto {
    pub source: PathBuf,
    /// Name under `photos/<event_id>/` and in the photo list.
    pub filename: String,
}

/// Outcome of one [`add_photos`] batch.
#[derive(Debug)]
pub struct IngestReport {
    pub event_id: String,
    /// Number of supported source files found.
    pub candidates: usize,
    pub added: Vec<IngestedPhoto>,
    pub failures: Vec<ImageProcessingError>,
}

impl IngestReport {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    /// `true` when every candidate was stored.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of [`create_event`].
///
/// The event is registered even when the follow-up photo batch fails a
/// precondition; that failure is carried in `photos`.
#[derive(Debug)]
pub struct CreatedEvent {
    pub event: Event,
    pub photos: Option<Result<IngestReport, IngestError>>,
}

/// Progress of a running batch, streamed to the CLI printer.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    BatchStarted {
        event_id: String,
        candidates: usize,
    },
    PhotoAdded {
        /// 1-based position in the batch
        index: usize,
        source_name: String,
        filename: String,
    },
    PhotoSkipped {
        index: usize,
        source_name: String,
        reason: String,
    },
}

fn send(progress: &Option<Sender<IngestEvent>>, event: IngestEvent) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is watching.
        let _ = tx.send(event);
    }
}

fn validate_event_id(event_id: &str) -> Result<(), IngestError> {
    let single_component = !event_id.is_empty()
        && event_id != "."
        && event_id != ".."
        && !event_id.contains(['/', '\\']);
    if single_component {
        Ok(())
    } else {
        Err(IngestError::InvalidEventId(event_id.to_string()))
    }
}

/// Register a new event, then ingest its photos if a source was given.
pub fn create_event(
    store: &GalleryStore,
    config: &GalleryConfig,
    request: &NewEvent,
    progress: Option<Sender<IngestEvent>>,
) -> Result<CreatedEvent, IngestError> {
    create_event_with_backend(&RustBackend::new(), store, config, request, progress)
}

/// [`create_event`] with a specific image backend (allows testing with a mock).
pub fn create_event_with_backend(
    backend: &impl ImageBackend,
    store: &GalleryStore,
    config: &GalleryConfig,
    request: &NewEvent,
    progress: Option<Sender<IngestEvent>>,
) -> Result<CreatedEvent, IngestError> {
    let event_id = match &request.event_id {
        Some(id) => id.clone(),
        None => derive_event_id(&request.date, &config.events.id_suffix),
    };
    validate_event_id(&event_id)?;

    let mut events = store.load_events()?;
    if event_exists(&events, &event_id) {
        return Err(IngestError::DuplicateEvent(event_id));
    }

    let event = Event {
        id: event_id,
        name: request.name.clone(),
        date: request.date.clone(),
        description: request
            .description
            .clone()
            .unwrap_or_else(|| config.events.default_description(&request.name)),
    };
    events.push(event.clone());
    store.save_events(&events)?;

    store.create_event_dir(&event.id)?;
    store.save_photo_list(&event.id, &[])?;
    tracing::info!(event_id = %event.id, "event registered");

    let photos = request
        .photos
        .as_ref()
        .map(|source| add_photos_with_backend(backend, store, config, &event.id, source, progress));

    Ok(CreatedEvent { event, photos })
}

/// Normalize and add every supported photo in `source.dir` to an existing event.
pub fn add_photos(
    store: &GalleryStore,
    config: &GalleryConfig,
    event_id: &str,
    source: &PhotoSource,
    progress: Option<Sender<IngestEvent>>,
) -> Result<IngestReport, IngestError> {
    add_photos_with_backend(&RustBackend::new(), store, config, event_id, source, progress)
}

/// [`add_photos`] with a specific image backend (allows testing with a mock).
pub fn add_photos_with_backend(
    backend: &impl ImageBackend,
    store: &GalleryStore,
    config: &GalleryConfig,
    event_id: &str,
    source: &PhotoSource,
    progress: Option<Sender<IngestEvent>>,
) -> Result<IngestReport, IngestError> {
    validate_event_id(event_id)?;
    let event_dir = store.event_dir(event_id);
    if !event_dir.is_dir() {
        return Err(IngestError::MissingEventDirectory(event_dir));
    }

    let mut photos = store.load_photo_list(event_id)?;

    if !source.dir.is_dir() {
        return Err(IngestError::MissingSourceDirectory(source.dir.clone()));
    }
    let candidates = collect_photo_files(&source.dir)?;
    if candidates.is_empty() {
        return Err(IngestError::NoProcessableFiles(source.dir.clone()));
    }

    tracing::debug!(
        event_id,
        prefix = %source.prefix,
        candidates = candidates.len(),
        existing = photos.len(),
        "starting batch"
    );
    send(
        &progress,
        IngestEvent::BatchStarted {
            event_id: event_id.to_string(),
            candidates: candidates.len(),
        },
    );

    let mut taken: HashSet<String> = photos.iter().cloned().collect();
    let mut report = IngestReport {
        event_id: event_id.to_string(),
        candidates: candidates.len(),
        added: Vec::new(),
        failures: Vec::new(),
    };

    for (i, path) in candidates.into_iter().enumerate() {
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let filename = uniquify(&taken, &candidate_name(&path));
        tracing::debug!(source = %source_name, %filename, "ingesting");

        match ingest_one(backend, config, &path, &event_dir.join(&filename)) {
            Ok(()) => {
                taken.insert(filename.clone());
                photos.push(filename.clone());
                send(
                    &progress,
                    IngestEvent::PhotoAdded {
                        index: i + 1,
                        source_name,
                        filename: filename.clone(),
                    },
                );
                report.added.push(IngestedPhoto {
                    source: path,
                    filename,
                });
            }
            Err(cause) => {
                tracing::warn!(source = %path.display(), error = %cause, "skipping photo");
                send(
                    &progress,
                    IngestEvent::PhotoSkipped {
                        index: i + 1,
                        source_name,
                        reason: cause.to_string(),
                    },
                );
                report.failures.push(ImageProcessingError { path, cause });
            }
        }
    }

    store.save_photo_list(event_id, &photos)?;
    Ok(report)
}

/// Normalize one source and write the JPEG to `output`.
///
/// A failed write leaves nothing behind under `output`.
fn ingest_one(
    backend: &impl ImageBackend,
    config: &GalleryConfig,
    source: &Path,
    output: &Path,
) -> Result<(), BackendError> {
    let bytes = backend.normalize(&NormalizeParams {
        source: source.to_path_buf(),
        canvas: config.images.canvas(),
        quality: config.images.quality(),
    })?;
    write_atomically(output, &bytes)?;
    Ok(())
}

/// Supported image files directly inside `dir`, sorted by file name.
fn collect_photo_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_photo(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
