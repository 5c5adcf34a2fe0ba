//! JSON document store for the gallery root.
//!
//! The gallery "database" is two kinds of flat JSON documents next to the
//! photo directories:
//!
//! ```text
//! <root>/
//! ├── events.json             # [{"id", "name", "date", "description"}, ...]
//! ├── 20250801-event.json     # ["photo1.jpg", "photo1_1.jpg", ...]
//! └── photos/
//!     └── 20250801-event/
//!         ├── photo1.jpg
//!         └── photo1_1.jpg
//! ```
//!
//! A missing document reads as an empty list. Documents are always rewritten
//! whole: pretty-printed with 2-space indentation, non-ASCII text left
//! unescaped, written to a temporary sibling and renamed into place.

use crate::types::{Event, PhotoList};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the event index document within the gallery root.
pub const EVENTS_FILENAME: &str = "events.json";

/// Directory (within the gallery root) holding one subdirectory per event.
pub const PHOTOS_DIRNAME: &str = "photos";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("JSON serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Read/write access to the documents and photo directories under one root.
#[derive(Debug, Clone)]
pub struct GalleryStore {
    root: PathBuf,
}

impl GalleryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn events_path(&self) -> PathBuf {
        self.root.join(EVENTS_FILENAME)
    }

    pub fn photo_list_path(&self, event_id: &str) -> PathBuf {
        self.root.join(format!("{event_id}.json"))
    }

    pub fn event_dir(&self, event_id: &str) -> PathBuf {
        self.root.join(PHOTOS_DIRNAME).join(event_id)
    }

    /// Load the event index. A missing `events.json` is an empty index.
    pub fn load_events(&self) -> Result<Vec<Event>, StoreError> {
        read_json_list(&self.events_path())
    }

    /// Replace the event index with `events`.
    pub fn save_events(&self, events: &[Event]) -> Result<(), StoreError> {
        write_json(&self.events_path(), events)
    }

    /// Load an event's photo list. A missing document is an empty list.
    pub fn load_photo_list(&self, event_id: &str) -> Result<PhotoList, StoreError> {
        read_json_list(&self.photo_list_path(event_id))
    }

    /// Replace an event's photo list with `photos`.
    pub fn save_photo_list(&self, event_id: &str, photos: &[String]) -> Result<(), StoreError> {
        write_json(&self.photo_list_path(event_id), photos)
    }

    /// Create `photos/<event_id>/`, including parents. Existing directories are fine.
    pub fn create_event_dir(&self, event_id: &str) -> Result<PathBuf, StoreError> {
        let dir = self.event_dir(event_id);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// `true` if any event in `events` has this id.
pub fn event_exists(events: &[Event], event_id: &str) -> bool {
    events.iter().any(|e| e.id == event_id)
}

fn read_json_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` and swap it into `path` via a temporary sibling file.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    write_atomically(path, json.as_bytes())?;
    tracing::info!(path = %path.display(), "saved");
    Ok(())
}

/// Write `bytes` to `<path>.tmp`, then rename it over `path`.
///
/// Either the complete file appears under `path` or nothing does; the
/// temporary file is removed when any step fails.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = fs::write(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
