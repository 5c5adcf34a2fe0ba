//! Read-only consistency check of a gallery root.
//!
//! The website trusts `events.json`, the per-event photo lists and the files
//! under `photos/` to agree. This walks all three and reports every place
//! they drift apart, without modifying anything:
//!
//! | Issue                   | Meaning                                           |
//! |-------------------------|---------------------------------------------------|
//! | `UnknownEvent`          | requested id is not in the index                  |
//! | `DuplicateEventId`      | the index lists the same id more than once        |
//! | `MissingEventDirectory` | indexed event has no `photos/<id>/`               |
//! | `DuplicateListEntry`    | a photo list names the same file twice            |
//! | `MissingPhoto`          | listed file is not on disk                        |
//! | `UnlistedPhoto`         | file on disk is not in the list                   |
//! | `WrongDimensions`       | stored photo is not exactly the configured canvas |
//! | `UnreadablePhoto`       | stored photo cannot be identified as an image     |

use crate::config::GalleryConfig;
use crate::imaging::{ImageBackend, RustBackend};
use crate::store::{GalleryStore, StoreError, event_exists};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    UnknownEvent(String),
    DuplicateEventId(String),
    MissingEventDirectory {
        event_id: String,
        path: PathBuf,
    },
    DuplicateListEntry {
        event_id: String,
        filename: String,
    },
    MissingPhoto {
        event_id: String,
        filename: String,
    },
    UnlistedPhoto {
        event_id: String,
        filename: String,
    },
    WrongDimensions {
        event_id: String,
        filename: String,
        width: u32,
        height: u32,
    },
    UnreadablePhoto {
        event_id: String,
        filename: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckReport {
    pub events_checked: usize,
    /// Listed photos that exist on disk and were identified.
    pub photos_checked: usize,
    pub issues: Vec<Issue>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check every event in the index, or only `event` when given.
pub fn check_gallery(
    store: &GalleryStore,
    config: &GalleryConfig,
    event: Option<&str>,
) -> Result<CheckReport, StoreError> {
    check_gallery_with_backend(&RustBackend::new(), store, config, event)
}

/// [`check_gallery`] with a specific image backend (allows testing with a mock).
pub fn check_gallery_with_backend(
    backend: &impl ImageBackend,
    store: &GalleryStore,
    config: &GalleryConfig,
    event: Option<&str>,
) -> Result<CheckReport, StoreError> {
    let events = store.load_events()?;
    let mut report = CheckReport::default();

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for e in &events {
        if seen.insert(e.id.as_str()) {
            ids.push(e.id.as_str());
        } else {
            report.issues.push(Issue::DuplicateEventId(e.id.clone()));
        }
    }

    let selected = match event {
        Some(id) if !event_exists(&events, id) => {
            report.issues.push(Issue::UnknownEvent(id.to_string()));
            return Ok(report);
        }
        Some(id) => vec![id],
        None => ids,
    };

    let canvas = config.images.canvas().dimensions();
    for event_id in selected {
        tracing::debug!(event_id, "checking event");
        check_event(backend, store, canvas, event_id, &mut report)?;
        report.events_checked += 1;
    }
    Ok(report)
}

fn check_event(
    backend: &impl ImageBackend,
    store: &GalleryStore,
    canvas: (u32, u32),
    event_id: &str,
    report: &mut CheckReport,
) -> Result<(), StoreError> {
    let photos = store.load_photo_list(event_id)?;
    let dir = store.event_dir(event_id);
    if !dir.is_dir() {
        report.issues.push(Issue::MissingEventDirectory {
            event_id: event_id.to_string(),
            path: dir,
        });
        return Ok(());
    }

    let mut listed = HashSet::new();
    for filename in &photos {
        if !listed.insert(filename.as_str()) {
            report.issues.push(Issue::DuplicateListEntry {
                event_id: event_id.to_string(),
                filename: filename.clone(),
            });
            continue;
        }

        let path = dir.join(filename);
        if !path.is_file() {
            report.issues.push(Issue::MissingPhoto {
                event_id: event_id.to_string(),
                filename: filename.clone(),
            });
            continue;
        }

        match backend.identify(&path) {
            Ok(dims) if (dims.width, dims.height) != canvas => {
                report.issues.push(Issue::WrongDimensions {
                    event_id: event_id.to_string(),
                    filename: filename.clone(),
                    width: dims.width,
                    height: dims.height,
                });
            }
            Ok(_) => report.photos_checked += 1,
            Err(e) => report.issues.push(Issue::UnreadablePhoto {
                event_id: event_id.to_string(),
                filename: filename.clone(),
                reason: e.to_string(),
            }),
        }
    }

    for filename in files_in(&dir)? {
        if !listed.contains(filename.as_str()) {
            report.issues.push(Issue::UnlistedPhoto {
                event_id: event_id.to_string(),
                filename,
            });
        }
    }
    Ok(())
}

/// Names of regular files directly inside `dir`, sorted.
fn files_in(dir: &Path) -> Result<Vec<String>, StoreError> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}
