//! Filename and identifier conventions.
//!
//! Every ingested photo is stored as `<source stem>.jpg`. When that name is
//! already taken in the event, a counter is appended to the stem:
//!
//! ```text
//! photo1.JPG → photo1.jpg
//! photo1.png → photo1_1.jpg      (photo1.jpg taken)
//! photo1.bmp → photo1_2.jpg      (photo1.jpg, photo1_1.jpg taken)
//! ```
//!
//! Event ids not supplied explicitly are derived from the date alone:
//! `2025-08-01` → `20250801-event`. Two events on the same date therefore
//! collide; pass an explicit id for the second one.

use std::collections::HashSet;
use std::path::Path;

/// Extension every normalized photo is stored with.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Return `desired` if it is free, otherwise the first free `{stem}_{n}.{ext}`.
///
/// The stem/extension split is on the last `.`; a name without a dot gets
/// the counter appended to the whole name. `existing` is only read.
///
/// - `"a.jpg"` with `{}` → `"a.jpg"`
/// - `"a.jpg"` with `{"a.jpg"}` → `"a_1.jpg"`
/// - `"a.jpg"` with `{"a.jpg", "a_1.jpg"}` → `"a_2.jpg"`
/// - `"README"` with `{"README"}` → `"README_1"`
pub fn uniquify(existing: &HashSet<String>, desired: &str) -> String {
    if !existing.contains(desired) {
        return desired.to_string();
    }

    let (stem, extension) = match desired.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (desired, None),
    };

    (1u64..)
        .map(|counter| match extension {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        })
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or_else(|| desired.to_string())
}

/// Output name for a source photo: its base name with the extension replaced by `jpg`.
///
/// `IMG_0001.PNG` → `IMG_0001.jpg`, `holiday.photo.tiff` → `holiday.photo.jpg`.
pub fn candidate_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}.{OUTPUT_EXTENSION}")
}

/// Derive an event id from its date: separators stripped, `-{suffix}` appended.
///
/// The event name plays no part, so localized names never leak into ids.
/// `("2025-08-01", "event")` → `"20250801-event"`.
pub fn derive_event_id(date: &str, suffix: &str) -> String {
    let compact: String = date.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    format!("{compact}-{suffix}")
}
