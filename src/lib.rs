//! # Event Gallery
//!
//! Maintains the data behind a static photo-gallery website: an index of
//! events, one photo list per event, and a directory of uniformly sized JPEG
//! photos per event. The website reads these files as-is; this crate is the
//! only thing that writes them.
//!
//! # Gallery Layout
//!
//! ```text
//! <root>/
//! ├── config.toml          # optional settings
//! ├── events.json          # event index
//! ├── <event_id>.json      # photo list per event
//! └── photos/<event_id>/   # normalized JPEGs
//! ```
//!
//! # Workflows
//!
//! ```text
//! new_event   name + date  →  events.json entry, photos/<id>/, <id>.json
//! add_photos  source dir   →  photos/<id>/*.jpg, appended to <id>.json
//! check       (read-only)  →  report of index / list / disk drift
//! ```
//!
//! Every ingested photo is scaled to fit an 800×600 box (by default), centered
//! on a white canvas of exactly that size, and stored as a quality-85 JPEG, so
//! the website can lay out every photo in the same frame.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ingest`] | Event registration and batch photo ingestion |
//! | [`check`] | Read-only consistency check of index, lists and files |
//! | [`store`] | JSON documents and photo directories under the gallery root |
//! | [`imaging`] | Pure-Rust normalization: fit, letterbox, JPEG encode |
//! | [`naming`] | Output filenames, collision counters, derived event ids |
//! | [`config`] | Optional `config.toml` loading, merging, and validation |
//! | [`types`] | Records persisted in the JSON documents |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Flat JSON Documents
//!
//! The website fetches `events.json` and `<event_id>.json` directly, so they
//! stay plain arrays with no envelope or version field. Documents are always
//! rewritten whole through a temporary file, and a photo's name is only
//! recorded after its JPEG is on disk.
//!
//! ## Per-File Failures Don't Stop a Batch
//!
//! One corrupt photo in a card dump should not block the rest. Failures are
//! collected into [`ingest::IngestReport`] and printed after the batch.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, Lanczos3 resampling and JPEG encoding all come from the `image`
//! crate. There is nothing to install besides the binary.

pub mod check;
pub mod config;
pub mod imaging;
pub mod ingest;
pub mod naming;
pub mod output;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
