//! Shared test utilities for the event-gallery test suite.
//!
//! Fixture writers produce real image files on disk so the `image`-backed
//! pipeline can be exercised end to end. Gallery helpers hand out an
//! isolated [`GalleryStore`] rooted in a temp directory.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (tmp, store) = new_gallery();
//! touch(&tmp.path().join("incoming"), &["a.jpg", "b.png"]);
//! write_test_jpeg(&tmp.path().join("incoming/c.jpg"), 1600, 1200);
//! ```

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::store::GalleryStore;

// =========================================================================
// Gallery setup
// =========================================================================

/// Empty gallery root in a fresh temp directory.
///
/// Keep the `TempDir` alive for as long as the store is used.
pub fn new_gallery() -> (TempDir, GalleryStore) {
    let tmp = TempDir::new().unwrap();
    let store = GalleryStore::new(tmp.path());
    (tmp, store)
}

/// Create empty files named `names` in `dir`, creating `dir` if needed.
///
/// Enough for tests that only care about enumeration (the mock backend
/// never reads the files).
pub fn touch(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), b"").unwrap();
    }
}

// =========================================================================
// Image fixtures
// =========================================================================

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
}

/// Write a gradient JPEG of the given size.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

/// Write a single-color image; the format follows the file extension.
pub fn write_solid(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    ensure_parent(path);
    let img: RgbImage = ImageBuffer::from_pixel(width, height, Rgb(rgb));
    let format = ImageFormat::from_path(path).unwrap();
    img.save_with_format(path, format).unwrap();
}

/// Write a black PNG where every pixel has the given alpha.
pub fn write_rgba_png(path: &Path, width: u32, height: u32, alpha: u8) {
    ensure_parent(path);
    let img: RgbaImage = ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, alpha]));
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

/// Decode JPEG bytes produced by a backend.
pub fn decode_jpeg(bytes: &[u8]) -> DynamicImage {
    image::load_from_memory_with_format(bytes, ImageFormat::Jpeg).unwrap()
}
