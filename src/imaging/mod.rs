//! Image normalization in pure Rust via the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Normalize** | decode → flatten → Lanczos3 fit → white letterbox → JPEG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for fit/letterbox geometry (unit testable)
//! - **Parameters**: Data structures describing a normalization
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use params::{Canvas, NormalizeParams, Quality};
pub use rust_backend::{RustBackend, is_supported_photo, supported_input_extensions};
