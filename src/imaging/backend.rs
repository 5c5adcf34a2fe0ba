//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the ingestion
//! workflow needs: identify and normalize. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests swap in the recording [`tests::MockBackend`].

use super::params::NormalizeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("JPEG encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Get image dimensions without a full decode where the format allows it.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, flatten, fit, letterbox and encode one source image.
    ///
    /// Returns the encoded JPEG bytes; writing them is the caller's job.
    fn normalize(&self, params: &NormalizeParams) -> Result<Vec<u8>, BackendError>;
}
