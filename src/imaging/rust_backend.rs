//! Pure Rust image processing backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP, TIFF) | `image::ImageReader` with content sniffing |
//! | Flatten alpha / palette | composite onto white, `DynamicImage::to_rgb8` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Letterbox | `RgbImage::from_pixel` white canvas + `image::imageops::overlay` |
//! | Encode → JPEG | `jpeg_encoder::Encoder` with optimized Huffman tables |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::plan_normalize;
use super::params::{NormalizeParams, Quality};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageError, ImageReader, Rgb, RgbImage};
use jpeg_encoder::{ColorType, Encoder};
use std::path::Path;

/// Source extensions accepted for ingestion (matched case-insensitively).
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Returns the set of image file extensions accepted as photo sources.
pub fn supported_input_extensions() -> &'static [&'static str] {
    SUPPORTED_EXTENSIONS
}

/// Whether `path` has one of the [supported extensions](supported_input_extensions).
pub fn is_supported_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(e) => BackendError::Io(e),
        other => BackendError::Decode(format!("{}: {}", path.display(), other)),
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the file contents, so a PNG saved as `.jpg`
/// still decodes.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| decode_error(path, e))
}

/// Flatten to opaque RGB. Transparent pixels are composited onto white.
fn flatten(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in rgb.pixels_mut().zip(rgba.pixels()) {
        let alpha = src[3] as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        *dst = Rgb([blend(src[0]), blend(src[1]), blend(src[2])]);
    }
    rgb
}

fn resize_to(img: RgbImage, width: u32, height: u32) -> RgbImage {
    if img.dimensions() == (width, height) {
        return img;
    }
    imageops::resize(&img, width, height, FilterType::Lanczos3)
}

/// Encode as JPEG with Huffman tables optimized for this image.
fn encode_jpeg(img: &RgbImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let (width, height) = img.dimensions();
    let too_large = || BackendError::Encode(format!("{width}x{height} exceeds the JPEG size limit"));
    let width = u16::try_from(width).map_err(|_| too_large())?;
    let height = u16::try_from(height).map_err(|_| too_large())?;

    let mut bytes = Vec::new();
    let mut encoder = Encoder::new(&mut bytes, quality.value());
    encoder.set_optimized_huffman_tables(true);
    encoder
        .encode(img.as_raw(), width, height, ColorType::Rgb)
        .map_err(|e| BackendError::Encode(e.to_string()))?;
    Ok(bytes)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn normalize(&self, params: &NormalizeParams) -> Result<Vec<u8>, BackendError> {
        let rgb = flatten(load_image(&params.source)?);
        let canvas = params.canvas.dimensions();
        let plan = plan_normalize(rgb.dimensions(), canvas);
        tracing::debug!(
            source = %params.source.display(),
            original = ?rgb.dimensions(),
            fitted = ?plan.fitted,
            placement = ?plan.placement,
            "normalize plan"
        );

        let fitted = resize_to(rgb, plan.fitted.0, plan.fitted.1);
        let output = match plan.placement {
            None => fitted,
            Some(placement) => {
                let scaled = resize_to(fitted, placement.width, placement.height);
                let mut framed = RgbImage::from_pixel(canvas.0, canvas.1, WHITE);
                imageops::overlay(&mut framed, &scaled, placement.x.into(), placement.y.into());
                framed
            }
        };

        encode_jpeg(&output, params.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Canvas;
    use crate::test_helpers::{decode_jpeg, write_rgba_png, write_solid, write_test_jpeg};
    use image::{GenericImageView, Rgba};
    use tempfile::TempDir;

    fn params(source: &Path) -> NormalizeParams {
        NormalizeParams {
            source: source.to_path_buf(),
            canvas: Canvas::default(),
            quality: Quality::default(),
        }
    }

    fn assert_near(pixel: Rgba<u8>, expected: [u8; 3]) {
        for c in 0..3 {
            let diff = (pixel[c] as i16 - expected[c] as i16).abs();
            assert!(diff <= 24, "pixel {pixel:?} not near {expected:?}");
        }
    }

    #[test]
    fn supported_extensions_match_ingest_formats() {
        assert_eq!(
            supported_input_extensions(),
            &["jpg", "jpeg", "png", "bmp", "tiff"]
        );
    }

    #[test]
    fn is_supported_photo_ignores_case() {
        assert!(is_supported_photo(Path::new("a.JPG")));
        assert!(is_supported_photo(Path::new("b.Tiff")));
        assert!(is_supported_photo(Path::new("dir/c.bmp")));
        assert!(!is_supported_photo(Path::new("d.gif")));
        assert!(!is_supported_photo(Path::new("notes.txt")));
        assert!(!is_supported_photo(Path::new("jpg")));
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_test_jpeg(&path, 200, 150);

        let dims = RustBackend::new().identify(&path).unwrap();
        assert_eq!(dims, Dimensions { width: 200, height: 150 });
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let result = RustBackend::new().identify(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn normalize_large_landscape_to_exact_canvas() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("big.jpg");
        write_test_jpeg(&source, 1600, 1200);

        let bytes = RustBackend::new().normalize(&params(&source)).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
        assert_eq!(decode_jpeg(&bytes).dimensions(), (800, 600));
    }

    #[test]
    fn normalize_portrait_is_pillarboxed_on_white() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("portrait.png");
        write_solid(&source, 300, 400, [200, 0, 0]);

        let bytes = RustBackend::new().normalize(&params(&source)).unwrap();
        let out = decode_jpeg(&bytes);
        assert_eq!(out.dimensions(), (800, 600));
        // 300x400 → 450x600 centered: bars are 175px wide on each side
        assert_near(out.get_pixel(20, 300), [255, 255, 255]);
        assert_near(out.get_pixel(780, 300), [255, 255, 255]);
        assert_near(out.get_pixel(400, 300), [200, 0, 0]);
    }

    #[test]
    fn normalize_wide_is_letterboxed_on_white() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("wide.bmp");
        write_solid(&source, 1920, 1080, [0, 0, 200]);

        let bytes = RustBackend::new().normalize(&params(&source)).unwrap();
        let out = decode_jpeg(&bytes);
        assert_eq!(out.dimensions(), (800, 600));
        assert_near(out.get_pixel(400, 10), [255, 255, 255]);
        assert_near(out.get_pixel(400, 590), [255, 255, 255]);
        assert_near(out.get_pixel(400, 300), [0, 0, 200]);
    }

    #[test]
    fn normalize_small_images_still_fill_canvas() {
        let tmp = TempDir::new().unwrap();
        let backend = RustBackend::new();

        for (name, w, h) in [("tiny.png", 40, 30), ("strip.png", 100, 10), ("square.png", 64, 64)] {
            let source = tmp.path().join(name);
            write_solid(&source, w, h, [10, 120, 10]);
            let bytes = backend.normalize(&params(&source)).unwrap();
            assert_eq!(decode_jpeg(&bytes).dimensions(), (800, 600), "{name}");
        }
    }

    #[test]
    fn normalize_flattens_transparency_onto_white() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("clear.png");
        write_rgba_png(&source, 800, 600, 0);

        let bytes = RustBackend::new().normalize(&params(&source)).unwrap();
        let out = decode_jpeg(&bytes);
        assert_eq!(out.dimensions(), (800, 600));
        assert_near(out.get_pixel(400, 300), [255, 255, 255]);
    }

    #[test]
    fn normalize_keeps_opaque_alpha_pixels() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("opaque.png");
        write_rgba_png(&source, 400, 300, 255);

        let bytes = RustBackend::new().normalize(&params(&source)).unwrap();
        let out = decode_jpeg(&bytes);
        assert_near(out.get_pixel(400, 300), [0, 0, 0]);
    }

    #[test]
    fn normalize_reads_tiff() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("scan.tiff");
        write_solid(&source, 1000, 500, [90, 90, 90]);

        let bytes = RustBackend::new().normalize(&params(&source)).unwrap();
        assert_eq!(decode_jpeg(&bytes).dimensions(), (800, 600));
    }

    #[test]
    fn normalize_custom_canvas() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("photo.jpg");
        write_test_jpeg(&source, 1000, 1000);

        let bytes = RustBackend::new()
            .normalize(&NormalizeParams {
                source,
                canvas: Canvas::new(320, 240),
                quality: Quality::new(60),
            })
            .unwrap();
        assert_eq!(decode_jpeg(&bytes).dimensions(), (320, 240));
    }

    #[test]
    fn normalize_quality_changes_output_size() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("gradient.jpg");
        write_test_jpeg(&source, 800, 600);
        let backend = RustBackend::new();

        let low = backend
            .normalize(&NormalizeParams {
                quality: Quality::new(10),
                ..params(&source)
            })
            .unwrap();
        let high = backend
            .normalize(&NormalizeParams {
                quality: Quality::new(95),
                ..params(&source)
            })
            .unwrap();
        assert!(high.len() > low.len());
    }

    #[test]
    fn optimized_tables_are_no_larger_than_default_tables() {
        let img = RgbImage::from_fn(800, 600, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let quality = Quality::default();

        let optimized = encode_jpeg(&img, quality).unwrap();

        let mut default_tables = Vec::new();
        Encoder::new(&mut default_tables, quality.value())
            .encode(img.as_raw(), 800, 600, ColorType::Rgb)
            .unwrap();
        assert!(optimized.len() <= default_tables.len());
        assert_eq!(decode_jpeg(&optimized).dimensions(), (800, 600));
    }

    #[test]
    fn oversized_canvas_is_encode_error() {
        let img = RgbImage::new(70_000, 1);
        assert!(matches!(
            encode_jpeg(&img, Quality::default()),
            Err(BackendError::Encode(_))
        ));
    }

    #[test]
    fn normalize_sniffs_mislabeled_format() {
        let tmp = TempDir::new().unwrap();
        let png = tmp.path().join("real.png");
        write_solid(&png, 80, 60, [1, 2, 3]);
        let mislabeled = tmp.path().join("actually-png.jpg");
        std::fs::copy(&png, &mislabeled).unwrap();

        let bytes = RustBackend::new().normalize(&params(&mislabeled)).unwrap();
        assert_eq!(decode_jpeg(&bytes).dimensions(), (800, 600));
    }

    #[test]
    fn normalize_garbage_file_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("broken.jpg");
        std::fs::write(&source, b"definitely not a jpeg").unwrap();

        let result = RustBackend::new().normalize(&params(&source));
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn normalize_missing_file_is_io_error() {
        let result = RustBackend::new().normalize(&params(Path::new("/nonexistent/a.jpg")));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }
}
