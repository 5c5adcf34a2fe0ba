//! Pure calculation functions for normalization geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Everything is integer math: aspect ratios are compared by
//! cross-multiplication so `800x600` and `400x300` scale exactly.

/// Final placement of a photo on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Size the photo is scaled to before being placed.
    pub width: u32,
    pub height: u32,
    /// Top-left offset of the photo on the canvas.
    pub x: u32,
    pub y: u32,
}

/// Complete geometry for one normalization.
///
/// `fitted` is the thumbnail-style downscale (never enlarges). `placement` is
/// `None` when the fitted image already is exactly the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizePlan {
    pub fitted: (u32, u32),
    pub placement: Option<Placement>,
}

/// Shrink `source` to fit within `bounds`, preserving aspect ratio.
///
/// Never enlarges: a source already inside the bounds is returned unchanged.
/// The scaled edge is rounded to the nearest pixel and is never zero.
///
/// ```text
/// 4000x3000 in 800x600 → 800x600
/// 3000x4000 in 800x600 → 450x600
/// 400x100   in 800x600 → 400x100
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w <= max_w && src_h <= max_h {
        return source;
    }
    scale_by_ratio(source, bounds, |s, b| (s + b / 2) / b)
}

/// Scale `source` so it touches `bounds` on one axis and fits on the other.
///
/// Unlike [`fit_within`] this may enlarge. The free edge is truncated, so the
/// result never exceeds the bounds. Same-aspect inputs map exactly onto the
/// bounds.
pub fn scale_to_bounds(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    scale_by_ratio(source, bounds, |s, b| s / b)
}

fn scale_by_ratio(
    source: (u32, u32),
    bounds: (u32, u32),
    divide: impl Fn(u64, u64) -> u64,
) -> (u32, u32) {
    let (src_w, src_h) = (source.0.max(1) as u64, source.1.max(1) as u64);
    let (max_w, max_h) = (bounds.0 as u64, bounds.1 as u64);

    if src_w * max_h >= src_h * max_w {
        // Wider than (or same as) the box: width is the limiting edge
        let h = divide(src_h * max_w, src_w).clamp(1, max_h);
        (max_w as u32, h as u32)
    } else {
        let w = divide(src_w * max_h, src_h).clamp(1, max_w);
        (w as u32, max_h as u32)
    }
}

/// Offset that centers `inner` within `outer`.
pub fn center_offset(inner: (u32, u32), outer: (u32, u32)) -> (u32, u32) {
    (
        outer.0.saturating_sub(inner.0) / 2,
        outer.1.saturating_sub(inner.1) / 2,
    )
}

/// Plan the full normalization of a `source`-sized image onto `canvas`.
pub fn plan_normalize(source: (u32, u32), canvas: (u32, u32)) -> NormalizePlan {
    let fitted = fit_within(source, canvas);
    if fitted == canvas {
        return NormalizePlan {
            fitted,
            placement: None,
        };
    }

    let (width, height) = scale_to_bounds(fitted, canvas);
    let (x, y) = center_offset((width, height), canvas);
    NormalizePlan {
        fitted,
        placement: Some(Placement {
            width,
            height,
            x,
            y,
        }),
    }
}
