//! Distortion filters: bump, twirl
//!
//! Both warps are inverse mappings: every output pixel inside the radius
//! looks up a displaced source position and samples it bilinearly. Pixels
//! outside the radius are copied unchanged.

use crate::core::error::KernelResult;
use crate::core::types::{NativeParameters, ParameterKind};
use crate::filters::builtin::{
    center_or_midpoint, non_negative_or, scalar_or, DISTORTION_BUMP, TWIRL_DISTORTION,
};
use crate::filters::descriptor::{Category, FilterDescriptor};
use crate::filters::registry::FilterRegistry;
use image::RgbaImage;
use rayon::prelude::*;

/// Register distortion filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(
        FilterDescriptor::builder(DISTORTION_BUMP, "Bump Distortion")
            .description("Bulge the image outward around a center point")
            .category(Category::Distortion)
            .accepts(ParameterKind::Radius)
            .accepts(ParameterKind::Scale)
            .accepts(ParameterKind::Center)
            .build(),
    );
    registry.register(
        FilterDescriptor::builder(TWIRL_DISTORTION, "Twirl Distortion")
            .description("Rotate pixels around a center point, strongest at the center")
            .category(Category::Distortion)
            .accepts(ParameterKind::Radius)
            .accepts(ParameterKind::Scale)
            .accepts(ParameterKind::Center)
            .build(),
    );
}

const DISTORTION_DEFAULT_RADIUS: f64 = 300.0;
const BUMP_DEFAULT_SCALE: f64 = 0.5;
const TWIRL_DEFAULT_ANGLE: f64 = std::f64::consts::PI;

/// Describes the circular region a warp acts on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpRegion {
    pub center: (f64, f64),
    pub radius: f64,
}

/// Bump distortion. Positive `scale` magnifies the center, negative pinches it.
pub fn bump(rgba: &RgbaImage, region: WarpRegion, scale: f64) -> RgbaImage {
    warp(rgba, region, |dx, dy, n| {
        let ratio = 1.0 / (1.0 + scale * (1.0 - n * n)).max(f64::EPSILON);
        (dx * ratio, dy * ratio)
    })
}

/// Twirl distortion. `angle` is the rotation in radians at the center,
/// falling off to zero at the radius.
pub fn twirl(rgba: &RgbaImage, region: WarpRegion, angle: f64) -> RgbaImage {
    warp(rgba, region, |dx, dy, n| {
        let falloff = 1.0 - n;
        let theta = angle * falloff * falloff;
        let (sin, cos) = theta.sin_cos();
        (dx * cos - dy * sin, dx * sin + dy * cos)
    })
}

pub(crate) fn apply_bump(rgba: &RgbaImage, params: &NativeParameters) -> KernelResult<RgbaImage> {
    let region = region_from(rgba, params)?;
    let scale = scalar_or(params, ParameterKind::Scale, BUMP_DEFAULT_SCALE)?;
    Ok(bump(rgba, region, scale))
}

pub(crate) fn apply_twirl(rgba: &RgbaImage, params: &NativeParameters) -> KernelResult<RgbaImage> {
    let region = region_from(rgba, params)?;
    let angle = scalar_or(params, ParameterKind::Scale, TWIRL_DEFAULT_ANGLE)?;
    Ok(twirl(rgba, region, angle))
}

fn region_from(rgba: &RgbaImage, params: &NativeParameters) -> KernelResult<WarpRegion> {
    Ok(WarpRegion {
        center: center_or_midpoint(params, rgba.width(), rgba.height())?,
        radius: non_negative_or(params, ParameterKind::Radius, DISTORTION_DEFAULT_RADIUS)?,
    })
}

/// Inverse-map every pixel inside `region`.
///
/// `offset` receives the output pixel's offset from the center and its
/// normalized distance `n` in `[0, 1)`, and returns the source offset.
fn warp<F>(rgba: &RgbaImage, region: WarpRegion, offset: F) -> RgbaImage
where
    F: Fn(f64, f64, f64) -> (f64, f64) + Sync,
{
    let mut result = rgba.clone();
    if region.radius <= 0.0 || rgba.is_empty() {
        return result;
    }

    let width = rgba.width() as usize;
    let (cx, cy) = region.center;

    result
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = y as f64 - cy;
            for (x, pixel) in row.chunks_mut(4).enumerate() {
                let dx = x as f64 - cx;
                let n = (dx * dx + dy * dy).sqrt() / region.radius;
                if n >= 1.0 {
                    continue;
                }
                let (sx, sy) = offset(dx, dy, n);
                pixel.copy_from_slice(&sample_bilinear(rgba, cx + sx, cy + sy));
            }
        });

    result
}

/// Bilinear sample with coordinates clamped to the image edge.
fn sample_bilinear(rgba: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    let max_x = rgba.width().saturating_sub(1);
    let max_y = rgba.height().saturating_sub(1);
    let x = x.clamp(0.0, max_x as f64);
    let y = y.clamp(0.0, max_y as f64);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = rgba.get_pixel(x0, y0);
    let p10 = rgba.get_pixel(x1, y0);
    let p01 = rgba.get_pixel(x0, y1);
    let p11 = rgba.get_pixel(x1, y1);

    let mut out = [0u8; 4];
    for (c, slot) in out.iter_mut().enumerate() {
        let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
        let bottom = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
        *slot = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}
